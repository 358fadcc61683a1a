//! Length units used when reporting domain sizes to clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Centimetres per parsec.
const PC_IN_CM: f64 = 3.085_677_581_491_367e18;

/// Length unit in which the client-facing domain width is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[serde(rename = "cm")]
    Cm,
    #[serde(rename = "m")]
    M,
    #[serde(rename = "km")]
    Km,
    #[serde(rename = "au")]
    Au,
    #[serde(rename = "pc")]
    Pc,
    #[default]
    #[serde(rename = "kpc")]
    Kpc,
    #[serde(rename = "Mpc")]
    Mpc,
}

impl DisplayUnit {
    /// Size of one unit in centimetres.
    pub fn in_cm(&self) -> f64 {
        match self {
            DisplayUnit::Cm => 1.0,
            DisplayUnit::M => 1.0e2,
            DisplayUnit::Km => 1.0e5,
            DisplayUnit::Au => 1.495_978_707e13,
            DisplayUnit::Pc => PC_IN_CM,
            DisplayUnit::Kpc => PC_IN_CM * 1.0e3,
            DisplayUnit::Mpc => PC_IN_CM * 1.0e6,
        }
    }

    /// Convert a length in centimetres into this unit.
    pub fn from_cm(&self, length_cm: f64) -> f64 {
        length_cm / self.in_cm()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Cm => "cm",
            DisplayUnit::M => "m",
            DisplayUnit::Km => "km",
            DisplayUnit::Au => "au",
            DisplayUnit::Pc => "pc",
            DisplayUnit::Kpc => "kpc",
            DisplayUnit::Mpc => "Mpc",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm" => Ok(DisplayUnit::Cm),
            "m" => Ok(DisplayUnit::M),
            "km" => Ok(DisplayUnit::Km),
            "au" | "AU" => Ok(DisplayUnit::Au),
            "pc" => Ok(DisplayUnit::Pc),
            "kpc" => Ok(DisplayUnit::Kpc),
            "Mpc" | "mpc" => Ok(DisplayUnit::Mpc),
            other => Err(format!("unsupported length unit '{}'", other)),
        }
    }
}
