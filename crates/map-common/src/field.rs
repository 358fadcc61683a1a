//! Field identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between category and name in a compound field path segment.
pub const FIELD_SEPARATOR: char = ',';

/// A reference to a scalar quantity of a dataset.
///
/// Serializes as a plain string for simple fields and as a two-element
/// array `[category, name]` for compound fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Simple(String),
    Compound(String, String),
}

impl FieldRef {
    /// Parse a request path segment. `"deposit,PartType0_cic"` becomes a
    /// compound reference; anything without a separator is simple.
    pub fn parse(segment: &str) -> Self {
        match segment.split_once(FIELD_SEPARATOR) {
            Some((category, name)) => {
                FieldRef::Compound(category.trim().to_string(), name.trim().to_string())
            }
            None => FieldRef::Simple(segment.trim().to_string()),
        }
    }

    pub fn compound(category: impl Into<String>, name: impl Into<String>) -> Self {
        FieldRef::Compound(category.into(), name.into())
    }

    pub fn simple(name: impl Into<String>) -> Self {
        FieldRef::Simple(name.into())
    }

    /// Field name without category.
    pub fn name(&self) -> &str {
        match self {
            FieldRef::Simple(name) => name,
            FieldRef::Compound(_, name) => name,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            FieldRef::Simple(_) => None,
            FieldRef::Compound(category, _) => Some(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name().is_empty()
    }

    /// Whether this reference selects `other`. A simple reference selects any
    /// field with the same name; a compound one only its exact counterpart.
    pub fn selects(&self, other: &FieldRef) -> bool {
        match (self, other) {
            (FieldRef::Simple(a), _) => a == other.name(),
            (FieldRef::Compound(..), _) => self == other,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Simple(name) => f.write_str(name),
            FieldRef::Compound(category, name) => {
                write!(f, "{}{}{}", category, FIELD_SEPARATOR, name)
            }
        }
    }
}

impl From<&str> for FieldRef {
    fn from(s: &str) -> Self {
        FieldRef::parse(s)
    }
}
