//! Server configuration.
//!
//! Values come from three layers, highest priority first: command-line flags
//! (or their `MAP_SERVER_*` environment variables), an optional YAML file,
//! and the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use map_common::{DisplayUnit, FieldRef, MAX_ZOOM};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Largest accepted tile edge in pixels.
pub const MAX_TILE_SIZE: usize = 4096;

/// Effective server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub listen: String,
    /// Path prefix every route is mounted under ("" or "/something")
    pub route_prefix: String,
    /// Directory holding `map_index.html` and the other static assets
    pub static_dir: PathBuf,
    /// Tile edge in pixels
    pub tile_size: usize,
    /// Field selected at start-up
    pub default_field: FieldRef,
    pub default_colormap: String,
    /// Render log10 of the field unless a request says otherwise
    pub take_log: bool,
    /// Unit the catalog reports the domain width in
    pub display_unit: DisplayUnit,
    /// Reuse color bounds per (field, zoom) instead of recomputing them
    pub memoize_bounds: bool,
    pub max_zoom: u32,
    /// JSON file with additional colormaps
    pub colormap_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            route_prefix: String::new(),
            static_dir: PathBuf::from("static"),
            tile_size: 256,
            default_field: FieldRef::simple("density"),
            default_colormap: "algae".to_string(),
            take_log: true,
            display_unit: DisplayUnit::Kpc,
            memoize_bounds: false,
            max_zoom: 30,
            colormap_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ServerConfig =
            serde_yaml::from_str(yaml).context("Failed to parse server config YAML")?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), "Loaded server config");
        Ok(config)
    }

    /// Check value ranges and normalize the route prefix.
    pub fn validate(mut self) -> Result<Self> {
        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            bail!(
                "tile_size must be between 1 and {}, got {}",
                MAX_TILE_SIZE,
                self.tile_size
            );
        }
        if self.max_zoom > MAX_ZOOM {
            bail!("max_zoom must be at most {}, got {}", MAX_ZOOM, self.max_zoom);
        }
        if self.default_field.is_empty() {
            bail!("default_field must not be empty");
        }
        self.route_prefix = normalize_prefix(&self.route_prefix);
        Ok(self)
    }
}

/// `"map/"` -> `"/map"`, `"/"` -> `""`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Command-line interface of the `map-server` binary.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "map-server")]
#[command(about = "Tile server for 2D scalar fields sampled on cells")]
pub struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "MAP_SERVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON dataset file
    #[arg(long, env = "MAP_SERVER_DATASET", conflicts_with = "synthetic")]
    pub dataset: Option<PathBuf>,

    /// Serve a synthetic dataset refined this many levels
    #[arg(long, env = "MAP_SERVER_SYNTHETIC")]
    pub synthetic: Option<u32>,

    /// Listen address
    #[arg(short, long, env = "MAP_SERVER_LISTEN")]
    pub listen: Option<String>,

    #[arg(long, env = "MAP_SERVER_ROUTE_PREFIX")]
    pub route_prefix: Option<String>,

    #[arg(long, env = "MAP_SERVER_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Tile edge in pixels
    #[arg(long, env = "MAP_SERVER_TILE_SIZE")]
    pub tile_size: Option<usize>,

    /// Initial field, "name" or "type,name"
    #[arg(long, env = "MAP_SERVER_FIELD")]
    pub field: Option<String>,

    #[arg(long, env = "MAP_SERVER_COLORMAP")]
    pub colormap: Option<String>,

    /// Render log10 of field values
    #[arg(long, env = "MAP_SERVER_TAKE_LOG")]
    pub take_log: Option<bool>,

    /// Unit for the reported domain width (cm, m, km, au, pc, kpc, Mpc)
    #[arg(long, env = "MAP_SERVER_DISPLAY_UNIT")]
    pub display_unit: Option<DisplayUnit>,

    /// Reuse color bounds per field and zoom level
    #[arg(long, env = "MAP_SERVER_MEMOIZE_BOUNDS")]
    pub memoize_bounds: bool,

    #[arg(long, env = "MAP_SERVER_MAX_ZOOM")]
    pub max_zoom: Option<u32>,

    /// JSON file with additional colormaps
    #[arg(long, env = "MAP_SERVER_COLORMAP_FILE")]
    pub colormap_file: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "MAP_SERVER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long)]
    pub worker_threads: Option<usize>,
}

impl Args {
    /// Merge the config file (if any) with the flags given on the command line.
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(prefix) = &self.route_prefix {
            config.route_prefix = prefix.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = dir.clone();
        }
        if let Some(size) = self.tile_size {
            config.tile_size = size;
        }
        if let Some(field) = &self.field {
            config.default_field = FieldRef::parse(field);
        }
        if let Some(cmap) = &self.colormap {
            config.default_colormap = cmap.clone();
        }
        if let Some(take_log) = self.take_log {
            config.take_log = take_log;
        }
        if let Some(unit) = self.display_unit {
            config.display_unit = unit;
        }
        if self.memoize_bounds {
            config.memoize_bounds = true;
        }
        if let Some(max_zoom) = self.max_zoom {
            config.max_zoom = max_zoom;
        }
        if let Some(file) = &self.colormap_file {
            config.colormap_file = Some(file.clone());
        }

        config.validate()
    }
}
