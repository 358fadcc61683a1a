//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use dataset::{Dataset, DatasetInfo};
use map_common::FieldRef;
use metrics_exporter_prometheus::PrometheusHandle;
use renderer::{ColormapConfig, ColormapRegistry};

use crate::config::ServerConfig;
use crate::metrics::MetricsCollector;
use crate::rendering::{RenderOptions, TileRenderer};

/// Shared application state, one per served dataset.
pub struct AppState {
    pub config: ServerConfig,
    /// Dataset metadata, readable without taking the dataset gate
    pub info: DatasetInfo,
    pub renderer: Arc<TileRenderer>,
    /// Field shown by the map page; changed by `/<field>` requests
    pub active_field: RwLock<FieldRef>,
    pub metrics: Arc<MetricsCollector>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: ServerConfig, dataset: Box<dyn Dataset>) -> Result<Self> {
        let mut colormaps = ColormapRegistry::builtin();
        if let Some(path) = &config.colormap_file {
            let custom = ColormapConfig::from_file(path)
                .with_context(|| format!("Failed to load colormaps from {}", path.display()))?;
            let added = colormaps.merge_config(&custom)?;
            info!(count = added, path = %path.display(), "Loaded custom colormaps");
        }
        colormaps
            .get(&config.default_colormap)
            .with_context(|| format!("Default colormap '{}' is not defined", config.default_colormap))?;

        let info = dataset.info().clone();
        if !dataset.has_field(&config.default_field) {
            warn!(field = %config.default_field, "Default field is not present in the dataset");
        }

        let metrics = Arc::new(MetricsCollector::new());
        let options = RenderOptions {
            tile_size: config.tile_size,
            max_zoom: config.max_zoom,
            memoize_bounds: config.memoize_bounds,
        };
        let renderer = Arc::new(TileRenderer::new(
            dataset,
            colormaps,
            options,
            metrics.clone(),
        ));

        Ok(Self {
            active_field: RwLock::new(config.default_field.clone()),
            config,
            info,
            renderer,
            metrics,
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub async fn active_field(&self) -> FieldRef {
        self.active_field.read().await.clone()
    }

    pub async fn set_active_field(&self, field: FieldRef) {
        let mut active = self.active_field.write().await;
        if *active != field {
            info!(from = %*active, to = %field, "Active field changed");
        }
        *active = field;
    }
}
