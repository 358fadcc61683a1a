//! Tile rendering: resample, normalize, colorize, encode.

pub mod normalize;
pub mod resample;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use dataset::Dataset;
use map_common::{tile_bounds, Domain, FieldRef, MapError, MapResult, TileCoord};
use renderer::{apply_colormap, encode_png, ColormapRegistry};
use tracing::{debug, instrument};

use crate::gate::DatasetGate;
use crate::metrics::MetricsCollector;
use normalize::{color_bounds, BoundsCache, ColorBounds, PixelSizeHint};
use resample::{resample_tile, Grid};

/// One tile to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub field: FieldRef,
    pub coord: TileCoord,
    pub take_log: bool,
    pub colormap: String,
}

/// Static rendering parameters.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub tile_size: usize,
    pub max_zoom: u32,
    pub memoize_bounds: bool,
}

/// Renders PNG tiles of one dataset.
pub struct TileRenderer {
    gate: Arc<DatasetGate>,
    domain: Domain,
    colormaps: ColormapRegistry,
    options: RenderOptions,
    bounds_cache: Option<BoundsCache>,
    metrics: Arc<MetricsCollector>,
}

impl TileRenderer {
    pub fn new(
        dataset: Box<dyn Dataset>,
        colormaps: ColormapRegistry,
        options: RenderOptions,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        let domain = dataset.info().domain;
        Self {
            gate: Arc::new(DatasetGate::new(dataset)),
            domain,
            colormaps,
            options,
            bounds_cache: options.memoize_bounds.then(BoundsCache::new),
            metrics,
        }
    }

    /// Render a tile to PNG bytes. Blocks while another render holds the
    /// dataset.
    #[instrument(skip(self, request), fields(field = %request.field, tile = %request.coord.cache_key()))]
    pub fn render(&self, request: &TileRequest) -> MapResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.render_inner(request);
        let elapsed = start.elapsed();
        match &result {
            Ok(png) => {
                debug!(bytes = png.len(), elapsed_ms = elapsed.as_millis() as u64, "Rendered tile");
                self.metrics.record_render(elapsed);
            }
            Err(e) => self.metrics.record_render_error(e.error_code()),
        }
        result
    }

    fn render_inner(&self, request: &TileRequest) -> MapResult<Vec<u8>> {
        let coord = request.coord;
        coord.validate(self.options.max_zoom)?;
        let bbox = tile_bounds(&self.domain, &coord)?;
        let cmap = self
            .colormaps
            .get(&request.colormap)
            .map_err(|_| MapError::UnknownColormap(request.colormap.clone()))?;

        let size = self.options.tile_size;
        let hint = PixelSizeHint::for_tile(&self.domain, &coord);
        let (mut grid, bounds) = self.gate.with_exclusive(|ds| {
            if !ds.has_field(&request.field) {
                return Err(MapError::UnknownField(request.field.to_string()));
            }
            let grid = resample_tile(ds, &request.field, &bbox, size, size)?;
            let bounds = self.field_bounds(ds, &request.field, coord.z, hint)?;
            Ok((grid, bounds))
        })?;

        let bounds = if request.take_log {
            take_log10(&mut grid);
            bounds.log10()?
        } else {
            bounds
        };

        let rgba = apply_colormap(&grid.data, grid.width, grid.height, bounds.as_tuple(), cmap);
        let png = encode_png(&rgba, grid.width, grid.height)
            .map_err(|e| MapError::Internal(format!("PNG encoding failed: {}", e)))?;
        Ok(png)
    }

    fn field_bounds(
        &self,
        ds: &mut dyn Dataset,
        field: &FieldRef,
        z: u32,
        hint: PixelSizeHint,
    ) -> MapResult<ColorBounds> {
        if let Some(bounds) = self.bounds_cache.as_ref().and_then(|c| c.get(field, z)) {
            return Ok(bounds);
        }
        let samples = ds.samples(field)?;
        let bounds = color_bounds(&samples, &self.domain, hint)?;
        if let Some(cache) = &self.bounds_cache {
            cache.insert(field, z, bounds);
        }
        Ok(bounds)
    }

    /// Render on the blocking pool so waiting for the gate never stalls the
    /// async runtime.
    pub async fn render_blocking(self: &Arc<Self>, request: TileRequest) -> MapResult<Vec<u8>> {
        let renderer = Arc::clone(self);
        tokio::task::spawn_blocking(move || renderer.render(&request))
            .await
            .map_err(|e| MapError::ResourceFault(format!("render task failed: {}", e)))?
    }
}

/// Replace every value with its log10. Zero becomes -inf and negatives NaN,
/// both of which render transparent.
fn take_log10(grid: &mut Grid) {
    for v in grid.data.iter_mut() {
        *v = v.log10();
    }
}
