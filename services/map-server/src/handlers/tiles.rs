//! Tile endpoint: `/map/<field>/<L>/<x>/<y>.png`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::header,
    response::{IntoResponse, Response},
};
use map_common::{FieldRef, MapError, TileCoord};
use tracing::instrument;

use super::common::{parse_bool, parse_index, ApiError};
use crate::rendering::TileRequest;
use crate::state::AppState;

const TILE_SUFFIX: &str = ".png";

/// GET /map/:field/:z/:x/:tile
///
/// `tile` is `<y>.png`. Query `log` and `cmap` override the server defaults.
#[instrument(skip(state, params))]
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((field, z, x, tile)): Path<(String, String, String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    state.metrics.record_tile_request();

    let request = parse_tile_request(&state, &field, &z, &x, &tile, &params)?;
    let png = state.renderer.render_blocking(request).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

fn parse_tile_request(
    state: &AppState,
    field: &str,
    z: &str,
    x: &str,
    tile: &str,
    params: &HashMap<String, String>,
) -> Result<TileRequest, MapError> {
    let y = tile
        .strip_suffix(TILE_SUFFIX)
        .ok_or_else(|| MapError::AssetNotFound(format!("map/{}/{}/{}/{}", field, z, x, tile)))?;
    let coord = TileCoord::new(
        parse_index("L", z)?,
        parse_index("x", x)?,
        parse_index("y", y)?,
    );

    let field = FieldRef::parse(field);
    if field.is_empty() {
        return Err(MapError::invalid_parameter("field", "field name is empty"));
    }

    let take_log = match params.get("log") {
        Some(value) => parse_bool("log", value)?,
        None => state.config.take_log,
    };
    let colormap = params
        .get("cmap")
        .cloned()
        .unwrap_or_else(|| state.config.default_colormap.clone());

    Ok(TileRequest {
        field,
        coord,
        take_log,
        colormap,
    })
}
