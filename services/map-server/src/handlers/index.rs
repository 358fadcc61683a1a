//! Map page and field catalog endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use map_common::FieldRef;
use tracing::instrument;

use super::assets::{serve_asset, INDEX_FILE};
use super::common::ApiError;
use crate::catalog::list_fields;
use crate::state::AppState;

/// GET / and /index.html
pub async fn index_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    state.metrics.record_index_request();
    Ok(serve_asset(&state.config.static_dir, INDEX_FILE).await?)
}

/// GET /:field
///
/// A segment with a `.` names a static asset; anything else selects the
/// active field and serves the map page.
#[instrument(skip(state))]
pub async fn field_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(segment): Path<String>,
) -> Result<Response, ApiError> {
    if segment.contains('.') {
        state.metrics.record_asset_request();
        return Ok(serve_asset(&state.config.static_dir, &segment).await?);
    }

    state.set_active_field(FieldRef::parse(&segment)).await;
    index_handler(Extension(state)).await
}

/// GET /list
pub async fn list_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.record_list_request();
    let active = state.active_field().await;
    Json(list_fields(&state.info, &active, state.config.display_unit))
}
