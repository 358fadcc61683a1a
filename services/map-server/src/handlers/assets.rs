//! Static files from the configured asset directory.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, Uri},
    response::{IntoResponse, Response},
};
use map_common::{MapError, MapResult};
use tracing::debug;

use super::common::ApiError;
use crate::state::AppState;

/// Page served for `/`, `/<field>` and `/index.html`.
pub const INDEX_FILE: &str = "map_index.html";

/// Content type for the extensions the map page uses.
///
/// Anything else is served as `application/octet-stream`.
pub fn content_type_for(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "jpg" => Some("image/jpg"),
        "css" => Some("text/css"),
        "js" => Some("text/javascript"),
        "html" => Some("text/html; charset=utf-8"),
        _ => None,
    }
}

/// Resolve `relative` inside `root`, refusing anything that could escape it.
pub fn resolve_asset_path(root: &Path, relative: &str) -> MapResult<PathBuf> {
    let not_found = || MapError::AssetNotFound(relative.to_string());
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return Err(not_found());
    }
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return Err(not_found()),
        }
    }
    Ok(path)
}

/// Read an asset and wrap it in a response with the right content type.
pub async fn serve_asset(root: &Path, relative: &str) -> MapResult<Response> {
    let path = resolve_asset_path(root, relative)?;
    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MapError::AssetNotFound(relative.to_string()))
        }
        Err(e) if path.is_dir() => {
            debug!(path = %path.display(), error = %e, "Asset path is a directory");
            return Err(MapError::AssetNotFound(relative.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let content_type = content_type_for(relative).unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Fallback for every path no other route claims.
///
/// The route prefix is stripped when present; static paths are also served
/// without it.
pub async fn static_handler(
    Extension(state): Extension<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ApiError> {
    state.metrics.record_asset_request();
    let path = uri.path();
    let prefix = state.config.route_prefix.as_str();
    let relative = match path.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && rest.starts_with('/') => rest,
        _ => path,
    };
    Ok(serve_asset(&state.config.static_dir, relative).await?)
}
