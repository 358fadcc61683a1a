//! Error responses shared by all handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use map_common::MapError;
use serde::Serialize;
use tracing::{error, warn};

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Build the HTTP response for a failed request.
///
/// Server-side failures are logged at error level with the full message;
/// client mistakes only at warn.
pub fn error_response(err: &MapError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(code = err.error_code(), error = %err, "Request failed");
    } else {
        warn!(code = err.error_code(), error = %err, "Rejected request");
    }
    let body = ErrorBody {
        error: err.error_code(),
        message: err.to_string(),
    };
    (status, Json(body)).into_response()
}

/// `MapError` as a handler return type.
#[derive(Debug)]
pub struct ApiError(pub MapError);

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(&self.0)
    }
}

/// Parse a boolean query value the way browsers and scripts tend to send it.
pub fn parse_bool(param: &str, value: &str) -> Result<bool, MapError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(MapError::invalid_parameter(
            param,
            format!("expected a boolean, got '{}'", value),
        )),
    }
}

/// Parse a non-negative integer path segment.
pub fn parse_index(param: &str, value: &str) -> Result<u32, MapError> {
    value.parse::<u32>().map_err(|_| {
        MapError::invalid_parameter(param, format!("expected a non-negative integer, got '{}'", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let resp = error_response(&MapError::UnknownField("x".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = error_response(&MapError::InvalidDomain("min 0".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = ApiError(MapError::invalid_parameter("z", "bad")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("log", "TRUE").unwrap());
        assert!(!parse_bool("log", "0").unwrap());
        assert!(parse_bool("log", "maybe").is_err());
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("x", "12").unwrap(), 12);
        assert!(matches!(
            parse_index("x", "-1"),
            Err(MapError::InvalidParameter { .. })
        ));
    }
}
