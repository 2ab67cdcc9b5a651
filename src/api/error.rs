//! HTTP error translation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors surfaced to API clients.
///
/// Database and cache failures arrive as `Internal` via the `color_eyre`
/// conversion; their detail is logged, not leaked.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Validation(String),

  #[error(transparent)]
  Internal(#[from] color_eyre::Report),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      Self::NotFound(message) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
      }
      Self::Validation(message) => (
        StatusCode::BAD_REQUEST,
        Json(json!({
          "error": "Validation Error",
          "message": message,
        })),
      )
        .into_response(),
      Self::Internal(report) => {
        error!("Internal error: {:?}", report);
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({
            "error": "Internal Server Error",
            "message": "An unexpected error occurred",
          })),
        )
          .into_response()
      }
    }
  }
}
