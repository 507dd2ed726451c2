use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::constants::{ERR_INTERNAL, ERR_STORAGE_WRITE};

/// Failure taxonomy for all handlers.
///
/// `NotFound`, `Conflict`, `BadRequest` and `Unauthorized` carry messages
/// meant for the caller. `StorageUnavailable` and `Internal` are logged with
/// context and surface as generic server errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// A storage write reported failure; the triggering operation must not
    /// pretend success.
    #[error("storage unavailable for user {user_id} resource {resource}")]
    StorageUnavailable { user_id: i64, resource: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::StorageUnavailable { user_id, resource } => {
                tracing::error!(user_id, resource = %resource, "storage write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ERR_STORAGE_WRITE.to_string(),
                )
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "unhandled internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ERR_INTERNAL.to_string())
            }
        };

        (status, message).into_response()
    }
}
