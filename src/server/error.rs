//! HTTP error types and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::StoreError;

/// Error returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No post under the requested slug.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body is not a valid post.
    #[error("unprocessable entity: {0}")]
    Unprocessable(#[from] serde_json::Error),

    /// Storage failed underneath the request.
    #[error(transparent)]
    Store(StoreError),

    /// The blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(slug) => ApiError::NotFound(slug),
            other => ApiError::Store(other),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(slug) => {
                tracing::debug!(slug = %slug, "post not found");
                (StatusCode::NOT_FOUND, "404 Page Not Found").into_response()
            }
            Self::Unprocessable(err) => {
                let body = ErrorResponse {
                    error: "unprocessable_entity".to_string(),
                    message: err.to_string(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            Self::Store(err) => {
                tracing::error!(error = %err, "storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error accessing storage.").into_response()
            }
            Self::Task(err) => {
                tracing::error!(error = %err, "storage task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error accessing storage.").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound("x".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_decoding_maps_to_500() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::from(StoreError::Decoding {
            slug: "x".to_string(),
            source,
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_failed_task_maps_to_500() {
        let join_err = tokio::task::spawn_blocking(|| panic!("storage task died"))
            .await
            .unwrap_err();
        let err = ApiError::from(join_err);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_json_maps_to_422() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ApiError::from(source);
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
