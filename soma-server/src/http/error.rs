//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store failures carry their underlying cause to the client so an outage
//! is diagnosable from the response alone.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use soma_core::ValidationError;

use crate::db::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad query parameter (400)
    InvalidParameter(ValidationError),

    /// Store failed after retries (500, logged)
    Store(StoreError),

    /// No such route (404)
    NotFound { path: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::InvalidParameter(e) => json!({
                "error": "invalid_parameter",
                "message": e.to_string()
            }),
            Self::Store(e) => {
                tracing::error!(transient = e.is_transient(), "Store error: {}", e);
                json!({
                    "error": "store_error",
                    "message": e.to_string()
                })
            }
            Self::NotFound { path } => json!({
                "error": "not_found",
                "message": format!("no route for '{}'", path)
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidParameter(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_parameter_is_400() {
        let err = ApiError::from("C".parse::<soma_core::Variant>().unwrap_err());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_parameter");
    }

    #[tokio::test]
    async fn store_error_is_500_with_cause() {
        let err = ApiError::from(StoreError::from(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "store_error");
        assert!(body["message"].as_str().unwrap().contains("pool timed out"));
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            path: "/api/nope".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
