use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use prereview_client::ClientError;
use prereview_core::error::CoreError;
use serde_json::json;

/// Message shown for any upstream failure. The caller renders it inline;
/// details stay in the logs.
pub const UPSTREAM_ERROR_MESSAGE: &str = "An error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ClientError`] for failures of
/// the upstream PREreview API. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `prereview_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The upstream API call failed or was cancelled.
    #[error(transparent)]
    Upstream(#[from] ClientError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- Upstream errors ---
            AppError::Upstream(err) => classify_client_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an upstream client error into an HTTP status, error code, and
/// message.
///
/// - Cancellation maps to 503; the caller went away or was superseded.
/// - Everything else maps to 502 with the generic message. No retry is
///   attempted and the upstream status is not forwarded.
fn classify_client_error(err: &ClientError) -> (StatusCode, &'static str, String) {
    match err {
        ClientError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "REQUEST_CANCELLED",
            "Request cancelled".to_string(),
        ),
        ClientError::Api { status, body } => {
            tracing::error!(upstream_status = status, body = %body, "Upstream API error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                UPSTREAM_ERROR_MESSAGE.to_string(),
            )
        }
        ClientError::Request(e) => {
            tracing::error!(error = %e, "Upstream request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                UPSTREAM_ERROR_MESSAGE.to_string(),
            )
        }
    }
}
