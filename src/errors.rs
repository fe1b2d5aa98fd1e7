use std::fmt::Debug;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Failure taxonomy shared by the repositories and services. The HTTP
/// layer owns the mapping to status codes via [`IntoResponse`].
#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    Validation(String),
    #[error("subscription not found")]
    NotFound,
    #[error("Failed to execute a query against the subscription store")]
    Storage(#[from] sqlx::Error),
}

impl Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            SubscriptionError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            SubscriptionError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            SubscriptionError::Storage(_) => {
                tracing::error!("{:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
