use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Authentication required.")]
    Unauthenticated,

    #[error("User not found.")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Recommendation engine error: {0}")]
    Engine(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for the response body.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Database(_) | AppError::UpstreamUnavailable(_) | AppError::Cache(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE")
            }
            AppError::Engine(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_FAILURE"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(json!({
            "message": self.to_string(),
            "code": code,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure of a fresh recommendation computation.
///
/// Clonable so a single coalesced computation can deliver its failure to
/// every waiter, not just the caller that started it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// No profile record exists for the identity. Never cached, so a user
    /// provisioned moments later is served correctly on the next request.
    #[error("User not found.")]
    UserNotFound,

    #[error("Profile store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Recommendation engine failed: {0}")]
    EngineFailure(String),
}

impl From<ComputeError> for AppError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::UserNotFound => AppError::UserNotFound,
            ComputeError::UpstreamUnavailable(msg) => AppError::UpstreamUnavailable(msg),
            ComputeError::EngineFailure(msg) => AppError::Engine(msg),
        }
    }
}
