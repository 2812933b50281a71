//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use techwiser_core::CoreError;
use techwiser_llm::LLMError;
use techwiser_repository::RepositoryError;
use tracing::error;

/// Server error type
#[derive(Debug)]
pub enum ServerError {
    /// Invalid request
    InvalidRequest(String),

    /// Missing or rejected credentials
    Unauthorized(String),

    /// Not found
    NotFound(String),

    /// Conflicts with existing state
    Conflict(String),

    /// Upstream rate limit or quota
    RateLimited(String),

    /// Upstream service failed or answered nonsense
    BadGateway(String),

    /// Internal server error
    InternalError(String),
}

impl ServerError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ServerError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    pub fn message(&self) -> &str {
        match self {
            ServerError::InvalidRequest(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::NotFound(msg)
            | ServerError::Conflict(msg)
            | ServerError::RateLimited(msg)
            | ServerError::BadGateway(msg)
            | ServerError::InternalError(msg) => msg,
        }
    }

    /// Log a storage failure and hide it behind `context`
    pub fn storage(context: &'static str) -> impl FnOnce(RepositoryError) -> ServerError {
        move |err| {
            error!("{}: {}", context, err);
            ServerError::InternalError(context.to_string())
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServerError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServerError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServerError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            ServerError::BadGateway(msg) => write!(f, "Upstream error: {}", msg),
            ServerError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.message(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<LLMError> for ServerError {
    fn from(err: LLMError) -> Self {
        let message = err.user_message();
        match err {
            LLMError::MissingApiKey { .. } | LLMError::InvalidApiKey { .. } => {
                ServerError::Unauthorized(message)
            }
            LLMError::RateLimited { .. } => ServerError::RateLimited(message),
            LLMError::ModelUnavailable { .. } => ServerError::NotFound(message),
            LLMError::InvalidConfiguration(_) => ServerError::InternalError(message),
            LLMError::InvalidResponse(_)
            | LLMError::SerializationError(_)
            | LLMError::ApiCallFailed(_)
            | LLMError::HttpError(_) => ServerError::BadGateway(message),
        }
    }
}

impl From<RepositoryError> for ServerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => ServerError::NotFound(err.to_string()),
            RepositoryError::InvalidConfig(msg) => ServerError::InternalError(msg),
            other => ServerError::InternalError(other.to_string()),
        }
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyBundle => {
                ServerError::InvalidRequest("Project has no files to export".to_string())
            }
            CoreError::UnsafePath(path) => {
                ServerError::InvalidRequest(format!("Unsafe file path: {}", path))
            }
            other => ServerError::InternalError(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::InternalError(err.to_string())
    }
}
