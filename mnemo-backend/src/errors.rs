//! API error taxonomy and its HTTP mapping.
//!
//! Every failure surfaced to a client goes through [`ApiError`], which
//! serializes as `{"message": ...}`. Internal causes are logged where they
//! occur and never leak into the response body.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or empty required fields
    #[error("{0}")]
    Validation(String),

    /// Duplicate resource (email already registered)
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or bad/expired token
    #[error("{0}")]
    Auth(String),

    /// Missing resource, or a resource the caller does not own
    #[error("{0}")]
    NotFound(String),

    /// Anything else; carries only a generic per-operation message
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Log the real cause and surface `context` as the generic message.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        log::error!("{}: {}", context, err);
        ApiError::Internal(context.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string()
        }))
    }
}
