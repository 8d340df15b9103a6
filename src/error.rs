//! API errors rendered as `{"message": ...}` JSON.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{dto::MessageResponse, service::ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("{0}")]
    BadRequest(String),

    /// Not found (404).
    #[error("{0}")]
    NotFound(&'static str),

    /// Too many requests (429).
    #[error("Too many requests, please try again later")]
    RateLimited,

    /// Internal server error (500). The payload is logged, not returned.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a service failure, logging store errors under `context`.
    pub fn from_service(err: ServiceError, context: &'static str) -> Self {
        match err {
            ServiceError::Validation(message) => Self::BadRequest(message.to_string()),
            ServiceError::Repository(e) => {
                tracing::error!("{context}: {e}");
                Self::Internal(context)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from_service(ServiceError::Validation("nope"), "Failed to create note");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn rate_limited_is_429() {
        assert_eq!(
            ApiError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
