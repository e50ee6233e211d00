use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rate limit exceeded. Try again in {}.", retry_hint(.retry_after_ms))]
    RateLimited { retry_after_ms: u64 },

    #[error("Unknown rate limiter: {0}")]
    UnknownLimiter(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Whole seconds rounded up, never below one
fn retry_hint(retry_after_ms: &u64) -> String {
    match retry_after_ms.div_ceil(1000).max(1) {
        1 => "1 second".to_string(),
        secs => format!("{secs} seconds"),
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::UnknownLimiter(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            AppError::UnknownLimiter(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref e) = self {
            tracing::error!("Internal error: {}", e);
        }

        let retry_after_ms = match self {
            AppError::RateLimited { retry_after_ms } => Some(retry_after_ms),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                retry_after_ms,
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_message_rounds_up() {
        let err = AppError::RateLimited { retry_after_ms: 1200 };
        assert_eq!(err.to_string(), "Rate limit exceeded. Try again in 2 seconds.");
        let err = AppError::RateLimited { retry_after_ms: 1000 };
        assert_eq!(err.to_string(), "Rate limit exceeded. Try again in 1 second.");
        let err = AppError::RateLimited { retry_after_ms: 300 };
        assert_eq!(err.to_string(), "Rate limit exceeded. Try again in 1 second.");
    }

    #[test]
    fn statuses_follow_the_variant() {
        assert_eq!(
            AppError::RateLimited { retry_after_ms: 1 }.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::UnknownLimiter("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
