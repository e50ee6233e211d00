use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info};
use crate::error::AppError;
use crate::metrics::{RATE_LIMIT_DENIED, REQUEST_TOTAL};
use crate::models::{CheckRequest, CheckResponse, ResetTimeResponse};
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

fn limiter<'a>(state: &'a AppState, name: &str) -> Result<&'a RateLimiter, AppError> {
    state
        .limiters
        .by_name(name)
        .ok_or_else(|| AppError::UnknownLimiter(name.to_string()))
}

// POST /api/rate-limits/{limiter}/check
// A denial is a normal answer here, the caller decides what to show
pub async fn check_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(payload): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    REQUEST_TOTAL.inc();
    let limiter = limiter(&state, &name)?;

    if payload.id.trim().is_empty() {
        return Err(AppError::BadRequest("id must not be empty".to_string()));
    }

    let allowed = limiter.check(&payload.id);
    let retry_after_ms = if allowed {
        0
    } else {
        RATE_LIMIT_DENIED.with_label_values(&[limiter.name()]).inc();
        debug!(limiter = %limiter.name(), id = %payload.id, "Action throttled");
        limiter.reset_time(&payload.id)
    };

    Ok(Json(CheckResponse {
        limiter: limiter.name().to_string(),
        allowed,
        retry_after_ms,
    }))
}

// GET /api/rate-limits/{limiter}/entries/{id}
pub async fn reset_time_handler(
    State(state): State<Arc<AppState>>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<ResetTimeResponse>, AppError> {
    REQUEST_TOTAL.inc();
    let limiter = limiter(&state, &name)?;

    Ok(Json(ResetTimeResponse {
        limiter: limiter.name().to_string(),
        reset_in_ms: limiter.reset_time(&id),
        id,
    }))
}

// DELETE /api/rate-limits/{limiter}/entries/{id}
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path((name, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    REQUEST_TOTAL.inc();
    let limiter = limiter(&state, &name)?;

    limiter.reset(&id);
    info!(limiter = %limiter.name(), id = %id, "Rate limit reset by request");
    Ok(StatusCode::NO_CONTENT)
}
