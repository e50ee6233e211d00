use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;
use crate::state::AppState;

// health handler
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "businesses": state.catalog.len(),
        "limiters": state
            .limiters
            .all()
            .iter()
            .map(|l| serde_json::json!({
                "name": l.name(),
                "max_requests": l.max_requests(),
                "window_secs": l.window().as_secs(),
                "tracked": l.len(),
            }))
            .collect::<Vec<_>>(),
    }))
}
