pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod ranking;
pub mod rate_limit;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use handlers::{
    check_handler, health_handler, metrics_handler, nearby_handler, nearest_handler,
    reset_handler, reset_time_handler, top_rated_handler,
};
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/businesses/nearest", get(nearest_handler))
        .route("/api/businesses/top-rated", get(top_rated_handler))
        .route("/api/businesses/nearby", get(nearby_handler))
        .route("/api/rate-limits/{limiter}/check", post(check_handler))
        .route(
            "/api/rate-limits/{limiter}/entries/{id}",
            get(reset_time_handler).delete(reset_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Args;
    use crate::models::ResetTimeResponse;
    use crate::state::Limiters;
    use clap::Parser;

    async fn serve() -> String {
        let args = Args::parse_from(["gaboma-geo"]);
        let state = Arc::new(AppState {
            catalog: Arc::new(Catalog::new(Vec::new())),
            limiters: Limiters::from_args(&args),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn caller_named_check_can_read_its_reset_time() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let checked = client
            .post(format!("{base}/api/rate-limits/messages/check"))
            .json(&serde_json::json!({ "id": "check" }))
            .send()
            .await
            .unwrap();
        assert_eq!(checked.status(), reqwest::StatusCode::OK);

        let resp = client
            .get(format!("{base}/api/rate-limits/messages/entries/check"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: ResetTimeResponse = resp.json().await.unwrap();
        assert_eq!(body.id, "check");
        assert!(body.reset_in_ms > 0);

        let deleted = client
            .delete(format!("{base}/api/rate-limits/messages/entries/check"))
            .send()
            .await
            .unwrap();
        assert_eq!(deleted.status(), reqwest::StatusCode::NO_CONTENT);
    }
}
