use prometheus::{Encoder, TextEncoder};
use crate::error::AppError;

pub async fn metrics_handler() -> Result<String, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::REQUEST_TOTAL;

    #[tokio::test]
    async fn exposes_registered_metrics() {
        REQUEST_TOTAL.inc();
        let body = metrics_handler().await.unwrap();
        assert!(body.contains("gaboma_requests_total"));
    }
}
