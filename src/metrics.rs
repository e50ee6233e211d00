use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, GaugeVec, Histogram, register_counter, register_counter_vec,
    register_gauge, register_gauge_vec, register_histogram,
};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("gaboma_requests_total", "Total number of requests").unwrap();
    pub static ref RANKING_LATENCY: Histogram = register_histogram!(
        "gaboma_ranking_latency_seconds",
        "Time spent ranking businesses in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_DENIED: CounterVec = register_counter_vec!(
        "gaboma_rate_limit_denied_total",
        "Requests denied by a rate limiter",
        &["limiter"]
    )
    .unwrap();
    pub static ref RATE_LIMIT_ENTRIES: GaugeVec = register_gauge_vec!(
        "gaboma_rate_limit_entries",
        "Identifiers currently tracked by a rate limiter",
        &["limiter"]
    )
    .unwrap();
    pub static ref RATE_LIMIT_SWEPT: CounterVec = register_counter_vec!(
        "gaboma_rate_limit_swept_total",
        "Expired rate limit entries removed by the sweeper",
        &["limiter"]
    )
    .unwrap();
    pub static ref CATALOG_SIZE: Gauge =
        register_gauge!("gaboma_catalog_size", "Businesses in the current catalog snapshot").unwrap();
}
