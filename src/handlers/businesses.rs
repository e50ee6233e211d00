use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use crate::error::AppError;
use crate::geo::Coordinates;
use crate::metrics::{RANKING_LATENCY, RATE_LIMIT_DENIED, REQUEST_TOTAL};
use crate::models::{
    BusinessListResponse, DEFAULT_TOP_RATED_LIMIT, NearbyQuery, NearestQuery, NearestResponse,
    RankedBusiness, TopRatedQuery,
};
use crate::ranking::{
    DEFAULT_TOP_RATED_RADIUS_KM, NearestFilters, find_nearest, find_top_rated, rank_by_distance,
};
use crate::state::AppState;

pub const CLIENT_ID_HEADER: &str = "x-client-id";
const ANONYMOUS: &str = "anonymous";

pub fn client_id(headers: &HeaderMap) -> &str {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS)
}

// Counts the request and applies the general API limiter to the caller
fn admit(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    REQUEST_TOTAL.inc();

    let id = client_id(headers);
    let limiter = &state.limiters.api;
    if limiter.check(id) {
        return Ok(());
    }

    RATE_LIMIT_DENIED.with_label_values(&[limiter.name()]).inc();
    debug!(limiter = %limiter.name(), id, "Request throttled");
    Err(AppError::RateLimited {
        retry_after_ms: limiter.reset_time(id),
    })
}

fn reference(lat: f64, lng: f64) -> Result<Coordinates, AppError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest(format!(
            "coordinates out of range: lat={lat}, lng={lng}"
        )));
    }
    Ok(Coordinates::new(lat, lng))
}

pub async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, AppError> {
    admit(&state, &headers)?;
    let origin = reference(query.lat, query.lng)?;

    let start_time = Instant::now();
    let records = state.catalog.snapshot();
    let filters = NearestFilters {
        category: query.category,
        verified: query.verified,
        max_distance_km: query.max_distance_km,
    };
    let business = find_nearest(&records, origin, &filters).map(RankedBusiness::from);
    RANKING_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(NearestResponse { business }))
}

pub async fn top_rated_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TopRatedQuery>,
) -> Result<Json<BusinessListResponse>, AppError> {
    admit(&state, &headers)?;
    let origin = reference(query.lat, query.lng)?;

    let start_time = Instant::now();
    let records = state.catalog.snapshot();
    let businesses = find_top_rated(
        &records,
        origin,
        query.limit.unwrap_or(DEFAULT_TOP_RATED_LIMIT),
        query.radius_km.unwrap_or(DEFAULT_TOP_RATED_RADIUS_KM),
    )
    .into_iter()
    .map(RankedBusiness::from)
    .collect();
    RANKING_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(BusinessListResponse { businesses }))
}

pub async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<BusinessListResponse>, AppError> {
    admit(&state, &headers)?;
    let origin = reference(query.lat, query.lng)?;

    let start_time = Instant::now();
    let records = state.catalog.snapshot();
    let businesses = rank_by_distance(&records, origin, query.category.as_deref())
        .into_iter()
        .map(RankedBusiness::from)
        .collect();
    RANKING_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(BusinessListResponse { businesses }))
}
