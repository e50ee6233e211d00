use serde::{Deserialize, Serialize};
use crate::geo::format_distance;
use crate::ranking::Ranked;

pub const DEFAULT_TOP_RATED_LIMIT: usize = 10;

// GET /api/businesses/nearest
#[derive(Deserialize, Debug, Clone)]
pub struct NearestQuery {
    pub lat: f64,
    pub lng: f64,
    pub category: Option<String>,
    pub verified: Option<bool>,
    pub max_distance_km: Option<f64>,
}

// GET /api/businesses/top-rated
#[derive(Deserialize, Debug, Clone)]
pub struct TopRatedQuery {
    pub lat: f64,
    pub lng: f64,
    pub limit: Option<usize>,
    pub radius_km: Option<f64>,
}

// GET /api/businesses/nearby
#[derive(Deserialize, Debug, Clone)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub category: Option<String>,
}

// A ranked business as sent to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RankedBusiness {
    pub id: String,
    pub name: String,
    pub category: String,
    pub is_verified: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: Option<f64>, // null when the business has no coordinates
    pub distance_label: Option<String>,
}

impl From<Ranked<'_>> for RankedBusiness {
    fn from(ranked: Ranked<'_>) -> Self {
        let located = ranked.is_located();
        let b = ranked.business;
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            category: b.category.clone(),
            is_verified: b.is_verified,
            latitude: b.latitude,
            longitude: b.longitude,
            distance_km: located.then_some(ranked.distance_km),
            distance_label: located.then(|| format_distance(ranked.distance_km)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NearestResponse {
    pub business: Option<RankedBusiness>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BusinessListResponse {
    pub businesses: Vec<RankedBusiness>,
}

#[derive(Deserialize, Debug)]
pub struct CheckRequest {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CheckResponse {
    pub limiter: String,
    pub allowed: bool,
    pub retry_after_ms: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResetTimeResponse {
    pub limiter: String,
    pub id: String,
    pub reset_in_ms: u64,
}
