use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Distance reported for a target without coordinates, always sorts last
pub const UNKNOWN_DISTANCE_KM: f64 = 999.0;

// A point in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

// Haversine central angle in radians
fn central_angle(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = to_radians(to.lat - from.lat);
    let d_lng = to_radians(to.lng - from.lng);

    let a = (d_lat / 2.0).sin().powi(2)
        + to_radians(from.lat).cos() * to_radians(to.lat).cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can leave `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

// Great-circle distance in km, or UNKNOWN_DISTANCE_KM when target is missing
pub fn distance_km(reference: Coordinates, target: Option<Coordinates>) -> f64 {
    match target {
        Some(target) => EARTH_RADIUS_KM * central_angle(reference, target),
        None => UNKNOWN_DISTANCE_KM,
    }
}

// Same as distance_km but in meters
pub fn distance_m(reference: Coordinates, target: Option<Coordinates>) -> f64 {
    match target {
        Some(target) => EARTH_RADIUS_M * central_angle(reference, target),
        None => UNKNOWN_DISTANCE_KM * 1000.0,
    }
}

// Human label: "850 m" below one kilometre, "1.2 km" above
pub fn format_distance(km: f64) -> String {
    let meters = (km * 1000.0).round();
    if meters < 1000.0 {
        format!("{} m", meters as i64)
    } else {
        format!("{:.1} km", km)
    }
}
