use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::geo::{Coordinates, distance_km};

pub const DEFAULT_TOP_RATED_RADIUS_KM: f64 = 5.0;

// Category value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

// The part of a business row the ranker cares about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessLocation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, alias = "isVerified")]
    pub is_verified: bool,
    #[serde(default)]
    pub category: String,
}

impl BusinessLocation {
    // Both coordinates present and finite, otherwise the business can't be located
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinates::new(lat, lng))
            }
            _ => None,
        }
    }
}

// A business paired with its distance from the reference point
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub business: &'a BusinessLocation,
    pub distance_km: f64,
}

impl Ranked<'_> {
    pub fn is_located(&self) -> bool {
        self.business.coordinates().is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearestFilters {
    pub category: Option<String>,
    pub verified: Option<bool>,
    pub max_distance_km: Option<f64>,
}

fn category_matches(business: &BusinessLocation, category: Option<&str>) -> bool {
    match category {
        None | Some(ALL_CATEGORIES) => true,
        Some(wanted) => business.category == wanted,
    }
}

// Closest business passing `filters`, or `None` when nothing qualifies.
//
// Unlocatable businesses never win. When two candidates are equally close
// the one seen first is kept.
pub fn find_nearest<'a>(
    records: &'a [BusinessLocation],
    reference: Coordinates,
    filters: &NearestFilters,
) -> Option<Ranked<'a>> {
    records
        .iter()
        .filter(|b| category_matches(b, filters.category.as_deref()))
        .filter(|b| filters.verified.is_none_or(|v| b.is_verified == v))
        .filter_map(|b| {
            let coords = b.coordinates()?;
            Some(Ranked {
                business: b,
                distance_km: distance_km(reference, Some(coords)),
            })
        })
        .filter(|r| filters.max_distance_km.is_none_or(|max| r.distance_km <= max))
        .fold(None, |best: Option<Ranked<'a>>, candidate| match best {
            Some(current) if current.distance_km <= candidate.distance_km => Some(current),
            _ => Some(candidate),
        })
}

// Verified first, then closest first
fn verified_then_closest(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    b.business
        .is_verified
        .cmp(&a.business.is_verified)
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
}

// Located businesses within `radius_km`, verified ones first and then by
// ascending distance, at most `limit` of them. Equal entries keep their
// input order.
pub fn find_top_rated<'a>(
    records: &'a [BusinessLocation],
    reference: Coordinates,
    limit: usize,
    radius_km: f64,
) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = records
        .iter()
        .filter_map(|b| {
            let coords = b.coordinates()?;
            Some(Ranked {
                business: b,
                distance_km: distance_km(reference, Some(coords)),
            })
        })
        .filter(|r| r.distance_km <= radius_km)
        .collect();

    ranked.sort_by(verified_then_closest);
    ranked.truncate(limit);
    ranked
}

// Every business (optionally of one category) ordered by distance.
// Businesses without coordinates stay in the listing, after all located ones.
pub fn rank_by_distance<'a>(
    records: &'a [BusinessLocation],
    reference: Coordinates,
    category: Option<&str>,
) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = records
        .iter()
        .filter(|b| category_matches(b, category))
        .map(|b| Ranked {
            business: b,
            distance_km: distance_km(reference, b.coordinates()),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.is_located()
            .cmp(&b.is_located())
            .reverse()
            .then_with(|| a.distance_km.total_cmp(&b.distance_km))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::UNKNOWN_DISTANCE_KM;

    const CENTER: Coordinates = Coordinates {
        lat: 0.4162,
        lng: 9.4673,
    };

    fn business(id: &str, lat: Option<f64>, verified: bool, category: &str) -> BusinessLocation {
        BusinessLocation {
            id: id.to_string(),
            name: format!("Commerce {id}"),
            latitude: lat,
            longitude: lat.map(|_| CENTER.lng),
            is_verified: verified,
            category: category.to_string(),
        }
    }

    // Business `km` kilometres north of the center
    fn north(id: &str, km: f64, verified: bool) -> BusinessLocation {
        business(id, Some(CENTER.lat + km / 111.195), verified, "restaurant")
    }

    fn ids(ranked: &[Ranked<'_>]) -> Vec<String> {
        ranked.iter().map(|r| r.business.id.clone()).collect()
    }

    #[test]
    fn nearest_of_nothing_is_none() {
        assert!(find_nearest(&[], CENTER, &NearestFilters::default()).is_none());
    }

    #[test]
    fn nearest_is_none_when_filters_reject_everything() {
        let records = vec![north("a", 1.0, false), north("b", 2.0, false)];
        let filters = NearestFilters {
            verified: Some(true),
            ..Default::default()
        };
        assert!(find_nearest(&records, CENTER, &filters).is_none());

        let filters = NearestFilters {
            category: Some("pharmacie".to_string()),
            ..Default::default()
        };
        assert!(find_nearest(&records, CENTER, &filters).is_none());
    }

    #[test]
    fn nearest_picks_closest_and_first_on_ties() {
        let records = vec![
            north("far", 3.0, false),
            north("close", 0.5, false),
            north("close-twin", 0.5, false),
        ];
        let found = find_nearest(&records, CENTER, &NearestFilters::default()).unwrap();
        assert_eq!(found.business.id, "close");
    }

    #[test]
    fn nearest_skips_unlocatable_businesses() {
        let records = vec![business("ghost", None, true, "restaurant")];
        assert!(find_nearest(&records, CENTER, &NearestFilters::default()).is_none());

        let records = vec![business("ghost", None, true, "restaurant"), north("real", 40.0, false)];
        let found = find_nearest(&records, CENTER, &NearestFilters::default()).unwrap();
        assert_eq!(found.business.id, "real");
    }

    #[test]
    fn nearest_is_not_displaced_by_an_antipodal_record() {
        let here = Coordinates::new(-87.843, -176.79);
        let records = vec![
            BusinessLocation {
                id: "here".to_string(),
                name: String::new(),
                latitude: Some(here.lat),
                longitude: Some(here.lng),
                is_verified: false,
                category: "restaurant".to_string(),
            },
            BusinessLocation {
                id: "antipode".to_string(),
                name: String::new(),
                latitude: Some(87.843),
                longitude: Some(3.21),
                is_verified: false,
                category: "restaurant".to_string(),
            },
        ];
        let found = find_nearest(&records, here, &NearestFilters::default()).unwrap();
        assert_eq!(found.business.id, "here");
        assert_eq!(found.distance_km, 0.0);
    }

    #[test]
    fn nearest_with_zero_radius_only_matches_exact_position() {
        let records = vec![north("near", 0.1, false)];
        let filters = NearestFilters {
            max_distance_km: Some(0.0),
            ..Default::default()
        };
        assert!(find_nearest(&records, CENTER, &filters).is_none());

        let records = vec![north("near", 0.1, false), north("here", 0.0, false)];
        let found = find_nearest(&records, CENTER, &filters).unwrap();
        assert_eq!(found.business.id, "here");
        assert_eq!(found.distance_km, 0.0);
    }

    #[test]
    fn nearest_respects_category_and_all() {
        let records = vec![
            business("resto", Some(CENTER.lat), false, "restaurant"),
            business("pharma", Some(CENTER.lat + 0.01), false, "pharmacie"),
        ];
        let pharma = NearestFilters {
            category: Some("pharmacie".to_string()),
            ..Default::default()
        };
        assert_eq!(find_nearest(&records, CENTER, &pharma).unwrap().business.id, "pharma");

        let all = NearestFilters {
            category: Some(ALL_CATEGORIES.to_string()),
            ..Default::default()
        };
        assert_eq!(find_nearest(&records, CENTER, &all).unwrap().business.id, "resto");
    }

    #[test]
    fn max_distance_is_inclusive() {
        let records = vec![north("edge", 2.0, false)];
        let exact = distance_km(CENTER, records[0].coordinates());
        let filters = NearestFilters {
            max_distance_km: Some(exact),
            ..Default::default()
        };
        assert!(find_nearest(&records, CENTER, &filters).is_some());
    }

    #[test]
    fn top_rated_never_returns_unlocatable() {
        let records = vec![
            business("ghost", None, true, "restaurant"),
            north("a", 1.0, false),
        ];
        let top = find_top_rated(&records, CENTER, 10, DEFAULT_TOP_RATED_RADIUS_KM);
        assert_eq!(ids(&top), vec!["a"]);
        assert!(top.iter().all(|r| r.is_located()));
    }

    #[test]
    fn top_rated_orders_verified_first_then_distance() {
        let records = vec![
            north("plain-near", 0.2, false),
            north("verified-far", 4.0, true),
            north("plain-far", 3.0, false),
            north("verified-near", 1.0, true),
            north("outside", 6.0, true),
        ];
        let top = find_top_rated(&records, CENTER, 10, DEFAULT_TOP_RATED_RADIUS_KM);
        assert_eq!(
            ids(&top),
            vec!["verified-near", "verified-far", "plain-near", "plain-far"]
        );

        for pair in top.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ok = (a.business.is_verified && !b.business.is_verified)
                || (a.business.is_verified == b.business.is_verified
                    && a.distance_km <= b.distance_km);
            assert!(ok);
        }
    }

    #[test]
    fn top_rated_is_stable_and_truncated() {
        let records = vec![
            north("first", 1.0, true),
            north("second", 1.0, true),
            north("third", 1.0, true),
        ];
        let top = find_top_rated(&records, CENTER, 2, DEFAULT_TOP_RATED_RADIUS_KM);
        assert_eq!(ids(&top), vec!["first", "second"]);
    }

    #[test]
    fn listing_keeps_unlocatable_businesses_last() {
        let records = vec![
            business("ghost", None, true, "restaurant"),
            north("b", 2.0, false),
            north("a", 1.0, false),
            business("other-ghost", None, false, "restaurant"),
        ];
        let listing = rank_by_distance(&records, CENTER, None);
        assert_eq!(ids(&listing), vec!["a", "b", "ghost", "other-ghost"]);
        assert_eq!(listing[2].distance_km, UNKNOWN_DISTANCE_KM);
    }

    #[test]
    fn business_rows_accept_camel_case_verification_flag() {
        let row: BusinessLocation = serde_json::from_str(
            r#"{"id":"x1","latitude":0.39,"longitude":9.45,"isVerified":true,"category":"boutique"}"#,
        )
        .unwrap();
        assert!(row.is_verified);
        assert_eq!(row.coordinates(), Some(Coordinates::new(0.39, 9.45)));

        let row: BusinessLocation =
            serde_json::from_str(r#"{"id":"x2","latitude":null,"is_verified":false}"#).unwrap();
        assert!(row.coordinates().is_none());
        assert_eq!(row.category, "");
    }
}
