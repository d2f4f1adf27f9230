//! "Near me" venue lookup.
//!
//! Distance is great-circle Haversine on a 3959-mile Earth radius. The store
//! computes it in SQL when it can (SQLite built with math functions); when
//! that query fails we fall back to pulling the active geocoded venues and
//! doing the same arithmetic here. Both paths order and cut off identically.
//! This is a convenience feature, so a dead store degrades to an empty list
//! rather than an error.

use db::models::venue::Venue;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::warn;
use ts_rs::TS;

const EARTH_RADIUS_MILES: f64 = 3959.0;

pub const DEFAULT_RADIUS_MILES: f64 = 25.0;
pub const DEFAULT_NEARBY_LIMIT: i64 = 50;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct VenueWithDistance {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub venue: Venue,
    pub distance_miles: f64,
}

/// Great-circle distance in miles between two lat/lng points, in degrees.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
}

pub struct GeoService;

impl GeoService {
    /// Venues within `radius_miles` of the center, closest first, capped at
    /// `limit`, each annotated with its distance.
    pub async fn nearby(
        pool: &SqlitePool,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        limit: i64,
    ) -> Vec<VenueWithDistance> {
        match Self::nearby_sql(pool, latitude, longitude, radius_miles, limit).await {
            Ok(venues) => venues,
            Err(e) => {
                warn!("server-side distance query failed, computing in app: {}", e);
                Self::nearby_fallback(pool, latitude, longitude, radius_miles, limit).await
            }
        }
    }

    async fn nearby_sql(
        pool: &SqlitePool,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        limit: i64,
    ) -> Result<Vec<VenueWithDistance>, sqlx::Error> {
        sqlx::query_as::<_, VenueWithDistance>(
            "SELECT * FROM (
                 SELECT venues.*,
                        2.0 * 3959.0 * asin(sqrt(
                            pow(sin(radians(latitude - $1) / 2.0), 2)
                            + cos(radians($1)) * cos(radians(latitude))
                              * pow(sin(radians(longitude - $2) / 2.0), 2)
                        )) AS distance_miles
                   FROM venues
                  WHERE is_active = 1
                    AND latitude IS NOT NULL AND longitude IS NOT NULL
             )
             WHERE distance_miles <= $3
             ORDER BY distance_miles ASC
             LIMIT $4",
        )
        .bind(latitude)
        .bind(longitude)
        .bind(radius_miles)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    async fn nearby_fallback(
        pool: &SqlitePool,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        limit: i64,
    ) -> Vec<VenueWithDistance> {
        let venues = match Venue::find_all_geocoded(pool).await {
            Ok(venues) => venues,
            Err(e) => {
                warn!("nearby venue fetch failed, returning no results: {}", e);
                return Vec::new();
            }
        };
        rank_by_distance(venues, latitude, longitude, radius_miles, limit)
    }
}

/// Application-side filter/sort/cutoff; must match the SQL path exactly.
fn rank_by_distance(
    venues: Vec<Venue>,
    latitude: f64,
    longitude: f64,
    radius_miles: f64,
    limit: i64,
) -> Vec<VenueWithDistance> {
    let mut ranked: Vec<VenueWithDistance> = venues
        .into_iter()
        .filter_map(|venue| {
            let (lat, lon) = (venue.latitude?, venue.longitude?);
            let distance_miles = haversine_miles(latitude, longitude, lat, lon);
            (distance_miles <= radius_miles).then_some(VenueWithDistance {
                venue,
                distance_miles,
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    ranked.truncate(limit.max(0) as usize);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        assert!(haversine_miles(30.2672, -97.7431, 30.2672, -97.7431).abs() < 1e-9);
    }

    #[test]
    fn austin_to_houston_is_about_146_miles() {
        let d = haversine_miles(30.2672, -97.7431, 29.7604, -95.3698);
        assert!((d - 146.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn austin_to_dallas_is_about_182_miles() {
        let d = haversine_miles(30.2672, -97.7431, 32.7767, -96.7970);
        assert!((d - 182.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn symmetric() {
        let forward = haversine_miles(30.0, -97.0, 29.0, -95.0);
        let back = haversine_miles(29.0, -95.0, 30.0, -97.0);
        assert!((forward - back).abs() < 1e-9);
    }
}
