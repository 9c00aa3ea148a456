//! Geodesic helpers for recorded routes.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`haversine_km`] | Great-circle distance between two points |
//! | [`route_length_km`] | Length of a flattened route |
//! | [`compute_bounds`] | Bounding box of a route, for fitting it into a view |
//!
//! All coordinates are WGS84 degrees. Distances use a spherical Earth of
//! radius [`EARTH_RADIUS_KM`].

use serde::{Deserialize, Serialize};

use crate::types::GpsPoint;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points.
///
/// NaN coordinates propagate to a NaN result.
///
/// ```rust
/// use stridelog::{GpsPoint, geo};
///
/// let a = GpsPoint::new(0.0, 0.0, 0);
/// let b = GpsPoint::new(0.0, 0.001, 5_000);
/// let km = geo::haversine_km(&a, &b);
/// assert!((km - 0.1112).abs() < 0.0001);
/// ```
#[inline]
pub fn haversine_km(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lng / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Sum of consecutive haversine distances along a route
pub fn route_length_km(route: &[GpsPoint]) -> f64 {
    route.windows(2).map(|w| haversine_km(&w[0], &w[1])).sum()
}

/// Latitude/longitude bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl RouteBounds {
    pub fn center(&self) -> (f64, f64) {
        ((self.min_lat + self.max_lat) / 2.0, (self.min_lng + self.max_lng) / 2.0)
    }

    pub fn contains(&self, point: &GpsPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

/// Bounding box of a route, `None` for an empty route
pub fn compute_bounds(route: &[GpsPoint]) -> Option<RouteBounds> {
    let first = route.first()?;
    let init = RouteBounds {
        min_lat: first.lat,
        max_lat: first.lat,
        min_lng: first.lng,
        max_lng: first.lng,
    };

    Some(route.iter().skip(1).fold(init, |b, p| RouteBounds {
        min_lat: b.min_lat.min(p.lat),
        max_lat: b.max_lat.max(p.lat),
        min_lng: b.min_lng.min(p.lng),
        max_lng: b.max_lng.max(p.lng),
    }))
}
