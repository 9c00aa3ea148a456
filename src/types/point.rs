//! GPS fix types

use serde::{Deserialize, Serialize};

/// One recorded location fix
///
/// Immutable once recorded. Field names follow the stored activity shape
/// (`lat`, `lng`, `timestamp`, `altitude`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct GpsPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Capture time, epoch milliseconds
    pub timestamp: i64,
    /// Altitude in meters when the platform reports one
    pub altitude: Option<f64>,
}

impl GpsPoint {
    pub fn new(lat: f64, lng: f64, timestamp: i64) -> Self {
        Self { lat, lng, timestamp, altitude: None }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

/// A position as delivered by the platform location provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub altitude: Option<f64>,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self { latitude, longitude, timestamp, altitude: None }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

impl From<LocationFix> for GpsPoint {
    fn from(fix: LocationFix) -> Self {
        Self {
            lat: fix.latitude,
            lng: fix.longitude,
            timestamp: fix.timestamp,
            altitude: fix.altitude,
        }
    }
}

impl From<GpsPoint> for LocationFix {
    fn from(point: GpsPoint) -> Self {
        Self {
            latitude: point.lat,
            longitude: point.lng,
            timestamp: point.timestamp,
            altitude: point.altitude,
        }
    }
}
