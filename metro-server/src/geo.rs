//! Geographic coordinates and great-circle distance.

use serde::Serialize;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate, in kilometers,
    /// using the haversine formula.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let dist_lat = f64::to_radians(other.latitude - self.latitude);
        let dist_lon = f64::to_radians(other.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(other.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        EARTH_RADIUS_KM * c
    }
}

/// Minutes needed to walk `distance_km` at `speed_kmh`.
pub fn walking_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    (distance_km / speed_kmh) * 60.0
}
