use serde::{Deserialize, Serialize};

/// Map center as reported by the view, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A sampled elevation. `x` is the longitude, `y` the latitude, `elevation`
/// in meters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationPoint {
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
}

impl ElevationPoint {
    pub fn new(x: f64, y: f64, elevation: f64) -> Self {
        Self { x, y, elevation }
    }
}
