//! Wire shapes for the two external endpoints.
//!
//! Elevation request:  `{"points": [{"latitude", "longitude"}, ...], "f": "json"}`
//! Elevation response: `{"elevations": [{"elevation": number}, ...]}`
//! Weather response:   `{"features": [{"properties": {"MEAN_TEMPERATURE", ...}}]}`

use serde::{Deserialize, Serialize};

use crate::lattice::LatticeLocation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationRequest {
    pub points: Vec<LatticeLocation>,
    pub f: String,
}

impl ElevationRequest {
    pub fn new(points: Vec<LatticeLocation>) -> Self {
        Self {
            points,
            f: "json".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationResponse {
    #[serde(default)]
    pub elevations: Option<Vec<ElevationValue>>,
}

impl ElevationResponse {
    pub fn from_elevations(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            elevations: Some(values.into_iter().map(ElevationValue::new).collect()),
        }
    }
}

/// One returned sample. Services that echo the queried coordinate fill in
/// `latitude`/`longitude`, which lets the sampler pair results without
/// relying on response order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationValue {
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ElevationValue {
    pub fn new(elevation: f64) -> Self {
        Self {
            elevation: Some(elevation),
            latitude: None,
            longitude: None,
        }
    }

    pub fn at(elevation: f64, location: LatticeLocation) -> Self {
        Self {
            elevation: Some(elevation),
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
        }
    }

    pub fn echoed_location(&self) -> Option<LatticeLocation> {
        Some(LatticeLocation {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// Daily climate observation (first feature of the collection).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateObservation {
    #[serde(rename = "MEAN_TEMPERATURE", default)]
    pub mean_temperature: Option<f64>,
    #[serde(rename = "TOTAL_PRECIPITATION", default)]
    pub total_precipitation: Option<f64>,
    #[serde(rename = "STATION_NAME", default)]
    pub station_name: Option<String>,
    #[serde(rename = "LOCAL_DATE", default)]
    pub local_date: Option<String>,
}
