use std::num::NonZeroU32;

use foundation::extent::GeoExtent;
use foundation::point::ElevationPoint;
use serde::{Deserialize, Serialize};

/// Result of one sampling pass.
///
/// `width == height == resolution + 1` regardless of how many points came
/// back. Empty `points` is the "no data" value, not an error. A truncated or
/// short lattice leaves `points.len() < width * height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    pub points: Vec<ElevationPoint>,
    pub width: usize,
    pub height: usize,
    pub extent: GeoExtent,
}

impl ElevationGrid {
    pub fn empty(extent: GeoExtent, resolution: NonZeroU32) -> Self {
        let side = resolution.get() as usize + 1;
        Self {
            points: Vec::new(),
            width: side,
            height: side,
            extent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.width.checked_mul(self.height) == Some(self.points.len())
    }

    pub fn max_elevation(&self) -> Option<f64> {
        self.points.iter().map(|p| p.elevation).reduce(f64::max)
    }

    pub fn min_elevation(&self) -> Option<f64> {
        self.points.iter().map(|p| p.elevation).reduce(f64::min)
    }
}
