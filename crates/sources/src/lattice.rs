use std::num::NonZeroU32;

use foundation::extent::GeoExtent;
use serde::{Deserialize, Serialize};

/// Upper bound on locations per batched lookup imposed by the elevation service.
pub const DEFAULT_MAX_LOCATIONS: usize = 100;

/// One lattice sample location, in the request's wire shape.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Uniform sampling of an extent.
///
/// `locations` enumerates the x axis in the outer loop and the y axis in the
/// inner loop. When the full lattice exceeds the location cap the
/// enumeration stops early, so `locations` is a strict prefix of the full
/// enumeration and `truncated` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    pub locations: Vec<LatticeLocation>,
    /// Samples per axis (`resolution + 1`).
    pub side: usize,
    pub truncated: bool,
}

impl Lattice {
    pub fn build(extent: &GeoExtent, resolution: NonZeroU32, max_locations: usize) -> Self {
        let r = resolution.get();
        let side = r as usize + 1;
        let step_x = extent.width() / r as f64;
        let step_y = extent.height() / r as f64;

        let full = side.saturating_mul(side);
        let mut locations = Vec::with_capacity(full.min(max_locations));
        'outer: for i in 0..=r {
            for j in 0..=r {
                if locations.len() >= max_locations {
                    break 'outer;
                }
                locations.push(LatticeLocation {
                    latitude: extent.ymin + j as f64 * step_y,
                    longitude: extent.xmin + i as f64 * step_x,
                });
            }
        }

        Self {
            truncated: locations.len() < full,
            locations,
            side,
        }
    }

    /// Saturates instead of overflowing for huge resolutions.
    pub fn full_len(&self) -> usize {
        self.side.saturating_mul(self.side)
    }
}
