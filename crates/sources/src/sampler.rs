use std::num::NonZeroU32;

use foundation::extent::GeoExtent;
use foundation::point::ElevationPoint;
use tracing::{debug, warn};

use crate::elevation::ElevationService;
use crate::error::SourceError;
use crate::grid::ElevationGrid;
use crate::lattice::{DEFAULT_MAX_LOCATIONS, Lattice, LatticeLocation};
use crate::protocol::{ElevationRequest, ElevationValue};

/// Coordinate tolerance when matching echoed locations back to the request.
const LOCATION_EPSILON: f64 = 1e-9;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Hard cap on lattice locations per request.
    pub max_locations: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_locations: DEFAULT_MAX_LOCATIONS,
        }
    }
}

/// Samples an extent on a uniform lattice through an [`ElevationService`].
pub struct ElevationSampler<S> {
    service: S,
    config: SamplerConfig,
}

impl<S: ElevationService> ElevationSampler<S> {
    pub fn new(service: S) -> Self {
        Self::with_config(service, SamplerConfig::default())
    }

    pub fn with_config(service: S, config: SamplerConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> SamplerConfig {
        self.config
    }

    /// Samples `extent` at `resolution` cells per axis.
    ///
    /// Never fails: any transport or shape problem yields a grid with no
    /// points and the requested dimensions.
    pub async fn sample(&self, extent: &GeoExtent, resolution: NonZeroU32) -> ElevationGrid {
        let lattice = Lattice::build(extent, resolution, self.config.max_locations);
        if lattice.truncated {
            debug!(
                "lattice capped at {} of {} locations",
                lattice.locations.len(),
                lattice.full_len()
            );
        }

        match self.lookup(lattice).await {
            Ok(points) => ElevationGrid {
                points,
                width: resolution.get() as usize + 1,
                height: resolution.get() as usize + 1,
                extent: *extent,
            },
            Err(err) => {
                warn!("elevation lookup failed: {err}");
                ElevationGrid::empty(*extent, resolution)
            }
        }
    }

    async fn lookup(&self, lattice: Lattice) -> Result<Vec<ElevationPoint>, SourceError> {
        let request = ElevationRequest::new(lattice.locations);
        let response = self.service.lookup(&request).await?;
        let Some(values) = response.elevations else {
            return Err(SourceError::malformed("no elevations field in response"));
        };
        pair_elevations(&request.points, &values)
    }
}

/// Pairs returned samples with the request locations.
///
/// When every sample echoes its coordinate, pairing is by coordinate and the
/// output follows request order. Otherwise pairing is positional: a service
/// that reorders results without echoing coordinates mis-assigns
/// elevations, and nothing here can detect it.
///
/// A short response yields the leading paired locations only, so the result
/// always stays a prefix of the request.
pub fn pair_elevations(
    locations: &[LatticeLocation],
    values: &[ElevationValue],
) -> Result<Vec<ElevationPoint>, SourceError> {
    if values.len() > locations.len() {
        return Err(SourceError::malformed(format!(
            "{} elevations returned for {} locations",
            values.len(),
            locations.len()
        )));
    }

    let mut elevations = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        let e = v
            .elevation
            .ok_or_else(|| SourceError::malformed(format!("entry {i} has no elevation")))?;
        elevations.push(e);
    }

    let echoed = !values.is_empty() && values.iter().all(|v| v.echoed_location().is_some());
    if !echoed {
        return Ok(locations
            .iter()
            .zip(elevations)
            .map(|(l, e)| ElevationPoint::new(l.longitude, l.latitude, e))
            .collect());
    }

    let mut slots: Vec<Option<f64>> = vec![None; locations.len()];
    for (v, e) in values.iter().zip(elevations) {
        let Some(loc) = v.echoed_location() else {
            continue;
        };
        let idx = locations
            .iter()
            .enumerate()
            .position(|(i, l)| slots[i].is_none() && same_location(l, &loc))
            .ok_or_else(|| {
                SourceError::malformed(format!(
                    "echoed location ({}, {}) was not requested",
                    loc.latitude, loc.longitude
                ))
            })?;
        slots[idx] = Some(e);
    }

    Ok(locations
        .iter()
        .zip(slots)
        .map_while(|(l, s)| s.map(|e| ElevationPoint::new(l.longitude, l.latitude, e)))
        .collect())
}

fn same_location(a: &LatticeLocation, b: &LatticeLocation) -> bool {
    (a.latitude - b.latitude).abs() <= LOCATION_EPSILON
        && (a.longitude - b.longitude).abs() <= LOCATION_EPSILON
}

#[cfg(test)]
mod tests {
    use super::{ElevationSampler, SamplerConfig, pair_elevations};
    use crate::elevation::MemoryElevationService;
    use crate::error::SourceErrorKind;
    use crate::lattice::{Lattice, LatticeLocation};
    use crate::protocol::{ElevationResponse, ElevationValue};
    use foundation::extent::GeoExtent;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroU32;

    fn res(r: u32) -> NonZeroU32 {
        NonZeroU32::new(r).unwrap()
    }

    fn newfoundland() -> GeoExtent {
        GeoExtent::new(-59.5, 46.5, -52.5, 51.5)
    }

    fn height_at(lat: f64, lon: f64) -> f64 {
        (lat - 46.0) * 100.0 + (lon + 60.0)
    }

    #[tokio::test]
    async fn dimensions_follow_resolution_and_cap_holds() {
        let sampler = ElevationSampler::new(MemoryElevationService::from_fn(height_at));
        for r in [1u32, 2, 5, 8, 9, 10, 32, 64] {
            let grid = sampler.sample(&newfoundland(), res(r)).await;
            assert_eq!(grid.width, r as usize + 1);
            assert_eq!(grid.height, r as usize + 1);
            assert!(grid.points.len() <= 100);
            assert_eq!(grid.extent, newfoundland());
        }
    }

    #[tokio::test]
    async fn overflowing_lattice_is_a_strict_prefix() {
        let sampler = ElevationSampler::new(MemoryElevationService::from_fn(height_at));
        let grid = sampler.sample(&newfoundland(), res(32)).await;
        let full = Lattice::build(&newfoundland(), res(32), usize::MAX);

        assert_eq!(grid.points.len(), 100);
        for (p, l) in grid.points.iter().zip(&full.locations[..100]) {
            assert_eq!((p.x, p.y), (l.longitude, l.latitude));
            assert_eq!(p.elevation, height_at(l.latitude, l.longitude));
        }
        // 33 samples per column: the 100th point is the first of column 4.
        assert_eq!(grid.points[99].x, full.locations[99].longitude);
        assert_eq!(grid.points[99].y, newfoundland().ymin);
    }

    #[tokio::test]
    async fn configured_cap_is_honored() {
        let sampler = ElevationSampler::with_config(
            MemoryElevationService::from_fn(height_at),
            SamplerConfig { max_locations: 10 },
        );
        let grid = sampler.sample(&newfoundland(), res(4)).await;
        assert_eq!(grid.points.len(), 10);
        assert!(!grid.is_complete());
    }

    #[tokio::test]
    async fn transport_failure_yields_empty_grid_with_metadata() {
        let sampler = ElevationSampler::new(MemoryElevationService::failing(
            SourceErrorKind::Transport,
            "connection reset",
        ));
        let grid = sampler.sample(&newfoundland(), res(7)).await;
        assert!(grid.points.is_empty());
        assert_eq!((grid.width, grid.height), (8, 8));
        assert_eq!(grid.extent, newfoundland());
    }

    #[tokio::test]
    async fn missing_elevations_field_is_no_data() {
        let sampler =
            ElevationSampler::new(MemoryElevationService::responding(ElevationResponse::default()));
        let grid = sampler.sample(&newfoundland(), res(3)).await;
        assert!(grid.is_empty());
        assert_eq!(grid.width, 4);
    }

    #[tokio::test]
    async fn request_carries_every_lattice_point() {
        let sampler = ElevationSampler::new(MemoryElevationService::from_fn(height_at));
        let _ = sampler.sample(&newfoundland(), res(3)).await;
        let requests = sampler.service().requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].points.len(), 16);
        assert_eq!(requests[0].f, "json");
    }

    #[tokio::test]
    async fn missing_entry_elevation_is_no_data() {
        let mut values: Vec<ElevationValue> =
            (0..4).map(|i| ElevationValue::new(i as f64)).collect();
        values[2].elevation = None;
        let sampler = ElevationSampler::new(MemoryElevationService::responding(
            ElevationResponse { elevations: Some(values) },
        ));
        assert!(sampler.sample(&newfoundland(), res(1)).await.is_empty());
    }

    fn four_locations() -> Vec<LatticeLocation> {
        Lattice::build(&GeoExtent::new(0.0, 0.0, 1.0, 1.0), res(1), 100).locations
    }

    #[test]
    fn shuffled_echoed_response_pairs_by_coordinate() {
        let locs = four_locations();
        let mut values: Vec<ElevationValue> = locs
            .iter()
            .enumerate()
            .map(|(i, l)| ElevationValue::at(100.0 * i as f64, *l))
            .collect();
        values.reverse();
        values.swap(0, 2);

        let points = pair_elevations(&locs, &values).unwrap();
        let got: Vec<f64> = points.iter().map(|p| p.elevation).collect();
        assert_eq!(got, vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!((points[1].x, points[1].y), (locs[1].longitude, locs[1].latitude));
    }

    #[test]
    fn shuffled_positional_response_is_misassigned() {
        // Documents the gap: without echoed coordinates order is trusted.
        let locs = four_locations();
        let values: Vec<ElevationValue> =
            [300.0, 200.0, 100.0, 0.0].into_iter().map(ElevationValue::new).collect();
        let points = pair_elevations(&locs, &values).unwrap();
        let got: Vec<f64> = points.iter().map(|p| p.elevation).collect();
        assert_eq!(got, vec![300.0, 200.0, 100.0, 0.0]);
    }

    #[test]
    fn short_response_keeps_leading_points() {
        let locs = four_locations();
        let values = vec![ElevationValue::new(1.0), ElevationValue::new(2.0)];
        assert_eq!(pair_elevations(&locs, &values).unwrap().len(), 2);

        let echoed = vec![ElevationValue::at(5.0, locs[0]), ElevationValue::at(7.0, locs[2])];
        let points = pair_elevations(&locs, &echoed).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].elevation, 5.0);
    }

    #[test]
    fn oversized_or_unknown_responses_are_malformed() {
        let locs = four_locations();
        let too_many: Vec<ElevationValue> = (0..5).map(|i| ElevationValue::new(i as f64)).collect();
        let err = pair_elevations(&locs, &too_many).unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::Malformed);

        let stranger = vec![ElevationValue::at(
            1.0,
            LatticeLocation {
                latitude: 80.0,
                longitude: 80.0,
            },
        )];
        assert!(pair_elevations(&locs, &stranger).is_err());
    }
}
