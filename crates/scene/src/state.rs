use std::sync::Arc;

use foundation::extent::GeoExtent;
use foundation::point::GeoPoint;
use layers::weather::WeatherState;
use serde::Serialize;
use sources::grid::ElevationGrid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationState {
    pub visible: bool,
    pub data: Option<Arc<ElevationGrid>>,
    /// True while the latest issued fetch is outstanding.
    pub loading: bool,
}

impl Default for ElevationState {
    fn default() -> Self {
        Self {
            visible: true,
            data: None,
            loading: false,
        }
    }
}

impl ElevationState {
    /// The grid, when visible and holding at least one point.
    pub fn populated(&self) -> Option<&Arc<ElevationGrid>> {
        self.data.as_ref().filter(|g| self.visible && !g.is_empty())
    }
}

/// Immutable view of the map handed to the scene each time it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SceneState {
    pub center: Option<GeoPoint>,
    pub zoom: Option<f64>,
    pub extent: Option<GeoExtent>,
    pub elevation: ElevationState,
    pub weather: WeatherState,
}

/// Compact, log-friendly digest of a [`SceneState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub center: Option<GeoPoint>,
    pub zoom: Option<f64>,
    pub extent: Option<GeoExtent>,
    pub loading: bool,
    pub points: usize,
    pub max_elevation: Option<f64>,
    pub weather: WeatherState,
}

impl SceneState {
    pub fn summary(&self) -> SceneSummary {
        let grid = self.elevation.data.as_deref();
        SceneSummary {
            center: self.center,
            zoom: self.zoom,
            extent: self.extent,
            loading: self.elevation.loading,
            points: grid.map_or(0, |g| g.points.len()),
            max_elevation: grid.and_then(ElevationGrid::max_elevation),
            weather: self.weather,
        }
    }
}
