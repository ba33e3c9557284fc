//! Assembles one renderable frame from a [`SceneState`] snapshot.
//!
//! Every optional node guards itself: missing data omits the node and never
//! fails the frame.

use std::sync::Arc;

use layers::grid::ReferenceGrid;
use layers::layer::{Layer, LayerId};
use layers::telemetry::{
    TerrainStats, TextPanel, TitleBlock, map_readout_panel, terrain_debug_panel,
};
use layers::terrain::{TerrainLayer, TerrainMesh};
use layers::weather::{WeatherLayer, WeatherOverlay};
use runtime::frame::Frame;
use serde::Serialize;

use crate::camera::{Camera, OrbitControls};
use crate::lighting::LightingRig;
use crate::state::SceneState;
use crate::visibility::LayerVisibility;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainNode {
    pub layer: LayerId,
    pub mesh: Arc<TerrainMesh>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherNode {
    pub layer: LayerId,
    pub overlay: WeatherOverlay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub frame_index: u64,
    pub elapsed_s: f64,
    pub lighting: LightingRig,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub grid: ReferenceGrid,
    pub title: TitleBlock,
    pub readout: TextPanel,
    pub terrain: Option<TerrainNode>,
    pub terrain_debug: Option<TextPanel>,
    pub weather: Option<WeatherNode>,
}

pub struct SceneCompositor {
    terrain: TerrainLayer,
    weather: WeatherLayer,
    pub lighting: LightingRig,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub grid: ReferenceGrid,
}

impl Default for SceneCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneCompositor {
    pub fn new() -> Self {
        Self {
            terrain: TerrainLayer::new(1),
            weather: WeatherLayer::new(2),
            lighting: LightingRig::default(),
            camera: Camera::default(),
            controls: OrbitControls::default(),
            grid: ReferenceGrid::default(),
        }
    }

    pub fn terrain_layer(&self) -> &TerrainLayer {
        &self.terrain
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.terrain.wireframe = wireframe;
    }

    pub fn compose(
        &mut self,
        frame: Frame,
        state: &SceneState,
        visibility: LayerVisibility,
    ) -> SceneFrame {
        let show_terrain = visibility.terrain && state.elevation.visible;
        let grid = state.elevation.populated().filter(|_| show_terrain);

        let terrain = show_terrain.then(|| TerrainNode {
            layer: self.terrain.id(),
            mesh: match grid {
                Some(g) => self.terrain.mesh(g),
                None => self.terrain.fallback(),
            },
        });
        let terrain_debug = grid
            .and_then(|g| TerrainStats::from_grid(g))
            .map(|stats| terrain_debug_panel(&stats));

        let weather = if visibility.weather {
            self.weather
                .overlay(&state.weather, frame.elapsed_s())
                .map(|overlay| WeatherNode {
                    layer: self.weather.id(),
                    overlay,
                })
        } else {
            None
        };

        SceneFrame {
            frame_index: frame.index,
            elapsed_s: frame.elapsed_s(),
            lighting: self.lighting,
            camera: self.controls.constrain(self.camera),
            controls: self.controls,
            grid: self.grid,
            title: TitleBlock::default(),
            readout: map_readout_panel(state.zoom, state.center),
            terrain,
            terrain_debug,
            weather,
        }
    }
}
