//! Text overlays: the terrain debug block, the map readout and the title.

use foundation::math::Vec3;
use foundation::point::GeoPoint;
use serde::Serialize;
use sources::grid::ElevationGrid;

use crate::symbology::Color;

/// Summary of the elevations in a grid.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TerrainStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

impl TerrainStats {
    /// `None` for a grid without points.
    pub fn from_grid(grid: &ElevationGrid) -> Option<Self> {
        let count = grid.points.len();
        let min = grid.min_elevation()?;
        let max = grid.max_elevation()?;
        let sum: f64 = grid.points.iter().map(|p| p.elevation).sum();
        Some(Self {
            min,
            max,
            avg: sum / count as f64,
            count,
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    TopLeft,
    TopRight,
}

/// A block of text placed in the 3D scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPanel {
    pub text: String,
    pub position: Vec3,
    pub font_size: f32,
    pub color: Color,
    pub anchor: TextAnchor,
}

pub fn terrain_debug_panel(stats: &TerrainStats) -> TextPanel {
    TextPanel {
        text: format!(
            "Terrain Debug:\nMin: {:.1}m\nMax: {:.1}m\nAvg: {:.1}m\nPoints: {}",
            stats.min, stats.max, stats.avg, stats.count
        ),
        position: Vec3::new(5.0, 6.0, 0.0),
        font_size: 0.4,
        color: Color::YELLOW,
        anchor: TextAnchor::TopLeft,
    }
}

pub fn map_readout_panel(zoom: Option<f64>, center: Option<GeoPoint>) -> TextPanel {
    let zoom = zoom.map_or_else(|| "N/A".to_string(), |z| format!("{z:.1}"));
    let (lat, lon) = match center {
        Some(c) => (format!("{:.3}", c.latitude), format!("{:.3}", c.longitude)),
        None => ("N/A".to_string(), "N/A".to_string()),
    };
    TextPanel {
        text: format!("Zoom: {zoom}\nLat: {lat}\nLon: {lon}"),
        position: Vec3::new(-8.0, 8.0, 0.0),
        font_size: 0.8,
        color: Color::WHITE,
        anchor: TextAnchor::TopLeft,
    }
}

/// Screen-space heading drawn over the 3D view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleBlock {
    pub title: String,
    pub subtitle: String,
    pub anchor: TextAnchor,
    /// Inset from the anchored corner, in pixels.
    pub inset_px: u32,
}

impl Default for TitleBlock {
    fn default() -> Self {
        Self {
            title: "Newfoundland Terrain".to_string(),
            subtitle: "Elevation + Weather Visualization".to_string(),
            anchor: TextAnchor::TopRight,
            inset_px: 16,
        }
    }
}
