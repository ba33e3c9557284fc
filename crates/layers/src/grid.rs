use foundation::math::Vec3;
use serde::Serialize;

use crate::symbology::Color;

/// Ground reference grid on the XZ plane, centred on the origin.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ReferenceGrid {
    pub size: f64,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

impl Default for ReferenceGrid {
    fn default() -> Self {
        Self {
            size: 30.0,
            divisions: 30,
            center_color: Color::rgb(0x33, 0x33, 0x33),
            line_color: Color::rgb(0x33, 0x33, 0x33),
        }
    }
}

impl ReferenceGrid {
    /// Line segments, X-parallel lines first.
    pub fn lines(&self) -> Vec<[Vec3; 2]> {
        let half = self.size / 2.0;
        let n = self.divisions.max(1);
        let step = self.size / n as f64;
        let mut lines = Vec::with_capacity(2 * (n as usize + 1));
        for i in 0..=n {
            let z = -half + i as f64 * step;
            lines.push([Vec3::new(-half, 0.0, z), Vec3::new(half, 0.0, z)]);
        }
        for i in 0..=n {
            let x = -half + i as f64 * step;
            lines.push([Vec3::new(x, 0.0, -half), Vec3::new(x, 0.0, half)]);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceGrid;
    use foundation::math::Vec3;

    #[test]
    fn default_grid_spans_thirty_units() {
        let lines = ReferenceGrid::default().lines();
        assert_eq!(lines.len(), 62);
        assert_eq!(lines[0], [Vec3::new(-15.0, 0.0, -15.0), Vec3::new(15.0, 0.0, -15.0)]);
        assert_eq!(lines[61], [Vec3::new(15.0, 0.0, -15.0), Vec3::new(15.0, 0.0, 15.0)]);
    }
}
