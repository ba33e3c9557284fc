use std::f64::consts::FRAC_PI_2;

use foundation::math::Vec3;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view, degrees.
    pub fov_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(15.0, 15.0, 15.0),
            target: Vec3::ZERO,
            fov_deg: 60.0,
        }
    }
}

/// Orbit control limits. The polar angle is measured from +Y.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct OrbitControls {
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    pub min_distance: f64,
    pub max_distance: f64,
    pub max_polar_angle: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_pan: true,
            enable_zoom: true,
            enable_rotate: true,
            min_distance: 5.0,
            max_distance: 50.0,
            max_polar_angle: FRAC_PI_2,
        }
    }
}

impl OrbitControls {
    /// Moves `camera` onto the nearest allowed orbit position around its
    /// target: distance within `[min, max]`, never below the horizon.
    pub fn constrain(&self, camera: Camera) -> Camera {
        let offset = camera.position - camera.target;
        let distance = offset.length().clamp(self.min_distance, self.max_distance);
        let dir = offset.try_normalize().unwrap_or(Vec3::new(0.0, 1.0, 0.0));

        let polar = dir.y.clamp(-1.0, 1.0).acos().min(self.max_polar_angle);
        let azimuth = dir.z.atan2(dir.x);
        let horizontal = polar.sin();
        let dir = Vec3::new(
            horizontal * azimuth.cos(),
            polar.cos(),
            horizontal * azimuth.sin(),
        );

        Camera {
            position: camera.target + dir * distance,
            ..camera
        }
    }
}
