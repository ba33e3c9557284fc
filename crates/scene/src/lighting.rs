use foundation::math::Vec3;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct AmbientLight {
    pub intensity: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub intensity: f32,
    pub cast_shadow: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LightingRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight { intensity: 0.4 },
            directional: DirectionalLight {
                position: Vec3::new(10.0, 10.0, 5.0),
                intensity: 1.0,
                cast_shadow: true,
            },
            point: PointLight {
                position: Vec3::new(-10.0, 10.0, -10.0),
                intensity: 0.3,
            },
        }
    }
}
