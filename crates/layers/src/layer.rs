use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

pub trait Layer {
    fn id(&self) -> LayerId;
    fn name(&self) -> &'static str;
}

/// Position and XYZ Euler rotation (radians) of a scene object.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Placement {
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    /// A plane authored in XY laid flat onto the ground (XZ).
    pub const fn ground(position: Vec3) -> Self {
        Self::new(position, Vec3::new(-std::f64::consts::FRAC_PI_2, 0.0, 0.0))
    }
}
