pub mod extent;
pub mod math;
pub mod point;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use extent::*;
pub use math::*;
pub use point::*;
pub use time::*;
