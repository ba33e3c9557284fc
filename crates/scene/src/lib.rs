//! Scene composition: state snapshots in, renderable frames out.

pub mod camera;
pub mod compositor;
pub mod lighting;
pub mod state;
pub mod visibility;

pub use compositor::*;
pub use state::*;
pub use visibility::*;
