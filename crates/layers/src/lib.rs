//! Scene layers derived from map data: terrain mesh, weather overlay,
//! telemetry text and the ground reference grid.

pub mod grid;
pub mod layer;
pub mod symbology;
pub mod telemetry;
pub mod terrain;
pub mod weather;

pub use layer::*;
