//! Driver for the terrain scene: configuration, the map session bridge and
//! the command-line entry points behind the `terrascope` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;

pub use config::{ConfigError, ViewerConfig};
pub use error::ViewerError;
pub use session::{MapSession, SessionConfig, ViewEvent};
