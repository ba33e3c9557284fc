//! External data feeds for the scene: elevation sampling and weather.
//!
//! Both feeds degrade to "no data" instead of failing; transports report
//! `SourceError`, and the sampler/feed boundary turns those into empty
//! results plus a log line.

pub mod elevation;
pub mod error;
pub mod grid;
pub mod lattice;
pub mod protocol;
pub mod sampler;
pub mod weather;

pub use elevation::*;
pub use error::*;
pub use grid::*;
pub use lattice::*;
pub use sampler::*;
pub use weather::*;

use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
