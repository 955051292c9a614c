//! The simulation harness: trace parsing, command emission, and the tick
//! loop that drives the [`crate::core`] scheduling engine (spec §4.8-§4.10).

pub mod driver;
pub mod emitter;
pub mod trace;

pub use driver::Driver;
pub use emitter::CommandLog;
pub use trace::Parser;
