//! The DDR5 scheduling core: address decoding, per-bank/per-chip state,
//! the request state machine, the bounded service queue, and the four
//! scheduling policies that drive it.
//!
//! This module has no I/O of its own — [`sink::CommandSink`] is the one
//! seam it exposes outward, implemented by [`crate::sim::emitter::CommandLog`].

pub mod bank;
pub mod chip;
pub mod command;
pub mod decode;
pub mod dimm;
pub mod policy;
pub mod queue;
pub mod request;
pub mod sink;
pub mod timing;

pub use bank::{BankState, Operation};
pub use chip::Chip;
pub use command::Command;
pub use decode::{decode as decode_address, DecodedAddress};
pub use dimm::{Dimm, Flavor};
pub use policy::SchedulingPolicy;
pub use queue::RequestQueue;
pub use request::{Request, RequestState};
pub use sink::CommandSink;
