//! External test tree: scenario-level coverage that exercises the public
//! [`memsched_core::sim::Driver`] API end to end, complementing the
//! `#[cfg(test)]` unit tests that live alongside each module.

/// The six numbered scenarios and the tFAW/out-of-order properties that
/// need more than one module in isolation to observe.
pub mod scenarios;
/// Property-based and parameterized coverage of the invariants that must
/// hold across any well-formed trace.
pub mod invariants;
/// Driver behavior against real trace/command-log files on disk.
pub mod file_io;
