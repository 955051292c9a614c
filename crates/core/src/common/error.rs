//! Error taxonomy for the simulator.
//!
//! This module defines [`SimError`], the single error type threaded through
//! the crate. It covers:
//! 1. **Configuration errors:** bad CLI arguments, unopenable files.
//! 2. **Invariant violations:** conditions that must never occur under
//!    correct inputs (queue overflow/underflow, unknown state). These are
//!    assertions expressed as results instead of panics so the driver can
//!    map them to a specific process exit code and tests can assert on them.
//! 3. **Trace parse errors:** malformed input lines.

/// Errors produced by the simulator core.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Underlying I/O failure opening or writing a trace/command-log file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A trace line could not be parsed.
    #[error("malformed trace line {line}: {reason}")]
    TraceParse {
        /// 1-based line number in the input file.
        line: usize,
        /// Human-readable reason the line was rejected.
        reason: String,
    },

    /// A scheduling level outside `0..=3` was requested.
    #[error("invalid scheduling level: {0} (must be 0..=3)")]
    InvalidSchedulingLevel(u8),

    /// Admission was attempted against a full queue.
    #[error("queue overflow: attempted to admit into a full queue (capacity {capacity})")]
    QueueOverflow {
        /// The queue's fixed capacity.
        capacity: usize,
    },

    /// A dequeue/peek/delete was attempted against an empty queue.
    #[error("queue underflow: attempted to remove from an empty queue")]
    QueueUnderflow,

    /// A positional queue operation used an index past the current size.
    #[error("index out of range: {index} (queue has {len} entries)")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The queue's current length.
        len: usize,
    },

    /// The request state machine encountered a state it does not recognize.
    ///
    /// Can only happen if a request is mutated outside the state machine;
    /// the transition table in [`crate::core::chip`] is exhaustive.
    #[error("unknown request state encountered")]
    UnknownState,

    /// Bank inspection on admission matched none of page hit/miss/empty.
    ///
    /// `is_active`/`is_precharged` are maintained as complementary flags by
    /// every transition, so this can only fire if that invariant is broken.
    #[error("unknown page state encountered (bank is neither active, precharged, nor empty)")]
    UnknownPageState,
}

/// Convenience alias for results produced by the simulator core.
pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Maps this error to a process exit code, per the configuration /
    /// invariant-violation taxonomy.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::Io(_) | SimError::InvalidSchedulingLevel(_) => 2,
            SimError::QueueOverflow { .. }
            | SimError::QueueUnderflow
            | SimError::IndexOutOfRange { .. }
            | SimError::UnknownState
            | SimError::UnknownPageState
            | SimError::TraceParse { .. } => 1,
        }
    }
}
