//! The in-flight memory request and its state machine states (spec §4.2–§4.3).

use super::bank::Operation;
use super::decode::DecodedAddress;

/// Where a request sits in its state machine. The two flavors (closed-page,
/// open-page) share this enum but walk different subsets of it — see
/// [`super::chip::Chip::advance_closed`] and [`super::chip::Chip::advance_open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Freshly admitted; not yet classified against bank state.
    Pending,
    Act0,
    Act1,
    Rd0,
    Rd1,
    Wr0,
    Wr1,
    Pre,
    Buffer,
    Burst,
    /// Terminal. The request is removed from the queue on the next scan.
    Complete,
}

/// A single outstanding memory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Cycle the request was admitted to the queue.
    pub time: u64,
    /// Originating core id. Carried from the trace format; every level's
    /// scheduling logic is currently core-agnostic.
    pub core: u32,
    pub operation: Operation,
    pub channel: usize,
    pub bank_group: usize,
    pub bank: usize,
    pub row: u32,
    pub column_high: u32,
    pub column_low: u32,
    /// Concatenation of `column_high`/`column_low`, precomputed at decode
    /// time since every CAS command needs it.
    pub column: u32,
    pub byte_select: u32,
    pub state: RequestState,
    /// Cycles spent waiting in the queue, incremented once per DRAM tick.
    pub aging: u64,
    /// Set once the request has issued its last CAS/PRE command. From this
    /// point its remaining BUFFER/BURST/completion states issue no further
    /// commands, so level 0/1/2/3 scheduling can safely let a later queue
    /// entry make progress in the same cycle.
    pub is_finished: bool,
}

impl Request {
    /// Builds a freshly-admitted request from a decoded address.
    #[must_use]
    pub fn new(
        time: u64,
        core: u32,
        operation: Operation,
        addr: &DecodedAddress,
        column_low_bits: u32,
    ) -> Self {
        Self {
            time,
            core,
            operation,
            channel: addr.channel,
            bank_group: addr.bank_group,
            bank: addr.bank,
            row: addr.row,
            column_high: addr.column_high,
            column_low: addr.column_low,
            column: (addr.column_high << column_low_bits) | addr.column_low,
            byte_select: addr.byte_select,
            state: RequestState::Pending,
            aging: 0,
            is_finished: false,
        }
    }
}
