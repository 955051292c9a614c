//! Per-bank DRAM state.
//!
//! A bank is either precharged (idle, no row open) or active (a row is
//! latched in the sense amps). [`BankState::activate`]/[`BankState::precharge`]
//! are the only mutators; everything else is a pure query used by the
//! request state machine to classify an arriving request as a page
//! hit/miss/empty (spec §4.2).

/// The direction of a memory request, and the value stored as a bank's
/// `last_request_operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A CPU data read.
    Read,
    /// A CPU data write.
    Write,
    /// An instruction fetch. Timed identically to a read.
    IFetch,
}

/// State of a single DRAM bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankState {
    /// No row is open; the bank is idle and ready to activate.
    pub is_precharged: bool,
    /// A row is latched in the sense amps.
    pub is_active: bool,
    /// The row currently open, valid only while `is_active`.
    pub active_row: u32,
    /// Direction of the last request serviced by this bank.
    pub last_request_operation: Operation,
    /// Set while a request is being serviced; cleared when its burst
    /// completes. Bookkeeping only — no guard in the state machine reads it.
    pub in_progress: bool,
}

impl Default for BankState {
    fn default() -> Self {
        Self {
            is_precharged: true,
            is_active: false,
            active_row: 0,
            last_request_operation: Operation::Read,
            in_progress: false,
        }
    }
}

impl BankState {
    /// A row is open and it is the row `row` wants.
    #[must_use]
    pub fn is_page_hit(&self, row: u32) -> bool {
        self.is_active && self.active_row == row
    }

    /// A row is open but it is not the one `row` wants.
    #[must_use]
    pub fn is_page_miss(&self, row: u32) -> bool {
        self.is_active && self.active_row != row
    }

    /// No row is open.
    #[must_use]
    pub fn is_page_empty(&self) -> bool {
        self.is_precharged && !self.is_active
    }

    /// Latches `row` into the sense amps.
    pub fn activate(&mut self, row: u32) {
        self.is_active = true;
        self.active_row = row;
        self.is_precharged = false;
    }

    /// Closes the currently open row.
    pub fn precharge(&mut self) {
        self.is_precharged = true;
        self.is_active = false;
    }
}
