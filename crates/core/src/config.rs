//! Configuration for the DDR5 memory-controller simulator.
//!
//! This module defines the immutable "global tables" the core is driven by:
//! 1. **Defaults:** JEDEC-plausible DDR5-4800-class timing constants.
//! 2. **`TimingTable`:** per-bank and inter-command reload values, plus tFAW.
//! 3. **`DimmGeometry`:** channel/bank-group/bank counts and address field widths.
//! 4. **`Config`:** the top-level record passed into [`crate::sim::driver::Driver`].
//!
//! There is no external config file for this simulator — configuration is
//! CLI-driven (scheduling level, trace/log paths) plus this module's
//! compiled-in defaults, so `Config` derives `Debug`/`Clone` only, not
//! `serde::Deserialize`. A future DIMM speed grade is a new [`TimingTable`]
//! constant, not a code change.

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of memory channels on the DIMM (PC5-38400, 16 GiB).
    pub const NUM_CHANNELS: usize = 2;

    /// Bank-groups per chip.
    pub const NUM_BANK_GROUPS: usize = 8;

    /// Banks per bank-group.
    pub const NUM_BANKS_PER_GROUP: usize = 4;

    /// tFAW rolling-window counter count; at most this many ACTs may be
    /// in flight within any tFAW-cycle window.
    pub const NUM_TFAW_COUNTERS: usize = 4;

    /// Bounded request queue capacity.
    pub const QUEUE_CAPACITY: usize = 16;

    /// RAS-to-CAS delay, in DRAM clock cycles.
    pub const T_RCD: u32 = 40;

    /// Row precharge time.
    pub const T_RP: u32 = 39;

    /// Row active time (ACT to PRE minimum).
    pub const T_RAS: u32 = 52;

    /// Row cycle time (ACT to ACT, same bank).
    pub const T_RC: u32 = 90;

    /// Refresh cycle time. Carried for table completeness; refresh commands
    /// are never issued (non-goal), so this counter is never armed.
    pub const T_RFC: u32 = 295;

    /// Write CAS latency.
    pub const T_CWL: u32 = 40;

    /// Read CAS latency.
    pub const T_CL: u32 = 40;

    /// Write recovery time (last write data to PRE).
    pub const T_WR: u32 = 48;

    /// Read-to-precharge time.
    pub const T_RTP: u32 = 18;

    /// Burst transfer time (BL16 at this data rate).
    pub const T_BURST: u32 = 8;

    /// Activate-to-activate, same bank-group.
    pub const T_RRD_L: u32 = 8;

    /// Activate-to-activate, different bank-group.
    pub const T_RRD_S: u32 = 6;

    /// Column-to-column, same bank-group, same direction (read).
    pub const T_CCD_L: u32 = 8;

    /// Column-to-column, different bank-group, same direction (read).
    pub const T_CCD_S: u32 = 4;

    /// Column-to-column, same bank-group, same direction (write).
    pub const T_CCD_L_WR: u32 = 32;

    /// Column-to-column, different bank-group, same direction (write).
    pub const T_CCD_S_WR: u32 = 32;

    /// Column-to-column, same bank-group, read-to-write turnaround.
    pub const T_CCD_L_RTW: u32 = 17;

    /// Column-to-column, different bank-group, read-to-write turnaround.
    pub const T_CCD_S_RTW: u32 = 9;

    /// Column-to-column, same bank-group, write-to-read turnaround.
    pub const T_CCD_L_WTR: u32 = 40;

    /// Column-to-column, different bank-group, write-to-read turnaround.
    pub const T_CCD_S_WTR: u32 = 18;

    /// Four-activate window length.
    pub const T_FAW: u32 = 32;
}

pub use defaults::{
    NUM_BANK_GROUPS, NUM_BANKS_PER_GROUP, NUM_CHANNELS, NUM_TFAW_COUNTERS, QUEUE_CAPACITY,
};

/// Per-bank JEDEC timing constraints, as clock-cycle reload amounts.
///
/// A constraint is "met" once its armed counter has decremented to zero.
/// All ten fields correspond to the distilled spec's per-bank constraint
/// list; `t_rfc` is carried for table completeness even though refresh is a
/// non-goal and the counter is never armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankTiming {
    /// Row cycle time (ACT to ACT, same bank).
    pub t_rc: u32,
    /// Row active time.
    pub t_ras: u32,
    /// Row precharge time.
    pub t_rp: u32,
    /// Refresh cycle time (unused; refresh commands are never issued).
    pub t_rfc: u32,
    /// Write CAS latency.
    pub t_cwl: u32,
    /// Read CAS latency.
    pub t_cl: u32,
    /// RAS-to-CAS delay.
    pub t_rcd: u32,
    /// Write recovery time.
    pub t_wr: u32,
    /// Read-to-precharge time.
    pub t_rtp: u32,
    /// Burst transfer time.
    pub t_burst: u32,
}

/// Global, per-chip inter-command timing constraints.
///
/// `_l` variants apply between commands to the same bank-group; `_s`
/// variants apply across different bank-groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterCommandTiming {
    /// Activate-to-activate, same bank-group.
    pub t_rrd_l: u32,
    /// Activate-to-activate, different bank-group.
    pub t_rrd_s: u32,
    /// Read-to-read column spacing, same bank-group.
    pub t_ccd_l: u32,
    /// Read-to-read column spacing, different bank-group.
    pub t_ccd_s: u32,
    /// Write-to-write column spacing, same bank-group.
    pub t_ccd_l_wr: u32,
    /// Write-to-write column spacing, different bank-group.
    pub t_ccd_s_wr: u32,
    /// Read-to-write turnaround, same bank-group.
    pub t_ccd_l_rtw: u32,
    /// Read-to-write turnaround, different bank-group.
    pub t_ccd_s_rtw: u32,
    /// Write-to-read turnaround, same bank-group.
    pub t_ccd_l_wtr: u32,
    /// Write-to-read turnaround, different bank-group.
    pub t_ccd_s_wtr: u32,
    /// Four-activate window length.
    pub t_faw: u32,
}

/// The immutable "global tables" configuration record (spec §9).
///
/// Constructed once at startup (or by a test) and threaded by reference
/// through the [`crate::core`] module, so a different DIMM speed grade is a
/// new `TimingTable` value rather than a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingTable {
    /// Per-bank timing constraints.
    pub bank: BankTiming,
    /// Global inter-command timing constraints.
    pub inter_command: InterCommandTiming,
}

impl Default for TimingTable {
    fn default() -> Self {
        Self {
            bank: BankTiming {
                t_rc: defaults::T_RC,
                t_ras: defaults::T_RAS,
                t_rp: defaults::T_RP,
                t_rfc: defaults::T_RFC,
                t_cwl: defaults::T_CWL,
                t_cl: defaults::T_CL,
                t_rcd: defaults::T_RCD,
                t_wr: defaults::T_WR,
                t_rtp: defaults::T_RTP,
                t_burst: defaults::T_BURST,
            },
            inter_command: InterCommandTiming {
                t_rrd_l: defaults::T_RRD_L,
                t_rrd_s: defaults::T_RRD_S,
                t_ccd_l: defaults::T_CCD_L,
                t_ccd_s: defaults::T_CCD_S,
                t_ccd_l_wr: defaults::T_CCD_L_WR,
                t_ccd_s_wr: defaults::T_CCD_S_WR,
                t_ccd_l_rtw: defaults::T_CCD_L_RTW,
                t_ccd_s_rtw: defaults::T_CCD_S_RTW,
                t_ccd_l_wtr: defaults::T_CCD_L_WTR,
                t_ccd_s_wtr: defaults::T_CCD_S_WTR,
                t_faw: defaults::T_FAW,
            },
        }
    }
}

/// DRAM hierarchy geometry: channel/bank-group/bank counts, and the 33-bit
/// physical-address field widths the decoder uses to split an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimmGeometry {
    /// Number of channels (PC5-38400, 16 GiB DIMM: 2).
    pub num_channels: usize,
    /// Bank-groups per chip.
    pub num_bank_groups: usize,
    /// Banks per bank-group.
    pub num_banks_per_group: usize,
    /// Width, in bits, of the byte-select field (low bits of the address).
    pub byte_select_bits: u32,
    /// Width, in bits, of the column-low field.
    pub column_low_bits: u32,
    /// Width, in bits, of the channel field.
    pub channel_bits: u32,
    /// Width, in bits, of the bank-group field.
    pub bank_group_bits: u32,
    /// Width, in bits, of the bank field.
    pub bank_bits: u32,
    /// Width, in bits, of the column-high field.
    pub column_high_bits: u32,
    /// Width, in bits, of the row field (high bits of the address).
    pub row_bits: u32,
}

impl Default for DimmGeometry {
    fn default() -> Self {
        Self {
            num_channels: defaults::NUM_CHANNELS,
            num_bank_groups: defaults::NUM_BANK_GROUPS,
            num_banks_per_group: defaults::NUM_BANKS_PER_GROUP,
            byte_select_bits: 5,
            column_low_bits: 3,
            channel_bits: 1,
            bank_group_bits: 3,
            bank_bits: 2,
            column_high_bits: 2,
            row_bits: 17,
        }
    }
}

impl DimmGeometry {
    /// Total width, in bits, of the physical address this geometry decodes.
    #[must_use]
    pub fn address_bits(&self) -> u32 {
        self.byte_select_bits
            + self.column_low_bits
            + self.channel_bits
            + self.bank_group_bits
            + self.bank_bits
            + self.column_high_bits
            + self.row_bits
    }
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// JEDEC timing constants.
    pub timing: TimingTable,
    /// DIMM hierarchy geometry.
    pub geometry: DimmGeometry,
    /// Bounded request queue capacity.
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: TimingTable::default(),
            geometry: DimmGeometry::default(),
            queue_capacity: defaults::QUEUE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_fields_sum_to_33_bits() {
        assert_eq!(DimmGeometry::default().address_bits(), 33);
    }

    #[test]
    fn default_config_queue_capacity_matches_spec() {
        assert_eq!(Config::default().queue_capacity, 16);
    }
}
