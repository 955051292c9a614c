//! Timing-counter bookkeeping.
//!
//! Every JEDEC constraint is represented the same way: an unsigned counter
//! that is armed to a reload value when a command fires, decremented once
//! per DRAM clock tick, and considered "met" once it reaches zero. This
//! module owns the bookkeeping for both per-bank counters ([`BankTimers`])
//! and the chip-global counters ([`GlobalTimers`]: inter-command spacing and
//! the tFAW rolling window).

use crate::config::{InterCommandTiming, BankTiming, NUM_TFAW_COUNTERS};

/// The ten per-bank JEDEC constraints tracked by [`BankTimers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankConstraint {
    Rc,
    Ras,
    Rp,
    Rfc,
    Cwl,
    Cl,
    Rcd,
    Wr,
    Rtp,
    Burst,
}

impl BankConstraint {
    fn index(self) -> usize {
        match self {
            Self::Rc => 0,
            Self::Ras => 1,
            Self::Rp => 2,
            Self::Rfc => 3,
            Self::Cwl => 4,
            Self::Cl => 5,
            Self::Rcd => 6,
            Self::Wr => 7,
            Self::Rtp => 8,
            Self::Burst => 9,
        }
    }

    fn reload(self, timing: &BankTiming) -> u32 {
        match self {
            Self::Rc => timing.t_rc,
            Self::Ras => timing.t_ras,
            Self::Rp => timing.t_rp,
            Self::Rfc => timing.t_rfc,
            Self::Cwl => timing.t_cwl,
            Self::Cl => timing.t_cl,
            Self::Rcd => timing.t_rcd,
            Self::Wr => timing.t_wr,
            Self::Rtp => timing.t_rtp,
            Self::Burst => timing.t_burst,
        }
    }
}

/// Per-bank timing counters. One instance lives at each `(bank_group, bank)`
/// coordinate on a chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BankTimers([u32; 10]);

impl BankTimers {
    /// Arms `constraint`'s counter to its reload value.
    pub fn arm(&mut self, constraint: BankConstraint, timing: &BankTiming) {
        self.0[constraint.index()] = constraint.reload(timing);
    }

    /// A constraint is met once its counter has decremented to zero.
    #[must_use]
    pub fn is_met(&self, constraint: BankConstraint) -> bool {
        self.0[constraint.index()] == 0
    }

    /// Decrements every counter by one DRAM clock tick, floored at zero.
    pub fn decrement_all(&mut self) {
        for v in &mut self.0 {
            *v = v.saturating_sub(1);
        }
    }
}

/// The ten chip-global inter-command constraints tracked by [`GlobalTimers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsecutiveCmdConstraint {
    RrdL,
    RrdS,
    CcdL,
    CcdS,
    CcdLWr,
    CcdSWr,
    CcdLRtw,
    CcdSRtw,
    CcdLWtr,
    CcdSWtr,
}

impl ConsecutiveCmdConstraint {
    fn index(self) -> usize {
        match self {
            Self::RrdL => 0,
            Self::RrdS => 1,
            Self::CcdL => 2,
            Self::CcdS => 3,
            Self::CcdLWr => 4,
            Self::CcdSWr => 5,
            Self::CcdLRtw => 6,
            Self::CcdSRtw => 7,
            Self::CcdLWtr => 8,
            Self::CcdSWtr => 9,
        }
    }

    fn reload(self, timing: &InterCommandTiming) -> u32 {
        match self {
            Self::RrdL => timing.t_rrd_l,
            Self::RrdS => timing.t_rrd_s,
            Self::CcdL => timing.t_ccd_l,
            Self::CcdS => timing.t_ccd_s,
            Self::CcdLWr => timing.t_ccd_l_wr,
            Self::CcdSWr => timing.t_ccd_s_wr,
            Self::CcdLRtw => timing.t_ccd_l_rtw,
            Self::CcdSRtw => timing.t_ccd_s_rtw,
            Self::CcdLWtr => timing.t_ccd_l_wtr,
            Self::CcdSWtr => timing.t_ccd_s_wtr,
        }
    }
}

/// Chip-global timing state: the ten inter-command spacing counters plus the
/// tFAW rolling window of up to [`NUM_TFAW_COUNTERS`] in-flight activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalTimers {
    consecutive: [u32; 10],
    tfaw: [u32; NUM_TFAW_COUNTERS],
}

impl Default for GlobalTimers {
    fn default() -> Self {
        Self {
            consecutive: [0; 10],
            tfaw: [0; NUM_TFAW_COUNTERS],
        }
    }
}

impl GlobalTimers {
    pub fn arm(&mut self, constraint: ConsecutiveCmdConstraint, timing: &InterCommandTiming) {
        self.consecutive[constraint.index()] = constraint.reload(timing);
    }

    #[must_use]
    pub fn is_met(&self, constraint: ConsecutiveCmdConstraint) -> bool {
        self.consecutive[constraint.index()] == 0
    }

    /// Arms both tRRD variants after an ACT1. Only the one the next ACT0's
    /// bank-group relationship selects is ever consulted, but both reload
    /// together since they share the same trigger.
    pub fn arm_trrd(&mut self, timing: &InterCommandTiming) {
        self.arm(ConsecutiveCmdConstraint::RrdL, timing);
        self.arm(ConsecutiveCmdConstraint::RrdS, timing);
    }

    /// Arms every tCCD variant after a CAS command (RD1/WR1). Mirrors
    /// `arm_trrd`: all eight reload, only the relevant one is read back.
    pub fn arm_tccd(&mut self, timing: &InterCommandTiming) {
        self.arm(ConsecutiveCmdConstraint::CcdL, timing);
        self.arm(ConsecutiveCmdConstraint::CcdS, timing);
        self.arm(ConsecutiveCmdConstraint::CcdLWr, timing);
        self.arm(ConsecutiveCmdConstraint::CcdSWr, timing);
        self.arm(ConsecutiveCmdConstraint::CcdLRtw, timing);
        self.arm(ConsecutiveCmdConstraint::CcdSRtw, timing);
        self.arm(ConsecutiveCmdConstraint::CcdLWtr, timing);
        self.arm(ConsecutiveCmdConstraint::CcdSWtr, timing);
    }

    /// True once at least one of the four tFAW slots is free, i.e. fewer
    /// than four activates are in flight within the rolling window.
    #[must_use]
    pub fn can_issue_act(&self) -> bool {
        self.tfaw.iter().any(|&slot| slot == 0)
    }

    /// Occupies the first free tFAW slot. Caller must check
    /// [`Self::can_issue_act`] first; if none are free this is a no-op.
    pub fn arm_tfaw(&mut self, timing: &InterCommandTiming) {
        if let Some(slot) = self.tfaw.iter_mut().find(|slot| **slot == 0) {
            *slot = timing.t_faw;
        }
    }

    pub fn decrement_all(&mut self) {
        for v in &mut self.consecutive {
            *v = v.saturating_sub(1);
        }
        for v in &mut self.tfaw {
            *v = v.saturating_sub(1);
        }
    }
}
