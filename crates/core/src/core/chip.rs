//! Per-channel DRAM chip state and the request state machine (spec §4.2,
//! §4.3). A [`Chip`] owns every bank's state and timers for one channel;
//! [`Chip::advance_closed`]/[`Chip::advance_open`] walk one [`Request`] one
//! step forward and return the [`Command`] issued, if any.

use crate::common::{SimError, SimResult};
use crate::config::{TimingTable, NUM_BANK_GROUPS, NUM_BANKS_PER_GROUP};

use super::bank::{BankState, Operation};
use super::command::Command;
use super::request::{Request, RequestState};
use super::timing::{BankConstraint, BankTimers, ConsecutiveCmdConstraint, GlobalTimers};

/// The last command issued on the channel's command bus, tracked so the
/// open-page flavor can tell whether its next CAS is a same-direction or
/// turnaround access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastInterfaceCmd {
    #[default]
    None,
    Activate,
    Read,
    Write,
    Precharge,
}

/// One DRAM chip: every bank's state and per-bank timers, plus the
/// chip-global inter-command and tFAW timers.
#[derive(Debug, Clone)]
pub struct Chip {
    banks: [[BankState; NUM_BANKS_PER_GROUP]; NUM_BANK_GROUPS],
    bank_timers: [[BankTimers; NUM_BANKS_PER_GROUP]; NUM_BANK_GROUPS],
    global: GlobalTimers,
    last_interface_cmd: LastInterfaceCmd,
    last_bank_group: usize,
}

impl Default for Chip {
    fn default() -> Self {
        Self {
            banks: std::array::from_fn(|_| std::array::from_fn(|_| BankState::default())),
            bank_timers: std::array::from_fn(|_| std::array::from_fn(|_| BankTimers::default())),
            global: GlobalTimers::default(),
            last_interface_cmd: LastInterfaceCmd::default(),
            last_bank_group: 0,
        }
    }
}

impl Chip {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bank(&self, bank_group: usize, bank: usize) -> &BankState {
        &self.banks[bank_group][bank]
    }

    fn bank_mut(&mut self, bank_group: usize, bank: usize) -> &mut BankState {
        &mut self.banks[bank_group][bank]
    }

    fn timers(&self, bank_group: usize, bank: usize) -> &BankTimers {
        &self.bank_timers[bank_group][bank]
    }

    fn timers_mut(&mut self, bank_group: usize, bank: usize) -> &mut BankTimers {
        &mut self.bank_timers[bank_group][bank]
    }

    /// Decrements every per-bank and global counter by one DRAM clock tick.
    pub fn decrement_all(&mut self) {
        for row in &mut self.bank_timers {
            for t in row {
                t.decrement_all();
            }
        }
        self.global.decrement_all();
    }

    // ---- open-page flavor (spec §4.2, levels 1/2/3) ----------------------

    /// Advances `req` one step through the open-page state machine. Returns
    /// the command issued, if the guard for the current state was met.
    pub fn advance_open(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        if req.state == RequestState::Pending {
            let bank = *self.bank(req.bank_group, req.bank);
            if bank.is_page_hit(req.row) {
                req.state = if req.operation == Operation::Write { RequestState::Wr0 } else { RequestState::Rd0 };
                self.bank_mut(req.bank_group, req.bank).last_request_operation = req.operation;
            } else if bank.is_page_miss(req.row) {
                req.state = RequestState::Pre;
            } else if bank.is_page_empty() {
                if !self.global.can_issue_act() {
                    return Ok(None);
                }
                req.state = RequestState::Act0;
                self.bank_mut(req.bank_group, req.bank).last_request_operation = req.operation;
            } else {
                return Err(SimError::UnknownPageState);
            }
        }

        match req.state {
            RequestState::Pre => self.open_pre(req, timing),
            RequestState::Act0 => self.open_act0(req),
            RequestState::Act1 => self.open_act1(req, timing),
            RequestState::Rd0 | RequestState::Wr0 => self.open_cas0(req),
            RequestState::Rd1 | RequestState::Wr1 => self.open_cas1(req, timing),
            RequestState::Buffer => self.open_buffer(req, timing),
            RequestState::Burst => self.open_burst(req, timing),
            RequestState::Complete => Ok(None),
            RequestState::Pending => Err(SimError::UnknownState),
        }
    }

    fn open_pre(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        let last_op = self.bank(req.bank_group, req.bank).last_request_operation;
        let t = self.timers(req.bank_group, req.bank);
        let met = if last_op == Operation::Write {
            t.is_met(BankConstraint::Ras)
                && t.is_met(BankConstraint::Cwl)
                && t.is_met(BankConstraint::Burst)
                && t.is_met(BankConstraint::Wr)
                && t.is_met(BankConstraint::Rp)
        } else {
            t.is_met(BankConstraint::Ras) && t.is_met(BankConstraint::Rtp) && t.is_met(BankConstraint::Rp)
        };
        if !met {
            return Ok(None);
        }

        self.bank_mut(req.bank_group, req.bank).precharge();
        self.bank_mut(req.bank_group, req.bank).in_progress = true;
        self.last_interface_cmd = LastInterfaceCmd::Precharge;
        self.last_bank_group = req.bank_group;
        self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Rp, &timing.bank);
        req.state = RequestState::Act0;
        Ok(Some(Command::Pre { bank_group: req.bank_group, bank: req.bank }))
    }

    fn open_act0(&mut self, req: &mut Request) -> SimResult<Option<Command>> {
        if !self.global.can_issue_act() {
            return Ok(None);
        }
        let t = self.timers(req.bank_group, req.bank);
        let rc_rp_met = t.is_met(BankConstraint::Rc) && t.is_met(BankConstraint::Rp);
        let trrd_met = match self.last_interface_cmd {
            LastInterfaceCmd::Activate if self.last_bank_group == req.bank_group => {
                self.global.is_met(ConsecutiveCmdConstraint::RrdL)
            }
            LastInterfaceCmd::Activate => self.global.is_met(ConsecutiveCmdConstraint::RrdS),
            _ => true,
        };
        if !(rc_rp_met && trrd_met) {
            return Ok(None);
        }

        self.bank_mut(req.bank_group, req.bank).in_progress = true;
        req.state = RequestState::Act1;
        Ok(Some(Command::Act0 { bank_group: req.bank_group, bank: req.bank, row: req.row }))
    }

    fn open_act1(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        self.bank_mut(req.bank_group, req.bank).activate(req.row);
        self.last_interface_cmd = LastInterfaceCmd::Activate;
        self.last_bank_group = req.bank_group;

        let t = self.timers_mut(req.bank_group, req.bank);
        t.arm(BankConstraint::Rcd, &timing.bank);
        t.arm(BankConstraint::Ras, &timing.bank);
        t.arm(BankConstraint::Rc, &timing.bank);

        self.global.arm_trrd(&timing.inter_command);
        self.global.arm_tfaw(&timing.inter_command);

        req.state = if req.operation == Operation::Write { RequestState::Wr0 } else { RequestState::Rd0 };
        Ok(Some(Command::Act1 { bank_group: req.bank_group, bank: req.bank, row: req.row }))
    }

    fn open_cas0(&mut self, req: &mut Request) -> SimResult<Option<Command>> {
        let is_write = req.operation == Operation::Write;
        let t = self.timers(req.bank_group, req.bank);
        let rcd_met = t.is_met(BankConstraint::Rcd);
        let same_group = self.last_bank_group == req.bank_group;

        let extra_met = match self.last_interface_cmd {
            LastInterfaceCmd::Write => {
                let c = if is_write {
                    if same_group { ConsecutiveCmdConstraint::CcdLWr } else { ConsecutiveCmdConstraint::CcdSWr }
                } else if same_group {
                    ConsecutiveCmdConstraint::CcdLWtr
                } else {
                    ConsecutiveCmdConstraint::CcdSWtr
                };
                self.global.is_met(c)
            }
            LastInterfaceCmd::Read => {
                let c = if is_write {
                    if same_group { ConsecutiveCmdConstraint::CcdLRtw } else { ConsecutiveCmdConstraint::CcdSRtw }
                } else if same_group {
                    ConsecutiveCmdConstraint::CcdL
                } else {
                    ConsecutiveCmdConstraint::CcdS
                };
                self.global.is_met(c)
            }
            _ => true,
        };

        if !(rcd_met && extra_met) {
            return Ok(None);
        }

        self.bank_mut(req.bank_group, req.bank).in_progress = true;
        req.state = if is_write { RequestState::Wr1 } else { RequestState::Rd1 };
        let column = req.column;
        Ok(Some(if is_write {
            Command::Wr0 { bank_group: req.bank_group, bank: req.bank, column }
        } else {
            Command::Rd0 { bank_group: req.bank_group, bank: req.bank, column }
        }))
    }

    fn open_cas1(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        let is_write = req.operation == Operation::Write;
        req.is_finished = true;
        self.last_interface_cmd = if is_write { LastInterfaceCmd::Write } else { LastInterfaceCmd::Read };
        self.last_bank_group = req.bank_group;

        let t = self.timers_mut(req.bank_group, req.bank);
        if is_write {
            t.arm(BankConstraint::Cwl, &timing.bank);
        } else {
            t.arm(BankConstraint::Cl, &timing.bank);
            t.arm(BankConstraint::Rtp, &timing.bank);
        }
        self.global.arm_tccd(&timing.inter_command);

        req.state = RequestState::Buffer;
        let column = req.column;
        Ok(Some(if is_write {
            Command::Wr1 { bank_group: req.bank_group, bank: req.bank, column }
        } else {
            Command::Rd1 { bank_group: req.bank_group, bank: req.bank, column }
        }))
    }

    fn open_buffer(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        let is_write = req.operation == Operation::Write;
        let met = if is_write {
            self.timers(req.bank_group, req.bank).is_met(BankConstraint::Cwl)
        } else {
            self.timers(req.bank_group, req.bank).is_met(BankConstraint::Cl)
        };
        if !met {
            return Ok(None);
        }
        self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Burst, &timing.bank);
        req.state = RequestState::Burst;
        Ok(None)
    }

    fn open_burst(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        if !self.timers(req.bank_group, req.bank).is_met(BankConstraint::Burst) {
            return Ok(None);
        }
        if req.operation == Operation::Write {
            self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Wr, &timing.bank);
        }
        req.state = RequestState::Complete;
        self.bank_mut(req.bank_group, req.bank).in_progress = false;
        Ok(None)
    }

    // ---- closed-page flavor (spec §4.2, level 0) --------------------------

    /// Advances `req` one step through the closed-page state machine.
    pub fn advance_closed(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        if req.state == RequestState::Pending {
            req.state = RequestState::Act0;
        }
        match req.state {
            RequestState::Act0 => self.closed_act0(req),
            RequestState::Act1 => self.closed_act1(req, timing),
            RequestState::Rd0 | RequestState::Wr0 => self.closed_cas0(req),
            RequestState::Rd1 => self.closed_rd1(req, timing),
            RequestState::Wr1 => self.closed_wr1(req, timing),
            RequestState::Pre => self.closed_pre(req, timing),
            RequestState::Buffer => self.closed_buffer(req, timing),
            RequestState::Burst => self.closed_burst(req, timing),
            RequestState::Complete => Ok(None),
            RequestState::Pending => Err(SimError::UnknownState),
        }
    }

    fn closed_act0(&mut self, req: &mut Request) -> SimResult<Option<Command>> {
        let t = self.timers(req.bank_group, req.bank);
        if !(t.is_met(BankConstraint::Rc) && t.is_met(BankConstraint::Rp)) {
            return Ok(None);
        }
        req.state = RequestState::Act1;
        Ok(Some(Command::Act0 { bank_group: req.bank_group, bank: req.bank, row: req.row }))
    }

    fn closed_act1(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        self.bank_mut(req.bank_group, req.bank).activate(req.row);
        let t = self.timers_mut(req.bank_group, req.bank);
        t.arm(BankConstraint::Rcd, &timing.bank);
        t.arm(BankConstraint::Ras, &timing.bank);
        t.arm(BankConstraint::Rc, &timing.bank);
        req.state = if req.operation == Operation::Write { RequestState::Wr0 } else { RequestState::Rd0 };
        Ok(Some(Command::Act1 { bank_group: req.bank_group, bank: req.bank, row: req.row }))
    }

    fn closed_cas0(&mut self, req: &mut Request) -> SimResult<Option<Command>> {
        let is_write = req.operation == Operation::Write;
        if !self.timers(req.bank_group, req.bank).is_met(BankConstraint::Rcd) {
            return Ok(None);
        }
        req.state = if is_write { RequestState::Wr1 } else { RequestState::Rd1 };
        let column = req.column;
        Ok(Some(if is_write {
            Command::Wr0 { bank_group: req.bank_group, bank: req.bank, column }
        } else {
            Command::Rd0 { bank_group: req.bank_group, bank: req.bank, column }
        }))
    }

    fn closed_rd1(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        let t = self.timers_mut(req.bank_group, req.bank);
        t.arm(BankConstraint::Cl, &timing.bank);
        t.arm(BankConstraint::Rtp, &timing.bank);
        req.is_finished = true;
        req.state = RequestState::Pre;
        Ok(Some(Command::Rd1 { bank_group: req.bank_group, bank: req.bank, column: req.column }))
    }

    fn closed_wr1(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Cwl, &timing.bank);
        req.is_finished = true;
        req.state = RequestState::Buffer;
        Ok(Some(Command::Wr1 { bank_group: req.bank_group, bank: req.bank, column: req.column }))
    }

    fn closed_pre(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        let is_write = req.operation == Operation::Write;
        let t = self.timers(req.bank_group, req.bank);
        let met = if is_write {
            t.is_met(BankConstraint::Wr) && t.is_met(BankConstraint::Ras)
        } else {
            t.is_met(BankConstraint::Rtp) && t.is_met(BankConstraint::Ras)
        };
        if !met {
            return Ok(None);
        }

        self.bank_mut(req.bank_group, req.bank).precharge();
        self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Rp, &timing.bank);
        req.state = if is_write { RequestState::Complete } else { RequestState::Buffer };
        Ok(Some(Command::Pre { bank_group: req.bank_group, bank: req.bank }))
    }

    fn closed_buffer(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        let is_write = req.operation == Operation::Write;
        let met = if is_write {
            self.timers(req.bank_group, req.bank).is_met(BankConstraint::Cwl)
        } else {
            self.timers(req.bank_group, req.bank).is_met(BankConstraint::Cl)
        };
        if !met {
            return Ok(None);
        }
        self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Burst, &timing.bank);
        req.state = RequestState::Burst;
        Ok(None)
    }

    fn closed_burst(&mut self, req: &mut Request, timing: &TimingTable) -> SimResult<Option<Command>> {
        if !self.timers(req.bank_group, req.bank).is_met(BankConstraint::Burst) {
            return Ok(None);
        }
        if req.operation == Operation::Write {
            self.timers_mut(req.bank_group, req.bank).arm(BankConstraint::Wr, &timing.bank);
            req.state = RequestState::Pre;
        } else {
            req.state = RequestState::Complete;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decode::decode;
    use crate::config::DimmGeometry;

    fn read_request() -> Request {
        let geometry = DimmGeometry::default();
        let decoded = decode(0, &geometry);
        Request::new(0, 0, Operation::Read, &decoded, geometry.column_low_bits)
    }

    /// A single closed-page read against an empty bank issues exactly
    /// ACT0, ACT1, RD0, RD1, PRE before completing.
    #[test]
    fn closed_page_single_read_issues_five_commands_then_completes() {
        let timing = TimingTable::default();
        let mut chip = Chip::new();
        let mut req = read_request();
        let mut issued = Vec::new();

        for _ in 0..2000 {
            if req.state == RequestState::Complete {
                break;
            }
            if let Some(cmd) = chip.advance_closed(&mut req, &timing).unwrap() {
                issued.push(cmd.mnemonic());
            }
            chip.decrement_all();
        }

        assert_eq!(issued, vec!["ACT0", "ACT1", "RD0", "RD1", "PRE"]);
        assert_eq!(req.state, RequestState::Complete);
    }

    /// Same request twice against the same open row: the second is a page
    /// hit under the open-page flavor and skips straight to RD0.
    #[test]
    fn open_page_second_hit_to_same_row_skips_activation() {
        let timing = TimingTable::default();
        let mut chip = Chip::new();
        let mut first = read_request();

        while first.state != RequestState::Complete {
            let _ = chip.advance_open(&mut first, &timing).unwrap();
            chip.decrement_all();
        }

        let mut second = read_request();
        let cmd = loop {
            if let Some(cmd) = chip.advance_open(&mut second, &timing).unwrap() {
                break cmd;
            }
            chip.decrement_all();
        };
        assert_eq!(cmd.mnemonic(), "RD0");
    }

    /// P3: an ACT0 to a different bank-group must wait out tRRD_S after the
    /// previous bank-group's ACT1, not fire on the very next cycle.
    #[test]
    fn successive_activates_to_different_bank_groups_respect_trrd_s() {
        let timing = TimingTable::default();
        let geometry = DimmGeometry::default();
        let mut chip = Chip::new();

        let mut first = read_request();
        assert_eq!(chip.advance_open(&mut first, &timing).unwrap().unwrap().mnemonic(), "ACT0");
        assert_eq!(chip.advance_open(&mut first, &timing).unwrap().unwrap().mnemonic(), "ACT1");

        let bank_group_shift = geometry.byte_select_bits + geometry.column_low_bits + geometry.channel_bits;
        let decoded = decode(1u64 << bank_group_shift, &geometry);
        let mut second = Request::new(0, 0, Operation::Read, &decoded, geometry.column_low_bits);

        assert!(chip.advance_open(&mut second, &timing).unwrap().is_none());

        for _ in 0..timing.inter_command.t_rrd_s {
            chip.decrement_all();
        }

        assert_eq!(chip.advance_open(&mut second, &timing).unwrap().unwrap().mnemonic(), "ACT0");
    }

    /// P5: every RD/WR issued to a bank between its ACT1 and the next PRE
    /// targets the row that ACT1 opened, even across multiple requests.
    #[test]
    fn commands_between_activation_and_precharge_target_the_activated_row() {
        let timing = TimingTable::default();
        let geometry = DimmGeometry::default();
        let mut chip = Chip::new();

        let mut first = read_request();
        while first.state != RequestState::Complete {
            let _ = chip.advance_open(&mut first, &timing).unwrap();
            chip.decrement_all();
        }
        assert_eq!(chip.bank(0, 0).active_row, 0);

        // Second request: same bank, same row — a page hit that must not
        // see any row other than the one still open.
        let mut second = read_request();
        while second.state != RequestState::Complete {
            if chip.advance_open(&mut second, &timing).unwrap().is_some() {
                assert_eq!(chip.bank(0, 0).active_row, 0);
            }
            chip.decrement_all();
        }

        // Third request: same bank, different row — forces a PRE before
        // its own ACT1 opens the new row.
        let row_bit = geometry.byte_select_bits
            + geometry.column_low_bits
            + geometry.channel_bits
            + geometry.bank_group_bits
            + geometry.bank_bits
            + geometry.column_high_bits;
        let decoded = decode(1u64 << row_bit, &geometry);
        let mut third = Request::new(0, 0, Operation::Read, &decoded, geometry.column_low_bits);
        assert_ne!(third.row, 0);

        let mut saw_precharge = false;
        while third.state != RequestState::Complete {
            if let Some(cmd) = chip.advance_open(&mut third, &timing).unwrap() {
                if cmd.mnemonic() == "PRE" {
                    saw_precharge = true;
                } else if cmd.mnemonic() == "ACT1" {
                    assert_eq!(chip.bank(0, 0).active_row, third.row);
                }
            }
            chip.decrement_all();
        }
        assert!(saw_precharge);
    }
}
