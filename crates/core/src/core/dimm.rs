//! The DIMM: one [`Chip`] per channel, routed to by a request's decoded
//! channel field.

use crate::common::SimResult;
use crate::config::{Config, TimingTable};

use super::chip::Chip;
use super::command::Command;
use super::request::Request;

/// Which state-machine flavor a request is advanced with. Tied to the
/// scheduling level: level 0 is closed-page, levels 1-3 are open-page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Closed,
    Open,
}

/// The DIMM as a whole: one chip per channel. A request is routed to
/// `channels[request.channel]` using the channel its address decoded to.
#[derive(Debug, Clone)]
pub struct Dimm {
    channels: Vec<Chip>,
}

impl Dimm {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            channels: (0..config.geometry.num_channels).map(|_| Chip::new()).collect(),
        }
    }

    /// Advances `req` one step against its channel's chip, in the given
    /// flavor, returning the command issued if its guard was met.
    pub fn advance(&mut self, req: &mut Request, flavor: Flavor, timing: &TimingTable) -> SimResult<Option<Command>> {
        let chip = &mut self.channels[req.channel];
        match flavor {
            Flavor::Closed => chip.advance_closed(req, timing),
            Flavor::Open => chip.advance_open(req, timing),
        }
    }

    /// Decrements every channel's timing counters by one DRAM clock tick.
    pub fn decrement_all(&mut self) {
        for chip in &mut self.channels {
            chip.decrement_all();
        }
    }

    #[must_use]
    pub fn chip(&self, channel: usize) -> &Chip {
        &self.channels[channel]
    }
}
