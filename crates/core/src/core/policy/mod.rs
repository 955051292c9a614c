//! Scheduling policy engine (spec §4.3-§4.5).
//!
//! Four levels, each a [`SchedulingPolicy`] implementation, selected at
//! startup by `--scheduling-level`:
//! - [`level0::Level0`]: FCFS, closed-page.
//! - [`level1::Level1`]: FCFS, open-page.
//! - [`level2::Level2`]: bank-level parallelism, open-page.
//! - [`level3::Level3`]: bank-level parallelism + aging + out-of-order
//!   admission, open-page.
//!
//! This mirrors a `ReplacementPolicy`-style trait with one implementation
//! per file: `tick` advances the queue by one DRAM cycle, `admit` controls
//! where a newly-arrived request is placed.

pub mod level0;
pub mod level1;
pub mod level2;
pub mod level3;

use crate::common::SimResult;
use crate::config::TimingTable;

use super::command::Command;
use super::dimm::{Dimm, Flavor};
use super::queue::RequestQueue;
use super::request::Request;
use super::sink::CommandSink;

/// A scheduling policy: how the queue advances each DRAM cycle, and how a
/// newly-admitted request is placed into it.
pub trait SchedulingPolicy {
    /// Advances the queue by one DRAM cycle: issues at most the commands
    /// this level's algorithm allows, removes completed requests, and
    /// decrements every timing counter.
    fn tick(
        &mut self,
        dimm: &mut Dimm,
        queue: &mut RequestQueue,
        cycle: u64,
        timing: &TimingTable,
        sink: &mut dyn CommandSink,
    ) -> SimResult<()>;

    /// Places a newly-arrived request into the queue. The default is plain
    /// FCFS admission at the head; level 3 overrides this with aging
    /// promotion plus the five-rule out-of-order insertion.
    fn admit(&mut self, queue: &mut RequestQueue, req: Request, _timing: &TimingTable) -> SimResult<()> {
        tracing::debug!(
            time = req.time,
            channel = req.channel,
            bank_group = req.bank_group,
            bank = req.bank,
            op = ?req.operation,
            "request admitted FCFS"
        );
        queue.enqueue_head(req)
    }
}

/// Advances the request at `index`, emitting its command (if any) through
/// `sink`. Returns whether a command was actually issued this call.
fn advance_at(
    dimm: &mut Dimm,
    queue: &mut RequestQueue,
    index: usize,
    cycle: u64,
    timing: &TimingTable,
    sink: &mut dyn CommandSink,
    flavor: Flavor,
) -> SimResult<bool> {
    let Some(req) = queue.peek_at_mut(index) else {
        return Ok(false);
    };
    let channel = req.channel;
    match dimm.advance(req, flavor, timing)? {
        Some(cmd) => {
            emit(sink, cycle, channel, &cmd)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn emit(sink: &mut dyn CommandSink, cycle: u64, channel: usize, cmd: &Command) -> SimResult<()> {
    tracing::trace!(cycle, channel, mnemonic = cmd.mnemonic(), "command issued");
    sink.emit(cycle, channel, cmd)
}

/// Increments the `aging` counter of every request still waiting in the
/// queue, once per DRAM tick (spec §4.4).
pub fn increment_aging(queue: &mut RequestQueue) {
    for req in queue.iter_mut() {
        req.aging += 1;
    }
}

/// Resolves a CLI-provided scheduling level (0..=3) to a policy instance.
///
/// # Errors
/// Returns [`crate::common::SimError::InvalidSchedulingLevel`] for any
/// value outside `0..=3`.
pub fn resolve(level: u8) -> SimResult<Box<dyn SchedulingPolicy>> {
    match level {
        0 => Ok(Box::new(level0::Level0)),
        1 => Ok(Box::new(level1::Level1)),
        2 => Ok(Box::new(level2::Level2)),
        3 => Ok(Box::new(level3::Level3::default())),
        other => Err(crate::common::SimError::InvalidSchedulingLevel(other)),
    }
}
