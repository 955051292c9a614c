//! Level 1: FCFS, open-page (spec §4.3).
//!
//! Same head-of-queue discipline as level 0, but once the head is
//! finished the scan keeps walking forward through the queue — not just
//! one extra entry — stopping at the first request that is not yet
//! finished.

use crate::common::SimResult;
use crate::config::TimingTable;

use super::super::dimm::{Dimm, Flavor};
use super::super::queue::RequestQueue;
use super::super::request::RequestState;
use super::super::sink::CommandSink;
use super::{advance_at, increment_aging, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct Level1;

impl SchedulingPolicy for Level1 {
    fn tick(
        &mut self,
        dimm: &mut Dimm,
        queue: &mut RequestQueue,
        cycle: u64,
        timing: &TimingTable,
        sink: &mut dyn CommandSink,
    ) -> SimResult<()> {
        if queue.is_empty() {
            return Ok(());
        }

        let head_finished = queue.peek_at(0).is_some_and(|r| r.is_finished);
        if !head_finished {
            let _ = advance_at(dimm, queue, 0, cycle, timing, sink, Flavor::Open)?;
        } else {
            for index in 0..queue.len() {
                let _ = advance_at(dimm, queue, index, cycle, timing, sink, Flavor::Open)?;
                if !queue.peek_at(index).is_some_and(|r| r.is_finished) {
                    break;
                }
            }
        }

        if queue.peek_at(0).is_some_and(|r| r.state == RequestState::Complete) {
            let _ = queue.dequeue_tail()?;
        }

        increment_aging(queue);
        dimm.decrement_all();
        Ok(())
    }
}
