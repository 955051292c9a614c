//! Level 0: FCFS, closed-page (spec §4.3).
//!
//! Only the head of the queue is serviced. The head's second entry is
//! allowed to make progress in the same cycle only once the head has
//! issued its last command (`is_finished`), giving a little pipelining
//! without reordering anything.

use crate::common::SimResult;
use crate::config::TimingTable;

use super::super::dimm::{Dimm, Flavor};
use super::super::queue::RequestQueue;
use super::super::request::RequestState;
use super::super::sink::CommandSink;
use super::{advance_at, increment_aging, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct Level0;

impl SchedulingPolicy for Level0 {
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

        if queue.len() > 1 {
            let head_finished = queue.peek_at(0).is_some_and(|r| r.is_finished);
            let _ = advance_at(dimm, queue, 0, cycle, timing, sink, Flavor::Closed)?;
            if head_finished {
                let _ = advance_at(dimm, queue, 1, cycle, timing, sink, Flavor::Closed)?;
            }
        } else if queue.peek_at(0).is_some_and(|r| r.state != RequestState::Complete) {
            let _ = advance_at(dimm, queue, 0, cycle, timing, sink, Flavor::Closed)?;
        }

        if queue.peek_at(0).is_some_and(|r| r.state == RequestState::Complete) {
            let _ = queue.dequeue_tail()?;
        }

        increment_aging(queue);
        dimm.decrement_all();
        Ok(())
    }
}
