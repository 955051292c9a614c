//! Level 2: bank-level parallelism, open-page (spec §4.3).
//!
//! Scans the whole queue instead of just the head. A request blocks the
//! scan only if the entry immediately before it targets the same bank and
//! has not yet finished; otherwise any request may make progress. Stops
//! after the first call that actually issues a command, so at most one
//! ACT/RD/WR/PRE is emitted per cycle — finished entries are scanned past
//! for free since their remaining states never emit anything.

use crate::common::SimResult;
use crate::config::TimingTable;

use super::super::dimm::{Dimm, Flavor};
use super::super::queue::RequestQueue;
use super::super::request::RequestState;
use super::super::sink::CommandSink;
use super::{advance_at, increment_aging, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct Level2;

impl SchedulingPolicy for Level2 {
    fn tick(
        &mut self,
        dimm: &mut Dimm,
        queue: &mut RequestQueue,
        cycle: u64,
        timing: &TimingTable,
        sink: &mut dyn CommandSink,
    ) -> SimResult<()> {
        let mut index = 0usize;
        while index < queue.len() {
            if queue.peek_at(index).is_some_and(|r| r.state == RequestState::Complete) {
                let _ = queue.delete_at(index)?;
                continue;
            }

            if queue.peek_at(index).is_some_and(|r| r.is_finished) {
                let _ = advance_at(dimm, queue, index, cycle, timing, sink, Flavor::Open)?;
                index += 1;
                continue;
            }

            if index != 0 {
                let blocked = {
                    let prev = queue.peek_at(index - 1).expect("index != 0");
                    let cur = queue.peek_at(index).expect("in bounds");
                    !prev.is_finished && prev.bank_group == cur.bank_group && prev.bank == cur.bank
                };
                if blocked {
                    index += 1;
                    continue;
                }
            }

            let emitted = advance_at(dimm, queue, index, cycle, timing, sink, Flavor::Open)?;
            if emitted {
                break;
            }
            index += 1;
        }

        increment_aging(queue);
        dimm.decrement_all();
        Ok(())
    }
}
