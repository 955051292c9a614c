//! Level 3: bank-level parallelism + aging + out-of-order admission, open
//! page (spec §4.3-§4.5).
//!
//! The per-cycle scan is identical to level 2; what changes is admission:
//! before a new request is inserted, [`promote_aged`] gives any
//! sufficiently old entry a one-step boost past a much younger one, and
//! [`insert_out_of_order`] then places the new request using the five
//! bank/row-conflict rules instead of always appending at the head.

use crate::common::SimResult;
use crate::config::TimingTable;

use super::super::bank::Operation;
use super::super::dimm::Dimm;
use super::super::queue::RequestQueue;
use super::super::request::Request;
use super::super::sink::CommandSink;
use super::level2::Level2;
use super::SchedulingPolicy;

#[derive(Debug, Default)]
pub struct Level3 {
    inner: Level2,
}

impl SchedulingPolicy for Level3 {
    fn tick(
        &mut self,
        dimm: &mut Dimm,
        queue: &mut RequestQueue,
        cycle: u64,
        timing: &TimingTable,
        sink: &mut dyn CommandSink,
    ) -> SimResult<()> {
        self.inner.tick(dimm, queue, cycle, timing, sink)
    }

    fn admit(&mut self, queue: &mut RequestQueue, req: Request, timing: &TimingTable) -> SimResult<()> {
        promote_aged(queue, timing)?;
        tracing::debug!(
            time = req.time,
            channel = req.channel,
            bank_group = req.bank_group,
            bank = req.bank,
            op = ?req.operation,
            "request admitted out-of-order"
        );
        insert_out_of_order(queue, req)
    }
}

/// Finds the oldest entry whose `aging` has crossed 8x tRC, and the
/// youngest entry whose `aging` is still under one tRC. If both exist, the
/// old entry is removed and re-inserted at the young entry's original
/// index — landing it one slot past where the young entry now sits,
/// promoting it ahead of everything younger than that (spec §4.4).
fn promote_aged(queue: &mut RequestQueue, timing: &TimingTable) -> SimResult<()> {
    let old_threshold = u64::from(timing.bank.t_rc) * 8;
    let young_threshold = u64::from(timing.bank.t_rc);

    let old_index = (0..queue.len()).find(|&i| queue.peek_at(i).is_some_and(|r| r.aging >= old_threshold));
    let young_index = (0..queue.len()).find(|&i| queue.peek_at(i).is_some_and(|r| r.aging < young_threshold));

    if let (Some(old_index), Some(young_index)) = (old_index, young_index) {
        if old_index < young_index {
            let promoted = queue.delete_at(old_index)?;
            tracing::debug!(aging = promoted.aging, old_index, young_index, "aged request promoted");
            queue.insert_at(young_index, promoted)?;
        }
    }
    Ok(())
}

/// Inserts `req` using the five ordering rules (spec §4.5), scanning from
/// the tail (oldest) forward:
/// 1. A write looks for an older read/ifetch to the same bank, different
///    row, and inserts itself directly after it.
/// 2. A read/ifetch looks first for an older write to the same bank,
///    different row, and inserts itself directly before it.
/// 3. Failing that, a read/ifetch looks for an older write to the same
///    bank, same row, and inserts itself directly after it.
/// 4. Failing that, a read/ifetch looks for an older read/ifetch to the
///    same bank, same row, and inserts itself directly after it.
/// 5. Otherwise, plain FCFS: append at the head.
fn insert_out_of_order(queue: &mut RequestQueue, req: Request) -> SimResult<()> {
    let len = queue.len();
    if len == 0 {
        return queue.enqueue_head(req);
    }

    if req.operation == Operation::Write {
        for i in 0..len {
            let other = queue.peek_at(i).expect("index in bounds");
            if other.operation != Operation::Write
                && other.bank_group == req.bank_group
                && other.bank == req.bank
                && other.row != req.row
            {
                return queue.insert_at(i + 1, req);
            }
        }
    } else {
        for i in 0..len {
            let other = queue.peek_at(i).expect("index in bounds");
            if other.operation == Operation::Write
                && other.bank_group == req.bank_group
                && other.bank == req.bank
                && other.row != req.row
            {
                return queue.insert_at(i, req);
            }
        }
        for i in 0..len {
            let other = queue.peek_at(i).expect("index in bounds");
            if other.operation == Operation::Write
                && other.bank_group == req.bank_group
                && other.bank == req.bank
                && other.row == req.row
            {
                return queue.insert_at(i + 1, req);
            }
        }
        for i in 0..len {
            let other = queue.peek_at(i).expect("index in bounds");
            if other.operation != Operation::Write
                && other.bank_group == req.bank_group
                && other.bank == req.bank
                && other.row == req.row
            {
                return queue.insert_at(i + 1, req);
            }
        }
    }

    queue.enqueue_head(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::decode::decode;

    fn req(config: &Config, op: Operation, bank_group: usize, bank: usize, row: u32) -> Request {
        let mut addr: u64 = 0;
        addr |= (bank_group as u64) << (config.geometry.byte_select_bits + config.geometry.column_low_bits + config.geometry.channel_bits);
        addr |= (bank as u64)
            << (config.geometry.byte_select_bits
                + config.geometry.column_low_bits
                + config.geometry.channel_bits
                + config.geometry.bank_group_bits);
        let decoded = decode(addr, &config.geometry);
        let mut r = Request::new(0, 0, op, &decoded, config.geometry.column_low_bits);
        r.row = row;
        r
    }

    #[test]
    fn write_inserts_after_older_read_to_same_bank_different_row() {
        let config = Config::default();
        let mut queue = RequestQueue::new(config.queue_capacity);
        queue.enqueue_head(req(&config, Operation::Read, 0, 0, 1)).unwrap();
        queue.enqueue_head(req(&config, Operation::Read, 1, 0, 9)).unwrap();

        let write = req(&config, Operation::Write, 0, 0, 2);
        insert_out_of_order(&mut queue, write).unwrap();

        assert_eq!(queue.peek_at(1).unwrap().operation, Operation::Write);
        assert_eq!(queue.peek_at(1).unwrap().row, 2);
    }

    #[test]
    fn unrelated_request_appends_at_head() {
        let config = Config::default();
        let mut queue = RequestQueue::new(config.queue_capacity);
        queue.enqueue_head(req(&config, Operation::Read, 0, 0, 1)).unwrap();

        let other = req(&config, Operation::Read, 2, 1, 7);
        insert_out_of_order(&mut queue, other).unwrap();

        assert_eq!(queue.peek_at(1).unwrap().row, 7);
    }

    #[test]
    fn promote_aged_moves_old_entry_past_young_one() {
        let config = Config::default();
        let mut queue = RequestQueue::new(config.queue_capacity);
        let mut old = req(&config, Operation::Read, 0, 0, 1);
        old.aging = u64::from(config.timing.bank.t_rc) * 8;
        let young = req(&config, Operation::Read, 1, 0, 2);
        queue.enqueue_head(old).unwrap();
        queue.enqueue_head(young).unwrap();

        promote_aged(&mut queue, &config.timing).unwrap();

        assert_eq!(queue.peek_at(0).unwrap().row, 2);
        assert_eq!(queue.peek_at(1).unwrap().row, 1);
    }
}
