//! End-to-end scenario tests driving the public [`Driver`] API against a
//! literal trace, plus one chip-level scenario for the tFAW window that
//! needs finer control than a trace can express.

use pretty_assertions::assert_eq;

use memsched_core::config::{Config, DimmGeometry, TimingTable};
use memsched_core::core::{decode_address, Chip, Operation, Request};
use memsched_core::sim::{CommandLog, Driver, Parser};

fn run_trace(trace: &str, level: u8) -> Vec<String> {
    run_trace_lines(trace, level)
        .iter()
        .map(|line| line.split_whitespace().nth(2).unwrap().to_string())
        .collect()
}

fn run_trace_lines(trace: &str, level: u8) -> Vec<String> {
    let config = Config::default();
    let parser = Parser::new(std::io::Cursor::new(trace.to_string()), &config.geometry).unwrap();
    let mut output = Vec::new();
    {
        let log = CommandLog::new(&mut output);
        let policy = memsched_core::core::policy::resolve(level).unwrap();
        let mut driver = Driver::new(parser, log, policy, &config);
        let _ = driver.run().unwrap();
    }
    String::from_utf8(output).unwrap().lines().map(str::to_string).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Single read, empty bank (closed-page)
// ══════════════════════════════════════════════════════════

#[test]
fn single_read_on_an_empty_bank_issues_five_commands_ending_in_precharge() {
    let mnemonics = run_trace("100 0 0x00000000\n", 0);
    assert_eq!(mnemonics, vec!["ACT0", "ACT1", "RD0", "RD1", "PRE"]);
}

// ══════════════════════════════════════════════════════════
// 2. Two reads to the same row, open-page
// ══════════════════════════════════════════════════════════

#[test]
fn two_reads_to_the_same_row_share_one_activation() {
    let mnemonics = run_trace("100 0 0x0\n120 0 0x0\n", 1);
    assert_eq!(mnemonics, vec!["ACT0", "ACT1", "RD0", "RD1", "RD0", "RD1"]);
}

// ══════════════════════════════════════════════════════════
// 3. Read then write, same bank, different row
// ══════════════════════════════════════════════════════════

#[test]
fn read_then_write_to_a_different_row_forces_a_precharge_between() {
    let mnemonics = run_trace("100 0 0x0\n110 1 0x10000\n", 1);
    assert_eq!(
        mnemonics,
        vec!["ACT0", "ACT1", "RD0", "RD1", "PRE", "ACT0", "ACT1", "WR0", "WR1"]
    );
}

// ══════════════════════════════════════════════════════════
// 4. tFAW caps concurrent activates at four
// ══════════════════════════════════════════════════════════

#[test]
fn a_fifth_concurrent_activate_waits_for_the_tfaw_window() {
    let timing = TimingTable::default();
    let geometry = DimmGeometry::default();
    let bank_group_shift = geometry.byte_select_bits + geometry.column_low_bits + geometry.channel_bits;

    let mut chip = Chip::new();
    let mut requests: Vec<Request> = (0..5u64)
        .map(|bank_group| {
            let addr = bank_group << bank_group_shift;
            let decoded = decode_address(addr, &geometry);
            Request::new(0, 0, Operation::Read, &decoded, geometry.column_low_bits)
        })
        .collect();

    for req in requests.iter_mut().take(4) {
        let act0 = chip.advance_open(req, &timing).unwrap().unwrap();
        assert_eq!(act0.mnemonic(), "ACT0");
        let act1 = chip.advance_open(req, &timing).unwrap().unwrap();
        assert_eq!(act1.mnemonic(), "ACT1");
    }

    assert!(chip.advance_open(&mut requests[4], &timing).unwrap().is_none());

    for _ in 0..timing.inter_command.t_faw {
        chip.decrement_all();
    }

    let fifth = chip.advance_open(&mut requests[4], &timing).unwrap();
    assert_eq!(fifth.unwrap().mnemonic(), "ACT0");
}

// ══════════════════════════════════════════════════════════
// 5. Level 3 read-over-write reorder
// ══════════════════════════════════════════════════════════

#[test]
fn level_3_admits_a_read_ahead_of_an_older_write_to_a_different_row() {
    use memsched_core::core::policy::SchedulingPolicy;
    use memsched_core::core::queue::RequestQueue;

    let config = Config::default();
    let mut queue = RequestQueue::new(config.queue_capacity);
    let mut level3 = memsched_core::core::policy::level3::Level3::default();

    let write_addr = 0u64;
    let read_addr = 1u64 << 16; // same bg/bank, different row

    let write_req = Request::new(0, 0, Operation::Write, &decode_address(write_addr, &config.geometry), config.geometry.column_low_bits);
    let read_req = Request::new(1, 0, Operation::Read, &decode_address(read_addr, &config.geometry), config.geometry.column_low_bits);

    level3.admit(&mut queue, write_req, &config.timing).unwrap();
    level3.admit(&mut queue, read_req, &config.timing).unwrap();

    assert_eq!(queue.peek_at(0).unwrap().operation, Operation::Read);
    assert_eq!(queue.peek_at(1).unwrap().operation, Operation::Write);
}

// ══════════════════════════════════════════════════════════
// 6. Aging promotion rescues a write buried under continuous
//    same-bank read contention
// ══════════════════════════════════════════════════════════

/// An old write arrives first, targeting a row no later read wants. The
/// out-of-order admission rules (§4.5) reinsert every later read directly
/// ahead of it, so left alone it would never reach the front of the queue
/// for as long as reads keep arriving. Aging promotion (§4.4) is what
/// eventually lets it leapfrog back into contention once its wait crosses
/// 8*tRC — this drives that through the real `Driver`/trace path instead
/// of constructing the queue by hand.
#[test]
fn aging_promotes_a_long_starved_write_past_continuous_read_contention() {
    let mut trace = String::from("0 1 0x10000\n"); // write, row 1
    let mut time = 10u64;
    while time <= 3000 {
        trace.push_str(&format!("{time} 0 0x20000\n")); // read, row 2
        time += 10;
    }

    let lines = run_trace_lines(&trace, 3);
    let wr0_cycle: u64 = lines
        .iter()
        .find(|line| line.split_whitespace().nth(2) == Some("WR0"))
        .and_then(|line| line.split_whitespace().next())
        .and_then(|c| c.parse().ok())
        .expect("write should eventually issue WR0 despite continuous read contention");

    assert!(
        wr0_cycle < 3000,
        "write was serviced at cycle {wr0_cycle}, after the read stream had already drained; \
         aging promotion should have pulled it forward while reads were still arriving"
    );
}
