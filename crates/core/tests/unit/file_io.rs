//! Exercises the trace parser and command log against real files on disk,
//! rather than the in-memory buffers the rest of the suite uses — the path
//! the CLI actually drives in production.

use std::fs;
use std::io::BufReader;

use memsched_core::config::Config;
use memsched_core::core::policy::level0::Level0;
use memsched_core::sim::{CommandLog, Driver, Parser};

#[test]
fn driver_reads_a_trace_file_and_writes_a_command_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("trace.txt");
    let log_path = dir.path().join("dram.txt");

    fs::write(&trace_path, "0 0 0x0\n10 1 0x10000\n").unwrap();

    let config = Config::default();
    let input = BufReader::new(fs::File::open(&trace_path).unwrap());
    let output = fs::File::create(&log_path).unwrap();

    let parser = Parser::new(input, &config.geometry).unwrap();
    let log = CommandLog::new(output);
    let mut driver = Driver::new(parser, log, Box::new(Level0), &config);
    let _ = driver.run().unwrap();

    let written = fs::read_to_string(&log_path).unwrap();
    assert!(written.lines().count() >= 5, "expected at least the first request's five commands");
    assert!(written.lines().next().unwrap().contains("ACT0"));
}
