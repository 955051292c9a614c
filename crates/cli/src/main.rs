//! DDR5 memory-controller scheduler simulator CLI.
//!
//! Reads a trace file, drives the scheduling core to completion, and
//! writes one line per issued DRAM command to the output file.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;

use memsched_core::common::SimResult;
use memsched_core::config::Config;
use memsched_core::core::policy;
use memsched_core::sim::{CommandLog, Driver, Parser};

#[derive(ClapParser, Debug)]
#[command(
    name = "memsched",
    author,
    version,
    about = "Cycle-accurate DDR5 memory-controller scheduler simulator",
    long_about = "Simulates a DDR5 memory controller servicing a CPU core's memory request trace against one of four scheduling policies, emitting the exact sequence of DRAM commands the controller issues.\n\nExamples:\n  memsched -i trace.txt -o dram.txt -s 2\n  memsched --input reads.trace --scheduling-level 3 -v"
)]
struct Cli {
    /// Input trace file (`<cycle> <op> <addr>` per line).
    #[arg(short = 'i', long = "input", default_value = "trace.txt")]
    input: PathBuf,

    /// Output command-log file.
    #[arg(short = 'o', long = "output", default_value = "dram.txt")]
    output: PathBuf,

    /// Scheduling policy level (0: FCFS closed-page, 1: FCFS open-page,
    /// 2: bank-level parallelism, 3: + aging and out-of-order admission).
    #[arg(short = 's', long = "scheduling-level", default_value_t = 0)]
    scheduling_level: u8,

    /// Increase log verbosity (-v for debug, -vv for trace). Overridden by
    /// `RUST_LOG` if set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    // clap's default `--help`/usage-error exit code is 0/2; the original
    // CLI this replaces exits 1 in both cases, so that contract is
    // preserved here rather than left to clap's default.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{e}");
            process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    println!("--- Simulation Parameters ---");
    println!("Scheduling Policy Level: {}", cli.scheduling_level);
    println!("Input File: {}", cli.input.display());
    println!("Output File: {}", cli.output.display());
    println!("-----------------------------");

    match run(&cli) {
        Ok(final_clock) => {
            println!("Total Clock Cycles: {final_clock}");
        }
        Err(err) => {
            eprintln!("memsched: {err}");
            process::exit(err.exit_code());
        }
    }
}

fn run(cli: &Cli) -> SimResult<u64> {
    let config = Config::default();

    let input = File::open(&cli.input)?;
    let output = File::create(&cli.output)?;

    let parser = Parser::new(BufReader::new(input), &config.geometry)?;
    let log = CommandLog::new(output);
    let policy_engine = policy::resolve(cli.scheduling_level)?;

    let mut driver = Driver::new(parser, log, policy_engine, &config);
    driver.run()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
