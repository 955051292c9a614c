//! Trace file parsing (spec §4.9, §6).
//!
//! Lines are `<cycle> <op> <addr>` with `op` in `{0,1,2}` for
//! read/write/ifetch and `addr` as bare or `0x`-prefixed hex. Requests are
//! expected monotonically non-decreasing in `cycle`; the parser does not
//! enforce that, it only reports malformed lines.

use std::io::BufRead;

use crate::common::{SimError, SimResult};
use crate::config::DimmGeometry;
use crate::core::bank::Operation;
use crate::core::decode::decode;
use crate::core::request::Request;

/// Reads trace lines from any [`BufRead`], yielding [`Request`] values with
/// their address already decoded.
#[derive(Debug)]
pub struct Parser<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
    pending: Option<Request>,
    exhausted: bool,
    column_low_bits: u32,
}

impl<R: BufRead> Parser<R> {
    /// Builds a parser over `reader`, decoding addresses with `geometry`.
    pub fn new(reader: R, geometry: &DimmGeometry) -> SimResult<Self> {
        let mut parser = Self {
            lines: reader.lines(),
            line_number: 0,
            pending: None,
            exhausted: false,
            column_low_bits: geometry.column_low_bits,
        };
        parser.fill(geometry)?;
        Ok(parser)
    }

    /// True once the underlying reader and the one-request lookahead are
    /// both spent.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pending.is_none()
    }

    /// The arrival time of the buffered next request, if any. Used by the
    /// driver's time-skip: when the queue is empty, the clock can jump
    /// straight to this time instead of ticking one cycle at a time.
    #[must_use]
    pub fn peek_next_time(&self) -> Option<u64> {
        self.pending.as_ref().map(|r| r.time)
    }

    /// Returns the buffered request if its arrival time has come, leaving
    /// it buffered (and refilling the lookahead) otherwise.
    pub fn next_request(&mut self, cycle: u64, geometry: &DimmGeometry) -> SimResult<Option<Request>> {
        let ready = matches!(&self.pending, Some(r) if r.time <= cycle);
        if !ready {
            return Ok(None);
        }
        let request = self.pending.take();
        self.fill(geometry)?;
        Ok(request)
    }

    fn fill(&mut self, geometry: &DimmGeometry) -> SimResult<()> {
        loop {
            let Some(line) = self.lines.next() else {
                self.exhausted = true;
                self.pending = None;
                return Ok(());
            };
            self.line_number += 1;
            let line = line.map_err(SimError::Io)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.pending = Some(parse_line(trimmed, self.line_number, geometry, self.column_low_bits)?);
            return Ok(());
        }
    }
}

fn parse_line(line: &str, line_number: usize, geometry: &DimmGeometry, column_low_bits: u32) -> SimResult<Request> {
    let mut fields = line.split_whitespace();

    let cycle = fields
        .next()
        .ok_or_else(|| malformed(line_number, "missing cycle field"))?
        .parse::<u64>()
        .map_err(|_| malformed(line_number, "cycle is not a valid integer"))?;

    let op_field = fields.next().ok_or_else(|| malformed(line_number, "missing operation field"))?;
    let operation = match op_field.parse::<u8>() {
        Ok(0) => Operation::Read,
        Ok(1) => Operation::Write,
        Ok(2) => Operation::IFetch,
        _ => return Err(malformed(line_number, "operation must be 0 (read), 1 (write), or 2 (ifetch)")),
    };

    let addr_field = fields.next().ok_or_else(|| malformed(line_number, "missing address field"))?;
    let addr_digits = addr_field.strip_prefix("0x").or_else(|| addr_field.strip_prefix("0X")).unwrap_or(addr_field);
    let addr = u64::from_str_radix(addr_digits, 16).map_err(|_| malformed(line_number, "address is not valid hex"))?;

    let decoded = decode(addr, geometry);
    Ok(Request::new(cycle, 0, operation, &decoded, column_low_bits))
}

fn malformed(line: usize, reason: &str) -> SimError {
    SimError::TraceParse { line, reason: reason.to_string() }
}
