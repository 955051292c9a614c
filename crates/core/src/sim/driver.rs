//! The simulation driver (spec §5): the tick loop that ties the trace
//! parser, the request queue, the DIMM state machine, and the command sink
//! together.
//!
//! Ordering within one CPU clock tick is fixed: (1) draw the next arrival
//! if none is buffered; (2) on even (DRAM) ticks, if the queue is
//! non-empty, run the policy once (which ages every queued request once
//! as part of its own tick); (3) if an arrival is buffered and the queue
//! has room, admit it; (4) terminate once the trace is exhausted and the
//! queue is empty; (5) advance the clock, skipping straight to the next
//! arrival's time when the queue is idle.

use std::io::{BufRead, Write};

use crate::common::SimResult;
use crate::config::Config;
use crate::core::dimm::Dimm;
use crate::core::policy::SchedulingPolicy;
use crate::core::queue::RequestQueue;
use crate::core::request::Request;

use super::emitter::CommandLog;
use super::trace::Parser;

/// Owns every piece of simulator state and drives it to completion.
pub struct Driver<'a, R: BufRead, W: Write> {
    parser: Parser<R>,
    dimm: Dimm,
    queue: RequestQueue,
    policy: Box<dyn SchedulingPolicy>,
    log: CommandLog<W>,
    config: &'a Config,
    clock: u64,
    pending: Option<Request>,
}

impl<'a, R: BufRead, W: Write> Driver<'a, R, W> {
    pub fn new(parser: Parser<R>, log: CommandLog<W>, policy: Box<dyn SchedulingPolicy>, config: &'a Config) -> Self {
        Self {
            parser,
            dimm: Dimm::new(config),
            queue: RequestQueue::new(config.queue_capacity),
            policy,
            log,
            config,
            clock: 0,
            pending: None,
        }
    }

    /// Runs the simulation to completion, returning the final clock cycle.
    ///
    /// # Errors
    /// Propagates any [`crate::common::SimError`] raised by the trace
    /// parser, the state machine, or the command sink.
    pub fn run(&mut self) -> SimResult<u64> {
        loop {
            if self.pending.is_none() {
                self.pending = self.parser.next_request(self.clock, &self.config.geometry)?;
            }

            if self.clock % 2 == 0 && !self.queue.is_empty() {
                // Each SchedulingPolicy::tick already ages the queue once at
                // the end of its own body; don't age it again here.
                self.policy.tick(&mut self.dimm, &mut self.queue, self.clock, &self.config.timing, &mut self.log)?;
            }

            if self.pending.is_some() && !self.queue.is_full() {
                let req = self.pending.take().expect("checked is_some");
                self.policy.admit(&mut self.queue, req, &self.config.timing)?;
            }

            if self.parser.is_exhausted() && self.queue.is_empty() {
                break;
            }

            self.advance_clock();
        }

        self.log.flush()?;
        Ok(self.clock)
    }

    fn advance_clock(&mut self) {
        if self.queue.is_empty() {
            if let Some(next_time) = self.parser.peek_next_time() {
                if next_time > self.clock {
                    self.clock = next_time;
                    return;
                }
            }
        }
        self.clock += 1;
    }
}
