//! Throughput tracking
//!
//! Every [`BATCH_SIZE`] records one tick is written to the diagnostic stream.
//! After [`TICKS_PER_LINE`] ticks the line is closed with the cumulative count.

use std::io::Write;
use std::time::{Duration, Instant};
use tracing::info;

/// Records per tick
pub const BATCH_SIZE: u64 = 100;

/// Ticks per diagnostic line
pub const TICKS_PER_LINE: u64 = 50;

/// Final counts of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSummary {
    pub records: u64,
    pub elapsed: Duration,
}

impl ProgressSummary {
    /// Records per second, zero for an instantaneous run
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

/// Counts emitted records and draws tick lines
pub struct ProgressTracker {
    count: u64,
    started: Instant,
    ticks: bool,
    quiet: bool,
    out: Box<dyn Write + Send>,
}

impl ProgressTracker {
    /// Tracker drawing ticks on stderr
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Tracker drawing ticks on the given stream
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            count: 0,
            started: Instant::now(),
            ticks: true,
            quiet: false,
            out,
        }
    }

    /// Suppress all diagnostic output
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Enable or disable tick marks; counting continues either way
    #[must_use]
    pub fn ticks(mut self, ticks: bool) -> Self {
        self.ticks = ticks;
        self
    }

    /// Records counted so far
    pub fn count(&self) -> u64 {
        self.count
    }

    fn drawing(&self) -> bool {
        self.ticks && !self.quiet
    }

    /// Record one successful emission
    pub fn advance(&mut self) {
        self.count += 1;
        if !self.drawing() || self.count % BATCH_SIZE != 0 {
            return;
        }
        // Diagnostics never fail the run
        let _ = self.out.write_all(b".");
        if self.count % (BATCH_SIZE * TICKS_PER_LINE) == 0 {
            let _ = writeln!(self.out, " {:8} records", self.count);
        }
        let _ = self.out.flush();
    }

    /// Close any partial tick line and log the summary
    pub fn finish(&mut self) -> ProgressSummary {
        let summary = ProgressSummary {
            records: self.count,
            elapsed: self.started.elapsed(),
        };
        if self.drawing() {
            let ticks = (self.count / BATCH_SIZE) % TICKS_PER_LINE;
            if ticks > 0 {
                let pad = " ".repeat((TICKS_PER_LINE - ticks) as usize);
                let _ = writeln!(self.out, "{pad} {:8} records", self.count);
                let _ = self.out.flush();
            }
        }
        if !self.quiet {
            info!(
                "Done {} records in {:?}, {:.6} records/sec",
                summary.records,
                summary.elapsed,
                summary.rate()
            );
        }
        summary
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
