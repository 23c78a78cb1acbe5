//! Cadence: fixed-interval pacing for worker loops.
//!
//! Each worker sleeps on its own cadence, so physics, scrolling and drawing
//! run at independent rates. A worker that falls behind skips the missed
//! ticks instead of bursting to catch up.

use std::thread;
use std::time::{Duration, Instant};

/// Sleep-based tick pacing.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    next_tick: Instant,
    ticks: u64,
}

impl Cadence {
    /// Start a cadence whose first deadline is one interval from now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: Instant::now() + interval,
            ticks: 0,
        }
    }

    /// Time between ticks.
    #[inline]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks completed so far.
    #[inline]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sleep until the next deadline.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next_tick > now {
            thread::sleep(self.next_tick - now);
        }
        self.ticks += 1;
        self.next_tick += self.interval;

        // Handle case where we're behind (catch up without queuing)
        let now = Instant::now();
        if self.next_tick < now {
            self.next_tick = now + self.interval;
        }
    }
}
