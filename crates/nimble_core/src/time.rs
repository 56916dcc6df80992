//! Tick timing for play mode.
//!
//! `Time` is the per-tick snapshot handed to processors.  A [`TimeClock`]
//! produces snapshots from wall time; a [`FixedStep`] turns elapsed wall
//! time into a whole number of fixed simulation steps.
//!
//! # Example
//! ```rust,ignore
//! let mut clock = TimeClock::new();
//! let mut steps = FixedStep::new(1.0 / 60.0);
//! loop {
//!     let time = clock.tick();
//!     for _ in 0..steps.advance(time.delta) {
//!         session.tick(steps.step());
//!     }
//! }
//! ```

use std::time::Instant;

/// Largest delta a single tick may report.
pub const MAX_DELTA: f32 = 0.1;

/// A snapshot of timing information for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds since the previous tick, clamped to [`MAX_DELTA`].
    pub delta: f32,
    /// Total seconds since the clock started.
    pub elapsed: f64,
    /// Ticks before this one.
    pub frame_count: u64,
}

impl Time {
    /// Snapshot for a simulated tick of length `delta` after `frame_count`
    /// earlier ticks of the same length.
    pub fn fixed(delta: f32, frame_count: u64) -> Self {
        Self {
            delta,
            elapsed: delta as f64 * frame_count as f64,
            frame_count,
        }
    }

    #[inline]
    pub fn clamped_delta(&self, max_dt: f32) -> f32 {
        self.delta.min(max_dt)
    }

    pub fn fps(&self) -> f32 {
        if self.delta > 0.0 {
            1.0 / self.delta
        } else {
            0.0
        }
    }
}

// ─── Clock ─────────────────────────────────────────────────────────────────

/// Wall-clock timer producing [`Time`] snapshots.
pub struct TimeClock {
    start: Instant,
    last_tick: Instant,
    frame_count: u64,
}

impl TimeClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Current snapshot without advancing the clock.
    pub fn peek(&self) -> Time {
        self.snapshot(Instant::now())
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> Time {
        let now = Instant::now();
        let time = self.snapshot(now);
        self.last_tick = now;
        self.frame_count += 1;
        time
    }

    fn snapshot(&self, now: Instant) -> Time {
        Time {
            delta: (now - self.last_tick).as_secs_f32().min(MAX_DELTA),
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
        }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Fixed step ────────────────────────────────────────────────────────────

/// Accumulates wall time and releases it in whole fixed steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            accumulator: 0.0,
            max_steps: 8,
        }
    }

    /// Cap on steps per [`advance`](Self::advance); excess time is dropped.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `delta` seconds and return how many steps are now due.
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);
        let due = (self.accumulator / self.step).floor() as u32;
        let steps = due.min(self.max_steps);
        if due > self.max_steps {
            self.accumulator = 0.0;
        } else {
            self.accumulator -= steps as f32 * self.step;
        }
        steps
    }

    /// Fraction of a step left over, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
