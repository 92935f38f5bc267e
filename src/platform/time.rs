//! Frame timing
//!
//! The browser hands us variable frame deltas; the simulation wants whole
//! fixed ticks, and the spawners want real-time intervals.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta we accept before clamping (tab switches, debugger stalls)
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame delta (seconds) and get the number of ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        // Drop the backlog rather than spiral
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// A periodic real-time timer, like `setInterval`
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    elapsed_ms: f64,
}

impl Interval {
    /// Fires owed after a long stall are capped to this many
    pub const MAX_CATCH_UP: u32 = 3;

    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms` and return how many times the interval fired
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        self.elapsed_ms += dt_ms.max(0.0);
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired.min(Self::MAX_CATCH_UP)
    }
}
