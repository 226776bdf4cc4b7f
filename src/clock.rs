//! Fixed-timestep accumulator between host frames and physics steps.

use log::trace;

use crate::config::TIMESTEP;
use crate::error::LanyardError;

/// Slack that absorbs float drift when frames match the timestep exactly.
const DRIFT: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    timestep: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedClock {
    pub fn new(timestep: f32, max_steps: u32) -> Result<Self, LanyardError> {
        if !(timestep.is_finite() && timestep > 0.0) {
            return Err(LanyardError::InvalidTimestep(timestep));
        }
        Ok(FixedClock { timestep, max_steps: max_steps.max(1), accumulator: 0.0 })
    }

    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Add a frame's delta and return how many whole steps to run. Time
    /// beyond `max_steps` is dropped so a stalled tab does not spiral.
    pub fn advance(&mut self, delta: f32) -> u32 {
        if delta.is_finite() && delta > 0.0 {
            self.accumulator += delta;
        }
        let mut steps = 0;
        while self.accumulator + DRIFT >= self.timestep && steps < self.max_steps {
            self.accumulator -= self.timestep;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.timestep {
            trace!("dropping {}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        FixedClock { timestep: TIMESTEP, max_steps: 5, accumulator: 0.0 }
    }
}
