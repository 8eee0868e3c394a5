//! Named countdown timers.
//!
//! A `Countdown` is active while its remaining time is above zero and is
//! advanced exactly once per tick by its owner.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn started(secs: f32) -> Self {
        Self {
            remaining: secs.max(0.0),
        }
    }

    pub fn set(&mut self, secs: f32) {
        self.remaining = secs.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt`. Returns true on the tick the timer runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_ready(&self) -> bool {
        !self.is_active()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
