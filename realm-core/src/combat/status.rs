//! Timed movement debuffs.
//!
//! Ice is the only source of a status effect: a slow that scales movement
//! speed for a fixed duration. Re-applying refreshes the timer.

use serde::{Deserialize, Serialize};

use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlowStatus {
    timer: Countdown,
    factor: f32,
}

impl SlowStatus {
    pub fn apply(&mut self, secs: f32, factor: f32) {
        self.timer.set(secs);
        self.factor = factor.clamp(0.0, 1.0);
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer.tick(dt);
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Movement speed modifier (1.0 = normal)
    pub fn speed_modifier(&self) -> f32 {
        if self.is_active() {
            self.factor
        } else {
            1.0
        }
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }
}
