//! Per-frame input intent.
//!
//! The host fills an `InputIntent` from whatever device it reads. Movement
//! is held; the action flags are one-shot and are cleared after the frame
//! that consumes them.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::abilities::Element;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Raw movement axis; normalized by the player update
    pub axis: Vec2,
    pub swing: bool,
    pub fire_arrow: bool,
    pub cast: bool,
    /// Toggle this element before anything else happens this frame
    pub select: Option<Element>,
}

impl InputIntent {
    pub fn moving(axis: Vec2) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    pub fn with_swing(mut self) -> Self {
        self.swing = true;
        self
    }

    pub fn with_arrow(mut self) -> Self {
        self.fire_arrow = true;
        self
    }

    pub fn with_cast(mut self) -> Self {
        self.cast = true;
        self
    }

    pub fn selecting(mut self, element: Element) -> Self {
        self.select = Some(element);
        self
    }

    /// Element bound to a number key, 1 through 4.
    pub fn select_slot(mut self, slot: usize) -> Self {
        self.select = slot.checked_sub(1).and_then(Element::from_slot);
        self
    }

    /// Drop the one-shot actions, keeping movement.
    pub fn clear_triggers(&mut self) {
        *self = Self::moving(self.axis);
    }
}
