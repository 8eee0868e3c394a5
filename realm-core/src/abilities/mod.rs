//! Elemental abilities
//!
//! Four elements are unlocked by collecting gems, always in the same order:
//! Fire → Water → Ice → Lightning. Each has a distinct effect shape, resolved
//! in `combat::elements`; this module only holds the stat table and the
//! player's unlock progress.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FIRE_HALF_ANGLE, FIRE_RADIUS, ICE_RADIUS, ICE_SLOW_FACTOR, ICE_SLOW_SECS, LIGHTNING_RADIUS,
    WATER_RADIUS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Ice,
    Lightning,
}

impl Element {
    /// Gem unlock order
    pub const UNLOCK_ORDER: [Element; 4] =
        [Element::Fire, Element::Water, Element::Ice, Element::Lightning];

    pub fn spec(&self) -> &'static ElementSpec {
        match self {
            Element::Fire => &FIRE,
            Element::Water => &WATER,
            Element::Ice => &ICE,
            Element::Lightning => &LIGHTNING,
        }
    }

    /// Hotkey slot (0-based) used by input intents.
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::UNLOCK_ORDER.get(slot).copied()
    }
}

/// Shape of an elemental effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementShape {
    /// Damage targets within `radius` whose bearing lies strictly inside
    /// `half_angle` of the caster's facing
    Cone { radius: f32, half_angle: f32 },
    /// Heal the caster, damage every target within `radius`
    HealRing { radius: f32, heal: f32 },
    /// Damage every target within `radius` and slow it
    SlowBurst {
        radius: f32,
        slow_secs: f32,
        slow_factor: f32,
    },
    /// Strike the single nearest target within `radius`
    NearestStrike { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSpec {
    pub element: Element,
    pub name: &'static str,
    pub damage: u32,
    pub mana_cost: f32,
    pub shape: ElementShape,
    /// Visual lifetime of the cast effect
    pub effect_secs: f32,
}

static FIRE: ElementSpec = ElementSpec {
    element: Element::Fire,
    name: "Fire",
    damage: 25,
    mana_cost: 20.0,
    shape: ElementShape::Cone {
        radius: FIRE_RADIUS,
        half_angle: FIRE_HALF_ANGLE,
    },
    effect_secs: 1.0,
};

static WATER: ElementSpec = ElementSpec {
    element: Element::Water,
    name: "Water",
    damage: 15,
    mana_cost: 15.0,
    shape: ElementShape::HealRing {
        radius: WATER_RADIUS,
        heal: 20.0,
    },
    effect_secs: 0.8,
};

static ICE: ElementSpec = ElementSpec {
    element: Element::Ice,
    name: "Ice",
    damage: 20,
    mana_cost: 18.0,
    shape: ElementShape::SlowBurst {
        radius: ICE_RADIUS,
        slow_secs: ICE_SLOW_SECS,
        slow_factor: ICE_SLOW_FACTOR,
    },
    effect_secs: 1.2,
};

static LIGHTNING: ElementSpec = ElementSpec {
    element: Element::Lightning,
    name: "Lightning",
    damage: 35,
    mana_cost: 30.0,
    shape: ElementShape::NearestStrike {
        radius: LIGHTNING_RADIUS,
    },
    effect_secs: 0.6,
};

/// Which elements a player has unlocked, plus the next one in line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementUnlocks {
    next_index: usize,
}

impl ElementUnlocks {
    /// Unlock the next element in order. `None` once all four are unlocked.
    pub fn unlock_next(&mut self) -> Option<Element> {
        let element = Element::UNLOCK_ORDER.get(self.next_index).copied()?;
        self.next_index += 1;
        Some(element)
    }

    pub fn is_unlocked(&self, element: Element) -> bool {
        Element::UNLOCK_ORDER[..self.next_index].contains(&element)
    }

    pub fn unlocked(&self) -> &'static [Element] {
        &Element::UNLOCK_ORDER[..self.next_index]
    }

    pub fn count(&self) -> usize {
        self.next_index
    }
}
