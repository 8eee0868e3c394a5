//! Player character.
//!
//! Owns movement, mana, combat timers and the current melee swing. Every
//! action that can be refused returns `Result<_, ActionError>`; refusals never
//! change state.

pub mod inventory;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::abilities::{Element, ElementUnlocks};
use crate::combat::TargetRef;
use crate::constants::{
    ELEMENT_COOLDOWN_SECS, KNOCKBACK_DECAY, PLAYER_COLLISION_MARGIN, PLAYER_FLASH_SECS,
    PLAYER_IFRAMES_SECS, PLAYER_KNOCKBACK, PLAYER_MANA_REGEN, PLAYER_MAX_HEALTH,
    PLAYER_MAX_MANA, PLAYER_RADIUS, PLAYER_SPEED, RANGED_COOLDOWN_SECS, SWING_WINDOW_SECS,
};
use crate::equipment::{WeaponId, WeaponSpec};
use crate::math::{decay_knockback, dir_to_angle, normalize_or_zero};
use crate::timer::Countdown;
use crate::world::{move_with_collision, CollisionProbe, WorldQuery};
pub use inventory::Inventory;

/// Why a player action was refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum ActionError {
    #[error("action is on cooldown")]
    OnCooldown,
    #[error("not enough mana: have {have:.0}, need {need:.0}")]
    InsufficientMana { have: f32, need: f32 },
    #[error("no arrows left")]
    NoAmmunition,
    #[error("no element selected")]
    NoElementSelected,
    #[error("{0:?} has not been unlocked")]
    ElementLocked(Element),
    #[error("not enough gold: have {have}, need {need}")]
    NotEnoughGold { have: u32, need: u32 },
    #[error("{0:?} is already owned")]
    AlreadyOwned(WeaponId),
    #[error("the shop does not sell that")]
    NotInStock,
    #[error("no shop within reach")]
    NoShopNearby,
    #[error("{0:?} is not owned")]
    WeaponNotOwned(WeaponId),
}

/// One melee swing. The angle is frozen when the swing starts and every
/// target can be struck at most once while the window is open.
#[derive(Debug, Clone)]
pub struct ActiveSwing {
    pub angle: f32,
    window: Countdown,
    hits: HashSet<TargetRef>,
}

impl ActiveSwing {
    fn new(angle: f32) -> Self {
        Self {
            angle,
            window: Countdown::started(SWING_WINDOW_SECS),
            hits: HashSet::new(),
        }
    }

    pub fn already_hit(&self, target: TargetRef) -> bool {
        self.hits.contains(&target)
    }

    /// Record a strike. Returns false if the target was already struck.
    pub fn mark_hit(&mut self, target: TargetRef) -> bool {
        self.hits.insert(target)
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}

/// Arrow requested by the player, to be spawned by the combat engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShot {
    pub origin: Vec2,
    pub direction: Vec2,
    pub infused: Option<Element>,
}

/// Result of `Player::take_damage`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageResult {
    /// Health was reduced by `amount`
    Applied { amount: f32 },
    /// A shield charge absorbed the hit
    Shielded,
    /// Invincibility frames were active
    Ignored,
}

impl DamageResult {
    pub fn landed(&self) -> bool {
        matches!(self, DamageResult::Applied { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub knockback: Vec2,
    /// Unit vector, updated only while moving
    pub facing: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub radius: f32,
    pub inventory: Inventory,
    pub elements: ElementUnlocks,
    pub active_element: Option<Element>,
    pub monsters_killed: u32,
    attack_cooldown: Countdown,
    ranged_cooldown: Countdown,
    element_cooldown: Countdown,
    invincibility: Countdown,
    flash: Countdown,
    swing: Option<ActiveSwing>,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            knockback: Vec2::ZERO,
            facing: Vec2::Y,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            mana: PLAYER_MAX_MANA,
            max_mana: PLAYER_MAX_MANA,
            radius: PLAYER_RADIUS,
            inventory: Inventory::default(),
            elements: ElementUnlocks::default(),
            active_element: None,
            monsters_killed: 0,
            attack_cooldown: Countdown::idle(),
            ranged_cooldown: Countdown::idle(),
            element_cooldown: Countdown::idle(),
            invincibility: Countdown::idle(),
            flash: Countdown::idle(),
            swing: None,
        }
    }

    // =====================================================
    // Per-frame update
    // =====================================================

    /// Move by the input axis, apply knockback, regenerate mana and advance
    /// every timer once.
    pub fn update(&mut self, dt: f32, axis: Vec2, world: &dyn WorldQuery) {
        let dir = normalize_or_zero(axis);
        if dir != Vec2::ZERO {
            self.facing = dir;
        }

        let velocity = dir * PLAYER_SPEED + self.knockback;
        self.knockback = decay_knockback(self.knockback, KNOCKBACK_DECAY, dt);

        let probe = CollisionProbe::Box(self.radius * PLAYER_COLLISION_MARGIN);
        self.position = move_with_collision(world, self.position, velocity * dt, probe);

        let extent = world.extent();
        self.position.x = self.position.x.clamp(self.radius, (extent.x - self.radius).max(self.radius));
        self.position.y = self.position.y.clamp(self.radius, (extent.y - self.radius).max(self.radius));

        self.mana = (self.mana + PLAYER_MANA_REGEN * dt).min(self.max_mana);

        self.invincibility.tick(dt);
        self.attack_cooldown.tick(dt);
        self.ranged_cooldown.tick(dt);
        self.element_cooldown.tick(dt);
        self.flash.tick(dt);

        if let Some(swing) = self.swing.as_mut() {
            if swing.window.tick(dt) {
                self.swing = None;
            }
        }
    }

    // =====================================================
    // Actions
    // =====================================================

    /// Start a melee swing along the current facing.
    pub fn begin_swing(&mut self) -> Result<f32, ActionError> {
        if self.attack_cooldown.is_active() {
            return Err(ActionError::OnCooldown);
        }
        let angle = dir_to_angle(self.facing);
        self.attack_cooldown.set(self.weapon().swing_cooldown());
        self.swing = Some(ActiveSwing::new(angle));
        Ok(angle)
    }

    pub fn is_attacking(&self) -> bool {
        self.swing.is_some()
    }

    pub fn swing(&self) -> Option<&ActiveSwing> {
        self.swing.as_ref()
    }

    pub fn swing_mut(&mut self) -> Option<&mut ActiveSwing> {
        self.swing.as_mut()
    }

    /// Loose an arrow along the current facing.
    pub fn fire_arrow(&mut self) -> Result<ArrowShot, ActionError> {
        if self.inventory.arrows == 0 {
            return Err(ActionError::NoAmmunition);
        }
        if self.ranged_cooldown.is_active() {
            return Err(ActionError::OnCooldown);
        }
        self.inventory.take_arrow()?;
        self.ranged_cooldown.set(RANGED_COOLDOWN_SECS);
        Ok(ArrowShot {
            origin: self.position,
            direction: self.facing,
            infused: self.active_element,
        })
    }

    /// Toggle the active element. Returns the new selection.
    pub fn select_element(&mut self, element: Element) -> Result<Option<Element>, ActionError> {
        if !self.elements.is_unlocked(element) {
            return Err(ActionError::ElementLocked(element));
        }
        self.active_element = if self.active_element == Some(element) {
            None
        } else {
            Some(element)
        };
        Ok(self.active_element)
    }

    /// Spend mana for the active element and start the shared cooldown.
    pub fn cast_element(&mut self) -> Result<Element, ActionError> {
        let element = self.active_element.ok_or(ActionError::NoElementSelected)?;
        let cost = element.spec().mana_cost;
        if self.mana < cost {
            return Err(ActionError::InsufficientMana {
                have: self.mana,
                need: cost,
            });
        }
        if self.element_cooldown.is_active() {
            return Err(ActionError::OnCooldown);
        }
        self.mana -= cost;
        self.element_cooldown.set(ELEMENT_COOLDOWN_SECS);
        Ok(element)
    }

    // =====================================================
    // Damage, healing and pickups
    // =====================================================

    /// Apply a hit from a source at `from`.
    pub fn take_damage(&mut self, amount: f32, from: Vec2) -> DamageResult {
        if self.invincibility.is_active() {
            return DamageResult::Ignored;
        }
        if self.inventory.consume_shield() {
            return DamageResult::Shielded;
        }
        let amount = amount.max(0.0);
        self.health = (self.health - amount).max(0.0);
        self.invincibility.set(PLAYER_IFRAMES_SECS);
        self.flash.set(PLAYER_FLASH_SECS);
        self.knockback = normalize_or_zero(self.position - from) * PLAYER_KNOCKBACK;
        DamageResult::Applied { amount }
    }

    /// Restore health up to the maximum. Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    pub fn restore_mana(&mut self, amount: f32) -> f32 {
        let before = self.mana;
        self.mana = (self.mana + amount.max(0.0)).min(self.max_mana);
        self.mana - before
    }

    /// Count a gem and unlock the next element, if any remain.
    pub fn collect_gem(&mut self) -> Option<Element> {
        self.inventory.add_gem();
        self.elements.unlock_next()
    }

    pub fn add_weapon(&mut self, weapon: WeaponId) -> bool {
        self.inventory.add_weapon(weapon)
    }

    pub fn equip_weapon(&mut self, weapon: WeaponId) -> Result<(), ActionError> {
        self.inventory.equip(weapon)
    }

    pub fn weapon(&self) -> &'static WeaponSpec {
        self.inventory.weapon()
    }

    pub fn gems(&self) -> u8 {
        self.inventory.gems()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    pub fn element_cooldown(&self) -> f32 {
        self.element_cooldown.remaining()
    }
}
