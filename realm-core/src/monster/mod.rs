//! Monsters
//!
//! One `Monster` type parameterized by an immutable per-kind
//! [`MonsterArchetype`] record. Behaviour lives in [`ai`].

pub mod ai;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combat::effects::Tint;
use crate::combat::status::SlowStatus;
use crate::combat::{Combatant, CritProfile, TargetRef};
use crate::constants::{
    MONSTER_AGGRO_RADIUS, MONSTER_ATTACK_COOLDOWN_SECS, MONSTER_ATTACK_RADIUS,
    MONSTER_CRIT_CHANCE, MONSTER_CRIT_PERCENT, MONSTER_DEATH_FADE_SECS, MONSTER_FLASH_SECS,
    MONSTER_KNOCKBACK, MONSTER_LEASH_RADIUS,
};
use crate::equipment::WeaponId;
use crate::math::normalize_or_zero;
use crate::timer::Countdown;
use crate::world::ZoneId;
pub use ai::AiState;

/// Session-unique monster handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Goblin,
    Skeleton,
    Wolf,
    Troll,
    Wraith,
    DragonWhelp,
    Bandit,
    SwampCreature,
}

/// Immutable per-kind stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterArchetype {
    pub kind: MonsterKind,
    pub name: &'static str,
    pub max_health: u32,
    pub damage: f32,
    /// Units per second
    pub speed: f32,
    pub radius: f32,
    pub aggro_radius: f32,
    pub attack_radius: f32,
    pub attack_cooldown: f32,
    pub leash_radius: f32,
    /// Inclusive gold range
    pub gold: (u32, u32),
    pub weapon_drop: Option<WeaponId>,
    /// Zero for kinds that never drop gems
    pub gem_chance: f32,
    pub zones: &'static [ZoneId],
}

const fn archetype(
    kind: MonsterKind,
    name: &'static str,
    max_health: u32,
    damage: f32,
    speed: f32,
    radius: f32,
    gold: (u32, u32),
    weapon_drop: Option<WeaponId>,
    gem_chance: f32,
    zones: &'static [ZoneId],
) -> MonsterArchetype {
    MonsterArchetype {
        kind,
        name,
        max_health,
        damage,
        speed,
        radius,
        aggro_radius: MONSTER_AGGRO_RADIUS,
        attack_radius: MONSTER_ATTACK_RADIUS,
        attack_cooldown: MONSTER_ATTACK_COOLDOWN_SECS,
        leash_radius: MONSTER_LEASH_RADIUS,
        gold,
        weapon_drop,
        gem_chance,
        zones,
    }
}

use MonsterKind::*;
use ZoneId::{Darklands, Desert, Forest, Meadow, Mountains, Ruins, Swamp};

pub static ARCHETYPES: [MonsterArchetype; 8] = [
    archetype(Goblin, "Goblin", 30, 5.0, 72.0, 12.0, (5, 15), None, 0.0, &[Meadow, Forest]),
    archetype(Skeleton, "Skeleton Knight", 50, 10.0, 60.0, 13.0, (10, 25), Some(WeaponId::IronSword), 0.2, &[Ruins, Darklands]),
    archetype(Wolf, "Dire Wolf", 35, 8.0, 120.0, 12.0, (3, 12), None, 0.0, &[Forest, Mountains]),
    archetype(Troll, "Cave Troll", 80, 15.0, 42.0, 18.0, (20, 40), Some(WeaponId::BattleAxe), 0.3, &[Mountains, Swamp]),
    archetype(Wraith, "Dark Wraith", 60, 12.0, 90.0, 14.0, (15, 35), Some(WeaponId::DarkBlade), 0.25, &[Darklands, Ruins]),
    archetype(DragonWhelp, "Dragon Whelp", 70, 18.0, 78.0, 16.0, (25, 50), Some(WeaponId::KnightsBlade), 0.35, &[Mountains, Desert]),
    archetype(Bandit, "Bandit", 40, 9.0, 84.0, 13.0, (15, 30), Some(WeaponId::Mace), 0.0, &[Forest, Meadow, Desert]),
    archetype(SwampCreature, "Swamp Creature", 45, 10.0, 54.0, 14.0, (8, 20), Some(WeaponId::Spear), 0.2, &[Swamp]),
];

impl MonsterKind {
    pub const ALL: [MonsterKind; 8] = [
        Goblin,
        Skeleton,
        Wolf,
        Troll,
        Wraith,
        DragonWhelp,
        Bandit,
        SwampCreature,
    ];

    pub fn archetype(&self) -> &'static MonsterArchetype {
        &ARCHETYPES[*self as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub position: Vec2,
    /// Anchor the monster wanders around and returns to
    pub home: Vec2,
    pub facing: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub ai: AiState,
    pub knockback: Vec2,
    pub slow: SlowStatus,
    alive: bool,
    /// Idle wait, or patrol give-up time while patrolling
    pub(crate) state_timer: Countdown,
    pub(crate) attack_cooldown: Countdown,
    flash: Countdown,
    death_fade: Countdown,
}

impl Monster {
    pub fn new(id: MonsterId, kind: MonsterKind, position: Vec2) -> Self {
        let stats = kind.archetype();
        Self {
            id,
            kind,
            position,
            home: position,
            facing: Vec2::Y,
            health: stats.max_health,
            max_health: stats.max_health,
            ai: AiState::Idle,
            knockback: Vec2::ZERO,
            slow: SlowStatus::default(),
            alive: true,
            state_timer: Countdown::idle(),
            attack_cooldown: Countdown::idle(),
            flash: Countdown::idle(),
            death_fade: Countdown::idle(),
        }
    }

    pub fn stats(&self) -> &'static MonsterArchetype {
        self.kind.archetype()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Dead and done fading; safe to remove.
    pub fn is_expired(&self) -> bool {
        !self.alive && !self.death_fade.is_active()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    /// Remaining death-fade time (0 while alive or once expired)
    pub fn fade_remaining(&self) -> f32 {
        self.death_fade.remaining()
    }

    pub(crate) fn tick_timers(&mut self, dt: f32) {
        self.flash.tick(dt);
        self.slow.tick(dt);
        self.attack_cooldown.tick(dt);
    }

    pub(crate) fn tick_death_fade(&mut self, dt: f32) {
        self.death_fade.tick(dt);
    }

    /// Current movement speed including slow.
    pub fn current_speed(&self) -> f32 {
        self.stats().speed * self.slow.speed_modifier()
    }
}

impl Combatant for Monster {
    fn target_ref(&self) -> TargetRef {
        TargetRef::Monster(self.id)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.stats().radius
    }

    fn is_targetable(&self) -> bool {
        self.alive
    }

    fn crit_profile(&self) -> CritProfile {
        CritProfile {
            chance: MONSTER_CRIT_CHANCE,
            multiplier_percent: MONSTER_CRIT_PERCENT,
        }
    }

    fn hit_tint(&self) -> (Tint, usize) {
        (Tint::Blood, 5)
    }

    fn take_hit(&mut self, damage: u32, from: Vec2) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        self.flash.set(MONSTER_FLASH_SECS);
        self.knockback = normalize_or_zero(self.position - from) * MONSTER_KNOCKBACK;
        if self.health == 0 {
            self.alive = false;
            self.death_fade.set(MONSTER_DEATH_FADE_SECS);
            self.knockback = Vec2::ZERO;
            info!(id = self.id.0, kind = ?self.kind, "monster killed");
            return true;
        }
        false
    }

    fn apply_slow(&mut self, secs: f32, factor: f32) {
        if self.alive {
            self.slow.apply(secs, factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_indexed_by_kind() {
        for kind in MonsterKind::ALL {
            assert_eq!(kind.archetype().kind, kind);
            let (lo, hi) = kind.archetype().gold;
            assert!(lo <= hi);
            assert!(!kind.archetype().zones.is_empty());
        }
    }

    #[test]
    fn test_gem_droppers() {
        assert_eq!(Goblin.archetype().gem_chance, 0.0);
        assert_eq!(DragonWhelp.archetype().gem_chance, 0.35);
        assert_eq!(Troll.archetype().weapon_drop, Some(WeaponId::BattleAxe));
    }

    #[test]
    fn test_death_reported_once() {
        let mut m = Monster::new(MonsterId(1), Goblin, Vec2::ZERO);
        assert!(!m.take_hit(20, Vec2::new(-5.0, 0.0)));
        assert_eq!(m.health, 10);
        assert!(m.take_hit(25, Vec2::ZERO));
        assert_eq!(m.health, 0);
        assert!(!m.is_alive());
        assert!(!m.take_hit(25, Vec2::ZERO));
        assert_eq!(m.health, 0);
    }

    #[test]
    fn test_knockback_away_from_source() {
        let mut m = Monster::new(MonsterId(1), Troll, Vec2::new(10.0, 0.0));
        m.take_hit(5, Vec2::ZERO);
        assert!(m.knockback.x > 0.0);
        assert_eq!(m.knockback.y, 0.0);
        assert!(m.is_flashing());
    }

    #[test]
    fn test_corpse_expires_after_fade() {
        let mut m = Monster::new(MonsterId(1), Wolf, Vec2::ZERO);
        m.take_hit(100, Vec2::ZERO);
        assert!(!m.is_expired());
        m.tick_death_fade(0.3);
        assert!(!m.is_expired());
        m.tick_death_fade(0.3);
        assert!(m.is_expired());
    }

    #[test]
    fn test_slow_reduces_speed() {
        let mut m = Monster::new(MonsterId(1), Wolf, Vec2::ZERO);
        m.apply_slow(3.0, 0.4);
        assert!((m.current_speed() - 48.0).abs() < 1e-4);
    }
}
