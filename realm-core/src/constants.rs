//! Centralized game constants for the realm simulation core.
//!
//! Eliminates magic numbers duplicated across combat, AI and orchestration.
//! Per-type stat tables (weapons, elements, monster archetypes, boss phases)
//! remain in their respective modules as the single source of truth.
//!
//! Units: world units (one tile = `TILE_SIZE` units), seconds, radians.

use std::f32::consts::PI;

// =====================================================
// World
// =====================================================

/// Edge length of one tile in world units
pub const TILE_SIZE: f32 = 32.0;

/// Reference frame length the per-frame decay factors were tuned against
pub const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

/// Largest frame delta the simulation will integrate in one update
pub const MAX_FRAME_DT: f32 = 0.05;

// =====================================================
// Player
// =====================================================

pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_MAX_MANA: f32 = 100.0;

/// Mana regained per second
pub const PLAYER_MANA_REGEN: f32 = 50.0;

/// Movement speed in units per second
pub const PLAYER_SPEED: f32 = 150.0;

/// Collision radius
pub const PLAYER_RADIUS: f32 = 14.0;

/// Fraction of the radius used for the tile collision box corners
pub const PLAYER_COLLISION_MARGIN: f32 = 0.7;

/// Invincibility after taking a hit
pub const PLAYER_IFRAMES_SECS: f32 = 0.5;

/// Base swing cooldown, divided by the weapon's speed
pub const PLAYER_ATTACK_COOLDOWN_SECS: f32 = 0.4;

/// How long one swing stays live for hit detection
pub const SWING_WINDOW_SECS: f32 = 0.2;

/// Shared cooldown after any elemental cast
pub const ELEMENT_COOLDOWN_SECS: f32 = 0.8;

/// Knockback speed applied to the player when hit
pub const PLAYER_KNOCKBACK: f32 = 360.0;

/// Damage flash duration on the player
pub const PLAYER_FLASH_SECS: f32 = 0.2;

pub const PLAYER_START_GOLD: u32 = 50;
pub const PLAYER_START_ARROWS: u32 = 15;

/// Gem count at which the gem counter saturates
pub const MAX_GEMS: u8 = 5;

// =====================================================
// Knockback
// =====================================================

/// Per-reference-frame decay for player and monster knockback
pub const KNOCKBACK_DECAY: f32 = 0.85;

/// Per-reference-frame decay for boss knockback
pub const BOSS_KNOCKBACK_DECAY: f32 = 0.9;

/// Knockback components below this magnitude snap to zero
pub const KNOCKBACK_EPSILON: f32 = 6.0;

// =====================================================
// Melee
// =====================================================

/// Half-angle of the melee arc (60 degrees, inclusive)
pub const MELEE_HALF_ARC: f32 = PI / 3.0;

/// Critical multipliers are whole percentages so flooring stays exact
pub const MONSTER_CRIT_CHANCE: f32 = 0.15;
pub const MONSTER_CRIT_PERCENT: u32 = 180;
pub const BOSS_CRIT_CHANCE: f32 = 0.12;
pub const BOSS_CRIT_PERCENT: u32 = 160;

// =====================================================
// Ranged
// =====================================================

pub const ARROW_SPEED: f32 = 420.0;
pub const ARROW_LIFETIME_SECS: f32 = 1.2;
pub const ARROW_RADIUS: f32 = 4.0;
pub const ARROW_DAMAGE: u32 = 12;

/// Extra damage carried by an arrow loosed while an element is active
pub const ARROW_INFUSED_BONUS: u32 = 6;

pub const RANGED_COOLDOWN_SECS: f32 = 0.5;

// =====================================================
// Elements
// =====================================================

/// Half-angle of the fire cone (72 degrees, exclusive)
pub const FIRE_HALF_ANGLE: f32 = PI / 2.5;
pub const FIRE_RADIUS: f32 = 100.0;
pub const FIRE_EFFECT_OFFSET: f32 = 40.0;

pub const WATER_RADIUS: f32 = 80.0;

pub const ICE_RADIUS: f32 = 120.0;
pub const ICE_EFFECT_OFFSET: f32 = 50.0;
pub const ICE_SLOW_SECS: f32 = 3.0;

/// Movement multiplier while slowed
pub const ICE_SLOW_FACTOR: f32 = 0.4;

pub const LIGHTNING_RADIUS: f32 = 200.0;

// =====================================================
// Monsters
// =====================================================

pub const MONSTER_AGGRO_RADIUS: f32 = 150.0;
pub const MONSTER_ATTACK_RADIUS: f32 = 30.0;
pub const MONSTER_ATTACK_COOLDOWN_SECS: f32 = 1.5;
pub const MONSTER_LEASH_RADIUS: f32 = 300.0;

/// Patrol targets are picked within this box around home
pub const PATROL_SPREAD: f32 = 100.0;
pub const PATROL_SPEED_MULT: f32 = 0.5;
pub const PATROL_ARRIVAL: f32 = 10.0;
pub const RETURN_ARRIVAL: f32 = 20.0;

pub const MONSTER_KNOCKBACK: f32 = 300.0;
pub const MONSTER_FLASH_SECS: f32 = 0.15;
pub const MONSTER_DEATH_FADE_SECS: f32 = 0.5;

/// Chance a kill drops the archetype's weapon
pub const WEAPON_DROP_CHANCE: f32 = 0.3;

// =====================================================
// Boss
// =====================================================

pub const BOSS_MAX_HEALTH: u32 = 500;
pub const BOSS_DAMAGE: f32 = 25.0;
pub const BOSS_SPEED: f32 = 60.0;
pub const BOSS_RADIUS: f32 = 24.0;

pub const BOSS_EMERGE_SECS: f32 = 2.0;
pub const BOSS_DEFEAT_SECS: f32 = 3.0;

pub const BOSS_CHARGE_SECS: f32 = 0.6;
pub const BOSS_CHARGE_SPEED_MULT: f32 = 4.0;
pub const BOSS_CHARGE_DAMAGE_MULT: f32 = 1.5;

/// Spin reaches this far beyond the boss radius
pub const BOSS_SPIN_REACH: f32 = 40.0;
pub const BOSS_SPIN_DAMAGE_MULT: f32 = 0.5;

/// Spin angle advance in radians per second
pub const BOSS_SPIN_RATE: f32 = 20.0;

/// Extra slack added to contact range for the plain chase pattern
pub const BOSS_CONTACT_SLACK: f32 = 10.0;

/// Proximity-hit range when a charge-pattern roll does not wind up
pub const BOSS_CLOSE_HIT_RANGE: f32 = 50.0;

pub const BOSS_KNOCKBACK: f32 = 180.0;
pub const BOSS_FLASH_SECS: f32 = 0.15;

pub const BOSS_BOLT_SPEED: f32 = 300.0;
pub const BOSS_BOLT_LIFETIME_SECS: f32 = 3.0;
pub const BOSS_BOLT_RADIUS: f32 = 8.0;
pub const BOSS_BOLT_DAMAGE: f32 = 15.0;

/// Angular offsets of the frenzy volley's side shots
pub const FRENZY_VOLLEY_SPREAD: f32 = 0.3;

// =====================================================
// Presentation
// =====================================================

pub const DAMAGE_NUMBER_SECS: f32 = 0.8;
pub const DAMAGE_NUMBER_RISE: f32 = 90.0;
pub const PARTICLE_GRAVITY: f32 = 180.0;
pub const PARTICLE_MAX_SPEED: f32 = 180.0;

/// Camera lerp factor per reference frame
pub const CAMERA_FOLLOW: f32 = 0.1;
