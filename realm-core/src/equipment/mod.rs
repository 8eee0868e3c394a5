//! Weapons
//!
//! Weapons carry only three combat stats: damage, swing speed and reach.
//! Swing cooldown is the base player cooldown divided by `speed`.

use serde::{Deserialize, Serialize};

use crate::constants::PLAYER_ATTACK_COOLDOWN_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponId {
    RustySword,
    IronSword,
    BattleAxe,
    KnightsBlade,
    Excalibur,
    Mace,
    Spear,
    DarkBlade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub id: WeaponId,
    pub name: &'static str,
    pub damage: u32,
    pub speed: f32,
    pub range: f32,
    /// Shop price in gold, `None` if the weapon is never sold
    pub price: Option<u32>,
}

impl WeaponSpec {
    pub fn swing_cooldown(&self) -> f32 {
        PLAYER_ATTACK_COOLDOWN_SECS / self.speed
    }
}

pub const WEAPONS: [WeaponSpec; 8] = [
    WeaponSpec { id: WeaponId::RustySword, name: "Rusty Sword", damage: 8, speed: 1.0, range: 28.0, price: None },
    WeaponSpec { id: WeaponId::IronSword, name: "Iron Sword", damage: 14, speed: 1.0, range: 30.0, price: Some(80) },
    WeaponSpec { id: WeaponId::BattleAxe, name: "Battle Axe", damage: 22, speed: 0.7, range: 26.0, price: Some(150) },
    WeaponSpec { id: WeaponId::KnightsBlade, name: "Knight's Blade", damage: 20, speed: 1.1, range: 32.0, price: Some(250) },
    WeaponSpec { id: WeaponId::Excalibur, name: "Excalibur", damage: 30, speed: 1.2, range: 36.0, price: None },
    WeaponSpec { id: WeaponId::Mace, name: "War Mace", damage: 18, speed: 0.8, range: 24.0, price: Some(120) },
    WeaponSpec { id: WeaponId::Spear, name: "Long Spear", damage: 16, speed: 1.0, range: 42.0, price: Some(100) },
    WeaponSpec { id: WeaponId::DarkBlade, name: "Dark Blade", damage: 26, speed: 1.1, range: 34.0, price: None },
];

impl WeaponId {
    pub const ALL: [WeaponId; 8] = [
        WeaponId::RustySword,
        WeaponId::IronSword,
        WeaponId::BattleAxe,
        WeaponId::KnightsBlade,
        WeaponId::Excalibur,
        WeaponId::Mace,
        WeaponId::Spear,
        WeaponId::DarkBlade,
    ];

    pub fn spec(&self) -> &'static WeaponSpec {
        &WEAPONS[*self as usize]
    }
}
