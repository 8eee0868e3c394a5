//! Kill loot.
//!
//! A monster's loot is rolled exactly once, on the hit that kills it: gold
//! from the archetype's range, the archetype's weapon at a fixed chance, and
//! a gem at the archetype's chance. Gems from monsters are capped per session
//! and stop once the player holds the maximum.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::abilities::Element;
use crate::constants::{MAX_GEMS, WEAPON_DROP_CHANCE};
use crate::equipment::WeaponId;
use crate::monster::MonsterArchetype;
use crate::player::Player;
use crate::rng::RandomSource;

/// Raw drop roll, before caps and ownership are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootRoll {
    pub gold: u32,
    pub weapon: Option<WeaponId>,
    pub gem: bool,
}

/// Roll an archetype's drops. Weapon and gem chances are only drawn for
/// archetypes that can drop them.
pub fn roll_loot(archetype: &MonsterArchetype, rng: &mut dyn RandomSource) -> LootRoll {
    let (min, max) = archetype.gold;
    let gold = rng.range_u32(min, max);
    let weapon = archetype
        .weapon_drop
        .filter(|_| rng.chance(WEAPON_DROP_CHANCE));
    let gem = archetype.gem_chance > 0.0 && rng.chance(archetype.gem_chance);
    LootRoll { gold, weapon, gem }
}

/// A gem the player actually received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemGrant {
    /// Element unlocked by this gem, if any remained
    pub unlocked: Option<Element>,
    pub total: u8,
}

/// What the player received from one kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootGrant {
    pub gold: u32,
    /// Only set when the weapon was new to the player
    pub weapon: Option<WeaponId>,
    pub gem: Option<GemGrant>,
}

/// Tracks the session-wide monster gem cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootLedger {
    gem_cap: u8,
    gems_dropped: u8,
}

impl LootLedger {
    pub fn new(gem_cap: u8) -> Self {
        Self {
            gem_cap,
            gems_dropped: 0,
        }
    }

    pub fn gems_dropped(&self) -> u8 {
        self.gems_dropped
    }

    /// Hand a rolled drop to the player.
    pub fn grant(&mut self, roll: LootRoll, player: &mut Player) -> LootGrant {
        player.inventory.add_gold(roll.gold);
        let weapon = roll.weapon.filter(|&w| player.add_weapon(w));

        let gem = if roll.gem && self.gems_dropped < self.gem_cap && player.gems() < MAX_GEMS {
            self.gems_dropped += 1;
            let unlocked = player.collect_gem();
            Some(GemGrant {
                unlocked,
                total: player.gems(),
            })
        } else {
            None
        };

        info!(gold = roll.gold, ?weapon, gem = gem.is_some(), "loot granted");
        LootGrant {
            gold: roll.gold,
            weapon,
            gem,
        }
    }
}
