//! Carried goods: weapons, gold, arrows, gems and shield charges.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ActionError;
use crate::constants::{MAX_GEMS, PLAYER_START_ARROWS, PLAYER_START_GOLD};
use crate::equipment::{WeaponId, WeaponSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    weapons: BTreeSet<WeaponId>,
    equipped: WeaponId,
    pub gold: u32,
    pub arrows: u32,
    gems: u8,
    pub shield_charges: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            weapons: BTreeSet::from([WeaponId::RustySword]),
            equipped: WeaponId::RustySword,
            gold: PLAYER_START_GOLD,
            arrows: PLAYER_START_ARROWS,
            gems: 0,
            shield_charges: 0,
        }
    }
}

impl Inventory {
    /// Add a weapon. Returns false if it was already owned.
    pub fn add_weapon(&mut self, weapon: WeaponId) -> bool {
        self.weapons.insert(weapon)
    }

    pub fn equip(&mut self, weapon: WeaponId) -> Result<(), ActionError> {
        if !self.weapons.contains(&weapon) {
            return Err(ActionError::WeaponNotOwned(weapon));
        }
        self.equipped = weapon;
        Ok(())
    }

    pub fn owns(&self, weapon: WeaponId) -> bool {
        self.weapons.contains(&weapon)
    }

    pub fn weapons(&self) -> impl Iterator<Item = WeaponId> + '_ {
        self.weapons.iter().copied()
    }

    pub fn equipped(&self) -> WeaponId {
        self.equipped
    }

    pub fn weapon(&self) -> &'static WeaponSpec {
        self.equipped.spec()
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), ActionError> {
        if self.gold < amount {
            return Err(ActionError::NotEnoughGold {
                have: self.gold,
                need: amount,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn take_arrow(&mut self) -> Result<(), ActionError> {
        if self.arrows == 0 {
            return Err(ActionError::NoAmmunition);
        }
        self.arrows -= 1;
        Ok(())
    }

    pub fn add_arrows(&mut self, count: u32) {
        self.arrows = self.arrows.saturating_add(count);
    }

    pub fn gems(&self) -> u8 {
        self.gems
    }

    /// Count one more gem, saturating at the maximum.
    pub fn add_gem(&mut self) -> u8 {
        self.gems = (self.gems + 1).min(MAX_GEMS);
        self.gems
    }

    /// Consume one shield charge if any. Returns true when a hit was absorbed.
    pub fn consume_shield(&mut self) -> bool {
        if self.shield_charges == 0 {
            return false;
        }
        self.shield_charges -= 1;
        true
    }
}
