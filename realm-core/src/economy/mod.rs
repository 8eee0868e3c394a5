//! Shops and their stock.
//!
//! Three fixed shops sell weapons and consumables. Consumables take effect
//! the moment they are bought; weapons are added to the inventory and
//! equipped.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::equipment::WeaponId;
use crate::math::tile_center;
use crate::player::{ActionError, Player};

/// Consumables sold over the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Potion {
    Health,
    GreaterHealth,
    ManaCrystal,
    ShieldRune,
    ArrowBundle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PotionEffect {
    Heal(f32),
    Mana(f32),
    /// Sets the shield to this many absorbed hits
    Shield(u32),
    Arrows(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotionSpec {
    pub name: &'static str,
    pub price: u32,
    pub effect: PotionEffect,
}

impl Potion {
    pub fn spec(&self) -> PotionSpec {
        let (name, price, effect) = match self {
            Self::Health => ("Health Potion", 25, PotionEffect::Heal(40.0)),
            Self::GreaterHealth => ("Greater Health Potion", 60, PotionEffect::Heal(80.0)),
            Self::ManaCrystal => ("Mana Crystal", 30, PotionEffect::Mana(30.0)),
            Self::ShieldRune => ("Shield Rune", 50, PotionEffect::Shield(1)),
            Self::ArrowBundle => ("Arrow Bundle", 20, PotionEffect::Arrows(10)),
        };
        PotionSpec { name, price, effect }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    Weapon(WeaponId),
    Potion(Potion),
}

impl ShopItem {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weapon(w) => w.spec().name,
            Self::Potion(p) => p.spec().name,
        }
    }

    /// Price in gold. Weapons that are never sold have none.
    pub fn price(&self) -> Option<u32> {
        match self {
            Self::Weapon(w) => w.spec().price,
            Self::Potion(p) => Some(p.spec().price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shop {
    pub name: &'static str,
    pub tile: (i32, i32),
    pub stock: &'static [ShopItem],
}

impl Shop {
    pub fn position(&self) -> Vec2 {
        tile_center(self.tile.0, self.tile.1)
    }

    pub fn sells(&self, item: ShopItem) -> bool {
        self.stock.contains(&item)
    }
}

pub static SHOPS: [Shop; 3] = [
    Shop {
        name: "Camelot Armory",
        tile: (15, 60),
        stock: &[
            ShopItem::Weapon(WeaponId::IronSword),
            ShopItem::Weapon(WeaponId::Mace),
            ShopItem::Weapon(WeaponId::Spear),
            ShopItem::Potion(Potion::Health),
            ShopItem::Potion(Potion::ManaCrystal),
            ShopItem::Potion(Potion::ArrowBundle),
        ],
    },
    Shop {
        name: "Desert Trader",
        tile: (130, 20),
        stock: &[
            ShopItem::Weapon(WeaponId::BattleAxe),
            ShopItem::Weapon(WeaponId::KnightsBlade),
            ShopItem::Potion(Potion::GreaterHealth),
            ShopItem::Potion(Potion::ShieldRune),
            ShopItem::Potion(Potion::ArrowBundle),
        ],
    },
    Shop {
        name: "Swamp Witch",
        tile: (75, 70),
        stock: &[
            ShopItem::Potion(Potion::Health),
            ShopItem::Potion(Potion::GreaterHealth),
            ShopItem::Potion(Potion::ManaCrystal),
            ShopItem::Potion(Potion::ShieldRune),
        ],
    },
];

/// The closest shop within `radius` of `position`.
pub fn nearest_shop(position: Vec2, radius: f32) -> Option<&'static Shop> {
    SHOPS
        .iter()
        .map(|shop| (shop, shop.position().distance(position)))
        .filter(|&(_, d)| d < radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(shop, _)| shop)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PurchaseReceipt {
    pub shop: &'static str,
    pub item: ShopItem,
    pub price: u32,
    pub gold_left: u32,
}

/// Buy `item` from `shop`. Nothing changes on refusal.
pub fn purchase(
    shop: &Shop,
    item: ShopItem,
    player: &mut Player,
) -> Result<PurchaseReceipt, ActionError> {
    if !shop.sells(item) {
        return Err(ActionError::NotInStock);
    }
    let price = item.price().ok_or(ActionError::NotInStock)?;
    if let ShopItem::Weapon(weapon) = item {
        if player.inventory.owns(weapon) {
            return Err(ActionError::AlreadyOwned(weapon));
        }
    }
    player.inventory.spend_gold(price)?;

    match item {
        ShopItem::Weapon(weapon) => {
            player.add_weapon(weapon);
            player.equip_weapon(weapon)?;
        }
        ShopItem::Potion(potion) => match potion.spec().effect {
            PotionEffect::Heal(amount) => {
                player.heal(amount);
            }
            PotionEffect::Mana(amount) => {
                player.restore_mana(amount);
            }
            PotionEffect::Shield(charges) => player.inventory.shield_charges = charges,
            PotionEffect::Arrows(count) => player.inventory.add_arrows(count),
        },
    }

    let gold_left = player.inventory.gold;
    info!(shop = shop.name, item = item.name(), price, gold_left, "purchase");
    Ok(PurchaseReceipt {
        shop: shop.name,
        item,
        price,
        gold_left,
    })
}
