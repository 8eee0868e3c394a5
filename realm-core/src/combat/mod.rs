//! Combat resolution.
//!
//! Melee arcs, arrows and elemental abilities all resolve against the same
//! `Combatant` seam (monsters and the boss) and report the same
//! [`HitOutcome`] shape, so the orchestration loop can handle kills and loot
//! uniformly.

pub mod effects;
pub mod elements;
pub mod projectile;
pub mod status;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abilities::Element;
use crate::boss::Boss;
use crate::constants::{
    ARROW_DAMAGE, ARROW_INFUSED_BONUS, ARROW_LIFETIME_SECS, ARROW_RADIUS, ARROW_SPEED,
    MELEE_HALF_ARC,
};
use crate::equipment::WeaponSpec;
use crate::math::{angle_between, angle_diff, normalize_or_zero};
use crate::monster::{Monster, MonsterId};
use crate::player::{ActiveSwing, ArrowShot, Player};
use crate::rng::RandomSource;
use effects::{EffectLayer, Tint};
use projectile::{Projectile, ProjectileOwner};

/// Stable reference to something the player can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Monster(MonsterId),
    Boss,
}

/// Chance and multiplier of a critical hit. The multiplier is a whole
/// percentage, e.g. 180 for ×1.8.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CritProfile {
    pub chance: f32,
    pub multiplier_percent: u32,
}

impl CritProfile {
    /// `floor(base * multiplier)`
    pub fn critical_damage(&self, base: u32) -> u32 {
        base * self.multiplier_percent / 100
    }
}

/// Roll a critical hit. Returns the damage to apply and whether it crit.
pub fn roll_damage(base: u32, profile: CritProfile, rng: &mut dyn RandomSource) -> (u32, bool) {
    if rng.chance(profile.chance) {
        (profile.critical_damage(base), true)
    } else {
        (base, false)
    }
}

/// Anything the player can damage.
pub trait Combatant {
    fn target_ref(&self) -> TargetRef;
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
    /// Alive, visible and collidable
    fn is_targetable(&self) -> bool;
    fn crit_profile(&self) -> CritProfile;
    fn hit_tint(&self) -> (Tint, usize);
    /// Apply damage from a source at `from`. Returns true only on the hit
    /// that kills.
    fn take_hit(&mut self, damage: u32, from: Vec2) -> bool;
    fn apply_slow(&mut self, secs: f32, factor: f32);
}

/// One resolved hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub target: TargetRef,
    pub damage: u32,
    pub killed: bool,
    pub critical: bool,
}

/// The live target set for one resolution pass.
pub struct Targets<'a> {
    pub monsters: &'a mut [Monster],
    pub boss: Option<&'a mut Boss>,
}

impl<'a> Targets<'a> {
    pub fn new(monsters: &'a mut [Monster], boss: Option<&'a mut Boss>) -> Self {
        Self { monsters, boss }
    }

    /// Targetable combatants, monsters first, then the boss.
    pub fn live_mut(&mut self) -> impl Iterator<Item = &mut dyn Combatant> + '_ {
        let monsters = self.monsters.iter_mut().map(as_combatant);
        let boss = self.boss.as_deref_mut().into_iter().map(as_combatant);
        monsters.chain(boss).filter(|c| c.is_targetable())
    }
}

fn as_combatant<T: Combatant>(c: &mut T) -> &mut dyn Combatant {
    c
}

/// Melee arc test on an angular deviation in `[0, π]`. The edge counts.
pub fn within_melee_arc(deviation: f32) -> bool {
    deviation <= MELEE_HALF_ARC
}

/// Strike every target inside the swing's arc that this swing has not hit
/// yet. Accepts a target iff `distance <= range + radius` and the angular
/// deviation from the swing angle is at most 60°.
pub fn resolve_melee(
    origin: Vec2,
    swing: &mut ActiveSwing,
    weapon: &WeaponSpec,
    targets: &mut Targets<'_>,
    rng: &mut dyn RandomSource,
    fx: &mut EffectLayer,
) -> Vec<HitOutcome> {
    let mut hits = Vec::new();
    for target in targets.live_mut() {
        let id = target.target_ref();
        if swing.already_hit(id) {
            continue;
        }
        let pos = target.position();
        if origin.distance(pos) > weapon.range + target.radius() {
            continue;
        }
        if !within_melee_arc(angle_diff(angle_between(origin, pos), swing.angle)) {
            continue;
        }
        swing.mark_hit(id);

        let (damage, critical) = roll_damage(weapon.damage, target.crit_profile(), rng);
        let killed = target.take_hit(damage, origin);
        let (tint, count) = target.hit_tint();
        fx.hit_burst(pos, tint, count);
        fx.damage_number(pos, damage, critical);
        debug!(target = ?id, damage, critical, killed, "melee hit");

        hits.push(HitOutcome {
            target: id,
            damage,
            killed,
            critical,
        });
    }
    hits
}

/// Result of casting an element.
#[derive(Debug, Clone, PartialEq)]
pub struct CastOutcome {
    pub element: Element,
    pub healed: f32,
    pub hits: Vec<HitOutcome>,
}

/// Owns the player's arrows in flight and the presentation layer.
#[derive(Debug, Clone)]
pub struct CombatEngine {
    arrows: Vec<Projectile>,
    effects: EffectLayer,
}

impl CombatEngine {
    pub fn new(effects: EffectLayer) -> Self {
        Self {
            arrows: Vec::new(),
            effects,
        }
    }

    /// Resolve the player's current swing, if one is open.
    pub fn resolve_player_swing(
        &mut self,
        player: &mut Player,
        targets: &mut Targets<'_>,
        rng: &mut dyn RandomSource,
    ) -> Vec<HitOutcome> {
        let origin = player.position;
        let weapon = player.weapon();
        match player.swing_mut() {
            Some(swing) => resolve_melee(origin, swing, weapon, targets, rng, &mut self.effects),
            None => Vec::new(),
        }
    }

    /// Apply an element the player has already paid for.
    pub fn cast_element(
        &mut self,
        element: Element,
        player: &mut Player,
        targets: &mut Targets<'_>,
    ) -> CastOutcome {
        let healed = elements::caster_heal(element)
            .map(|amount| player.heal(amount))
            .unwrap_or(0.0);
        if healed > 0.0 {
            self.effects.heal_number(player.position, healed as u32);
        }
        let hits = elements::resolve_element(
            element,
            player.position,
            player.facing,
            targets,
            &mut self.effects,
        );
        CastOutcome {
            element,
            healed,
            hits,
        }
    }

    pub fn spawn_arrow(&mut self, shot: ArrowShot) {
        let bonus = if shot.infused.is_some() {
            ARROW_INFUSED_BONUS
        } else {
            0
        };
        let arrow = Projectile::new(
            ProjectileOwner::Player,
            shot.origin,
            normalize_or_zero(shot.direction) * ARROW_SPEED,
            ARROW_RADIUS,
            (ARROW_DAMAGE + bonus) as f32,
            ARROW_LIFETIME_SECS,
        )
        .with_infusion(shot.infused);
        self.arrows.push(arrow);
    }

    /// Advance arrows, expire the old ones and consume those that strike a
    /// target. An arrow hits at most one target.
    pub fn update_arrows(&mut self, dt: f32, targets: &mut Targets<'_>) -> Vec<HitOutcome> {
        let mut hits = Vec::new();
        let effects = &mut self.effects;
        self.arrows.retain_mut(|arrow| {
            if !arrow.advance(dt) {
                return false;
            }
            let struck = targets
                .live_mut()
                .find(|t| arrow.touches(t.position(), t.radius()));
            let Some(target) = struck else {
                return true;
            };
            let damage = arrow.damage as u32;
            let from = arrow.position - normalize_or_zero(arrow.velocity);
            let killed = target.take_hit(damage, from);
            let tint = match arrow.infused {
                Some(Element::Fire) => Tint::Fire,
                Some(Element::Ice) => Tint::Ice,
                Some(Element::Lightning) => Tint::Lightning,
                _ => target.hit_tint().0,
            };
            effects.hit_burst(target.position(), tint, 4);
            effects.damage_number(target.position(), damage, false);
            hits.push(HitOutcome {
                target: target.target_ref(),
                damage,
                killed,
                critical: false,
            });
            false
        });
        hits
    }

    /// Damage number over the player after a landed enemy hit.
    pub fn note_player_hit(&mut self, at: Vec2, amount: f32) {
        self.effects.damage_number(at, amount as u32, false);
    }

    pub fn update_effects(&mut self, dt: f32) {
        self.effects.update(dt);
    }

    pub fn arrows(&self) -> &[Projectile] {
        &self.arrows
    }

    pub fn effects(&self) -> &EffectLayer {
        &self.effects
    }
}
