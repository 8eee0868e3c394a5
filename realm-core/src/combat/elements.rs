//! Elemental effect shapes.
//!
//! All radius checks are strict and measured from the caster. Elemental
//! damage never crits.

use bevy::math::Vec2;
use tracing::debug;

use super::effects::{EffectLayer, Tint};
use super::{HitOutcome, Targets};
use crate::abilities::{Element, ElementShape};
use crate::constants::{FIRE_EFFECT_OFFSET, ICE_EFFECT_OFFSET};
use crate::math::{angle_between, angle_diff, dir_to_angle};

/// Healing the caster receives from an element, if any.
pub fn caster_heal(element: Element) -> Option<f32> {
    match element.spec().shape {
        ElementShape::HealRing { heal, .. } => Some(heal),
        _ => None,
    }
}

/// Apply `element` cast from `caster` facing `facing` to every eligible
/// target. Returns one outcome per damaged target.
pub fn resolve_element(
    element: Element,
    caster: Vec2,
    facing: Vec2,
    targets: &mut Targets<'_>,
    fx: &mut EffectLayer,
) -> Vec<HitOutcome> {
    let spec = element.spec();
    let damage = spec.damage;
    let mut hits = Vec::new();

    match spec.shape {
        ElementShape::Cone { radius, half_angle } => {
            fx.element_visual(caster + facing * FIRE_EFFECT_OFFSET, element);
            let facing_angle = dir_to_angle(facing);
            for target in targets.live_mut() {
                let pos = target.position();
                if caster.distance(pos) >= radius {
                    continue;
                }
                if !within_cone(angle_diff(angle_between(caster, pos), facing_angle), half_angle) {
                    continue;
                }
                let killed = target.take_hit(damage, caster);
                fx.damage_number(pos, damage, false);
                fx.hit_burst(pos, Tint::Fire, 8);
                hits.push(outcome(target.target_ref(), damage, killed));
            }
        }
        ElementShape::HealRing { radius, .. } => {
            fx.element_visual(caster, element);
            for target in targets.live_mut() {
                let pos = target.position();
                if caster.distance(pos) >= radius {
                    continue;
                }
                let killed = target.take_hit(damage, caster);
                fx.damage_number(pos, damage, false);
                hits.push(outcome(target.target_ref(), damage, killed));
            }
        }
        ElementShape::SlowBurst {
            radius,
            slow_secs,
            slow_factor,
        } => {
            fx.element_visual(caster + facing * ICE_EFFECT_OFFSET, element);
            for target in targets.live_mut() {
                let pos = target.position();
                if caster.distance(pos) >= radius {
                    continue;
                }
                let killed = target.take_hit(damage, caster);
                target.apply_slow(slow_secs, slow_factor);
                fx.damage_number(pos, damage, false);
                fx.hit_burst(pos, Tint::Ice, 6);
                hits.push(outcome(target.target_ref(), damage, killed));
            }
        }
        ElementShape::NearestStrike { radius } => {
            let mut best: Option<(usize, f32)> = None;
            for (idx, target) in targets.live_mut().enumerate() {
                let d = caster.distance(target.position());
                let closer = best.map_or(d < radius, |(_, best_d)| d < best_d);
                if closer {
                    best = Some((idx, d));
                }
            }
            if let Some((idx, _)) = best {
                if let Some(target) = targets.live_mut().nth(idx) {
                    let pos = target.position();
                    fx.lightning_bolt(caster, pos);
                    let killed = target.take_hit(damage, caster);
                    fx.damage_number(pos, damage, true);
                    fx.hit_burst(pos, Tint::Lightning, 10);
                    hits.push(outcome(target.target_ref(), damage, killed));
                }
            }
            fx.element_visual(caster, element);
        }
    }

    if !hits.is_empty() {
        debug!(?element, hits = hits.len(), "element resolved");
    }
    hits
}

/// Cone test on an angular deviation in `[0, π]`. The edge is outside.
pub fn within_cone(deviation: f32, half_angle: f32) -> bool {
    deviation < half_angle
}

fn outcome(target: super::TargetRef, damage: u32, killed: bool) -> HitOutcome {
    HitOutcome {
        target,
        damage,
        killed,
        critical: false,
    }
}
