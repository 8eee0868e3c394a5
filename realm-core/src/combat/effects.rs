//! Presentation-only transient effects: hit particles, floating damage
//! numbers and elemental visuals.
//!
//! Nothing here feeds back into gameplay. The layer draws from its own random
//! stream, so switching it off leaves every gameplay outcome unchanged.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::abilities::Element;
use crate::constants::{
    DAMAGE_NUMBER_RISE, DAMAGE_NUMBER_SECS, PARTICLE_GRAVITY, PARTICLE_MAX_SPEED,
};
use crate::math::lerp;
use crate::rng::{GameRng, RandomSource};
use crate::timer::Countdown;

/// Colour family of a particle burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Blood,
    BossHit,
    Fire,
    Ice,
    Lightning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub tint: Tint,
    pub life: Countdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub position: Vec2,
    pub amount: u32,
    pub critical: bool,
    pub heal: bool,
    pub life: Countdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualKind {
    Element(Element),
    /// Jagged polyline from caster to struck target
    LightningBolt(Vec<Vec2>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementVisual {
    pub position: Vec2,
    pub kind: VisualKind,
    pub duration: f32,
    pub life: Countdown,
}

impl ElementVisual {
    /// 0.0 when spawned, 1.0 when expired
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.life.remaining() / self.duration
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectLayer {
    enabled: bool,
    rng: GameRng,
    particles: Vec<Particle>,
    damage_numbers: Vec<DamageNumber>,
    visuals: Vec<ElementVisual>,
}

impl EffectLayer {
    pub fn new(rng: GameRng, enabled: bool) -> Self {
        Self {
            enabled,
            rng,
            particles: Vec::new(),
            damage_numbers: Vec::new(),
            visuals: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn hit_burst(&mut self, at: Vec2, tint: Tint, count: usize) {
        if !self.enabled {
            return;
        }
        for _ in 0..count {
            let velocity = Vec2::new(
                self.rng.range_f32(-PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED),
                self.rng.range_f32(-PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED),
            );
            let life = self.rng.range_f32(0.2, 0.5);
            let size = self.rng.range_f32(2.0, 5.0);
            self.particles.push(Particle {
                position: at,
                velocity,
                size,
                tint,
                life: Countdown::started(life),
            });
        }
    }

    pub fn damage_number(&mut self, at: Vec2, amount: u32, critical: bool) {
        self.push_number(at, amount, critical, false);
    }

    pub fn heal_number(&mut self, at: Vec2, amount: u32) {
        self.push_number(at, amount, false, true);
    }

    fn push_number(&mut self, at: Vec2, amount: u32, critical: bool, heal: bool) {
        if !self.enabled {
            return;
        }
        let jitter = self.rng.range_f32(-10.0, 10.0);
        self.damage_numbers.push(DamageNumber {
            position: Vec2::new(at.x + jitter, at.y - 20.0),
            amount,
            critical,
            heal,
            life: Countdown::started(DAMAGE_NUMBER_SECS),
        });
    }

    pub fn element_visual(&mut self, at: Vec2, element: Element) {
        if !self.enabled {
            return;
        }
        let duration = element.spec().effect_secs;
        self.visuals.push(ElementVisual {
            position: at,
            kind: VisualKind::Element(element),
            duration,
            life: Countdown::started(duration),
        });
    }

    pub fn lightning_bolt(&mut self, from: Vec2, to: Vec2) {
        if !self.enabled {
            return;
        }
        const STEPS: usize = 8;
        let mut points = Vec::with_capacity(STEPS + 1);
        for i in 0..=STEPS {
            let t = i as f32 / STEPS as f32;
            let mut p = Vec2::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t));
            if i > 0 && i < STEPS {
                p.x += self.rng.range_f32(-15.0, 15.0);
                p.y += self.rng.range_f32(-15.0, 15.0);
            }
            points.push(p);
        }
        self.visuals.push(ElementVisual {
            position: from,
            kind: VisualKind::LightningBolt(points),
            duration: 0.4,
            life: Countdown::started(0.4),
        });
    }

    /// Age everything by `dt` and drop what has expired.
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| {
            p.position += p.velocity * dt;
            p.velocity.y += PARTICLE_GRAVITY * dt;
            p.life.tick(dt);
            p.life.is_active()
        });
        self.damage_numbers.retain_mut(|d| {
            d.position.y -= DAMAGE_NUMBER_RISE * dt;
            d.life.tick(dt);
            d.life.is_active()
        });
        self.visuals.retain_mut(|v| {
            v.life.tick(dt);
            v.life.is_active()
        });
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn damage_numbers(&self) -> &[DamageNumber] {
        &self.damage_numbers
    }

    pub fn visuals(&self) -> &[ElementVisual] {
        &self.visuals
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.damage_numbers.is_empty() && self.visuals.is_empty()
    }
}
