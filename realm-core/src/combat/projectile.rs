//! Projectile lifecycle shared by player arrows and boss bolts.
//!
//! A projectile moves in a straight line, expires when its lifetime runs out
//! and is consumed by its owner's hit rule.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::abilities::Element;
use crate::math::{angle_to_dir, circles_overlap};
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Boss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Element the projectile was loosed with, if any
    pub infused: Option<Element>,
    life: Countdown,
}

impl Projectile {
    pub fn new(
        owner: ProjectileOwner,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        damage: f32,
        lifetime: f32,
    ) -> Self {
        Self {
            owner,
            position,
            velocity,
            radius,
            damage,
            infused: None,
            life: Countdown::started(lifetime),
        }
    }

    /// Projectile heading along `angle` at `speed`.
    pub fn aimed(
        owner: ProjectileOwner,
        position: Vec2,
        angle: f32,
        speed: f32,
        radius: f32,
        damage: f32,
        lifetime: f32,
    ) -> Self {
        Self::new(owner, position, angle_to_dir(angle) * speed, radius, damage, lifetime)
    }

    pub fn with_infusion(mut self, element: Option<Element>) -> Self {
        self.infused = element;
        self
    }

    /// Move and age. Returns false once the lifetime has run out.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.position += self.velocity * dt;
        self.life.tick(dt);
        self.life.is_active()
    }

    pub fn touches(&self, center: Vec2, radius: f32) -> bool {
        circles_overlap(self.position, self.radius, center, radius)
    }

    pub fn remaining(&self) -> f32 {
        self.life.remaining()
    }
}
