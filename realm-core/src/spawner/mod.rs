//! Monster population.
//!
//! The initial population places a random number of each kind in every
//! zone the kind lives in. After that a periodic trickle tops zones back up
//! toward a per-kind cap, never close to the player.

use bevy::math::Vec2;
use tracing::{debug, info};

use crate::engine::config::SpawnConfig;
use crate::math::tile_center;
use crate::monster::{Monster, MonsterId, MonsterKind};
use crate::rng::RandomSource;
use crate::timer::Countdown;
use crate::world::{WorldQuery, ZoneLayout, ZoneRect};

#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnConfig,
    zones: ZoneLayout,
    timer: Countdown,
    next_id: u64,
}

impl Spawner {
    pub fn new(config: SpawnConfig, zones: ZoneLayout) -> Self {
        let timer = Countdown::started(config.interval_secs);
        Self {
            config,
            zones,
            timer,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    fn next_id(&mut self) -> MonsterId {
        let id = MonsterId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A fresh monster with the next free id.
    pub fn spawn_at(&mut self, kind: MonsterKind, position: Vec2) -> Monster {
        let id = self.next_id();
        Monster::new(id, kind, position)
    }

    /// Build the starting population.
    pub fn populate(&mut self, world: &dyn WorldQuery, rng: &mut dyn RandomSource) -> Vec<Monster> {
        let mut monsters = Vec::new();
        let (min, max) = self.config.initial_count;
        for kind in MonsterKind::ALL {
            for &zone in kind.archetype().zones {
                let Some(rect) = self.zones.rect(zone).copied() else {
                    continue;
                };
                let count = rng.range_u32(min, max);
                for _ in 0..count {
                    let spot = (0..self.config.initial_attempts)
                        .map(|_| random_tile(&rect, rng))
                        .find(|&(tx, ty)| !world.is_solid(tx, ty));
                    if let Some((tx, ty)) = spot {
                        let id = self.next_id();
                        monsters.push(Monster::new(id, kind, tile_center(tx, ty)));
                    }
                }
            }
        }
        info!(count = monsters.len(), "initial population placed");
        monsters
    }

    /// Run a trickle pass when the interval has elapsed. Returns how many
    /// monsters were added.
    pub fn trickle(
        &mut self,
        dt: f32,
        monsters: &mut Vec<Monster>,
        player: Vec2,
        world: &dyn WorldQuery,
        rng: &mut dyn RandomSource,
    ) -> usize {
        if !self.timer.tick(dt) {
            return 0;
        }
        self.timer.set(self.config.interval_secs);

        let mut added = 0;
        for kind in MonsterKind::ALL {
            for &zone in kind.archetype().zones {
                let Some(rect) = self.zones.rect(zone).copied() else {
                    continue;
                };
                let living = monsters
                    .iter()
                    .filter(|m| {
                        m.is_alive() && m.kind == kind && world.zone_at_position(m.position) == zone
                    })
                    .count();
                if living >= self.config.zone_cap {
                    continue;
                }
                if rng.next_f32() > self.config.spawn_chance {
                    continue;
                }
                for _ in 0..self.config.trickle_attempts {
                    let (tx, ty) = random_tile(&rect, rng);
                    if world.is_solid(tx, ty) {
                        continue;
                    }
                    let pos = tile_center(tx, ty);
                    if pos.distance(player) > self.config.min_player_distance {
                        let id = self.next_id();
                        debug!(id = id.0, ?kind, ?zone, "trickle spawn");
                        monsters.push(Monster::new(id, kind, pos));
                        added += 1;
                        break;
                    }
                }
            }
        }
        added
    }
}

/// A tile inside `rect`, kept two tiles clear of its edges.
fn random_tile(rect: &ZoneRect, rng: &mut dyn RandomSource) -> (i32, i32) {
    let span = |len: i32| (len - 3).max(2) as u32;
    let dx = rng.range_u32(2, span(rect.w)) as i32;
    let dy = rng.range_u32(2, span(rect.h)) as i32;
    (rect.x + dx, rect.y + dy)
}
