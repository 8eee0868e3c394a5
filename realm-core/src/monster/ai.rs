//! Monster AI state machine.
//!
//! Priority each tick: a player inside the aggro radius forces `Chase`;
//! otherwise straying past the leash forces `Return`; otherwise a monster
//! that was chasing drops back to `Idle`. Idle and patrol alternate while
//! nothing else applies.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Monster, MonsterId};
use crate::constants::{
    KNOCKBACK_DECAY, PATROL_ARRIVAL, PATROL_SPEED_MULT, PATROL_SPREAD, RETURN_ARRIVAL,
};
use crate::math::{decay_knockback, normalize_or_zero};
use crate::rng::RandomSource;
use crate::world::{move_with_collision, CollisionProbe, WorldQuery};

/// Wait after giving up a chase or finishing a patrol leg
const IDLE_WAIT: (f32, f32) = (1.0, 3.0);
/// Wait after arriving home from a return
const RETURN_REST_SECS: f32 = 2.0;
/// Time allowed to reach a patrol point before giving up
const PATROL_WINDOW: (f32, f32) = (2.0, 5.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Patrol {
        target: Vec2,
    },
    Chase,
    Return,
}

impl AiState {
    pub fn name(&self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::Patrol { .. } => "patrol",
            AiState::Chase => "chase",
            AiState::Return => "return",
        }
    }
}

/// A monster attack that the orchestrator applies to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterStrike {
    pub monster: MonsterId,
    pub damage: f32,
    pub from: Vec2,
}

impl Monster {
    /// Advance one tick. Dead monsters only age their corpse.
    ///
    /// Returns a strike when the monster attacks this tick; the attack
    /// cooldown is already spent whether or not the strike lands.
    pub fn update(
        &mut self,
        dt: f32,
        player: Vec2,
        world: &dyn WorldQuery,
        rng: &mut dyn RandomSource,
    ) -> Option<MonsterStrike> {
        if !self.is_alive() {
            self.tick_death_fade(dt);
            return None;
        }
        self.tick_timers(dt);

        let stats = self.stats();
        let to_player = self.position.distance(player);
        let from_home = self.position.distance(self.home);

        self.select_state(to_player, from_home, rng);

        let speed = self.current_speed();
        let mut movement = Vec2::ZERO;
        let mut strike = None;

        match self.ai {
            AiState::Idle => {
                self.state_timer.tick(dt);
                if self.state_timer.is_ready() {
                    let target = self.home
                        + Vec2::new(
                            rng.range_f32(-PATROL_SPREAD, PATROL_SPREAD),
                            rng.range_f32(-PATROL_SPREAD, PATROL_SPREAD),
                        );
                    self.state_timer
                        .set(rng.range_f32(PATROL_WINDOW.0, PATROL_WINDOW.1));
                    self.transition(AiState::Patrol { target });
                }
            }
            AiState::Patrol { target } => {
                movement = normalize_or_zero(target - self.position) * speed * PATROL_SPEED_MULT;
                let arrived = self.position.distance(target) < PATROL_ARRIVAL;
                let gave_up = self.state_timer.tick(dt);
                if arrived || gave_up {
                    self.state_timer.set(rng.range_f32(IDLE_WAIT.0, IDLE_WAIT.1));
                    self.transition(AiState::Idle);
                }
            }
            AiState::Chase => {
                movement = normalize_or_zero(player - self.position) * speed;
                if to_player < stats.attack_radius && self.attack_cooldown.is_ready() {
                    self.attack_cooldown.set(stats.attack_cooldown);
                    strike = Some(MonsterStrike {
                        monster: self.id,
                        damage: stats.damage,
                        from: self.position,
                    });
                }
            }
            AiState::Return => {
                movement = normalize_or_zero(self.home - self.position) * speed;
                if from_home < RETURN_ARRIVAL {
                    self.state_timer.set(RETURN_REST_SECS);
                    self.transition(AiState::Idle);
                }
            }
        }

        let delta = (movement + self.knockback) * dt;
        self.knockback = decay_knockback(self.knockback, KNOCKBACK_DECAY, dt);
        self.position = move_with_collision(world, self.position, delta, CollisionProbe::Point);
        if movement != Vec2::ZERO {
            self.facing = normalize_or_zero(movement);
        }

        strike
    }

    fn select_state(&mut self, to_player: f32, from_home: f32, rng: &mut dyn RandomSource) {
        let stats = self.stats();
        if to_player < stats.aggro_radius {
            if self.ai != AiState::Chase {
                self.transition(AiState::Chase);
            }
        } else if from_home > stats.leash_radius {
            if self.ai != AiState::Return {
                self.transition(AiState::Return);
            }
        } else if self.ai == AiState::Chase {
            self.state_timer.set(rng.range_f32(IDLE_WAIT.0, IDLE_WAIT.1));
            self.transition(AiState::Idle);
        }
    }

    fn transition(&mut self, next: AiState) {
        debug!(id = self.id.0, from = self.ai.name(), to = next.name(), "monster ai");
        self.ai = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Combatant;
    use crate::constants::REFERENCE_FRAME_SECS;
    use crate::monster::MonsterKind;
    use crate::rng::ScriptedRng;
    use crate::world::GridWorld;

    const DT: f32 = REFERENCE_FRAME_SECS;

    fn open() -> GridWorld {
        GridWorld::open(40, 40)
    }

    fn goblin(home: Vec2) -> Monster {
        Monster::new(MonsterId(7), MonsterKind::Goblin, home)
    }

    #[test]
    fn test_chase_then_idle_inside_leash() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let mut m = goblin(home);
        m.position = home + Vec2::new(140.0, 0.0);
        let mut rng = ScriptedRng::constant(0.5);

        // player 100 away: chase
        let player = m.position + Vec2::new(0.0, 100.0);
        m.update(DT, player, &world, &mut rng);
        assert_eq!(m.ai, AiState::Chase);

        // player leaves the aggro radius; home is still within the leash
        let far = m.position + Vec2::new(0.0, 400.0);
        m.update(DT, far, &world, &mut rng);
        assert_eq!(m.ai, AiState::Idle);
    }

    #[test]
    fn test_leash_forces_return() {
        let world = open();
        let home = Vec2::new(200.0, 200.0);
        let mut m = goblin(home);
        m.position = home + Vec2::new(310.0, 0.0);
        let mut rng = ScriptedRng::constant(0.5);
        m.update(DT, Vec2::new(1200.0, 1200.0), &world, &mut rng);
        assert_eq!(m.ai, AiState::Return);
        assert!(m.position.x < home.x + 310.0);
    }

    #[test]
    fn test_aggro_beats_leash() {
        let world = open();
        let home = Vec2::new(200.0, 200.0);
        let mut m = goblin(home);
        m.position = home + Vec2::new(400.0, 0.0);
        let player = m.position + Vec2::new(50.0, 0.0);
        m.update(DT, player, &world, &mut ScriptedRng::constant(0.5));
        assert_eq!(m.ai, AiState::Chase);
    }

    #[test]
    fn test_return_rests_at_home() {
        let world = open();
        let home = Vec2::new(200.0, 200.0);
        let mut m = goblin(home);
        m.ai = AiState::Return;
        m.position = home + Vec2::new(15.0, 0.0);
        m.update(DT, Vec2::new(1000.0, 1000.0), &world, &mut ScriptedRng::constant(0.5));
        assert_eq!(m.ai, AiState::Idle);
        assert!((m.state_timer.remaining() - RETURN_REST_SECS).abs() < 1e-6);
    }

    #[test]
    fn test_first_idle_tick_starts_patrol_near_home() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let mut m = goblin(home);
        // 0.75 draws land 50 units right of and below home
        m.update(DT, Vec2::new(1000.0, 1000.0), &world, &mut ScriptedRng::constant(0.75));
        match m.ai {
            AiState::Patrol { target } => {
                assert!((target - (home + Vec2::new(50.0, 50.0))).length() < 1e-3);
            }
            other => panic!("expected patrol, got {other:?}"),
        }
    }

    #[test]
    fn test_patrol_arrival_returns_to_idle() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let mut m = goblin(home);
        m.ai = AiState::Patrol {
            target: home + Vec2::new(5.0, 0.0),
        };
        m.state_timer.set(4.0);
        m.update(DT, Vec2::new(1000.0, 1000.0), &world, &mut ScriptedRng::constant(0.0));
        assert_eq!(m.ai, AiState::Idle);
        assert!((m.state_timer.remaining() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let mut m = goblin(home);
        let mut rng = ScriptedRng::constant(0.5);
        let player = home + Vec2::new(20.0, 0.0);

        let first = m.update(DT, player, &world, &mut rng);
        assert_eq!(
            first,
            Some(MonsterStrike {
                monster: MonsterId(7),
                damage: 5.0,
                from: home,
            })
        );
        let mut strikes = 0;
        for _ in 0..60 {
            m.position = home;
            if m.update(DT, player, &world, &mut rng).is_some() {
                strikes += 1;
            }
        }
        // one second passes, cooldown is 1.5 s
        assert_eq!(strikes, 0);
        for _ in 0..40 {
            m.position = home;
            if m.update(DT, player, &world, &mut rng).is_some() {
                strikes += 1;
            }
        }
        assert_eq!(strikes, 1);
    }

    #[test]
    fn test_slow_halves_chase_distance() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let player = home + Vec2::new(100.0, 0.0);
        let mut rng = ScriptedRng::constant(0.5);

        let mut fast = goblin(home);
        fast.update(DT, player, &world, &mut rng);
        let mut slow = goblin(home);
        slow.apply_slow(3.0, 0.4);
        slow.update(DT, player, &world, &mut rng);

        let fast_step = fast.position.x - home.x;
        let slow_step = slow.position.x - home.x;
        assert!((slow_step - fast_step * 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_walls_block_chase() {
        let world = GridWorld::from_ascii(&[
            "..........",
            "....#.....",
            "..........",
        ]);
        let start = Vec2::new(4.0 * 32.0 - 1.0, 48.0);
        let mut m = goblin(start);
        let player = start + Vec2::new(100.0, 0.0);
        m.update(DT, player, &world, &mut ScriptedRng::constant(0.5));
        assert_eq!(m.position.x, start.x);
    }

    #[test]
    fn test_knockback_moves_and_decays() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let mut m = goblin(home);
        m.ai = AiState::Idle;
        m.state_timer.set(10.0);
        m.take_hit(1, home - Vec2::new(10.0, 0.0));
        let kb = m.knockback.x;
        m.update(DT, Vec2::new(1000.0, 1000.0), &world, &mut ScriptedRng::constant(0.5));
        assert!(m.position.x > home.x);
        assert!(m.knockback.x < kb);
        for _ in 0..120 {
            m.update(DT, Vec2::new(1000.0, 1000.0), &world, &mut ScriptedRng::constant(0.5));
        }
        assert_eq!(m.knockback, Vec2::ZERO);
    }

    #[test]
    fn test_dead_monster_does_not_act() {
        let world = open();
        let home = Vec2::new(300.0, 300.0);
        let mut m = goblin(home);
        m.take_hit(100, home);
        let player = home + Vec2::new(5.0, 0.0);
        let strike = m.update(DT, player, &world, &mut ScriptedRng::constant(0.5));
        assert!(strike.is_none());
        assert_eq!(m.position, home);
    }
}
