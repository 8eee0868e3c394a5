//! The Black Knight.
//!
//! A singleton encounter. The boss is dormant until spawned, emerges over a
//! couple of seconds, then fights through its phase table. Windup, charge
//! and spin are mutually exclusive actions that suspend chasing and pattern
//! rolls until they finish. Death is permanent.

pub mod phases;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::effects::Tint;
use crate::combat::projectile::{Projectile, ProjectileOwner};
use crate::combat::status::SlowStatus;
use crate::combat::{Combatant, CritProfile, TargetRef};
use crate::constants::{
    BOSS_BOLT_DAMAGE, BOSS_BOLT_LIFETIME_SECS, BOSS_BOLT_RADIUS, BOSS_BOLT_SPEED,
    BOSS_CHARGE_DAMAGE_MULT, BOSS_CHARGE_SECS, BOSS_CHARGE_SPEED_MULT, BOSS_CLOSE_HIT_RANGE,
    BOSS_CONTACT_SLACK, BOSS_CRIT_CHANCE, BOSS_CRIT_PERCENT, BOSS_DAMAGE, BOSS_DEFEAT_SECS,
    BOSS_EMERGE_SECS, BOSS_FLASH_SECS, BOSS_KNOCKBACK, BOSS_KNOCKBACK_DECAY, BOSS_MAX_HEALTH,
    BOSS_RADIUS, BOSS_SPEED, BOSS_SPIN_DAMAGE_MULT, BOSS_SPIN_RATE, BOSS_SPIN_REACH,
};
use crate::math::{angle_between, decay_knockback, normalize_or_zero};
use crate::player::{DamageResult, Player};
use crate::rng::RandomSource;
use crate::timer::Countdown;
use crate::world::{move_with_collision, CollisionProbe, WorldQuery};
pub use phases::{phase_for_fraction, AttackPattern, BossPhase, PHASES};
use phases::Fallback;

pub const BOSS_NAME: &str = "The Black Knight";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossLifecycle {
    Dormant,
    /// Spawned; invisible to combat until the timer runs out
    Emerging { timer: Countdown },
    Active,
    /// Dead; the timer is the defeat sequence
    Defeated { timer: Countdown },
}

/// Mutually exclusive boss actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossAction {
    Chasing,
    Windup { timer: Countdown },
    Charging { direction: Vec2, timer: Countdown },
    Spinning { timer: Countdown, angle: f32 },
}

impl BossAction {
    pub fn name(&self) -> &'static str {
        match self {
            BossAction::Chasing => "chasing",
            BossAction::Windup { .. } => "windup",
            BossAction::Charging { .. } => "charging",
            BossAction::Spinning { .. } => "spinning",
        }
    }
}

/// How a boss hit was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAttack {
    Contact,
    Charge,
    Spin,
    Bolt,
}

/// Things the encounter reports back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossSignal {
    /// Emergence finished; the boss now fights
    Activated,
    PhaseChanged { phase: usize, pattern: AttackPattern },
    ActionStarted(BossAction),
    /// Bolts loosed this tick
    Fired(usize),
    PlayerHit { attack: BossAttack, result: DamageResult },
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub position: Vec2,
    pub facing: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub knockback: Vec2,
    pub slow: SlowStatus,
    lifecycle: BossLifecycle,
    action: BossAction,
    phase: usize,
    attack_timer: Countdown,
    flash: Countdown,
    projectiles: Vec<Projectile>,
}

impl Boss {
    /// A dormant boss waiting at its lair.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            facing: Vec2::Y,
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            knockback: Vec2::ZERO,
            slow: SlowStatus::default(),
            lifecycle: BossLifecycle::Dormant,
            action: BossAction::Chasing,
            phase: 0,
            attack_timer: Countdown::idle(),
            flash: Countdown::idle(),
            projectiles: Vec::new(),
        }
    }

    /// Begin emerging. Only a dormant boss can spawn.
    pub fn spawn(&mut self) -> bool {
        if self.lifecycle != BossLifecycle::Dormant {
            return false;
        }
        self.lifecycle = BossLifecycle::Emerging {
            timer: Countdown::started(BOSS_EMERGE_SECS),
        };
        info!(x = self.position.x, y = self.position.y, "boss spawned");
        true
    }

    /// Skip straight to the fight.
    pub fn force_active(&mut self) {
        self.lifecycle = BossLifecycle::Active;
    }

    pub fn lifecycle(&self) -> BossLifecycle {
        self.lifecycle
    }

    pub fn action(&self) -> BossAction {
        self.action
    }

    pub fn is_spawned(&self) -> bool {
        self.lifecycle != BossLifecycle::Dormant
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == BossLifecycle::Active
    }

    pub fn is_defeated(&self) -> bool {
        matches!(self.lifecycle, BossLifecycle::Defeated { .. })
    }

    /// Dead and the defeat sequence has played out.
    pub fn defeat_finished(&self) -> bool {
        matches!(self.lifecycle, BossLifecycle::Defeated { timer } if timer.is_ready())
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    pub fn phase_index(&self) -> usize {
        self.phase
    }

    pub fn phase(&self) -> &'static BossPhase {
        &PHASES[self.phase]
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Advance the encounter by `dt` against the player.
    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        world: &dyn WorldQuery,
        rng: &mut dyn RandomSource,
    ) -> Vec<BossSignal> {
        let mut signals = Vec::new();
        match &mut self.lifecycle {
            BossLifecycle::Dormant => return signals,
            BossLifecycle::Emerging { timer } => {
                if timer.tick(dt) {
                    self.lifecycle = BossLifecycle::Active;
                    info!("boss active");
                    signals.push(BossSignal::Activated);
                }
                return signals;
            }
            BossLifecycle::Defeated { timer } => {
                timer.tick(dt);
                return signals;
            }
            BossLifecycle::Active => {}
        }

        self.flash.tick(dt);
        self.slow.tick(dt);

        let next_phase = phase_for_fraction(self.health_fraction());
        if next_phase != self.phase {
            self.phase = next_phase;
            let pattern = PHASES[next_phase].pattern;
            info!(phase = next_phase, ?pattern, "boss phase changed");
            signals.push(BossSignal::PhaseChanged {
                phase: next_phase,
                pattern,
            });
        }
        let phase = PHASES[self.phase];
        let speed = BOSS_SPEED * phase.speed_mult * self.slow.speed_modifier();
        let to_player = self.position.distance(player.position);

        self.update_projectiles(dt, player, &mut signals);
        // Cadence and knockback run on every active frame; only rolls wait
        // for the boss to be chasing.
        self.attack_timer.tick(dt);
        let knockback = self.knockback;
        self.knockback = decay_knockback(self.knockback, BOSS_KNOCKBACK_DECAY, dt);

        match self.action {
            BossAction::Charging {
                direction,
                mut timer,
            } => {
                let delta = direction * speed * BOSS_CHARGE_SPEED_MULT * dt;
                self.position = move_with_collision(world, self.position, delta, CollisionProbe::Point);
                if to_player < BOSS_RADIUS + player.radius {
                    let result = player.take_damage(BOSS_DAMAGE * BOSS_CHARGE_DAMAGE_MULT, self.position);
                    push_hit(&mut signals, BossAttack::Charge, result);
                }
                self.action = if timer.tick(dt) {
                    BossAction::Chasing
                } else {
                    BossAction::Charging { direction, timer }
                };
                return signals;
            }
            BossAction::Windup { mut timer } => {
                if timer.tick(dt) {
                    let direction = normalize_or_zero(player.position - self.position);
                    self.facing = if direction == Vec2::ZERO { self.facing } else { direction };
                    self.start_action(
                        BossAction::Charging {
                            direction,
                            timer: Countdown::started(BOSS_CHARGE_SECS),
                        },
                        &mut signals,
                    );
                } else {
                    self.action = BossAction::Windup { timer };
                }
                return signals;
            }
            BossAction::Spinning { mut timer, angle } => {
                let angle = angle + BOSS_SPIN_RATE * dt;
                if to_player < BOSS_RADIUS + BOSS_SPIN_REACH {
                    let result = player.take_damage(BOSS_DAMAGE * BOSS_SPIN_DAMAGE_MULT, self.position);
                    push_hit(&mut signals, BossAttack::Spin, result);
                }
                self.action = if timer.tick(dt) {
                    BossAction::Chasing
                } else {
                    BossAction::Spinning { timer, angle }
                };
                return signals;
            }
            BossAction::Chasing => {}
        }

        let dir = normalize_or_zero(player.position - self.position);
        if dir != Vec2::ZERO {
            self.facing = dir;
        }
        let delta = (dir * speed + knockback) * dt;
        self.position = move_with_collision(world, self.position, delta, CollisionProbe::Point);

        if self.attack_timer.is_ready() {
            self.attack_timer.set(phase.attack_interval);
            self.roll_pattern(phase.pattern, to_player, player, rng, &mut signals);
        }

        signals
    }

    fn update_projectiles(&mut self, dt: f32, player: &mut Player, signals: &mut Vec<BossSignal>) {
        self.projectiles.retain_mut(|bolt| {
            if !bolt.advance(dt) {
                return false;
            }
            if !bolt.touches(player.position, player.radius) {
                return true;
            }
            let result = player.take_damage(bolt.damage, bolt.position);
            push_hit(signals, BossAttack::Bolt, result);
            !result.landed()
        });
    }

    fn roll_pattern(
        &mut self,
        pattern: AttackPattern,
        to_player: f32,
        player: &mut Player,
        rng: &mut dyn RandomSource,
        signals: &mut Vec<BossSignal>,
    ) {
        let menu = pattern.menu();
        if let Some((chance, secs)) = menu.spin {
            if rng.chance(chance) {
                let spin = BossAction::Spinning {
                    timer: Countdown::started(secs),
                    angle: 0.0,
                };
                self.start_action(spin, signals);
                return;
            }
        }
        if let Some((chance, secs)) = menu.windup {
            if rng.chance(chance) {
                let windup = BossAction::Windup {
                    timer: Countdown::started(secs),
                };
                self.start_action(windup, signals);
                return;
            }
        }
        match menu.fallback {
            Fallback::Contact => {
                if to_player < BOSS_RADIUS + player.radius + BOSS_CONTACT_SLACK {
                    let result = player.take_damage(BOSS_DAMAGE, self.position);
                    push_hit(signals, BossAttack::Contact, result);
                }
            }
            Fallback::CloseHit => {
                if to_player < BOSS_CLOSE_HIT_RANGE {
                    let result = player.take_damage(BOSS_DAMAGE, self.position);
                    push_hit(signals, BossAttack::Contact, result);
                }
            }
            Fallback::Bolts(offsets) => {
                let aim = angle_between(self.position, player.position);
                for offset in offsets {
                    self.projectiles.push(Projectile::aimed(
                        ProjectileOwner::Boss,
                        self.position,
                        aim + offset,
                        BOSS_BOLT_SPEED,
                        BOSS_BOLT_RADIUS,
                        BOSS_BOLT_DAMAGE,
                        BOSS_BOLT_LIFETIME_SECS,
                    ));
                }
                debug!(count = offsets.len(), "boss fired");
                signals.push(BossSignal::Fired(offsets.len()));
            }
        }
    }

    fn start_action(&mut self, action: BossAction, signals: &mut Vec<BossSignal>) {
        debug!(from = self.action.name(), to = action.name(), "boss action");
        self.action = action;
        signals.push(BossSignal::ActionStarted(action));
    }
}

fn push_hit(signals: &mut Vec<BossSignal>, attack: BossAttack, result: DamageResult) {
    if result != DamageResult::Ignored {
        signals.push(BossSignal::PlayerHit { attack, result });
    }
}

impl Combatant for Boss {
    fn target_ref(&self) -> TargetRef {
        TargetRef::Boss
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        BOSS_RADIUS
    }

    fn is_targetable(&self) -> bool {
        self.is_active()
    }

    fn crit_profile(&self) -> CritProfile {
        CritProfile {
            chance: BOSS_CRIT_CHANCE,
            multiplier_percent: BOSS_CRIT_PERCENT,
        }
    }

    fn hit_tint(&self) -> (Tint, usize) {
        (Tint::BossHit, 8)
    }

    fn take_hit(&mut self, damage: u32, from: Vec2) -> bool {
        if !self.is_active() {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        self.flash.set(BOSS_FLASH_SECS);
        self.knockback = normalize_or_zero(self.position - from) * BOSS_KNOCKBACK;
        if self.health > 0 {
            return false;
        }
        self.lifecycle = BossLifecycle::Defeated {
            timer: Countdown::started(BOSS_DEFEAT_SECS),
        };
        self.action = BossAction::Chasing;
        self.knockback = Vec2::ZERO;
        self.projectiles.clear();
        info!("boss defeated");
        true
    }

    fn apply_slow(&mut self, secs: f32, factor: f32) {
        if self.is_active() {
            self.slow.apply(secs, factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REFERENCE_FRAME_SECS;
    use crate::rng::ScriptedRng;
    use crate::world::GridWorld;

    const DT: f32 = REFERENCE_FRAME_SECS;

    fn arena() -> GridWorld {
        GridWorld::open(60, 60)
    }

    fn active_boss(at: Vec2) -> Boss {
        let mut boss = Boss::new(at);
        boss.force_active();
        boss
    }

    #[test]
    fn test_dormant_boss_is_inert() {
        let world = arena();
        let mut boss = Boss::new(Vec2::new(500.0, 500.0));
        let mut player = Player::new(Vec2::new(510.0, 500.0));
        let signals = boss.update(DT, &mut player, &world, &mut ScriptedRng::constant(0.0));
        assert!(signals.is_empty());
        assert!(!boss.is_targetable());
        assert!(!boss.take_hit(50, Vec2::ZERO));
        assert_eq!(boss.health, BOSS_MAX_HEALTH);
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn test_emergence_then_active() {
        let world = arena();
        let mut boss = Boss::new(Vec2::new(500.0, 500.0));
        let mut player = Player::new(Vec2::new(900.0, 900.0));
        let mut rng = ScriptedRng::constant(0.99);
        assert!(boss.spawn());
        assert!(!boss.spawn());
        let mut activated_at = None;
        for frame in 0..200 {
            let signals = boss.update(DT, &mut player, &world, &mut rng);
            if signals.contains(&BossSignal::Activated) {
                activated_at = Some(frame);
                break;
            }
            assert!(!boss.is_targetable());
        }
        let frame = activated_at.expect("boss never activated");
        assert!((119..=121).contains(&frame));
        assert!(boss.is_targetable());
    }

    #[test]
    fn test_phase_change_signalled_once() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        let mut player = Player::new(Vec2::new(1500.0, 1500.0));
        let mut rng = ScriptedRng::constant(0.99);
        boss.take_hit(160, Vec2::ZERO); // 340 / 500 = 0.68
        let first = boss.update(DT, &mut player, &world, &mut rng);
        assert!(first.contains(&BossSignal::PhaseChanged {
            phase: 1,
            pattern: AttackPattern::Charge,
        }));
        let second = boss.update(DT, &mut player, &world, &mut rng);
        assert!(!second
            .iter()
            .any(|s| matches!(s, BossSignal::PhaseChanged { .. })));
        assert_eq!(boss.phase().pattern, AttackPattern::Charge);
    }

    #[test]
    fn test_chase_pattern_contact_hit_is_immediate() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        let mut player = Player::new(Vec2::new(540.0, 500.0));
        let signals = boss.update(DT, &mut player, &world, &mut ScriptedRng::constant(0.99));
        assert!(signals.contains(&BossSignal::PlayerHit {
            attack: BossAttack::Contact,
            result: DamageResult::Applied { amount: BOSS_DAMAGE },
        }));
        assert_eq!(player.health, player.max_health - BOSS_DAMAGE);
    }

    #[test]
    fn test_charge_windup_then_dash() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.health = 300; // phase 1: charge pattern
        let mut player = Player::new(Vec2::new(800.0, 500.0));
        let mut rng = ScriptedRng::constant(0.1);

        let signals = boss.update(DT, &mut player, &world, &mut rng);
        assert!(matches!(boss.action(), BossAction::Windup { .. }));
        assert!(signals
            .iter()
            .any(|s| matches!(s, BossSignal::ActionStarted(BossAction::Windup { .. }))));

        // windup suspends movement
        let held = boss.position;
        for _ in 0..30 {
            boss.update(DT, &mut player, &world, &mut rng);
            if !matches!(boss.action(), BossAction::Windup { .. }) {
                break;
            }
            assert_eq!(boss.position, held);
        }
        for _ in 0..60 {
            if matches!(boss.action(), BossAction::Charging { .. }) {
                break;
            }
            boss.update(DT, &mut player, &world, &mut rng);
        }
        match boss.action() {
            BossAction::Charging { direction, .. } => {
                assert!((direction - Vec2::X).length() < 1e-4);
            }
            other => panic!("expected a charge, got {other:?}"),
        }
        let before = boss.position.x;
        boss.update(DT, &mut player, &world, &mut rng);
        let step = boss.position.x - before;
        let expected = BOSS_SPEED * 1.3 * BOSS_CHARGE_SPEED_MULT * DT;
        assert!((step - expected).abs() < 1e-3);
    }

    #[test]
    fn test_spin_damages_within_reach() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.health = 150; // phase 2: spin pattern
        let mut player = Player::new(Vec2::new(560.0, 500.0));
        let mut rng = ScriptedRng::constant(0.1);
        boss.update(DT, &mut player, &world, &mut rng);
        assert!(matches!(boss.action(), BossAction::Spinning { .. }));

        let signals = boss.update(DT, &mut player, &world, &mut rng);
        assert!(signals.contains(&BossSignal::PlayerHit {
            attack: BossAttack::Spin,
            result: DamageResult::Applied {
                amount: BOSS_DAMAGE * BOSS_SPIN_DAMAGE_MULT
            },
        }));
    }

    #[test]
    fn test_spin_pattern_falls_back_to_a_bolt() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.health = 150;
        let mut player = Player::new(Vec2::new(800.0, 500.0));
        let signals = boss.update(DT, &mut player, &world, &mut ScriptedRng::constant(0.9));
        assert!(signals.contains(&BossSignal::Fired(1)));
        assert_eq!(boss.projectiles().len(), 1);
        assert!(boss.projectiles()[0].velocity.x > 0.0);
    }

    #[test]
    fn test_long_spin_rolls_again_on_first_chase_frame() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.health = 50; // phase 3: frenzy, 2 s spin against a 0.7 s cadence
        let mut player = Player::new(Vec2::new(900.0, 500.0));
        let mut rng = ScriptedRng::constant(0.1);
        boss.update(DT, &mut player, &world, &mut rng);
        assert!(matches!(boss.action(), BossAction::Spinning { .. }));

        let mut frames = 0;
        while boss.action() != BossAction::Chasing {
            boss.update(DT, &mut player, &world, &mut rng);
            frames += 1;
            assert!(frames < 200);
        }
        assert!(frames as f32 * DT > PHASES[3].attack_interval);

        let signals = boss.update(DT, &mut player, &world, &mut rng);
        assert!(signals
            .iter()
            .any(|s| matches!(s, BossSignal::ActionStarted(BossAction::Spinning { .. }))));
    }

    #[test]
    fn test_knockback_decays_during_windup() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.action = BossAction::Windup {
            timer: Countdown::started(5.0),
        };
        boss.knockback = Vec2::new(300.0, 0.0);
        let mut player = Player::new(Vec2::new(900.0, 500.0));
        boss.update(DT, &mut player, &world, &mut ScriptedRng::constant(0.99));
        assert!(matches!(boss.action(), BossAction::Windup { .. }));
        assert!((boss.knockback.x - 300.0 * BOSS_KNOCKBACK_DECAY).abs() < 1e-3);
        assert_eq!(boss.position, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_frenzy_volley_and_bolt_consumption() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.health = 50; // phase 3: frenzy
        let mut player = Player::new(Vec2::new(700.0, 500.0));
        let mut rng = ScriptedRng::constant(0.9);
        let signals = boss.update(DT, &mut player, &world, &mut rng);
        assert!(signals.contains(&BossSignal::Fired(3)));
        assert_eq!(boss.projectiles().len(), 3);

        // keep the boss from rolling again while the bolts fly
        boss.attack_timer.set(100.0);
        let mut bolt_hits = 0;
        for _ in 0..60 {
            for s in boss.update(DT, &mut player, &world, &mut rng) {
                if let BossSignal::PlayerHit {
                    attack: BossAttack::Bolt,
                    result,
                } = s
                {
                    assert!(result.landed());
                    bolt_hits += 1;
                }
            }
            boss.position = Vec2::new(500.0, 500.0);
        }
        // the centre bolt lands and is consumed; the player is then invincible
        assert_eq!(bolt_hits, 1);
        assert_eq!(player.health, player.max_health - BOSS_BOLT_DAMAGE);
        assert!(boss.projectiles().len() < 3);
    }

    #[test]
    fn test_death_is_permanent_and_reported_once() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        assert!(!boss.take_hit(499, Vec2::ZERO));
        assert!(boss.take_hit(10, Vec2::ZERO));
        assert_eq!(boss.health, 0);
        assert!(!boss.take_hit(10, Vec2::ZERO));
        assert!(boss.is_defeated());
        assert!(!boss.is_targetable());
        assert!(!boss.spawn());

        let mut player = Player::new(Vec2::new(510.0, 500.0));
        let mut ticks = 0;
        while !boss.defeat_finished() {
            boss.update(DT, &mut player, &world, &mut ScriptedRng::constant(0.0));
            ticks += 1;
            assert!(ticks < 400);
        }
        assert!((179..=181).contains(&ticks));
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn test_ice_slows_boss() {
        let world = arena();
        let mut boss = active_boss(Vec2::new(500.0, 500.0));
        boss.apply_slow(3.0, 0.4);
        let mut player = Player::new(Vec2::new(900.0, 500.0));
        boss.update(DT, &mut player, &world, &mut ScriptedRng::constant(0.99));
        let step = boss.position.x - 500.0;
        assert!((step - BOSS_SPEED * 0.4 * DT).abs() < 1e-3);
    }
}
