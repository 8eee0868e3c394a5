//! Session orchestration.
//!
//! `Simulation` owns every piece of session state and runs the frame in a
//! fixed order:
//!   input → player → melee → monsters → boss → arrows → gem pickups →
//!   spawner and corpse cleanup → effects → camera → zone → win/loss
//!
//! Player attacks resolve before any AI ticks, so a killing blow this frame
//! stops that monster from acting this frame.

pub mod camera;
pub mod config;
pub mod input;
pub mod plugin;
mod simulation;

pub use camera::Camera;
pub use config::{ConfigError, SessionConfig, SpawnConfig};
pub use input::InputIntent;
pub use plugin::SimulationPlugin;
pub use simulation::{SessionOutcome, SessionStats, SessionSummary, Simulation, WorldGem};

// =====================================================
// Tests
// =====================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;

    use crate::boss::BossLifecycle;
    use crate::economy::{ShopItem, SHOPS};
    use crate::equipment::WeaponId;
    use crate::events::{DamageSource, GameEvent, GemSource, PlayerAction};
    use crate::monster::MonsterKind;
    use crate::player::ActionError;
    use crate::world::{GridWorld, ZoneId, ZoneLayout, ZoneRect};

    fn arena_config() -> SessionConfig {
        SessionConfig {
            player_start_tile: (10, 10),
            boss_lair_tile: (35, 35),
            gem_tiles: vec![],
            spawn: SpawnConfig {
                initial_count: (0, 0),
                spawn_chance: 0.0,
                ..SpawnConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    fn arena(config: SessionConfig) -> Simulation {
        Simulation::from_grid(config, GridWorld::open(40, 40).with_zones(ZoneLayout::empty()))
    }

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_realm_session_starts_populated() {
        let sim = Simulation::realm(SessionConfig::default());
        assert!(!sim.monsters().is_empty());
        assert_eq!(sim.outcome(), SessionOutcome::Playing);
        assert_eq!(sim.boss().lifecycle(), BossLifecycle::Dormant);
        assert_eq!(sim.world_gems().len(), 3);
    }

    #[test]
    fn test_paused_frames_do_not_advance() {
        let mut sim = arena(arena_config());
        let start = sim.player().position;
        sim.set_paused(true);
        sim.update(FRAME, &InputIntent::moving(Vec2::X));
        assert_eq!(sim.stats().frames, 0);
        assert_eq!(sim.player().position, start);
        sim.set_paused(false);
        sim.update(FRAME, &InputIntent::moving(Vec2::X));
        assert_eq!(sim.stats().frames, 1);
    }

    #[test]
    fn test_frame_delta_clamped() {
        let mut sim = arena(arena_config());
        let start = sim.player().position;
        sim.update(1.0, &InputIntent::moving(Vec2::X));
        assert!((sim.stats().elapsed_secs - 0.05).abs() < 1e-6);
        assert!((sim.player().position.x - start.x - 7.5).abs() < 1e-3);
    }

    #[test]
    fn test_killing_blow_stops_monster_this_frame() {
        let mut sim = arena(arena_config());
        let at = sim.player().position + Vec2::new(0.0, 20.0);
        let id = sim.spawn_monster(MonsterKind::Goblin, at);
        sim.monsters_mut()[0].health = 1;

        sim.update(FRAME, &InputIntent::default().with_swing());
        assert_eq!(sim.player().health, 100.0);
        assert!(!sim.monsters()[0].is_alive());
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::MonsterKilled {
            id,
            kind: MonsterKind::Goblin
        }));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::LootGranted { kind: MonsterKind::Goblin, .. })));
        assert_eq!(sim.stats().monsters_killed, 1);
        assert!(sim.player().inventory.gold >= 55);
    }

    #[test]
    fn test_monster_strike_reports_player_hit() {
        let mut sim = arena(arena_config());
        let at = sim.player().position + Vec2::new(20.0, 0.0);
        let id = sim.spawn_monster(MonsterKind::Goblin, at);
        sim.update(FRAME, &InputIntent::default());
        assert_eq!(sim.player().health, 95.0);
        assert!(sim.drain_events().contains(&GameEvent::PlayerHit {
            source: DamageSource::Monster(id),
            damage: 5.0
        }));
    }

    #[test]
    fn test_corpse_removed_after_fade() {
        let mut sim = arena(arena_config());
        let at = sim.player().position + Vec2::new(0.0, 20.0);
        sim.spawn_monster(MonsterKind::Goblin, at);
        sim.monsters_mut()[0].health = 1;
        sim.update(FRAME, &InputIntent::default().with_swing());
        assert_eq!(sim.monsters().len(), 1);
        for _ in 0..40 {
            sim.update(FRAME, &InputIntent::default());
        }
        assert!(sim.monsters().is_empty());
    }

    #[test]
    fn test_rejections_become_events() {
        let mut sim = arena(arena_config());
        sim.player_mut().inventory.arrows = 0;
        sim.update(FRAME, &InputIntent::default().with_arrow().with_cast());
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::ActionRejected {
            action: PlayerAction::FireArrow,
            reason: ActionError::NoAmmunition
        }));
        assert!(events.contains(&GameEvent::ActionRejected {
            action: PlayerAction::CastElement,
            reason: ActionError::NoElementSelected
        }));
        assert!(sim.combat().arrows().is_empty());
    }

    #[test]
    fn test_gem_pickup_triggers_boss() {
        let config = SessionConfig {
            gems_required: 1,
            gem_tiles: vec![(10, 10)],
            boss_lair_tile: (12, 10),
            ..arena_config()
        };
        let mut sim = arena(config);
        sim.update(FRAME, &InputIntent::default());
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::GemCollected {
            source: GemSource::World(0),
            total: 1,
            unlocked: Some(crate::abilities::Element::Fire)
        }));
        assert!(events.contains(&GameEvent::BossSpawned));
        assert!(sim.world_gems()[0].collected);
        assert!(matches!(sim.boss().lifecycle(), BossLifecycle::Emerging { .. }));

        // spawn fires once
        sim.update(FRAME, &InputIntent::default());
        assert!(!sim.drain_events().contains(&GameEvent::BossSpawned));
    }

    #[test]
    fn test_boss_not_triggered_without_gems() {
        let config = SessionConfig {
            boss_lair_tile: (12, 10),
            ..arena_config()
        };
        let mut sim = arena(config);
        sim.update(FRAME, &InputIntent::default());
        assert_eq!(sim.boss().lifecycle(), BossLifecycle::Dormant);
    }

    #[test]
    fn test_player_death_loses_and_freezes() {
        let mut sim = arena(arena_config());
        let at = sim.player().position + Vec2::new(20.0, 0.0);
        sim.spawn_monster(MonsterKind::Goblin, at);
        sim.player_mut().health = 1.0;
        sim.update(FRAME, &InputIntent::default());
        assert_eq!(sim.outcome(), SessionOutcome::Lost);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::PlayerDied));
        assert_eq!(events.last(), Some(&GameEvent::SessionEnded(SessionOutcome::Lost)));

        let frames = sim.stats().frames;
        sim.update(FRAME, &InputIntent::default());
        assert_eq!(sim.stats().frames, frames);
    }

    #[test]
    fn test_boss_defeat_wins_after_sequence() {
        let mut sim = arena(arena_config());
        let at = sim.player().position + Vec2::new(0.0, 30.0);
        sim.boss_mut().position = at;
        sim.boss_mut().force_active();
        sim.boss_mut().health = 1;

        sim.update(FRAME, &InputIntent::default().with_swing());
        assert!(sim.boss().is_defeated());
        assert!(sim.drain_events().contains(&GameEvent::BossDefeated));
        assert_eq!(sim.outcome(), SessionOutcome::Playing);

        for _ in 0..70 {
            sim.update(0.05, &InputIntent::default());
        }
        assert_eq!(sim.outcome(), SessionOutcome::Won);
        assert!(sim
            .drain_events()
            .contains(&GameEvent::SessionEnded(SessionOutcome::Won)));
    }

    #[test]
    fn test_purchase_needs_nearby_shop() {
        let mut sim = Simulation::realm(SessionConfig::default());
        assert_eq!(
            sim.purchase(ShopItem::Weapon(WeaponId::IronSword)),
            Err(ActionError::NoShopNearby)
        );
        sim.player_mut().position = SHOPS[0].position();
        sim.player_mut().inventory.gold = 100;
        let receipt = sim.purchase(ShopItem::Weapon(WeaponId::IronSword)).unwrap();
        assert_eq!(receipt.shop, "Camelot Armory");
        assert_eq!(sim.player().inventory.equipped(), WeaponId::IronSword);
        let events = sim.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::Purchased(_))));
    }

    #[test]
    fn test_zone_change_event() {
        let mut sim = Simulation::from_grid(
            arena_config(),
            GridWorld::open(40, 40)
                .with_zones(ZoneLayout::new(vec![ZoneRect::new(ZoneId::Forest, 11, 0, 10, 40)])),
        );
        assert_eq!(sim.zone(), ZoneId::Wilderness);
        for _ in 0..5 {
            sim.update(0.05, &InputIntent::moving(Vec2::X));
        }
        assert_eq!(sim.zone(), ZoneId::Forest);
        assert!(sim
            .drain_events()
            .contains(&GameEvent::ZoneEntered(ZoneId::Forest)));
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = || {
            let mut sim = Simulation::realm(SessionConfig::default());
            for frame in 0..300 {
                let axis = if frame % 120 < 60 { Vec2::X } else { Vec2::Y };
                let mut input = InputIntent::moving(axis);
                input.swing = frame % 20 == 0;
                sim.update(FRAME, &input);
            }
            sim.summary()
        };
        assert_eq!(run(), run());
    }
}
