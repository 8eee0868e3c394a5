use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::boss::{Boss, BossLifecycle, BossSignal};
use crate::combat::effects::EffectLayer;
use crate::combat::{CombatEngine, HitOutcome, TargetRef, Targets};
use crate::economy::{self, PurchaseReceipt, ShopItem};
use crate::engine::camera::Camera;
use crate::engine::config::SessionConfig;
use crate::engine::input::InputIntent;
use crate::events::{DamageSource, EventQueue, GameEvent, GemSource, PlayerAction};
use crate::loot::{roll_loot, LootLedger};
use crate::math::tile_center;
use crate::monster::{Monster, MonsterId, MonsterKind};
use crate::player::{ActionError, DamageResult, Player};
use crate::rng::{GameRng, SessionSeed, Stream};
use crate::spawner::Spawner;
use crate::world::{GridWorld, WorldQuery, ZoneId, ZoneLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub monsters_killed: u32,
    pub elapsed_secs: f32,
    pub frames: u64,
}

/// One of the fixed gem pickups lying in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldGem {
    pub position: Vec2,
    pub collected: bool,
}

/// Serializable snapshot for logs and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,
    pub stats: SessionStats,
    pub zone: ZoneId,
    pub player_health: f32,
    pub gold: u32,
    pub gems: u8,
    pub arrows: u32,
    pub monsters_alive: usize,
    pub boss_health: u32,
    pub boss_state: &'static str,
}

#[derive(Debug, Clone)]
struct RngStreams {
    combat: GameRng,
    ai: GameRng,
    loot: GameRng,
    spawn: GameRng,
}

impl RngStreams {
    fn new(seed: SessionSeed) -> Self {
        Self {
            combat: seed.stream(Stream::Combat),
            ai: seed.stream(Stream::Ai),
            loot: seed.stream(Stream::Loot),
            spawn: seed.stream(Stream::Spawn),
        }
    }
}

/// The whole play session: world, entities, random streams and the
/// notification queue. One `update` call is one frame.
#[derive(Resource)]
pub struct Simulation {
    config: SessionConfig,
    world: Box<dyn WorldQuery + Send + Sync>,
    player: Player,
    monsters: Vec<Monster>,
    boss: Boss,
    combat: CombatEngine,
    spawner: Spawner,
    ledger: LootLedger,
    gems: Vec<WorldGem>,
    rngs: RngStreams,
    camera: Camera,
    outcome: SessionOutcome,
    stats: SessionStats,
    paused: bool,
    zone: ZoneId,
    boss_action: &'static str,
    events: EventQueue,
}

impl Simulation {
    /// Build a session over `world`, populating the zones in `zones`.
    pub fn new(
        config: SessionConfig,
        world: Box<dyn WorldQuery + Send + Sync>,
        zones: ZoneLayout,
    ) -> Self {
        let seed = SessionSeed(config.seed);
        let mut rngs = RngStreams::new(seed);
        let mut spawner = Spawner::new(config.spawn.clone(), zones);
        let monsters = spawner.populate(world.as_ref(), &mut rngs.spawn);

        let (px, py) = config.player_start_tile;
        let player = Player::new(tile_center(px, py));
        let (bx, by) = config.boss_lair_tile;
        let boss = Boss::new(tile_center(bx, by));
        let gems = config
            .gem_tiles
            .iter()
            .map(|&(tx, ty)| WorldGem {
                position: tile_center(tx, ty),
                collected: false,
            })
            .collect();

        let mut camera = Camera::new(Vec2::new(config.viewport.0, config.viewport.1));
        camera.center_on(player.position, world.extent());
        let zone = world.zone_at_position(player.position);
        let effects = EffectLayer::new(seed.stream(Stream::Effects), config.effects);

        info!(seed = config.seed, monsters = monsters.len(), ?zone, "session started");
        Self {
            ledger: LootLedger::new(config.monster_gem_cap),
            combat: CombatEngine::new(effects),
            boss_action: boss.action().name(),
            config,
            world,
            player,
            monsters,
            boss,
            spawner,
            gems,
            rngs,
            camera,
            outcome: SessionOutcome::Playing,
            stats: SessionStats::default(),
            paused: false,
            zone,
            events: EventQueue::default(),
        }
    }

    /// Session over an in-memory grid, using the grid's own zones.
    pub fn from_grid(config: SessionConfig, world: GridWorld) -> Self {
        let zones = world.zones().clone();
        Self::new(config, Box::new(world), zones)
    }

    /// Session over the default realm map.
    pub fn realm(config: SessionConfig) -> Self {
        Self::from_grid(config, GridWorld::realm())
    }

    // =====================================================
    // Frame update
    // =====================================================

    /// Advance one frame. Does nothing while paused or once the session
    /// has ended.
    pub fn update(&mut self, dt: f32, input: &InputIntent) {
        if self.paused || self.outcome != SessionOutcome::Playing {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };
        self.stats.frames += 1;
        self.stats.elapsed_secs += dt;

        if let Some(element) = input.select {
            if let Err(err) = self.player.select_element(element) {
                self.reject(PlayerAction::SelectElement, err);
            }
        }

        self.player.update(dt, input.axis, self.world.as_ref());
        self.player_actions(input);

        // Melee resolves every frame the swing window is open.
        let hits = self.combat.resolve_player_swing(
            &mut self.player,
            &mut Targets::new(&mut self.monsters, Some(&mut self.boss)),
            &mut self.rngs.combat,
        );
        self.process_hits(&hits);

        self.update_monsters(dt);
        self.update_boss(dt);

        let hits = self
            .combat
            .update_arrows(dt, &mut Targets::new(&mut self.monsters, Some(&mut self.boss)));
        self.process_hits(&hits);

        self.collect_world_gems();

        self.spawner.trickle(
            dt,
            &mut self.monsters,
            self.player.position,
            self.world.as_ref(),
            &mut self.rngs.spawn,
        );
        self.monsters.retain(|m| !m.is_expired());

        self.combat.update_effects(dt);
        self.camera
            .follow(self.player.position, self.world.extent(), dt);
        self.track_zone();
        self.check_outcome();
    }

    fn player_actions(&mut self, input: &InputIntent) {
        if input.swing {
            if let Err(err) = self.player.begin_swing() {
                self.reject(PlayerAction::Swing, err);
            }
        }

        if input.fire_arrow {
            match self.player.fire_arrow() {
                Ok(shot) => self.combat.spawn_arrow(shot),
                Err(err) => self.reject(PlayerAction::FireArrow, err),
            }
        }

        if input.cast {
            match self.player.cast_element() {
                Ok(element) => {
                    let cast = self.combat.cast_element(
                        element,
                        &mut self.player,
                        &mut Targets::new(&mut self.monsters, Some(&mut self.boss)),
                    );
                    self.events.push(GameEvent::ElementCast {
                        element,
                        hits: cast.hits.len(),
                        healed: cast.healed,
                    });
                    self.process_hits(&cast.hits);
                }
                Err(err) => self.reject(PlayerAction::CastElement, err),
            }
        }
    }

    fn update_monsters(&mut self, dt: f32) {
        for monster in &mut self.monsters {
            let strike = monster.update(
                dt,
                self.player.position,
                self.world.as_ref(),
                &mut self.rngs.ai,
            );
            if let Some(strike) = strike {
                let result = self.player.take_damage(strike.damage, strike.from);
                report_player_damage(
                    &mut self.events,
                    &mut self.combat,
                    self.player.position,
                    DamageSource::Monster(strike.monster),
                    result,
                );
            }
        }
    }

    fn update_boss(&mut self, dt: f32) {
        let signals = self.boss.update(
            dt,
            &mut self.player,
            self.world.as_ref(),
            &mut self.rngs.combat,
        );
        for signal in signals {
            match signal {
                BossSignal::Activated => self.events.push(GameEvent::BossActivated),
                BossSignal::PhaseChanged { phase, pattern } => {
                    self.events.push(GameEvent::BossPhaseChanged { phase, pattern })
                }
                BossSignal::PlayerHit { attack, result } => report_player_damage(
                    &mut self.events,
                    &mut self.combat,
                    self.player.position,
                    DamageSource::Boss(attack),
                    result,
                ),
                BossSignal::ActionStarted(_) | BossSignal::Fired(_) => {}
            }
        }

        let action = self.boss.action().name();
        if action != self.boss_action {
            self.boss_action = action;
            self.events.push(GameEvent::BossActionChanged { action });
        }
    }

    /// Loot and notifications for resolved hits. Each kill is reported once,
    /// on the hit that caused it.
    fn process_hits(&mut self, hits: &[HitOutcome]) {
        for hit in hits.iter().filter(|h| h.killed) {
            match hit.target {
                TargetRef::Monster(id) => {
                    let Some(kind) = self.monsters.iter().find(|m| m.id == id).map(|m| m.kind)
                    else {
                        continue;
                    };
                    self.on_monster_killed(id, kind);
                }
                TargetRef::Boss => {
                    info!(elapsed = self.stats.elapsed_secs, "boss defeated");
                    self.events.push(GameEvent::BossDefeated);
                }
            }
        }
    }

    fn on_monster_killed(&mut self, id: MonsterId, kind: MonsterKind) {
        self.player.monsters_killed += 1;
        self.stats.monsters_killed += 1;
        self.events.push(GameEvent::MonsterKilled { id, kind });

        let roll = roll_loot(kind.archetype(), &mut self.rngs.loot);
        let grant = self.ledger.grant(roll, &mut self.player);
        self.events.push(GameEvent::LootGranted { kind, grant });
        if let Some(gem) = grant.gem {
            self.events.push(GameEvent::GemCollected {
                source: GemSource::Monster(kind),
                total: gem.total,
                unlocked: gem.unlocked,
            });
        }
    }

    fn collect_world_gems(&mut self) {
        let radius = self.config.gem_pickup_radius;
        for (index, gem) in self.gems.iter_mut().enumerate() {
            if gem.collected || gem.position.distance(self.player.position) >= radius {
                continue;
            }
            gem.collected = true;
            let unlocked = self.player.collect_gem();
            info!(index, total = self.player.gems(), ?unlocked, "gem collected");
            self.events.push(GameEvent::GemCollected {
                source: GemSource::World(index),
                total: self.player.gems(),
                unlocked,
            });
        }
    }

    fn track_zone(&mut self) {
        let zone = self.world.zone_at_position(self.player.position);
        if zone != self.zone {
            debug!(from = ?self.zone, to = ?zone, "zone changed");
            self.zone = zone;
            self.events.push(GameEvent::ZoneEntered(zone));
        }
    }

    fn check_outcome(&mut self) {
        if self.player.is_dead() {
            info!(elapsed = self.stats.elapsed_secs, "player died");
            self.events.push(GameEvent::PlayerDied);
            self.end(SessionOutcome::Lost);
            return;
        }

        let near_lair = self.player.position.distance(self.boss.position)
            < self.config.boss_trigger_radius;
        if self.player.gems() >= self.config.gems_required && near_lair && self.boss.spawn() {
            self.events.push(GameEvent::BossSpawned);
        }

        if self.boss.defeat_finished() {
            self.end(SessionOutcome::Won);
        }
    }

    fn end(&mut self, outcome: SessionOutcome) {
        self.outcome = outcome;
        info!(
            ?outcome,
            kills = self.stats.monsters_killed,
            elapsed = self.stats.elapsed_secs,
            "session ended"
        );
        self.events.push(GameEvent::SessionEnded(outcome));
    }

    fn reject(&mut self, action: PlayerAction, reason: ActionError) {
        debug!(?action, %reason, "action rejected");
        self.events.push(GameEvent::ActionRejected { action, reason });
    }

    // =====================================================
    // Commands
    // =====================================================

    /// Buy from the nearest shop in reach.
    pub fn purchase(&mut self, item: ShopItem) -> Result<PurchaseReceipt, ActionError> {
        let result = economy::nearest_shop(self.player.position, self.config.shop_radius)
            .ok_or(ActionError::NoShopNearby)
            .and_then(|shop| economy::purchase(shop, item, &mut self.player));
        match &result {
            Ok(receipt) => self.events.push(GameEvent::Purchased(*receipt)),
            Err(err) => self.reject(PlayerAction::Purchase, err.clone()),
        }
        result
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Place a monster with a fresh id.
    pub fn spawn_monster(&mut self, kind: MonsterKind, position: Vec2) -> MonsterId {
        let monster = self.spawner.spawn_at(kind, position);
        let id = monster.id;
        self.monsters.push(monster);
        id
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // =====================================================
    // Queries
    // =====================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn world(&self) -> &dyn WorldQuery {
        self.world.as_ref()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn monsters_mut(&mut self) -> &mut Vec<Monster> {
        &mut self.monsters
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn boss_mut(&mut self) -> &mut Boss {
        &mut self.boss
    }

    pub fn combat(&self) -> &CombatEngine {
        &self.combat
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn world_gems(&self) -> &[WorldGem] {
        &self.gems
    }

    pub fn loot_ledger(&self) -> &LootLedger {
        &self.ledger
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn summary(&self) -> SessionSummary {
        let boss_state = match self.boss.lifecycle() {
            BossLifecycle::Dormant => "dormant",
            BossLifecycle::Emerging { .. } => "emerging",
            BossLifecycle::Active => self.boss.action().name(),
            BossLifecycle::Defeated { .. } => "defeated",
        };
        SessionSummary {
            outcome: self.outcome,
            stats: self.stats,
            zone: self.zone,
            player_health: self.player.health,
            gold: self.player.inventory.gold,
            gems: self.player.gems(),
            arrows: self.player.inventory.arrows,
            monsters_alive: self.monsters.iter().filter(|m| m.is_alive()).count(),
            boss_health: self.boss.health,
            boss_state,
        }
    }
}

fn report_player_damage(
    events: &mut EventQueue,
    combat: &mut CombatEngine,
    at: Vec2,
    source: DamageSource,
    result: DamageResult,
) {
    match result {
        DamageResult::Applied { amount } => {
            combat.note_player_hit(at, amount);
            events.push(GameEvent::PlayerHit {
                source,
                damage: amount,
            });
        }
        DamageResult::Shielded => events.push(GameEvent::PlayerShielded { source }),
        DamageResult::Ignored => {}
    }
}
