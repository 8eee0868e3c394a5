//! Outbound notifications.
//!
//! The simulation queues a `GameEvent` for everything the UI, audio and
//! narrative layers react to. The host drains the queue once per frame; the
//! bevy plugin forwards each event through an `EventWriter`.

use bevy::prelude::Event;
use serde::Serialize;

use crate::abilities::Element;
use crate::boss::{AttackPattern, BossAttack};
use crate::economy::PurchaseReceipt;
use crate::engine::SessionOutcome;
use crate::loot::LootGrant;
use crate::monster::{MonsterId, MonsterKind};
use crate::player::ActionError;
use crate::world::ZoneId;

/// Player actions that can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerAction {
    Swing,
    FireArrow,
    SelectElement,
    CastElement,
    Purchase,
}

/// What hurt the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageSource {
    Monster(MonsterId),
    Boss(BossAttack),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GemSource {
    /// One of the fixed pickups, by index
    World(usize),
    Monster(MonsterKind),
}

#[derive(Event, Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    MonsterKilled {
        id: MonsterId,
        kind: MonsterKind,
    },
    LootGranted {
        kind: MonsterKind,
        grant: LootGrant,
    },
    GemCollected {
        source: GemSource,
        total: u8,
        unlocked: Option<Element>,
    },
    ElementCast {
        element: Element,
        hits: usize,
        healed: f32,
    },
    BossSpawned,
    BossActivated,
    BossPhaseChanged {
        phase: usize,
        pattern: AttackPattern,
    },
    BossActionChanged {
        action: &'static str,
    },
    BossDefeated,
    PlayerHit {
        source: DamageSource,
        damage: f32,
    },
    /// A shield charge absorbed a hit
    PlayerShielded {
        source: DamageSource,
    },
    PlayerDied,
    ZoneEntered(ZoneId),
    ActionRejected {
        action: PlayerAction,
        reason: ActionError,
    },
    Purchased(PurchaseReceipt),
    SessionEnded(SessionOutcome),
}

impl GameEvent {
    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            GameEvent::MonsterKilled { .. } => "monster_killed",
            GameEvent::LootGranted { .. } => "loot_granted",
            GameEvent::GemCollected { .. } => "gem_collected",
            GameEvent::ElementCast { .. } => "element_cast",
            GameEvent::BossSpawned => "boss_spawned",
            GameEvent::BossActivated => "boss_activated",
            GameEvent::BossPhaseChanged { .. } => "boss_phase_changed",
            GameEvent::BossActionChanged { .. } => "boss_action_changed",
            GameEvent::BossDefeated => "boss_defeated",
            GameEvent::PlayerHit { .. } => "player_hit",
            GameEvent::PlayerShielded { .. } => "player_shielded",
            GameEvent::PlayerDied => "player_died",
            GameEvent::ZoneEntered(_) => "zone_entered",
            GameEvent::ActionRejected { .. } => "action_rejected",
            GameEvent::Purchased(_) => "purchased",
            GameEvent::SessionEnded(_) => "session_ended",
        }
    }
}

/// Events raised since the last drain, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
