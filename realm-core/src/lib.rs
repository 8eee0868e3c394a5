//! Realm Core - Gameplay Simulation Library
//!
//! Deterministic simulation core for a top-down action-adventure realm:
//! - Player movement, melee swings, arrows and elemental abilities
//! - Data-driven monsters with an idle/patrol/chase/return state machine
//! - Multi-phase boss encounter (The Black Knight)
//! - Combat resolution, loot, gems and shops
//! - Zone-capped monster spawning
//! - Frame orchestration with outbound notifications
//! - Headless bevy integration and a Monte-Carlo balance simulator

pub mod abilities;
pub mod balance;
pub mod boss;
pub mod combat;
pub mod constants;
pub mod economy;
pub mod engine;
pub mod equipment;
pub mod events;
pub mod logging;
pub mod loot;
pub mod math;
pub mod monster;
pub mod player;
pub mod rng;
pub mod spawner;
pub mod timer;
pub mod world;
