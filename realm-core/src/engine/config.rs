//! Session configuration.
//!
//! Loaded from `.ron` or `.json` by extension. Every field has a default, so
//! a config file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::constants::{MAX_FRAME_DT, MAX_GEMS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Monster population settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between trickle passes
    pub interval_secs: f32,
    /// Chance a zone below its cap gets a monster on a pass
    pub spawn_chance: f32,
    /// Live monsters of one kind allowed per zone
    pub zone_cap: usize,
    /// Inclusive range for the initial count per kind and zone
    pub initial_count: (u32, u32),
    /// Trickle spawns never land this close to the player
    pub min_player_distance: f32,
    pub initial_attempts: u32,
    pub trickle_attempts: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5.0,
            spawn_chance: 0.02,
            zone_cap: 8,
            initial_count: (3, 8),
            min_player_distance: 300.0,
            initial_attempts: 20,
            trickle_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed: u64,
    /// Frame deltas are clamped to this many seconds
    pub max_frame_dt: f32,
    /// Record particles, damage numbers and element visuals
    pub effects: bool,
    pub viewport: (f32, f32),
    pub player_start_tile: (i32, i32),
    pub boss_lair_tile: (i32, i32),
    pub boss_trigger_radius: f32,
    pub gems_required: u8,
    pub monster_gem_cap: u8,
    pub gem_pickup_radius: f32,
    pub shop_radius: f32,
    /// World gem pickups, in tiles
    pub gem_tiles: Vec<(i32, i32)>,
    pub spawn: SpawnConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_frame_dt: MAX_FRAME_DT,
            effects: true,
            viewport: (800.0, 600.0),
            player_start_tile: (10, 15),
            boss_lair_tile: (183, 74),
            boss_trigger_radius: 200.0,
            gems_required: MAX_GEMS,
            monster_gem_cap: 2,
            gem_pickup_radius: 30.0,
            shop_radius: 50.0,
            gem_tiles: vec![(25, 25), (85, 30), (130, 70)],
            spawn: SpawnConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load and validate a `.ron` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = match extension(path).as_str() {
            "ron" => ron::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            other => return Err(ConfigError::UnsupportedExtension(other.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Write to `.ron` or `.json` by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match extension(path).as_str() {
            "ron" => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?,
            "json" => serde_json::to_string_pretty(self)?,
            other => return Err(ConfigError::UnsupportedExtension(other.to_string())),
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| -> Result<(), ConfigError> {
            warn!(%msg, "rejected session config");
            Err(ConfigError::Invalid(msg))
        };
        if self.max_frame_dt.is_nan() || self.max_frame_dt <= 0.0 {
            return fail(format!("max_frame_dt must be positive, got {}", self.max_frame_dt));
        }
        if self.gems_required == 0 {
            return fail("gems_required must be at least 1".into());
        }
        if self.gems_required > MAX_GEMS {
            return fail(format!("gems_required cannot exceed {MAX_GEMS}"));
        }
        let (lo, hi) = self.spawn.initial_count;
        if lo > hi {
            return fail(format!("initial_count range is inverted: {lo}..={hi}"));
        }
        if !(0.0..=1.0).contains(&self.spawn.spawn_chance) {
            return fail(format!("spawn_chance must be in [0, 1], got {}", self.spawn.spawn_chance));
        }
        if self.spawn.interval_secs.is_nan() || self.spawn.interval_secs <= 0.0 {
            return fail("spawn interval must be positive".into());
        }
        if self.viewport.0 <= 0.0 || self.viewport.1 <= 0.0 {
            return fail("viewport must be positive".into());
        }
        Ok(())
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}
