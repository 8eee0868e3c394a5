//! Monte-Carlo weapon balance.
//!
//! Runs seeded melee duels for every weapon against every monster archetype
//! through the real swing resolution and crit rolls, then grades how far
//! apart the weapons' kill times are. Pairings run in parallel with rayon.

use bevy::math::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::info;

use crate::combat::effects::EffectLayer;
use crate::combat::{resolve_melee, Combatant, Targets};
use crate::equipment::WeaponId;
use crate::logging::TimingSpan;
use crate::monster::{Monster, MonsterId, MonsterKind};
use crate::player::Player;
use crate::rng::GameRng;
use crate::world::GridWorld;

/// Duels stop after this many swings even if the monster still stands.
const MAX_SWINGS: u32 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Duels per weapon/monster pairing
    pub trials: u32,
    pub base_seed: u64,
    pub weapons: Vec<WeaponId>,
    pub monsters: Vec<MonsterKind>,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            trials: 200,
            base_seed: 42,
            weapons: WeaponId::ALL.to_vec(),
            monsters: MonsterKind::ALL.to_vec(),
        }
    }
}

/// Outcome of one duel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuelResult {
    pub swings: u32,
    pub crits: u32,
    /// Seconds from the first swing to the killing one
    pub time_to_kill: f32,
    pub killed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupStats {
    pub weapon: WeaponId,
    pub monster: MonsterKind,
    pub trials: u32,
    pub mean_swings: f32,
    pub mean_time_to_kill: f32,
    pub crit_rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSummary {
    pub weapon: WeaponId,
    /// Mean over every archetype
    pub mean_time_to_kill: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub total_duels: u64,
    pub matchups: Vec<MatchupStats>,
    pub weapon_summaries: Vec<WeaponSummary>,
    pub fastest: Option<WeaponId>,
    pub slowest: Option<WeaponId>,
    /// Slowest over fastest weapon mean kill time
    pub ttk_range_ratio: f32,
    pub balance_grade: BalanceGrade,
}

/// Overall balance assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceGrade {
    Excellent, // range ratio < 1.5
    Good,      // range ratio < 2.0
    Fair,      // range ratio < 3.0
    Poor,      // range ratio < 5.0
    Critical,  // range ratio >= 5.0
}

impl BalanceGrade {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio < 1.5 {
            Self::Excellent
        } else if ratio < 2.0 {
            Self::Good
        } else if ratio < 3.0 {
            Self::Fair
        } else if ratio < 5.0 {
            Self::Poor
        } else {
            Self::Critical
        }
    }
}

fn duel_seed(base: u64, weapon: WeaponId, monster: MonsterKind, trial: u32) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base.to_le_bytes());
    hasher.update([weapon as u8, monster as u8]);
    hasher.update(trial.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

/// Swing at a stationary monster standing in front of the player until it
/// dies, waiting out the weapon's cooldown between swings.
pub fn simulate_duel(weapon: WeaponId, kind: MonsterKind, seed: u64) -> DuelResult {
    let world = GridWorld::open(8, 8);
    let origin = Vec2::splat(128.0);
    let mut player = Player::new(origin);
    player.add_weapon(weapon);
    let _ = player.equip_weapon(weapon);
    player.facing = Vec2::X;

    let mut monster = Monster::new(MonsterId(0), kind, origin + Vec2::new(20.0, 0.0));
    let mut rng = GameRng::new(seed);
    let mut fx = EffectLayer::new(GameRng::new(seed), false);
    let spec = weapon.spec();
    let cooldown = spec.swing_cooldown();

    let mut swings = 0;
    let mut crits = 0;
    while monster.is_targetable() && swings < MAX_SWINGS {
        if player.begin_swing().is_err() {
            player.update(cooldown, Vec2::ZERO, &world);
            continue;
        }
        swings += 1;
        let Some(swing) = player.swing_mut() else {
            break;
        };
        let mut targets = Targets::new(std::slice::from_mut(&mut monster), None);
        let hits = resolve_melee(origin, swing, spec, &mut targets, &mut rng, &mut fx);
        crits += hits.iter().filter(|h| h.critical).count() as u32;
        player.update(cooldown, Vec2::ZERO, &world);
    }

    DuelResult {
        swings,
        crits,
        time_to_kill: swings.saturating_sub(1) as f32 * cooldown,
        killed: !monster.is_alive(),
    }
}

/// Run every pairing in parallel and grade the spread.
pub fn run_balance_simulation(config: &BalanceConfig) -> BalanceReport {
    let _span = TimingSpan::new("balance_simulation");

    let pairings: Vec<(WeaponId, MonsterKind)> = config
        .weapons
        .iter()
        .flat_map(|&w| config.monsters.iter().map(move |&m| (w, m)))
        .collect();

    let matchups: Vec<MatchupStats> = pairings
        .par_iter()
        .map(|&(weapon, monster)| {
            let results: Vec<DuelResult> = (0..config.trials)
                .map(|trial| {
                    simulate_duel(weapon, monster, duel_seed(config.base_seed, weapon, monster, trial))
                })
                .collect();
            summarize(weapon, monster, &results)
        })
        .collect();

    let report = analyze(config, matchups);
    info!(
        duels = report.total_duels,
        ratio = report.ttk_range_ratio,
        grade = ?report.balance_grade,
        "balance simulation finished"
    );
    report
}

fn summarize(weapon: WeaponId, monster: MonsterKind, results: &[DuelResult]) -> MatchupStats {
    let n = results.len().max(1) as f32;
    let swings: u32 = results.iter().map(|r| r.swings).sum();
    let crits: u32 = results.iter().map(|r| r.crits).sum();
    let ttk: f32 = results.iter().map(|r| r.time_to_kill).sum();
    MatchupStats {
        weapon,
        monster,
        trials: results.len() as u32,
        mean_swings: swings as f32 / n,
        mean_time_to_kill: ttk / n,
        crit_rate: if swings == 0 {
            0.0
        } else {
            crits as f32 / swings as f32
        },
    }
}

fn analyze(config: &BalanceConfig, matchups: Vec<MatchupStats>) -> BalanceReport {
    let weapon_summaries: Vec<WeaponSummary> = config
        .weapons
        .iter()
        .filter_map(|&weapon| {
            let times: Vec<f32> = matchups
                .iter()
                .filter(|m| m.weapon == weapon)
                .map(|m| m.mean_time_to_kill)
                .collect();
            if times.is_empty() {
                return None;
            }
            Some(WeaponSummary {
                weapon,
                mean_time_to_kill: times.iter().sum::<f32>() / times.len() as f32,
            })
        })
        .collect();

    let fastest = weapon_summaries
        .iter()
        .min_by(|a, b| a.mean_time_to_kill.total_cmp(&b.mean_time_to_kill));
    let slowest = weapon_summaries
        .iter()
        .max_by(|a, b| a.mean_time_to_kill.total_cmp(&b.mean_time_to_kill));
    let ratio = match (fastest, slowest) {
        (Some(f), Some(s)) if f.mean_time_to_kill > 0.001 => {
            s.mean_time_to_kill / f.mean_time_to_kill
        }
        (Some(_), Some(_)) => 999.0,
        _ => 1.0,
    };

    BalanceReport {
        total_duels: matchups.iter().map(|m| m.trials as u64).sum(),
        fastest: fastest.map(|w| w.weapon),
        slowest: slowest.map(|w| w.weapon),
        ttk_range_ratio: ratio,
        balance_grade: BalanceGrade::from_ratio(ratio),
        weapon_summaries,
        matchups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> BalanceConfig {
        BalanceConfig {
            trials: 20,
            ..BalanceConfig::default()
        }
    }

    #[test]
    fn test_duel_kills_and_counts_swings() {
        let result = simulate_duel(WeaponId::RustySword, MonsterKind::Goblin, 7);
        assert!(result.killed);
        // 30 hp at 8 per hit (14 on a crit) takes between 3 and 4 swings
        assert!((3..=4).contains(&result.swings), "{result:?}");
        assert!(result.crits <= result.swings);
    }

    #[test]
    fn test_time_to_kill_uses_weapon_cooldown() {
        let result = simulate_duel(WeaponId::BattleAxe, MonsterKind::Troll, 3);
        let cooldown = WeaponId::BattleAxe.spec().swing_cooldown();
        let expected = (result.swings - 1) as f32 * cooldown;
        assert!((result.time_to_kill - expected).abs() < 1e-4);
    }

    #[test]
    fn test_every_pairing_reported() {
        let report = run_balance_simulation(&small());
        assert_eq!(report.matchups.len(), 8 * 8);
        assert_eq!(report.total_duels, 8 * 8 * 20);
        assert_eq!(report.weapon_summaries.len(), 8);
    }

    #[test]
    fn test_stronger_weapon_is_faster() {
        let report = run_balance_simulation(&small());
        assert_eq!(report.fastest, Some(WeaponId::Excalibur));
        assert_eq!(report.slowest, Some(WeaponId::RustySword));
        assert!(report.ttk_range_ratio > 1.0);
    }

    #[test]
    fn test_crit_rate_near_fifteen_percent() {
        let config = BalanceConfig {
            trials: 400,
            weapons: vec![WeaponId::RustySword],
            monsters: vec![MonsterKind::Troll],
            ..BalanceConfig::default()
        };
        let report = run_balance_simulation(&config);
        let rate = report.matchups[0].crit_rate;
        assert!((0.1..0.2).contains(&rate), "crit rate {rate}");
    }

    #[test]
    fn test_deterministic_results() {
        let a = run_balance_simulation(&small());
        let b = run_balance_simulation(&small());
        assert_eq!(a.ttk_range_ratio, b.ttk_range_ratio);
        assert_eq!(a.fastest, b.fastest);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(BalanceGrade::from_ratio(1.2), BalanceGrade::Excellent);
        assert_eq!(BalanceGrade::from_ratio(1.5), BalanceGrade::Good);
        assert_eq!(BalanceGrade::from_ratio(2.5), BalanceGrade::Fair);
        assert_eq!(BalanceGrade::from_ratio(4.9), BalanceGrade::Poor);
        assert_eq!(BalanceGrade::from_ratio(5.0), BalanceGrade::Critical);
    }

    #[test]
    fn test_empty_config() {
        let config = BalanceConfig {
            weapons: vec![],
            ..BalanceConfig::default()
        };
        let report = run_balance_simulation(&config);
        assert_eq!(report.total_duels, 0);
        assert_eq!(report.fastest, None);
        assert_eq!(report.balance_grade, BalanceGrade::Excellent);
    }

    #[test]
    fn test_report_serialization() {
        let config = BalanceConfig {
            trials: 2,
            weapons: vec![WeaponId::Spear],
            monsters: vec![MonsterKind::Wolf],
            ..BalanceConfig::default()
        };
        let report = run_balance_simulation(&config);
        let json = serde_json::to_string(&report).unwrap();
        let restored: BalanceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.total_duels, 2);
        assert_eq!(restored.fastest, Some(WeaponId::Spear));
    }
}
