//! Spatial helpers shared by movement, combat and AI.
//!
//! All positions are `Vec2` in world units. Angles are radians measured the
//! usual way (`atan2(y, x)`), so angle 0 faces +x.

use bevy::math::Vec2;
use std::f32::consts::{PI, TAU};

use crate::constants::{KNOCKBACK_EPSILON, REFERENCE_FRAME_SECS, TILE_SIZE};

/// Unit vector in the direction of `v`, or zero for a zero-length input.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Angle of the vector from `from` towards `to`.
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    dir_to_angle(to - from)
}

pub fn dir_to_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Absolute angular deviation between two angles, normalized to `[0, π]`.
pub fn angle_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI {
        TAU - d
    } else {
        d
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// True when two circles touch or overlap.
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Tile coordinate containing a world position. Negative positions map to
/// negative tiles, which every world query treats as solid.
pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / TILE_SIZE).floor() as i32,
        (pos.y / TILE_SIZE).floor() as i32,
    )
}

/// World position of a tile's centre.
pub fn tile_center(tx: i32, ty: i32) -> Vec2 {
    Vec2::new(
        tx as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        ty as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}

/// Convert a per-reference-frame factor into the factor for a `dt`-long step.
pub fn frame_factor(per_frame: f32, dt: f32) -> f32 {
    per_frame.powf(dt / REFERENCE_FRAME_SECS)
}

/// Geometric knockback decay. Components whose magnitude drops below the
/// epsilon snap to exactly zero.
pub fn decay_knockback(knockback: Vec2, per_frame: f32, dt: f32) -> Vec2 {
    let decayed = knockback * frame_factor(per_frame, dt);
    let snap = |c: f32| if c.abs() < KNOCKBACK_EPSILON { 0.0 } else { c };
    Vec2::new(snap(decayed.x), snap(decayed.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::KNOCKBACK_DECAY;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize_or_zero(Vec2::ZERO), Vec2::ZERO);
        let n = normalize_or_zero(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_diff_wraps() {
        assert!((angle_diff(0.1, TAU - 0.1) - 0.2).abs() < 1e-5);
        assert!((angle_diff(PI, -PI)).abs() < 1e-5);
        assert!((angle_diff(0.0, PI) - PI).abs() < 1e-5);
        assert!(angle_diff(-3.0, 3.0) <= PI);
    }

    #[test]
    fn test_angle_roundtrip() {
        let dir = angle_to_dir(dir_to_angle(Vec2::new(0.0, 1.0)));
        assert!((dir - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_world_to_tile() {
        assert_eq!(world_to_tile(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(world_to_tile(Vec2::new(31.9, 64.0)), (0, 2));
        assert_eq!(world_to_tile(Vec2::new(-1.0, 5.0)), (-1, 0));
        assert_eq!(world_to_tile(tile_center(7, 3)), (7, 3));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_frame_factor_matches_reference_frame() {
        assert!((frame_factor(0.85, REFERENCE_FRAME_SECS) - 0.85).abs() < 1e-6);
        assert!((frame_factor(0.85, 2.0 * REFERENCE_FRAME_SECS) - 0.7225).abs() < 1e-5);
    }

    #[test]
    fn test_knockback_snaps_to_zero() {
        let mut kb = Vec2::new(300.0, -120.0);
        for _ in 0..200 {
            kb = decay_knockback(kb, KNOCKBACK_DECAY, REFERENCE_FRAME_SECS);
        }
        assert_eq!(kb, Vec2::ZERO);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
    }
}
