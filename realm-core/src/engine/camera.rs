//! Follow camera.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::CAMERA_FOLLOW;
use crate::math::frame_factor;

/// Top-left corner of the viewport in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
        }
    }

    /// Jump straight to `target`.
    pub fn center_on(&mut self, target: Vec2, world: Vec2) {
        self.position = self.clamped(target - self.viewport / 2.0, world);
    }

    /// Ease toward `target`, then clamp to `[0, world - viewport]`.
    pub fn follow(&mut self, target: Vec2, world: Vec2, dt: f32) {
        let desired = target - self.viewport / 2.0;
        let t = 1.0 - frame_factor(1.0 - CAMERA_FOLLOW, dt);
        self.position = self.clamped(self.position.lerp(desired, t), world);
    }

    fn clamped(&self, pos: Vec2, world: Vec2) -> Vec2 {
        let max = (world - self.viewport).max(Vec2::ZERO);
        pos.clamp(Vec2::ZERO, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REFERENCE_FRAME_SECS;

    const WORLD: Vec2 = Vec2::new(2000.0, 1500.0);

    #[test]
    fn test_one_reference_frame_moves_ten_percent() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.position = Vec2::new(100.0, 100.0);
        cam.follow(Vec2::new(1500.0, 1300.0), WORLD, REFERENCE_FRAME_SECS);
        // desired (1100, 1000)
        assert!((cam.position.x - 200.0).abs() < 1e-3);
        assert!((cam.position.y - 190.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamped_to_world() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.center_on(Vec2::new(10.0, 10.0), WORLD);
        assert_eq!(cam.position, Vec2::ZERO);
        cam.center_on(Vec2::new(1990.0, 1490.0), WORLD);
        assert_eq!(cam.position, Vec2::new(1200.0, 900.0));
    }

    #[test]
    fn test_world_smaller_than_viewport() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.follow(Vec2::new(300.0, 300.0), Vec2::new(400.0, 400.0), 1.0);
        assert_eq!(cam.position, Vec2::ZERO);
    }
}
