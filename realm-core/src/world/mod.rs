//! World query surface.
//!
//! The simulation never generates or mutates terrain. It asks a `WorldQuery`
//! whether a tile blocks movement and which zone a tile belongs to.
//! Out-of-bounds tiles are always solid.

pub mod zones;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::TILE_SIZE;
use crate::math::world_to_tile;
pub use zones::{ZoneId, ZoneLayout, ZoneRect};

/// Tile-collision and zone oracle.
pub trait WorldQuery {
    /// True when the tile blocks movement. Must return true out of bounds.
    fn is_solid(&self, tx: i32, ty: i32) -> bool;

    fn zone_at(&self, tx: i32, ty: i32) -> ZoneId;

    /// World size in tiles.
    fn dimensions(&self) -> (i32, i32);

    /// World size in world units.
    fn extent(&self) -> Vec2 {
        let (w, h) = self.dimensions();
        Vec2::new(w as f32 * TILE_SIZE, h as f32 * TILE_SIZE)
    }

    fn zone_at_position(&self, pos: Vec2) -> ZoneId {
        let (tx, ty) = world_to_tile(pos);
        self.zone_at(tx, ty)
    }
}

/// How an entity's footprint is tested against solid tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionProbe {
    /// Only the tile under the centre point
    Point,
    /// Four corners of a square with this half-extent
    Box(f32),
}

impl CollisionProbe {
    pub fn blocked(&self, world: &dyn WorldQuery, pos: Vec2) -> bool {
        match *self {
            CollisionProbe::Point => {
                let (tx, ty) = world_to_tile(pos);
                world.is_solid(tx, ty)
            }
            CollisionProbe::Box(half) => [
                Vec2::new(pos.x - half, pos.y - half),
                Vec2::new(pos.x + half, pos.y - half),
                Vec2::new(pos.x - half, pos.y + half),
                Vec2::new(pos.x + half, pos.y + half),
            ]
            .into_iter()
            .any(|corner| {
                let (tx, ty) = world_to_tile(corner);
                world.is_solid(tx, ty)
            }),
        }
    }
}

/// Move by `delta`, resolving each axis independently: the X step is tried
/// first, then the Y step from wherever X ended up. A blocked axis is
/// dropped, which lets entities slide along walls.
pub fn move_with_collision(
    world: &dyn WorldQuery,
    pos: Vec2,
    delta: Vec2,
    probe: CollisionProbe,
) -> Vec2 {
    let mut out = pos;
    let try_x = Vec2::new(pos.x + delta.x, pos.y);
    if !probe.blocked(world, try_x) {
        out.x = try_x.x;
    }
    let try_y = Vec2::new(out.x, pos.y + delta.y);
    if !probe.blocked(world, try_y) {
        out.y = try_y.y;
    }
    out
}

/// In-memory tile grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    width: i32,
    height: i32,
    solid: Vec<bool>,
    zones: ZoneLayout,
}

impl GridWorld {
    /// Fully walkable world with the realm zone layout.
    pub fn open(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            solid: vec![false; (width * height) as usize],
            zones: ZoneLayout::realm(),
        }
    }

    /// Build from rows of text. `#` and `~` are solid, anything else is
    /// walkable. Short rows are padded with walkable tiles.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len().max(1) as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(1).max(1) as i32;
        let mut world = Self::open(width, height);
        world.zones = ZoneLayout::empty();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' || c == '~' {
                    world.set_solid(x as i32, y as i32, true);
                }
            }
        }
        world
    }

    /// The 200 × 150 realm: open ground, a walled castle with a south gate,
    /// and Crystal Lake crossed by one bridge row.
    pub fn realm() -> Self {
        let mut world = Self::open(200, 150);

        // Crystal Lake, bridged at row 68
        for ty in 50..90 {
            if ty == 68 {
                continue;
            }
            for tx in 41..59 {
                world.set_solid(tx, ty, true);
            }
        }

        // Ing Castle outer walls, gate in the middle of the south wall
        let (cx, cy, cw, ch): (i32, i32, i32, i32) = (175, 55, 16, 16);
        let gate_x = cx + cw / 2;
        for ty in cy..cy + ch {
            for tx in cx..cx + cw {
                let edge = ty == cy || ty == cy + ch - 1 || tx == cx || tx == cx + cw - 1;
                let gate = ty == cy + ch - 1 && (tx - gate_x).abs() <= 1;
                if edge && !gate {
                    world.set_solid(tx, ty, true);
                }
            }
        }
        world
    }

    pub fn with_zones(mut self, zones: ZoneLayout) -> Self {
        self.zones = zones;
        self
    }

    pub fn set_solid(&mut self, tx: i32, ty: i32, solid: bool) {
        if let Some(idx) = self.index(tx, ty) {
            self.solid[idx] = solid;
        }
    }

    pub fn zones(&self) -> &ZoneLayout {
        &self.zones
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
            None
        } else {
            Some((ty * self.width + tx) as usize)
        }
    }
}

impl WorldQuery for GridWorld {
    fn is_solid(&self, tx: i32, ty: i32) -> bool {
        self.index(tx, ty).map(|i| self.solid[i]).unwrap_or(true)
    }

    fn zone_at(&self, tx: i32, ty: i32) -> ZoneId {
        self.zones.zone_at(tx, ty)
    }

    fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tile_center;

    #[test]
    fn test_out_of_bounds_is_solid() {
        let world = GridWorld::open(4, 4);
        assert!(world.is_solid(-1, 0));
        assert!(world.is_solid(0, 4));
        assert!(world.is_solid(100, 100));
        assert!(!world.is_solid(3, 3));
    }

    #[test]
    fn test_ascii_builder() {
        let world = GridWorld::from_ascii(&["....", ".#..", "...~"]);
        assert_eq!(world.dimensions(), (4, 3));
        assert!(world.is_solid(1, 1));
        assert!(world.is_solid(3, 2));
        assert!(!world.is_solid(0, 0));
        assert_eq!(world.zone_at(0, 0), ZoneId::Wilderness);
    }

    #[test]
    fn test_slide_along_wall() {
        // Wall column at x = 2
        let world = GridWorld::from_ascii(&["..#..", "..#..", "..#.."]);
        let start = Vec2::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);
        let moved = move_with_collision(&world, start, Vec2::new(40.0, 10.0), CollisionProbe::Point);
        assert_eq!(moved.x, start.x);
        assert_eq!(moved.y, start.y + 10.0);
    }

    #[test]
    fn test_box_probe_catches_corner() {
        let world = GridWorld::from_ascii(&["...", ".#.", "..."]);
        // Centre of tile (0,0) sits clear with a small box, but a wide box
        // reaches into the solid tile at (1,1).
        let pos = tile_center(0, 0) + Vec2::splat(10.0);
        assert!(!CollisionProbe::Box(2.0).blocked(&world, pos));
        assert!(CollisionProbe::Box(10.0).blocked(&world, pos));
    }

    #[test]
    fn test_realm_landmarks() {
        let world = GridWorld::realm();
        assert_eq!(world.dimensions(), (200, 150));
        assert!(world.is_solid(175, 60));
        assert!(!world.is_solid(183, 70), "gate must be open");
        assert!(!world.is_solid(183, 74), "boss lair must be walkable");
        assert!(world.is_solid(50, 60));
        assert!(!world.is_solid(50, 68), "bridge crosses the lake");
        assert_eq!(world.zone_at(10, 15), ZoneId::Meadow);
    }
}
