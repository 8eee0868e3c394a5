//! Named zones of the realm and their tile rectangles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoneId {
    Meadow,
    Forest,
    Village,
    Desert,
    Swamp,
    Mountains,
    Lake,
    Castle,
    Ruins,
    Darklands,
    /// Any tile not covered by a named zone
    Wilderness,
}

impl ZoneId {
    pub fn display_name(&self) -> &'static str {
        match self {
            ZoneId::Meadow => "Green Meadow",
            ZoneId::Forest => "Dark Forest",
            ZoneId::Village => "Camelot Village",
            ZoneId::Desert => "Scorched Wastes",
            ZoneId::Swamp => "Merlin's Swamp",
            ZoneId::Mountains => "Dragon Mountains",
            ZoneId::Lake => "Crystal Lake",
            ZoneId::Castle => "Ing Castle",
            ZoneId::Ruins => "Ancient Ruins",
            ZoneId::Darklands => "The Darklands",
            ZoneId::Wilderness => "Wilderness",
        }
    }

    pub fn is_named(&self) -> bool {
        *self != ZoneId::Wilderness
    }
}

/// Axis-aligned rectangle of tiles, `[x, x + w) × [y, y + h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRect {
    pub zone: ZoneId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ZoneRect {
    pub const fn new(zone: ZoneId, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { zone, x, y, w, h }
    }

    pub fn contains(&self, tx: i32, ty: i32) -> bool {
        tx >= self.x && tx < self.x + self.w && ty >= self.y && ty < self.y + self.h
    }
}

const REALM_ZONES: [ZoneRect; 10] = [
    ZoneRect::new(ZoneId::Meadow, 0, 0, 60, 50),
    ZoneRect::new(ZoneId::Forest, 60, 0, 50, 60),
    ZoneRect::new(ZoneId::Village, 0, 50, 40, 40),
    ZoneRect::new(ZoneId::Desert, 110, 0, 50, 50),
    ZoneRect::new(ZoneId::Swamp, 60, 60, 50, 40),
    ZoneRect::new(ZoneId::Mountains, 110, 50, 50, 50),
    ZoneRect::new(ZoneId::Lake, 40, 50, 20, 40),
    ZoneRect::new(ZoneId::Castle, 160, 40, 40, 40),
    ZoneRect::new(ZoneId::Ruins, 0, 90, 50, 40),
    ZoneRect::new(ZoneId::Darklands, 110, 100, 60, 50),
];

/// Ordered zone rectangles. The first rectangle containing a tile wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    rects: Vec<ZoneRect>,
}

impl ZoneLayout {
    pub fn new(rects: Vec<ZoneRect>) -> Self {
        Self { rects }
    }

    /// The default realm map (200 × 150 tiles).
    pub fn realm() -> Self {
        Self::new(REALM_ZONES.to_vec())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn zone_at(&self, tx: i32, ty: i32) -> ZoneId {
        self.rects
            .iter()
            .find(|r| r.contains(tx, ty))
            .map(|r| r.zone)
            .unwrap_or(ZoneId::Wilderness)
    }

    pub fn rect(&self, zone: ZoneId) -> Option<&ZoneRect> {
        self.rects.iter().find(|r| r.zone == zone)
    }

    pub fn rects(&self) -> &[ZoneRect] {
        &self.rects
    }
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self::realm()
    }
}
