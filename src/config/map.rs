use super::traits::ConfigSection;
use crate::engines::generation::genome::GenotypeLayout;
use crate::error::MapGenError;
use crate::types::{Position, TileType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    pub layout: GenotypeLayout,
    pub spawn_rooms: Vec<SpawnRoom>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Fixed square room stamped over the decoded layout, anchored to a corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRoom {
    pub tile: TileType,
    pub corner: Corner,
    pub offset: usize,
    pub size: usize,
}

impl SpawnRoom {
    pub fn new(tile: TileType, corner: Corner) -> Self {
        Self {
            tile,
            corner,
            offset: 2,
            size: 5,
        }
    }

    /// Top-left cell of the room. Callers must have validated the room fits.
    pub fn origin(&self, width: usize, height: usize) -> Position {
        let far_x = width - self.offset - self.size;
        let far_y = height - self.offset - self.size;
        match self.corner {
            Corner::TopLeft => Position::new(self.offset, self.offset),
            Corner::TopRight => Position::new(far_x, self.offset),
            Corner::BottomLeft => Position::new(self.offset, far_y),
            Corner::BottomRight => Position::new(far_x, far_y),
        }
    }

    /// Centre of the room, used as the team's BFS source
    pub fn reference_tile(&self, width: usize, height: usize) -> Position {
        let origin = self.origin(width, height);
        Position::new(origin.x + self.size / 2, origin.y + self.size / 2)
    }

    fn fits(&self, width: usize, height: usize) -> bool {
        // Keep at least one cell between the room and the border wall
        self.size > 0
            && self.offset >= 1
            && self.offset + self.size < width
            && self.offset + self.size < height
    }

    /// True if at least one clear row or column separates the two rooms
    fn is_apart_from(&self, other: &SpawnRoom, width: usize, height: usize) -> bool {
        let a = self.origin(width, height);
        let b = other.origin(width, height);
        a.x + self.size < b.x
            || b.x + other.size < a.x
            || a.y + self.size < b.y
            || b.y + other.size < a.y
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            layout: GenotypeLayout::default(),
            spawn_rooms: vec![
                SpawnRoom::new(TileType::Team1Spawn, Corner::TopLeft),
                SpawnRoom::new(TileType::Team2Spawn, Corner::BottomRight),
            ],
        }
    }
}

impl MapConfig {
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn reference_tiles(&self) -> Vec<Position> {
        self.spawn_rooms
            .iter()
            .map(|room| room.reference_tile(self.width, self.height))
            .collect()
    }
}

impl ConfigSection for MapConfig {
    fn section_name() -> &'static str {
        "map"
    }

    fn validate(&self) -> Result<(), MapGenError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapGenError::Configuration(format!(
                "Grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.layout.arenas + self.layout.corridors == 0 {
            return Err(MapGenError::Configuration(
                "Genotype layout needs at least one arena or corridor gene to join the spawns".to_string()
            ));
        }
        if self.spawn_rooms.len() < 2 {
            return Err(MapGenError::Configuration(format!(
                "At least 2 spawn rooms are required, got {}",
                self.spawn_rooms.len()
            )));
        }
        for room in &self.spawn_rooms {
            if !room.fits(self.width, self.height) {
                return Err(MapGenError::Configuration(format!(
                    "Spawn room {:?} does not fit inside a {}x{} grid",
                    room, self.width, self.height
                )));
            }
        }

        for (i, a) in self.spawn_rooms.iter().enumerate() {
            for b in &self.spawn_rooms[i + 1..] {
                if !a.is_apart_from(b, self.width, self.height) {
                    return Err(MapGenError::Configuration(format!(
                        "Spawn rooms {:?} and {:?} overlap or touch on a {}x{} grid",
                        a.corner, b.corner, self.width, self.height
                    )));
                }
            }
        }
        Ok(())
    }
}
