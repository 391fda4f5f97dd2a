use crate::types::{Position, TileType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-size 2D tile map, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// A grid filled with `Impassable`
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, TileType::Impassable)
    }

    pub fn filled(width: usize, height: usize, tile: TileType) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    pub fn get(&self, pos: Position) -> Option<TileType> {
        self.contains(pos).then(|| self.tiles[self.index(pos)])
    }

    pub fn set(&mut self, pos: Position, tile: TileType) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.tiles[idx] = tile;
        }
    }

    /// Paint a signed coordinate, silently skipping anything off the grid
    pub fn paint(&mut self, x: i64, y: i64, tile: TileType) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let pos = Position::new(x as usize, y as usize);
        if !self.contains(pos) {
            return false;
        }
        self.set(pos, tile);
        true
    }

    /// Paint the half-open rectangle `[x, x + w) x [y, y + h)`, clipped
    pub fn paint_rect(&mut self, x: i64, y: i64, w: i64, h: i64, tile: TileType) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i64);
        let y1 = y.saturating_add(h).min(self.height as i64);
        for cy in y0..y1 {
            for cx in x0..x1 {
                self.paint(cx, cy, tile);
            }
        }
    }

    /// Overwrite the outermost ring of cells
    pub fn paint_border(&mut self, tile: TileType) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        for x in 0..self.width {
            self.set(Position::new(x, 0), tile);
            self.set(Position::new(x, self.height - 1), tile);
        }
        for y in 0..self.height {
            self.set(Position::new(0, y), tile);
            self.set(Position::new(self.width - 1, y), tile);
        }
    }

    /// 4-connected neighbours that lie inside the grid
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        const OFFSETS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let x = pos.x as i64 + dx;
            let y = pos.y as i64 + dy;
            if x < 0 || y < 0 {
                return None;
            }
            let candidate = Position::new(x as usize, y as usize);
            self.contains(candidate).then_some(candidate)
        })
    }

    /// Every cell in raster order
    pub fn positions(&self) -> impl Iterator<Item = (Position, TileType)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &tile)| (Position::new(i % self.width, i / self.width), tile))
    }

    pub fn positions_of(&self, tile: TileType) -> Vec<Position> {
        self.positions()
            .filter(|&(_, t)| t == tile)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    pub fn contains_tile(&self, tile: TileType) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn traversable_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_traversable()).count()
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|t| t.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
