use crate::map::TileGrid;
use crate::types::{Position, TileType};
use std::collections::VecDeque;

/// Sentinel for cells the search never reached
pub const UNREACHED: i32 = -1;

/// Per-cell hop counts from one or more sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    width: usize,
    height: usize,
    distances: Vec<i32>,
}

impl DistanceMap {
    fn unreached(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            distances: vec![UNREACHED; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Hop count, or `UNREACHED` (also for positions off the map)
    pub fn get(&self, pos: Position) -> i32 {
        if pos.x >= self.width || pos.y >= self.height {
            return UNREACHED;
        }
        self.distances[pos.y * self.width + pos.x]
    }

    pub fn distance(&self, pos: Position) -> Option<u32> {
        let d = self.get(pos);
        (d != UNREACHED).then_some(d as u32)
    }

    pub fn is_reached(&self, pos: Position) -> bool {
        self.get(pos) != UNREACHED
    }

    pub fn reached_count(&self) -> usize {
        self.distances.iter().filter(|&&d| d != UNREACHED).count()
    }

    pub fn max_distance(&self) -> Option<i32> {
        self.distances.iter().copied().filter(|&d| d != UNREACHED).max()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.distances
    }
}

/// Breadth-first flood fill over 4-connected traversable tiles.
///
/// With a `target` the search stops as soon as the target is dequeued, so
/// cells left at `UNREACHED` are only "not visited yet", not proof that they
/// are cut off.
pub fn flood_fill(grid: &TileGrid, source: Position, target: Option<Position>) -> DistanceMap {
    flood_fill_multi(grid, &[source], target)
}

/// Flood fill seeded from several sources at distance zero
pub fn flood_fill_multi(grid: &TileGrid, sources: &[Position], target: Option<Position>) -> DistanceMap {
    let mut map = DistanceMap::unreached(grid.width(), grid.height());
    let mut queue = VecDeque::new();

    for &source in sources {
        if !grid.get(source).is_some_and(TileType::is_traversable) {
            continue;
        }
        let idx = grid.index(source);
        if map.distances[idx] == UNREACHED {
            map.distances[idx] = 0;
            queue.push_back(source);
        }
    }

    while let Some(current) = queue.pop_front() {
        if Some(current) == target {
            break;
        }
        let next_distance = map.distances[grid.index(current)] + 1;
        for next in grid.neighbours(current) {
            let idx = grid.index(next);
            if map.distances[idx] != UNREACHED {
                continue;
            }
            if grid.get(next).is_some_and(TileType::is_traversable) {
                map.distances[idx] = next_distance;
                queue.push_back(next);
            }
        }
    }

    map
}

/// Copy of `grid` with every tile not reachable from all reference tiles
/// turned into wall, leaving only the shared playable region.
pub fn prune_unreachable(grid: &TileGrid, references: &[Position]) -> TileGrid {
    let maps: Vec<DistanceMap> = references
        .iter()
        .map(|&source| flood_fill(grid, source, None))
        .collect();

    let mut pruned = grid.clone();
    for (pos, _) in grid.positions() {
        if maps.iter().any(|m| !m.is_reached(pos)) {
            pruned.set(pos, TileType::Impassable);
        }
    }
    pruned
}
