use crate::config::map::{MapConfig, SpawnRoom};
use crate::config::traits::ConfigSection;
use crate::engines::generation::genome::{Gene, GeneKind, Genotype};
use crate::error::Result;
use crate::map::TileGrid;
use crate::types::{Position, TileType};

/// Corridors are always three tiles wide
const CORRIDOR_HALF_WIDTH: i64 = 1;

/// Deterministic genotype -> tile grid decoder
#[derive(Debug, Clone)]
pub struct Decoder {
    width: usize,
    height: usize,
    spawn_rooms: Vec<SpawnRoom>,
}

impl Decoder {
    pub fn new(config: &MapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            width: config.width,
            height: config.height,
            spawn_rooms: config.spawn_rooms.clone(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Centre tile of each spawn room, in spawn-room order
    pub fn reference_tiles(&self) -> Vec<Position> {
        self.spawn_rooms
            .iter()
            .map(|room| room.reference_tile(self.width, self.height))
            .collect()
    }

    pub fn decode(&self, genotype: &Genotype) -> TileGrid {
        let mut grid = TileGrid::new(self.width, self.height);

        // Capture zones override everything painted before them
        for gene in genotype.iter().filter(|g| g.kind() != GeneKind::CaptureZone) {
            paint_gene(&mut grid, gene);
        }
        for gene in genotype.iter().filter(|g| g.kind() == GeneKind::CaptureZone) {
            paint_gene(&mut grid, gene);
        }

        for room in &self.spawn_rooms {
            let origin = room.origin(self.width, self.height);
            let size = room.size as i64;
            grid.paint_rect(origin.x as i64, origin.y as i64, size, size, room.tile);
        }

        grid.paint_border(TileType::Impassable);
        grid
    }
}

fn paint_gene(grid: &mut TileGrid, gene: &Gene) {
    match *gene {
        Gene::Arena { x, y, size } => {
            let side = (size as i64).abs();
            grid.paint_rect(x as i64, y as i64, side, side, TileType::Passable);
        }
        Gene::Corridor { x, y, length } => {
            paint_line(grid, x, y, length, CORRIDOR_HALF_WIDTH, TileType::Passable);
        }
        Gene::Barrier { x, y, length } => {
            paint_line(grid, x, y, length, 0, TileType::Barrier);
        }
        Gene::HealthPickup { x, y } => {
            grid.paint(x as i64, y as i64, TileType::HealthPickup);
        }
        Gene::CaptureZone { x, y, size } => {
            // Unlike arenas the side is not mirrored: a non-positive size paints nothing
            let side = size as i64;
            grid.paint_rect(x as i64, y as i64, side, side, TileType::CapturePoint);
        }
    }
}

/// `length > 1` runs right from `(x, y)`; anything else runs down for `|length|`
fn paint_line(grid: &mut TileGrid, x: i32, y: i32, length: i32, half_width: i64, tile: TileType) {
    let (x, y, length) = (x as i64, y as i64, length as i64);
    let thickness = 2 * half_width + 1;
    if length > 1 {
        grid.paint_rect(x, y - half_width, length, thickness, tile);
    } else {
        grid.paint_rect(x - half_width, y, thickness, length.abs(), tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::GenotypeLayout;

    fn decoder(width: usize, height: usize) -> Decoder {
        Decoder::new(&MapConfig::with_dimensions(width, height)).unwrap()
    }

    fn layout_with(genes: &[(usize, Gene)]) -> Genotype {
        let mut genotype = GenotypeLayout::default().blank();
        for &(index, gene) in genes {
            genotype.set(index, gene);
        }
        genotype
    }

    #[test]
    fn test_blank_genotype_has_only_spawns() {
        let grid = decoder(20, 20).decode(&GenotypeLayout::default().blank());
        assert_eq!(grid.count(TileType::Team1Spawn), 25);
        assert_eq!(grid.count(TileType::Team2Spawn), 25);
        assert_eq!(grid.count(TileType::Passable), 0);
        assert!(!grid.contains_tile(TileType::CapturePoint));
    }

    #[test]
    fn test_horizontal_corridor_is_three_rows() {
        let genotype = layout_with(&[(15, Gene::Corridor { x: 8, y: 10, length: 4 })]);
        let grid = decoder(20, 20).decode(&genotype);

        assert_eq!(grid.count(TileType::Passable), 12);
        for y in 9..=11 {
            for x in 8..12 {
                assert_eq!(grid.get(Position::new(x, y)), Some(TileType::Passable));
            }
        }
        assert_eq!(grid.get(Position::new(12, 10)), Some(TileType::Impassable));
    }

    #[test]
    fn test_vertical_corridor_runs_down() {
        let genotype = layout_with(&[(16, Gene::Corridor { x: 10, y: 8, length: -5 })]);
        let grid = decoder(20, 20).decode(&genotype);

        assert_eq!(grid.count(TileType::Passable), 15);
        assert_eq!(grid.get(Position::new(9, 8)), Some(TileType::Passable));
        assert_eq!(grid.get(Position::new(11, 12)), Some(TileType::Passable));
        assert_eq!(grid.get(Position::new(10, 13)), Some(TileType::Impassable));
    }

    #[test]
    fn test_length_one_corridor_is_vertical() {
        let genotype = layout_with(&[(16, Gene::Corridor { x: 10, y: 8, length: 1 })]);
        let grid = decoder(20, 20).decode(&genotype);
        assert_eq!(grid.count(TileType::Passable), 3);
        assert_eq!(grid.get(Position::new(9, 8)), Some(TileType::Passable));
    }

    #[test]
    fn test_negative_arena_size_is_mirrored() {
        let genotype = layout_with(&[(0, Gene::Arena { x: 8, y: 8, size: -3 })]);
        let grid = decoder(20, 20).decode(&genotype);
        assert_eq!(grid.count(TileType::Passable), 9);
    }

    #[test]
    fn test_capture_zone_overrides_and_spawns_override_capture() {
        let genotype = layout_with(&[
            (0, Gene::Arena { x: 5, y: 5, size: 10 }),
            (30, Gene::CaptureZone { x: 9, y: 9, size: 2 }),
        ]);
        let grid = decoder(20, 20).decode(&genotype);
        assert_eq!(grid.count(TileType::CapturePoint), 4);

        let genotype = layout_with(&[(30, Gene::CaptureZone { x: 3, y: 3, size: 2 })]);
        let grid = decoder(20, 20).decode(&genotype);
        assert_eq!(grid.count(TileType::CapturePoint), 0);
    }

    #[test]
    fn test_barrier_and_pickup() {
        let mut config = MapConfig::with_dimensions(20, 20);
        config.layout = GenotypeLayout { arenas: 1, corridors: 0, barriers: 1, pickups: 1 };
        let decoder = Decoder::new(&config).unwrap();

        let genotype = Genotype::new(vec![
            Gene::Arena { x: 5, y: 5, size: 10 },
            Gene::Barrier { x: 6, y: 10, length: 5 },
            Gene::HealthPickup { x: 12, y: 12 },
            Gene::CaptureZone { x: 0, y: 0, size: 0 },
        ]);
        let grid = decoder.decode(&genotype);
        assert_eq!(grid.count(TileType::Barrier), 5);
        assert_eq!(grid.get(Position::new(12, 12)), Some(TileType::HealthPickup));
    }

    #[test]
    fn test_border_is_impassable() {
        let genotype = layout_with(&[(0, Gene::Arena { x: -5, y: -5, size: 40 })]);
        let grid = decoder(20, 20).decode(&genotype);
        for i in 0..20 {
            assert_eq!(grid.get(Position::new(i, 0)), Some(TileType::Impassable));
            assert_eq!(grid.get(Position::new(i, 19)), Some(TileType::Impassable));
            assert_eq!(grid.get(Position::new(0, i)), Some(TileType::Impassable));
            assert_eq!(grid.get(Position::new(19, i)), Some(TileType::Impassable));
        }
        assert_eq!(grid.count(TileType::Passable), 18 * 18 - 50);
    }
}
