use crate::config::fitness::FitnessConfig;
use crate::config::map::MapConfig;
use crate::config::traits::ConfigSection;
use crate::engines::evaluation::reachability::{flood_fill, DistanceMap, UNREACHED};
use crate::engines::generation::decoder::Decoder;
use crate::engines::generation::genome::Genotype;
use crate::error::{MapGenError, Result};
use crate::map::TileGrid;
use crate::types::{Position, TelemetryInputs, TileType};
use serde::{Deserialize, Serialize};

/// Why a layout scored zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    NoCaptureZone,
    CaptureZoneUnreachable { team: usize },
}

/// Balance metrics for one team
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamBalance {
    /// Mean safety value over the capture-zone tiles
    pub strategic_control: f64,
    /// Fraction of traversable tiles this team reaches comfortably first
    pub area_control: f64,
    /// Fraction of traversable tiles visited on the way to the next team's spawn
    pub exploration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceMetrics {
    pub teams: Vec<TeamBalance>,
    /// Strategic control of team one minus team two
    pub control_delta: f64,
    /// Capture progress of team one minus team two
    pub percentage_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub fitness: f64,
    pub rejection: Option<Rejection>,
    pub metrics: Option<BalanceMetrics>,
}

impl FitnessReport {
    fn rejected(reason: Rejection) -> Self {
        Self {
            fitness: 0.0,
            rejection: Some(reason),
            metrics: None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Scores a genotype by how well its layout counteracts the team currently
/// ahead in the live match.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    decoder: Decoder,
    references: Vec<Position>,
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(map: &MapConfig, config: &FitnessConfig) -> Result<Self> {
        config.validate()?;
        let decoder = Decoder::new(map)?;
        let references = decoder.reference_tiles();
        if references.len() < 2 {
            return Err(MapGenError::Configuration(format!(
                "Fitness needs at least 2 reference tiles, got {}",
                references.len()
            )));
        }
        Ok(Self {
            decoder,
            references,
            config: config.clone(),
        })
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn reference_tiles(&self) -> &[Position] {
        &self.references
    }

    pub fn evaluate(&self, genotype: &Genotype, telemetry: &TelemetryInputs) -> f64 {
        self.evaluate_detailed(genotype, telemetry).fitness
    }

    pub fn evaluate_detailed(&self, genotype: &Genotype, telemetry: &TelemetryInputs) -> FitnessReport {
        let grid = self.decoder.decode(genotype);
        self.evaluate_grid(&grid, telemetry)
    }

    pub fn evaluate_grid(&self, grid: &TileGrid, telemetry: &TelemetryInputs) -> FitnessReport {
        let targets = grid.positions_of(TileType::CapturePoint);
        if targets.is_empty() {
            return FitnessReport::rejected(Rejection::NoCaptureZone);
        }

        let maps: Vec<DistanceMap> = self
            .references
            .iter()
            .map(|&reference| flood_fill(grid, reference, None))
            .collect();

        for (team, map) in maps.iter().enumerate() {
            if targets.iter().any(|&t| !map.is_reached(t)) {
                return FitnessReport::rejected(Rejection::CaptureZoneUnreachable { team });
            }
        }

        let traversable = grid.traversable_count().max(1) as f64;
        let teams: Vec<TeamBalance> = (0..maps.len())
            .map(|team| TeamBalance {
                strategic_control: self.strategic_control(&maps, team, &targets),
                area_control: self.area_control(grid, &maps, team, traversable),
                exploration: self.exploration(grid, team, traversable),
            })
            .collect();

        let control_delta = teams[0].strategic_control - teams[1].strategic_control;
        let percentage_delta = telemetry.percentage_delta();
        let fitness = (1.0 - (control_delta + percentage_delta).abs() / 2.0).clamp(0.0, 1.0);

        FitnessReport {
            fitness,
            rejection: None,
            metrics: Some(BalanceMetrics {
                teams,
                control_delta,
                percentage_delta,
            }),
        }
    }

    /// 0 when the tile is no closer to `team` than to its opponents, rising
    /// towards 1 the more exclusively `team` gets there first.
    pub fn safety_value(maps: &[DistanceMap], team: usize, pos: Position) -> f64 {
        let own = maps[team].get(pos);
        if own == UNREACHED {
            return 0.0;
        }

        let mut total_other = 0.0;
        for (other, map) in maps.iter().enumerate() {
            if other == team {
                continue;
            }
            let distance = map.get(pos);
            if distance == UNREACHED {
                return 1.0;
            }
            total_other += distance as f64;
        }
        // Constructors guarantee at least two reference tiles
        let other = total_other / (maps.len() - 1) as f64;
        let own = own as f64;

        let sum = other + own;
        if sum <= 0.0 {
            return 0.0;
        }
        ((other - own) / sum).max(0.0)
    }

    fn strategic_control(&self, maps: &[DistanceMap], team: usize, targets: &[Position]) -> f64 {
        let total: f64 = targets
            .iter()
            .map(|&t| Self::safety_value(maps, team, t))
            .sum();
        total / targets.len() as f64
    }

    fn area_control(&self, grid: &TileGrid, maps: &[DistanceMap], team: usize, traversable: f64) -> f64 {
        let controlled = grid
            .positions()
            .filter(|(_, tile)| tile.is_traversable())
            .filter(|&(pos, _)| Self::safety_value(maps, team, pos) > self.config.area_control_threshold)
            .count();
        controlled as f64 / traversable
    }

    fn exploration(&self, grid: &TileGrid, team: usize, traversable: f64) -> f64 {
        let destination = self.references[(team + 1) % self.references.len()];
        let visited = flood_fill(grid, self.references[team], Some(destination));
        visited.reached_count() as f64 / traversable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::{Gene, GenotypeLayout};

    fn evaluator() -> FitnessEvaluator {
        FitnessEvaluator::new(&MapConfig::with_dimensions(20, 20), &FitnessConfig::default()).unwrap()
    }

    fn central_arena(capture: Gene) -> Genotype {
        let mut genotype = GenotypeLayout::default().blank();
        genotype.set(0, Gene::Arena { x: 5, y: 5, size: 10 });
        genotype.set(30, capture);
        genotype
    }

    #[test]
    fn test_safety_value() {
        let grid = TileGrid::filled(5, 1, TileType::Passable);
        let maps = vec![
            flood_fill(&grid, Position::new(0, 0), None),
            flood_fill(&grid, Position::new(4, 0), None),
        ];
        // Distances 1 and 3
        let near_one = Position::new(1, 0);
        assert!((FitnessEvaluator::safety_value(&maps, 0, near_one) - 0.5).abs() < 1e-12);
        assert_eq!(FitnessEvaluator::safety_value(&maps, 1, near_one), 0.0);
        // Equidistant
        assert_eq!(FitnessEvaluator::safety_value(&maps, 0, Position::new(2, 0)), 0.0);
        // Own reference tile
        assert_eq!(FitnessEvaluator::safety_value(&maps, 0, Position::new(0, 0)), 1.0);
    }

    #[test]
    fn test_symmetric_layout_is_balanced() {
        let genotype = central_arena(Gene::CaptureZone { x: 9, y: 9, size: 2 });
        let report = evaluator().evaluate_detailed(&genotype, &TelemetryInputs::fresh(60.0));

        assert!(!report.is_rejected());
        let metrics = report.metrics.unwrap();
        assert!(metrics.control_delta.abs() < 1e-9);
        assert!((report.fitness - 1.0).abs() < 1e-9);
        for team in &metrics.teams {
            assert!(team.exploration > 0.0 && team.exploration <= 1.0);
            assert!(team.area_control >= 0.0 && team.area_control <= 1.0);
        }
    }

    /// One-tile-wide path of 41 tiles from (4, 4) to (15, 15) with a two-tile
    /// dead end hanging off each spawn. Path tile `i` is `i` steps from team
    /// one and `40 - i` from team two; the capture point sits at `i = 20`.
    fn winding_path() -> TileGrid {
        let mut grid = TileGrid::new(20, 20);
        let mut paint = |xs: std::ops::RangeInclusive<usize>, ys: std::ops::RangeInclusive<usize>| {
            for y in ys {
                for x in xs.clone() {
                    grid.set(Position::new(x, y), TileType::Passable);
                }
            }
        };
        paint(4..=4, 1..=6);
        paint(4..=18, 1..=1);
        paint(18..=18, 1..=18);
        paint(15..=18, 18..=18);
        paint(15..=15, 13..=18);
        grid.set(Position::new(18, 4), TileType::CapturePoint);
        grid
    }

    #[test]
    fn test_area_control_and_exploration_on_winding_path() {
        let evaluator = evaluator();
        let grid = winding_path();
        assert_eq!(grid.traversable_count(), 45);

        // Path tile 13 at (14, 1) is 13 steps from team one and 27 from team
        // two: exactly on the threshold, so it does not count
        let maps: Vec<DistanceMap> = evaluator
            .reference_tiles()
            .iter()
            .map(|&r| flood_fill(&grid, r, None))
            .collect();
        let on_threshold = FitnessEvaluator::safety_value(&maps, 0, Position::new(14, 1));
        assert_eq!(on_threshold, FitnessConfig::default().area_control_threshold);
        assert!(FitnessEvaluator::safety_value(&maps, 0, Position::new(13, 1)) > on_threshold);

        let report = evaluator.evaluate_grid(&grid, &TelemetryInputs::fresh(60.0));
        assert!(!report.is_rejected());
        let metrics = report.metrics.unwrap();
        assert_eq!(metrics.control_delta, 0.0);

        for team in &metrics.teams {
            // Path tiles 0..=12 plus the team's own dead end
            assert!((team.area_control - 15.0 / 45.0).abs() < 1e-12);
            // The search stops at the other spawn before entering its dead end
            assert!((team.exploration - 43.0 / 45.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_no_capture_zone_rejected() {
        let genotype = central_arena(Gene::CaptureZone { x: 9, y: 9, size: 0 });
        let report = evaluator().evaluate_detailed(&genotype, &TelemetryInputs::fresh(60.0));
        assert_eq!(report.fitness, 0.0);
        assert_eq!(report.rejection, Some(Rejection::NoCaptureZone));
    }

    #[test]
    fn test_unreachable_capture_zone_rejected() {
        let genotype = central_arena(Gene::CaptureZone { x: 16, y: 2, size: 2 });
        let report = evaluator().evaluate_detailed(&genotype, &TelemetryInputs::fresh(60.0));
        assert_eq!(report.fitness, 0.0);
        assert!(matches!(report.rejection, Some(Rejection::CaptureZoneUnreachable { .. })));
    }

    #[test]
    fn test_capture_zone_closer_to_team_one() {
        // Zone sits just outside team one's spawn room
        let genotype = central_arena(Gene::CaptureZone { x: 7, y: 7, size: 2 });
        let report = evaluator().evaluate_detailed(&genotype, &TelemetryInputs::fresh(60.0));
        let metrics = report.metrics.unwrap();
        assert!(metrics.control_delta > 0.0);
        assert!(metrics.teams[0].strategic_control > metrics.teams[1].strategic_control);

        // Team two is ahead in the match, so favouring team one scores higher
        let team_two_ahead = TelemetryInputs {
            time_remaining: [60.0, 0.0],
            time_to_capture: 60.0,
        };
        let team_one_ahead = TelemetryInputs {
            time_remaining: [0.0, 60.0],
            time_to_capture: 60.0,
        };
        let evaluator = evaluator();
        assert!(evaluator.evaluate(&genotype, &team_two_ahead) > evaluator.evaluate(&genotype, &team_one_ahead));
    }
}
