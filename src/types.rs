use serde::{Deserialize, Serialize};
use std::fmt;

/// Tile classification of one map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Impassable,
    Passable,
    Barrier,      // Low wall, still traversable for reachability
    CapturePoint,
    Team1Spawn,
    Team2Spawn,
    HealthPickup,
}

impl TileType {
    /// Everything except solid wall can be walked over
    pub fn is_traversable(self) -> bool {
        self != TileType::Impassable
    }

    pub fn symbol(self) -> char {
        match self {
            TileType::Impassable => '#',
            TileType::Passable => '.',
            TileType::Barrier => '=',
            TileType::CapturePoint => 'C',
            TileType::Team1Spawn => '1',
            TileType::Team2Spawn => '2',
            TileType::HealthPickup => '+',
        }
    }
}

/// In-grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Capture-point state snapshot supplied by the match simulation.
///
/// `time_remaining[i]` is how long team `i` still has to hold the capture
/// point; `time_to_capture` is the full duration a team needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryInputs {
    pub time_remaining: [f64; 2],
    pub time_to_capture: f64,
}

impl TelemetryInputs {
    /// No team has made any progress yet
    pub fn fresh(time_to_capture: f64) -> Self {
        Self {
            time_remaining: [time_to_capture; 2],
            time_to_capture,
        }
    }

    /// Fraction of the capture each team has already completed, in [0, 1]
    pub fn progress(&self) -> [f64; 2] {
        if self.time_to_capture <= 0.0 {
            return [0.0; 2];
        }
        self.time_remaining
            .map(|remaining| (1.0 - remaining / self.time_to_capture).clamp(0.0, 1.0))
    }

    /// Team one's progress minus team two's
    pub fn percentage_delta(&self) -> f64 {
        let [one, two] = self.progress();
        one - two
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fractions() {
        let telemetry = TelemetryInputs {
            time_remaining: [0.0, 60.0],
            time_to_capture: 60.0,
        };
        assert_eq!(telemetry.progress(), [1.0, 0.0]);
        assert!((telemetry.percentage_delta() - 1.0).abs() < 1e-12);

        let fresh = TelemetryInputs::fresh(30.0);
        assert_eq!(fresh.percentage_delta(), 0.0);
    }

    #[test]
    fn test_degenerate_capture_time() {
        let telemetry = TelemetryInputs {
            time_remaining: [5.0, 0.0],
            time_to_capture: 0.0,
        };
        assert_eq!(telemetry.progress(), [0.0, 0.0]);
    }

    #[test]
    fn test_only_impassable_blocks() {
        assert!(!TileType::Impassable.is_traversable());
        assert!(TileType::Barrier.is_traversable());
        assert!(TileType::HealthPickup.is_traversable());
    }
}
