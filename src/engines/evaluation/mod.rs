pub mod reachability;
pub mod fitness;
pub mod telemetry;

pub use reachability::{flood_fill, flood_fill_multi, prune_unreachable, DistanceMap, UNREACHED};
pub use fitness::{FitnessEvaluator, FitnessReport, BalanceMetrics, TeamBalance, Rejection};
pub use telemetry::{TelemetrySource, SharedTelemetry};
