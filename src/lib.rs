pub mod config;
pub mod engines;
pub mod error;
pub mod map;
pub mod services;
pub mod types;

pub use error::{MapGenError, Result};
pub use services::{MapGenerator, RunOutcome, RunState};
pub use types::{Position, TelemetryInputs, TileType};
