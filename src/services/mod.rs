pub mod generation_runner;

pub use generation_runner::{MapGenerator, RunOutcome, RunState};
