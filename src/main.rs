use anyhow::{Context, Result};
use arenagen::config::ConfigManager;
use arenagen::map::Graph;
use arenagen::{MapGenerator, TelemetryInputs};
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    match std::env::args().nth(1) {
        Some(path) => manager
            .load_from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => manager.load_from_env().context("loading configuration from environment")?,
    }
    let config = manager.get();

    let mut generator = MapGenerator::new(config)?;
    generator.start_run(Arc::new(TelemetryInputs::fresh(60.0)))?;
    let outcome = generator.wait()?;

    println!("{}", outcome.grid);
    println!("{}", serde_json::to_string_pretty(&outcome.report)?);

    let references = generator.config().map.reference_tiles();
    if let [first, second, ..] = references.as_slice() {
        let graph = Graph::from_grid(&generator.playable_grid());
        match graph.distance(*first, *second) {
            Some(steps) => println!("Spawn-to-spawn path: {} steps", steps),
            None => println!("Spawns are not connected"),
        }
    }

    Ok(())
}
