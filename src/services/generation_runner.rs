use crate::config::AppConfig;
use crate::engines::evaluation::{prune_unreachable, FitnessEvaluator, FitnessReport, TelemetrySource};
use crate::engines::generation::evolution_engine::{EvolutionEngine, GenerationSummary};
use crate::engines::generation::genome::Genotype;
use crate::engines::generation::progress::{ChannelProgressCallback, ProgressMessage};
use crate::error::{MapGenError, Result};
use crate::map::TileGrid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Result of one optimisation run, handed to the host exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub winner: Genotype,
    pub grid: TileGrid,
    /// Fitness the winner scored during the run
    pub fitness: f64,
    /// Winner re-scored against the telemetry at completion
    pub report: FitnessReport,
    pub generations: usize,
    pub history: Vec<GenerationSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

struct ActiveRun {
    handle: JoinHandle<Result<RunOutcome>>,
    progress_rx: Receiver<ProgressMessage>,
}

/// Owns the active map layout and at most one background GA run.
///
/// The active genotype only changes when the host collects a finished run
/// through `try_complete` or `wait`.
pub struct MapGenerator {
    config: AppConfig,
    evaluator: FitnessEvaluator,
    current: Genotype,
    current_grid: TileGrid,
    active: Option<ActiveRun>,
}

impl MapGenerator {
    /// Start from the built-in seed layout
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let seed = Genotype::default_seed(&config.map);
        Self::with_seed(config, seed)
    }

    /// Start from a previous round's winner
    pub fn with_seed(config: AppConfig, seed: Genotype) -> Result<Self> {
        config.validate()?;
        if !config.map.layout.matches(&seed) {
            return Err(MapGenError::Configuration(format!(
                "Seed genotype of length {} does not match the configured layout of length {}",
                seed.len(),
                config.map.layout.len()
            )));
        }

        let evaluator = FitnessEvaluator::new(&config.map, &config.fitness)?;
        let current_grid = evaluator.decoder().decode(&seed);

        Ok(Self {
            config,
            evaluator,
            current: seed,
            current_grid,
            active: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        if self.active.is_some() {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn current_genotype(&self) -> &Genotype {
        &self.current
    }

    pub fn current_grid(&self) -> &TileGrid {
        &self.current_grid
    }

    /// Active grid with every tile that is not reachable by all teams walled off
    pub fn playable_grid(&self) -> TileGrid {
        prune_unreachable(&self.current_grid, self.evaluator.reference_tiles())
    }

    /// Score the active layout against a telemetry snapshot
    pub fn evaluate_current(&self, telemetry: &dyn TelemetrySource) -> FitnessReport {
        self.evaluator.evaluate_grid(&self.current_grid, &telemetry.snapshot())
    }

    /// Start optimising from the active genotype in a background thread
    pub fn start_run(&mut self, telemetry: Arc<dyn TelemetrySource>) -> Result<()> {
        if self.active.is_some() {
            return Err(MapGenError::RunInProgress);
        }

        let (progress_tx, progress_rx) = channel();
        let config = self.config.clone();
        let seed = self.current.clone();

        log::info!(
            "Starting map generation: population {}, {} generations",
            config.evolution.population_size,
            config.evolution.max_generations
        );

        let handle = thread::Builder::new()
            .name("arenagen-ga".to_string())
            .spawn(move || Self::run_evolution(config, seed, telemetry, progress_tx))?;

        self.active = Some(ActiveRun { handle, progress_rx });
        Ok(())
    }

    /// Poll for progress updates (non-blocking)
    pub fn poll_progress(&mut self) -> Option<ProgressMessage> {
        self.active.as_ref().and_then(|run| run.progress_rx.try_recv().ok())
    }

    /// Collect the run result if the worker has finished; adopts the winner
    /// as the active layout on success.
    pub fn try_complete(&mut self) -> Option<Result<RunOutcome>> {
        let finished = self.active.as_ref()?.handle.is_finished();
        if !finished {
            return None;
        }
        self.active.take().map(|run| self.finish(run))
    }

    /// Block until the active run finishes
    pub fn wait(&mut self) -> Result<RunOutcome> {
        let run = self.active.take().ok_or(MapGenError::NoRunActive)?;
        self.finish(run)
    }

    fn finish(&mut self, run: ActiveRun) -> Result<RunOutcome> {
        let outcome = run.handle.join().map_err(|_| MapGenError::WorkerPanicked)??;

        log::info!(
            "Map generation complete after {} generations, winner fitness {:.4}",
            outcome.generations,
            outcome.fitness
        );
        self.current = outcome.winner.clone();
        self.current_grid = outcome.grid.clone();
        Ok(outcome)
    }

    /// Run the evolution (called in background thread)
    fn run_evolution(
        config: AppConfig,
        seed: Genotype,
        telemetry: Arc<dyn TelemetrySource>,
        progress_tx: Sender<ProgressMessage>,
    ) -> Result<RunOutcome> {
        let started_at = Utc::now();

        let evaluator = FitnessEvaluator::new(&config.map, &config.fitness)?;
        let mut engine = EvolutionEngine::new(config.evolution, evaluator)?;
        let result = engine.run(&seed, telemetry.as_ref(), ChannelProgressCallback::new(progress_tx))?;

        let report = engine
            .evaluator()
            .evaluate_detailed(&result.best, &telemetry.snapshot());
        let grid = engine.evaluator().decoder().decode(&result.best);

        Ok(RunOutcome {
            winner: result.best,
            grid,
            fitness: result.best_fitness,
            report,
            generations: result.generations,
            history: result.history,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TelemetryInputs;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.map.width = 20;
        config.map.height = 20;
        config.evolution.population_size = 8;
        config.evolution.max_generations = 1;
        config.evolution.seed = Some(5);
        config
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut generator = MapGenerator::new(small_config()).unwrap();
        let telemetry: Arc<dyn TelemetrySource> = Arc::new(TelemetryInputs::fresh(60.0));

        generator.start_run(Arc::clone(&telemetry)).unwrap();
        assert_eq!(generator.state(), RunState::Running);
        assert!(matches!(generator.start_run(telemetry), Err(MapGenError::RunInProgress)));

        let outcome = generator.wait().unwrap();
        assert_eq!(generator.state(), RunState::Idle);
        assert_eq!(generator.current_genotype(), &outcome.winner);
        assert!(matches!(generator.wait(), Err(MapGenError::NoRunActive)));
    }

    #[test]
    fn test_mismatched_seed_is_rejected() {
        let seed = Genotype::new(Vec::new());
        assert!(matches!(
            MapGenerator::with_seed(small_config(), seed),
            Err(MapGenError::Configuration(_))
        ));
    }

    #[test]
    fn test_try_complete_when_idle() {
        let mut generator = MapGenerator::new(small_config()).unwrap();
        assert!(generator.try_complete().is_none());
        assert!(generator.poll_progress().is_none());
    }
}
