use crate::config::evolution::{EvolutionConfig, SelectionMethod};
use crate::config::traits::ConfigSection;
use crate::engines::evaluation::{FitnessEvaluator, TelemetrySource};
use crate::engines::generation::{
    genome::Genotype,
    operators::{double_point_crossover, mutate_in_place, roulette_selection, select_elites, tournament_selection},
};
use crate::error::{MapGenError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Statistics reported after each generation is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    /// Genotypes that were not structurally rejected
    pub valid_count: usize,
    pub population_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    pub best: Genotype,
    pub best_fitness: f64,
    pub generations: usize,
    pub history: Vec<GenerationSummary>,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
}

/// Owned GA state for one map instance: population with cached fitness,
/// generation counter and random source.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    evaluator: FitnessEvaluator,
    population: Vec<(Genotype, f64)>,
    /// Members of the current population that passed the structural checks
    valid_count: usize,
    generation: usize,
    history: Vec<GenerationSummary>,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, evaluator: FitnessEvaluator) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            evaluator,
            population: Vec::new(),
            valid_count: 0,
            generation: 0,
            history: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    pub fn population(&self) -> &[(Genotype, f64)] {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    /// Reset to generation 0 with `population_size` clones of `seed`
    pub fn seed_population(&mut self, seed: &Genotype, telemetry: &dyn TelemetrySource) -> Result<()> {
        if seed.is_empty() {
            return Err(MapGenError::Configuration(
                "Seed genotype has no genes".to_string()
            ));
        }
        let clones = vec![seed.clone(); self.config.population_size];
        self.evaluate_population(clones, telemetry);
        self.generation = 0;
        self.history.clear();
        self.record_summary();
        Ok(())
    }

    /// Fixed generation budget
    pub fn should_terminate(&self) -> bool {
        self.generation > self.config.max_generations
    }

    /// Breed and evaluate one generation
    pub fn step(&mut self, telemetry: &dyn TelemetrySource) -> Result<GenerationSummary> {
        if self.population.is_empty() {
            return Err(MapGenError::EmptyPopulation);
        }
        let next = self.breed_next_generation();
        self.evaluate_population(next, telemetry);
        self.generation += 1;
        Ok(self.record_summary())
    }

    /// Run a full optimisation starting from `seed`
    pub fn run<C: ProgressCallback>(
        &mut self,
        seed: &Genotype,
        telemetry: &dyn TelemetrySource,
        mut callback: C,
    ) -> Result<EvolutionResult> {
        self.seed_population(seed, telemetry)?;

        while !self.should_terminate() {
            callback.on_generation_start(self.generation + 1);
            let summary = self.step(telemetry)?;
            callback.on_generation_complete(&summary);
        }

        let (best, best_fitness) = self.best().ok_or(MapGenError::EmptyPopulation)?;
        Ok(EvolutionResult {
            best: best.clone(),
            best_fitness,
            generations: self.generation,
            history: self.history.clone(),
        })
    }

    /// Fittest genotype; ties go to the earliest in the population
    pub fn best(&self) -> Option<(&Genotype, f64)> {
        self.population
            .iter()
            .fold(None, |best: Option<&(Genotype, f64)>, candidate| match best {
                Some(current) if current.1 >= candidate.1 => Some(current),
                _ => Some(candidate),
            })
            .map(|(genotype, fitness)| (genotype, *fitness))
    }

    fn breed_next_generation(&mut self) -> Vec<Genotype> {
        let population_size = self.config.population_size;
        let elite_count = self.config.elite_count();
        let width = self.evaluator.decoder().width();
        let height = self.evaluator.decoder().height();

        // Elitism: copy top performers
        let mut next_generation = select_elites(&self.population, elite_count);

        // Generate offspring pairwise
        while next_generation.len() < population_size {
            let parent1 = select_parent(&self.config, &self.population, &mut self.rng);
            let parent2 = select_parent(&self.config, &self.population, &mut self.rng);

            let (child1, child2) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                double_point_crossover(parent1, parent2, &mut self.rng)
            } else {
                (parent1.clone(), parent2.clone())
            };

            next_generation.push(child1);
            if next_generation.len() < population_size {
                next_generation.push(child2);
            }
        }

        for child in next_generation.iter_mut().skip(elite_count) {
            mutate_in_place(child, width, height, self.config.mutation_rate, &mut self.rng);
        }

        next_generation
    }

    fn evaluate_population(&mut self, population: Vec<Genotype>, telemetry: &dyn TelemetrySource) {
        let evaluator = &self.evaluator;
        let scored: Vec<(Genotype, f64, bool)> = population
            .into_par_iter()
            .map(|genotype| {
                let report = evaluator.evaluate_detailed(&genotype, &telemetry.snapshot());
                if let Some(reason) = report.rejection {
                    log::trace!("Genotype rejected: {:?}", reason);
                }
                let valid = !report.is_rejected();
                (genotype, report.fitness, valid)
            })
            .collect();

        self.valid_count = scored.iter().filter(|(_, _, valid)| *valid).count();
        self.population = scored
            .into_iter()
            .map(|(genotype, fitness, _)| (genotype, fitness))
            .collect();
    }

    fn record_summary(&mut self) -> GenerationSummary {
        let size = self.population.len();
        let best_fitness = self.best().map(|(_, f)| f).unwrap_or(0.0);
        let total: f64 = self.population.iter().map(|(_, f)| f).sum();
        let valid_count = self.valid_count;

        let summary = GenerationSummary {
            generation: self.generation,
            best_fitness,
            mean_fitness: if size == 0 { 0.0 } else { total / size as f64 },
            valid_count,
            population_size: size,
        };

        if valid_count == 0 {
            log::warn!(
                "Generation {}: all {} layouts were structurally rejected",
                summary.generation, size
            );
        } else {
            log::debug!(
                "Generation {}: best {:.4}, mean {:.4}, valid {}/{}",
                summary.generation, summary.best_fitness, summary.mean_fitness, valid_count, size
            );
        }

        self.history.push(summary);
        summary
    }
}

fn select_parent<'a>(
    config: &EvolutionConfig,
    population: &'a [(Genotype, f64)],
    rng: &mut StdRng,
) -> &'a Genotype {
    match config.selection_method {
        SelectionMethod::Tournament => tournament_selection(population, config.tournament_size, rng),
        SelectionMethod::Roulette => roulette_selection(population, rng),
    }
}
