use super::traits::{check_unit_interval, ConfigSection};
use crate::error::MapGenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub elitism_rate: f64,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub selection_method: SelectionMethod,
    pub tournament_size: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMethod {
    Tournament,
    Roulette,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 10,
            elitism_rate: 0.05,
            crossover_rate: 0.8,
            mutation_rate: 0.04,
            selection_method: SelectionMethod::Roulette,
            tournament_size: 3,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Number of genotypes copied unmodified into the next generation
    pub fn elite_count(&self) -> usize {
        let count = (self.population_size as f64 * self.elitism_rate).round() as usize;
        count.min(self.population_size)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), MapGenError> {
        if self.population_size < 2 {
            return Err(MapGenError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.selection_method == SelectionMethod::Tournament && self.tournament_size == 0 {
            return Err(MapGenError::Configuration(
                "Tournament size must be at least 1".to_string()
            ));
        }
        check_unit_interval(Self::section_name(), "elitism_rate", self.elitism_rate)?;
        check_unit_interval(Self::section_name(), "crossover_rate", self.crossover_rate)?;
        check_unit_interval(Self::section_name(), "mutation_rate", self.mutation_rate)?;
        Ok(())
    }
}
