use super::traits::{check_unit_interval, ConfigSection};
use crate::error::MapGenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Safety value a tile must exceed to count towards a team's area control
    pub area_control_threshold: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            area_control_threshold: 0.35,
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), MapGenError> {
        check_unit_interval(Self::section_name(), "area_control_threshold", self.area_control_threshold)
    }
}
