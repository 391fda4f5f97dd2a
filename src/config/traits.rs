use crate::error::MapGenError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), MapGenError>;
}

/// Shared range check for probability-like fields
pub(crate) fn check_unit_interval(section: &str, name: &str, value: f64) -> Result<(), MapGenError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MapGenError::Configuration(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, name, value
        )));
    }
    Ok(())
}
