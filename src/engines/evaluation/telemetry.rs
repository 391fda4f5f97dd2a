use crate::types::TelemetryInputs;
use std::sync::{Arc, PoisonError, RwLock};

/// Where the fitness evaluator reads live capture-point state from.
/// Snapshotted once per genotype evaluation.
pub trait TelemetrySource: Send + Sync {
    fn snapshot(&self) -> TelemetryInputs;
}

impl TelemetrySource for TelemetryInputs {
    fn snapshot(&self) -> TelemetryInputs {
        *self
    }
}

/// Telemetry cell the match simulation keeps writing while a run reads it
#[derive(Debug, Clone)]
pub struct SharedTelemetry {
    inner: Arc<RwLock<TelemetryInputs>>,
}

impl SharedTelemetry {
    pub fn new(initial: TelemetryInputs) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn update(&self, telemetry: TelemetryInputs) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = telemetry;
    }

    pub fn set_time_remaining(&self, team: usize, remaining: f64) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = guard.time_remaining.get_mut(team) {
            *slot = remaining;
        }
    }
}

impl TelemetrySource for SharedTelemetry {
    fn snapshot(&self) -> TelemetryInputs {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
