//! Single-slot store for the most recent simulation result.

use std::sync::{Arc, PoisonError, RwLock};

use super::types::SimulationResult;

/// Holds the latest [`SimulationResult`], replaced whole on every store.
///
/// Concurrent stores race and the last writer wins; readers always see one
/// complete snapshot. There is no history.
#[derive(Debug, Default)]
pub struct LatestResult {
    slot: RwLock<Option<Arc<SimulationResult>>>,
}

impl LatestResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored result and returns the shared handle to it.
    pub fn store(&self, result: SimulationResult) -> Arc<SimulationResult> {
        let result = Arc::new(result);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&result));
        result
    }

    /// The latest result, if any simulation has run.
    pub fn load(&self) -> Option<Arc<SimulationResult>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
