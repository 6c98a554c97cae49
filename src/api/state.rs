//! Application state for the Duty Roster Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, RosterConfig};
use crate::rostering::RosterEngine;

/// Solver threads allowed to run at once before roster requests are refused.
pub const DEFAULT_MAX_SOLVER_WORKERS: usize = 4;

/// Shared application state.
///
/// Holds the roster engine, which owns the loaded configuration, the
/// holiday calendar and the solver backend, and the cap on running solver
/// threads.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RosterEngine>,
    max_solver_workers: usize,
}

impl AppState {
    /// Creates application state from a configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self::from_engine(RosterEngine::new(config.into_config()))
    }

    /// Creates application state around an existing engine.
    pub fn from_engine(engine: RosterEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            max_solver_workers: DEFAULT_MAX_SOLVER_WORKERS,
        }
    }

    /// Sets how many solver threads may run before `/roster` answers 503.
    ///
    /// Threads abandoned after a timeout count until their search ends.
    pub fn with_max_solver_workers(mut self, limit: usize) -> Self {
        self.max_solver_workers = limit.max(1);
        self
    }

    /// Returns the solver thread cap.
    pub fn max_solver_workers(&self) -> usize {
        self.max_solver_workers
    }

    /// Returns true if the engine already runs as many solver threads as
    /// the cap allows.
    pub fn solver_saturated(&self) -> bool {
        self.engine.active_workers() >= self.max_solver_workers
    }

    /// Returns a shared handle to the engine.
    pub fn engine(&self) -> Arc<RosterEngine> {
        Arc::clone(&self.engine)
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &RosterConfig {
        self.engine.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_exposes_config() {
        let state = AppState::new(ConfigLoader::load("./config/default").unwrap());
        assert_eq!(state.config().roster().len(), 11);
        assert_eq!(state.engine().config().solver().min_spacing, 5);
        assert_eq!(state.max_solver_workers(), DEFAULT_MAX_SOLVER_WORKERS);
        assert!(!state.solver_saturated());
    }

    #[test]
    fn test_solver_worker_cap_is_at_least_one() {
        let state = AppState::new(ConfigLoader::load("./config/default").unwrap())
            .with_max_solver_workers(0);
        assert_eq!(state.max_solver_workers(), 1);
    }
}
