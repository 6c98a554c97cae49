//! Configuration loading and management for the Duty Roster Engine.
//!
//! This module provides functionality to load roster configurations from
//! YAML files: members and their restrictions, duty weighting, solver
//! limits, the holiday calendar and export settings.
//!
//! # Example
//!
//! ```no_run
//! use duty_roster::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded {} members", config.config().roster().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CalendarKind, DEFAULT_TIMEOUT_MS, ExportSettings, HolidaySettings, MemberConfig, RosterConfig,
    RosterFile, SolverSettings,
};
