//! Duty Roster Engine
//!
//! This crate builds monthly duty rosters: it works out which days of a
//! month need a member on duty, weighs those days, and asks a feasibility
//! solver for an assignment that covers every day while respecting
//! weekday exclusions, fairness bands and spacing between duties. Solved
//! rosters can be exported as iCalendar or CSV.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod holidays;
pub mod logging;
pub mod models;
pub mod rostering;
