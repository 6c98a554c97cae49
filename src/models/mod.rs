//! Core data models for the Duty Roster Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod eligible_day;
mod member;
mod public_holiday;
mod roster_result;
mod schedule;
mod weekday;

pub use eligible_day::EligibleDay;
pub use member::{FairnessBand, Member, Roster};
pub use public_holiday::PublicHoliday;
pub use roster_result::{AuditStep, AuditTrace, AuditWarning, RosterResult, SolveOutcome};
pub use schedule::{DutyCount, DutyCountSummary, Schedule, ScheduleEntry};
pub use weekday::{WeekdayNaming, weekday_name};
