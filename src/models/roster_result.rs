//! Roster result models for the Duty Roster Engine.
//!
//! This module contains the [`RosterResult`] type returned by every solve,
//! the [`SolveOutcome`] it wraps, and the audit trace recording how the
//! engine reached that outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DutyCountSummary, Schedule};

/// The outcome of solving one month.
///
/// Only `Solved` carries a schedule. The other variants are ordinary
/// outcomes rather than errors: the presentation layer decides how to
/// render them.
///
/// # Example
///
/// ```
/// use duty_roster::models::SolveOutcome;
///
/// let outcome = SolveOutcome::Infeasible;
/// assert!(outcome.schedule().is_none());
/// assert_eq!(serde_json::to_value(&outcome).unwrap()["status"], "infeasible");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveOutcome {
    /// A schedule satisfying every constraint was found.
    Solved {
        /// The duty roster.
        schedule: Schedule,
        /// Unweighted duty counts per member.
        summary: DutyCountSummary,
    },
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The solver did not finish within its time budget.
    TimedOut {
        /// The time budget in milliseconds.
        limit_ms: u64,
    },
    /// The solve was cancelled by the caller.
    Cancelled,
}

impl SolveOutcome {
    /// Returns the schedule if the month was solved.
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            SolveOutcome::Solved { schedule, .. } => Some(schedule),
            _ => None,
        }
    }

    /// Returns the duty count summary if the month was solved.
    pub fn summary(&self) -> Option<&DutyCountSummary> {
        match self {
            SolveOutcome::Solved { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// Returns true if a schedule was produced.
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }

    /// A short machine-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            SolveOutcome::Solved { .. } => "solved",
            SolveOutcome::Infeasible => "infeasible",
            SolveOutcome::TimedOut { .. } => "timed_out",
            SolveOutcome::Cancelled => "cancelled",
        }
    }
}

/// A single step in the audit trace recording an engine decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule or stage.
    pub rule_id: String,
    /// The human-readable name of the rule or stage.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated while building a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a solve.
///
/// # Example
///
/// ```
/// use duty_roster::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated along the way.
    pub warnings: Vec<AuditWarning>,
    /// The total duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of solving one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterResult {
    /// Unique identifier for this solve.
    pub result_id: Uuid,
    /// When the solve was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the solve.
    pub engine_version: String,
    /// The requested year.
    pub year: i32,
    /// The requested month.
    pub month: u32,
    /// What the solve produced.
    pub outcome: SolveOutcome,
    /// Audit trace of the solve.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DutyCount;

    fn solved() -> SolveOutcome {
        SolveOutcome::Solved {
            schedule: Schedule {
                year: 2025,
                month: 2,
                entries: vec![],
            },
            summary: DutyCountSummary {
                counts: vec![DutyCount {
                    member: "A".to_string(),
                    count: 0,
                }],
            },
        }
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(solved().is_solved());
        assert!(solved().schedule().is_some());
        assert!(solved().summary().is_some());
        assert!(!SolveOutcome::Cancelled.is_solved());
        assert!(SolveOutcome::TimedOut { limit_ms: 10 }.summary().is_none());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(solved().label(), "solved");
        assert_eq!(SolveOutcome::Infeasible.label(), "infeasible");
        assert_eq!(SolveOutcome::TimedOut { limit_ms: 1 }.label(), "timed_out");
        assert_eq!(SolveOutcome::Cancelled.label(), "cancelled");
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let json = serde_json::to_value(SolveOutcome::TimedOut { limit_ms: 500 }).unwrap();
        assert_eq!(json["status"], "timed_out");
        assert_eq!(json["limit_ms"], 500);

        let json = serde_json::to_value(solved()).unwrap();
        assert_eq!(json["status"], "solved");
        assert_eq!(json["schedule"]["month"], 2);
        assert_eq!(json["summary"]["counts"][0]["member"], "A");
    }

    #[test]
    fn test_outcome_deserialization() {
        let outcome: SolveOutcome = serde_json::from_str(r#"{"status":"cancelled"}"#).unwrap();
        assert_eq!(outcome, SolveOutcome::Cancelled);
    }

    #[test]
    fn test_roster_result_round_trips_through_json() {
        let result = RosterResult {
            result_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            year: 2025,
            month: 2,
            outcome: SolveOutcome::Infeasible,
            audit_trace: AuditTrace::default(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: RosterResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.outcome, SolveOutcome::Infeasible);
        assert_eq!(back.result_id, result.result_id);
    }
}
