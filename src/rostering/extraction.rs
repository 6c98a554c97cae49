//! Schedule extraction.
//!
//! Reads the on-duty member of each eligible day off a solver witness.

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, DutyCountSummary, EligibleDay, Roster, Schedule, ScheduleEntry, WeekdayNaming,
    weekday_name,
};

use super::model::{AssignmentModel, VarId, Witness};

/// A schedule read from a witness, with its duty counts.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// One entry per eligible day, in date order.
    pub schedule: Schedule,
    /// Duty counts per member, in roster order.
    pub summary: DutyCountSummary,
    /// The audit step recording the extraction.
    pub audit_step: AuditStep,
}

/// Turns a satisfying witness into a [`Schedule`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidWitness`] if the witness does not match the
/// model's variables, or if any day has no member or more than one member
/// set.
#[allow(clippy::too_many_arguments)]
pub fn extract_schedule(
    model: &AssignmentModel,
    witness: &Witness,
    days: &[EligibleDay],
    roster: &Roster,
    naming: WeekdayNaming,
    year: i32,
    month: u32,
    step_number: u32,
) -> EngineResult<ExtractionResult> {
    if witness.len() != model.variables().len() {
        return Err(EngineError::InvalidWitness {
            message: format!(
                "witness has {} values for {} variables",
                witness.len(),
                model.variables().len()
            ),
        });
    }

    let mut entries = Vec::with_capacity(days.len());
    for (index, day) in days.iter().enumerate() {
        let on_duty: Vec<usize> = (0..model.member_count())
            .filter(|member| {
                model
                    .var(index, *member)
                    .is_some_and(|var| witness.is_set(var))
            })
            .collect();

        let position = match on_duty.as_slice() {
            [position] => *position,
            [] => {
                return Err(EngineError::InvalidWitness {
                    message: format!("no member assigned on {}", day.date),
                });
            }
            _ => {
                return Err(EngineError::InvalidWitness {
                    message: format!("{} members assigned on {}", on_duty.len(), day.date),
                });
            }
        };

        let member = roster.members().get(position).ok_or_else(|| {
            EngineError::InvalidWitness {
                message: format!("member position {} is outside the roster", position),
            }
        })?;

        entries.push(ScheduleEntry {
            date: day.date,
            weekday: day.weekday,
            weekday_name: weekday_name(day.weekday, naming).to_string(),
            member: member.name.clone(),
        });
    }

    let schedule = Schedule {
        year,
        month,
        entries,
    };
    let summary = DutyCountSummary::tally(&schedule, roster);

    let audit_step = AuditStep {
        step_number,
        rule_id: "schedule_extraction".to_string(),
        rule_name: "Schedule Extraction".to_string(),
        input: serde_json::json!({
            "variables": model.variables().len(),
            "set": (0..witness.len())
                .filter(|i| witness.is_set(VarId(*i)))
                .count(),
        }),
        output: serde_json::json!({
            "entries": schedule.len(),
            "counts": summary.counts,
        }),
        reasoning: format!(
            "{} day(s) assigned across {} member(s)",
            schedule.len(),
            summary.counts.iter().filter(|c| c.count > 0).count()
        ),
    };

    Ok(ExtractionResult {
        schedule,
        summary,
        audit_step,
    })
}
