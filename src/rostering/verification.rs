//! Schedule verification.
//!
//! Checks a finished [`Schedule`] against every rostering rule without
//! consulting the model it came from. The engine runs this on each
//! extracted schedule, so a solver bug surfaces as an error instead of a
//! bad roster.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{EligibleDay, FairnessBand, Roster, Schedule};

use super::DutyWeightPolicy;

/// A broken rostering rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// An eligible day has no entry.
    UncoveredDay {
        /// The uncovered day.
        date: NaiveDate,
    },
    /// An entry is not on an eligible day, or repeats a covered day.
    UnexpectedEntry {
        /// The date of the entry.
        date: NaiveDate,
    },
    /// An entry names someone outside the roster.
    UnknownMember {
        /// The date of the entry.
        date: NaiveDate,
        /// The unknown name.
        member: String,
    },
    /// A member is on duty on a weekday they are excluded from.
    ForbiddenWeekday {
        /// The date of the entry.
        date: NaiveDate,
        /// The member on duty.
        member: String,
        /// The excluded weekday.
        weekday: Weekday,
    },
    /// A member is on duty on two consecutive eligible days.
    AdjacentRepeat {
        /// The member on duty.
        member: String,
        /// The earlier duty.
        first: NaiveDate,
        /// The later duty.
        second: NaiveDate,
    },
    /// A member's duties are closer than the minimum spacing.
    SpacingTooShort {
        /// The member on duty.
        member: String,
        /// The earlier duty.
        first: NaiveDate,
        /// The later duty.
        second: NaiveDate,
        /// Distance in eligible-day slots.
        distance: usize,
    },
    /// A member's weighted total falls outside their band.
    OutsideFairnessBand {
        /// The member.
        member: String,
        /// The member's weighted total.
        total: u32,
        /// The band the total should lie in.
        band: FairnessBand,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UncoveredDay { date } => write!(f, "{} has no member on duty", date),
            Violation::UnexpectedEntry { date } => {
                write!(f, "{} is not an open eligible day", date)
            }
            Violation::UnknownMember { date, member } => {
                write!(f, "{} assigned to unknown member '{}'", date, member)
            }
            Violation::ForbiddenWeekday {
                date,
                member,
                weekday,
            } => write!(f, "{} is excluded on {} but assigned {}", member, weekday, date),
            Violation::AdjacentRepeat {
                member,
                first,
                second,
            } => write!(f, "{} on consecutive days {} and {}", member, first, second),
            Violation::SpacingTooShort {
                member,
                first,
                second,
                distance,
            } => write!(
                f,
                "{} on {} and {}, only {} eligible day(s) apart",
                member, first, second, distance
            ),
            Violation::OutsideFairnessBand {
                member,
                total,
                band,
            } => write!(f, "{} has weighted total {} outside {}", member, total, band),
        }
    }
}

/// Returns every rule `schedule` breaks; an empty list means it is valid.
///
/// `member_bands` holds one band per roster member in roster order; members
/// past its end are checked against their default band. `min_spacing` has the
/// same meaning as in [`AssignmentModelBuilder::with_min_spacing`](super::AssignmentModelBuilder::with_min_spacing).
pub fn verify_schedule(
    schedule: &Schedule,
    days: &[EligibleDay],
    roster: &Roster,
    member_bands: &[FairnessBand],
    min_spacing: usize,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let slot_of: HashMap<NaiveDate, usize> =
        days.iter().enumerate().map(|(i, d)| (d.date, i)).collect();
    let mut assigned: Vec<Option<usize>> = vec![None; days.len()];

    for entry in &schedule.entries {
        let Some(&slot) = slot_of.get(&entry.date) else {
            violations.push(Violation::UnexpectedEntry { date: entry.date });
            continue;
        };
        if assigned[slot].is_some() {
            violations.push(Violation::UnexpectedEntry { date: entry.date });
            continue;
        }
        let Some(member) = roster.get(&entry.member) else {
            violations.push(Violation::UnknownMember {
                date: entry.date,
                member: entry.member.clone(),
            });
            continue;
        };
        let weekday = days[slot].weekday;
        if member.is_forbidden_on(weekday) {
            violations.push(Violation::ForbiddenWeekday {
                date: entry.date,
                member: member.name.clone(),
                weekday,
            });
        }
        assigned[slot] = Some(member.position);
    }

    for (slot, day) in days.iter().enumerate() {
        if assigned[slot].is_none() {
            violations.push(Violation::UncoveredDay { date: day.date });
        }
    }

    let computed = FairnessBand::computed(DutyWeightPolicy::total_weight(days), roster.len());
    for member in roster.members() {
        let slots: Vec<usize> = assigned
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == Some(member.position))
            .map(|(slot, _)| slot)
            .collect();

        for pair in slots.windows(2) {
            let (first, second) = (days[pair[0]].date, days[pair[1]].date);
            let distance = pair[1] - pair[0];
            if distance == 1 {
                violations.push(Violation::AdjacentRepeat {
                    member: member.name.clone(),
                    first,
                    second,
                });
            } else if distance < min_spacing {
                violations.push(Violation::SpacingTooShort {
                    member: member.name.clone(),
                    first,
                    second,
                    distance,
                });
            }
        }

        let total: u32 = slots.iter().map(|slot| days[*slot].weight).sum();
        let band = member_bands
            .get(member.position)
            .copied()
            .unwrap_or_else(|| member.band(computed));
        if !band.contains(total) {
            violations.push(Violation::OutsideFairnessBand {
                member: member.name.clone(),
                total,
                band,
            });
        }
    }

    violations
}
