//! Schedule and duty count models.
//!
//! A [`Schedule`] is only ever produced from a feasible solve; an unsolvable
//! month is reported through [`SolveOutcome`](super::SolveOutcome) instead of
//! an empty schedule.

use std::collections::HashMap;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::Roster;

/// One duty assignment: a date and the member on duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// The duty date.
    pub date: NaiveDate,
    /// The day of the week.
    pub weekday: Weekday,
    /// The rendered weekday name (see [`WeekdayNaming`](super::WeekdayNaming)).
    pub weekday_name: String,
    /// The name of the member on duty.
    pub member: String,
}

/// The duty roster for one month, one entry per eligible day in date order.
///
/// # Example
///
/// ```
/// use duty_roster::models::{Schedule, ScheduleEntry};
/// use chrono::{NaiveDate, Weekday};
///
/// let schedule = Schedule {
///     year: 2025,
///     month: 2,
///     entries: vec![ScheduleEntry {
///         date: NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(),
///         weekday: Weekday::Tue,
///         weekday_name: "Tuesday".to_string(),
///         member: "Tanaka".to_string(),
///     }],
/// };
///
/// assert_eq!(schedule.member_on(NaiveDate::from_ymd_opt(2025, 2, 4).unwrap()), Some("Tanaka"));
/// assert_eq!(schedule.dates_for("Tanaka").len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// The year of the roster.
    pub year: i32,
    /// The month of the roster (1-12).
    pub month: u32,
    /// Duty assignments in ascending date order.
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Returns the number of duty days.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the month had no eligible days.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the member on duty on `date`, if any.
    pub fn member_on(&self, date: NaiveDate) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.date == date)
            .map(|e| e.member.as_str())
    }

    /// Returns the duty dates of `member` in ascending order.
    pub fn dates_for(&self, member: &str) -> Vec<NaiveDate> {
        self.entries
            .iter()
            .filter(|e| e.member == member)
            .map(|e| e.date)
            .collect()
    }
}

/// Number of duty days assigned to one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyCount {
    /// The member name.
    pub member: String,
    /// Unweighted number of duty days.
    pub count: u32,
}

/// Per-member duty counts in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyCountSummary {
    /// One count per roster member, including members with no duty.
    pub counts: Vec<DutyCount>,
}

impl DutyCountSummary {
    /// Tallies unweighted duty days per member.
    ///
    /// Members without duty get a zero count; the order follows the roster,
    /// not the schedule.
    pub fn tally(schedule: &Schedule, roster: &Roster) -> Self {
        let mut tallies: HashMap<&str, u32> = HashMap::new();
        for entry in &schedule.entries {
            *tallies.entry(entry.member.as_str()).or_insert(0) += 1;
        }

        let counts = roster
            .members()
            .iter()
            .map(|m| DutyCount {
                member: m.name.clone(),
                count: tallies.get(m.name.as_str()).copied().unwrap_or(0),
            })
            .collect();

        Self { counts }
    }

    /// Returns the count for `member`, or zero if unknown.
    pub fn count_for(&self, member: &str) -> u32 {
        self.counts
            .iter()
            .find(|c| c.member == member)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Returns the total number of duty days.
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|c| c.count).sum()
    }
}
