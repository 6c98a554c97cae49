//! Eligible duty day model.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A calendar date that qualifies for duty, with its weekday and duty weight.
///
/// `index` is the position of the day in the month's eligible-day sequence;
/// the spacing and no-repeat rules are expressed in terms of this index, not
/// the calendar distance between dates.
///
/// # Example
///
/// ```
/// use duty_roster::models::EligibleDay;
/// use chrono::{NaiveDate, Weekday};
///
/// let day = EligibleDay {
///     index: 0,
///     date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
///     weekday: Weekday::Wed,
///     weight: 2,
/// };
/// assert_eq!(day.weight, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EligibleDay {
    /// Position in the month's eligible-day sequence.
    pub index: usize,
    /// The calendar date.
    pub date: NaiveDate,
    /// The day of the week.
    pub weekday: Weekday,
    /// Workload weight used for fairness accounting.
    pub weight: u32,
}
