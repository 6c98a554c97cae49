//! Weekday naming conventions.
//!
//! Weekdays are carried as [`chrono::Weekday`] throughout the engine and are
//! only rendered to text at the edges (schedule entries and exports).

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// The naming convention used to render weekday names.
///
/// # Example
///
/// ```
/// use duty_roster::models::{WeekdayNaming, weekday_name};
/// use chrono::Weekday;
///
/// assert_eq!(weekday_name(Weekday::Wed, WeekdayNaming::English), "Wednesday");
/// assert_eq!(weekday_name(Weekday::Wed, WeekdayNaming::Japanese), "水曜日");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayNaming {
    /// Full English names ("Monday" ... "Sunday").
    #[default]
    English,
    /// Japanese names ("月曜日" ... "日曜日").
    Japanese,
}

const ENGLISH: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const JAPANESE: [&str; 7] = [
    "月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日", "日曜日",
];

/// Returns the name of `weekday` under the given convention.
pub fn weekday_name(weekday: Weekday, naming: WeekdayNaming) -> &'static str {
    let index = weekday.num_days_from_monday() as usize;
    match naming {
        WeekdayNaming::English => ENGLISH[index],
        WeekdayNaming::Japanese => JAPANESE[index],
    }
}
