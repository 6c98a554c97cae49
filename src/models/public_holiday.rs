//! Public holiday model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named public holiday.
///
/// # Example
///
/// ```
/// use duty_roster::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2025, 2, 11).unwrap(),
///     name: "National Foundation Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}
