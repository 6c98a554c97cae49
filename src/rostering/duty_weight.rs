//! Duty weighting.
//!
//! Duty on the middle of the business week is considered twice as
//! burdensome as on any other eligible day. Weights only feed the fairness
//! accounting; they never change which days need cover.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::EligibleDay;

/// Weight of a duty day on the heavy weekday.
pub const HEAVY_DUTY_WEIGHT: u32 = 2;

/// Weight of a duty day on any other weekday.
pub const STANDARD_DUTY_WEIGHT: u32 = 1;

/// Maps a weekday to its duty weight.
///
/// Exactly one weekday (Wednesday unless configured otherwise) weighs
/// [`HEAVY_DUTY_WEIGHT`]; every other weekday weighs [`STANDARD_DUTY_WEIGHT`].
///
/// # Example
///
/// ```
/// use duty_roster::rostering::DutyWeightPolicy;
/// use chrono::Weekday;
///
/// let policy = DutyWeightPolicy::default();
/// assert_eq!(policy.weight(Weekday::Wed), 2);
/// assert_eq!(policy.weight(Weekday::Thu), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyWeightPolicy {
    /// The weekday whose duty counts double.
    #[serde(default = "default_heavy_weekday")]
    pub heavy_weekday: Weekday,
}

fn default_heavy_weekday() -> Weekday {
    Weekday::Wed
}

impl Default for DutyWeightPolicy {
    fn default() -> Self {
        Self {
            heavy_weekday: default_heavy_weekday(),
        }
    }
}

impl DutyWeightPolicy {
    /// Returns the duty weight of `weekday`.
    pub fn weight(&self, weekday: Weekday) -> u32 {
        if weekday == self.heavy_weekday {
            HEAVY_DUTY_WEIGHT
        } else {
            STANDARD_DUTY_WEIGHT
        }
    }

    /// Sums the weights of `days`: the month's total weighted load.
    pub fn total_weight(days: &[EligibleDay]) -> u32 {
        days.iter().map(|d| d.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_only_wednesday_is_heavy_by_default() {
        let policy = DutyWeightPolicy::default();
        let heavy: Vec<Weekday> = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|w| policy.weight(*w) == HEAVY_DUTY_WEIGHT)
        .collect();
        assert_eq!(heavy, vec![Weekday::Wed]);
    }

    #[test]
    fn test_configured_heavy_weekday() {
        let policy = DutyWeightPolicy {
            heavy_weekday: Weekday::Fri,
        };
        assert_eq!(policy.weight(Weekday::Fri), 2);
        assert_eq!(policy.weight(Weekday::Wed), 1);
    }

    #[test]
    fn test_total_weight() {
        let policy = DutyWeightPolicy::default();
        let days: Vec<EligibleDay> = [(4, Weekday::Tue), (5, Weekday::Wed), (6, Weekday::Thu)]
            .into_iter()
            .enumerate()
            .map(|(index, (day, weekday))| EligibleDay {
                index,
                date: NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
                weekday,
                weight: policy.weight(weekday),
            })
            .collect();
        assert_eq!(DutyWeightPolicy::total_weight(&days), 4);
        assert_eq!(DutyWeightPolicy::total_weight(&[]), 0);
    }

    #[test]
    fn test_deserialize_policy_defaults_to_wednesday() {
        let policy: DutyWeightPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy.heavy_weekday, Weekday::Wed);

        let policy: DutyWeightPolicy =
            serde_json::from_str(r#"{"heavy_weekday":"Thursday"}"#).unwrap();
        assert_eq!(policy.heavy_weekday, Weekday::Thu);
    }
}
