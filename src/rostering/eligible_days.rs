//! Eligible duty day calculation.
//!
//! This module determines which dates of a month need duty cover: every
//! Tuesday to Friday that is not a public holiday. Mondays and weekends
//! never need cover.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::holidays::HolidayCalendar;
use crate::models::{AuditStep, EligibleDay, PublicHoliday};

use super::DutyWeightPolicy;

/// Weekdays that never carry duty.
pub const EXCLUDED_WEEKDAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Sat, Weekday::Sun];

/// Returns true if `weekday` can carry duty (holidays aside).
pub fn is_duty_weekday(weekday: Weekday) -> bool {
    !EXCLUDED_WEEKDAYS.contains(&weekday)
}

/// Enumerates the eligible `(date, weekday)` pairs of a month in date order.
///
/// A month outside 1-12, or a year chrono cannot represent, yields an empty
/// sequence rather than an error; range checking belongs to the caller
/// (see [`parse_period`](super::parse_period)).
///
/// # Example
///
/// ```
/// use duty_roster::holidays::NoHolidays;
/// use duty_roster::rostering::eligible_dates;
/// use chrono::Weekday;
///
/// let dates = eligible_dates(2025, 2, &NoHolidays);
/// assert_eq!(dates.len(), 16);
/// assert!(dates.iter().all(|(_, w)| !matches!(w, Weekday::Mon | Weekday::Sat | Weekday::Sun)));
///
/// assert!(eligible_dates(2025, 13, &NoHolidays).is_empty());
/// ```
pub fn eligible_dates<H>(year: i32, month: u32, holidays: &H) -> Vec<(NaiveDate, Weekday)>
where
    H: HolidayCalendar + ?Sized,
{
    month_dates(year, month)
        .filter(|date| is_duty_weekday(date.weekday()) && !holidays.is_holiday(*date))
        .map(|date| (date, date.weekday()))
        .collect()
}

fn month_dates(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |date| date.month() == month)
}

/// The eligible days of a month together with the audit step recording them.
#[derive(Debug, Clone)]
pub struct EligibleDaysResult {
    /// Weighted eligible days in date order.
    pub days: Vec<EligibleDay>,
    /// Duty weekdays that were skipped because they are public holidays.
    pub excluded_holidays: Vec<PublicHoliday>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the weighted eligible days of a month.
///
/// # Arguments
///
/// * `year` - The calendar year
/// * `month` - The month number (1-12)
/// * `holidays` - The public holiday lookup
/// * `policy` - The duty weight policy
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use duty_roster::holidays::JapaneseHolidays;
/// use duty_roster::rostering::{calculate_eligible_days, DutyWeightPolicy};
///
/// // February 2025: National Foundation Day (Tue 11th) is skipped.
/// let result = calculate_eligible_days(2025, 2, &JapaneseHolidays, &DutyWeightPolicy::default(), 1);
/// assert_eq!(result.days.len(), 15);
/// assert_eq!(result.excluded_holidays.len(), 1);
/// assert_eq!(result.days.iter().map(|d| d.weight).sum::<u32>(), 19);
/// ```
pub fn calculate_eligible_days<H>(
    year: i32,
    month: u32,
    holidays: &H,
    policy: &DutyWeightPolicy,
    step_number: u32,
) -> EligibleDaysResult
where
    H: HolidayCalendar + ?Sized,
{
    let mut days = Vec::new();
    let mut excluded_holidays = Vec::new();

    for date in month_dates(year, month) {
        let weekday = date.weekday();
        if !is_duty_weekday(weekday) {
            continue;
        }
        if let Some(name) = holidays.holiday_name(date) {
            excluded_holidays.push(PublicHoliday { date, name });
            continue;
        }
        days.push(EligibleDay {
            index: days.len(),
            date,
            weekday,
            weight: policy.weight(weekday),
        });
    }

    let total_weight = DutyWeightPolicy::total_weight(&days);
    let heavy_days = days
        .iter()
        .filter(|d| d.weekday == policy.heavy_weekday)
        .count();

    let audit_step = AuditStep {
        step_number,
        rule_id: "eligible_days".to_string(),
        rule_name: "Eligible Duty Days".to_string(),
        input: serde_json::json!({
            "year": year,
            "month": month,
            "excluded_weekdays": EXCLUDED_WEEKDAYS.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            "heavy_weekday": policy.heavy_weekday.to_string(),
        }),
        output: serde_json::json!({
            "eligible_days": days.len(),
            "heavy_days": heavy_days,
            "total_weight": total_weight,
            "excluded_holidays": excluded_holidays
                .iter()
                .map(|h| serde_json::json!({ "date": h.date, "name": h.name }))
                .collect::<Vec<_>>(),
        }),
        reasoning: format!(
            "{} eligible days ({} weighted x{}), total weight {}, {} holiday(s) skipped",
            days.len(),
            heavy_days,
            super::HEAVY_DUTY_WEIGHT,
            total_weight,
            excluded_holidays.len()
        ),
    };

    EligibleDaysResult {
        days,
        excluded_holidays,
        audit_step,
    }
}
