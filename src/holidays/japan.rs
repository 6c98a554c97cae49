//! Japanese national holidays.
//!
//! Implements the Act on National Holidays as amended through 2018, including
//! the one-off moves for 2019 (imperial succession) and for 2020 and 2021
//! (Olympic Games). Equinox days use the standard approximation, which is
//! accurate for 1980 to 2099.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::HolidayCalendar;

/// Rule-based calendar of Japanese national holidays.
///
/// Covers fixed-date holidays, "Happy Monday" holidays, the vernal and
/// autumnal equinoxes, substitute holidays (a holiday on Sunday moves to the
/// next non-holiday) and citizens' holidays (a day sandwiched between two
/// holidays).
///
/// # Example
///
/// ```
/// use duty_roster::holidays::{HolidayCalendar, JapaneseHolidays};
/// use chrono::NaiveDate;
///
/// let coming_of_age = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
/// assert_eq!(
///     JapaneseHolidays.holiday_name(coming_of_age).as_deref(),
///     Some("Coming of Age Day")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseHolidays;

impl HolidayCalendar for JapaneseHolidays {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        if let Some(name) = statutory_holiday(date) {
            return Some(name.to_string());
        }
        if is_substitute_holiday(date) {
            return Some("Substitute Holiday".to_string());
        }
        if is_citizens_holiday(date) {
            return Some("Citizens' Holiday".to_string());
        }
        None
    }
}

/// Holidays named directly by the act, before substitution rules.
fn statutory_holiday(date: NaiveDate) -> Option<&'static str> {
    let year = date.year();
    let (month, day) = (date.month(), date.day());

    let name = match (month, day) {
        (1, 1) => "New Year's Day",
        (2, 11) => "National Foundation Day",
        (2, 23) if year >= 2020 => "Emperor's Birthday",
        (12, 23) if (1989..=2018).contains(&year) => "Emperor's Birthday",
        (4, 29) if year >= 2007 => "Showa Day",
        (4, 29) => "Greenery Day",
        (5, 3) => "Constitution Memorial Day",
        (5, 4) if year >= 2007 => "Greenery Day",
        (5, 5) => "Children's Day",
        (11, 3) => "Culture Day",
        (11, 23) => "Labour Thanksgiving Day",
        _ => return moving_holiday(date),
    };
    Some(name)
}

fn moving_holiday(date: NaiveDate) -> Option<&'static str> {
    let year = date.year();
    let month = date.month();

    if month == 3 && date.day() == vernal_equinox_day(year) {
        return Some("Vernal Equinox Day");
    }
    if month == 9 && date.day() == autumnal_equinox_day(year) {
        return Some("Autumnal Equinox Day");
    }

    if let Some(name) = special_year_holiday(date) {
        return Some(name);
    }

    let nth_monday = |n: u8| NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n);

    match month {
        1 if year >= 2000 && nth_monday(2) == Some(date) => Some("Coming of Age Day"),
        7 if year >= 2003 && !matches!(year, 2020 | 2021) && nth_monday(3) == Some(date) => {
            Some("Marine Day")
        }
        8 if year >= 2016 && !matches!(year, 2020 | 2021) && date.day() == 11 => {
            Some("Mountain Day")
        }
        9 if year >= 2003 && nth_monday(3) == Some(date) => Some("Respect for the Aged Day"),
        10 if year >= 2000 && !matches!(year, 2020 | 2021) && nth_monday(2) == Some(date) => {
            Some("Sports Day")
        }
        _ => None,
    }
}

/// Holidays moved or added by one-off legislation.
fn special_year_holiday(date: NaiveDate) -> Option<&'static str> {
    match (date.year(), date.month(), date.day()) {
        (2019, 5, 1) => Some("Enthronement Day"),
        (2019, 10, 22) => Some("Enthronement Ceremony Day"),
        (2020, 7, 23) | (2021, 7, 22) => Some("Marine Day"),
        (2020, 7, 24) | (2021, 7, 23) => Some("Sports Day"),
        (2020, 8, 10) | (2021, 8, 8) => Some("Mountain Day"),
        _ => None,
    }
}

/// A non-holiday following an unbroken run of holidays that started on a Sunday.
fn is_substitute_holiday(date: NaiveDate) -> bool {
    if statutory_holiday(date).is_some() {
        return false;
    }

    let mut previous = date - Duration::days(1);
    while statutory_holiday(previous).is_some() {
        if previous.weekday() == Weekday::Sun {
            return true;
        }
        previous -= Duration::days(1);
    }
    false
}

/// A weekday sandwiched between two statutory holidays.
fn is_citizens_holiday(date: NaiveDate) -> bool {
    date.weekday() != Weekday::Sun
        && statutory_holiday(date).is_none()
        && statutory_holiday(date - Duration::days(1)).is_some()
        && statutory_holiday(date + Duration::days(1)).is_some()
}

fn vernal_equinox_day(year: i32) -> u32 {
    equinox_day(20.8431, year)
}

fn autumnal_equinox_day(year: i32) -> u32 {
    equinox_day(23.2488, year)
}

fn equinox_day(base: f64, year: i32) -> u32 {
    let offset = year - 1980;
    let day = base + 0.242194 * f64::from(offset) - f64::from(offset.div_euclid(4));
    day.floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn name(y: i32, m: u32, d: u32) -> Option<String> {
        JapaneseHolidays.holiday_name(date(y, m, d))
    }

    #[test]
    fn test_fixed_holidays_2025() {
        assert_eq!(name(2025, 1, 1).as_deref(), Some("New Year's Day"));
        assert_eq!(name(2025, 2, 11).as_deref(), Some("National Foundation Day"));
        assert_eq!(name(2025, 2, 23).as_deref(), Some("Emperor's Birthday"));
        assert_eq!(name(2025, 4, 29).as_deref(), Some("Showa Day"));
        assert_eq!(name(2025, 11, 3).as_deref(), Some("Culture Day"));
    }

    #[test]
    fn test_happy_monday_holidays_2025() {
        assert_eq!(name(2025, 1, 13).as_deref(), Some("Coming of Age Day"));
        assert_eq!(name(2025, 7, 21).as_deref(), Some("Marine Day"));
        assert_eq!(name(2025, 9, 15).as_deref(), Some("Respect for the Aged Day"));
        assert_eq!(name(2025, 10, 13).as_deref(), Some("Sports Day"));
    }

    #[test]
    fn test_equinoxes() {
        assert_eq!(name(2025, 3, 20).as_deref(), Some("Vernal Equinox Day"));
        assert_eq!(name(2025, 9, 23).as_deref(), Some("Autumnal Equinox Day"));
        assert_eq!(name(2024, 3, 20).as_deref(), Some("Vernal Equinox Day"));
        assert_eq!(name(2024, 9, 22).as_deref(), Some("Autumnal Equinox Day"));
    }

    #[test]
    fn test_substitute_holidays_2025() {
        // Feb 23 and Nov 23 fall on Sundays.
        assert_eq!(name(2025, 2, 24).as_deref(), Some("Substitute Holiday"));
        assert_eq!(name(2025, 11, 24).as_deref(), Some("Substitute Holiday"));
        // May 4 is a Sunday followed by Children's Day, so the substitute lands on May 6.
        assert_eq!(name(2025, 5, 5).as_deref(), Some("Children's Day"));
        assert_eq!(name(2025, 5, 6).as_deref(), Some("Substitute Holiday"));
        assert!(name(2025, 5, 7).is_none());
    }

    #[test]
    fn test_citizens_holiday_2026() {
        // Respect for the Aged Day (Sep 21) and the equinox (Sep 23) enclose Sep 22.
        assert_eq!(name(2026, 9, 21).as_deref(), Some("Respect for the Aged Day"));
        assert_eq!(name(2026, 9, 22).as_deref(), Some("Citizens' Holiday"));
        assert_eq!(name(2026, 9, 23).as_deref(), Some("Autumnal Equinox Day"));
    }

    #[test]
    fn test_olympic_year_moves() {
        assert_eq!(name(2021, 7, 22).as_deref(), Some("Marine Day"));
        assert_eq!(name(2021, 7, 23).as_deref(), Some("Sports Day"));
        assert!(name(2021, 10, 11).is_none());
        assert_eq!(name(2021, 8, 9).as_deref(), Some("Substitute Holiday"));
    }

    #[test]
    fn test_ordinary_days_are_not_holidays() {
        assert!(name(2025, 2, 5).is_none());
        assert!(name(2025, 12, 24).is_none());
        assert!(name(2025, 6, 10).is_none());
    }
}
