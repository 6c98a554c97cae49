//! Public holiday lookup.
//!
//! The engine only needs to know whether a date is a public holiday. That
//! question is answered by a [`HolidayCalendar`]; this module provides the
//! calendars the engine ships with:
//!
//! - [`JapaneseHolidays`]: rule-based Japanese national holidays
//! - [`HolidayList`]: an explicit list of dates, usually from configuration
//! - [`NoHolidays`]: never a holiday
//! - [`FnCalendar`]: wraps a closure, handy in tests
//! - [`CompositeCalendar`]: a date is a holiday if any inner calendar says so

mod japan;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::PublicHoliday;

pub use japan::JapaneseHolidays;

/// Answers whether a calendar date is a public holiday.
pub trait HolidayCalendar: Send + Sync {
    /// Returns the holiday name if `date` is a public holiday.
    fn holiday_name(&self, date: NaiveDate) -> Option<String>;

    /// Returns true if `date` is a public holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }
}

/// A calendar without holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn holiday_name(&self, _date: NaiveDate) -> Option<String> {
        None
    }
}

/// An explicit list of holidays.
///
/// # Example
///
/// ```
/// use duty_roster::holidays::{HolidayCalendar, HolidayList};
/// use duty_roster::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let closure = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
/// let calendar = HolidayList::new(vec![PublicHoliday {
///     date: closure,
///     name: "Office closure".to_string(),
/// }]);
///
/// assert!(calendar.is_holiday(closure));
/// assert_eq!(calendar.holiday_name(closure).as_deref(), Some("Office closure"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HolidayList {
    by_date: HashMap<NaiveDate, String>,
}

impl HolidayList {
    /// Builds the list. When a date appears twice the first name wins.
    pub fn new(holidays: Vec<PublicHoliday>) -> Self {
        let mut by_date = HashMap::with_capacity(holidays.len());
        for holiday in holidays {
            by_date.entry(holiday.date).or_insert(holiday.name);
        }
        Self { by_date }
    }

    /// Returns the number of listed dates.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// Returns true if no dates are listed.
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

impl HolidayCalendar for HolidayList {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.by_date.get(&date).cloned()
    }
}

/// Adapts a predicate into a [`HolidayCalendar`].
///
/// # Example
///
/// ```
/// use duty_roster::holidays::{FnCalendar, HolidayCalendar};
/// use chrono::{Datelike, NaiveDate};
///
/// let calendar = FnCalendar(|date: NaiveDate| date.day() == 13);
/// assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()));
/// ```
pub struct FnCalendar<F>(pub F);

impl<F> HolidayCalendar for FnCalendar<F>
where
    F: Fn(NaiveDate) -> bool + Send + Sync,
{
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        (self.0)(date).then(|| "holiday".to_string())
    }
}

/// Combines calendars; the first calendar naming a date wins.
#[derive(Default)]
pub struct CompositeCalendar {
    calendars: Vec<Box<dyn HolidayCalendar>>,
}

impl CompositeCalendar {
    /// Creates an empty composite (equivalent to [`NoHolidays`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a calendar.
    pub fn with(mut self, calendar: impl HolidayCalendar + 'static) -> Self {
        self.calendars.push(Box::new(calendar));
        self
    }

    /// Returns the number of inner calendars.
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    /// Returns true if there are no inner calendars.
    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }
}

impl HolidayCalendar for CompositeCalendar {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.calendars.iter().find_map(|c| c.holiday_name(date))
    }
}

impl std::fmt::Debug for CompositeCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeCalendar")
            .field("calendars", &self.calendars.len())
            .finish()
    }
}
