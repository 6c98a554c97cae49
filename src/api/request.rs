//! Request types for the Duty Roster Engine API.
//!
//! `/roster` takes a [`RosterRequest`]. The export endpoints take a
//! [`Schedule`](crate::models::Schedule) as produced by `/roster`.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::rostering::parse_period;

/// A year or month, given either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodValue {
    /// A JSON integer, e.g. `2025`.
    Number(i64),
    /// A JSON string, e.g. `"2025"`.
    Text(String),
}

impl PeriodValue {
    fn as_text(&self) -> String {
        match self {
            PeriodValue::Number(n) => n.to_string(),
            PeriodValue::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for PeriodValue {
    fn from(value: i64) -> Self {
        PeriodValue::Number(value)
    }
}

impl From<&str> for PeriodValue {
    fn from(value: &str) -> Self {
        PeriodValue::Text(value.to_string())
    }
}

/// Request body for the `/roster` endpoint.
///
/// # Example
///
/// ```
/// use duty_roster::api::request::RosterRequest;
///
/// let request: RosterRequest = serde_json::from_str(r#"{"year": 2025, "month": "2"}"#).unwrap();
/// assert_eq!(request.period().unwrap(), (2025, 2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    /// The calendar year.
    pub year: PeriodValue,
    /// The month number (1-12).
    pub month: PeriodValue,
}

impl RosterRequest {
    /// Validates the year and month.
    pub fn period(&self) -> EngineResult<(i32, u32)> {
        parse_period(&self.year.as_text(), &self.month.as_text())
    }
}
