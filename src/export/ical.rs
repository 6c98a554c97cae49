//! iCalendar (RFC 5545) rendering.
//!
//! Every schedule entry becomes one all-day, non-blocking `VEVENT`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::ExportSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::Schedule;

use super::{description_for, subject_for};

/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

/// Renders `schedule` as an iCalendar document stamped with the current time.
pub fn render_ical(schedule: &Schedule, settings: &ExportSettings) -> EngineResult<String> {
    render_ical_at(schedule, settings, Utc::now())
}

/// Renders `schedule` as an iCalendar document with a fixed `DTSTAMP`.
///
/// # Errors
///
/// Returns [`EngineError::Export`] for an entry on the last representable
/// date, whose end date cannot be computed.
///
/// # Example
///
/// ```
/// use duty_roster::config::ExportSettings;
/// use duty_roster::export::render_ical_at;
/// use duty_roster::models::{Schedule, ScheduleEntry};
/// use chrono::{NaiveDate, TimeZone, Utc, Weekday};
///
/// let schedule = Schedule {
///     year: 2025,
///     month: 2,
///     entries: vec![ScheduleEntry {
///         date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
///         weekday: Weekday::Wed,
///         weekday_name: "Wednesday".to_string(),
///         member: "Kato".to_string(),
///     }],
/// };
/// let stamp = Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap();
/// let ics = render_ical_at(&schedule, &ExportSettings::default(), stamp).unwrap();
///
/// assert!(ics.contains("DTSTART;VALUE=DATE:20250205\r\n"));
/// assert!(ics.contains("DTEND;VALUE=DATE:20250206\r\n"));
/// assert!(ics.contains("SUMMARY:Duty: Kato\r\n"));
/// ```
pub fn render_ical_at(
    schedule: &Schedule,
    settings: &ExportSettings,
    stamp: DateTime<Utc>,
) -> EngineResult<String> {
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", escape_text(&settings.product_id)),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    for entry in &schedule.entries {
        let end = entry.date.succ_opt().ok_or_else(|| EngineError::Export {
            message: format!("no day follows {}", entry.date),
        })?;

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@duty-roster", Uuid::new_v4()));
        lines.push(format!("DTSTAMP:{}", dtstamp));
        lines.push(format!(
            "SUMMARY:{}",
            escape_text(&subject_for(entry, settings))
        ));
        lines.push(format!("DTSTART;VALUE=DATE:{}", entry.date.format("%Y%m%d")));
        lines.push(format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")));
        lines.push(format!(
            "DESCRIPTION:{}",
            escape_text(&description_for(entry, settings))
        ));
        lines.push("X-MICROSOFT-CDO-ALLDAYEVENT:TRUE".to_string());
        lines.push("TRANSP:TRANSPARENT".to_string());
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    Ok(out)
}

/// Escapes a TEXT property value.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Folds a content line so no physical line exceeds 75 octets.
///
/// Continuation lines start with a single space. Multi-byte characters are
/// never split.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > limit {
            out.push_str("\r\n ");
            used = 0;
            // The leading space counts toward the continuation line.
            limit = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        used += width;
    }
    out
}
