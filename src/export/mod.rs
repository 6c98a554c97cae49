//! Schedule export.
//!
//! Renders a [`Schedule`] as an iCalendar file or a CSV spreadsheet, and
//! writes either to disk. Exports never modify the schedule.

mod csv;
mod ical;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ExportSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{Schedule, ScheduleEntry, weekday_name};

pub use self::csv::{CSV_HEADER, render_csv};
pub use self::ical::{escape_text, fold_line, render_ical, render_ical_at};

/// A supported export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// iCalendar (`.ics`).
    Ical,
    /// Comma-separated values (`.csv`).
    Csv,
}

impl ExportFormat {
    /// The file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ical => "ics",
            ExportFormat::Csv => "csv",
        }
    }

    /// The MIME type served for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Ical => "text/calendar; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// The suggested file name, e.g. `duty_roster_2025_2.ics`.
///
/// # Example
///
/// ```
/// use duty_roster::export::{suggested_file_name, ExportFormat};
/// use duty_roster::models::Schedule;
///
/// let schedule = Schedule { year: 2025, month: 2, entries: vec![] };
/// assert_eq!(suggested_file_name(&schedule, ExportFormat::Csv), "duty_roster_2025_2.csv");
/// ```
pub fn suggested_file_name(schedule: &Schedule, format: ExportFormat) -> String {
    format!(
        "duty_roster_{}_{}.{}",
        schedule.year,
        schedule.month,
        format.extension()
    )
}

/// Renders `schedule` in `format`.
pub fn render(
    schedule: &Schedule,
    settings: &ExportSettings,
    format: ExportFormat,
) -> EngineResult<Vec<u8>> {
    match format {
        ExportFormat::Ical => render_ical(schedule, settings).map(String::into_bytes),
        ExportFormat::Csv => render_csv(schedule, settings),
    }
}

/// Renders `schedule` in `format` and writes it to `path`.
///
/// # Errors
///
/// Returns [`EngineError::ExportIo`] if the file cannot be written, or
/// [`EngineError::Export`] if rendering fails.
pub fn write_export<P: AsRef<Path>>(
    schedule: &Schedule,
    settings: &ExportSettings,
    format: ExportFormat,
    path: P,
) -> EngineResult<()> {
    let path = path.as_ref();
    let bytes = render(schedule, settings, format)?;
    fs::write(path, &bytes).map_err(|source| EngineError::ExportIo {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        format = format.extension(),
        entries = schedule.len(),
        bytes = bytes.len(),
        "schedule exported"
    );
    Ok(())
}

fn subject_for(entry: &ScheduleEntry, settings: &ExportSettings) -> String {
    format!("{}{}", settings.subject_prefix, entry.member)
}

/// Weekday name plus suffix; a blank stored name is re-rendered from the weekday.
fn description_for(entry: &ScheduleEntry, settings: &ExportSettings) -> String {
    let name = if entry.weekday_name.trim().is_empty() {
        weekday_name(entry.weekday, settings.weekday_naming)
    } else {
        entry.weekday_name.as_str()
    };
    format!("{}{}", name, settings.description_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekdayNaming;
    use chrono::{NaiveDate, Weekday};

    fn schedule() -> Schedule {
        Schedule {
            year: 2025,
            month: 2,
            entries: vec![ScheduleEntry {
                date: NaiveDate::from_ymd_opt(2025, 2, 6).unwrap(),
                weekday: Weekday::Thu,
                weekday_name: "木曜日".to_string(),
                member: "Komai".to_string(),
            }],
        }
    }

    #[test]
    fn test_suggested_file_names() {
        assert_eq!(
            suggested_file_name(&schedule(), ExportFormat::Ical),
            "duty_roster_2025_2.ics"
        );
        assert_eq!(
            suggested_file_name(&schedule(), ExportFormat::Csv),
            "duty_roster_2025_2.csv"
        );
    }

    #[test]
    fn test_blank_weekday_name_is_rendered_from_weekday() {
        let mut entry = schedule().entries[0].clone();
        entry.weekday_name = String::new();
        let settings = ExportSettings {
            weekday_naming: WeekdayNaming::English,
            description_suffix: " duty".to_string(),
            ..ExportSettings::default()
        };
        assert_eq!(description_for(&entry, &settings), "Thursday duty");
    }

    #[test]
    fn test_write_export_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::default();
        let original = schedule();

        for format in [ExportFormat::Ical, ExportFormat::Csv] {
            let path = dir.path().join(suggested_file_name(&original, format));
            write_export(&original, &settings, format, &path).unwrap();
            let written = fs::read(&path).unwrap();
            assert!(!written.is_empty());
        }

        let ics = fs::read_to_string(dir.path().join("duty_roster_2025_2.ics")).unwrap();
        assert!(ics.contains("SUMMARY:Duty: Komai"));
        assert_eq!(original, schedule());
    }

    #[test]
    fn test_write_export_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("roster.csv");

        let err = write_export(&schedule(), &ExportSettings::default(), ExportFormat::Csv, &path)
            .unwrap_err();
        match err {
            EngineError::ExportIo { path: p, .. } => assert!(p.ends_with("roster.csv")),
            other => panic!("Expected ExportIo, got {:?}", other),
        }
    }
}
