//! Spreadsheet (CSV) rendering.
//!
//! Column layout follows the calendar import format of common spreadsheet
//! and calendar tools.

use crate::config::ExportSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::Schedule;

use super::{description_for, subject_for};

/// The header row, in column order.
pub const CSV_HEADER: [&str; 7] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "All Day Event",
    "Description",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Renders `schedule` as CSV bytes, one row per entry after the header.
///
/// # Example
///
/// ```
/// use duty_roster::config::ExportSettings;
/// use duty_roster::export::render_csv;
/// use duty_roster::models::{Schedule, ScheduleEntry};
/// use chrono::{NaiveDate, Weekday};
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
/// let settings = ExportSettings { csv_bom: false, ..ExportSettings::default() };
/// let csv = String::from_utf8(render_csv(&schedule, &settings).unwrap()).unwrap();
///
/// assert_eq!(
///     csv,
///     "Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description\r\n\
///      Duty: Kato,2025/02/05,0:00,2025/02/05,23:59,TRUE,Wednesday duty\r\n"
/// );
/// ```
pub fn render_csv(schedule: &Schedule, settings: &ExportSettings) -> EngineResult<Vec<u8>> {
    let mut buffer = Vec::new();
    if settings.csv_bom {
        buffer.extend_from_slice(UTF8_BOM);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(buffer);

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for entry in &schedule.entries {
        let date = entry.date.format("%Y/%m/%d").to_string();
        writer
            .write_record([
                subject_for(entry, settings).as_str(),
                date.as_str(),
                "0:00",
                date.as_str(),
                "23:59",
                "TRUE",
                description_for(entry, settings).as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer.into_inner().map_err(|e| EngineError::Export {
        message: format!("failed to flush CSV output: {}", e),
    })
}

fn csv_error(error: csv::Error) -> EngineError {
    EngineError::Export {
        message: format!("failed to write CSV record: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleEntry;
    use chrono::{NaiveDate, Weekday};

    fn schedule() -> Schedule {
        Schedule {
            year: 2025,
            month: 2,
            entries: vec![
                ScheduleEntry {
                    date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
                    weekday: Weekday::Wed,
                    weekday_name: "水曜日".to_string(),
                    member: "Kato".to_string(),
                },
                ScheduleEntry {
                    date: NaiveDate::from_ymd_opt(2025, 2, 12).unwrap(),
                    weekday: Weekday::Wed,
                    weekday_name: "水曜日".to_string(),
                    member: "Smith, J".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_bom_is_written_by_default() {
        let bytes = render_csv(&schedule(), &ExportSettings::default()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with("Subject,Start Date,"));
    }

    #[test]
    fn test_rows_follow_header() {
        let settings = ExportSettings {
            csv_bom: false,
            subject_prefix: "当番:".to_string(),
            description_suffix: "の当番担当".to_string(),
            ..ExportSettings::default()
        };
        let text = String::from_utf8(render_csv(&schedule(), &settings).unwrap()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            "当番:Kato,2025/02/05,0:00,2025/02/05,23:59,TRUE,水曜日の当番担当"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let settings = ExportSettings {
            csv_bom: false,
            ..ExportSettings::default()
        };
        let text = String::from_utf8(render_csv(&schedule(), &settings).unwrap()).unwrap();
        assert!(text.contains("\"Duty: Smith, J\",2025/02/12"));
    }

    #[test]
    fn test_empty_schedule_has_header_only() {
        let empty = Schedule {
            year: 2025,
            month: 3,
            entries: vec![],
        };
        let settings = ExportSettings {
            csv_bom: false,
            ..ExportSettings::default()
        };
        let text = String::from_utf8(render_csv(&empty, &settings).unwrap()).unwrap();
        assert_eq!(text, format!("{}\r\n", CSV_HEADER.join(",")));
    }
}
