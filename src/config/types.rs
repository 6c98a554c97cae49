//! Configuration types for duty rostering.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and [`RosterConfig`],
//! the validated configuration the engine runs on.

use std::sync::Arc;
use std::time::Duration;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::holidays::{
    CompositeCalendar, HolidayCalendar, HolidayList, JapaneseHolidays, NoHolidays,
};
use crate::models::{FairnessBand, Member, PublicHoliday, Roster, WeekdayNaming};
use crate::rostering::{DEFAULT_MIN_SPACING, DutyWeightPolicy};

/// Default solver time limit in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// One roster member as written in `roster.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    /// The member's display name.
    pub name: String,
    /// Weekdays the member never takes duty on.
    #[serde(default)]
    pub forbidden_weekdays: Vec<Weekday>,
    /// A fixed fairness band replacing the computed one.
    #[serde(default)]
    pub fairness_override: Option<FairnessBand>,
}

impl From<MemberConfig> for Member {
    fn from(config: MemberConfig) -> Self {
        let member = Member::new(config.name).with_forbidden(config.forbidden_weekdays);
        match config.fairness_override {
            Some(band) => member.with_fairness_override(band),
            None => member,
        }
    }
}

/// Solver limits from `roster.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Wall-clock limit for one solve.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Minimum distance, in eligible days, between two duties of one member.
    #[serde(default = "default_min_spacing")]
    pub min_spacing: usize,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_min_spacing() -> usize {
    DEFAULT_MIN_SPACING
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            min_spacing: DEFAULT_MIN_SPACING,
        }
    }
}

impl SolverSettings {
    /// The time limit as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// The `roster.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterFile {
    /// Members in roster order.
    pub members: Vec<MemberConfig>,
    /// Duty weighting.
    #[serde(default)]
    pub weighting: DutyWeightPolicy,
    /// Solver limits.
    #[serde(default)]
    pub solver: SolverSettings,
}

/// The rule-based calendar a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    /// Japanese national holidays.
    #[default]
    Japan,
    /// No rule-based holidays.
    None,
}

/// The `holidays.yaml` file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySettings {
    /// The rule-based calendar.
    #[serde(default)]
    pub calendar: CalendarKind,
    /// Additional closure days, e.g. office holidays.
    #[serde(default)]
    pub extra_holidays: Vec<PublicHoliday>,
}

impl HolidaySettings {
    /// Builds the calendar these settings describe.
    pub fn build_calendar(&self) -> Arc<dyn HolidayCalendar> {
        let extra = HolidayList::new(self.extra_holidays.clone());
        match (self.calendar, extra.is_empty()) {
            (CalendarKind::Japan, true) => Arc::new(JapaneseHolidays),
            (CalendarKind::None, true) => Arc::new(NoHolidays),
            (CalendarKind::Japan, false) => {
                Arc::new(CompositeCalendar::new().with(JapaneseHolidays).with(extra))
            }
            (CalendarKind::None, false) => Arc::new(extra),
        }
    }
}

/// The `export.yaml` file structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// How weekday names are rendered.
    #[serde(default)]
    pub weekday_naming: WeekdayNaming,
    /// Prepended to the member name in event subjects.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Appended to the weekday name in event descriptions.
    #[serde(default = "default_description_suffix")]
    pub description_suffix: String,
    /// Whether CSV exports start with a UTF-8 byte order mark.
    #[serde(default = "default_csv_bom")]
    pub csv_bom: bool,
    /// The iCalendar `PRODID`.
    #[serde(default = "default_product_id")]
    pub product_id: String,
}

fn default_subject_prefix() -> String {
    "Duty: ".to_string()
}

fn default_description_suffix() -> String {
    " duty".to_string()
}

fn default_csv_bom() -> bool {
    true
}

fn default_product_id() -> String {
    "-//duty-roster//Duty Roster Engine//EN".to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            weekday_naming: WeekdayNaming::default(),
            subject_prefix: default_subject_prefix(),
            description_suffix: default_description_suffix(),
            csv_bom: default_csv_bom(),
            product_id: default_product_id(),
        }
    }
}

/// Complete, validated rostering configuration.
///
/// # Example
///
/// ```
/// use duty_roster::config::{RosterConfig, SolverSettings};
/// use duty_roster::models::{Member, Roster};
///
/// let roster = Roster::new(vec![Member::new("A"), Member::new("B")]).unwrap();
/// let config = RosterConfig::new(roster).with_solver(SolverSettings {
///     timeout_ms: 1_000,
///     min_spacing: 3,
/// });
/// assert_eq!(config.solver().min_spacing, 3);
/// assert_eq!(config.weighting().heavy_weekday, chrono::Weekday::Wed);
/// ```
#[derive(Debug, Clone)]
pub struct RosterConfig {
    roster: Roster,
    weighting: DutyWeightPolicy,
    solver: SolverSettings,
    holidays: HolidaySettings,
    export: ExportSettings,
}

impl RosterConfig {
    /// Creates a configuration with default weighting, limits, holidays and export settings.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            weighting: DutyWeightPolicy::default(),
            solver: SolverSettings::default(),
            holidays: HolidaySettings::default(),
            export: ExportSettings::default(),
        }
    }

    /// Assembles and validates a configuration from parsed files.
    pub fn from_files(
        roster_file: RosterFile,
        holidays: HolidaySettings,
        export: ExportSettings,
    ) -> EngineResult<Self> {
        let roster = Roster::new(roster_file.members.into_iter().map(Member::from).collect())?;

        if roster_file.solver.min_spacing == 0 {
            return Err(EngineError::invalid_config("solver.min_spacing must be at least 1"));
        }
        if roster_file.solver.timeout_ms == 0 {
            return Err(EngineError::invalid_config("solver.timeout_ms must be positive"));
        }

        Ok(Self {
            roster,
            weighting: roster_file.weighting,
            solver: roster_file.solver,
            holidays,
            export,
        })
    }

    /// Replaces the duty weighting.
    pub fn with_weighting(mut self, weighting: DutyWeightPolicy) -> Self {
        self.weighting = weighting;
        self
    }

    /// Replaces the solver limits.
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Replaces the holiday settings.
    pub fn with_holidays(mut self, holidays: HolidaySettings) -> Self {
        self.holidays = holidays;
        self
    }

    /// Replaces the export settings.
    pub fn with_export(mut self, export: ExportSettings) -> Self {
        self.export = export;
        self
    }

    /// Returns the roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Returns the duty weighting.
    pub fn weighting(&self) -> &DutyWeightPolicy {
        &self.weighting
    }

    /// Returns the solver limits.
    pub fn solver(&self) -> &SolverSettings {
        &self.solver
    }

    /// Returns the holiday settings.
    pub fn holidays(&self) -> &HolidaySettings {
        &self.holidays
    }

    /// Returns the export settings.
    pub fn export(&self) -> &ExportSettings {
        &self.export
    }
}
