//! The roster engine.
//!
//! [`RosterEngine`] runs the full pipeline for one month: eligible days,
//! fairness bands, model construction, a time-limited solve, extraction and
//! verification. Each stage contributes an [`AuditStep`] to the result.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::config::RosterConfig;
use crate::error::{EngineError, EngineResult};
use crate::holidays::HolidayCalendar;
use crate::models::{AuditStep, AuditTrace, AuditWarning, RosterResult, SolveOutcome};

use super::eligible_days::calculate_eligible_days;
use super::extraction::extract_schedule;
use super::fairness::calculate_fairness_bands;
use super::model_builder::AssignmentModelBuilder;
use super::solver::{
    CancellationFlag, FeasibilitySolver, GoodLpSolver, LimitedSolve, SolveLimits, SolverVerdict,
    WorkerGauge, solve_with_limits_tracked,
};
use super::verification::verify_schedule;

/// Largest year accepted by [`parse_period`] and [`validate_period`].
pub const MAX_YEAR: i32 = 9999;

/// Parses a year and month given as text.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if either value is not an integer,
/// the month is outside 1-12, or the year is outside 1-9999.
///
/// # Example
///
/// ```
/// use duty_roster::rostering::parse_period;
///
/// assert_eq!(parse_period("2025", " 2 ").unwrap(), (2025, 2));
/// assert!(parse_period("2025", "13").is_err());
/// assert!(parse_period("twenty", "2").is_err());
/// ```
pub fn parse_period(year: &str, month: &str) -> EngineResult<(i32, u32)> {
    let year: i32 = year.trim().parse().map_err(|_| {
        EngineError::invalid_input("year", format!("expected an integer, got '{}'", year.trim()))
    })?;
    let month: u32 = month.trim().parse().map_err(|_| {
        EngineError::invalid_input("month", format!("expected an integer, got '{}'", month.trim()))
    })?;
    validate_period(year, month)?;
    Ok((year, month))
}

/// Checks that `year` and `month` name a representable month.
pub fn validate_period(year: i32, month: u32) -> EngineResult<()> {
    if !(1..=MAX_YEAR).contains(&year) {
        return Err(EngineError::invalid_input(
            "year",
            format!("must be between 1 and {}, got {}", MAX_YEAR, year),
        ));
    }
    if !(1..=12).contains(&month) {
        return Err(EngineError::invalid_input(
            "month",
            format!("must be between 1 and 12, got {}", month),
        ));
    }
    Ok(())
}

/// Solves monthly duty rosters for one configuration.
///
/// The engine holds no per-solve state; every call builds a fresh model, so
/// one engine can serve concurrent solves.
///
/// # Example
///
/// ```
/// use duty_roster::config::RosterConfig;
/// use duty_roster::holidays::NoHolidays;
/// use duty_roster::models::{Member, Roster};
/// use duty_roster::rostering::RosterEngine;
/// use std::sync::Arc;
///
/// let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
/// let roster = Roster::new(names.iter().map(|n| Member::new(*n)).collect()).unwrap();
/// let engine = RosterEngine::new(RosterConfig::new(roster)).with_holidays(Arc::new(NoHolidays));
///
/// let result = engine.solve_month(2025, 6).unwrap();
/// let schedule = result.outcome.schedule().expect("June 2025 is solvable");
/// assert_eq!(schedule.len(), 16);
/// ```
#[derive(Clone)]
pub struct RosterEngine {
    config: Arc<RosterConfig>,
    holidays: Arc<dyn HolidayCalendar>,
    solver: Arc<dyn FeasibilitySolver>,
    workers: WorkerGauge,
}

impl std::fmt::Debug for RosterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterEngine")
            .field("config", &self.config)
            .field("solver", &self.solver.name())
            .field("active_workers", &self.workers.active())
            .finish_non_exhaustive()
    }
}

impl RosterEngine {
    /// Creates an engine using the configured calendar and the `good_lp` solver.
    pub fn new(config: RosterConfig) -> Self {
        let holidays = config.holidays().build_calendar();
        Self {
            config: Arc::new(config),
            holidays,
            solver: Arc::new(GoodLpSolver),
            workers: WorkerGauge::new(),
        }
    }

    /// Replaces the holiday calendar.
    pub fn with_holidays(mut self, holidays: Arc<dyn HolidayCalendar>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Replaces the solver backend.
    pub fn with_solver(mut self, solver: Arc<dyn FeasibilitySolver>) -> Self {
        self.solver = solver;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Returns the number of solver threads still running, including ones
    /// abandoned after a timeout or cancellation. Clones share the count.
    pub fn active_workers(&self) -> usize {
        self.workers.active()
    }

    /// Returns the holiday calendar.
    pub fn holidays(&self) -> &dyn HolidayCalendar {
        self.holidays.as_ref()
    }

    /// Solves one month.
    ///
    /// Infeasible months, timeouts and cancellation are reported through
    /// [`RosterResult::outcome`]; errors are reserved for invalid input,
    /// solver failures and invalid solver output.
    pub fn solve_month(&self, year: i32, month: u32) -> EngineResult<RosterResult> {
        self.solve_month_with_cancel(year, month, &CancellationFlag::new())
    }

    /// Solves one month, giving up when `cancel` is set.
    pub fn solve_month_with_cancel(
        &self,
        year: i32,
        month: u32,
        cancel: &CancellationFlag,
    ) -> EngineResult<RosterResult> {
        validate_period(year, month)?;

        let start_time = Instant::now();
        let config = &self.config;
        let roster = config.roster();
        let mut steps: Vec<AuditStep> = Vec::new();
        let mut warnings: Vec<AuditWarning> = Vec::new();
        let mut step_number: u32 = 1;

        let eligible = calculate_eligible_days(
            year,
            month,
            self.holidays.as_ref(),
            config.weighting(),
            step_number,
        );
        steps.push(eligible.audit_step);
        step_number += 1;
        let days = eligible.days;

        if days.is_empty() {
            warnings.push(AuditWarning {
                code: "EMPTY_MONTH".to_string(),
                message: format!("{}-{:02} has no eligible duty days", year, month),
                severity: "info".to_string(),
            });
        }

        let bands = calculate_fairness_bands(&days, roster, step_number);
        steps.push(bands.audit_step);
        step_number += 1;

        let min_spacing = config.solver().min_spacing;
        let built = AssignmentModelBuilder::new(&days, roster)
            .with_member_bands(bands.member_bands.clone())
            .with_min_spacing(min_spacing)
            .build_with_audit(step_number);
        steps.push(built.audit_step);
        step_number += 1;
        let model = Arc::new(built.model);

        tracing::info!(
            year,
            month,
            days = days.len(),
            members = roster.len(),
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            solver = self.solver.name(),
            "solving duty roster"
        );

        let limits = SolveLimits::with_timeout(config.solver().timeout());
        let solve_start = Instant::now();
        let limited = solve_with_limits_tracked(
            Arc::clone(&self.solver),
            Arc::clone(&model),
            limits,
            cancel,
            &self.workers,
        )?;
        let solve_ms = solve_start.elapsed().as_millis() as u64;

        steps.push(AuditStep {
            step_number,
            rule_id: "solver".to_string(),
            rule_name: "Feasibility Search".to_string(),
            input: serde_json::json!({
                "solver": self.solver.name(),
                "timeout_ms": config.solver().timeout_ms,
            }),
            output: serde_json::json!({
                "verdict": verdict_label(&limited),
                "elapsed_ms": solve_ms,
            }),
            reasoning: format!(
                "{} answered '{}' after {} ms",
                self.solver.name(),
                verdict_label(&limited),
                solve_ms
            ),
        });
        step_number += 1;

        let outcome = match limited {
            LimitedSolve::Finished(SolverVerdict::Feasible(witness)) => {
                let extracted = extract_schedule(
                    &model,
                    &witness,
                    &days,
                    roster,
                    config.export().weekday_naming,
                    year,
                    month,
                    step_number,
                )?;
                steps.push(extracted.audit_step);
                step_number += 1;

                let violations = verify_schedule(
                    &extracted.schedule,
                    &days,
                    roster,
                    &bands.member_bands,
                    min_spacing,
                );
                if let Some(first) = violations.first() {
                    tracing::error!(
                        year,
                        month,
                        violations = violations.len(),
                        first = %first,
                        "solver output failed verification"
                    );
                    return Err(EngineError::InvalidWitness {
                        message: violations
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    });
                }
                steps.push(AuditStep {
                    step_number,
                    rule_id: "verification".to_string(),
                    rule_name: "Schedule Verification".to_string(),
                    input: serde_json::json!({
                        "entries": extracted.schedule.len(),
                        "min_spacing": min_spacing,
                    }),
                    output: serde_json::json!({ "violations": 0 }),
                    reasoning: "every day covered once; weekday, repeat, spacing and fairness rules hold"
                        .to_string(),
                });

                SolveOutcome::Solved {
                    schedule: extracted.schedule,
                    summary: extracted.summary,
                }
            }
            LimitedSolve::Finished(SolverVerdict::Infeasible) => SolveOutcome::Infeasible,
            LimitedSolve::TimedOut => SolveOutcome::TimedOut {
                limit_ms: config.solver().timeout_ms,
            },
            LimitedSolve::Cancelled => SolveOutcome::Cancelled,
        };

        let duration_us = start_time.elapsed().as_micros() as u64;
        tracing::info!(
            year,
            month,
            outcome = outcome.label(),
            duration_us,
            "duty roster solve finished"
        );

        Ok(RosterResult {
            result_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            year,
            month,
            outcome,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        })
    }
}

fn verdict_label(limited: &LimitedSolve) -> &'static str {
    match limited {
        LimitedSolve::Finished(SolverVerdict::Feasible(_)) => "feasible",
        LimitedSolve::Finished(SolverVerdict::Infeasible) => "infeasible",
        LimitedSolve::TimedOut => "timed_out",
        LimitedSolve::Cancelled => "cancelled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverSettings;
    use crate::holidays::{FnCalendar, JapaneseHolidays, NoHolidays};
    use crate::models::{FairnessBand, Member, Roster};
    use crate::rostering::model::{AssignmentModel, Witness};
    use chrono::{Datelike, Weekday};
    use std::time::Duration;

    fn roster(names: &[&str]) -> Roster {
        Roster::new(names.iter().map(|n| Member::new(*n)).collect()).unwrap()
    }

    fn eight_members() -> Roster {
        roster(&["A", "B", "C", "D", "E", "F", "G", "H"])
    }

    /// Answers every model with all variables set.
    struct EverythingSolver;

    impl FeasibilitySolver for EverythingSolver {
        fn solve(&self, model: &AssignmentModel) -> EngineResult<SolverVerdict> {
            Ok(SolverVerdict::Feasible(Witness::new(vec![
                true;
                model.variables().len()
            ])))
        }

        fn name(&self) -> &'static str {
            "everything"
        }
    }

    /// Sets exactly one variable per day, ignoring every other rule.
    struct FirstCandidateSolver;

    impl FeasibilitySolver for FirstCandidateSolver {
        fn solve(&self, model: &AssignmentModel) -> EngineResult<SolverVerdict> {
            let mut values = vec![false; model.variables().len()];
            for day in 0..model.day_count() {
                if let Some(var) = (0..model.member_count()).find_map(|m| model.var(day, m)) {
                    values[var.0] = true;
                }
            }
            Ok(SolverVerdict::Feasible(Witness::new(values)))
        }

        fn name(&self) -> &'static str {
            "first-candidate"
        }
    }

    struct SleepySolver;

    impl FeasibilitySolver for SleepySolver {
        fn solve(&self, _model: &AssignmentModel) -> EngineResult<SolverVerdict> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(SolverVerdict::Infeasible)
        }

        fn name(&self) -> &'static str {
            "sleepy"
        }
    }

    #[test]
    fn test_parse_period_accepts_integers() {
        assert_eq!(parse_period("2025", "2").unwrap(), (2025, 2));
        assert_eq!(parse_period("1", "12").unwrap(), (1, 12));
    }

    #[test]
    fn test_parse_period_rejects_bad_input() {
        for (year, month, field) in [
            ("2025", "0", "month"),
            ("2025", "13", "month"),
            ("0", "1", "year"),
            ("10000", "1", "year"),
            ("abc", "1", "year"),
            ("2025", "", "month"),
            ("2025", "2.5", "month"),
        ] {
            match parse_period(year, month) {
                Err(EngineError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{}/{}: expected InvalidInput, got {:?}", year, month, other),
            }
        }
    }

    #[test]
    fn test_solve_month_produces_valid_schedule() {
        crate::logging::init_test();
        let engine = RosterEngine::new(RosterConfig::new(eight_members()))
            .with_holidays(Arc::new(NoHolidays));
        let result = engine.solve_month(2025, 6).unwrap();

        let schedule = result.outcome.schedule().unwrap();
        assert_eq!(schedule.len(), 16);
        assert!(schedule
            .entries
            .iter()
            .all(|e| !matches!(e.weekday, Weekday::Mon | Weekday::Sat | Weekday::Sun)));
        assert_eq!(result.outcome.summary().unwrap().total(), 16);

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "eligible_days",
                "fairness_band",
                "assignment_model",
                "solver",
                "schedule_extraction",
                "verification"
            ]
        );
        let numbers: Vec<u32> = result.audit_trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_japanese_holidays_are_skipped() {
        let engine = RosterEngine::new(RosterConfig::new(eight_members()))
            .with_holidays(Arc::new(JapaneseHolidays));
        let result = engine.solve_month(2025, 2).unwrap();
        let schedule = result.outcome.schedule().unwrap();

        assert_eq!(schedule.len(), 15);
        assert!(schedule.entries.iter().all(|e| e.date.day() != 11));
    }

    #[test]
    fn test_infeasible_month_is_an_outcome() {
        // Two members share four weight-1 days: band [2, 3], but spacing
        // forbids a second duty within four slots.
        let engine = RosterEngine::new(RosterConfig::new(roster(&["A", "B"])))
            .with_holidays(Arc::new(FnCalendar(|d: chrono::NaiveDate| {
                d.day() > 11 || d.weekday() == Weekday::Wed
            })));
        let result = engine.solve_month(2025, 2).unwrap();

        assert_eq!(result.outcome, SolveOutcome::Infeasible);
        assert!(result.outcome.schedule().is_none());
        assert_eq!(result.audit_trace.steps.last().unwrap().rule_id, "solver");
    }

    #[test]
    fn test_empty_month_is_solved_with_warning() {
        let engine = RosterEngine::new(RosterConfig::new(roster(&["A", "B"])))
            .with_holidays(Arc::new(FnCalendar(|_: chrono::NaiveDate| true)));
        let result = engine.solve_month(2025, 3).unwrap();

        let schedule = result.outcome.schedule().unwrap();
        assert!(schedule.is_empty());
        assert_eq!(result.audit_trace.warnings[0].code, "EMPTY_MONTH");
    }

    #[test]
    fn test_override_member_band_is_respected() {
        let mut members: Vec<Member> = ["B", "C", "D", "E", "F", "G", "H"]
            .iter()
            .map(|n| Member::new(*n))
            .collect();
        members.insert(
            0,
            Member::new("A").with_fairness_override(FairnessBand { min: 1, max: 2 }),
        );
        let engine = RosterEngine::new(RosterConfig::new(Roster::new(members).unwrap()))
            .with_holidays(Arc::new(NoHolidays));

        let result = engine.solve_month(2025, 10).unwrap();
        let schedule = result.outcome.schedule().unwrap();
        let a_weight: u32 = schedule
            .entries
            .iter()
            .filter(|e| e.member == "A")
            .map(|e| if e.weekday == Weekday::Wed { 2 } else { 1 })
            .sum();
        assert!((1..=2).contains(&a_weight));
    }

    #[test]
    fn test_invalid_period_is_an_error() {
        let engine = RosterEngine::new(RosterConfig::new(eight_members()));
        assert!(matches!(
            engine.solve_month(2025, 13),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_solver_output_is_verified() {
        crate::logging::init_test();
        let engine = RosterEngine::new(RosterConfig::new(eight_members()))
            .with_holidays(Arc::new(NoHolidays))
            .with_solver(Arc::new(EverythingSolver));
        let err = engine.solve_month(2025, 6).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWitness { .. }));

        let engine = RosterEngine::new(RosterConfig::new(eight_members()))
            .with_holidays(Arc::new(NoHolidays))
            .with_solver(Arc::new(FirstCandidateSolver));
        let err = engine.solve_month(2025, 6).unwrap_err();
        assert!(err.to_string().contains("consecutive"));
    }

    #[test]
    fn test_timeout_outcome_carries_limit() {
        let config = RosterConfig::new(eight_members()).with_solver(SolverSettings {
            timeout_ms: 20,
            min_spacing: 5,
        });
        let engine = RosterEngine::new(config)
            .with_holidays(Arc::new(NoHolidays))
            .with_solver(Arc::new(SleepySolver));

        let result = engine.solve_month(2025, 6).unwrap();
        assert_eq!(result.outcome, SolveOutcome::TimedOut { limit_ms: 20 });
        // The sleeping search is still running and shared with clones.
        assert_eq!(engine.clone().active_workers(), 1);
    }

    #[test]
    fn test_cancelled_outcome() {
        let engine = RosterEngine::new(RosterConfig::new(eight_members()))
            .with_holidays(Arc::new(NoHolidays))
            .with_solver(Arc::new(SleepySolver));
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let result = engine.solve_month_with_cancel(2025, 6, &cancel).unwrap();
        assert_eq!(result.outcome, SolveOutcome::Cancelled);
    }
}
