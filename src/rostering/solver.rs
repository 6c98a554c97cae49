//! Feasibility solving.
//!
//! The [`FeasibilitySolver`] trait is the seam between the assignment model
//! and a concrete backend. [`GoodLpSolver`] encodes the model as a 0/1
//! integer program for `good_lp` with the pure-Rust `microlp` backend.
//!
//! [`solve_with_limits`] runs a solver on a worker thread and stops waiting
//! once the time limit passes or the caller cancels.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    variable,
};

use crate::error::{EngineError, EngineResult};

use super::model::{AssignmentModel, Witness};

/// The answer a solver gives for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverVerdict {
    /// A satisfying assignment.
    Feasible(Witness),
    /// The solver proved no assignment exists.
    Infeasible,
}

/// A backend able to decide a pure feasibility problem over 0/1 variables.
pub trait FeasibilitySolver: Send + Sync {
    /// Solves `model`, returning a witness or a proof of infeasibility.
    ///
    /// Errors are reserved for backend failures, not for infeasibility.
    fn solve(&self, model: &AssignmentModel) -> EngineResult<SolverVerdict>;

    /// A short name for logs and audit output.
    fn name(&self) -> &'static str;
}

/// `good_lp` with the `microlp` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl FeasibilitySolver for GoodLpSolver {
    fn solve(&self, model: &AssignmentModel) -> EngineResult<SolverVerdict> {
        let mut vars = ProblemVariables::new();
        let columns: Vec<Variable> = model
            .variables()
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let mut problem = vars
            .minimise(Expression::from(0.0))
            .using(good_lp::microlp);

        for c in model.constraints() {
            if c.terms.is_empty() {
                continue;
            }
            let lhs = c
                .terms
                .iter()
                .fold(Expression::from(0.0), |acc, (var, coefficient)| {
                    acc + f64::from(*coefficient) * columns[var.0]
                });
            let lower = f64::from(c.lower);
            let upper = f64::from(c.upper);

            if c.lower == c.upper {
                problem = problem.with(constraint!(lhs == lower));
            } else {
                if c.lower > 0 {
                    problem = problem.with(constraint!(lhs.clone() >= lower));
                }
                problem = problem.with(constraint!(lhs <= upper));
            }
        }

        match problem.solve() {
            Ok(solution) => {
                let values = columns.iter().map(|v| solution.value(*v) > 0.5).collect();
                Ok(SolverVerdict::Feasible(Witness::new(values)))
            }
            Err(ResolutionError::Infeasible) => Ok(SolverVerdict::Infeasible),
            Err(other) => Err(EngineError::Solver {
                message: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "good_lp/microlp"
    }
}

/// A shared flag a caller sets to abandon an in-flight solve.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Time limits for one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveLimits {
    /// Wall-clock limit for the search.
    pub timeout: Duration,
    /// How often the cancellation flag is checked.
    pub poll_interval: Duration,
}

impl SolveLimits {
    /// Limits with the given timeout and a 10 ms poll interval.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(10),
        }
    }
}

/// How a limited solve ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitedSolve {
    /// The solver answered within the limit.
    Finished(SolverVerdict),
    /// The limit passed first.
    TimedOut,
    /// The caller cancelled first.
    Cancelled,
}

/// Answers models that need no search.
///
/// A model with a constraint that cannot be met is infeasible. A model with
/// no variables is decided by evaluating it under the empty witness.
pub fn decide_without_search(model: &AssignmentModel) -> Option<SolverVerdict> {
    if model.trivially_unsatisfiable().is_some() {
        return Some(SolverVerdict::Infeasible);
    }
    if model.variables().is_empty() {
        let empty = Witness::new(Vec::new());
        return Some(if model.is_satisfied_by(&empty) {
            SolverVerdict::Feasible(empty)
        } else {
            SolverVerdict::Infeasible
        });
    }
    None
}

/// Counts solver worker threads that are still running.
///
/// Clones share the count. A worker abandoned after a timeout or
/// cancellation stays counted until its search actually ends.
#[derive(Debug, Clone, Default)]
pub struct WorkerGauge(Arc<AtomicUsize>);

impl WorkerGauge {
    /// Creates a gauge with no running workers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of running workers.
    pub fn active(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn enter(&self) -> WorkerGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        WorkerGuard(Arc::clone(&self.0))
    }
}

/// Decrements the gauge when the worker ends, including by panic.
struct WorkerGuard(Arc<AtomicUsize>);

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs `solver` on `model`, bounded by `limits` and `cancel`.
///
/// The search runs on its own thread. On timeout or cancellation the thread
/// is detached and its answer discarded; the backend cannot be interrupted
/// mid-search. Use [`solve_with_limits_tracked`] to count such threads.
pub fn solve_with_limits(
    solver: Arc<dyn FeasibilitySolver>,
    model: Arc<AssignmentModel>,
    limits: SolveLimits,
    cancel: &CancellationFlag,
) -> EngineResult<LimitedSolve> {
    solve_with_limits_tracked(solver, model, limits, cancel, &WorkerGauge::new())
}

/// Like [`solve_with_limits`], counting the worker thread in `workers` for
/// as long as it runs.
pub fn solve_with_limits_tracked(
    solver: Arc<dyn FeasibilitySolver>,
    model: Arc<AssignmentModel>,
    limits: SolveLimits,
    cancel: &CancellationFlag,
    workers: &WorkerGauge,
) -> EngineResult<LimitedSolve> {
    if cancel.is_cancelled() {
        return Ok(LimitedSolve::Cancelled);
    }
    if let Some(verdict) = decide_without_search(&model) {
        tracing::debug!("model decided without search");
        return Ok(LimitedSolve::Finished(verdict));
    }

    let (tx, rx) = mpsc::channel();
    let solver_name = solver.name();
    let guard = workers.enter();
    thread::Builder::new()
        .name("roster-solver".to_string())
        .spawn(move || {
            let _guard = guard;
            let verdict = solver.solve(&model);
            // The receiver is gone after a timeout; nothing to report then.
            let _ = tx.send(verdict);
        })
        .map_err(|e| EngineError::Solver {
            message: format!("failed to start solver thread: {}", e),
        })?;

    let deadline = Instant::now() + limits.timeout;
    loop {
        if cancel.is_cancelled() {
            tracing::info!(
                solver = solver_name,
                active_workers = workers.active(),
                "solve cancelled, worker left running"
            );
            return Ok(LimitedSolve::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            tracing::warn!(
                solver = solver_name,
                timeout_ms = limits.timeout.as_millis() as u64,
                active_workers = workers.active(),
                "solver time limit reached, worker left running"
            );
            return Ok(LimitedSolve::TimedOut);
        }
        let slice = limits.poll_interval.min(deadline - now);
        match rx.recv_timeout(slice) {
            Ok(verdict) => return verdict.map(LimitedSolve::Finished),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(EngineError::Solver {
                    message: format!("{} stopped without an answer", solver_name),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EligibleDay, Member, Roster};
    use crate::rostering::{AssignmentModelBuilder, DutyWeightPolicy};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn days(dates: &[(u32, u32)]) -> Vec<EligibleDay> {
        let policy = DutyWeightPolicy::default();
        dates
            .iter()
            .enumerate()
            .map(|(index, (month, day))| {
                let date = NaiveDate::from_ymd_opt(2025, *month, *day).unwrap();
                EligibleDay {
                    index,
                    date,
                    weekday: date.weekday(),
                    weight: policy.weight(date.weekday()),
                }
            })
            .collect()
    }

    fn roster(names: &[&str]) -> Roster {
        Roster::new(names.iter().map(|n| Member::new(*n)).collect()).unwrap()
    }

    /// Solver that sleeps before answering infeasible.
    struct SlowSolver(Duration);

    impl FeasibilitySolver for SlowSolver {
        fn solve(&self, _model: &AssignmentModel) -> EngineResult<SolverVerdict> {
            thread::sleep(self.0);
            Ok(SolverVerdict::Infeasible)
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    /// Solver that panics, dropping its sender.
    struct PanickingSolver;

    impl FeasibilitySolver for PanickingSolver {
        fn solve(&self, _model: &AssignmentModel) -> EngineResult<SolverVerdict> {
            panic!("backend crashed");
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[test]
    fn test_good_lp_finds_witness_satisfying_model() {
        // Tue 4 .. Fri 14 Feb 2025, skipping Mon 10 and Tue 11.
        let days = days(&[(2, 4), (2, 5), (2, 6), (2, 7), (2, 12), (2, 13), (2, 14)]);
        let roster = roster(&["A", "B", "C", "D", "E", "F"]);
        let model = AssignmentModelBuilder::new(&days, &roster).build();

        match GoodLpSolver.solve(&model).unwrap() {
            SolverVerdict::Feasible(witness) => assert!(model.is_satisfied_by(&witness)),
            SolverVerdict::Infeasible => panic!("expected a witness"),
        }
    }

    #[test]
    fn test_good_lp_reports_infeasible() {
        // Two members, four days: band [2, 3] but spacing forbids a second duty.
        let days = days(&[(2, 4), (2, 6), (2, 7), (2, 11)]);
        let roster = roster(&["A", "B"]);
        let model = AssignmentModelBuilder::new(&days, &roster).build();

        assert!(decide_without_search(&model).is_none());
        assert_eq!(GoodLpSolver.solve(&model).unwrap(), SolverVerdict::Infeasible);
    }

    #[test]
    fn test_decide_without_search() {
        let roster = roster(&["A"]);
        let empty = AssignmentModelBuilder::new(&[], &roster).build();
        assert_eq!(
            decide_without_search(&empty),
            Some(SolverVerdict::Feasible(Witness::new(vec![])))
        );

        let wednesday = days(&[(2, 5)]);
        let blocked = Roster::new(vec![Member::new("A").with_forbidden([Weekday::Wed])]).unwrap();
        let model = AssignmentModelBuilder::new(&wednesday, &blocked).build();
        assert_eq!(decide_without_search(&model), Some(SolverVerdict::Infeasible));
    }

    #[test]
    fn test_timeout_is_reported() {
        let days = days(&[(2, 4), (2, 5)]);
        let roster = roster(&["A", "B"]);
        let model = Arc::new(AssignmentModelBuilder::new(&days, &roster).build());

        let outcome = solve_with_limits(
            Arc::new(SlowSolver(Duration::from_millis(500))),
            model,
            SolveLimits::with_timeout(Duration::from_millis(20)),
            &CancellationFlag::new(),
        )
        .unwrap();
        assert_eq!(outcome, LimitedSolve::TimedOut);
    }

    #[test]
    fn test_cancellation_is_reported() {
        let days = days(&[(2, 4), (2, 5)]);
        let roster = roster(&["A", "B"]);
        let model = Arc::new(AssignmentModelBuilder::new(&days, &roster).build());
        let cancel = CancellationFlag::new();

        let trigger = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            trigger.cancel();
        });

        let outcome = solve_with_limits(
            Arc::new(SlowSolver(Duration::from_secs(2))),
            model,
            SolveLimits::with_timeout(Duration::from_secs(10)),
            &cancel,
        )
        .unwrap();
        canceller.join().unwrap();
        assert_eq!(outcome, LimitedSolve::Cancelled);
    }

    #[test]
    fn test_cancelled_before_start() {
        let roster = roster(&["A"]);
        let model = Arc::new(AssignmentModelBuilder::new(&[], &roster).build());
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let outcome = solve_with_limits(
            Arc::new(GoodLpSolver),
            model,
            SolveLimits::with_timeout(Duration::from_secs(1)),
            &cancel,
        )
        .unwrap();
        assert_eq!(outcome, LimitedSolve::Cancelled);
    }

    #[test]
    fn test_crashed_solver_is_an_error() {
        let days = days(&[(2, 4), (2, 5)]);
        let roster = roster(&["A", "B"]);
        let model = Arc::new(AssignmentModelBuilder::new(&days, &roster).build());
        let workers = WorkerGauge::new();

        let err = solve_with_limits_tracked(
            Arc::new(PanickingSolver),
            model,
            SolveLimits::with_timeout(Duration::from_secs(5)),
            &CancellationFlag::new(),
            &workers,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Solver { .. }));
        assert!(wait_for_idle(&workers, Duration::from_secs(2)));
    }

    fn wait_for_idle(workers: &WorkerGauge, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while workers.active() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }

    #[test]
    fn test_abandoned_worker_is_counted_until_it_ends() {
        let days = days(&[(2, 4), (2, 5)]);
        let roster = roster(&["A", "B"]);
        let model = Arc::new(AssignmentModelBuilder::new(&days, &roster).build());
        let workers = WorkerGauge::new();

        let outcome = solve_with_limits_tracked(
            Arc::new(SlowSolver(Duration::from_millis(300))),
            model,
            SolveLimits::with_timeout(Duration::from_millis(20)),
            &CancellationFlag::new(),
            &workers,
        )
        .unwrap();

        assert_eq!(outcome, LimitedSolve::TimedOut);
        assert_eq!(workers.active(), 1);
        assert!(wait_for_idle(&workers, Duration::from_secs(5)));
    }

    #[test]
    fn test_decided_models_start_no_worker() {
        let roster = roster(&["A"]);
        let model = Arc::new(AssignmentModelBuilder::new(&[], &roster).build());
        let workers = WorkerGauge::new();

        let outcome = solve_with_limits_tracked(
            Arc::new(SlowSolver(Duration::from_secs(5))),
            model,
            SolveLimits::with_timeout(Duration::from_secs(1)),
            &CancellationFlag::new(),
            &workers,
        )
        .unwrap();
        assert!(matches!(outcome, LimitedSolve::Finished(SolverVerdict::Feasible(_))));
        assert_eq!(workers.active(), 0);
    }
}
