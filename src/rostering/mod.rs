//! Duty rostering.
//!
//! This module turns a month and a roster into a duty schedule:
//!
//! - [`eligible_days`](calculate_eligible_days): Tuesday to Friday, minus public holidays
//! - [`DutyWeightPolicy`]: the heavy weekday counts double
//! - [`calculate_fairness_bands`]: each member's acceptable weighted total
//! - [`AssignmentModelBuilder`]: the 0/1 feasibility model
//! - [`FeasibilitySolver`]: the solver seam, with [`GoodLpSolver`] as default
//! - [`extract_schedule`] and [`verify_schedule`]: witness to checked schedule
//! - [`RosterEngine`]: the whole pipeline for one month

mod duty_weight;
mod eligible_days;
mod engine;
mod extraction;
mod fairness;
mod model;
mod model_builder;
mod solver;
mod verification;

pub use duty_weight::{DutyWeightPolicy, HEAVY_DUTY_WEIGHT, STANDARD_DUTY_WEIGHT};
pub use eligible_days::{
    EXCLUDED_WEEKDAYS, EligibleDaysResult, calculate_eligible_days, eligible_dates,
    is_duty_weekday,
};
pub use engine::{MAX_YEAR, RosterEngine, parse_period, validate_period};
pub use extraction::{ExtractionResult, extract_schedule};
pub use fairness::{FairnessBandsResult, calculate_fairness_bands};
pub use model::{
    AssignmentModel, AssignmentVariable, ConstraintFamily, LinearConstraint, VarId, Witness,
};
pub use model_builder::{AssignmentModelBuilder, DEFAULT_MIN_SPACING, ModelBuildResult};
pub use solver::{
    CancellationFlag, FeasibilitySolver, GoodLpSolver, LimitedSolve, SolveLimits, SolverVerdict,
    WorkerGauge, decide_without_search, solve_with_limits, solve_with_limits_tracked,
};
pub use verification::{Violation, verify_schedule};
