//! Assignment model construction.
//!
//! Encodes a month as decision variables plus five constraint families:
//!
//! 1. exactly one member per eligible day
//! 2. each member's weighted total within its fairness band
//! 3. no member on two consecutive eligible days
//! 4. no member on a forbidden weekday (the pair gets no variable at all)
//! 5. no member twice within `min_spacing - 1` eligible-day slots

use crate::models::{AuditStep, EligibleDay, FairnessBand, Roster};

use super::DutyWeightPolicy;
use super::model::{
    AssignmentModel, AssignmentVariable, ConstraintFamily, LinearConstraint, VarId,
};

/// Minimum distance, in eligible-day slots, between two duties of one member.
pub const DEFAULT_MIN_SPACING: usize = 5;

/// Builds an [`AssignmentModel`] from eligible days and a roster.
///
/// # Example
///
/// ```
/// use duty_roster::models::{EligibleDay, Member, Roster};
/// use duty_roster::rostering::{AssignmentModelBuilder, ConstraintFamily};
/// use chrono::{NaiveDate, Weekday};
///
/// let roster = Roster::new(vec![
///     Member::new("A"),
///     Member::new("B").with_forbidden([Weekday::Wed]),
/// ]).unwrap();
/// let days = vec![
///     EligibleDay { index: 0, date: NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(), weekday: Weekday::Tue, weight: 1 },
///     EligibleDay { index: 1, date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(), weekday: Weekday::Wed, weight: 2 },
/// ];
///
/// let model = AssignmentModelBuilder::new(&days, &roster).build();
/// assert_eq!(model.variables().len(), 3);
/// assert!(model.var(1, 1).is_none());
/// assert_eq!(model.count_family(ConstraintFamily::ExactlyOnePerDay), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentModelBuilder<'a> {
    days: &'a [EligibleDay],
    roster: &'a Roster,
    member_bands: Option<Vec<FairnessBand>>,
    min_spacing: usize,
}

impl<'a> AssignmentModelBuilder<'a> {
    /// Creates a builder using computed bands (with member overrides) and
    /// the default spacing.
    pub fn new(days: &'a [EligibleDay], roster: &'a Roster) -> Self {
        Self {
            days,
            roster,
            member_bands: None,
            min_spacing: DEFAULT_MIN_SPACING,
        }
    }

    /// Uses precomputed bands, one per roster member in roster order.
    ///
    /// Members beyond the end of `bands` fall back to their default band.
    pub fn with_member_bands(mut self, bands: Vec<FairnessBand>) -> Self {
        self.member_bands = Some(bands);
        self
    }

    /// Sets the minimum spacing between two duties of one member.
    ///
    /// A spacing of `n` forbids the same member at index distances `1..n`.
    /// Values below 1 are treated as 1 (no spacing rule).
    pub fn with_min_spacing(mut self, min_spacing: usize) -> Self {
        self.min_spacing = min_spacing.max(1);
        self
    }

    fn band_for(&self, position: usize, computed: FairnessBand) -> FairnessBand {
        self.member_bands
            .as_ref()
            .and_then(|bands| bands.get(position).copied())
            .unwrap_or_else(|| self.roster.members()[position].band(computed))
    }

    /// Builds the model.
    pub fn build(&self) -> AssignmentModel {
        let day_count = self.days.len();
        let member_count = self.roster.len();

        let mut variables = Vec::with_capacity(day_count * member_count);
        let mut lookup = vec![None; day_count * member_count];
        let mut excluded_pairs = 0;

        for (day_index, day) in self.days.iter().enumerate() {
            for (position, member) in self.roster.members().iter().enumerate() {
                if member.is_forbidden_on(day.weekday) {
                    excluded_pairs += 1;
                    continue;
                }
                let id = VarId(variables.len());
                variables.push(AssignmentVariable {
                    id,
                    day: day_index,
                    member: position,
                });
                lookup[day_index * member_count + position] = Some(id);
            }
        }

        let mut model = AssignmentModel {
            day_count,
            member_count,
            variables,
            lookup,
            constraints: Vec::new(),
            excluded_pairs,
        };

        let constraints = self.constraints(&model);
        model.constraints = constraints;
        model
    }

    fn constraints(&self, model: &AssignmentModel) -> Vec<LinearConstraint> {
        let day_count = model.day_count;
        let member_count = model.member_count;
        let mut constraints = Vec::new();

        for day in 0..day_count {
            constraints.push(LinearConstraint {
                family: ConstraintFamily::ExactlyOnePerDay,
                terms: (0..member_count)
                    .filter_map(|member| model.var(day, member))
                    .map(|var| (var, 1))
                    .collect(),
                lower: 1,
                upper: 1,
            });
        }

        let computed = FairnessBand::computed(
            DutyWeightPolicy::total_weight(self.days),
            member_count,
        );
        for member in 0..member_count {
            let band = self.band_for(member, computed);
            constraints.push(LinearConstraint {
                family: ConstraintFamily::FairnessBand,
                terms: self
                    .days
                    .iter()
                    .enumerate()
                    .filter_map(|(day, d)| model.var(day, member).map(|var| (var, d.weight)))
                    .collect(),
                lower: band.min,
                upper: band.max,
            });
        }

        for day in 1..day_count {
            for member in 0..member_count {
                constraints.extend(at_most_one(
                    model,
                    ConstraintFamily::NoImmediateRepeat,
                    member,
                    (day - 1, day),
                ));
            }
        }

        // Covers every pair closer than min_spacing, so offset 1 repeats the
        // NoImmediateRepeat pairs.
        for member in 0..member_count {
            for day in 0..day_count {
                for offset in 1..self.min_spacing {
                    let later = day + offset;
                    if later >= day_count {
                        break;
                    }
                    constraints.extend(at_most_one(
                        model,
                        ConstraintFamily::MinimumSpacing,
                        member,
                        (day, later),
                    ));
                }
            }
        }

        constraints
    }

    /// Builds the model and an audit step describing its size.
    pub fn build_with_audit(&self, step_number: u32) -> ModelBuildResult {
        let model = self.build();
        let families = [
            ConstraintFamily::ExactlyOnePerDay,
            ConstraintFamily::FairnessBand,
            ConstraintFamily::NoImmediateRepeat,
            ConstraintFamily::MinimumSpacing,
        ];
        let counts: serde_json::Map<String, serde_json::Value> = families
            .iter()
            .map(|f| {
                (
                    serde_json::to_value(f)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_default(),
                    serde_json::Value::from(model.count_family(*f)),
                )
            })
            .collect();

        let audit_step = AuditStep {
            step_number,
            rule_id: "assignment_model".to_string(),
            rule_name: "Assignment Model".to_string(),
            input: serde_json::json!({
                "days": model.day_count(),
                "members": model.member_count(),
                "min_spacing": self.min_spacing,
            }),
            output: serde_json::json!({
                "variables": model.variables().len(),
                "excluded_pairs": model.excluded_pairs(),
                "constraints": model.constraints().len(),
                "constraints_by_family": counts,
            }),
            reasoning: format!(
                "{} variables ({} pairs excluded by forbidden weekdays), {} constraints",
                model.variables().len(),
                model.excluded_pairs(),
                model.constraints().len()
            ),
        };

        ModelBuildResult { model, audit_step }
    }
}

/// A built model and the audit step describing it.
#[derive(Debug, Clone)]
pub struct ModelBuildResult {
    /// The model.
    pub model: AssignmentModel,
    /// The audit step recording the model size.
    pub audit_step: AuditStep,
}

/// `x(first) + x(second) <= 1`, or `None` if either pair is excluded.
fn at_most_one(
    model: &AssignmentModel,
    family: ConstraintFamily,
    member: usize,
    (first, second): (usize, usize),
) -> Option<LinearConstraint> {
    let a = model.var(first, member)?;
    let b = model.var(second, member)?;
    Some(LinearConstraint {
        family,
        terms: vec![(a, 1), (b, 1)],
        lower: 0,
        upper: 1,
    })
}
