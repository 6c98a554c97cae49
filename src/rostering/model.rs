//! The assignment model.
//!
//! An [`AssignmentModel`] is a pure feasibility problem over boolean
//! decision variables: one per (eligible day, member) pair that is not ruled
//! out by a forbidden weekday. Every constraint is linear with non-negative
//! integer coefficients and an inclusive integer range. There is no
//! objective.

use serde::Serialize;

/// Identifies a decision variable within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VarId(pub usize);

/// A boolean decision: true iff `member` is on duty on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentVariable {
    /// The variable id.
    pub id: VarId,
    /// Index of the eligible day.
    pub day: usize,
    /// Roster position of the member.
    pub member: usize,
}

/// The rule a constraint was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    /// Exactly one member per eligible day.
    ExactlyOnePerDay,
    /// A member's weighted total lies within its fairness band.
    FairnessBand,
    /// A member is not on duty on two consecutive eligible days.
    NoImmediateRepeat,
    /// A member is not on duty twice within the minimum spacing.
    MinimumSpacing,
}

/// `lower <= sum(coefficient * variable) <= upper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinearConstraint {
    /// The rule this constraint encodes.
    pub family: ConstraintFamily,
    /// Variables with their coefficients.
    pub terms: Vec<(VarId, u32)>,
    /// Inclusive lower bound.
    pub lower: u32,
    /// Inclusive upper bound.
    pub upper: u32,
}

impl LinearConstraint {
    /// Evaluates the left-hand side under `witness`.
    pub fn evaluate(&self, witness: &Witness) -> u32 {
        self.terms
            .iter()
            .filter(|(var, _)| witness.is_set(*var))
            .map(|(_, coefficient)| *coefficient)
            .sum()
    }

    /// Returns true if `witness` satisfies the constraint.
    pub fn is_satisfied_by(&self, witness: &Witness) -> bool {
        let value = self.evaluate(witness);
        value >= self.lower && value <= self.upper
    }

    /// Returns true if no assignment at all can satisfy the constraint.
    ///
    /// Only detects the cases that need no search: the bounds are inverted,
    /// or even setting every variable cannot reach `lower`.
    pub fn is_trivially_unsatisfiable(&self) -> bool {
        let reachable: u32 = self.terms.iter().map(|(_, c)| *c).sum();
        self.lower > self.upper || reachable < self.lower
    }
}

/// A truth value for every variable of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Witness {
    values: Vec<bool>,
}

impl Witness {
    /// Wraps the values, indexed by [`VarId`].
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Returns the value of `var`; unknown ids read as false.
    pub fn is_set(&self, var: VarId) -> bool {
        self.values.get(var.0).copied().unwrap_or(false)
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the witness holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Decision variables and constraints for one month.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentModel {
    pub(super) day_count: usize,
    pub(super) member_count: usize,
    pub(super) variables: Vec<AssignmentVariable>,
    pub(super) lookup: Vec<Option<VarId>>,
    pub(super) constraints: Vec<LinearConstraint>,
    pub(super) excluded_pairs: usize,
}

impl AssignmentModel {
    /// Number of eligible days.
    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Number of roster members.
    pub fn member_count(&self) -> usize {
        self.member_count
    }

    /// All decision variables, ordered by day then member.
    pub fn variables(&self) -> &[AssignmentVariable] {
        &self.variables
    }

    /// All constraints.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Number of (day, member) pairs left without a variable because the
    /// member is forbidden on that weekday.
    pub fn excluded_pairs(&self) -> usize {
        self.excluded_pairs
    }

    /// Returns the variable for (`day`, `member`), or `None` if the pair is excluded.
    pub fn var(&self, day: usize, member: usize) -> Option<VarId> {
        if day >= self.day_count || member >= self.member_count {
            return None;
        }
        self.lookup[day * self.member_count + member]
    }

    /// Returns the variable with the given id.
    pub fn variable(&self, id: VarId) -> Option<&AssignmentVariable> {
        self.variables.get(id.0)
    }

    /// Counts the constraints generated from `family`.
    pub fn count_family(&self, family: ConstraintFamily) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.family == family)
            .count()
    }

    /// Returns true if `witness` covers every variable and satisfies every constraint.
    pub fn is_satisfied_by(&self, witness: &Witness) -> bool {
        witness.len() == self.variables.len()
            && self.constraints.iter().all(|c| c.is_satisfied_by(witness))
    }

    /// Returns the first constraint no assignment can satisfy, if any.
    pub fn trivially_unsatisfiable(&self) -> Option<&LinearConstraint> {
        self.constraints
            .iter()
            .find(|c| c.is_trivially_unsatisfiable())
    }
}
