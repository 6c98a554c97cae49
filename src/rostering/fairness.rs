//! Fairness band calculation.
//!
//! Every member's weighted duty total must land in
//! `[floor(total / members), floor(total / members) + 1]`, unless the member
//! carries an explicit override in the configuration.

use crate::models::{AuditStep, EligibleDay, FairnessBand, Roster};

use super::DutyWeightPolicy;

/// The fairness bands for one month.
#[derive(Debug, Clone)]
pub struct FairnessBandsResult {
    /// The month's total weighted load.
    pub total_weight: u32,
    /// The band computed from the load and the roster size.
    pub computed: FairnessBand,
    /// The band of each member, in roster order.
    pub member_bands: Vec<FairnessBand>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the fairness band of every roster member.
///
/// # Example
///
/// ```
/// use duty_roster::models::{EligibleDay, FairnessBand, Member, Roster};
/// use duty_roster::rostering::calculate_fairness_bands;
/// use chrono::{NaiveDate, Weekday};
///
/// let roster = Roster::new(vec![
///     Member::new("A").with_fairness_override(FairnessBand { min: 1, max: 2 }),
///     Member::new("B"),
/// ]).unwrap();
/// let days: Vec<EligibleDay> = (0..6)
///     .map(|i| EligibleDay {
///         index: i,
///         date: NaiveDate::from_ymd_opt(2025, 6, 3 + i as u32).unwrap(),
///         weekday: Weekday::Tue,
///         weight: 1,
///     })
///     .collect();
///
/// let result = calculate_fairness_bands(&days, &roster, 2);
/// assert_eq!(result.computed, FairnessBand { min: 3, max: 4 });
/// assert_eq!(result.member_bands, vec![FairnessBand { min: 1, max: 2 }, FairnessBand { min: 3, max: 4 }]);
/// ```
pub fn calculate_fairness_bands(
    days: &[EligibleDay],
    roster: &Roster,
    step_number: u32,
) -> FairnessBandsResult {
    let total_weight = DutyWeightPolicy::total_weight(days);
    let computed = FairnessBand::computed(total_weight, roster.len());

    let member_bands: Vec<FairnessBand> = roster
        .members()
        .iter()
        .map(|m| m.band(computed))
        .collect();

    let overrides: Vec<serde_json::Value> = roster
        .members()
        .iter()
        .filter_map(|m| {
            m.fairness_override
                .map(|band| serde_json::json!({ "member": m.name, "min": band.min, "max": band.max }))
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "fairness_band".to_string(),
        rule_name: "Fairness Band".to_string(),
        input: serde_json::json!({
            "total_weight": total_weight,
            "members": roster.len(),
        }),
        output: serde_json::json!({
            "min": computed.min,
            "max": computed.max,
            "overrides": overrides,
        }),
        reasoning: format!(
            "floor({} / {}) = {}, band {} ({} override(s))",
            total_weight,
            roster.len(),
            computed.min,
            computed,
            overrides.len()
        ),
    };

    FairnessBandsResult {
        total_weight,
        computed,
        member_bands,
        audit_step,
    }
}
