//! Member and roster models.
//!
//! This module defines the [`Member`] struct, the validated [`Roster`] of
//! members taking part in a solve, and the [`FairnessBand`] bounding each
//! member's weighted duty load.

use std::collections::HashSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Inclusive range of acceptable weighted duty totals for one member.
///
/// # Example
///
/// ```
/// use duty_roster::models::FairnessBand;
///
/// // 11 weighted duty units shared by 4 members
/// let band = FairnessBand::computed(11, 4);
/// assert_eq!(band, FairnessBand { min: 2, max: 3 });
/// assert!(band.contains(3));
/// assert!(!band.contains(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FairnessBand {
    /// The smallest acceptable weighted total.
    pub min: u32,
    /// The largest acceptable weighted total.
    pub max: u32,
}

impl FairnessBand {
    /// Computes the default band `[floor(total / members), floor(total / members) + 1]`.
    ///
    /// A roster with zero members yields `[0, 1]`; [`Roster`] never has
    /// zero members, so the case only matters for direct callers.
    pub fn computed(total_weight: u32, member_count: usize) -> Self {
        let members = u32::try_from(member_count).unwrap_or(u32::MAX).max(1);
        let min = total_weight / members;
        Self { min, max: min + 1 }
    }

    /// Returns true if `weighted_total` lies within the band (inclusive).
    pub fn contains(&self, weighted_total: u32) -> bool {
        weighted_total >= self.min && weighted_total <= self.max
    }
}

impl std::fmt::Display for FairnessBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A staff member who can be put on duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique name identifying the member.
    pub name: String,
    /// Position in the roster, used for iteration and display order.
    pub position: usize,
    /// Weekdays on which this member can never be on duty.
    #[serde(default)]
    pub forbidden_weekdays: Vec<Weekday>,
    /// Explicit fairness band replacing the computed one for this member.
    #[serde(default)]
    pub fairness_override: Option<FairnessBand>,
}

impl Member {
    /// Creates a member without restrictions. The position is assigned by [`Roster::new`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            forbidden_weekdays: Vec::new(),
            fairness_override: None,
        }
    }

    /// Adds forbidden weekdays to the member.
    pub fn with_forbidden(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        for weekday in weekdays {
            if !self.forbidden_weekdays.contains(&weekday) {
                self.forbidden_weekdays.push(weekday);
            }
        }
        self
    }

    /// Sets an explicit fairness band for the member.
    pub fn with_fairness_override(mut self, band: FairnessBand) -> Self {
        self.fairness_override = Some(band);
        self
    }

    /// Returns true if the member may not be assigned on `weekday`.
    ///
    /// # Example
    ///
    /// ```
    /// use duty_roster::models::Member;
    /// use chrono::Weekday;
    ///
    /// let member = Member::new("Tanifuji").with_forbidden([Weekday::Thu, Weekday::Fri]);
    /// assert!(member.is_forbidden_on(Weekday::Fri));
    /// assert!(!member.is_forbidden_on(Weekday::Tue));
    /// ```
    pub fn is_forbidden_on(&self, weekday: Weekday) -> bool {
        self.forbidden_weekdays.contains(&weekday)
    }

    /// Returns the band that applies to this member given the computed default.
    pub fn band(&self, computed: FairnessBand) -> FairnessBand {
        self.fairness_override.unwrap_or(computed)
    }
}

/// The ordered, validated list of members taking part in a solve.
///
/// Positions are reassigned to match the list order, so `members()[i].position == i`.
///
/// # Example
///
/// ```
/// use duty_roster::models::{Member, Roster};
///
/// let roster = Roster::new(vec![Member::new("A"), Member::new("B")]).unwrap();
/// assert_eq!(roster.len(), 2);
/// assert_eq!(roster.members()[1].position, 1);
///
/// assert!(Roster::new(vec![Member::new("A"), Member::new("A")]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Validates and builds a roster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the list is empty, a name
    /// is blank or repeated, or a fairness override has `min > max`.
    pub fn new(members: Vec<Member>) -> EngineResult<Self> {
        if members.is_empty() {
            return Err(EngineError::invalid_config("the roster has no members"));
        }

        let mut seen = HashSet::new();
        let mut members = members;
        for (position, member) in members.iter_mut().enumerate() {
            let name = member.name.trim().to_string();
            if name.is_empty() {
                return Err(EngineError::invalid_config(format!(
                    "member at position {} has an empty name",
                    position
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(EngineError::invalid_config(format!(
                    "duplicate member '{}'",
                    name
                )));
            }
            if let Some(band) = member.fairness_override.filter(|b| b.min > b.max) {
                return Err(EngineError::invalid_config(format!(
                    "fairness override for '{}' has min {} above max {}",
                    name, band.min, band.max
                )));
            }
            member.name = name;
            member.position = position;
        }

        Ok(Self { members })
    }

    /// Returns the members in roster order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a validated roster; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Looks up a member by name.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_band_floors_total() {
        assert_eq!(FairnessBand::computed(5, 3), FairnessBand { min: 1, max: 2 });
        assert_eq!(FairnessBand::computed(20, 11), FairnessBand { min: 1, max: 2 });
        assert_eq!(FairnessBand::computed(22, 11), FairnessBand { min: 2, max: 3 });
    }

    #[test]
    fn test_computed_band_with_zero_total() {
        assert_eq!(FairnessBand::computed(0, 4), FairnessBand { min: 0, max: 1 });
    }

    #[test]
    fn test_band_contains_is_inclusive() {
        let band = FairnessBand { min: 1, max: 2 };
        assert!(!band.contains(0));
        assert!(band.contains(1));
        assert!(band.contains(2));
        assert!(!band.contains(3));
    }

    #[test]
    fn test_band_display() {
        assert_eq!(FairnessBand { min: 1, max: 2 }.to_string(), "[1, 2]");
    }

    #[test]
    fn test_member_override_replaces_computed_band() {
        let computed = FairnessBand { min: 3, max: 4 };
        let member = Member::new("Abe").with_fairness_override(FairnessBand { min: 1, max: 2 });
        assert_eq!(member.band(computed), FairnessBand { min: 1, max: 2 });
        assert_eq!(Member::new("Kato").band(computed), computed);
    }

    #[test]
    fn test_with_forbidden_deduplicates() {
        let member = Member::new("Abe").with_forbidden([Weekday::Tue, Weekday::Tue]);
        assert_eq!(member.forbidden_weekdays, vec![Weekday::Tue]);
    }

    #[test]
    fn test_roster_assigns_positions() {
        let roster = Roster::new(vec![
            Member::new("Abe"),
            Member::new("Tanaka"),
            Member::new("Kato"),
        ])
        .unwrap();

        let positions: Vec<usize> = roster.members().iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(roster.get("Kato").unwrap().position, 2);
        assert!(roster.get("Nobody").is_none());
    }

    #[test]
    fn test_empty_roster_rejected() {
        let result = Roster::new(vec![]);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Roster::new(vec![Member::new("  ")]);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_inverted_override_rejected() {
        let member = Member::new("Abe").with_fairness_override(FairnessBand { min: 3, max: 1 });
        let result = Roster::new(vec![member]);
        match result {
            Err(EngineError::InvalidConfig { message }) => {
                assert!(message.contains("Abe"));
            }
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_deserialize_member_with_weekday_names() {
        let json = r#"{
            "name": "Tokimura",
            "position": 4,
            "forbidden_weekdays": ["Wednesday", "thu"]
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.forbidden_weekdays, vec![Weekday::Wed, Weekday::Thu]);
        assert!(member.fairness_override.is_none());
    }
}
