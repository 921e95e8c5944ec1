//! Accumulator state tracking for a single simulation run

use std::collections::HashMap;

use crate::catalog::{AccumulatorKind, NetworkCostStructure};
use crate::household::HouseholdMember;

/// Effective accumulator limits derived from one network cost structure.
///
/// Embedded limits give each member their own cap with the family cap at
/// twice the individual amount. Aggregate limits have no separate per-member
/// cap, modeled by setting the individual limit equal to the family limit.
#[derive(Debug, Clone, Copy)]
pub struct AccumulatorLimits {
    pub individual_deductible: f64,
    pub family_deductible: f64,
    pub individual_moop: f64,
    pub family_moop: f64,
    pub deductible_kind: AccumulatorKind,
    pub moop_kind: AccumulatorKind,
}

impl AccumulatorLimits {
    pub fn from_structure(costs: &NetworkCostStructure) -> Self {
        let (individual_deductible, family_deductible) = match costs.deductible_kind {
            AccumulatorKind::Embedded => (costs.deductible, costs.deductible * 2.0),
            AccumulatorKind::Aggregate => (costs.deductible, costs.deductible),
        };
        let (individual_moop, family_moop) = match costs.moop_kind {
            AccumulatorKind::Embedded => (costs.moop, costs.moop * 2.0),
            AccumulatorKind::Aggregate => (costs.moop, costs.moop),
        };

        Self {
            individual_deductible,
            family_deductible,
            individual_moop,
            family_moop,
            deductible_kind: costs.deductible_kind,
            moop_kind: costs.moop_kind,
        }
    }
}

/// Running accumulator totals for one simulation run. Created zeroed at the
/// start of a run, mutated claim by claim, discarded with the run.
#[derive(Debug, Clone)]
pub struct AccumulatorState {
    individual_deductible: HashMap<String, f64>,
    individual_moop: HashMap<String, f64>,
    pub family_deductible: f64,
    pub family_moop: f64,
}

impl AccumulatorState {
    /// Zeroed state covering every household member
    pub fn new(members: &[HouseholdMember]) -> Self {
        let individual_deductible = members.iter().map(|m| (m.id.clone(), 0.0)).collect();
        let individual_moop = members.iter().map(|m| (m.id.clone(), 0.0)).collect();
        Self {
            individual_deductible,
            individual_moop,
            family_deductible: 0.0,
            family_moop: 0.0,
        }
    }

    pub fn knows_member(&self, member_id: &str) -> bool {
        self.individual_deductible.contains_key(member_id)
    }

    pub fn individual_deductible(&self, member_id: &str) -> f64 {
        self.individual_deductible.get(member_id).copied().unwrap_or(0.0)
    }

    pub fn individual_moop(&self, member_id: &str) -> f64 {
        self.individual_moop.get(member_id).copied().unwrap_or(0.0)
    }

    /// Deductible phase ends once either the member's own deductible or the
    /// family deductible is satisfied
    pub fn deductible_met(&self, member_id: &str, limits: &AccumulatorLimits) -> bool {
        self.individual_deductible(member_id) >= limits.individual_deductible
            || self.family_deductible >= limits.family_deductible
    }

    /// Remaining room (individual, family) in the deductible accumulators
    pub fn deductible_room(&self, member_id: &str, limits: &AccumulatorLimits) -> (f64, f64) {
        (
            (limits.individual_deductible - self.individual_deductible(member_id)).max(0.0),
            (limits.family_deductible - self.family_deductible).max(0.0),
        )
    }

    /// Remaining room (individual, family) in the MOOP accumulators
    pub fn moop_room(&self, member_id: &str, limits: &AccumulatorLimits) -> (f64, f64) {
        (
            (limits.individual_moop - self.individual_moop(member_id)).max(0.0),
            (limits.family_moop - self.family_moop).max(0.0),
        )
    }

    /// True when the plan pays 100% of this member's claims: the family cap
    /// is exhausted, or (embedded MOOP only) the member's own cap is
    pub fn stop_loss_reached(&self, member_id: &str, limits: &AccumulatorLimits) -> bool {
        if self.family_moop >= limits.family_moop {
            return true;
        }
        limits.moop_kind == AccumulatorKind::Embedded
            && self.individual_moop(member_id) >= limits.individual_moop
    }

    /// Credit an amount to both the individual and family deductible
    pub fn credit_deductible(&mut self, member_id: &str, amount: f64) {
        if let Some(total) = self.individual_deductible.get_mut(member_id) {
            *total += amount;
        }
        self.family_deductible += amount;
    }

    /// Credit an amount to both the individual and family MOOP
    pub fn credit_moop(&mut self, member_id: &str, amount: f64) {
        if let Some(total) = self.individual_moop.get_mut(member_id) {
            *total += amount;
        }
        self.family_moop += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NetworkTier;
    use crate::household::sample_household;

    fn structure(kind: AccumulatorKind, deductible: f64, moop: f64) -> NetworkCostStructure {
        NetworkCostStructure {
            tier: NetworkTier::Preferred,
            network_id: "NET-TEST".to_string(),
            deductible,
            deductible_kind: kind,
            moop,
            moop_kind: kind,
            drug_deductible_integrated: true,
            separate_drug_deductible: None,
            default_coinsurance: 20.0,
        }
    }

    #[test]
    fn test_embedded_family_limits_double() {
        let limits =
            AccumulatorLimits::from_structure(&structure(AccumulatorKind::Embedded, 750.0, 3_000.0));
        assert_eq!(limits.individual_deductible, 750.0);
        assert_eq!(limits.family_deductible, 1_500.0);
        assert_eq!(limits.family_moop, 6_000.0);
    }

    #[test]
    fn test_aggregate_individual_cap_collapses_onto_family() {
        let limits = AccumulatorLimits::from_structure(&structure(
            AccumulatorKind::Aggregate,
            3_000.0,
            8_000.0,
        ));
        assert_eq!(limits.individual_deductible, limits.family_deductible);
        assert_eq!(limits.individual_moop, limits.family_moop);
    }

    #[test]
    fn test_stop_loss_embedded_protects_individual() {
        let household = sample_household();
        let limits =
            AccumulatorLimits::from_structure(&structure(AccumulatorKind::Embedded, 0.0, 1_000.0));
        let mut state = AccumulatorState::new(&household.members);

        state.credit_moop("MEM-001", 1_000.0);
        assert!(state.stop_loss_reached("MEM-001", &limits));
        // Family cap (2000) not yet reached, other members still pay
        assert!(!state.stop_loss_reached("MEM-002", &limits));
    }

    #[test]
    fn test_stop_loss_aggregate_waits_for_family_total() {
        let household = sample_household();
        let limits =
            AccumulatorLimits::from_structure(&structure(AccumulatorKind::Aggregate, 0.0, 2_000.0));
        let mut state = AccumulatorState::new(&household.members);

        // One member at what would be an embedded cap: no protection yet
        state.credit_moop("MEM-001", 1_000.0);
        assert!(!state.stop_loss_reached("MEM-001", &limits));

        state.credit_moop("MEM-002", 1_000.0);
        assert!(state.stop_loss_reached("MEM-001", &limits));
        assert!(state.stop_loss_reached("MEM-003", &limits));
    }

    #[test]
    fn test_deductible_met_via_family_total() {
        let household = sample_household();
        let limits =
            AccumulatorLimits::from_structure(&structure(AccumulatorKind::Embedded, 750.0, 5_000.0));
        let mut state = AccumulatorState::new(&household.members);

        state.credit_deductible("MEM-001", 750.0);
        state.credit_deductible("MEM-002", 750.0);

        // Family deductible (1500) satisfied: untouched members skip it too
        assert!(state.deductible_met("MEM-003", &limits));
        assert_eq!(state.individual_deductible("MEM-003"), 0.0);
    }
}
