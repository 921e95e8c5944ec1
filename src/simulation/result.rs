//! Simulation output structures

use serde::{Deserialize, Serialize};

use crate::catalog::NetworkTier;
use super::claims::{ServiceType, SimulatedClaim};

/// Per-claim ledger row recording how one claim was adjudicated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRow {
    /// Position of the claim in the replay order (0-indexed)
    pub index: usize,

    pub member_id: String,
    pub service_type: ServiceType,
    pub network_tier: NetworkTier,
    pub total_billed: f64,
    pub allowed_amount: f64,

    /// Amount applied to the deductible accumulators
    pub deductible_applied: f64,

    /// Copay charged on this line
    pub copay: f64,

    /// Coinsurance charged on this line
    pub coinsurance: f64,

    /// Member liability after MOOP truncation; what the accumulators absorbed
    pub liability: f64,

    /// True when the stop-loss short-circuit zeroed the claim
    pub stop_loss: bool,

    // Running family accumulators after this claim
    pub family_deductible_after: f64,
    pub family_moop_after: f64,
}

impl ClaimRow {
    pub fn new(index: usize, claim: &SimulatedClaim) -> Self {
        Self {
            index,
            member_id: claim.member_id.clone(),
            service_type: claim.service_type,
            network_tier: claim.network_tier,
            total_billed: claim.total_billed,
            allowed_amount: claim.allowed_amount,
            deductible_applied: 0.0,
            copay: 0.0,
            coinsurance: 0.0,
            liability: 0.0,
            stop_loss: false,
            family_deductible_after: 0.0,
            family_moop_after: 0.0,
        }
    }
}

/// Final result record for one annual simulation. Immutable once produced;
/// serializable so hosts can hand a JSON projection to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Gross annual premium before subsidy
    pub gross_premium_annual: f64,

    /// Net annual premium after subsidy
    pub net_premium_annual: f64,

    /// Monthly subsidy applied
    pub monthly_subsidy: f64,

    pub total_deductible_paid: f64,
    pub total_copay_paid: f64,
    pub total_coinsurance_paid: f64,

    /// Total member out-of-pocket for the year
    pub total_oop_paid: f64,

    /// Net annual premium plus out-of-pocket
    pub grand_total_cost: f64,
}

/// Complete output of one simulation run: the result record plus the
/// per-claim ledger (empty unless detailed output was requested)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    pub rows: Vec<ClaimRow>,
    pub result: SimulationResult,
}
