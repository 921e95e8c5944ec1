//! Annual claims simulation engine
//!
//! Replays an ordered claim list against a resolved plan variant, tracking
//! per-member and family deductible/MOOP accumulators, then combines the
//! accumulated liability with the subsidized premium into a result record.
//!
//! Per-claim adjudication order is fixed by regulation and must not be
//! rearranged: stop-loss short-circuit, deductible phase, cost-sharing phase,
//! MOOP truncation. Claim order matters once an accumulator is exhausted;
//! that is real adjudication behavior, not nondeterminism.

use log::debug;

use crate::catalog::{
    CostSharing, InsuranceProduct, NetworkCostStructure, NetworkTier, PlanVariant,
};
use crate::error::EngineError;
use crate::household::TaxHousehold;
use crate::subsidy::monthly_subsidy;

use super::claims::SimulatedClaim;
use super::evaluator::line_liability;
use super::result::{ClaimRow, SimulationResult, SimulationRun};
use super::state::{AccumulatorLimits, AccumulatorState};

/// Which network tier claims are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierRouting {
    /// Every claim is evaluated against the preferred tier's cost structure,
    /// matching observed catalog seed data
    #[default]
    PreferredOnly,

    /// Each claim's cost sharing is evaluated against its own tier's
    /// structure; accumulation stays on the preferred (in-network) limits
    PerClaim,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    pub tier_routing: TierRouting,

    /// Whether to keep the per-claim ledger in the output
    pub detailed_output: bool,
}

/// Main simulation engine
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulate a year of claims for one household on one resolved variant.
    ///
    /// Premium figures derive from the product's externally supplied base
    /// monthly premium. Malformed claims are rejected before any folding
    /// happens; a missing preferred-tier cost structure aborts the run as a
    /// configuration error.
    pub fn simulate(
        &self,
        product: &InsuranceProduct,
        variant: &PlanVariant,
        household: &TaxHousehold,
        claims: &[SimulatedClaim],
    ) -> Result<SimulationRun, EngineError> {
        household.validate()?;
        validate_claims(household, claims)?;

        // The preferred tier anchors accumulation even under per-claim routing
        let preferred = variant.network(NetworkTier::Preferred).ok_or_else(|| {
            EngineError::MissingNetworkTier {
                variant_id: variant.plan_id.clone(),
                tier: NetworkTier::Preferred,
            }
        })?;
        let limits = AccumulatorLimits::from_structure(preferred);

        let mut state = AccumulatorState::new(&household.members);
        let mut rows = Vec::new();
        let mut total_deductible = 0.0;
        let mut total_copay = 0.0;
        let mut total_coinsurance = 0.0;
        let mut total_oop = 0.0;

        for (index, claim) in claims.iter().enumerate() {
            let costs = match self.config.tier_routing {
                TierRouting::PreferredOnly => preferred,
                TierRouting::PerClaim => variant.network(claim.network_tier).ok_or_else(|| {
                    EngineError::MissingNetworkTier {
                        variant_id: variant.plan_id.clone(),
                        tier: claim.network_tier,
                    }
                })?,
            };

            let row = apply_claim(index, claim, variant, costs, &limits, &mut state);

            total_deductible += row.deductible_applied;
            total_copay += row.copay;
            total_coinsurance += row.coinsurance;
            total_oop += row.liability;

            debug!(
                "claim {index}: member={} allowed={:.2} liability={:.2} family_moop={:.2}",
                claim.member_id, claim.allowed_amount, row.liability, state.family_moop
            );

            if self.config.detailed_output {
                rows.push(row);
            }
        }

        let subsidy = monthly_subsidy(household);
        let net_monthly_premium = (product.base_monthly_premium - subsidy).max(0.0);
        let gross_premium_annual = product.base_monthly_premium * 12.0;
        let net_premium_annual = net_monthly_premium * 12.0;

        let result = SimulationResult {
            gross_premium_annual,
            net_premium_annual,
            monthly_subsidy: subsidy,
            total_deductible_paid: total_deductible,
            total_copay_paid: total_copay,
            total_coinsurance_paid: total_coinsurance,
            total_oop_paid: total_oop,
            grand_total_cost: net_premium_annual + total_oop,
        };

        Ok(SimulationRun { rows, result })
    }
}

/// Reject malformed claims before any accumulator is touched
fn validate_claims(
    household: &TaxHousehold,
    claims: &[SimulatedClaim],
) -> Result<(), EngineError> {
    for (index, claim) in claims.iter().enumerate() {
        if household.member(&claim.member_id).is_none() {
            return Err(EngineError::UnknownMember {
                index,
                member_id: claim.member_id.clone(),
            });
        }
        if claim.total_billed < 0.0 {
            return Err(EngineError::NegativeClaimAmount {
                index,
                field: "billed",
                amount: claim.total_billed,
            });
        }
        if claim.allowed_amount < 0.0 {
            return Err(EngineError::NegativeClaimAmount {
                index,
                field: "allowed",
                amount: claim.allowed_amount,
            });
        }
    }
    Ok(())
}

/// Adjudicate a single claim against the accumulator state
fn apply_claim(
    index: usize,
    claim: &SimulatedClaim,
    variant: &PlanVariant,
    costs: &NetworkCostStructure,
    limits: &AccumulatorLimits,
    state: &mut AccumulatorState,
) -> ClaimRow {
    let mut row = ClaimRow::new(index, claim);
    let member_id = claim.member_id.as_str();

    // Phase 1: stop-loss short-circuit. Plan pays 100% once the family cap,
    // or (embedded MOOP) the member's own cap, is exhausted.
    if state.stop_loss_reached(member_id, limits) {
        row.stop_loss = true;
        row.family_deductible_after = state.family_deductible;
        row.family_moop_after = state.family_moop;
        return row;
    }

    let rule = variant
        .benefit(claim.service_type.benefit_type())
        .and_then(|b| b.rule(costs.tier))
        .copied();

    let mut remaining = claim.allowed_amount;
    let mut deductible_portion = 0.0;
    let mut copay_portion = 0.0;
    let mut coinsurance_portion = 0.0;

    // A filed rule not subject to the deductible charges its cost share
    // immediately and leaves the deductible accumulators untouched
    let pre_deductible_rule = rule
        .filter(|r| !r.subject_to_deductible && r.sharing != CostSharing::NotApplicable);

    if let Some(rule) = pre_deductible_rule {
        let charge = line_liability(rule.sharing, costs.default_coinsurance, remaining);
        match rule.sharing {
            CostSharing::Copay { .. } => copay_portion = charge,
            _ => coinsurance_portion = charge,
        }
    } else {
        // Phase 2: deductible. Applies while neither the member's nor the
        // family deductible is satisfied; credit is bounded by the smallest
        // of individual room, family room, and the allowed amount.
        if !state.deductible_met(member_id, limits) {
            let (individual_room, family_room) = state.deductible_room(member_id, limits);
            let applied = remaining.min(individual_room).min(family_room);
            if applied > 0.0 {
                state.credit_deductible(member_id, applied);
                deductible_portion = applied;
                remaining -= applied;
            }
        }

        // Phase 3: cost sharing on whatever the deductible did not absorb
        if remaining > 0.0 {
            let sharing = rule.map(|r| r.sharing).unwrap_or(CostSharing::NotApplicable);
            let charge = line_liability(sharing, costs.default_coinsurance, remaining);
            match sharing {
                CostSharing::Copay { .. } => copay_portion = charge,
                _ => coinsurance_portion = charge,
            }
        }
    }

    // Phase 4: MOOP truncation. The capped amount, not the uncapped one, is
    // what accumulates and what the member owes.
    let uncapped = deductible_portion + copay_portion + coinsurance_portion;
    let counts_toward_moop = rule.map(|r| r.counts_toward_moop).unwrap_or(true);

    let liability = if counts_toward_moop {
        let (individual_room, family_room) = state.moop_room(member_id, limits);
        let capped = uncapped.min(individual_room).min(family_room);

        // Attribute any truncation to cost sharing before deductible so the
        // reported components always sum to the capped liability
        let mut reduction = uncapped - capped;
        let coinsurance_cut = reduction.min(coinsurance_portion);
        coinsurance_portion -= coinsurance_cut;
        reduction -= coinsurance_cut;
        let copay_cut = reduction.min(copay_portion);
        copay_portion -= copay_cut;
        reduction -= copay_cut;
        deductible_portion -= reduction.min(deductible_portion);

        state.credit_moop(member_id, capped);
        capped
    } else {
        // Charged, but neither capped by nor credited to the MOOP
        uncapped
    };

    row.deductible_applied = deductible_portion;
    row.copay = copay_portion;
    row.coinsurance = coinsurance_portion;
    row.liability = liability;
    row.family_deductible_after = state.family_deductible;
    row.family_moop_after = state.family_moop;
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::catalog::{
        sample_catalog, AccumulatorKind, MarketSegment, MetalLevel, NetworkModel, VariantKind,
    };
    use crate::household::sample_household;
    use crate::simulation::claims::{standard_utilization, ServiceType};

    fn engine() -> SimulationEngine {
        SimulationEngine::new(SimulationConfig {
            detailed_output: true,
            ..Default::default()
        })
    }

    fn claim(member_id: &str, allowed: f64, service_type: ServiceType) -> SimulatedClaim {
        SimulatedClaim {
            member_id: member_id.to_string(),
            total_billed: allowed * 1.5,
            allowed_amount: allowed,
            service_type,
            network_tier: NetworkTier::Preferred,
            service_date: None,
        }
    }

    /// Bare variant with a single preferred-tier structure and no filed
    /// benefits, so every claim takes the default coinsurance path
    fn bare_variant(
        deductible: f64,
        moop: f64,
        coinsurance: f64,
        kind: AccumulatorKind,
    ) -> PlanVariant {
        PlanVariant {
            plan_id: "99999TX0000001-01".to_string(),
            kind: VariantKind::Standard,
            marketing_name: "Test Silver".to_string(),
            actuarial_value: 0.70,
            networks: vec![NetworkCostStructure {
                tier: NetworkTier::Preferred,
                network_id: "NET-TEST".to_string(),
                deductible,
                deductible_kind: kind,
                moop,
                moop_kind: kind,
                drug_deductible_integrated: true,
                separate_drug_deductible: None,
                default_coinsurance: coinsurance,
            }],
            benefits: Vec::new(),
        }
    }

    fn bare_product(variant: PlanVariant) -> InsuranceProduct {
        InsuranceProduct {
            product_id: "99999TX000".to_string(),
            issuer_id: "99999".to_string(),
            state_code: "TX".to_string(),
            market: MarketSegment::Individual,
            metal_level: MetalLevel::Silver,
            network_model: NetworkModel::Hmo,
            base_monthly_premium: 640.0,
            variants: vec![variant],
        }
    }

    #[test]
    fn test_stop_loss_caps_single_large_claim() {
        // Individual MOOP 1000, one claim allowed 4000, nothing accumulated:
        // liability must be exactly 1000 and the accumulator must read 1000
        let variant = bare_variant(5_000.0, 1_000.0, 20.0, AccumulatorKind::Embedded);
        let product = bare_product(variant.clone());
        let household = sample_household();

        let run = engine()
            .simulate(&product, &variant, &household, &[claim("MEM-001", 4_000.0, ServiceType::Specialist)])
            .unwrap();

        assert_relative_eq!(run.rows[0].liability, 1_000.0);
        assert_relative_eq!(run.result.total_oop_paid, 1_000.0);
        assert_relative_eq!(run.rows[0].family_moop_after, 1_000.0);
    }

    #[test]
    fn test_deductible_split_across_two_claims() {
        // Deductible 750 at 20% coinsurance: claim 1 (500) is all deductible;
        // claim 2 (500) splits 250 deductible + 20% of the remaining 250
        let variant = bare_variant(750.0, 50_000.0, 20.0, AccumulatorKind::Embedded);
        let product = bare_product(variant.clone());
        let household = sample_household();

        let claims = [
            claim("MEM-001", 500.0, ServiceType::Specialist),
            claim("MEM-001", 500.0, ServiceType::Specialist),
        ];
        let run = engine().simulate(&product, &variant, &household, &claims).unwrap();

        assert_relative_eq!(run.rows[0].liability, 500.0);
        assert_relative_eq!(run.rows[0].deductible_applied, 500.0);

        assert_relative_eq!(run.rows[1].deductible_applied, 250.0);
        assert_relative_eq!(run.rows[1].coinsurance, 50.0);
        assert_relative_eq!(run.rows[1].liability, 300.0);

        // Individual deductible accumulator sits exactly at its limit
        assert_relative_eq!(run.result.total_deductible_paid, 750.0);
    }

    #[test]
    fn test_member_protected_after_embedded_moop() {
        let variant = bare_variant(0.0, 1_000.0, 100.0, AccumulatorKind::Embedded);
        let product = bare_product(variant.clone());
        let household = sample_household();

        let claims = [
            claim("MEM-001", 1_500.0, ServiceType::Specialist),
            claim("MEM-001", 800.0, ServiceType::Specialist),
            // A different member still owes cost sharing
            claim("MEM-002", 400.0, ServiceType::Specialist),
        ];
        let run = engine().simulate(&product, &variant, &household, &claims).unwrap();

        assert_relative_eq!(run.rows[0].liability, 1_000.0);
        assert!(run.rows[1].stop_loss);
        assert_relative_eq!(run.rows[1].liability, 0.0);
        assert_relative_eq!(run.rows[2].liability, 400.0);
    }

    #[test]
    fn test_family_moop_never_exceeded_and_sums_match() {
        let variant = bare_variant(500.0, 1_200.0, 40.0, AccumulatorKind::Embedded);
        let product = bare_product(variant.clone());
        let household = sample_household();

        let mut claims = Vec::new();
        for member in &household.members {
            for _ in 0..6 {
                claims.push(claim(&member.id, 900.0, ServiceType::Specialist));
            }
        }
        let run = engine().simulate(&product, &variant, &household, &claims).unwrap();

        let family_moop_limit = 1_200.0 * 2.0;
        let summed: f64 = run.rows.iter().map(|r| r.liability).sum();

        assert_relative_eq!(summed, run.result.total_oop_paid);
        assert!(run.result.total_oop_paid <= family_moop_limit + 1e-9);
        assert_relative_eq!(
            run.rows.last().unwrap().family_moop_after,
            run.result.total_oop_paid
        );
        // Component totals always reconcile with the out-of-pocket total
        assert_relative_eq!(
            run.result.total_deductible_paid
                + run.result.total_copay_paid
                + run.result.total_coinsurance_paid,
            run.result.total_oop_paid
        );
    }

    #[test]
    fn test_aggregate_deductible_has_no_individual_carve_out() {
        // Aggregate 2000 deductible: one member can absorb the whole thing
        let variant = bare_variant(2_000.0, 8_000.0, 20.0, AccumulatorKind::Aggregate);
        let product = bare_product(variant.clone());
        let household = sample_household();

        let claims = [
            claim("MEM-001", 2_000.0, ServiceType::Specialist),
            claim("MEM-002", 1_000.0, ServiceType::Specialist),
        ];
        let run = engine().simulate(&product, &variant, &household, &claims).unwrap();

        assert_relative_eq!(run.rows[0].deductible_applied, 2_000.0);
        // Family deductible satisfied: second member pays coinsurance only
        assert_relative_eq!(run.rows[1].deductible_applied, 0.0);
        assert_relative_eq!(run.rows[1].coinsurance, 200.0);
    }

    #[test]
    fn test_pre_deductible_copay_bypasses_deductible() {
        // Sample CSR 87 variant files a $10 PCP copay not subject to the
        // deductible; the visit must not touch the deductible accumulators
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Csr87).unwrap();
        let household = sample_household();

        let run = engine()
            .simulate(product, variant, &household, &[claim("MEM-002", 150.0, ServiceType::PrimaryCare)])
            .unwrap();

        assert_relative_eq!(run.rows[0].copay, 10.0);
        assert_relative_eq!(run.rows[0].deductible_applied, 0.0);
        assert_relative_eq!(run.result.total_oop_paid, 10.0);
    }

    #[test]
    fn test_preventive_care_is_free() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Standard).unwrap();
        let household = sample_household();

        let run = engine()
            .simulate(product, variant, &household, &[claim("MEM-002", 200.0, ServiceType::Preventive)])
            .unwrap();

        assert_relative_eq!(run.result.total_oop_paid, 0.0);
        assert_relative_eq!(run.rows[0].family_deductible_after, 0.0);
    }

    #[test]
    fn test_simulate_is_idempotent() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Csr94).unwrap();
        let household = sample_household();
        let claims = standard_utilization(&household);

        let first = engine().simulate(product, variant, &household, &claims).unwrap();
        let second = engine().simulate(product, variant, &household, &claims).unwrap();

        assert_eq!(first.result, second.result);
    }

    #[test]
    fn test_zero_claims_yields_premium_only() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Csr94).unwrap();
        let household = sample_household();

        let run = engine().simulate(product, variant, &household, &[]).unwrap();

        assert_relative_eq!(run.result.total_oop_paid, 0.0);
        assert_relative_eq!(run.result.gross_premium_annual, 640.0 * 12.0);
        // 144% FPL: subsidy covers the full premium
        assert_relative_eq!(run.result.net_premium_annual, 0.0);
        assert_relative_eq!(run.result.grand_total_cost, 0.0);
    }

    #[test]
    fn test_unknown_member_rejected() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Standard).unwrap();
        let household = sample_household();

        let err = engine()
            .simulate(product, variant, &household, &[claim("MEM-999", 100.0, ServiceType::PrimaryCare)])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownMember { index: 0, .. }));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Standard).unwrap();
        let household = sample_household();

        let mut bad = claim("MEM-001", 100.0, ServiceType::PrimaryCare);
        bad.allowed_amount = -5.0;

        let err = engine()
            .simulate(product, variant, &household, &[bad])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::NegativeClaimAmount { field: "allowed", .. }
        ));
    }

    #[test]
    fn test_missing_preferred_tier_is_fatal() {
        let mut variant = bare_variant(1_000.0, 5_000.0, 20.0, AccumulatorKind::Embedded);
        variant.networks[0].tier = NetworkTier::Participating;
        let product = bare_product(variant.clone());
        let household = sample_household();

        let err = engine()
            .simulate(&product, &variant, &household, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingNetworkTier { tier: NetworkTier::Preferred, .. }
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_per_claim_routing_uses_claim_tier_costs() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];
        let variant = product.variant_of_kind(VariantKind::Standard).unwrap();
        let household = sample_household();

        let mut oon_claim = claim("MEM-001", 1_000.0, ServiceType::Specialist);
        oon_claim.network_tier = NetworkTier::OutOfNetwork;

        let per_claim_engine = SimulationEngine::new(SimulationConfig {
            tier_routing: TierRouting::PerClaim,
            detailed_output: true,
        });
        let run = per_claim_engine
            .simulate(product, variant, &household, std::slice::from_ref(&oon_claim))
            .unwrap();

        // In-network deductible absorbs the line either way, but a remainder
        // would be charged at the OON 100% rate; verify routing picked the
        // OON structure by exhausting the deductible first
        let filler = claim("MEM-001", 5_000.0, ServiceType::Specialist);
        let run2 = per_claim_engine
            .simulate(product, variant, &household, &[filler, oon_claim])
            .unwrap();

        assert_relative_eq!(run.rows[0].deductible_applied, 1_000.0);
        // Deductible met by the filler: the OON claim pays 100% coinsurance
        assert_relative_eq!(run2.rows[1].coinsurance, 1_000.0);
    }
}
