//! In-memory sample catalog for demos and tests
//!
//! Values mirror a typical state exchange filing: one silver product with the
//! full CSR variant ladder, plus standalone bronze and gold products.

use std::collections::BTreeMap;

use super::data::*;
use super::Catalog;

fn two_tier_networks(deductible: f64, moop: f64, coinsurance: f64) -> Vec<NetworkCostStructure> {
    vec![
        NetworkCostStructure {
            tier: NetworkTier::Preferred,
            network_id: "NET-001-HMO".to_string(),
            deductible,
            deductible_kind: AccumulatorKind::Embedded,
            moop,
            moop_kind: AccumulatorKind::Embedded,
            drug_deductible_integrated: true,
            separate_drug_deductible: None,
            default_coinsurance: coinsurance,
        },
        // Out of network is effectively uncovered: member pays everything
        // until an implausibly high deductible
        NetworkCostStructure {
            tier: NetworkTier::OutOfNetwork,
            network_id: "NET-OON".to_string(),
            deductible: 100_000.0,
            deductible_kind: AccumulatorKind::Aggregate,
            moop: 200_000.0,
            moop_kind: AccumulatorKind::Aggregate,
            drug_deductible_integrated: true,
            separate_drug_deductible: None,
            default_coinsurance: 100.0,
        },
    ]
}

fn copay_rule(amount: f64) -> CostShareRule {
    CostShareRule {
        sharing: CostSharing::Copay { amount },
        // Copay applies before the deductible (the high-value PCP pattern)
        subject_to_deductible: false,
        counts_toward_moop: true,
        coupon_excluded: false,
    }
}

fn not_applicable_rule() -> CostShareRule {
    CostShareRule {
        sharing: CostSharing::NotApplicable,
        subject_to_deductible: true,
        counts_toward_moop: true,
        coupon_excluded: false,
    }
}

fn standard_benefits(pcp_copay: f64, generic_copay: f64) -> Vec<PlanBenefit> {
    let tiered = |preferred: CostShareRule| {
        let mut map = BTreeMap::new();
        map.insert(NetworkTier::Preferred, preferred);
        map.insert(NetworkTier::OutOfNetwork, not_applicable_rule());
        map
    };

    vec![
        PlanBenefit {
            benefit_type: BenefitType::PrimaryCareVisit,
            covered: true,
            essential_health_benefit: true,
            cost_sharing: tiered(copay_rule(pcp_copay)),
            limit: None,
            prior_authorization_required: false,
        },
        PlanBenefit {
            benefit_type: BenefitType::GenericDrug,
            covered: true,
            essential_health_benefit: true,
            cost_sharing: tiered(copay_rule(generic_copay)),
            limit: None,
            prior_authorization_required: false,
        },
        // Preventive care is free in network per the EHB mandate
        PlanBenefit {
            benefit_type: BenefitType::PreventiveCare,
            covered: true,
            essential_health_benefit: true,
            cost_sharing: tiered(CostShareRule {
                sharing: CostSharing::NoCharge,
                subject_to_deductible: false,
                counts_toward_moop: true,
                coupon_excluded: false,
            }),
            limit: None,
            prior_authorization_required: false,
        },
    ]
}

fn silver_variant(
    suffix: &str,
    kind: VariantKind,
    name: &str,
    av: f64,
    deductible: f64,
    moop: f64,
    coinsurance: f64,
    pcp_copay: f64,
    generic_copay: f64,
) -> PlanVariant {
    PlanVariant {
        plan_id: format!("12345TX0010001-{suffix}"),
        kind,
        marketing_name: name.to_string(),
        actuarial_value: av,
        networks: two_tier_networks(deductible, moop, coinsurance),
        benefits: standard_benefits(pcp_copay, generic_copay),
    }
}

/// Build the sample catalog: a silver product carrying the full CSR ladder
/// plus single-variant bronze and gold products.
pub fn sample_catalog() -> Catalog {
    let silver = InsuranceProduct {
        product_id: "12345TX001".to_string(),
        issuer_id: "12345".to_string(),
        state_code: "TX".to_string(),
        market: MarketSegment::Individual,
        metal_level: MetalLevel::Silver,
        network_model: NetworkModel::Hmo,
        base_monthly_premium: 640.0,
        variants: vec![
            silver_variant("01", VariantKind::Standard, "Acme Blue Silver HMO", 0.7045, 5_000.0, 9_100.0, 40.0, 40.0, 20.0),
            silver_variant("04", VariantKind::Csr73, "Acme Blue Silver HMO (CSR 73)", 0.7310, 4_000.0, 7_500.0, 30.0, 30.0, 15.0),
            silver_variant("05", VariantKind::Csr87, "Acme Blue Silver HMO (CSR 87)", 0.8715, 700.0, 3_000.0, 20.0, 10.0, 5.0),
            silver_variant("06", VariantKind::Csr94, "Acme Blue Silver HMO (CSR 94)", 0.9405, 0.0, 1_000.0, 10.0, 5.0, 0.0),
        ],
    };

    let bronze = InsuranceProduct {
        product_id: "12345TX002".to_string(),
        issuer_id: "12345".to_string(),
        state_code: "TX".to_string(),
        market: MarketSegment::Individual,
        metal_level: MetalLevel::Bronze,
        network_model: NetworkModel::Epo,
        base_monthly_premium: 410.0,
        variants: vec![PlanVariant {
            plan_id: "12345TX0020001-01".to_string(),
            kind: VariantKind::Standard,
            marketing_name: "Acme Bronze Classic EPO".to_string(),
            actuarial_value: 0.6480,
            networks: two_tier_networks(7_500.0, 7_500.0, 40.0),
            benefits: standard_benefits(45.0, 25.0),
        }],
    };

    let gold = InsuranceProduct {
        product_id: "12345TX003".to_string(),
        issuer_id: "12345".to_string(),
        state_code: "TX".to_string(),
        market: MarketSegment::Individual,
        metal_level: MetalLevel::Gold,
        network_model: NetworkModel::Ppo,
        base_monthly_premium: 820.0,
        variants: vec![PlanVariant {
            plan_id: "12345TX0030001-01".to_string(),
            kind: VariantKind::Standard,
            marketing_name: "Acme Gold Advantage PPO".to_string(),
            actuarial_value: 0.8010,
            networks: two_tier_networks(1_500.0, 6_000.0, 20.0),
            benefits: standard_benefits(20.0, 10.0),
        }],
    };

    Catalog {
        products: vec![silver, bronze, gold],
    }
}
