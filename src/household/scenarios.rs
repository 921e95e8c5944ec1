//! Deterministic household scenario generation
//!
//! Builds the fixed persona grid used for batch ranking runs and tests:
//! three income bands x three family shapes x three condition profiles.

use super::data::{CsrLevel, Gender, HouseholdMember, Relationship, RiskProfile, TaxHousehold};

struct IncomeBand {
    annual: f64,
    fpl_ratio: f64,
}

const INCOMES: [IncomeBand; 3] = [
    // Low income lands in the CSR 87 band
    IncomeBand {
        annual: 25_000.0,
        fpl_ratio: 1.6,
    },
    // Mid income: subsidy-eligible, no CSR
    IncomeBand {
        annual: 45_000.0,
        fpl_ratio: 2.9,
    },
    // High income: above the subsidy cliff treatment, capped contribution
    IncomeBand {
        annual: 95_000.0,
        fpl_ratio: 6.0,
    },
];

const FAMILIES: [&[Relationship]; 3] = [
    &[Relationship::Subscriber],
    &[Relationship::Subscriber, Relationship::Spouse],
    &[
        Relationship::Subscriber,
        Relationship::Spouse,
        Relationship::Child,
        Relationship::Child,
    ],
];

struct ConditionProfile {
    codes: &'static [&'static str],
    categories: &'static [&'static str],
    risk_score: f64,
}

const CONDITIONS: [ConditionProfile; 3] = [
    ConditionProfile {
        codes: &[],
        categories: &[],
        risk_score: 0.0,
    },
    // Type 2 diabetes
    ConditionProfile {
        codes: &["E11.9"],
        categories: &["HCC38"],
        risk_score: 0.312,
    },
    // Asthma
    ConditionProfile {
        codes: &["J45"],
        categories: &["HCC112"],
        risk_score: 0.250,
    },
];

/// Derive CSR eligibility from the FPL ratio the way the eligibility service
/// does: levels phase out at 150/200/250% FPL.
fn csr_from_fpl(fpl_ratio: f64) -> (bool, Option<CsrLevel>) {
    if fpl_ratio < 1.5 {
        (true, Some(CsrLevel::Level94))
    } else if fpl_ratio < 2.0 {
        (true, Some(CsrLevel::Level87))
    } else if fpl_ratio < 2.5 {
        (true, Some(CsrLevel::Level73))
    } else {
        (false, None)
    }
}

fn build_members(relationships: &[Relationship], condition: &ConditionProfile) -> Vec<HouseholdMember> {
    relationships
        .iter()
        .enumerate()
        .map(|(idx, &relationship)| {
            // Conditions attach to the subscriber only
            let (conditions, risk_profile) = if idx == 0 && !condition.codes.is_empty() {
                (
                    condition.codes.iter().map(|c| c.to_string()).collect(),
                    Some(RiskProfile {
                        model: "CMS-HCC-V28".to_string(),
                        risk_score: condition.risk_score,
                        active_categories: condition
                            .categories
                            .iter()
                            .map(|c| c.to_string())
                            .collect(),
                    }),
                )
            } else {
                (Vec::new(), None)
            };

            HouseholdMember {
                id: format!("MEM-{:03}", idx + 1),
                age: match relationship {
                    Relationship::Child | Relationship::Dependent => 10 + (idx as u8) * 2,
                    _ => 35 + (idx as u8) * 2,
                },
                gender: if idx % 2 == 0 { Gender::Male } else { Gender::Female },
                relationship,
                tobacco_user: false,
                conditions,
                risk_profile,
            }
        })
        .collect()
}

/// Generate the full 27-persona grid. Output is deterministic and already
/// validated.
pub fn generate_scenarios() -> Vec<TaxHousehold> {
    let mut scenarios = Vec::with_capacity(27);

    for income in &INCOMES {
        for family in &FAMILIES {
            for condition in &CONDITIONS {
                let (csr_eligible, csr_level) = csr_from_fpl(income.fpl_ratio);
                let size_factor = if family.len() > 1 { 1.5 } else { 1.0 };

                scenarios.push(TaxHousehold {
                    zip_code: "78701".to_string(),
                    county_fips: "48453".to_string(),
                    rating_area_id: "TX-AREA-1".to_string(),
                    income_magi: income.annual * size_factor,
                    percent_fpl: income.fpl_ratio,
                    members: build_members(family, condition),
                    aptc_eligible: true,
                    csr_eligible,
                    csr_level,
                    benchmark_premium: 450.0 * family.len() as f64,
                });
            }
        }
    }

    scenarios
}

/// The reference household: family of four at 144% FPL, subscriber with
/// type 2 diabetes, CSR level 94.
pub fn sample_household() -> TaxHousehold {
    TaxHousehold {
        zip_code: "78701".to_string(),
        county_fips: "48453".to_string(),
        rating_area_id: "TX-AREA-1".to_string(),
        income_magi: 45_000.0,
        percent_fpl: 1.44,
        members: vec![
            HouseholdMember {
                id: "MEM-001".to_string(),
                age: 45,
                gender: Gender::Male,
                relationship: Relationship::Subscriber,
                tobacco_user: false,
                conditions: vec!["E11.9".to_string()],
                risk_profile: Some(RiskProfile {
                    model: "CMS-HCC-V28".to_string(),
                    risk_score: 0.312,
                    active_categories: vec!["HCC38".to_string()],
                }),
            },
            HouseholdMember {
                id: "MEM-002".to_string(),
                age: 43,
                gender: Gender::Female,
                relationship: Relationship::Spouse,
                tobacco_user: false,
                conditions: Vec::new(),
                risk_profile: None,
            },
            HouseholdMember {
                id: "MEM-003".to_string(),
                age: 12,
                gender: Gender::Male,
                relationship: Relationship::Child,
                tobacco_user: false,
                conditions: Vec::new(),
                risk_profile: None,
            },
            HouseholdMember {
                id: "MEM-004".to_string(),
                age: 9,
                gender: Gender::Female,
                relationship: Relationship::Child,
                tobacco_user: false,
                conditions: Vec::new(),
                risk_profile: None,
            },
        ],
        aptc_eligible: true,
        csr_eligible: true,
        csr_level: Some(CsrLevel::Level94),
        benchmark_premium: 1_200.0,
    }
}
