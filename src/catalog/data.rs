//! Product and plan-variant data structures matching the plan catalog format
//!
//! One `InsuranceProduct` is the abstract filed plan; each `PlanVariant` is a
//! legally distinct cost-sharing configuration of it (standard, off-exchange,
//! or one of the three CSR builds). All catalog data is read-only reference
//! input; lifecycle is owned by the host application.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::household::CsrLevel;

/// Metal tier of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetalLevel {
    Catastrophic,
    Bronze,
    ExpandedBronze,
    Silver,
    Gold,
    Platinum,
}

impl MetalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetalLevel::Catastrophic => "Catastrophic",
            MetalLevel::Bronze => "Bronze",
            MetalLevel::ExpandedBronze => "Expanded Bronze",
            MetalLevel::Silver => "Silver",
            MetalLevel::Gold => "Gold",
            MetalLevel::Platinum => "Platinum",
        }
    }
}

impl std::fmt::Display for MetalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market segment the product is filed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketSegment {
    Individual,
    SmallGroup,
}

/// Network model of the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkModel {
    #[serde(rename = "HMO")]
    Hmo,
    #[serde(rename = "PPO")]
    Ppo,
    #[serde(rename = "EPO")]
    Epo,
    #[serde(rename = "POS")]
    Pos,
}

/// Which variant of the filed product a plan id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantKind {
    OffExchange,
    Standard,
    Csr73,
    Csr87,
    Csr94,
}

impl VariantKind {
    pub fn is_csr(&self) -> bool {
        matches!(self, VariantKind::Csr73 | VariantKind::Csr87 | VariantKind::Csr94)
    }
}

impl From<CsrLevel> for VariantKind {
    fn from(level: CsrLevel) -> Self {
        match level {
            CsrLevel::Level73 => VariantKind::Csr73,
            CsrLevel::Level87 => VariantKind::Csr87,
            CsrLevel::Level94 => VariantKind::Csr94,
        }
    }
}

/// Network tier a claim or cost structure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkTier {
    Preferred,
    Participating,
    OutOfNetwork,
}

impl NetworkTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkTier::Preferred => "Preferred",
            NetworkTier::Participating => "Participating",
            NetworkTier::OutOfNetwork => "Out of Network",
        }
    }
}

impl std::fmt::Display for NetworkTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulator semantics mandated per deductible/MOOP
///
/// Embedded: each individual carries their own cap and is protected once it
/// is met, even before the family total is reached. Aggregate: only the
/// family total matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccumulatorKind {
    Embedded,
    Aggregate,
}

/// Covered service category. Closed set: adding a benefit type is a
/// compile-time-visible change everywhere cost-sharing rules are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitType {
    PrimaryCareVisit,
    SpecialistVisit,
    GenericDrug,
    SpecialtyDrug,
    EmergencyRoom,
    PreventiveCare,
}

impl BenefitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenefitType::PrimaryCareVisit => "Primary Care Visit",
            BenefitType::SpecialistVisit => "Specialist Visit",
            BenefitType::GenericDrug => "Generic Drug",
            BenefitType::SpecialtyDrug => "Specialty Drug",
            BenefitType::EmergencyRoom => "Emergency Room",
            BenefitType::PreventiveCare => "Preventive Care",
        }
    }
}

/// How a single cost-share rule charges the member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum CostSharing {
    /// Fixed-amount charge per service
    Copay { amount: f64 },
    /// Percentage of the allowed amount, 0-100
    Coinsurance { percent: f64 },
    /// Plan pays 100%
    NoCharge,
    /// No rule filed for this tier; the tier's default coinsurance applies
    NotApplicable,
}

/// Cost-sharing rule for one benefit on one network tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostShareRule {
    #[serde(flatten)]
    pub sharing: CostSharing,

    /// Whether the charge applies only after the deductible is met. A false
    /// value means a pre-deductible copay (the high-value PCP-visit pattern).
    pub subject_to_deductible: bool,

    /// Whether the member's cost counts toward the out-of-pocket maximum
    pub counts_toward_moop: bool,

    /// If true, manufacturer-coupon assistance is excluded from deductible
    /// credit (accumulator adjustment program)
    #[serde(default)]
    pub coupon_excluded: bool,
}

/// Quantitative limit on a benefit, e.g. 20 visits per calendar year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantitativeLimit {
    pub value: f64,
    pub unit: LimitUnit,
    pub period: LimitPeriod,
    /// Soft limits can be exceeded with prior authorization
    pub soft: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitUnit {
    Visit,
    Day,
    Dollar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitPeriod {
    CalendarYear,
    Lifetime,
    Episode,
}

/// One covered service category on a variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBenefit {
    pub benefit_type: BenefitType,

    pub covered: bool,

    /// Essential health benefit flag
    pub essential_health_benefit: bool,

    /// Cost-sharing rule per network tier
    pub cost_sharing: BTreeMap<NetworkTier, CostShareRule>,

    #[serde(default)]
    pub limit: Option<QuantitativeLimit>,

    #[serde(default)]
    pub prior_authorization_required: bool,
}

impl PlanBenefit {
    /// Cost-sharing rule for a tier, if one is filed
    pub fn rule(&self, tier: NetworkTier) -> Option<&CostShareRule> {
        self.cost_sharing.get(&tier)
    }
}

/// Per-tier financial architecture of a variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkCostStructure {
    pub tier: NetworkTier,

    pub network_id: String,

    /// Individual deductible amount
    pub deductible: f64,
    pub deductible_kind: AccumulatorKind,

    /// Individual out-of-pocket maximum
    pub moop: f64,
    pub moop_kind: AccumulatorKind,

    /// Whether pharmacy spend shares the medical deductible
    pub drug_deductible_integrated: bool,

    #[serde(default)]
    pub separate_drug_deductible: Option<f64>,

    /// Coinsurance percent (0-100) used when a benefit does not override it
    pub default_coinsurance: f64,
}

/// One billable cost-sharing configuration of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanVariant {
    /// Plan identifier (14-digit HIOS id plus variant suffix)
    pub plan_id: String,

    pub kind: VariantKind,

    pub marketing_name: String,

    /// Actuarial value score, e.g. 0.9405
    pub actuarial_value: f64,

    /// One cost structure per distinct network tier
    pub networks: Vec<NetworkCostStructure>,

    /// At most one benefit record per distinct benefit type
    pub benefits: Vec<PlanBenefit>,
}

impl PlanVariant {
    /// Cost structure for a network tier
    pub fn network(&self, tier: NetworkTier) -> Option<&NetworkCostStructure> {
        self.networks.iter().find(|n| n.tier == tier)
    }

    /// Benefit record for a benefit type
    pub fn benefit(&self, benefit_type: BenefitType) -> Option<&PlanBenefit> {
        self.benefits.iter().find(|b| b.benefit_type == benefit_type)
    }
}

/// The abstract, pre-variant product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceProduct {
    /// Product identifier (10-digit HIOS id)
    pub product_id: String,

    /// Issuer identifier (5 digits)
    pub issuer_id: String,

    pub state_code: String,

    pub market: MarketSegment,

    pub metal_level: MetalLevel,

    pub network_model: NetworkModel,

    /// Externally supplied base monthly premium for this product. Rate-table
    /// lookup by member age happens upstream; the engine accepts the figure
    /// as input.
    pub base_monthly_premium: f64,

    pub variants: Vec<PlanVariant>,
}

impl InsuranceProduct {
    /// First variant of the given kind, if any
    pub fn variant_of_kind(&self, kind: VariantKind) -> Option<&PlanVariant> {
        self.variants.iter().find(|v| v.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::sample_catalog;

    #[test]
    fn test_variant_lookup() {
        let catalog = sample_catalog();
        let product = &catalog.products[0];

        assert_eq!(product.metal_level, MetalLevel::Silver);
        assert!(product.variant_of_kind(VariantKind::Standard).is_some());
        assert!(product.variant_of_kind(VariantKind::Csr94).is_some());
        assert!(product.variant_of_kind(VariantKind::OffExchange).is_none());
    }

    #[test]
    fn test_network_and_benefit_lookup() {
        let catalog = sample_catalog();
        let variant = catalog.products[0]
            .variant_of_kind(VariantKind::Standard)
            .unwrap();

        assert!(variant.network(NetworkTier::Preferred).is_some());
        assert!(variant.network(NetworkTier::Participating).is_none());
        assert!(variant.benefit(BenefitType::PrimaryCareVisit).is_some());
    }

    #[test]
    fn test_csr_level_maps_to_variant_kind() {
        assert_eq!(VariantKind::from(CsrLevel::Level73), VariantKind::Csr73);
        assert_eq!(VariantKind::from(CsrLevel::Level87), VariantKind::Csr87);
        assert_eq!(VariantKind::from(CsrLevel::Level94), VariantKind::Csr94);
        assert!(VariantKind::Csr94.is_csr());
        assert!(!VariantKind::Standard.is_csr());
    }
}
