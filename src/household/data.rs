//! Household data structures matching the enrollment intake format

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Gender of a covered individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Relationship of a member to the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    #[serde(rename = "SELF")]
    Subscriber,
    Spouse,
    Child,
    Dependent,
}

/// Cost-sharing-reduction tier, derived from percent-of-FPL at eligibility
/// determination. Exactly three levels exist; the plain silver plan is the
/// absence of a level, not a fourth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CsrLevel {
    #[serde(rename = "73")]
    Level73,
    #[serde(rename = "87")]
    Level87,
    #[serde(rename = "94")]
    Level94,
}

impl CsrLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CsrLevel::Level73 => "73",
            CsrLevel::Level87 => "87",
            CsrLevel::Level94 => "94",
        }
    }
}

impl std::fmt::Display for CsrLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precomputed risk-adjustment profile for a member. The engine only passes
/// this through; scoring happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Risk model identifier, e.g. "CMS-HCC-V28"
    pub model: String,

    /// Precomputed risk score
    pub risk_score: f64,

    /// Active risk categories triggered by the member's conditions
    pub active_categories: Vec<String>,
}

/// One covered individual. Created once per simulation input; immutable for
/// the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdMember {
    /// Stable member identifier, e.g. "MEM-001"
    pub id: String,

    /// Age at coverage effective date
    pub age: u8,

    pub gender: Gender,

    pub relationship: Relationship,

    /// Tobacco-use flag (impacts rating in most states)
    #[serde(default)]
    pub tobacco_user: bool,

    /// Condition codes (ICD-10)
    #[serde(default)]
    pub conditions: Vec<String>,

    /// Optional precomputed risk profile
    #[serde(default)]
    pub risk_profile: Option<RiskProfile>,
}

/// The subsidy-determining tax unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxHousehold {
    pub zip_code: String,

    /// County FIPS code (zip codes can split counties)
    pub county_fips: String,

    /// Rating area derived from zip/county
    pub rating_area_id: String,

    /// Modified adjusted gross income, annual
    pub income_magi: f64,

    /// Income as a ratio of the federal poverty line (1.44 = 144% FPL)
    pub percent_fpl: f64,

    pub members: Vec<HouseholdMember>,

    /// Advance premium tax credit eligibility
    pub aptc_eligible: bool,

    /// Cost-sharing-reduction eligibility
    pub csr_eligible: bool,

    /// CSR tier; must be absent unless `csr_eligible` is set
    #[serde(default)]
    pub csr_level: Option<CsrLevel>,

    /// Benchmark (second-lowest-cost silver) monthly premium used to size
    /// the subsidy
    pub benchmark_premium: f64,
}

impl TaxHousehold {
    /// Check structural invariants on an assembled household
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(level) = self.csr_level {
            if !self.csr_eligible {
                return Err(EngineError::InconsistentCsrFlags { level });
            }
        }
        Ok(())
    }

    /// Look up a member by id
    pub fn member(&self, id: &str) -> Option<&HouseholdMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// The subscriber, if the household has one
    pub fn subscriber(&self) -> Option<&HouseholdMember> {
        self.members
            .iter()
            .find(|m| m.relationship == Relationship::Subscriber)
    }

    /// Monthly MAGI income
    pub fn monthly_income(&self) -> f64 {
        self.income_magi / 12.0
    }
}
