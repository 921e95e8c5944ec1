//! Simulated claim input: types, CSV loading, and fixed-utilization synthesis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{BenefitType, NetworkTier};
use crate::error::EngineError;
use crate::household::TaxHousehold;

/// Service category tag on a claim. Closed set; every value maps onto
/// exactly one catalog benefit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    PrimaryCare,
    Specialist,
    GenericDrug,
    SpecialtyDrug,
    #[serde(rename = "ER")]
    EmergencyRoom,
    Preventive,
}

impl ServiceType {
    /// The benefit category this service is adjudicated under
    pub fn benefit_type(&self) -> BenefitType {
        match self {
            ServiceType::PrimaryCare => BenefitType::PrimaryCareVisit,
            ServiceType::Specialist => BenefitType::SpecialistVisit,
            ServiceType::GenericDrug => BenefitType::GenericDrug,
            ServiceType::SpecialtyDrug => BenefitType::SpecialtyDrug,
            ServiceType::EmergencyRoom => BenefitType::EmergencyRoom,
            ServiceType::Preventive => BenefitType::PreventiveCare,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::PrimaryCare => "Primary Care",
            ServiceType::Specialist => "Specialist",
            ServiceType::GenericDrug => "Generic Drug",
            ServiceType::SpecialtyDrug => "Specialty Drug",
            ServiceType::EmergencyRoom => "ER",
            ServiceType::Preventive => "Preventive",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One medical claim to replay through the accumulator. Transient,
/// caller-supplied input; processing order is the supplied order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedClaim {
    pub member_id: String,

    /// List (billed) price
    pub total_billed: f64,

    /// Negotiated/contracted price; cost sharing is computed on this
    pub allowed_amount: f64,

    pub service_type: ServiceType,

    pub network_tier: NetworkTier,

    /// Optional date of service; the CSV loader orders fully dated claim
    /// files chronologically
    #[serde(default)]
    pub service_date: Option<NaiveDate>,
}

/// Raw CSV row for a claims file
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "MemberID")]
    member_id: String,
    #[serde(rename = "TotalBilled")]
    total_billed: f64,
    #[serde(rename = "AllowedAmount")]
    allowed_amount: f64,
    #[serde(rename = "ServiceType")]
    service_type: ServiceType,
    #[serde(rename = "NetworkTier")]
    network_tier: NetworkTier,
    #[serde(rename = "ServiceDate", default)]
    service_date: Option<NaiveDate>,
}

impl CsvRow {
    fn into_claim(self) -> SimulatedClaim {
        SimulatedClaim {
            member_id: self.member_id,
            total_billed: self.total_billed,
            allowed_amount: self.allowed_amount,
            service_type: self.service_type,
            network_tier: self.network_tier,
            service_date: self.service_date,
        }
    }
}

/// Load claims from a CSV reader. When every row carries a service date the
/// claims are sorted chronologically; otherwise file order is preserved.
pub fn load_claims_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<SimulatedClaim>, EngineError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut claims = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        claims.push(row.into_claim());
    }

    if claims.iter().all(|c| c.service_date.is_some()) {
        claims.sort_by_key(|c| c.service_date);
    }

    Ok(claims)
}

/// Load claims from a CSV file
pub fn load_claims_csv<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<Vec<SimulatedClaim>, EngineError> {
    let reader = csv::Reader::from_path(path)?;
    let mut claims = Vec::new();
    for result in reader.into_deserialize() {
        let row: CsvRow = result?;
        claims.push(row.into_claim());
    }
    if claims.iter().all(|c| c.service_date.is_some()) {
        claims.sort_by_key(|c| c.service_date);
    }
    Ok(claims)
}

/// Synthesize a deterministic claim year from fixed per-person utilization
/// assumptions: every member sees primary care once; members with condition
/// codes add specialist follow-ups, quarterly generic fills, and monthly
/// specialty fills collapsed to four.
pub fn standard_utilization(household: &TaxHousehold) -> Vec<SimulatedClaim> {
    let mut claims = Vec::new();

    for member in &household.members {
        claims.push(SimulatedClaim {
            member_id: member.id.clone(),
            total_billed: 250.0,
            allowed_amount: 150.0,
            service_type: ServiceType::PrimaryCare,
            network_tier: NetworkTier::Preferred,
            service_date: None,
        });

        if !member.conditions.is_empty() {
            for _ in 0..2 {
                claims.push(SimulatedClaim {
                    member_id: member.id.clone(),
                    total_billed: 500.0,
                    allowed_amount: 300.0,
                    service_type: ServiceType::Specialist,
                    network_tier: NetworkTier::Preferred,
                    service_date: None,
                });
            }
            for _ in 0..4 {
                claims.push(SimulatedClaim {
                    member_id: member.id.clone(),
                    total_billed: 40.0,
                    allowed_amount: 25.0,
                    service_type: ServiceType::GenericDrug,
                    network_tier: NetworkTier::Preferred,
                    service_date: None,
                });
            }
            for _ in 0..4 {
                claims.push(SimulatedClaim {
                    member_id: member.id.clone(),
                    total_billed: 1_500.0,
                    allowed_amount: 1_200.0,
                    service_type: ServiceType::SpecialtyDrug,
                    network_tier: NetworkTier::Preferred,
                    service_date: None,
                });
            }
        }
    }

    claims
}
