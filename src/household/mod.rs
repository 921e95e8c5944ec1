//! Household and member data model

mod data;
pub mod scenarios;

pub use data::{CsrLevel, Gender, HouseholdMember, Relationship, RiskProfile, TaxHousehold};
pub use scenarios::{generate_scenarios, sample_household};
