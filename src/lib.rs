//! Benefits Engine - Plan variant resolution and annual cost simulation for
//! ACA individual-market products
//!
//! This library provides:
//! - Product catalog modeling (metal tiers, CSR variant ladders, tiered
//!   network cost structures, benefit-level cost-share rules)
//! - Income-based plan variant resolution (CSR 73/87/94 auto-selection)
//! - APTC premium subsidy calculation from the contribution schedule
//! - Annual claims simulation with embedded/aggregate deductible and MOOP
//!   accumulators
//! - Catalog-wide quote ranking by projected total annual cost

pub mod catalog;
pub mod error;
pub mod household;
pub mod ranking;
pub mod simulation;
pub mod subsidy;

// Re-export commonly used types
pub use catalog::{resolve_variant, Catalog, InsuranceProduct, PlanVariant};
pub use error::EngineError;
pub use household::TaxHousehold;
pub use ranking::{rank_products, RankedQuote};
pub use simulation::{SimulationConfig, SimulationEngine, SimulationResult, SimulationRun};
