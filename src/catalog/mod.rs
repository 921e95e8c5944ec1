//! Plan catalog: products, variants, loading, and variant resolution

mod data;
pub mod loader;
mod resolver;
pub mod seed;

use std::path::Path;

pub use data::{
    AccumulatorKind, BenefitType, CostShareRule, CostSharing, InsuranceProduct, LimitPeriod,
    LimitUnit, MarketSegment, MetalLevel, NetworkCostStructure, NetworkModel, PlanBenefit,
    PlanVariant, QuantitativeLimit, VariantKind,
};
pub use data::NetworkTier;
pub use resolver::resolve_variant;
pub use seed::sample_catalog;

use crate::error::EngineError;

/// An immutable set of products, loaded once at startup by the host and
/// treated as read-only for the lifetime of every simulation that uses it.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Vec<InsuranceProduct>,
}

impl Catalog {
    /// Load and validate a catalog from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        loader::load_catalog(path)
    }

    /// Check every product against the catalog invariants
    pub fn validate(&self) -> Result<(), EngineError> {
        for product in &self.products {
            loader::validate_product(product)?;
        }
        Ok(())
    }

    /// Look up a product by id
    pub fn product(&self, product_id: &str) -> Option<&InsuranceProduct> {
        self.products.iter().find(|p| p.product_id == product_id)
    }
}
