//! Catalog-wide quoting: simulate one household's claim year against every
//! product and rank by projected total annual cost

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::{resolve_variant, Catalog, MetalLevel, VariantKind};
use crate::error::EngineError;
use crate::household::TaxHousehold;
use crate::simulation::{SimulatedClaim, SimulationConfig, SimulationEngine, SimulationResult};

/// One product's quote for a household: the resolved variant plus its
/// simulated annual cost
#[derive(Debug, Clone, Serialize)]
pub struct RankedQuote {
    pub product_id: String,
    pub plan_id: String,
    pub marketing_name: String,
    pub metal_level: MetalLevel,
    pub variant_kind: VariantKind,
    pub result: SimulationResult,
}

/// Simulate the claim year against every product in the catalog and return
/// quotes sorted by grand total cost, cheapest first.
///
/// Products run in parallel; any resolution or simulation failure aborts the
/// whole ranking since a partial list would silently hide a product.
pub fn rank_products(
    catalog: &Catalog,
    household: &TaxHousehold,
    claims: &[SimulatedClaim],
    config: &SimulationConfig,
) -> Result<Vec<RankedQuote>, EngineError> {
    let mut quotes: Vec<RankedQuote> = catalog
        .products
        .par_iter()
        .map(|product| {
            let variant = resolve_variant(product, household)?;
            let engine = SimulationEngine::new(config.clone());
            let run = engine.simulate(product, variant, household, claims)?;

            Ok(RankedQuote {
                product_id: product.product_id.clone(),
                plan_id: variant.plan_id.clone(),
                marketing_name: variant.marketing_name.clone(),
                metal_level: product.metal_level,
                variant_kind: variant.kind,
                result: run.result,
            })
        })
        .collect::<Result<_, EngineError>>()?;

    quotes.sort_by(|a, b| {
        a.result
            .grand_total_cost
            .total_cmp(&b.result.grand_total_cost)
    });

    Ok(quotes)
}
