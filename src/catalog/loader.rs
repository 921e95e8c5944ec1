//! Load and validate plan catalogs from JSON
//!
//! Catalog invariants are checked once at load time so the resolver and the
//! simulation engine can treat well-formed data as a given. A violation here
//! is a fatal configuration error, never recovered from downstream.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::info;

use super::data::{AccumulatorKind, CostSharing, InsuranceProduct, NetworkTier, PlanVariant, VariantKind};
use super::Catalog;
use crate::error::EngineError;

/// Load a catalog from a JSON file and validate every product in it
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, EngineError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| EngineError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;

    let products: Vec<InsuranceProduct> =
        serde_json::from_str(&raw).map_err(|source| EngineError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = Catalog { products };
    catalog.validate()?;

    info!(
        "loaded catalog from {}: {} products, {} variants",
        path.display(),
        catalog.products.len(),
        catalog.products.iter().map(|p| p.variants.len()).sum::<usize>()
    );

    Ok(catalog)
}

/// Validate one product against the catalog invariants
pub fn validate_product(product: &InsuranceProduct) -> Result<(), EngineError> {
    let has_fallback = product
        .variants
        .iter()
        .any(|v| matches!(v.kind, VariantKind::Standard | VariantKind::OffExchange));
    if !has_fallback {
        return Err(EngineError::MissingFallbackVariant {
            product_id: product.product_id.clone(),
        });
    }

    for variant in &product.variants {
        validate_variant(variant)?;
    }

    Ok(())
}

fn validate_variant(variant: &PlanVariant) -> Result<(), EngineError> {
    let mut seen_tiers = BTreeSet::new();
    for network in &variant.networks {
        if !seen_tiers.insert(network.tier) {
            return Err(EngineError::DuplicateNetworkTier {
                variant_id: variant.plan_id.clone(),
                tier: network.tier,
            });
        }

        if network.deductible < 0.0 {
            return Err(EngineError::NegativeAmount {
                variant_id: variant.plan_id.clone(),
                field: "deductible",
                amount: network.deductible,
            });
        }
        if network.moop < 0.0 {
            return Err(EngineError::NegativeAmount {
                variant_id: variant.plan_id.clone(),
                field: "moop",
                amount: network.moop,
            });
        }
        if let Some(drug_deductible) = network.separate_drug_deductible {
            if drug_deductible < 0.0 {
                return Err(EngineError::NegativeAmount {
                    variant_id: variant.plan_id.clone(),
                    field: "separate_drug_deductible",
                    amount: drug_deductible,
                });
            }
        }

        if network.deductible_kind == AccumulatorKind::Aggregate
            && network.moop_kind == AccumulatorKind::Aggregate
            && network.moop < network.deductible
        {
            return Err(EngineError::MoopBelowDeductible {
                variant_id: variant.plan_id.clone(),
                tier: network.tier,
                moop: network.moop,
                deductible: network.deductible,
            });
        }

        if !(0.0..=100.0).contains(&network.default_coinsurance) {
            return Err(EngineError::InvalidCoinsurancePercent {
                variant_id: variant.plan_id.clone(),
                percent: network.default_coinsurance,
            });
        }
    }

    let mut seen_benefits = BTreeSet::new();
    for benefit in &variant.benefits {
        if !seen_benefits.insert(benefit.benefit_type) {
            return Err(EngineError::DuplicateBenefit {
                variant_id: variant.plan_id.clone(),
                benefit: benefit.benefit_type.as_str(),
            });
        }

        for rule in benefit.cost_sharing.values() {
            match rule.sharing {
                CostSharing::Copay { amount } if amount < 0.0 => {
                    return Err(EngineError::NegativeAmount {
                        variant_id: variant.plan_id.clone(),
                        field: "copay",
                        amount,
                    });
                }
                CostSharing::Coinsurance { percent } if !(0.0..=100.0).contains(&percent) => {
                    return Err(EngineError::InvalidCoinsurancePercent {
                        variant_id: variant.plan_id.clone(),
                        percent,
                    });
                }
                _ => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::sample_catalog;

    #[test]
    fn test_missing_fallback_rejected() {
        let mut catalog = sample_catalog();
        // Strip the silver product down to CSR variants only
        catalog.products[0]
            .variants
            .retain(|v| v.kind.is_csr());

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, EngineError::MissingFallbackVariant { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_duplicate_tier_rejected() {
        let mut catalog = sample_catalog();
        let duplicate = catalog.products[0].variants[0].networks[0].clone();
        catalog.products[0].variants[0].networks.push(duplicate);

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, EngineError::DuplicateNetworkTier { .. }));
    }

    #[test]
    fn test_negative_deductible_rejected() {
        let mut catalog = sample_catalog();
        catalog.products[0].variants[0].networks[0].deductible = -1.0;

        let err = catalog.validate().unwrap_err();
        assert!(matches!(
            err,
            EngineError::NegativeAmount { field: "deductible", .. }
        ));
    }

    #[test]
    fn test_aggregate_moop_below_deductible_rejected() {
        let mut catalog = sample_catalog();
        // The sample OON structure is aggregate/aggregate
        let oon = catalog.products[0].variants[0]
            .networks
            .iter_mut()
            .find(|n| n.tier == NetworkTier::OutOfNetwork)
            .unwrap();
        oon.moop = oon.deductible - 1.0;

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, EngineError::MoopBelowDeductible { .. }));
    }

    #[test]
    fn test_coinsurance_out_of_range_rejected() {
        let mut catalog = sample_catalog();
        catalog.products[0].variants[0].networks[0].default_coinsurance = 120.0;

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidCoinsurancePercent { .. }));
    }
}
