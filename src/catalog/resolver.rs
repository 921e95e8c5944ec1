//! Plan-variant resolution
//!
//! A silver plan is really several financial products: which one a household
//! may buy is dictated by its CSR determination, not by preference. The
//! decision table is strict -- the silver/CSR branch takes precedence over
//! every other signal, and no other household attribute influences the choice.

use log::debug;

use super::data::{InsuranceProduct, MetalLevel, PlanVariant, VariantKind};
use crate::error::EngineError;
use crate::household::TaxHousehold;

/// Resolve the single variant the household is entitled to.
///
/// Total over catalogs that passed load-time validation: a product always
/// carries a Standard or OffExchange fallback, so failure here means the
/// catalog invariant was violated and the run must abort.
pub fn resolve_variant<'a>(
    product: &'a InsuranceProduct,
    household: &TaxHousehold,
) -> Result<&'a PlanVariant, EngineError> {
    if product.metal_level == MetalLevel::Silver && household.csr_eligible {
        if let Some(level) = household.csr_level {
            if let Some(variant) = product.variant_of_kind(VariantKind::from(level)) {
                debug!(
                    "product {}: CSR level {} selects variant {}",
                    product.product_id, level, variant.plan_id
                );
                return Ok(variant);
            }
        }
        // CSR-eligible but no tier set or no matching variant filed:
        // the standard build applies
        if let Some(variant) = product.variant_of_kind(VariantKind::Standard) {
            return Ok(variant);
        }
    }

    product
        .variant_of_kind(VariantKind::Standard)
        .or_else(|| product.variant_of_kind(VariantKind::OffExchange))
        .ok_or_else(|| EngineError::MissingFallbackVariant {
            product_id: product.product_id.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::sample_catalog;
    use crate::household::{sample_household, CsrLevel};

    #[test]
    fn test_csr94_household_gets_csr94_variant() {
        let catalog = sample_catalog();
        let silver = &catalog.products[0];
        let household = sample_household();

        let variant = resolve_variant(silver, &household).unwrap();
        assert_eq!(variant.kind, VariantKind::Csr94);
    }

    #[test]
    fn test_each_csr_level_resolves() {
        let catalog = sample_catalog();
        let silver = &catalog.products[0];
        let mut household = sample_household();

        for (level, expected) in [
            (CsrLevel::Level73, VariantKind::Csr73),
            (CsrLevel::Level87, VariantKind::Csr87),
            (CsrLevel::Level94, VariantKind::Csr94),
        ] {
            household.csr_level = Some(level);
            let variant = resolve_variant(silver, &household).unwrap();
            assert_eq!(variant.kind, expected);
        }
    }

    #[test]
    fn test_csr_eligible_without_level_falls_back_to_standard() {
        let catalog = sample_catalog();
        let silver = &catalog.products[0];
        let mut household = sample_household();
        household.csr_level = None;

        let variant = resolve_variant(silver, &household).unwrap();
        assert_eq!(variant.kind, VariantKind::Standard);
    }

    #[test]
    fn test_non_silver_product_ignores_csr() {
        let catalog = sample_catalog();
        let gold = &catalog.products[2];
        let household = sample_household(); // CSR 94

        let variant = resolve_variant(gold, &household).unwrap();
        assert_eq!(variant.kind, VariantKind::Standard);
    }

    #[test]
    fn test_ineligible_household_gets_standard_silver() {
        let catalog = sample_catalog();
        let silver = &catalog.products[0];
        let mut household = sample_household();
        household.csr_eligible = false;
        household.csr_level = None;

        let variant = resolve_variant(silver, &household).unwrap();
        assert_eq!(variant.kind, VariantKind::Standard);
    }

    #[test]
    fn test_off_exchange_fallback() {
        let mut catalog = sample_catalog();
        let household = sample_household();

        // Replace the gold product's standard variant with an off-exchange one
        catalog.products[2].variants[0].kind = VariantKind::OffExchange;
        let variant = resolve_variant(&catalog.products[2], &household).unwrap();
        assert_eq!(variant.kind, VariantKind::OffExchange);
    }

    #[test]
    fn test_resolver_totality_over_scenarios() {
        let catalog = sample_catalog();
        for household in crate::household::generate_scenarios() {
            for product in &catalog.products {
                resolve_variant(product, &household)
                    .expect("resolver must be total over validated catalogs");
            }
        }
    }

    #[test]
    fn test_missing_fallback_is_configuration_error() {
        let mut catalog = sample_catalog();
        let household = sample_household();
        catalog.products[0].variants.retain(|v| v.kind.is_csr());

        let mut no_csr = household.clone();
        no_csr.csr_eligible = false;
        no_csr.csr_level = None;

        let err = resolve_variant(&catalog.products[0], &no_csr).unwrap_err();
        assert!(err.is_configuration());
    }
}
