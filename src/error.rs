//! Engine error taxonomy
//!
//! Two fatal categories exist: configuration errors (malformed catalog data)
//! and precondition violations (malformed caller input). Neither is recovered
//! from internally -- substituting a default cost structure would silently
//! misstate a regulated dollar figure.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::NetworkTier;
use crate::household::CsrLevel;

/// All failures the engine can surface
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog data error: a product must always carry a Standard or
    /// OffExchange variant usable as a resolver fallback
    #[error("product {product_id} has no standard or off-exchange fallback variant")]
    MissingFallbackVariant { product_id: String },

    /// Catalog data error: the variant lacks a cost structure for a tier the
    /// simulation needs
    #[error("variant {variant_id} has no cost structure for network tier {tier}")]
    MissingNetworkTier {
        variant_id: String,
        tier: NetworkTier,
    },

    /// Catalog data error: duplicate network tier on one variant
    #[error("variant {variant_id} defines network tier {tier} more than once")]
    DuplicateNetworkTier {
        variant_id: String,
        tier: NetworkTier,
    },

    /// Catalog data error: more than one benefit record for the same type
    #[error("variant {variant_id} defines benefit {benefit} more than once")]
    DuplicateBenefit {
        variant_id: String,
        benefit: &'static str,
    },

    /// Catalog data error: a negative deductible, MOOP, or copay amount
    #[error("variant {variant_id} has a negative amount for {field}: {amount}")]
    NegativeAmount {
        variant_id: String,
        field: &'static str,
        amount: f64,
    },

    /// Catalog data error: aggregate MOOP below aggregate deductible
    #[error(
        "variant {variant_id} tier {tier}: aggregate MOOP {moop} is below aggregate deductible {deductible}"
    )]
    MoopBelowDeductible {
        variant_id: String,
        tier: NetworkTier,
        moop: f64,
        deductible: f64,
    },

    /// Catalog data error: a coinsurance percentage outside [0, 100]
    #[error("variant {variant_id}: coinsurance percentage {percent} outside 0-100")]
    InvalidCoinsurancePercent { variant_id: String, percent: f64 },

    /// Caller error: claim references a member not in the household
    #[error("claim {index} references unknown member {member_id}")]
    UnknownMember { index: usize, member_id: String },

    /// Caller error: a negative billed or allowed amount
    #[error("claim {index} has a negative {field} amount: {amount}")]
    NegativeClaimAmount {
        index: usize,
        field: &'static str,
        amount: f64,
    },

    /// Caller error: household carries a CSR level without the eligibility flag
    #[error("household lists CSR level {level} but is not marked CSR eligible")]
    InconsistentCsrFlags { level: CsrLevel },

    /// Catalog file could not be read
    #[error("failed to read catalog file {path}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file could not be parsed
    #[error("failed to parse catalog file {path}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Claims CSV could not be read or parsed
    #[error("failed to load claims CSV")]
    ClaimsCsv {
        #[from]
        source: csv::Error,
    },
}

impl EngineError {
    /// True for errors caused by malformed catalog data rather than caller input
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::MissingFallbackVariant { .. }
                | EngineError::MissingNetworkTier { .. }
                | EngineError::DuplicateNetworkTier { .. }
                | EngineError::DuplicateBenefit { .. }
                | EngineError::NegativeAmount { .. }
                | EngineError::MoopBelowDeductible { .. }
                | EngineError::InvalidCoinsurancePercent { .. }
        )
    }
}
