//! Cost-share rule evaluation and display formatting
//!
//! Computes a member's liability for a single service line, before any
//! accumulator truncation. Truncation against deductible/MOOP room is the
//! accumulator's job, not the evaluator's.

use crate::catalog::{CostShareRule, CostSharing};

/// Member liability for one service line under a single sharing rule.
///
/// `default_coinsurance` is the network tier's fallback percent, applied when
/// the rule is `NotApplicable` (no rule filed for this benefit/tier).
pub fn line_liability(sharing: CostSharing, default_coinsurance: f64, allowed: f64) -> f64 {
    match sharing {
        CostSharing::Copay { amount } => amount.min(allowed),
        CostSharing::Coinsurance { percent } => allowed * percent / 100.0,
        CostSharing::NoCharge => 0.0,
        CostSharing::NotApplicable => allowed * default_coinsurance / 100.0,
    }
}

/// Format a dollar amount for display, whole dollars when exact
pub fn format_money(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${:.0}", amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Human-readable description of a cost-share rule, e.g. "$20 Copay" or
/// "Deductible then 40% Coinsurance"
pub fn describe_rule(rule: &CostShareRule) -> String {
    let base = match rule.sharing {
        CostSharing::Copay { amount } => format!("{} Copay", format_money(amount)),
        CostSharing::Coinsurance { percent } => format!("{:.0}% Coinsurance", percent),
        CostSharing::NoCharge => "No Charge".to_string(),
        CostSharing::NotApplicable => "Plan Default".to_string(),
    };

    if rule.subject_to_deductible && rule.sharing != CostSharing::NoCharge {
        format!("Deductible then {}", base)
    } else {
        base
    }
}
