//! Advance premium tax credit (APTC) calculation
//!
//! Subsidy = benchmark premium - (monthly income x applicable percentage),
//! floored at zero. The applicable percentage comes from a regulatory sliding
//! scale keyed on percent-of-FPL; it is a step table, not a continuous
//! formula, so the schedule lives here as compile-time constants.

use crate::household::TaxHousehold;

/// (percent-of-FPL ceiling, expected contribution percentage of income).
/// Ratios above the last ceiling pay the capped percentage.
const CONTRIBUTION_SCHEDULE: &[(f64, f64)] = &[
    (1.50, 0.000), // below 150% FPL: no expected contribution
    (2.00, 0.020),
    (3.00, 0.060),
    (4.00, 0.085),
];

/// Cap for ratios above 400% FPL (expanded-subsidy rule)
const MAX_CONTRIBUTION_PCT: f64 = 0.085;

/// Expected contribution percentage of income for a percent-of-FPL ratio
pub fn expected_contribution_pct(percent_fpl: f64) -> f64 {
    for &(ceiling, pct) in CONTRIBUTION_SCHEDULE {
        if percent_fpl <= ceiling {
            return pct;
        }
    }
    MAX_CONTRIBUTION_PCT
}

/// Monthly subsidy for a household, in whole dollars.
///
/// Ineligible households get zero. The subsidy never exceeds the benchmark
/// premium and never goes negative; the result is floored to whole currency
/// units so repeated runs are reproducible.
pub fn monthly_subsidy(household: &TaxHousehold) -> f64 {
    if !household.aptc_eligible {
        return 0.0;
    }

    let expected_contribution =
        household.monthly_income() * expected_contribution_pct(household.percent_fpl);
    let subsidy = household.benchmark_premium - expected_contribution;

    subsidy.max(0.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::sample_household;

    #[test]
    fn test_schedule_steps() {
        assert_eq!(expected_contribution_pct(1.0), 0.0);
        assert_eq!(expected_contribution_pct(1.5), 0.0);
        assert_eq!(expected_contribution_pct(1.51), 0.02);
        assert_eq!(expected_contribution_pct(2.5), 0.06);
        assert_eq!(expected_contribution_pct(3.5), 0.085);
        assert_eq!(expected_contribution_pct(6.0), 0.085);
    }

    #[test]
    fn test_schedule_is_monotonic() {
        let mut prev = 0.0;
        for &(_, pct) in CONTRIBUTION_SCHEDULE {
            assert!(pct >= prev);
            prev = pct;
        }
        assert!(MAX_CONTRIBUTION_PCT >= prev);
    }

    #[test]
    fn test_ineligible_household_gets_zero() {
        let mut household = sample_household();
        household.aptc_eligible = false;
        assert_eq!(monthly_subsidy(&household), 0.0);
    }

    #[test]
    fn test_sample_household_subsidy() {
        // 144% FPL: zero expected contribution, full benchmark as subsidy
        let household = sample_household();
        assert_eq!(monthly_subsidy(&household), 1200.0);
    }

    #[test]
    fn test_subsidy_floor_at_zero() {
        // Expected contribution exceeds the benchmark: subsidy clamps to 0,
        // never a negative transfer
        let mut household = sample_household();
        household.benchmark_premium = 300.0;
        household.percent_fpl = 3.5; // 8.5% of income
        household.income_magi = 63_529.0; // 8.5% of monthly income = 450
        assert_eq!(monthly_subsidy(&household), 0.0);
    }

    #[test]
    fn test_subsidy_monotone_in_income() {
        // Holding eligibility fixed, more income never means more subsidy
        let mut household = sample_household();
        household.benchmark_premium = 900.0;

        let mut prev = f64::INFINITY;
        for (income, fpl) in [
            (20_000.0, 1.2),
            (30_000.0, 1.8),
            (45_000.0, 2.7),
            (70_000.0, 4.2),
            (120_000.0, 7.2),
        ] {
            household.income_magi = income;
            household.percent_fpl = fpl;
            let subsidy = monthly_subsidy(&household);
            assert!(subsidy <= prev, "subsidy increased with income");
            prev = subsidy;
        }
    }

    #[test]
    fn test_subsidy_is_whole_dollars() {
        let mut household = sample_household();
        household.percent_fpl = 1.8;
        household.income_magi = 31_111.0;
        let subsidy = monthly_subsidy(&household);
        assert_eq!(subsidy, subsidy.floor());
    }
}
