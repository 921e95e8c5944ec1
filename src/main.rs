//! Benefits Engine CLI
//!
//! Runs the reference scenario: a low-income household picks a silver
//! product, the engine resolves the CSR variant and simulates a claim year.

use benefits_engine::catalog::{sample_catalog, NetworkTier, VariantKind};
use benefits_engine::household::sample_household;
use benefits_engine::simulation::{ServiceType, SimulatedClaim, SimulationConfig, SimulationEngine};
use benefits_engine::{resolve_variant, EngineError};
use std::fs::File;
use std::io::Write;

fn claim(member_id: &str, service_type: ServiceType, billed: f64, allowed: f64) -> SimulatedClaim {
    SimulatedClaim {
        member_id: member_id.to_string(),
        total_billed: billed,
        allowed_amount: allowed,
        service_type,
        network_tier: NetworkTier::Preferred,
        service_date: None,
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::init();

    println!("Benefits Engine v0.1.0");
    println!("======================\n");

    let catalog = sample_catalog();
    let household = sample_household();
    let product = &catalog.products[0]; // Acme Blue Silver

    println!("Household:");
    println!("  Members: {}", household.members.len());
    println!(
        "  Income: ${:.0} ({:.0}% FPL)",
        household.income_magi,
        household.percent_fpl * 100.0
    );
    println!("  CSR eligible: {}", household.csr_eligible);
    println!();

    // Resolve the variant: at 144% FPL this must land on CSR 94
    let variant = resolve_variant(product, &household)?;
    println!("Resolved variant: {}", variant.marketing_name);
    println!("  Plan ID: {}", variant.plan_id);
    println!("  Kind: {:?}", variant.kind);
    assert_eq!(variant.kind, VariantKind::Csr94);

    let tier1 = variant
        .network(NetworkTier::Preferred)
        .ok_or_else(|| EngineError::MissingNetworkTier {
            variant_id: variant.plan_id.clone(),
            tier: NetworkTier::Preferred,
        })?;
    println!(
        "  Deductible: ${:.0}  MOOP: ${:.0}  Coinsurance: {:.0}%",
        tier1.deductible, tier1.moop, tier1.default_coinsurance
    );
    println!();

    // Reference claim year: specialist follow-up, a checkup, one specialty
    // fill, and an ER visit big enough to exercise the MOOP
    let claims = vec![
        claim("MEM-001", ServiceType::Specialist, 500.0, 300.0),
        claim("MEM-002", ServiceType::PrimaryCare, 250.0, 150.0),
        claim("MEM-001", ServiceType::SpecialtyDrug, 1_500.0, 1_200.0),
        claim("MEM-003", ServiceType::EmergencyRoom, 6_000.0, 4_000.0),
    ];
    let total_allowed: f64 = claims.iter().map(|c| c.allowed_amount).sum();
    println!(
        "Simulating {} claims, ${:.0} allowed...",
        claims.len(),
        total_allowed
    );

    let config = SimulationConfig {
        detailed_output: true,
        ..Default::default()
    };
    let engine = SimulationEngine::new(config);
    let run = engine.simulate(product, variant, &household, &claims)?;

    // Print the per-claim ledger
    println!();
    println!(
        "{:>3} {:<8} {:<14} {:>9} {:>11} {:>7} {:>12} {:>10} {:>9}",
        "#", "Member", "Service", "Allowed", "Deductible", "Copay", "Coinsurance", "Liability", "FamMOOP"
    );
    println!("{}", "-".repeat(92));
    for row in &run.rows {
        println!(
            "{:>3} {:<8} {:<14} {:>9.2} {:>11.2} {:>7.2} {:>12.2} {:>10.2} {:>9.2}",
            row.index,
            row.member_id,
            row.service_type.as_str(),
            row.allowed_amount,
            row.deductible_applied,
            row.copay,
            row.coinsurance,
            row.liability,
            row.family_moop_after,
        );
    }

    // Write the ledger to CSV
    let csv_path = "claim_ledger.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(
        file,
        "Index,MemberID,ServiceType,NetworkTier,TotalBilled,AllowedAmount,DeductibleApplied,Copay,Coinsurance,Liability,StopLoss,FamilyDeductibleAfter,FamilyMoopAfter"
    )
    .unwrap();
    for row in &run.rows {
        writeln!(
            file,
            "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{},{:.2},{:.2}",
            row.index,
            row.member_id,
            row.service_type,
            row.network_tier,
            row.total_billed,
            row.allowed_amount,
            row.deductible_applied,
            row.copay,
            row.coinsurance,
            row.liability,
            row.stop_loss,
            row.family_deductible_after,
            row.family_moop_after,
        )
        .unwrap();
    }
    println!("\nLedger written to: {}", csv_path);

    // Print summary
    let result = &run.result;
    println!("\nAnnual Cost Summary:");
    println!("  Gross Premium:      ${:>10.2}", result.gross_premium_annual);
    println!("  Monthly Subsidy:    ${:>10.2}", result.monthly_subsidy);
    println!("  Net Premium:        ${:>10.2}", result.net_premium_annual);
    println!("  Deductible Paid:    ${:>10.2}", result.total_deductible_paid);
    println!("  Copay Paid:         ${:>10.2}", result.total_copay_paid);
    println!("  Coinsurance Paid:   ${:>10.2}", result.total_coinsurance_paid);
    println!("  Total Out-of-Pocket:${:>10.2}", result.total_oop_paid);
    println!("  Grand Total Cost:   ${:>10.2}", result.grand_total_cost);

    // JSON projection of the result record for downstream consumers
    println!(
        "\n{}",
        serde_json::to_string_pretty(result).expect("result record serializes")
    );

    Ok(())
}
