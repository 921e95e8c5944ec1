//! Rank every catalog product for a household's simulated claim year
//!
//! Loads a product catalog (JSON) and a claims file (CSV), resolves the
//! right variant per product, simulates the year in parallel, and writes
//! the ranked quotes to CSV.

use anyhow::{Context, Result};
use benefits_engine::catalog::{sample_catalog, Catalog};
use benefits_engine::household::sample_household;
use benefits_engine::ranking::rank_products;
use benefits_engine::simulation::{load_claims_csv, standard_utilization, SimulationConfig};
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Rank catalog products by projected total annual cost")]
struct Args {
    /// Product catalog JSON; omit to use the built-in sample catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Claims CSV; omit to synthesize standard utilization for the household
    #[arg(long)]
    claims: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "ranked_quotes.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_json_path(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => sample_catalog(),
    };
    println!(
        "Loaded {} products in {:?}",
        catalog.products.len(),
        start.elapsed()
    );

    // TODO: accept a household JSON once the enrollment feed settles on one
    let household = sample_household();

    let claims = match &args.claims {
        Some(path) => load_claims_csv(path)
            .with_context(|| format!("loading claims from {}", path.display()))?,
        None => standard_utilization(&household),
    };
    println!("Replaying {} claims", claims.len());

    let rank_start = Instant::now();
    let quotes = rank_products(&catalog, &household, &claims, &SimulationConfig::default())?;
    println!("Ranked {} quotes in {:?}", quotes.len(), rank_start.elapsed());

    let mut file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writeln!(
        file,
        "Rank,ProductID,PlanID,MarketingName,MetalLevel,VariantKind,GrossPremiumAnnual,NetPremiumAnnual,MonthlySubsidy,TotalOopPaid,GrandTotalCost"
    )?;
    for (rank, quote) in quotes.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},{},{:?},{:.2},{:.2},{:.2},{:.2},{:.2}",
            rank + 1,
            quote.product_id,
            quote.plan_id,
            quote.marketing_name,
            quote.metal_level,
            quote.variant_kind,
            quote.result.gross_premium_annual,
            quote.result.net_premium_annual,
            quote.result.monthly_subsidy,
            quote.result.total_oop_paid,
            quote.result.grand_total_cost,
        )?;
    }
    println!("Output written to {}", args.output.display());

    // Print the podium
    println!("\nTop quotes:");
    for quote in quotes.iter().take(3) {
        println!(
            "  {} ({:?}): net premium ${:.0}, OOP ${:.0}, total ${:.0}",
            quote.marketing_name,
            quote.variant_kind,
            quote.result.net_premium_annual,
            quote.result.total_oop_paid,
            quote.result.grand_total_cost,
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
