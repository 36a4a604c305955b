//! Demo of the CBSO references endpoint.
//!
//! This example demonstrates how to:
//! - Normalize a company number
//! - Resolve the filings of the last three accounting periods
//! - Download and parse the most recent one
//!
//! Needs `NBB_CBSO_SUB_KEY` in the environment or a `.env` file.
//!
//! Run with: cargo run --example cbso_references_demo -- 0403170701

use balans_data::cbso::PeriodSymbol;
use balans_data::lookup::codes;
use balans_data::{CbsoClient, CompanyNumber, FilingFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = std::env::args().nth(1).unwrap_or_else(|| "0403.170.701".to_string());
    let company = CompanyNumber::parse(&input)?;
    println!("Company: {}", company.display_prefixed());

    let fetcher = FilingFetcher::new(CbsoClient::from_env()?);
    let references = fetcher.fetch_references(&company, 3).await?;

    println!("\nResolved {} filings:", references.len());
    for reference in &references {
        println!(
            "  {}  {:?} .. {:?}  deposited {:?}",
            reference.reference_number,
            reference.period_start,
            reference.period_end,
            reference.deposit_date
        );
    }

    let set = fetcher.fetch_filings(&company, &references).await?;
    for (reference, error) in set.failures() {
        println!("\nSkipped {}: {}", reference, error);
    }

    if let Some(record) = set.latest() {
        println!("\nLatest filing {}:", record.reference_number);
        println!("  Name: {}", record.enterprise_name.as_deref().unwrap_or("-"));
        if let Some(address) = &record.address {
            println!("  Address: {}", address.formatted());
        }
        match record.value(codes::TURNOVER, &PeriodSymbol::Current) {
            Some(turnover) => println!("  Turnover: {:.0}", turnover),
            None => println!("  Turnover: not reported"),
        }
        println!(
            "  Administrators: {}",
            record.administrators.as_ref().map_or(0, Vec::len)
        );
    }

    Ok(())
}
