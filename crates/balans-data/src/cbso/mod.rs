//! Central Balance Sheet Office filings.
//!
//! This module covers the whole path from a company number to parsed filings:
//! - listing and resolving filing references
//! - downloading JSON-XBRL detail documents
//! - parsing them into [`FilingRecord`]s
//!
//! # Example
//!
//! ```no_run
//! use balans_data::cbso::{CbsoClient, FilingFetcher};
//! use balans_data::CompanyNumber;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let company: CompanyNumber = "BE 0428.003.392".parse()?;
//!     let fetcher = FilingFetcher::new(CbsoClient::from_env()?);
//!
//!     let references = fetcher.fetch_references(&company, 3).await?;
//!     let filings = fetcher.fetch_filings(&company, &references).await?;
//!
//!     for record in filings.records() {
//!         println!("{} ends {:?}", record.reference_number, record.period_end);
//!     }
//!     for (reference, error) in filings.failures() {
//!         eprintln!("{reference}: {error}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod fetch;
pub mod record;
pub mod references;
mod wire;

pub use client::{CbsoClient, FilingSource};
pub use fetch::{FilingFetcher, FilingSet, ProgressFn};
pub use record::{
    Address, Administrator, Entity, FilingRecord, InterestHeld, LineKey, Mandate,
    ParticipatingInterest, PeriodSymbol, Person, Shareholder,
};
pub use references::{FilingReference, ModelType, ReferenceLookup, resolve};
