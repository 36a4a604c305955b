#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/balans/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cbso;
pub mod company;
pub mod config;
pub mod error;
pub mod financials;
pub mod lookup;

pub use cbso::{CbsoClient, FilingFetcher, FilingRecord, FilingReference, FilingSet, FilingSource};
pub use company::{CompanyNumber, format_id};
pub use config::{ClientConfig, Database};
pub use error::{DataError, FetchError, Result};
pub use financials::{PeriodFigures, financial_rows};
pub use lookup::LineCodeTable;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
