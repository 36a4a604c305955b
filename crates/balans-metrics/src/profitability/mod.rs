//! Profitability metrics
//!
//! Operating result before financial items and non-recurring results (EBIT),
//! the same before depreciation and write-downs (EBITDA), and margins on
//! turnover. EBIT and EBITDA are available for every schema; the margins need
//! turnover, which only the full schema reports.

pub mod ebit;
pub mod margins;

pub use ebit::{Ebit, Ebitda};
pub use margins::{EbitMargin, EbitdaMargin, NetMargin};
