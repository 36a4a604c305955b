//! Flat per-period figures.
//!
//! A [`FilingRecord`] holds the current and prior year side by side.
//! [`PeriodFigures`] extracts one of those columns into a flat row, which is
//! what the derived metrics and the financial table work on.

use crate::cbso::{FilingRecord, FilingSet, ModelType, PeriodSymbol};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum period length, in days, for a filing to count as a full year.
pub const FULL_YEAR_DAYS: i64 = 362;

/// Figures of one filing for one period column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodFigures {
    /// Reference number of the filing
    pub reference_number: String,
    /// Company name at filing time
    pub enterprise_name: Option<String>,
    /// Start of the filing's accounting period
    pub period_start: Option<NaiveDate>,
    /// End of the filing's accounting period
    pub period_end: Option<NaiveDate>,
    /// Period column
    pub symbol: PeriodSymbol,
    /// Accounting schema of the filing
    pub model_type: Option<ModelType>,
    /// NACE activity code
    pub activity_code: Option<String>,
    /// Figures by line code
    pub values: BTreeMap<String, f64>,
}

impl PeriodFigures {
    /// Extract one period column from a record.
    ///
    /// Prior-year rows reuse the filing's own period bounds; the filing does
    /// not state the prior period separately.
    ///
    /// # Returns
    /// `None` when the filing has no figure for that column.
    pub fn from_record(record: &FilingRecord, symbol: &PeriodSymbol) -> Option<Self> {
        let values = record.figures_for(symbol);
        if values.is_empty() {
            return None;
        }

        Some(Self {
            reference_number: record.reference_number.clone(),
            enterprise_name: record.enterprise_name.clone(),
            period_start: record.period_start,
            period_end: record.period_end,
            symbol: symbol.clone(),
            model_type: record.model_type.clone(),
            activity_code: record.activity_code.clone(),
            values,
        })
    }

    /// Length of the accounting period in days.
    pub fn period_days(&self) -> Option<i64> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start).num_days()),
            _ => None,
        }
    }

    /// True when the period spans at least [`FULL_YEAR_DAYS`] days.
    ///
    /// A period with unknown bounds is not a full year.
    pub fn is_full_year(&self) -> bool {
        self.period_days().is_some_and(|days| days >= FULL_YEAR_DAYS)
    }

    /// Value of a line code; codes absent from the filing read as zero.
    pub fn value(&self, code: &str) -> f64 {
        self.values.get(code).copied().unwrap_or(0.0)
    }

    /// Sum of several line codes.
    pub fn sum(&self, codes: &[&str]) -> f64 {
        codes.iter().map(|code| self.value(code)).sum()
    }

    /// True when the filing uses the full schema.
    pub fn is_full_model(&self) -> bool {
        matches!(self.model_type, Some(ModelType::Full))
    }
}

/// Flatten every fetched record into one row per requested period column.
///
/// Rows are ordered by reference number, then by the order of `symbols`.
/// Columns a filing does not carry are left out.
pub fn financial_rows(set: &FilingSet, symbols: &[PeriodSymbol]) -> Vec<PeriodFigures> {
    set.records()
        .flat_map(|record| {
            symbols
                .iter()
                .filter_map(|symbol| PeriodFigures::from_record(record, symbol))
        })
        .collect()
}
