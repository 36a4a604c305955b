//! Filing references and their resolution.
//!
//! The registry returns every deposit made for a company: initial filings,
//! corrections and filing types that carry no structured data (consolidated
//! accounts, for instance). [`resolve`] narrows such a list down to one
//! authoritative filing per accounting period.

use super::wire::{self, de_text};
use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accounting schema a filing was deposited in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    /// Full schema
    Full,
    /// Abbreviated schema
    Abbreviated,
    /// Micro schema
    Micro,
    /// Any other model code, kept verbatim
    Other(String),
}

impl ModelType {
    /// Classify a registry model code such as `m01-f` or `m07-f`.
    ///
    /// The code prefix before the first `-` decides; unknown prefixes are
    /// kept as [`ModelType::Other`].
    pub fn from_code(code: &str) -> Self {
        let prefix = code
            .trim()
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match prefix.as_str() {
            "m01" | "m04" => Self::Full,
            "m02" | "m05" => Self::Abbreviated,
            "m07" | "m08" => Self::Micro,
            _ => Self::Other(code.trim().to_string()),
        }
    }

    /// Short label for reports.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Full => "full",
            Self::Abbreviated => "abbreviated",
            Self::Micro => "micro",
            Self::Other(code) => code,
        }
    }

    /// Registry model code that classifies back to this model type.
    pub fn code(&self) -> &str {
        match self {
            Self::Full => "m01-f",
            Self::Abbreviated => "m02-f",
            Self::Micro => "m07-f",
            Self::Other(code) => code,
        }
    }
}

/// Filing reference as published by the registry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReference {
    reference_number: String,
    #[serde(default, deserialize_with = "de_text")]
    deposit_date: Option<String>,
    #[serde(default)]
    exercise_dates: Option<RawExerciseDates>,
    #[serde(default, rename = "AccountingDataURL", deserialize_with = "de_text")]
    accounting_data_url: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    model_type: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    legal_form: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    activity_code: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    enterprise_name: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    deposit_type: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    language: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    currency: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExerciseDates {
    #[serde(default, deserialize_with = "de_text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    end_date: Option<String>,
}

/// One row of filing metadata.
///
/// Fields the registry omitted, or sent in an unreadable shape, are `None`;
/// such a reference is simply not eligible for resolution. Serializes in the
/// registry's shape, so [`FilingReference::parse_list`] reads its own output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawReference", into = "RawReference")]
pub struct FilingReference {
    /// Unique identifier of the deposit (e.g. `2024-00091714`)
    pub reference_number: String,
    /// First day of the accounting period
    pub period_start: Option<NaiveDate>,
    /// Last day of the accounting period
    pub period_end: Option<NaiveDate>,
    /// Date the filing was registered
    pub deposit_date: Option<NaiveDate>,
    /// URL of the detail document; absent for filings without structured data
    pub data_locator: Option<String>,
    /// Accounting schema
    pub model_type: Option<ModelType>,
    /// Legal form code
    pub legal_form: Option<String>,
    /// NACE activity code
    pub activity_code: Option<String>,
    /// Company name at deposit time
    pub enterprise_name: Option<String>,
    /// Initial deposit or correction
    pub deposit_type: Option<String>,
    /// Filing language
    pub language: Option<String>,
    /// Reporting currency
    pub currency: Option<String>,
}

impl From<RawReference> for FilingReference {
    fn from(raw: RawReference) -> Self {
        let dates = raw.exercise_dates.unwrap_or_default();
        let date = |field: Option<&String>| field.and_then(|d| wire::parse_date(d));

        Self {
            period_start: date(dates.start_date.as_ref()),
            period_end: date(dates.end_date.as_ref()),
            deposit_date: date(raw.deposit_date.as_ref()),
            data_locator: raw.accounting_data_url.filter(|url| !url.trim().is_empty()),
            model_type: raw.model_type.as_deref().map(ModelType::from_code),
            reference_number: raw.reference_number,
            legal_form: raw.legal_form,
            activity_code: raw.activity_code,
            enterprise_name: raw.enterprise_name,
            deposit_type: raw.deposit_type,
            language: raw.language,
            currency: raw.currency,
        }
    }
}

impl From<FilingReference> for RawReference {
    fn from(reference: FilingReference) -> Self {
        let text = |date: Option<NaiveDate>| date.map(|d| d.to_string());
        let exercise_dates = (reference.period_start.is_some() || reference.period_end.is_some())
            .then(|| RawExerciseDates {
                start_date: text(reference.period_start),
                end_date: text(reference.period_end),
            });

        Self {
            reference_number: reference.reference_number,
            deposit_date: text(reference.deposit_date),
            exercise_dates,
            accounting_data_url: reference.data_locator,
            model_type: reference.model_type.map(|m| m.code().to_string()),
            legal_form: reference.legal_form,
            activity_code: reference.activity_code,
            enterprise_name: reference.enterprise_name,
            deposit_type: reference.deposit_type,
            language: reference.language,
            currency: reference.currency,
        }
    }
}

impl FilingReference {
    /// Create a reference with only an identifier; every other field empty.
    pub fn new(reference_number: impl Into<String>) -> Self {
        Self {
            reference_number: reference_number.into(),
            period_start: None,
            period_end: None,
            deposit_date: None,
            data_locator: None,
            model_type: None,
            legal_form: None,
            activity_code: None,
            enterprise_name: None,
            deposit_type: None,
            language: None,
            currency: None,
        }
    }

    /// Set the accounting period.
    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period_start = Some(start);
        self.period_end = Some(end);
        self
    }

    /// Set the deposit date.
    pub fn with_deposit_date(mut self, deposit_date: NaiveDate) -> Self {
        self.deposit_date = Some(deposit_date);
        self
    }

    /// Set the detail-document locator.
    pub fn with_data_locator(mut self, url: impl Into<String>) -> Self {
        self.data_locator = Some(url.into());
        self
    }

    /// Set the model type.
    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self
    }

    /// Set the activity code.
    pub fn with_activity_code(mut self, code: impl Into<String>) -> Self {
        self.activity_code = Some(code.into());
        self
    }

    /// Parse the registry's reference list.
    ///
    /// # Errors
    /// Returns [`DataError::Serialization`] if the body is not a JSON array of
    /// reference objects.
    pub fn parse_list(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// True when the reference has a data locator, a complete accounting
    /// period and a deposit date.
    pub const fn is_eligible(&self) -> bool {
        self.data_locator.is_some()
            && self.period_start.is_some()
            && self.period_end.is_some()
            && self.deposit_date.is_some()
    }

    /// Length of the accounting period in days, end minus start.
    pub fn period_days(&self) -> Option<i64> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start).num_days()),
            _ => None,
        }
    }
}

/// Outcome of asking the registry for a company's references.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceLookup {
    /// The registry knows the company; the list may still be empty
    Found(Vec<FilingReference>),
    /// The registry has no filings for this company number
    NotFound,
}

impl ReferenceLookup {
    /// True for [`ReferenceLookup::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// References found, or an empty list.
    pub fn into_references(self) -> Vec<FilingReference> {
        match self {
            Self::Found(references) => references,
            Self::NotFound => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SortKey {
    period_end: NaiveDate,
    deposit_date: NaiveDate,
    period_start: NaiveDate,
}

/// Select the authoritative filing for each of the latest `year_span`
/// accounting periods.
///
/// 1. References without a data locator (or without period or deposit
///    dates) are dropped.
/// 2. The rest are ordered by period end, then deposit date.
/// 3. Per `(period_start, period_end)` pair the last one in that order wins,
///    so a correction replaces the filing it corrects.
/// 4. The survivors are ordered by period end and the last `year_span` are
///    returned.
///
/// # Errors
/// Returns [`DataError::InvalidYearSpan`] when `year_span` is zero.
pub fn resolve(
    references: Vec<FilingReference>,
    year_span: usize,
) -> Result<Vec<FilingReference>> {
    if year_span == 0 {
        return Err(DataError::InvalidYearSpan(year_span));
    }

    let total = references.len();
    let mut eligible: Vec<(SortKey, FilingReference)> = references
        .into_iter()
        .filter_map(|r| {
            let key = SortKey {
                period_end: r.period_end?,
                deposit_date: r.deposit_date?,
                period_start: r.period_start?,
            };
            r.data_locator.is_some().then_some((key, r))
        })
        .collect();

    // Ties on deposit date fall back to the reference number, which the
    // registry hands out in deposit order.
    eligible.sort_by(|(a, ra), (b, rb)| {
        (a.period_end, a.deposit_date)
            .cmp(&(b.period_end, b.deposit_date))
            .then_with(|| ra.reference_number.cmp(&rb.reference_number))
    });

    let mut by_period: HashMap<(NaiveDate, NaiveDate), (SortKey, FilingReference)> =
        HashMap::new();
    for (key, reference) in eligible {
        by_period.insert((key.period_start, key.period_end), (key, reference));
    }

    let mut resolved: Vec<_> = by_period.into_values().collect();
    resolved.sort_by_key(|(key, _)| (key.period_end, key.period_start));

    let skip = resolved.len().saturating_sub(year_span);
    let resolved: Vec<FilingReference> = resolved
        .into_iter()
        .skip(skip)
        .map(|(_, reference)| reference)
        .collect();

    tracing::info!(
        total,
        resolved = resolved.len(),
        year_span,
        "resolved filing references"
    );

    Ok(resolved)
}
