//! Filing fetch orchestration.
//!
//! [`FilingFetcher`] resolves a company's references and downloads the detail
//! document of each resolved filing. Failures are isolated per filing: the
//! result is a [`FilingSet`] holding a record or a [`FetchError`] for every
//! requested reference. Only rate limiting aborts a call.

use super::client::FilingSource;
use super::record::FilingRecord;
use super::references::{self, FilingReference, ReferenceLookup};
use crate::company::CompanyNumber;
use crate::error::{FetchError, Result};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Progress callback: `(completed, total, reference_number)`.
pub type ProgressFn = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Outcome of fetching a batch of filings, keyed by reference number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilingSet {
    entries: BTreeMap<String, std::result::Result<FilingRecord, FetchError>>,
}

impl FilingSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one reference. A later outcome for the same
    /// reference replaces the earlier one.
    pub fn insert(
        &mut self,
        reference_number: impl Into<String>,
        outcome: std::result::Result<FilingRecord, FetchError>,
    ) {
        self.entries.insert(reference_number.into(), outcome);
    }

    /// Outcome for one reference.
    pub fn get(&self, reference_number: &str) -> Option<&std::result::Result<FilingRecord, FetchError>> {
        self.entries.get(reference_number)
    }

    /// Successfully parsed records, ordered by reference number.
    pub fn records(&self) -> impl Iterator<Item = &FilingRecord> {
        self.entries.values().filter_map(|outcome| outcome.as_ref().ok())
    }

    /// Failed references and why they failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.entries
            .iter()
            .filter_map(|(reference, outcome)| outcome.as_ref().err().map(|e| (reference.as_str(), e)))
    }

    /// Record covering the most recent accounting period.
    pub fn latest(&self) -> Option<&FilingRecord> {
        self.records().max_by_key(|record| record.period_end)
    }

    /// Iterate over every outcome.
    pub fn iter(&self) -> btree_map::Iter<'_, String, std::result::Result<FilingRecord, FetchError>> {
        self.entries.iter()
    }

    /// Number of references in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no reference was fetched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drives a [`FilingSource`] through resolution and detail fetches.
pub struct FilingFetcher<S> {
    source: S,
    progress: Option<ProgressFn>,
}

impl<S: FilingSource> FilingFetcher<S> {
    /// Create a fetcher over a source.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            progress: None,
        }
    }

    /// Report progress after every detail fetch.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// List and resolve a company's references.
    ///
    /// # Arguments
    /// * `company` - Validated company number
    /// * `year_span` - Number of most recent accounting periods to keep
    ///
    /// # Returns
    /// The resolved references, oldest period first. A company unknown to the
    /// registry yields an empty list.
    ///
    /// # Errors
    /// Returns an error for a zero year span, transport failures and rate
    /// limiting.
    pub async fn fetch_references(
        &self,
        company: &CompanyNumber,
        year_span: usize,
    ) -> Result<Vec<FilingReference>> {
        if year_span == 0 {
            return Err(crate::DataError::InvalidYearSpan(year_span));
        }

        match self.source.references(company).await? {
            ReferenceLookup::Found(raw) => references::resolve(raw, year_span),
            ReferenceLookup::NotFound => {
                tracing::info!(%company, "no filings found");
                Ok(Vec::new())
            }
        }
    }

    /// Download and parse the detail document of every reference.
    ///
    /// References are fetched one after the other. Each reference ends up in
    /// the returned set either as a record, carrying the reference's period
    /// bounds and classification, or as the [`FetchError`] that stopped it.
    ///
    /// # Errors
    /// Returns [`DataError::RateLimited`](crate::DataError::RateLimited) as
    /// soon as the registry signals it; records fetched so far are dropped.
    pub async fn fetch_filings(
        &self,
        company: &CompanyNumber,
        references: &[FilingReference],
    ) -> Result<FilingSet> {
        let total = references.len();
        let mut set = FilingSet::new();

        for (idx, reference) in references.iter().enumerate() {
            let outcome = self.fetch_one(reference).await?;
            if let Err(err) = &outcome {
                tracing::warn!(
                    %company,
                    reference = %reference.reference_number,
                    error = %err,
                    "filing skipped"
                );
            }
            set.insert(reference.reference_number.clone(), outcome);

            if let Some(progress) = &self.progress {
                progress(idx + 1, total, &reference.reference_number);
            }
        }

        tracing::info!(
            %company,
            fetched = set.records().count(),
            failed = set.failures().count(),
            "filings fetched"
        );
        Ok(set)
    }

    /// Resolve and fetch in one call.
    ///
    /// # Errors
    /// See [`fetch_references`](Self::fetch_references) and
    /// [`fetch_filings`](Self::fetch_filings).
    pub async fn fetch_company(&self, company: &CompanyNumber, year_span: usize) -> Result<FilingSet> {
        let resolved = self.fetch_references(company, year_span).await?;
        self.fetch_filings(company, &resolved).await
    }

    /// Fetch one filing. The outer error is fatal, the inner one is not.
    async fn fetch_one(
        &self,
        reference: &FilingReference,
    ) -> Result<std::result::Result<FilingRecord, FetchError>> {
        if reference.data_locator.is_none() {
            return Ok(Err(FetchError::NoLocator(reference.reference_number.clone())));
        }

        let body = match self.source.filing_document(reference).await {
            Ok(body) => body,
            Err(err) if err.is_rate_limited() => return Err(err),
            Err(err) => return Ok(Err(err.into())),
        };

        let record = match FilingRecord::parse(&body) {
            Ok(record) => record,
            Err(err) => return Ok(Err(err.into())),
        };

        if record.reference_number != reference.reference_number {
            return Ok(Err(FetchError::ReferenceMismatch {
                requested: reference.reference_number.clone(),
                received: record.reference_number,
            }));
        }

        Ok(Ok(record.with_reference(reference)))
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for FilingFetcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilingFetcher")
            .field("source", &self.source)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}
