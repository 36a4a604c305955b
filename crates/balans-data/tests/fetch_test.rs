//! Fetch orchestration against an in-memory filing source

use async_trait::async_trait;
use balans_data::cbso::{FilingSource, ModelType, ReferenceLookup};
use balans_data::{
    CompanyNumber, DataError, FetchError, FilingFetcher, FilingReference, Result,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Reply {
    Body(String),
    Status(u16),
    RateLimited,
}

#[derive(Default)]
struct StubSource {
    lookup: Option<Vec<FilingReference>>,
    documents: HashMap<String, Reply>,
    calls: AtomicUsize,
}

impl StubSource {
    fn document(mut self, reference: &str, reply: Reply) -> Self {
        self.documents.insert(reference.to_string(), reply);
        self
    }
}

#[async_trait]
impl FilingSource for StubSource {
    async fn references(&self, _company: &CompanyNumber) -> Result<ReferenceLookup> {
        Ok(match &self.lookup {
            Some(refs) => ReferenceLookup::Found(refs.clone()),
            None => ReferenceLookup::NotFound,
        })
    }

    async fn filing_document(&self, reference: &FilingReference) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.documents.get(&reference.reference_number) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(DataError::Http {
                status: *status,
                url: format!("stub://{}", reference.reference_number),
            }),
            Some(Reply::RateLimited) => Err(DataError::RateLimited {
                retry_after_secs: None,
            }),
            None => Err(DataError::Http {
                status: 404,
                url: format!("stub://{}", reference.reference_number),
            }),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reference(number: &str, year: i32, deposited: NaiveDate) -> FilingReference {
    FilingReference::new(number)
        .with_period(date(year, 1, 1), date(year, 12, 31))
        .with_deposit_date(deposited)
        .with_data_locator(format!("stub://{number}"))
        .with_model_type(ModelType::Full)
        .with_activity_code("41201")
}

fn document(number: &str, turnover: f64) -> String {
    format!(
        r#"{{"ReferenceNumber": "{number}", "EnterpriseName": "BOUWBEDRIJF",
            "Rubrics": [{{"Code": "70", "Period": "N", "Value": {turnover}}}]}}"#
    )
}

fn company() -> CompanyNumber {
    CompanyNumber::parse("0428003392").unwrap()
}

#[tokio::test]
async fn test_fetch_references_resolves() {
    let source = StubSource {
        lookup: Some(vec![
            reference("2022-1", 2021, date(2022, 6, 1)),
            reference("2023-1", 2022, date(2023, 6, 1)),
            reference("2023-2", 2022, date(2023, 9, 1)),
            reference("2024-1", 2023, date(2024, 6, 1)),
        ]),
        ..StubSource::default()
    };
    let fetcher = FilingFetcher::new(source);

    let resolved = fetcher.fetch_references(&company(), 2).await.unwrap();
    let numbers: Vec<&str> = resolved.iter().map(|r| r.reference_number.as_str()).collect();
    assert_eq!(numbers, vec!["2023-2", "2024-1"]);
}

#[tokio::test]
async fn test_fetch_references_not_found_is_empty() {
    let fetcher = FilingFetcher::new(StubSource::default());
    let resolved = fetcher.fetch_references(&company(), 3).await.unwrap();
    assert!(resolved.is_empty());
}

#[tokio::test]
async fn test_fetch_references_rejects_zero_span() {
    let fetcher = FilingFetcher::new(StubSource::default());
    let err = fetcher.fetch_references(&company(), 0).await.unwrap_err();
    assert!(matches!(err, DataError::InvalidYearSpan(0)));
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let source = StubSource::default()
        .document("2022-1", Reply::Body(document("2022-1", 800.0)))
        .document("2023-1", Reply::Status(500))
        .document("2024-1", Reply::Body("<xbrl>not json</xbrl>".to_string()))
        .document("2025-1", Reply::Body(document("2099-9", 1.0)));

    let refs = vec![
        reference("2022-1", 2021, date(2022, 6, 1)),
        reference("2023-1", 2022, date(2023, 6, 1)),
        reference("2024-1", 2023, date(2024, 6, 1)),
        reference("2025-1", 2024, date(2025, 6, 1)),
        FilingReference::new("2025-2"),
    ];

    let fetcher = FilingFetcher::new(source);
    let set = fetcher.fetch_filings(&company(), &refs).await.unwrap();

    assert_eq!(set.len(), 5);
    assert_eq!(set.records().count(), 1);
    // the reference without locator never reaches the source
    assert_eq!(fetcher.source().calls.load(Ordering::SeqCst), 4);

    let record = set.get("2022-1").unwrap().as_ref().unwrap();
    assert_eq!(record.period_end, Some(date(2021, 12, 31)));
    assert_eq!(record.activity_code.as_deref(), Some("41201"));

    assert_eq!(
        set.get("2023-1").unwrap().as_ref().unwrap_err(),
        &FetchError::Http { status: 500 }
    );
    assert!(matches!(
        set.get("2024-1").unwrap(),
        Err(FetchError::NotJsonXbrl(_))
    ));
    assert_eq!(
        set.get("2025-1").unwrap().as_ref().unwrap_err(),
        &FetchError::ReferenceMismatch {
            requested: "2025-1".to_string(),
            received: "2099-9".to_string(),
        }
    );
    assert_eq!(
        set.get("2025-2").unwrap().as_ref().unwrap_err(),
        &FetchError::NoLocator("2025-2".to_string())
    );

    let failed: Vec<&str> = set.failures().map(|(reference, _)| reference).collect();
    assert_eq!(failed, vec!["2023-1", "2024-1", "2025-1", "2025-2"]);
}

#[tokio::test]
async fn test_rate_limit_aborts() {
    let source = StubSource::default()
        .document("2022-1", Reply::Body(document("2022-1", 800.0)))
        .document("2023-1", Reply::RateLimited)
        .document("2024-1", Reply::Body(document("2024-1", 900.0)));

    let refs = vec![
        reference("2022-1", 2021, date(2022, 6, 1)),
        reference("2023-1", 2022, date(2023, 6, 1)),
        reference("2024-1", 2023, date(2024, 6, 1)),
    ];

    let fetcher = FilingFetcher::new(source);
    let err = fetcher.fetch_filings(&company(), &refs).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(fetcher.source().calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_latest_and_progress() {
    let source = StubSource::default()
        .document("2023-1", Reply::Body(document("2023-1", 800.0)))
        .document("2024-1", Reply::Body(document("2024-1", 900.0)));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let fetcher = FilingFetcher::new(source).with_progress(Box::new(move |done, total, reference| {
        sink.lock().unwrap().push((done, total, reference.to_string()));
    }));

    let refs = vec![
        reference("2024-1", 2023, date(2024, 6, 1)),
        reference("2023-1", 2022, date(2023, 6, 1)),
    ];
    let set = fetcher.fetch_filings(&company(), &refs).await.unwrap();

    let latest = set.latest().unwrap();
    assert_eq!(latest.reference_number, "2024-1");

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![(1, 2, "2024-1".to_string()), (2, 2, "2023-1".to_string())]
    );
}
