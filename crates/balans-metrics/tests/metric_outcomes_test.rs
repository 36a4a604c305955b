//! Metric outcomes on parsed filings

use approx::assert_relative_eq;
use balans_data::cbso::{FilingReference, ModelType, PeriodSymbol};
use balans_data::{FilingRecord, PeriodFigures};
use balans_metrics::{Metric, MetricOutcome, SkipReason, compute_all, metric_by_name};
use balans_metrics::cycle::DaysSalesOutstanding;
use chrono::{Days, NaiveDate};
use rstest::rstest;

const DOCUMENT: &str = r#"{
    "ReferenceNumber": "2024-00000007",
    "Rubrics": [
        {"Code": "70", "Period": "N", "Value": "1000.00"},
        {"Code": "40", "Period": "N", "Value": "100.00"},
        {"Code": "70", "Period": "NM1", "Value": "0"},
        {"Code": "40", "Period": "NM1", "Value": "80.00"}
    ]
}"#;

fn figures(days: u64, model: ModelType, symbol: PeriodSymbol) -> PeriodFigures {
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let start = end.checked_sub_days(Days::new(days)).unwrap();
    let reference = FilingReference::new("2024-00000007")
        .with_period(start, end)
        .with_model_type(model);
    let record = FilingRecord::parse(DOCUMENT).unwrap().with_reference(&reference);
    PeriodFigures::from_record(&record, &symbol).unwrap()
}

#[rstest]
#[case(364, MetricOutcome::Value(36.0))]
#[case(362, MetricOutcome::Value(36.0))]
#[case(361, MetricOutcome::Skipped(SkipReason::NotFullYear))]
#[case(200, MetricOutcome::Skipped(SkipReason::NotFullYear))]
fn test_day_count_needs_full_year(#[case] days: u64, #[case] expected: MetricOutcome) {
    let f = figures(days, ModelType::Full, PeriodSymbol::Current);
    assert_eq!(DaysSalesOutstanding::default().compute(&f), expected);
}

#[test]
fn test_zero_denominator_is_reported() {
    let f = figures(364, ModelType::Full, PeriodSymbol::Prior);
    let outcome = DaysSalesOutstanding::default().compute(&f);
    assert_eq!(outcome, MetricOutcome::Skipped(SkipReason::ZeroDivision));
    assert!(outcome.value().is_none());
}

#[test]
fn test_model_gate() {
    let f = figures(364, ModelType::Micro, PeriodSymbol::Current);
    let dso = metric_by_name("dso").unwrap();
    assert_eq!(
        dso.compute(&f),
        MetricOutcome::Skipped(SkipReason::ModelNotApplicable)
    );
}

#[test]
fn test_compute_all_on_parsed_filing() {
    let f = figures(364, ModelType::Full, PeriodSymbol::Current);
    let outcomes = compute_all(&f);

    let get = |name: &str| {
        outcomes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, outcome)| *outcome)
            .unwrap()
    };
    assert_eq!(get("dso"), MetricOutcome::Value(36.0));
    assert_eq!(get("dpo"), MetricOutcome::Skipped(SkipReason::ZeroDivision));
    assert_eq!(get("ccc"), MetricOutcome::Skipped(SkipReason::ZeroDivision));
    assert_relative_eq!(get("ebit").value().unwrap(), 0.0);
    assert_relative_eq!(get("net_margin").value().unwrap(), 0.0);
}
