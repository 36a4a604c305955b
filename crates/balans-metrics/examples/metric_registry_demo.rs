//! Demonstration of the metric registry
//!
//! This example shows how to:
//! - List all available metrics
//! - Compute every metric for one period of a filing
//!
//! Run with: cargo run --example metric_registry_demo -p balans-metrics

use balans_data::cbso::{FilingReference, ModelType, PeriodSymbol};
use balans_data::{FilingRecord, PeriodFigures};
use balans_metrics::{MetricCategory, MetricOutcome, compute_all, metrics_by_category};
use chrono::NaiveDate;

const DOCUMENT: &str = r#"{
    "ReferenceNumber": "2024-00000042",
    "EnterpriseName": "VOORBEELD BV",
    "Rubrics": [
        {"Code": "70", "Period": "N", "Value": 2500000},
        {"Code": "40", "Period": "N", "Value": 410000},
        {"Code": "44", "Period": "N", "Value": 260000},
        {"Code": "60", "Period": "N", "Value": 1400000},
        {"Code": "600/8", "Period": "N", "Value": 1380000},
        {"Code": "61", "Period": "N", "Value": 420000},
        {"Code": "62", "Period": "N", "Value": 380000},
        {"Code": "630", "Period": "N", "Value": 90000},
        {"Code": "30/31", "Period": "N", "Value": 150000},
        {"Code": "33", "Period": "N", "Value": 95000},
        {"Code": "9903", "Period": "N", "Value": 170000},
        {"Code": "650", "Period": "N", "Value": 12000},
        {"Code": "9904", "Period": "N", "Value": 128000}
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Balans Metric Registry Demo");
    println!("===========================\n");

    for (category, title) in [
        (MetricCategory::WorkingCapital, "Working Capital"),
        (MetricCategory::Profitability, "Profitability"),
    ] {
        println!("{title}");
        println!("{}", "-".repeat(title.len()));
        for info in metrics_by_category(category) {
            println!("  {:15} {}", info.name, info.description);
        }
        println!();
    }

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("invalid date")?;
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).ok_or("invalid date")?;
    let reference = FilingReference::new("2024-00000042")
        .with_period(start, end)
        .with_model_type(ModelType::Full)
        .with_activity_code("25110");

    let record = FilingRecord::parse(DOCUMENT)?.with_reference(&reference);
    let figures =
        PeriodFigures::from_record(&record, &PeriodSymbol::Current).ok_or("no current year")?;

    println!("Metrics for {} ({} days)", record.reference_number, figures.period_days().unwrap_or(0));
    println!("--------------------------------------");
    for (name, outcome) in compute_all(&figures) {
        match outcome {
            MetricOutcome::Value(v) => println!("  {name:15} {v:>12.2}"),
            MetricOutcome::Skipped(reason) => println!("  {name:15} skipped: {reason}"),
        }
    }

    Ok(())
}
