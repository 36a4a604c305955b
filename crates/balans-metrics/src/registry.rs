//! Metric Registry
//!
//! Central registry for all available metrics. Allows lookup and
//! instantiation by name.

use crate::cycle::{
    CashConversionCycle, DaysInventoryFinished, DaysInventoryRaw, DaysPayablesOutstanding,
    DaysSalesOutstanding,
};
use crate::metric::Metric;
use crate::outcome::MetricOutcome;
use crate::profitability::{Ebit, EbitMargin, Ebitda, EbitdaMargin, NetMargin};
use balans_data::PeriodFigures;
use std::collections::HashMap;

/// Available metric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MetricCategory {
    /// Working-capital cycle in days
    #[display("working capital")]
    WorkingCapital,
    /// Operating results and margins
    #[display("profitability")]
    Profitability,
}

/// Metric metadata
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric name (unique identifier)
    pub name: &'static str,
    /// Metric category
    pub category: MetricCategory,
    /// Brief description of what the metric measures
    pub description: &'static str,
    /// True when the metric needs a full-year period
    pub full_year_only: bool,
    /// True when the metric needs a full-schema filing
    pub full_model_only: bool,
}

/// Get all available metric info
pub fn available_metrics() -> Vec<MetricInfo> {
    vec![
        // Working capital
        MetricInfo {
            name: "dso",
            category: MetricCategory::WorkingCapital,
            description: "Days sales outstanding - days customers take to pay",
            full_year_only: true,
            full_model_only: true,
        },
        MetricInfo {
            name: "dio_raw",
            category: MetricCategory::WorkingCapital,
            description: "Days inventory outstanding for raw materials and goods for resale",
            full_year_only: true,
            full_model_only: true,
        },
        MetricInfo {
            name: "dio_finished",
            category: MetricCategory::WorkingCapital,
            description: "Days inventory outstanding for work in progress and finished goods",
            full_year_only: true,
            full_model_only: true,
        },
        MetricInfo {
            name: "dpo",
            category: MetricCategory::WorkingCapital,
            description: "Days payables outstanding - days taken to pay suppliers",
            full_year_only: true,
            full_model_only: true,
        },
        MetricInfo {
            name: "ccc",
            category: MetricCategory::WorkingCapital,
            description: "Cash conversion cycle - DSO + DIO - DPO",
            full_year_only: true,
            full_model_only: true,
        },
        // Profitability
        MetricInfo {
            name: "ebit",
            category: MetricCategory::Profitability,
            description: "Earnings before interest and taxes",
            full_year_only: false,
            full_model_only: false,
        },
        MetricInfo {
            name: "ebitda",
            category: MetricCategory::Profitability,
            description: "EBIT before depreciation and write-downs",
            full_year_only: false,
            full_model_only: false,
        },
        MetricInfo {
            name: "ebit_margin",
            category: MetricCategory::Profitability,
            description: "EBIT over turnover",
            full_year_only: false,
            full_model_only: true,
        },
        MetricInfo {
            name: "ebitda_margin",
            category: MetricCategory::Profitability,
            description: "EBITDA over turnover",
            full_year_only: false,
            full_model_only: true,
        },
        MetricInfo {
            name: "net_margin",
            category: MetricCategory::Profitability,
            description: "Profit for the period over turnover",
            full_year_only: false,
            full_model_only: true,
        },
    ]
}

/// Get metrics by category
pub fn metrics_by_category(category: MetricCategory) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|m| m.category == category)
        .collect()
}

/// Get metric info by name
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics().into_iter().find(|m| m.name == name)
}

/// Count metrics by category
pub fn count_by_category() -> HashMap<MetricCategory, usize> {
    let mut counts = HashMap::new();
    for metric in available_metrics() {
        *counts.entry(metric.category).or_insert(0) += 1;
    }
    counts
}

/// Every metric with its default configuration, in registry order.
pub fn all_metrics() -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(DaysSalesOutstanding::default()),
        Box::new(DaysInventoryRaw::default()),
        Box::new(DaysInventoryFinished::default()),
        Box::new(DaysPayablesOutstanding::default()),
        Box::new(CashConversionCycle::default()),
        Box::new(Ebit),
        Box::new(Ebitda),
        Box::new(EbitMargin),
        Box::new(EbitdaMargin),
        Box::new(NetMargin),
    ]
}

/// Instantiate a metric by name.
pub fn metric_by_name(name: &str) -> Option<Box<dyn Metric>> {
    all_metrics().into_iter().find(|m| m.name() == name)
}

/// Compute every metric for one period, in registry order.
pub fn compute_all(figures: &PeriodFigures) -> Vec<(&'static str, MetricOutcome)> {
    all_metrics()
        .iter()
        .map(|metric| (metric.name(), metric.compute(figures)))
        .collect()
}
