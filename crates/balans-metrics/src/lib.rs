#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/balans/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cycle;
pub mod metric;
pub mod outcome;
pub mod profitability;
pub mod registry;
pub mod sector;

pub use metric::Metric;
pub use outcome::{MetricOutcome, SkipReason};

// Re-export registry types for convenience
pub use registry::{
    MetricCategory, MetricInfo, all_metrics, available_metrics, compute_all, get_metric_info,
    metric_by_name, metrics_by_category,
};
