//! Days Payables Outstanding
//!
//! Average number of days the company takes to pay its suppliers.

use super::CycleConfig;
use crate::metric::{Metric, code_list};
use crate::outcome::MetricOutcome;
use crate::registry::MetricCategory;
use balans_data::PeriodFigures;
use balans_data::lookup::codes;

const PURCHASES: [&str; 3] = [codes::PURCHASES, codes::SERVICES, codes::VAT_CHARGED_TO_COMPANY];

/// 44 / (600/8 + 61 + 9145) × 365
#[derive(Debug, Clone, Default)]
pub struct DaysPayablesOutstanding {
    config: CycleConfig,
}

impl DaysPayablesOutstanding {
    /// Create with a custom configuration.
    pub const fn with_config(config: CycleConfig) -> Self {
        Self { config }
    }
}

impl Metric for DaysPayablesOutstanding {
    fn name(&self) -> &'static str {
        "dpo"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::WorkingCapital
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[&[codes::TRADE_PAYABLES], &PURCHASES])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        let payables = figures.value(codes::TRADE_PAYABLES);
        self.config.days(figures, payables, figures.sum(&PURCHASES))
    }
}
