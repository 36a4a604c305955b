//! Margins on turnover

use super::ebit::{ebit, ebit_codes, ebitda, ebitda_codes};
use crate::metric::{Metric, code_list, require_full_model};
use crate::outcome::MetricOutcome;
use crate::registry::MetricCategory;
use balans_data::PeriodFigures;
use balans_data::lookup::codes;

fn margin(figures: &PeriodFigures, result: f64) -> MetricOutcome {
    match require_full_model(figures) {
        Ok(()) => MetricOutcome::ratio(result, figures.value(codes::TURNOVER)),
        Err(reason) => reason.into(),
    }
}

/// EBIT / 70
#[derive(Debug, Clone, Copy, Default)]
pub struct EbitMargin;

impl Metric for EbitMargin {
    fn name(&self) -> &'static str {
        "ebit_margin"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Profitability
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[&ebit_codes(), &[codes::TURNOVER]])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        margin(figures, ebit(figures))
    }
}

/// EBITDA / 70
#[derive(Debug, Clone, Copy, Default)]
pub struct EbitdaMargin;

impl Metric for EbitdaMargin {
    fn name(&self) -> &'static str {
        "ebitda_margin"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Profitability
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[&ebitda_codes(), &[codes::TURNOVER]])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        margin(figures, ebitda(figures))
    }
}

/// 9904 / 70
#[derive(Debug, Clone, Copy, Default)]
pub struct NetMargin;

impl Metric for NetMargin {
    fn name(&self) -> &'static str {
        "net_margin"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Profitability
    }

    fn required_codes(&self) -> Vec<&'static str> {
        vec![codes::PROFIT_FOR_PERIOD, codes::TURNOVER]
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        margin(figures, figures.value(codes::PROFIT_FOR_PERIOD))
    }
}
