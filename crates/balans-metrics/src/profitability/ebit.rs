//! EBIT and EBITDA

use crate::metric::{Metric, code_list};
use crate::outcome::MetricOutcome;
use crate::registry::MetricCategory;
use balans_data::PeriodFigures;
use balans_data::lookup::codes;

const FINANCIAL_INCOME: [&str; 4] = [
    codes::FINANCIAL_FIXED_ASSET_INCOME,
    codes::CURRENT_ASSET_INCOME,
    codes::OTHER_FINANCIAL_INCOME,
    codes::NON_RECURRING_FINANCIAL_INCOME,
];

const FINANCIAL_CHARGES: [&str; 3] = [
    codes::DEBT_CHARGES,
    codes::OTHER_FINANCIAL_CHARGES,
    codes::NON_RECURRING_FINANCIAL_CHARGES,
];

const DEPRECIATION_AND_WRITE_DOWNS: [&str; 3] = [
    codes::DEPRECIATION,
    codes::STOCK_WRITE_DOWNS,
    codes::OTHER_CURRENT_WRITE_DOWNS,
];

/// Codes read by [`ebit`].
pub(crate) fn ebit_codes() -> Vec<&'static str> {
    code_list(&[&[codes::PROFIT_BEFORE_TAX], &FINANCIAL_INCOME, &FINANCIAL_CHARGES])
}

/// Codes read by [`ebitda`].
pub(crate) fn ebitda_codes() -> Vec<&'static str> {
    code_list(&[&ebit_codes(), &DEPRECIATION_AND_WRITE_DOWNS])
}

/// Profit before tax with financial results added back.
pub(crate) fn ebit(figures: &PeriodFigures) -> f64 {
    figures.value(codes::PROFIT_BEFORE_TAX) - figures.sum(&FINANCIAL_INCOME)
        + figures.sum(&FINANCIAL_CHARGES)
}

/// EBIT with depreciation and write-downs added back.
pub(crate) fn ebitda(figures: &PeriodFigures) -> f64 {
    ebit(figures) + figures.sum(&DEPRECIATION_AND_WRITE_DOWNS)
}

/// 9903 − 750 − 751 − 752/9 + 650 + 652/9 − 76B + 66B
#[derive(Debug, Clone, Copy, Default)]
pub struct Ebit;

impl Metric for Ebit {
    fn name(&self) -> &'static str {
        "ebit"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Profitability
    }

    fn required_codes(&self) -> Vec<&'static str> {
        ebit_codes()
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        MetricOutcome::Value(ebit(figures))
    }
}

/// EBIT + 630 + 631/4 + 651
#[derive(Debug, Clone, Copy, Default)]
pub struct Ebitda;

impl Metric for Ebitda {
    fn name(&self) -> &'static str {
        "ebitda"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Profitability
    }

    fn required_codes(&self) -> Vec<&'static str> {
        ebitda_codes()
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        MetricOutcome::Value(ebitda(figures))
    }
}
