//! Days Sales Outstanding
//!
//! Average number of days customers take to pay: trade receivables (plus
//! endorsed bills still in circulation) over sales including the VAT charged
//! on them.

use super::CycleConfig;
use crate::metric::{Metric, code_list};
use crate::outcome::MetricOutcome;
use crate::registry::MetricCategory;
use balans_data::PeriodFigures;
use balans_data::lookup::codes;

const RECEIVABLES: [&str; 2] = [codes::TRADE_RECEIVABLES, codes::ENDORSED_TRADE_BILLS];
const SALES: [&str; 3] = [codes::TURNOVER, codes::OTHER_OPERATING_INCOME, codes::VAT_CHARGED_BY_COMPANY];

/// (40 + 9150) / (70 + 74 − 740 + 9146) × 365
#[derive(Debug, Clone, Default)]
pub struct DaysSalesOutstanding {
    config: CycleConfig,
}

impl DaysSalesOutstanding {
    /// Create with a custom configuration.
    pub const fn with_config(config: CycleConfig) -> Self {
        Self { config }
    }
}

impl Metric for DaysSalesOutstanding {
    fn name(&self) -> &'static str {
        "dso"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::WorkingCapital
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[&RECEIVABLES, &SALES, &[codes::OPERATING_SUBSIDIES]])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        let receivables = figures.sum(&RECEIVABLES);
        let sales = figures.sum(&SALES) - figures.value(codes::OPERATING_SUBSIDIES);
        self.config.days(figures, receivables, sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::SkipReason;
    use crate::test_support::figures;
    use approx::assert_relative_eq;
    use balans_data::cbso::ModelType;

    #[test]
    fn test_dso() {
        // 100 / 1000 * 365 = 36.5 -> 36
        let f = figures(
            364,
            ModelType::Full,
            None,
            &[("40", 90.0), ("9150", 10.0), ("70", 900.0), ("74", 150.0), ("740", 50.0)],
        );
        assert_eq!(DaysSalesOutstanding::default().compute(&f), MetricOutcome::Value(36.0));

        let unrounded = DaysSalesOutstanding::with_config(CycleConfig {
            round: false,
            ..CycleConfig::default()
        });
        assert_relative_eq!(unrounded.compute(&f).value().unwrap(), 36.5);
    }

    #[test]
    fn test_dso_skips() {
        let short = figures(200, ModelType::Full, None, &[("40", 90.0), ("70", 900.0)]);
        assert_eq!(
            DaysSalesOutstanding::default().compute(&short),
            MetricOutcome::Skipped(SkipReason::NotFullYear)
        );

        let abbreviated = figures(364, ModelType::Abbreviated, None, &[("40", 90.0), ("70", 900.0)]);
        assert_eq!(
            DaysSalesOutstanding::default().compute(&abbreviated),
            MetricOutcome::Skipped(SkipReason::ModelNotApplicable)
        );

        let no_sales = figures(364, ModelType::Full, None, &[("40", 90.0), ("74", 50.0), ("740", 50.0)]);
        assert_eq!(
            DaysSalesOutstanding::default().compute(&no_sales),
            MetricOutcome::Skipped(SkipReason::ZeroDivision)
        );
    }
}
