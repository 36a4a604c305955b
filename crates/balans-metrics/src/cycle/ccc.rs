//! Cash Conversion Cycle
//!
//! Days between paying suppliers and collecting from customers.

use super::{
    CycleConfig, DaysInventoryFinished, DaysInventoryRaw, DaysPayablesOutstanding,
    DaysSalesOutstanding,
};
use crate::metric::{Metric, code_list};
use crate::outcome::MetricOutcome;
use crate::registry::MetricCategory;
use balans_data::PeriodFigures;

/// DSO + DIO raw + DIO finished − DPO
///
/// The first component that skips decides the outcome.
#[derive(Debug, Clone, Default)]
pub struct CashConversionCycle {
    dso: DaysSalesOutstanding,
    dio_raw: DaysInventoryRaw,
    dio_finished: DaysInventoryFinished,
    dpo: DaysPayablesOutstanding,
}

impl CashConversionCycle {
    /// Create with a configuration shared by all components.
    pub const fn with_config(config: CycleConfig) -> Self {
        Self {
            dso: DaysSalesOutstanding::with_config(config),
            dio_raw: DaysInventoryRaw::with_config(config),
            dio_finished: DaysInventoryFinished::with_config(config),
            dpo: DaysPayablesOutstanding::with_config(config),
        }
    }
}

impl Metric for CashConversionCycle {
    fn name(&self) -> &'static str {
        "ccc"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::WorkingCapital
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[
            &self.dso.required_codes(),
            &self.dio_raw.required_codes(),
            &self.dio_finished.required_codes(),
            &self.dpo.required_codes(),
        ])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        self.dso.compute(figures).and_then(|dso| {
            self.dio_raw.compute(figures).and_then(|raw| {
                self.dio_finished.compute(figures).and_then(|finished| {
                    self.dpo
                        .compute(figures)
                        .map(|dpo| dso + raw + finished - dpo)
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::SkipReason;
    use crate::test_support::figures;
    use balans_data::cbso::ModelType;

    #[test]
    fn test_ccc() {
        let f = figures(
            364,
            ModelType::Full,
            None,
            &[
                ("40", 100.0),
                ("70", 1000.0),   // dso 36.5 -> 36
                ("30/31", 50.0),
                ("60", 365.0),    // dio raw 50
                ("32", 73.0),
                ("61", 365.0),    // dio finished 73 / 730 * 365 = 36.5 -> 36
                ("44", 100.0),
                ("600/8", 365.0), // dpo 100 / 730 * 365 = 50
            ],
        );
        assert_eq!(CashConversionCycle::default().compute(&f), MetricOutcome::Value(72.0));
    }

    #[test]
    fn test_first_skip_wins() {
        // sales are zero and so are purchases: the receivables side reports first
        let f = figures(364, ModelType::Full, None, &[("40", 100.0), ("60", 10.0)]);
        assert_eq!(
            CashConversionCycle::default().compute(&f),
            MetricOutcome::Skipped(SkipReason::ZeroDivision)
        );

        let f = figures(100, ModelType::Full, None, &[("40", 100.0), ("70", 10.0)]);
        assert_eq!(
            CashConversionCycle::default().compute(&f),
            MetricOutcome::Skipped(SkipReason::NotFullYear)
        );
    }

    #[test]
    fn test_codes_cover_components() {
        let ccc = CashConversionCycle::default();
        let codes = ccc.required_codes();
        for code in ["40", "9150", "70", "740", "30/31", "60", "32", "71", "44", "600/8"] {
            assert!(codes.contains(&code), "missing {code}");
        }
        for component in [
            DaysSalesOutstanding::default().required_codes(),
            DaysInventoryRaw::default().required_codes(),
            DaysInventoryFinished::default().required_codes(),
            DaysPayablesOutstanding::default().required_codes(),
        ] {
            assert!(component.iter().all(|code| codes.contains(code)));
        }

        let mut unique = codes.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }
}
