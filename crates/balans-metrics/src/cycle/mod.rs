//! Cash-conversion cycle.
//!
//! Day counts of the working-capital cycle: how long customers take to pay,
//! how long the company takes to pay its suppliers and how long goods sit in
//! stock. They only make sense over a full year of a full-schema filing.

pub mod ccc;
pub mod dio;
pub mod dpo;
pub mod dso;

pub use ccc::CashConversionCycle;
pub use dio::{DaysInventoryFinished, DaysInventoryRaw};
pub use dpo::DaysPayablesOutstanding;
pub use dso::DaysSalesOutstanding;

use crate::metric::{require_full_model, require_full_year};
use crate::outcome::MetricOutcome;
use balans_data::PeriodFigures;
use serde::{Deserialize, Serialize};

/// Configuration shared by the cycle metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Days the ratios are scaled to (default: 365)
    pub days_in_year: f64,
    /// Round results to whole days, halves to even (default: true)
    pub round: bool,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            days_in_year: 365.0,
            round: true,
        }
    }
}

impl CycleConfig {
    /// Scale `numerator / denominator` to days after the model and period
    /// checks.
    pub(crate) fn days(
        &self,
        figures: &PeriodFigures,
        numerator: f64,
        denominator: f64,
    ) -> MetricOutcome {
        if let Err(reason) = require_full_model(figures).and_then(|()| require_full_year(figures)) {
            return reason.into();
        }
        MetricOutcome::ratio(numerator, denominator).map(|ratio| self.finish(ratio * self.days_in_year))
    }

    /// Halves round to the even day.
    pub(crate) fn finish(&self, days: f64) -> f64 {
        if self.round { days.round_ties_even() } else { days }
    }
}
