//! Days Inventory Outstanding
//!
//! Split in two cycles: raw materials and goods for resale against their
//! cost, and work in progress and finished goods against the operating costs
//! of producing them. Immovable property held for sale (code 35) is a
//! finished product for construction companies and a purchased good for
//! everyone else; it is counted in exactly one of the two cycles.

use super::CycleConfig;
use crate::metric::{Metric, code_list};
use crate::outcome::MetricOutcome;
use crate::registry::MetricCategory;
use crate::sector::is_construction;
use balans_data::PeriodFigures;
use balans_data::lookup::codes;

const RAW_STOCK: [&str; 3] = [codes::RAW_MATERIALS, codes::GOODS_FOR_RESALE, codes::STOCK_ADVANCES];

const FINISHED_STOCK: [&str; 3] = [
    codes::WORK_IN_PROGRESS,
    codes::FINISHED_GOODS,
    codes::CONTRACTS_IN_PROGRESS,
];

const OPERATING_COSTS: [&str; 8] = [
    codes::COST_OF_GOODS,
    codes::SERVICES,
    codes::REMUNERATION,
    codes::DEPRECIATION,
    codes::STOCK_WRITE_DOWNS,
    codes::PROVISIONS,
    codes::OTHER_OPERATING_CHARGES,
    codes::CAPITALISED_REORGANISATION,
];

const NON_PRODUCTION_INCOME: [&str; 4] = [
    codes::STOCK_VARIATION,
    codes::OWN_CONSTRUCTION,
    codes::OPERATING_SUBSIDIES,
    codes::CAPITAL_SUBSIDIES,
];

fn property_for_sale(figures: &PeriodFigures, in_finished_cycle: bool) -> f64 {
    if is_construction(figures.activity_code.as_deref()) == in_finished_cycle {
        figures.value(codes::PROPERTY_FOR_SALE)
    } else {
        0.0
    }
}

/// (30/31 + 34 + 36 [+ 35]) / 60 × 365, with 35 outside construction
#[derive(Debug, Clone, Default)]
pub struct DaysInventoryRaw {
    config: CycleConfig,
}

impl DaysInventoryRaw {
    /// Create with a custom configuration.
    pub const fn with_config(config: CycleConfig) -> Self {
        Self { config }
    }
}

impl Metric for DaysInventoryRaw {
    fn name(&self) -> &'static str {
        "dio_raw"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::WorkingCapital
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[&RAW_STOCK, &[codes::PROPERTY_FOR_SALE, codes::COST_OF_GOODS]])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        let stock = figures.sum(&RAW_STOCK) + property_for_sale(figures, false);
        self.config
            .days(figures, stock, figures.value(codes::COST_OF_GOODS))
    }
}

/// (32 + 33 + 37 [+ 35]) / operating costs of production × 365, with 35 in
/// construction
///
/// Operating costs are 60 through 649 less stock variation (71), own work
/// capitalised (72), operating subsidies (740) and capital subsidies (9125).
#[derive(Debug, Clone, Default)]
pub struct DaysInventoryFinished {
    config: CycleConfig,
}

impl DaysInventoryFinished {
    /// Create with a custom configuration.
    pub const fn with_config(config: CycleConfig) -> Self {
        Self { config }
    }
}

impl Metric for DaysInventoryFinished {
    fn name(&self) -> &'static str {
        "dio_finished"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::WorkingCapital
    }

    fn required_codes(&self) -> Vec<&'static str> {
        code_list(&[
            &FINISHED_STOCK,
            &[codes::PROPERTY_FOR_SALE],
            &OPERATING_COSTS,
            &NON_PRODUCTION_INCOME,
        ])
    }

    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome {
        let stock = figures.sum(&FINISHED_STOCK) + property_for_sale(figures, true);
        let costs = figures.sum(&OPERATING_COSTS) - figures.sum(&NON_PRODUCTION_INCOME);
        self.config.days(figures, stock, costs)
    }
}
