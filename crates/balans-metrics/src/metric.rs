//! The metric interface.

use crate::outcome::{MetricOutcome, SkipReason};
use crate::registry::MetricCategory;
use balans_data::PeriodFigures;

/// A derived figure computed from one period of one filing.
///
/// Implementations are stateless apart from their configuration and never
/// fail: anything that prevents a value is reported as a [`SkipReason`].
pub trait Metric: Send + Sync + std::fmt::Debug {
    /// Unique name, used as column header.
    fn name(&self) -> &'static str;

    /// Category the metric belongs to.
    fn category(&self) -> MetricCategory;

    /// Line codes the metric reads, without duplicates.
    fn required_codes(&self) -> Vec<&'static str>;

    /// Compute the metric for one period.
    fn compute(&self, figures: &PeriodFigures) -> MetricOutcome;
}

/// Concatenate code groups, keeping the first occurrence of each code.
pub(crate) fn code_list(groups: &[&[&'static str]]) -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = Vec::new();
    for code in groups.iter().flat_map(|group| group.iter()) {
        if !codes.contains(code) {
            codes.push(code);
        }
    }
    codes
}

/// Skip unless the filing uses the full schema.
pub(crate) fn require_full_model(figures: &PeriodFigures) -> Result<(), SkipReason> {
    if figures.is_full_model() {
        Ok(())
    } else {
        Err(SkipReason::ModelNotApplicable)
    }
}

/// Skip unless the period covers a full year.
pub(crate) fn require_full_year(figures: &PeriodFigures) -> Result<(), SkipReason> {
    if figures.is_full_year() {
        Ok(())
    } else {
        Err(SkipReason::NotFullYear)
    }
}
