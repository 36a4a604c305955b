//! Metric results.
//!
//! A metric either produces a number or says why it could not. The three skip
//! reasons are distinct on purpose: a report shows "not a full year" and
//! "division by zero" differently.

use derive_more::{Display, From};
use serde::Serialize;

/// Why a metric produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum SkipReason {
    /// Accounting period shorter than a full year
    #[display("not a full year")]
    NotFullYear,
    /// Denominator sums to zero
    #[display("zero division")]
    ZeroDivision,
    /// Filing schema does not carry the needed lines
    #[display("model not applicable")]
    ModelNotApplicable,
}

/// Result of computing one metric for one period.
#[derive(Debug, Clone, Copy, PartialEq, From, Serialize)]
pub enum MetricOutcome {
    /// Computed value
    Value(f64),
    /// Metric not computable
    Skipped(SkipReason),
}

impl MetricOutcome {
    /// Divide, or skip with [`SkipReason::ZeroDivision`] on a zero denominator.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Self::Skipped(SkipReason::ZeroDivision)
        } else {
            Self::Value(numerator / denominator)
        }
    }

    /// The value, if any.
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Skipped(_) => None,
        }
    }

    /// The skip reason, if any.
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Value(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }

    /// True for a computed value.
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Transform the value, keeping a skip as is.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Value(v) => Self::Value(f(v)),
            skipped @ Self::Skipped(_) => skipped,
        }
    }

    /// Chain a computation that may itself skip.
    pub fn and_then(self, f: impl FnOnce(f64) -> Self) -> Self {
        match self {
            Self::Value(v) => f(v),
            skipped @ Self::Skipped(_) => skipped,
        }
    }
}

impl std::fmt::Display for MetricOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Skipped(reason) => write!(f, "{reason}"),
        }
    }
}

impl From<Result<f64, SkipReason>> for MetricOutcome {
    fn from(result: Result<f64, SkipReason>) -> Self {
        result.map_or_else(Self::Skipped, Self::Value)
    }
}
