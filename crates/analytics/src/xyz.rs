//! Demand-variability (XYZ) classification by coefficient of variation of
//! monthly turnover.

use crate::stats::{mean, sample_std_dev};
use configuration::XyzThresholds;
use core_types::{AggregateRow, MonthKey, XyzClass};

/// Variability statistics and class for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct VariabilityResult {
    pub item_code: String,
    /// Sample standard deviation of monthly turnover counts.
    pub std_deviation: f64,
    /// Coefficient of variation in percent; 0 when the mean is 0.
    pub coefficient_variation: f64,
    pub class: XyzClass,
}

/// Classifies one item's monthly turnover variability.
///
/// The series spans every globally observed month: a month in which the item
/// was never picked contributes a 0 rather than being omitted, so all items
/// are measured over the same period length. Two edge-case policies are
/// deliberate and load-bearing:
///
/// - A zero mean (item never picked in range) yields CV = 0 and class X.
///   Zero activity is "stable", not "erratic".
/// - A single global month leaves the sample deviation undefined; it is
///   reported as 0 (again class X) and the inventory planner switches to its
///   CV-proxy fallback for weekly variability.
pub fn classify(
    row: &AggregateRow,
    months: &[MonthKey],
    thresholds: &XyzThresholds,
) -> VariabilityResult {
    let series: Vec<f64> = months.iter().map(|m| row.turnover_in(m) as f64).collect();
    let mean = mean(&series);
    let std_deviation = sample_std_dev(&series);

    let coefficient_variation = if mean > 0.0 {
        100.0 * std_deviation / mean
    } else {
        0.0
    };

    let class = if coefficient_variation <= thresholds.x_threshold_pct {
        XyzClass::X
    } else if coefficient_variation <= thresholds.y_threshold_pct {
        XyzClass::Y
    } else {
        XyzClass::Z
    };

    VariabilityResult {
        item_code: row.item_code.clone(),
        std_deviation,
        coefficient_variation,
        class,
    }
}
