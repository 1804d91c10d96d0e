//! Derivation of per-item min/max and safety-stock recommendations from the
//! ABC/XYZ classification.

use crate::stats::{mean, sample_std_dev};
use configuration::PlanningParams;
use core_types::{AbcClass, AggregateRow, InventoryParameters, MonthKey, XyzClass};

/// Derives inventory control parameters for one item.
///
/// The derivation follows a fixed order: weekly averages from monthly ones,
/// weekly variability (with a CV-proxy fallback when only one month of data
/// exists), a safety stock floored at 20% of average weekly demand, then
/// min/max as lead-time coverage plus class-dependent headroom.
pub fn plan(
    row: &AggregateRow,
    months: &[MonthKey],
    abc: AbcClass,
    xyz: XyzClass,
    coefficient_variation: f64,
    params: &PlanningParams,
) -> InventoryParameters {
    let monthly_quantities: Vec<f64> = months.iter().map(|m| row.quantity_in(m)).collect();

    let avg_monthly_qty = mean(&monthly_quantities);
    let avg_weekly_qty = avg_monthly_qty / params.weeks_per_month;

    // With a single observed month the sample deviation is undefined, so the
    // weekly variability falls back to the coefficient of variation computed
    // by the XYZ pass.
    let (monthly_qty_std_dev, weekly_qty_std_dev) = if monthly_quantities.len() >= 2 {
        let monthly = sample_std_dev(&monthly_quantities);
        (monthly, monthly / params.weeks_per_month)
    } else {
        (0.0, avg_weekly_qty * coefficient_variation / 100.0)
    };

    // The 0.2 floor guarantees a non-zero buffer even for items with
    // near-zero variance.
    let safety_stock_weekly = f64::max(
        weekly_qty_std_dev * params.safety_stock_factor.for_class(xyz),
        avg_weekly_qty * 0.2,
    );

    let min_qty_weekly = avg_weekly_qty * params.lead_time_weeks + safety_stock_weekly;
    let max_qty_weekly = min_qty_weekly + avg_weekly_qty * params.max_qty_factor.for_class(abc);
    let min_qty_monthly = min_qty_weekly * params.weeks_per_month;
    let max_qty_monthly = max_qty_weekly * params.weeks_per_month;

    InventoryParameters {
        item_code: row.item_code.clone(),
        avg_monthly_qty,
        avg_weekly_qty,
        monthly_qty_std_dev,
        weekly_qty_std_dev,
        safety_stock_weekly,
        min_qty_weekly: round_quantity(min_qty_weekly, avg_weekly_qty),
        max_qty_weekly: round_quantity(max_qty_weekly, avg_weekly_qty),
        min_qty_monthly: round_quantity(min_qty_monthly, avg_weekly_qty),
        max_qty_monthly: round_quantity(max_qty_monthly, avg_weekly_qty),
    }
}

/// High-volume items are counted in whole units; low-volume items may be
/// fractional/weighted units and keep two decimals.
fn round_quantity(value: f64, avg_weekly_qty: f64) -> f64 {
    if avg_weekly_qty > 5.0 {
        value.round()
    } else {
        (value * 100.0).round() / 100.0
    }
}
