//! Assembly of the final analysis report, including the ABC/XYZ/combined
//! class summaries.

use core_types::{
    AbcClass, AggregateRow, ClassComparisonRow, ClassificationResult, IngestStats,
    InventoryParameters, MonthKey, XyzClass, ZoneClassification, ZoneSummary,
};
use serde::{Deserialize, Serialize};

/// Aggregated figures for one class (or class pair) of the population:
/// how many items it holds and which share of items, turnover and quantity
/// it represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummaryRow {
    /// "A".."C", "X".."Z" or a combined pair such as "AZ".
    pub label: String,
    pub item_count: usize,
    pub pct_of_items: f64,
    pub total_turnover: u64,
    pub pct_of_turnover: f64,
    pub total_quantity: f64,
    pub pct_of_quantity: f64,
}

/// The complete engine output for one run. Everything in here is recomputed
/// from scratch on every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Every month bucket observed in the data, in calendar order.
    pub months: Vec<MonthKey>,
    /// Per-item aggregates in first-seen input order.
    pub aggregates: Vec<AggregateRow>,
    /// Per-item classification in rank order.
    pub classifications: Vec<ClassificationResult>,
    /// Per-item inventory recommendations, same order as `classifications`.
    pub inventory: Vec<InventoryParameters>,
    pub abc_summary: Vec<ClassSummaryRow>,
    pub xyz_summary: Vec<ClassSummaryRow>,
    /// One row per (ABC, XYZ) pair that actually occurs.
    pub combined_summary: Vec<ClassSummaryRow>,
    pub zone_summaries: Vec<ZoneSummary>,
    pub zone_classifications: Vec<ZoneClassification>,
    pub zone_comparisons: Vec<ClassComparisonRow>,
    /// Globally important but erratic items (class A and Z): the ones worth
    /// a manual review of their replenishment setup.
    pub attention_items: Vec<String>,
    pub ingest: IngestStats,
}

/// Builds the ABC, XYZ and combined summaries from the classified items.
pub(crate) fn summarize(
    classifications: &[ClassificationResult],
) -> (
    Vec<ClassSummaryRow>,
    Vec<ClassSummaryRow>,
    Vec<ClassSummaryRow>,
) {
    let abc = summary_over(classifications, |c| Some(c.abc.to_string()));
    let xyz = summary_over(classifications, |c| Some(c.xyz.to_string()));
    let combined = summary_over(classifications, |c| Some(format!("{}{}", c.abc, c.xyz)));
    (abc, xyz, combined)
}

fn summary_over<F>(classifications: &[ClassificationResult], label_of: F) -> Vec<ClassSummaryRow>
where
    F: Fn(&ClassificationResult) -> Option<String>,
{
    let item_total = classifications.len();
    let turnover_total: u64 = classifications.iter().map(|c| c.total_turnover).sum();
    let quantity_total: f64 = classifications.iter().map(|c| c.total_quantity).sum();

    let mut rows: Vec<ClassSummaryRow> = Vec::new();
    for c in classifications {
        let Some(label) = label_of(c) else { continue };
        let index = match rows.iter().position(|r| r.label == label) {
            Some(index) => index,
            None => {
                rows.push(ClassSummaryRow {
                    label,
                    item_count: 0,
                    pct_of_items: 0.0,
                    total_turnover: 0,
                    pct_of_turnover: 0.0,
                    total_quantity: 0.0,
                    pct_of_quantity: 0.0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[index];
        row.item_count += 1;
        row.total_turnover += c.total_turnover;
        row.total_quantity += c.total_quantity;
    }

    rows.sort_by(|a, b| a.label.cmp(&b.label));

    for row in &mut rows {
        if item_total > 0 {
            row.pct_of_items = 100.0 * row.item_count as f64 / item_total as f64;
        }
        if turnover_total > 0 {
            row.pct_of_turnover = 100.0 * row.total_turnover as f64 / turnover_total as f64;
        }
        if quantity_total > 0.0 {
            row.pct_of_quantity = 100.0 * row.total_quantity / quantity_total;
        }
    }

    rows
}

/// Items that are globally class A but erratic (class Z): high importance
/// combined with unpredictable demand.
pub(crate) fn attention_items(classifications: &[ClassificationResult]) -> Vec<String> {
    classifications
        .iter()
        .filter(|c| c.abc == AbcClass::A && c.xyz == XyzClass::Z)
        .map(|c| c.item_code.clone())
        .collect()
}
