//! The classification and inventory planning engine.
//!
//! A pure, synchronous batch computation: one aggregation pass over the
//! transactions, then independent per-item classification and planning
//! passes, then a per-zone reclassification over the same aggregates. The
//! engine holds no cross-call state and performs no I/O; the caller is
//! responsible for bounding the record volume before invoking it (there is
//! no internal cap on item or month cardinality).

use crate::error::AnalyticsError;
use configuration::AnalysisConfig;
use core_types::{ClassificationResult, RawTransaction};
use std::collections::HashMap;
use tracing::{info, warn};

pub mod abc;
pub mod aggregator;
pub mod error;
pub mod normalizer;
pub mod planner;
pub mod report;
pub mod stats;
pub mod xyz;
pub mod zones;

pub use report::{AnalysisReport, ClassSummaryRow};

/// A stateless calculator turning raw picking records into classifications
/// and inventory recommendations.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: AnalysisConfig,
}

impl AnalyticsEngine {
    /// Builds an engine from a validated configuration.
    ///
    /// Validation happens here, before any computation: a misconfigured
    /// threshold or factor is reported per parameter and nothing runs.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The main entry point: runs the full pipeline over one batch of
    /// records.
    ///
    /// Per-record problems (missing item code, unparsable timestamp) are
    /// dropped and counted in the report's [`core_types::IngestStats`].
    /// Only two conditions fail the whole run: an invalid configuration
    /// (caught in [`AnalyticsEngine::new`]) and a dataset with no turnover
    /// at all ([`AnalyticsError::EmptyDataset`]).
    pub fn run(&self, records: &[RawTransaction]) -> Result<AnalysisReport, AnalyticsError> {
        let batch = normalizer::normalize(records);
        if batch.stats.dropped() > 0 {
            warn!(
                dropped = batch.stats.dropped(),
                missing_item_code = batch.stats.dropped_missing_item_code,
                bad_timestamp = batch.stats.dropped_bad_timestamp,
                "dropped records during normalization"
            );
        }
        if batch.transactions.is_empty() {
            return Err(AnalyticsError::EmptyDataset);
        }

        let aggregation = aggregator::aggregate(&batch.transactions);

        // Global ABC ranking over total turnover counts.
        let population: Vec<(&str, u64)> = aggregation
            .rows
            .iter()
            .map(|row| (row.item_code.as_str(), row.total_turnover))
            .collect();
        let ranked = abc::classify(&population, &self.config.abc)?;

        // Per-item variability over the shared month grid.
        let by_code: HashMap<&str, &core_types::AggregateRow> = aggregation
            .rows
            .iter()
            .map(|row| (row.item_code.as_str(), row))
            .collect();

        let mut classifications = Vec::with_capacity(ranked.len());
        let mut inventory = Vec::with_capacity(ranked.len());
        for item in &ranked {
            let row = by_code[item.item_code.as_str()];
            let variability = xyz::classify(row, &aggregation.months, &self.config.xyz);

            inventory.push(planner::plan(
                row,
                &aggregation.months,
                item.class,
                variability.class,
                variability.coefficient_variation,
                &self.config.planning,
            ));
            classifications.push(ClassificationResult {
                item_code: item.item_code.clone(),
                rank: item.rank,
                total_turnover: item.total_turnover,
                total_quantity: row.total_quantity,
                percentage: item.percentage,
                cumulative_percentage: item.cumulative_percentage,
                abc: item.class,
                std_deviation: variability.std_deviation,
                coefficient_variation: variability.coefficient_variation,
                xyz: variability.class,
            });
        }

        let zonal = zones::reclassify(
            &aggregation.rows,
            &classifications,
            &self.config.abc,
            &self.config.zoning,
        );

        let (abc_summary, xyz_summary, combined_summary) = report::summarize(&classifications);
        let attention_items = report::attention_items(&classifications);

        info!(
            items = classifications.len(),
            months = aggregation.months.len(),
            zones = zonal.summaries.len(),
            attention = attention_items.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            months: aggregation.months,
            aggregates: aggregation.rows,
            classifications,
            inventory,
            abc_summary,
            xyz_summary,
            combined_summary,
            zone_summaries: zonal.summaries,
            zone_classifications: zonal.classifications,
            zone_comparisons: zonal.comparisons,
            attention_items,
            ingest: batch.stats,
        })
    }
}
