//! Per-zone ABC reclassification and the global-vs-zone comparison.

use crate::abc;
use crate::error::AnalyticsError;
use configuration::{AbcThresholds, ZoningParams};
use core_types::{
    AbcClass, AggregateRow, ClassComparisonRow, ClassificationResult, ZoneClassification,
    ZoneSummary,
};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The zonal analysis output: a summary row for every zone, plus zone-local
/// classifications and the comparison table for zones large enough to
/// classify on their own.
#[derive(Debug, Clone, Default)]
pub struct ZonalAnalysis {
    /// One row per zone (small zones included), sorted by total turnover
    /// descending.
    pub summaries: Vec<ZoneSummary>,
    /// Zone-local rankings, zones in alphabetical order, items in zone-rank
    /// order within each zone.
    pub classifications: Vec<ZoneClassification>,
    /// Non-empty (global ABC, zone ABC) pair counts per classified zone.
    pub comparisons: Vec<ClassComparisonRow>,
}

/// Repeats the ABC classification independently within each warehouse zone.
///
/// Zone membership is the item's most-frequent zone from aggregation. Zones
/// with fewer than `min_zone_size` items are excluded from the per-zone
/// output entirely (they still get a summary row). A zone whose local
/// turnover sums to zero is skipped with a warning; only the dataset-wide
/// zero-turnover condition is a hard error, and the caller has already ruled
/// that out by the time this pass runs.
pub fn reclassify(
    rows: &[AggregateRow],
    classifications: &[ClassificationResult],
    abc_thresholds: &AbcThresholds,
    zoning: &ZoningParams,
) -> ZonalAnalysis {
    let global_class: HashMap<&str, AbcClass> = classifications
        .iter()
        .map(|c| (c.item_code.as_str(), c.abc))
        .collect();

    // Partition item indexes by zone, keeping first-seen order within each
    // zone so the zone-local tie-break matches the global one.
    let mut zone_order: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, row) in rows.iter().enumerate() {
        let entry = members.entry(row.zone.as_str()).or_insert_with(|| {
            zone_order.push(row.zone.as_str());
            Vec::new()
        });
        entry.push(index);
    }
    zone_order.sort_unstable();

    let mut analysis = ZonalAnalysis::default();

    for zone in zone_order {
        let indexes = &members[zone];

        let mut class_counts = [0usize; 3];
        let mut total_turnover = 0u64;
        for &i in indexes {
            total_turnover += rows[i].total_turnover;
            if let Some(class) = global_class.get(rows[i].item_code.as_str()) {
                class_counts[*class as usize] += 1;
            }
        }
        let item_count = indexes.len();
        analysis.summaries.push(ZoneSummary {
            zone: zone.to_string(),
            item_count,
            class_counts,
            class_percentages: class_counts.map(|c| 100.0 * c as f64 / item_count as f64),
            total_turnover,
        });

        if item_count < zoning.min_zone_size {
            debug!(
                zone,
                item_count,
                min_zone_size = zoning.min_zone_size,
                "zone too small for its own classification"
            );
            continue;
        }

        let population: Vec<(&str, u64)> = indexes
            .iter()
            .map(|&i| (rows[i].item_code.as_str(), rows[i].total_turnover))
            .collect();
        let ranked = match abc::classify(&population, abc_thresholds) {
            Ok(ranked) => ranked,
            Err(AnalyticsError::EmptyDataset) => {
                warn!(zone, "zone has no turnover at all; skipping");
                continue;
            }
            Err(e) => {
                warn!(zone, error = %e, "zone classification failed; skipping");
                continue;
            }
        };

        let mut pair_counts: HashMap<(AbcClass, AbcClass), usize> = HashMap::new();
        for item in &ranked {
            if let Some(&global) = global_class.get(item.item_code.as_str()) {
                *pair_counts.entry((global, item.class)).or_default() += 1;
            }
            analysis.classifications.push(ZoneClassification {
                zone: zone.to_string(),
                item_code: item.item_code.clone(),
                zone_rank: item.rank,
                zone_percentage: item.percentage,
                zone_cumulative_percentage: item.cumulative_percentage,
                zone_abc: item.class,
            });
        }

        for global in AbcClass::ALL {
            for local in AbcClass::ALL {
                if let Some(&count) = pair_counts.get(&(global, local)) {
                    analysis.comparisons.push(ClassComparisonRow {
                        zone: zone.to_string(),
                        global_abc: global,
                        zone_abc: local,
                        item_count: count,
                        percentage: 100.0 * count as f64 / ranked.len() as f64,
                    });
                }
            }
        }
    }

    analysis
        .summaries
        .sort_by_key(|s| Reverse(s.total_turnover));

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::AnalysisConfig;
    use core_types::MonthlyTotals;
    use std::collections::BTreeMap;

    fn row(item: &str, zone: &str, turnover: u64) -> AggregateRow {
        let mut monthly = BTreeMap::new();
        monthly.insert(
            core_types::MonthKey::new(2024, 1).unwrap(),
            MonthlyTotals {
                turnover,
                quantity: turnover as f64,
            },
        );
        AggregateRow {
            item_code: item.to_string(),
            item_name: String::new(),
            zone: zone.to_string(),
            total_turnover: turnover,
            total_quantity: turnover as f64,
            monthly,
        }
    }

    fn classification(item: &str, turnover: u64, abc: AbcClass) -> ClassificationResult {
        ClassificationResult {
            item_code: item.to_string(),
            rank: 1,
            total_turnover: turnover,
            total_quantity: turnover as f64,
            percentage: 0.0,
            cumulative_percentage: 0.0,
            abc,
            std_deviation: 0.0,
            coefficient_variation: 0.0,
            xyz: core_types::XyzClass::X,
        }
    }

    fn fixture(zone_sizes: &[(&str, usize)]) -> (Vec<AggregateRow>, Vec<ClassificationResult>) {
        let mut rows = Vec::new();
        let mut classifications = Vec::new();
        for (zone, size) in zone_sizes {
            for i in 0..*size {
                let code = format!("{zone}-{i}");
                let turnover = 100 / (i as u64 + 1);
                rows.push(row(&code, zone, turnover));
                classifications.push(classification(
                    &code,
                    turnover,
                    if i == 0 { AbcClass::A } else { AbcClass::C },
                ));
            }
        }
        (rows, classifications)
    }

    #[test]
    fn zones_below_minimum_size_get_no_local_classification() {
        let config = AnalysisConfig::default();
        let (rows, classifications) = fixture(&[("SMALL", 4), ("BIG", 5)]);
        let analysis = reclassify(&rows, &classifications, &config.abc, &config.zoning);

        assert!(analysis.classifications.iter().all(|c| c.zone == "BIG"));
        assert_eq!(analysis.classifications.len(), 5);
        // The small zone still shows up in the summary.
        assert!(analysis.summaries.iter().any(|s| s.zone == "SMALL"));
        assert_eq!(analysis.summaries.len(), 2);
    }

    #[test]
    fn zone_local_ranking_ignores_global_totals() {
        let config = AnalysisConfig::default();
        let rows = vec![
            row("a1", "Z1", 1000),
            row("a2", "Z1", 10),
            row("a3", "Z1", 10),
            row("a4", "Z1", 5),
            row("a5", "Z1", 5),
        ];
        let classifications: Vec<ClassificationResult> = rows
            .iter()
            .map(|r| classification(&r.item_code, r.total_turnover, AbcClass::C))
            .collect();
        let analysis = reclassify(&rows, &classifications, &config.abc, &config.zoning);

        let first = &analysis.classifications[0];
        assert_eq!(first.item_code, "a1");
        assert_eq!(first.zone_rank, 1);
        // 1000 of 1030 is ~97% of the zone: still above the B threshold.
        assert_eq!(first.zone_abc, AbcClass::C);
        let last = analysis.classifications.last().unwrap();
        assert!((last.zone_cumulative_percentage - 100.0).abs() < 1e-6);
    }

    #[test]
    fn comparison_counts_cover_the_whole_zone() {
        let config = AnalysisConfig::default();
        let (rows, classifications) = fixture(&[("BIG", 6)]);
        let analysis = reclassify(&rows, &classifications, &config.abc, &config.zoning);

        let total: usize = analysis.comparisons.iter().map(|c| c.item_count).sum();
        assert_eq!(total, 6);
        let pct: f64 = analysis.comparisons.iter().map(|c| c.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-6);
        // Only pairs with a non-zero count are emitted.
        assert!(analysis.comparisons.iter().all(|c| c.item_count > 0));
    }

    #[test]
    fn summaries_sorted_by_turnover_descending() {
        let config = AnalysisConfig::default();
        let (rows, classifications) = fixture(&[("QUIET", 2), ("BUSY", 6)]);
        let analysis = reclassify(&rows, &classifications, &config.abc, &config.zoning);
        assert_eq!(analysis.summaries[0].zone, "BUSY");
        for pair in analysis.summaries.windows(2) {
            assert!(pair[0].total_turnover >= pair[1].total_turnover);
        }
    }

    #[test]
    fn zero_turnover_zone_is_skipped_not_fatal() {
        let config = AnalysisConfig::default();
        let rows: Vec<AggregateRow> = (0..5).map(|i| row(&format!("z-{i}"), "DEAD", 0)).collect();
        let classifications: Vec<ClassificationResult> = rows
            .iter()
            .map(|r| classification(&r.item_code, 0, AbcClass::C))
            .collect();
        let analysis = reclassify(&rows, &classifications, &config.abc, &config.zoning);
        assert!(analysis.classifications.is_empty());
        assert_eq!(analysis.summaries.len(), 1);
    }
}
