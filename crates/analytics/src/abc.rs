//! Pareto (ABC) ranking by cumulative turnover share.

use crate::error::AnalyticsError;
use configuration::AbcThresholds;
use core_types::AbcClass;
use std::cmp::Reverse;

/// One item's position in an ABC ranking. Produced both globally and, by the
/// zonal pass, per warehouse zone.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem {
    pub item_code: String,
    pub total_turnover: u64,
    /// 1-based position in descending-turnover order.
    pub rank: usize,
    /// Share of the population's total turnover, in percent.
    pub percentage: f64,
    /// Running sum of `percentage` in rank order.
    pub cumulative_percentage: f64,
    pub class: AbcClass,
}

/// Ranks a population of items by total turnover and assigns ABC classes.
///
/// Items must be given in their first-seen input order; equal turnover is
/// broken by that order so repeated runs produce identical rankings. A
/// population whose turnover sums to zero has no defined percentages and is
/// reported as [`AnalyticsError::EmptyDataset`] instead of dividing by zero.
pub fn classify(
    items: &[(&str, u64)],
    thresholds: &AbcThresholds,
) -> Result<Vec<RankedItem>, AnalyticsError> {
    let total: u64 = items.iter().map(|(_, turnover)| turnover).sum();
    if total == 0 {
        return Err(AnalyticsError::EmptyDataset);
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| (Reverse(items[i].1), i));

    let mut ranked = Vec::with_capacity(items.len());
    let mut cumulative = 0.0;
    for (position, &i) in order.iter().enumerate() {
        let (item_code, turnover) = items[i];
        let percentage = 100.0 * turnover as f64 / total as f64;
        cumulative += percentage;

        let class = if cumulative <= thresholds.a_threshold_pct {
            AbcClass::A
        } else if cumulative <= thresholds.b_threshold_pct {
            AbcClass::B
        } else {
            AbcClass::C
        };

        ranked.push(RankedItem {
            item_code: item_code.to_string(),
            total_turnover: turnover,
            rank: position + 1,
            percentage,
            cumulative_percentage: cumulative,
            class,
        });
    }

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> AbcThresholds {
        AbcThresholds {
            a_threshold_pct: 80.0,
            b_threshold_pct: 95.0,
        }
    }

    #[test]
    fn boundary_inclusivity_on_cumulative_share() {
        // 100/20/5 of a 125 total: cumulative shares land at exactly 80, 96
        // and 100. The 80 boundary is inclusive (class A); 96 exceeds the B
        // boundary of 95, so the second item already falls to C.
        let ranked = classify(&[("A", 100), ("B", 20), ("C", 5)], &thresholds()).unwrap();
        let cumulative: Vec<f64> = ranked.iter().map(|r| r.cumulative_percentage).collect();
        assert!((cumulative[0] - 80.0).abs() < 1e-9);
        assert!((cumulative[1] - 96.0).abs() < 1e-9);
        assert!((cumulative[2] - 100.0).abs() < 1e-9);
        assert_eq!(ranked[0].class, AbcClass::A);
        assert_eq!(ranked[1].class, AbcClass::C);
        assert_eq!(ranked[2].class, AbcClass::C);
    }

    #[test]
    fn rank_is_a_permutation_in_turnover_order() {
        let ranked = classify(&[("low", 1), ("high", 50), ("mid", 10)], &thresholds()).unwrap();
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ranked[0].item_code, "high");
        assert_eq!(ranked[2].item_code, "low");
    }

    #[test]
    fn ties_break_by_input_order() {
        let ranked = classify(&[("second", 5), ("first", 7), ("third", 5)], &thresholds()).unwrap();
        let codes: Vec<&str> = ranked.iter().map(|r| r.item_code.as_str()).collect();
        assert_eq!(codes, vec!["first", "second", "third"]);
    }

    #[test]
    fn cumulative_percentage_ends_at_one_hundred() {
        let items: Vec<(&str, u64)> = vec![("a", 13), ("b", 7), ("c", 29), ("d", 1)];
        let ranked = classify(&items, &thresholds()).unwrap();
        let last = ranked.last().unwrap();
        assert!((last.cumulative_percentage - 100.0).abs() < 1e-6);
        for pair in ranked.windows(2) {
            assert!(pair[1].cumulative_percentage >= pair[0].cumulative_percentage);
        }
    }

    #[test]
    fn zero_total_turnover_is_a_structured_error() {
        let err = classify(&[("a", 0), ("b", 0)], &thresholds()).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyDataset));
    }

    #[test]
    fn single_item_population_follows_the_cumulative_rule() {
        // One item owns 100% of the turnover, which exceeds both default
        // thresholds; it lands in C by the cumulative rule.
        let ranked = classify(&[("only", 3)], &thresholds()).unwrap();
        assert_eq!(ranked[0].class, AbcClass::C);
        assert_eq!(ranked[0].rank, 1);
    }
}
