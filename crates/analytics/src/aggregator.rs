//! Grouping of transactions into per-item, per-month turnover and quantity
//! totals.

use core_types::{AggregateRow, MonthKey, MonthlyTotals, Transaction};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// The aggregation result: one row per item in first-seen input order, plus
/// the sorted set of every month bucket observed anywhere in the data.
///
/// The global month list is what keeps the variability statistics honest:
/// every item is later measured over the same period length, with silent
/// months counting as zero.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub rows: Vec<AggregateRow>,
    pub months: Vec<MonthKey>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Tallies value frequencies in first-seen order so that "most frequent"
/// has a deterministic winner: the first value to reach the maximum count.
#[derive(Debug, Clone, Default)]
struct FrequencyCounter {
    counts: Vec<(String, u64)>,
}

impl FrequencyCounter {
    fn observe(&mut self, value: &str) {
        match self.counts.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((value.to_string(), 1)),
        }
    }

    fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (value, count) in &self.counts {
            // Strictly greater keeps the earliest value on ties.
            if best.map_or(true, |(_, best_count)| *count > best_count) {
                best = Some((value, *count));
            }
        }
        best.map(|(value, _)| value)
    }
}

#[derive(Debug, Default)]
struct ItemAccumulator {
    names: FrequencyCounter,
    zones: FrequencyCounter,
    total_turnover: u64,
    total_quantity: f64,
    monthly: std::collections::BTreeMap<MonthKey, MonthlyTotals>,
}

/// Groups transactions by item and calendar month.
///
/// "Turnover" here is the count of picking events, deliberately not the
/// summed quantity; quantity is tracked alongside it. Items come out in the
/// order they were first seen in the input.
pub fn aggregate(transactions: &[Transaction]) -> Aggregation {
    let mut order: Vec<String> = Vec::new();
    let mut items: HashMap<String, ItemAccumulator> = HashMap::new();
    let mut months: BTreeSet<MonthKey> = BTreeSet::new();

    for tx in transactions {
        let month = tx.month();
        months.insert(month);

        let acc = items.entry(tx.item_code.clone()).or_insert_with(|| {
            order.push(tx.item_code.clone());
            ItemAccumulator::default()
        });
        if let Some(name) = &tx.item_name {
            acc.names.observe(name);
        }
        if let Some(zone) = &tx.zone {
            acc.zones.observe(zone);
        }
        acc.total_turnover += 1;
        acc.total_quantity += tx.quantity;

        let totals = acc.monthly.entry(month).or_default();
        totals.turnover += 1;
        totals.quantity += tx.quantity;
    }

    let rows: Vec<AggregateRow> = order
        .into_iter()
        .map(|item_code| {
            let acc = items.remove(&item_code).unwrap_or_default();
            AggregateRow {
                item_name: acc.names.most_frequent().unwrap_or("").to_string(),
                zone: acc.zones.most_frequent().unwrap_or("TBD").to_string(),
                total_turnover: acc.total_turnover,
                total_quantity: acc.total_quantity,
                monthly: acc.monthly,
                item_code,
            }
        })
        .collect();

    info!(
        items = rows.len(),
        months = months.len(),
        transactions = transactions.len(),
        "aggregated picking transactions"
    );

    Aggregation {
        rows,
        months: months.into_iter().collect(),
    }
}
