use crate::enums::{AbcClass, XyzClass};
use crate::error::CoreError;
use chrono::{Datelike, NaiveDateTime};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A picking record as handed over by a boundary adapter (CSV loader,
/// database reader, ...). Nothing is validated yet: the timestamp is still
/// raw text and the item code may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Warehouse item code. An empty string means the field was missing.
    pub item_code: String,
    /// Human-readable item name, if the source provides one.
    pub item_name: Option<String>,
    /// Warehouse storage zone, if the source provides one.
    pub zone: Option<String>,
    /// Picked quantity (non-negative; fractional for weighted units).
    pub quantity: f64,
    /// Raw pick timestamp text. `None` means the field was missing.
    pub picked_at: Option<String>,
}

/// A validated picking transaction with a parsed timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub item_code: String,
    pub item_name: Option<String>,
    pub zone: Option<String>,
    pub quantity: f64,
    pub picked_at: NaiveDateTime,
}

impl Transaction {
    /// The calendar-month bucket this transaction falls into.
    pub fn month(&self) -> MonthKey {
        MonthKey {
            year: self.picked_at.year(),
            month: self.picked_at.month(),
        }
    }
}

/// A calendar-month bucket key, rendered as `MM.YYYY`.
///
/// Ordering is chronological (year first, then month), so a sorted set of
/// keys always reads in calendar order regardless of the textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidInput(
                "month".to_string(),
                format!("{month} is not in 1..=12"),
            ));
        }
        Ok(Self { year, month })
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:04}", self.month, self.year)
    }
}

impl FromStr for MonthKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            CoreError::InvalidInput(
                "month key".to_string(),
                format!("'{s}' is not in MM.YYYY form"),
            )
        };
        let (month, year) = s.split_once('.').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month)
    }
}

// Serialized as its `MM.YYYY` text so month keys are readable in JSON,
// including when used as map keys.
impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(|e: CoreError| D::Error::custom(e))
    }
}

/// Per-month totals for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Number of picking events ("turnover" in this domain is a count of
    /// transactions, not revenue and not summed quantity).
    pub turnover: u64,
    /// Sum of picked quantity.
    pub quantity: f64,
}

/// The full aggregation result for one item across the analysed date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub item_code: String,
    /// Most frequent item name seen for this item (first-seen wins ties).
    pub item_name: String,
    /// Most frequent warehouse zone, or "TBD" when no record carried one.
    pub zone: String,
    /// Count of picking transactions over the whole range.
    pub total_turnover: u64,
    /// Sum of picked quantity over the whole range.
    pub total_quantity: f64,
    /// Per-month totals; months without activity are simply absent here and
    /// are treated as zero by the classifiers.
    pub monthly: BTreeMap<MonthKey, MonthlyTotals>,
}

impl AggregateRow {
    /// Turnover count for one month, zero when the item had no activity.
    pub fn turnover_in(&self, month: &MonthKey) -> u64 {
        self.monthly.get(month).map(|t| t.turnover).unwrap_or(0)
    }

    /// Quantity sum for one month, zero when the item had no activity.
    pub fn quantity_in(&self, month: &MonthKey) -> f64 {
        self.monthly.get(month).map(|t| t.quantity).unwrap_or(0.0)
    }
}

/// Combined ABC/XYZ classification for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub item_code: String,
    /// 1-based position when items are sorted by descending total turnover.
    pub rank: usize,
    pub total_turnover: u64,
    pub total_quantity: f64,
    /// This item's share of the grand total turnover, in percent.
    pub percentage: f64,
    /// Running sum of `percentage` in rank order.
    pub cumulative_percentage: f64,
    pub abc: AbcClass,
    /// Sample standard deviation of the monthly turnover counts.
    pub std_deviation: f64,
    /// Coefficient of variation in percent (0 when the mean is 0).
    pub coefficient_variation: f64,
    pub xyz: XyzClass,
}

/// Min/max and safety-stock recommendations for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryParameters {
    pub item_code: String,
    pub avg_monthly_qty: f64,
    pub avg_weekly_qty: f64,
    pub monthly_qty_std_dev: f64,
    pub weekly_qty_std_dev: f64,
    pub safety_stock_weekly: f64,
    pub min_qty_weekly: f64,
    pub max_qty_weekly: f64,
    pub min_qty_monthly: f64,
    pub max_qty_monthly: f64,
}

/// Zone-local ABC classification for one item, computed independently of the
/// global classification over the items of a single warehouse zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneClassification {
    pub zone: String,
    pub item_code: String,
    pub zone_rank: usize,
    pub zone_percentage: f64,
    pub zone_cumulative_percentage: f64,
    pub zone_abc: AbcClass,
}

/// Per-zone population summary. Every zone appears here, including zones too
/// small to get their own zone-local classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone: String,
    pub item_count: usize,
    /// Item counts per global ABC class, in A, B, C order.
    pub class_counts: [usize; 3],
    /// `class_counts` as percentages of `item_count`.
    pub class_percentages: [f64; 3],
    pub total_turnover: u64,
}

/// One cell of the global-vs-zone classification comparison: how many items
/// of a zone hold a given (global ABC, zone ABC) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassComparisonRow {
    pub zone: String,
    pub global_abc: AbcClass,
    pub zone_abc: AbcClass,
    pub item_count: usize,
    /// Share of the zone's classified population, in percent.
    pub percentage: f64,
}

/// Bookkeeping for records rejected during normalization. Dropped rows are
/// counted per cause and surfaced to the caller, never silently discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub total_records: usize,
    pub accepted: usize,
    pub dropped_missing_item_code: usize,
    pub dropped_bad_timestamp: usize,
}

impl IngestStats {
    pub fn dropped(&self) -> usize {
        self.dropped_missing_item_code + self.dropped_bad_timestamp
    }
}
