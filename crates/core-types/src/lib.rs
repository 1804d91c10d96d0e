pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AbcClass, XyzClass};
pub use error::CoreError;
pub use structs::{
    AggregateRow, ClassComparisonRow, ClassificationResult, IngestStats, InventoryParameters,
    MonthKey, MonthlyTotals, RawTransaction, Transaction, ZoneClassification, ZoneSummary,
};
