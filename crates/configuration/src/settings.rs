use crate::error::ConfigError;
use core_types::{AbcClass, XyzClass};
use serde::Deserialize;

/// The root configuration structure for an analysis run.
///
/// Every field has a default, so an empty (or absent) configuration file
/// yields the standard 80/95 and 20/40 analysis. All components receive this
/// struct explicitly; nothing is read from ambient/global state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub abc: AbcThresholds,
    pub xyz: XyzThresholds,
    pub planning: PlanningParams,
    pub zoning: ZoningParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            abc: AbcThresholds::default(),
            xyz: XyzThresholds::default(),
            planning: PlanningParams::default(),
            zoning: ZoningParams::default(),
        }
    }
}

/// Cumulative-percentage cut-offs for the ABC classification.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AbcThresholds {
    /// Items up to this cumulative turnover share (inclusive) are class A.
    pub a_threshold_pct: f64,
    /// Items between the A threshold (exclusive) and this value (inclusive)
    /// are class B; everything above is class C.
    pub b_threshold_pct: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self {
            a_threshold_pct: 80.0,
            b_threshold_pct: 95.0,
        }
    }
}

/// Coefficient-of-variation cut-offs for the XYZ classification.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct XyzThresholds {
    /// Items whose CV (in percent) is at most this value are class X.
    pub x_threshold_pct: f64,
    /// Items between the X threshold (exclusive) and this value (inclusive)
    /// are class Y; everything above is class Z.
    pub y_threshold_pct: f64,
}

impl Default for XyzThresholds {
    fn default() -> Self {
        Self {
            x_threshold_pct: 20.0,
            y_threshold_pct: 40.0,
        }
    }
}

/// Parameters for deriving min/max and safety-stock recommendations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanningParams {
    /// Time between triggering replenishment and stock arrival, in weeks.
    pub lead_time_weeks: f64,
    /// Average number of weeks per calendar month.
    pub weeks_per_month: f64,
    pub safety_stock_factor: SafetyStockFactors,
    pub max_qty_factor: MaxQtyFactors,
}

impl Default for PlanningParams {
    fn default() -> Self {
        Self {
            lead_time_weeks: 2.0,
            weeks_per_month: 4.33,
            safety_stock_factor: SafetyStockFactors::default(),
            max_qty_factor: MaxQtyFactors::default(),
        }
    }
}

/// Safety-stock multipliers per XYZ class. Stable items (X) get the lowest
/// buffer, erratic items (Z) the highest.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SafetyStockFactors {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SafetyStockFactors {
    pub fn for_class(&self, class: XyzClass) -> f64 {
        match class {
            XyzClass::X => self.x,
            XyzClass::Y => self.y,
            XyzClass::Z => self.z,
        }
    }
}

impl Default for SafetyStockFactors {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.5,
            z: 2.5,
        }
    }
}

/// Stock-ceiling multipliers per ABC class. Important items (A) get a low
/// ceiling (fast replenishment), unimportant items (C) a high one (rare,
/// larger orders).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MaxQtyFactors {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl MaxQtyFactors {
    pub fn for_class(&self, class: AbcClass) -> f64 {
        match class {
            AbcClass::A => self.a,
            AbcClass::B => self.b,
            AbcClass::C => self.c,
        }
    }
}

impl Default for MaxQtyFactors {
    fn default() -> Self {
        Self {
            a: 1.5,
            b: 2.0,
            c: 3.0,
        }
    }
}

/// Parameters for the per-zone reclassification.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ZoningParams {
    /// Zones with fewer items than this are excluded from the per-zone
    /// classification output (they still appear in the zone summary).
    pub min_zone_size: usize,
}

impl Default for ZoningParams {
    fn default() -> Self {
        Self { min_zone_size: 5 }
    }
}

impl AnalysisConfig {
    /// Checks every parameter before any computation starts.
    ///
    /// Reports the first offending parameter by name rather than failing
    /// somewhere in the middle of a classification pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct_bounds = [
            ("abc.a_threshold_pct", self.abc.a_threshold_pct),
            ("abc.b_threshold_pct", self.abc.b_threshold_pct),
            ("xyz.x_threshold_pct", self.xyz.x_threshold_pct),
            ("xyz.y_threshold_pct", self.xyz.y_threshold_pct),
        ];
        for (name, value) in pct_bounds {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::invalid(
                    name,
                    format!("{value} is not within [0, 100]"),
                ));
            }
        }
        if self.abc.a_threshold_pct >= self.abc.b_threshold_pct {
            return Err(ConfigError::invalid(
                "abc.a_threshold_pct",
                format!(
                    "must be below abc.b_threshold_pct ({} >= {})",
                    self.abc.a_threshold_pct, self.abc.b_threshold_pct
                ),
            ));
        }
        if self.xyz.x_threshold_pct >= self.xyz.y_threshold_pct {
            return Err(ConfigError::invalid(
                "xyz.x_threshold_pct",
                format!(
                    "must be below xyz.y_threshold_pct ({} >= {})",
                    self.xyz.x_threshold_pct, self.xyz.y_threshold_pct
                ),
            ));
        }
        if !self.planning.lead_time_weeks.is_finite() || self.planning.lead_time_weeks < 0.0 {
            return Err(ConfigError::invalid(
                "planning.lead_time_weeks",
                "must be a non-negative number",
            ));
        }
        if !self.planning.weeks_per_month.is_finite() || self.planning.weeks_per_month <= 0.0 {
            return Err(ConfigError::invalid(
                "planning.weeks_per_month",
                "must be a positive number",
            ));
        }
        let factors = [
            (
                "planning.safety_stock_factor.x",
                self.planning.safety_stock_factor.x,
            ),
            (
                "planning.safety_stock_factor.y",
                self.planning.safety_stock_factor.y,
            ),
            (
                "planning.safety_stock_factor.z",
                self.planning.safety_stock_factor.z,
            ),
            ("planning.max_qty_factor.a", self.planning.max_qty_factor.a),
            ("planning.max_qty_factor.b", self.planning.max_qty_factor.b),
            ("planning.max_qty_factor.c", self.planning.max_qty_factor.c),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(name, "must be a non-negative number"));
            }
        }
        if self.zoning.min_zone_size == 0 {
            return Err(ConfigError::invalid(
                "zoning.min_zone_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
