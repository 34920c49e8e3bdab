//! # Plot Calculations
//!
//! Pure, deterministic formulas. Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Metrics` / `*Breakdown` - Results (JSON-serializable)
//! - `calculate(input)` - Pure function with no side effects
//!
//! Unlike most of the crate's APIs, these never return an error: invalid
//! numbers are coerced to zero, oversized footprints are clamped and ratios
//! over a zero plot area are reported as zero.
//!
//! ## Available Calculations
//!
//! - [`compliance`] - Areas, ground coverage, FAR and compliance flags
//! - [`floor_area`] - Per-floor net built-up area after internal deductions

pub mod compliance;
pub mod floor_area;

use serde::{Deserialize, Serialize};

pub use compliance::{calculate, ComplianceInput, ComplianceLimits, ComplianceMetrics, Footprint};
pub use floor_area::{FloorAreaBreakdown, FloorRecord, ItemAreas};

/// How total built-up area is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMode {
    /// Clamped ground footprint repeated on every floor
    #[default]
    ClampFootprint,
    /// Sum of per-floor gross areas net of parking, staircase, lift and setback
    PerFloor,
}

impl DeductionMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            DeductionMode::ClampFootprint => "Footprint x floors",
            DeductionMode::PerFloor => "Per-floor deductions",
        }
    }
}

impl std::fmt::Display for DeductionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
