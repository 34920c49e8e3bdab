//! # Coverage / FAR Compliance
//!
//! Derives plot, buildable and built-up areas plus ground coverage and floor
//! area ratio, then checks them against configurable limits.
//!
//! ## Formulas
//!
//! - plot area = width x length
//! - buildable width/length = plot dimension minus both setbacks, floored at 0
//! - actual footprint = requested footprint clamped to the buildable envelope
//! - ground floor area = actual footprint width x length
//! - ground coverage % = ground floor area / plot area x 100 (0 if plot area is 0)
//! - FAR = total built-up area / plot area (0 if plot area is 0)
//!
//! `is_footprint_within_buildable` compares the *requested* footprint, so it
//! can be false even though the clamped footprint always fits.
//!
//! ## Example
//!
//! ```rust
//! use plot_core::calculations::{calculate, ComplianceInput};
//! use plot_core::plot::{PlotSpec, Setbacks};
//!
//! let plot = PlotSpec::new(50.0, 100.0).with_setbacks(Setbacks {
//!     front_ft: 15.0,
//!     back_ft: 10.0,
//!     left_ft: 0.0,
//!     right_ft: 0.0,
//! });
//! let metrics = calculate(&ComplianceInput::new(plot, 30.0, 60.0, 3));
//!
//! assert_eq!(metrics.ground_floor_area_sqft, 1800.0);
//! assert_eq!(metrics.total_built_up_area_sqft, 5400.0);
//! assert!((metrics.far - 1.08).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::floor_area::{net_floor_areas, FloorAreaBreakdown, FloorRecord, ItemAreas};
use super::DeductionMode;
use crate::input::coerce_non_negative;
use crate::placement::PlaceableItem;
use crate::plot::PlotSpec;

/// Default maximum ground coverage (%)
pub const DEFAULT_MAX_GROUND_COVERAGE_PCT: f64 = 60.0;

/// Default maximum floor area ratio
pub const DEFAULT_MAX_FAR: f64 = 2.5;

/// Default storey height used for total building height (ft)
pub const DEFAULT_FLOOR_HEIGHT_FT: f64 = 10.0;

/// Regulatory limits checked by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceLimits {
    pub max_ground_coverage_pct: f64,
    pub max_far: f64,
}

impl Default for ComplianceLimits {
    fn default() -> Self {
        ComplianceLimits {
            max_ground_coverage_pct: DEFAULT_MAX_GROUND_COVERAGE_PCT,
            max_far: DEFAULT_MAX_FAR,
        }
    }
}

/// Requested building footprint (ft), before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub width_ft: f64,
    pub length_ft: f64,
}

impl Footprint {
    pub fn new(width_ft: f64, length_ft: f64) -> Self {
        Footprint { width_ft, length_ft }
    }
}

/// Input parameters for the compliance calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "plot": {
///     "width_ft": 50.0, "length_ft": 100.0, "road_width_ft": 30.0,
///     "setbacks": { "front_ft": 15.0, "back_ft": 10.0, "left_ft": 5.0, "right_ft": 5.0 },
///     "orientation_deg": 0.0
///   },
///   "footprint": { "width_ft": 30.0, "length_ft": 60.0 },
///   "floors": 3,
///   "mode": "clamp_footprint"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceInput {
    pub plot: PlotSpec,

    pub footprint: Footprint,

    /// Number of floors (clamp-footprint mode)
    pub floors: u32,

    /// Floor list, ground floor first (per-floor mode)
    #[serde(default)]
    pub floor_records: Vec<FloorRecord>,

    /// Deductible structure areas (per-floor mode)
    #[serde(default)]
    pub item_areas: ItemAreas,

    #[serde(default)]
    pub limits: ComplianceLimits,

    #[serde(default)]
    pub mode: DeductionMode,

    #[serde(default = "default_floor_height")]
    pub floor_height_ft: f64,
}

fn default_floor_height() -> f64 {
    DEFAULT_FLOOR_HEIGHT_FT
}

impl ComplianceInput {
    /// Clamp-footprint input with default limits.
    pub fn new(plot: PlotSpec, footprint_width_ft: f64, footprint_length_ft: f64, floors: u32) -> Self {
        ComplianceInput {
            plot,
            footprint: Footprint::new(footprint_width_ft, footprint_length_ft),
            floors,
            floor_records: Vec::new(),
            item_areas: ItemAreas::default(),
            limits: ComplianceLimits::default(),
            mode: DeductionMode::ClampFootprint,
            floor_height_ft: DEFAULT_FLOOR_HEIGHT_FT,
        }
    }

    pub fn with_limits(mut self, limits: ComplianceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_floor_height(mut self, floor_height_ft: f64) -> Self {
        self.floor_height_ft = floor_height_ft;
        self
    }

    /// Switch to per-floor deduction mode with these floors.
    pub fn with_floor_records(mut self, floor_records: Vec<FloorRecord>) -> Self {
        self.floor_records = floor_records;
        self.mode = DeductionMode::PerFloor;
        self
    }

    pub fn with_mode(mut self, mode: DeductionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Take deductible areas from the enabled items.
    pub fn with_items<'a>(mut self, items: impl IntoIterator<Item = &'a PlaceableItem>) -> Self {
        self.item_areas = ItemAreas::from_items(items);
        self
    }

    /// Number of floors the selected mode counts.
    pub fn floor_count(&self) -> u32 {
        match self.mode {
            DeductionMode::ClampFootprint => self.floors,
            DeductionMode::PerFloor => u32::try_from(self.floor_records.len()).unwrap_or(u32::MAX),
        }
    }
}

/// Derived areas, ratios and compliance flags.
///
/// ## JSON Example
///
/// ```json
/// {
///   "plot_area_sqft": 5000.0,
///   "buildable_area_sqft": 3000.0,
///   "ground_floor_area_sqft": 1800.0,
///   "total_built_up_area_sqft": 5400.0,
///   "ground_coverage_pct": 36.0,
///   "far": 1.08,
///   "is_ground_coverage_compliant": true,
///   "is_far_compliant": true,
///   "is_footprint_within_buildable": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    pub plot_area_sqft: f64,
    pub buildable_width_ft: f64,
    pub buildable_length_ft: f64,
    pub buildable_area_sqft: f64,
    pub setback_area_sqft: f64,

    /// Footprint after clamping to the buildable envelope
    pub footprint_width_ft: f64,
    pub footprint_length_ft: f64,

    pub ground_floor_area_sqft: f64,
    pub total_built_up_area_sqft: f64,
    pub floors: u32,
    pub total_height_ft: f64,

    pub ground_coverage_pct: f64,
    pub far: f64,

    pub is_ground_coverage_compliant: bool,
    pub is_far_compliant: bool,
    pub is_footprint_within_buildable: bool,

    pub mode: DeductionMode,

    /// Empty in clamp-footprint mode
    #[serde(default)]
    pub floor_breakdown: Vec<FloorAreaBreakdown>,
}

impl ComplianceMetrics {
    /// All compliance flags hold
    pub fn passes(&self) -> bool {
        self.is_ground_coverage_compliant && self.is_far_compliant && self.is_footprint_within_buildable
    }

    /// Names of the failing checks, in display order.
    pub fn failed_checks(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.is_ground_coverage_compliant {
            failed.push("Ground coverage");
        }
        if !self.is_far_compliant {
            failed.push("FAR");
        }
        if !self.is_footprint_within_buildable {
            failed.push("Footprint within buildable area");
        }
        failed
    }
}

/// Run the compliance calculation.
///
/// Deterministic and side-effect free: identical inputs give bit-identical
/// metrics.
pub fn calculate(input: &ComplianceInput) -> ComplianceMetrics {
    let plot = input.plot.sanitized();
    let requested_width = coerce_non_negative(input.footprint.width_ft);
    let requested_length = coerce_non_negative(input.footprint.length_ft);

    let plot_area = plot.plot_area_sqft();
    let buildable_width = plot.buildable_width_ft();
    let buildable_length = plot.buildable_length_ft();
    let buildable_area = buildable_width * buildable_length;
    let setback_area = plot_area - buildable_area;

    let footprint_width = requested_width.min(buildable_width);
    let footprint_length = requested_length.min(buildable_length);
    let ground_floor_area = footprint_width * footprint_length;

    let floors = input.floor_count();
    let (total_built_up_area, floor_breakdown) = match input.mode {
        DeductionMode::ClampFootprint => (ground_floor_area * f64::from(floors), Vec::new()),
        DeductionMode::PerFloor => {
            let rows = net_floor_areas(&input.floor_records, &input.item_areas, setback_area);
            let total = rows.iter().map(|row| row.net_area_sqft).sum::<f64>();
            (total, rows)
        }
    };

    let (ground_coverage_pct, far) = if plot_area > 0.0 {
        (
            ground_floor_area / plot_area * 100.0,
            total_built_up_area / plot_area,
        )
    } else {
        (0.0, 0.0)
    };

    ComplianceMetrics {
        plot_area_sqft: plot_area,
        buildable_width_ft: buildable_width,
        buildable_length_ft: buildable_length,
        buildable_area_sqft: buildable_area,
        setback_area_sqft: setback_area,
        footprint_width_ft: footprint_width,
        footprint_length_ft: footprint_length,
        ground_floor_area_sqft: ground_floor_area,
        total_built_up_area_sqft: total_built_up_area,
        floors,
        total_height_ft: f64::from(floors) * coerce_non_negative(input.floor_height_ft),
        ground_coverage_pct,
        far,
        is_ground_coverage_compliant: ground_coverage_pct <= input.limits.max_ground_coverage_pct,
        is_far_compliant: far <= input.limits.max_far,
        is_footprint_within_buildable: requested_width <= buildable_width && requested_length <= buildable_length,
        mode: input.mode,
        floor_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{ItemKind, PlaceableItem};
    use crate::plot::Setbacks;

    fn worked_example_plot() -> PlotSpec {
        PlotSpec::new(50.0, 100.0).with_setbacks(Setbacks {
            front_ft: 15.0,
            back_ft: 10.0,
            left_ft: 0.0,
            right_ft: 0.0,
        })
    }

    #[test]
    fn test_worked_example() {
        let metrics = calculate(&ComplianceInput::new(worked_example_plot(), 30.0, 60.0, 3));

        assert_eq!(metrics.plot_area_sqft, 5000.0);
        assert_eq!(metrics.buildable_length_ft, 75.0);
        assert_eq!(metrics.footprint_length_ft, 60.0);
        assert_eq!(metrics.ground_floor_area_sqft, 1800.0);
        assert_eq!(metrics.total_built_up_area_sqft, 5400.0);
        assert!((metrics.far - 1.08).abs() < 1e-12);
        assert!((metrics.ground_coverage_pct - 36.0).abs() < 1e-9);
        assert_eq!(metrics.total_height_ft, 30.0);
        assert!(metrics.passes());
        assert!(metrics.failed_checks().is_empty());
    }

    #[test]
    fn test_zero_plot_area_gives_zero_ratios() {
        let metrics = calculate(&ComplianceInput::new(PlotSpec::new(0.0, 80.0), 20.0, 20.0, 2));
        assert_eq!(metrics.plot_area_sqft, 0.0);
        assert_eq!(metrics.ground_coverage_pct, 0.0);
        assert_eq!(metrics.far, 0.0);
        assert!(!metrics.far.is_nan());
    }

    #[test]
    fn test_footprint_clamped_but_flagged() {
        let plot = PlotSpec::new(40.0, 40.0).with_setbacks(Setbacks::uniform(5.0));
        let metrics = calculate(&ComplianceInput::new(plot, 45.0, 20.0, 1));

        assert_eq!(metrics.footprint_width_ft, 30.0);
        assert!(metrics.footprint_width_ft <= metrics.buildable_width_ft);
        assert_eq!(metrics.ground_floor_area_sqft, 600.0);
        assert!(!metrics.is_footprint_within_buildable);
        assert_eq!(metrics.failed_checks(), vec!["Footprint within buildable area"]);
    }

    #[test]
    fn test_setbacks_larger_than_plot() {
        let plot = PlotSpec::new(20.0, 20.0).with_setbacks(Setbacks::uniform(15.0));
        let metrics = calculate(&ComplianceInput::new(plot, 10.0, 10.0, 2));
        assert_eq!(metrics.buildable_width_ft, 0.0);
        assert_eq!(metrics.buildable_length_ft, 0.0);
        assert_eq!(metrics.footprint_width_ft, 0.0);
        assert_eq!(metrics.ground_floor_area_sqft, 0.0);
        assert_eq!(metrics.setback_area_sqft, 400.0);
    }

    #[test]
    fn test_limits_applied() {
        let limits = ComplianceLimits {
            max_ground_coverage_pct: 30.0,
            max_far: 1.0,
        };
        let metrics = calculate(&ComplianceInput::new(worked_example_plot(), 30.0, 60.0, 3).with_limits(limits));
        assert!(!metrics.is_ground_coverage_compliant);
        assert!(!metrics.is_far_compliant);
        assert_eq!(metrics.failed_checks(), vec!["Ground coverage", "FAR"]);
    }

    #[test]
    fn test_negative_inputs_never_propagate() {
        let plot = PlotSpec::new(-50.0, 100.0);
        let metrics = calculate(&ComplianceInput::new(plot, -10.0, f64::NAN, 2).with_floor_height(-3.0));
        assert_eq!(metrics.plot_area_sqft, 0.0);
        assert_eq!(metrics.footprint_width_ft, 0.0);
        assert_eq!(metrics.footprint_length_ft, 0.0);
        assert_eq!(metrics.total_height_ft, 0.0);
        assert!(metrics.is_footprint_within_buildable);
    }

    #[test]
    fn test_idempotent() {
        let input = ComplianceInput::new(PlotSpec::default(), 33.3, 47.1, 4);
        let a = calculate(&input);
        let b = calculate(&input);
        assert_eq!(a, b);
        assert_eq!(a.far.to_bits(), b.far.to_bits());
        assert_eq!(a.ground_coverage_pct.to_bits(), b.ground_coverage_pct.to_bits());
    }

    #[test]
    fn test_per_floor_mode() {
        // plot 5000, buildable 50 x 75 = 3750, setback area 1250
        let items = vec![
            PlaceableItem::new(ItemKind::Staircase, 10.0, 10.0),
            PlaceableItem::new(ItemKind::Lift, 5.0, 5.0),
            PlaceableItem::new(ItemKind::Parking, 10.0, 20.0),
        ];
        let input = ComplianceInput::new(worked_example_plot(), 30.0, 60.0, 0)
            .with_items(&items)
            .with_floor_records(vec![
                FloorRecord::new("Ground", 3000.0),
                FloorRecord::new("First", 3000.0),
            ]);
        let metrics = calculate(&input);

        assert_eq!(metrics.mode, DeductionMode::PerFloor);
        assert_eq!(metrics.floors, 2);
        assert_eq!(metrics.setback_area_sqft, 1250.0);
        assert_eq!(metrics.floor_breakdown.len(), 2);
        // ground: 3000 - 200 - 100 - 25 - 1250 = 1425; first: 3000 - 100 - 25 - 1250 = 1625
        assert_eq!(metrics.floor_breakdown[0].net_area_sqft, 1425.0);
        assert_eq!(metrics.floor_breakdown[1].net_area_sqft, 1625.0);
        assert_eq!(metrics.total_built_up_area_sqft, 3050.0);
        assert!((metrics.far - 0.61).abs() < 1e-12);
        // coverage still follows the clamped footprint
        assert_eq!(metrics.ground_floor_area_sqft, 1800.0);
    }

    #[test]
    fn test_input_json_defaults() {
        let json = r#"{
            "plot": {"width_ft": 50, "length_ft": 100,
                     "setbacks": {"front_ft": 15, "back_ft": 10, "left_ft": 0, "right_ft": 0}},
            "footprint": {"width_ft": 30, "length_ft": 60},
            "floors": 3
        }"#;
        let input: ComplianceInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.mode, DeductionMode::ClampFootprint);
        assert_eq!(input.floor_height_ft, DEFAULT_FLOOR_HEIGHT_FT);
        assert_eq!(input.limits, ComplianceLimits::default());
        assert_eq!(calculate(&input).total_built_up_area_sqft, 5400.0);
    }
}
