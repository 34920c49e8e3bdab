//! # Plot Specification
//!
//! A plot is a `width x length` rectangle (feet) fronting a road. Setbacks
//! inset it on all four sides to produce the buildable envelope.
//!
//! ```text
//!  (0,0) ────────── front ─────────── (width,0)
//!    │     setback_front                  │
//!    │   ┌──────────────────────────┐     │
//!  left  │    buildable envelope    │  right
//!    │   └──────────────────────────┘     │
//!    │     setback_back                   │
//!  (0,length) ────── back ──────── (width,length)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use plot_core::plot::{PlotSpec, Setbacks};
//!
//! let plot = PlotSpec::new(60.0, 40.0).with_setbacks(Setbacks::uniform(5.0));
//! let envelope = plot.buildable_envelope();
//! assert_eq!((envelope.x, envelope.y), (5.0, 5.0));
//! assert_eq!((envelope.width, envelope.length), (50.0, 30.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::input::{coerce_non_negative, normalize_degrees};

/// Mandatory clear distances from each plot boundary (feet).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Setbacks {
    pub front_ft: f64,
    pub back_ft: f64,
    pub left_ft: f64,
    pub right_ft: f64,
}

impl Setbacks {
    /// Same setback on every side
    pub fn uniform(ft: f64) -> Self {
        Setbacks {
            front_ft: ft,
            back_ft: ft,
            left_ft: ft,
            right_ft: ft,
        }
    }

    pub fn sanitized(self) -> Self {
        Setbacks {
            front_ft: coerce_non_negative(self.front_ft),
            back_ft: coerce_non_negative(self.back_ft),
            left_ft: coerce_non_negative(self.left_ft),
            right_ft: coerce_non_negative(self.right_ft),
        }
    }
}

/// Plot dimensions, road width, setbacks and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    /// Plot width along the road (ft)
    pub width_ft: f64,

    /// Plot depth away from the road (ft)
    pub length_ft: f64,

    /// Width of the fronting road (ft); only affects diagram framing
    #[serde(default)]
    pub road_width_ft: f64,

    pub setbacks: Setbacks,

    /// Clockwise angle of north from the top of the diagram (degrees)
    #[serde(default)]
    pub orientation_deg: f64,
}

impl Default for PlotSpec {
    fn default() -> Self {
        PlotSpec {
            width_ft: 50.0,
            length_ft: 100.0,
            road_width_ft: 30.0,
            setbacks: Setbacks {
                front_ft: 15.0,
                back_ft: 10.0,
                left_ft: 5.0,
                right_ft: 5.0,
            },
            orientation_deg: 0.0,
        }
    }
}

impl PlotSpec {
    /// Plot with no setbacks, road or rotation.
    pub fn new(width_ft: f64, length_ft: f64) -> Self {
        PlotSpec {
            width_ft,
            length_ft,
            road_width_ft: 0.0,
            setbacks: Setbacks::default(),
            orientation_deg: 0.0,
        }
    }

    pub fn with_setbacks(mut self, setbacks: Setbacks) -> Self {
        self.setbacks = setbacks;
        self
    }

    pub fn with_road_width(mut self, road_width_ft: f64) -> Self {
        self.road_width_ft = road_width_ft;
        self
    }

    pub fn with_orientation(mut self, orientation_deg: f64) -> Self {
        self.orientation_deg = orientation_deg;
        self
    }

    /// Copy with every field coerced to a valid value.
    pub fn sanitized(&self) -> Self {
        PlotSpec {
            width_ft: coerce_non_negative(self.width_ft),
            length_ft: coerce_non_negative(self.length_ft),
            road_width_ft: coerce_non_negative(self.road_width_ft),
            setbacks: self.setbacks.sanitized(),
            orientation_deg: normalize_degrees(self.orientation_deg),
        }
    }

    pub fn plot_area_sqft(&self) -> f64 {
        let plot = self.sanitized();
        plot.width_ft * plot.length_ft
    }

    /// Width left after the left/right setbacks, never negative.
    pub fn buildable_width_ft(&self) -> f64 {
        let plot = self.sanitized();
        (plot.width_ft - plot.setbacks.left_ft - plot.setbacks.right_ft).max(0.0)
    }

    /// Length left after the front/back setbacks, never negative.
    pub fn buildable_length_ft(&self) -> f64 {
        let plot = self.sanitized();
        (plot.length_ft - plot.setbacks.front_ft - plot.setbacks.back_ft).max(0.0)
    }

    /// The buildable envelope in plot-local coordinates.
    pub fn buildable_envelope(&self) -> Rect {
        let plot = self.sanitized();
        Rect::new(
            plot.setbacks.left_ft,
            plot.setbacks.front_ft,
            self.buildable_width_ft(),
            self.buildable_length_ft(),
        )
    }

    pub fn buildable_area_sqft(&self) -> f64 {
        self.buildable_width_ft() * self.buildable_length_ft()
    }

    /// Area lost to setbacks
    pub fn setback_area_sqft(&self) -> f64 {
        self.plot_area_sqft() - self.buildable_area_sqft()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_clamped_when_setbacks_exceed_plot() {
        let plot = PlotSpec::new(20.0, 10.0).with_setbacks(Setbacks {
            front_ft: 8.0,
            back_ft: 8.0,
            left_ft: 15.0,
            right_ft: 15.0,
        });
        assert_eq!(plot.buildable_width_ft(), 0.0);
        assert_eq!(plot.buildable_length_ft(), 0.0);
        assert_eq!(plot.buildable_area_sqft(), 0.0);
        assert_eq!(plot.setback_area_sqft(), 200.0);
    }

    #[test]
    fn test_negative_inputs_coerced() {
        let plot = PlotSpec::new(-20.0, f64::NAN).with_setbacks(Setbacks::uniform(-3.0));
        let clean = plot.sanitized();
        assert_eq!(clean.width_ft, 0.0);
        assert_eq!(clean.length_ft, 0.0);
        assert_eq!(clean.setbacks, Setbacks::uniform(0.0));
        assert_eq!(plot.plot_area_sqft(), 0.0);
    }

    #[test]
    fn test_asymmetric_setbacks() {
        let plot = PlotSpec::default();
        assert_eq!(plot.buildable_width_ft(), 40.0);
        assert_eq!(plot.buildable_length_ft(), 75.0);
        let envelope = plot.buildable_envelope();
        assert_eq!((envelope.x, envelope.y), (5.0, 15.0));
    }

    #[test]
    fn test_serialization_defaults_optional_fields() {
        let json = r#"{"width_ft":30,"length_ft":40,"setbacks":{"front_ft":1,"back_ft":2,"left_ft":3,"right_ft":4}}"#;
        let plot: PlotSpec = serde_json::from_str(json).unwrap();
        assert_eq!(plot.road_width_ft, 0.0);
        assert_eq!(plot.orientation_deg, 0.0);
        assert_eq!(plot.setbacks.right_ft, 4.0);
    }
}
