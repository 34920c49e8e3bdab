//! # Diagram Scaling
//!
//! Maps plot-local feet to drawing units (pixels, points) with one uniform
//! scale factor, and maps pointer coordinates back to feet so renderers can
//! feed them to the placement engine.
//!
//! The scale fits the plot plus the fronting road into a square canvas:
//! `scale = min(max_dim / (width + road), max_dim / (length + road))`.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::plot::PlotSpec;

/// Uniform feet-to-drawing-unit transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramScale {
    /// Drawing units per foot
    pub units_per_ft: f64,
    /// Drawing-space position of the plot's top-left corner
    pub origin: Point,
}

impl DiagramScale {
    /// Fit `plot` (plus road) into a `max_dimension` square.
    ///
    /// A degenerate plot gives a zero scale rather than an infinite one.
    pub fn fit(plot: &PlotSpec, max_dimension: f64) -> Self {
        let plot = plot.sanitized();
        let span_x = plot.width_ft + plot.road_width_ft;
        let span_y = plot.length_ft + plot.road_width_ft;
        let units_per_ft = if span_x > 0.0 && span_y > 0.0 && max_dimension > 0.0 {
            (max_dimension / span_x).min(max_dimension / span_y)
        } else {
            0.0
        };
        DiagramScale {
            units_per_ft,
            origin: Point::ORIGIN,
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn ft_to_units(&self, ft: f64) -> f64 {
        ft * self.units_per_ft
    }

    pub fn plot_to_screen(&self, point: Point) -> Point {
        Point::new(
            self.origin.x + self.ft_to_units(point.x),
            self.origin.y + self.ft_to_units(point.y),
        )
    }

    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.plot_to_screen(rect.origin());
        Rect::new(
            origin.x,
            origin.y,
            self.ft_to_units(rect.width),
            self.ft_to_units(rect.length),
        )
    }

    /// Convert a pointer position to plot-local feet. Returns the plot origin
    /// when the scale is zero.
    pub fn screen_to_plot(&self, screen: Point) -> Point {
        if self.units_per_ft <= 0.0 {
            return Point::ORIGIN;
        }
        Point::new(
            (screen.x - self.origin.x) / self.units_per_ft,
            (screen.y - self.origin.y) / self.units_per_ft,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_limiting_axis() {
        let plot = PlotSpec::new(50.0, 100.0).with_road_width(20.0);
        let scale = DiagramScale::fit(&plot, 600.0);
        // 600/70 vs 600/120 -> length limits
        assert_eq!(scale.units_per_ft, 5.0);
        assert_eq!(scale.ft_to_units(10.0), 50.0);
    }

    #[test]
    fn test_roundtrip_pointer() {
        let plot = PlotSpec::new(60.0, 40.0);
        let scale = DiagramScale::fit(&plot, 600.0).with_origin(Point::new(20.0, 10.0));
        let feet = Point::new(12.0, 7.0);
        let screen = scale.plot_to_screen(feet);
        assert_eq!(screen, Point::new(140.0, 80.0));
        assert_eq!(scale.screen_to_plot(screen), feet);
    }

    #[test]
    fn test_degenerate_plot() {
        let scale = DiagramScale::fit(&PlotSpec::new(0.0, 0.0), 600.0);
        assert_eq!(scale.units_per_ft, 0.0);
        assert_eq!(scale.screen_to_plot(Point::new(30.0, 30.0)), Point::ORIGIN);
    }

    #[test]
    fn test_rect_to_screen() {
        let scale = DiagramScale::fit(&PlotSpec::new(100.0, 100.0), 200.0);
        let rect = scale.rect_to_screen(&Rect::new(5.0, 10.0, 20.0, 30.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 60.0));
    }
}
