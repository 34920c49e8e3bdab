//! # Plan Report Export
//!
//! Renders a plan to a one-page PDF using Typst: a title block, the scaled
//! site diagram (road, plot, buildable envelope and enabled items), the
//! surroundings table and the full calculation breakdown.
//!
//! ## Architecture
//!
//! - The Typst template is an embedded string constant
//! - Data is injected via placeholder substitution before compilation
//! - User-entered text is inserted as Typst string literals, never as markup
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use plot_core::config::PlannerConfig;
//! use plot_core::report::render_plan_pdf;
//! use plot_core::snapshot::PlanSnapshot;
//!
//! let config = PlannerConfig::default();
//! let plan = PlanSnapshot::default();
//! let metrics = plan.metrics(&config);
//!
//! let pdf_bytes = render_plan_pdf(&plan, &metrics, &config)?;
//! std::fs::write("plot_plan.pdf", pdf_bytes).unwrap();
//! # Ok::<(), plot_core::errors::PlanError>(())
//! ```

use chrono::{Datelike, Utc};
use tracing::info;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::{ComplianceMetrics, DeductionMode};
use crate::config::PlannerConfig;
use crate::errors::{PlanError, PlanResult};
use crate::geometry::{Point, Rect};
use crate::layout::DiagramScale;
use crate::placement::{ItemKind, PlaceableItem};
use crate::snapshot::PlanSnapshot;

/// Longest side the site diagram may take on the page (pt)
const DIAGRAM_MAX_PT: f64 = 450.0;

/// CSS pixel to point (96 dpi to 72 dpi)
const PT_PER_PX: f64 = 0.75;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling a single in-memory document.
struct ReportWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl ReportWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        ReportWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Fonts bundled with typst-assets; no system fonts are consulted.
    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.year(),
            u8::try_from(now.month()).ok()?,
            u8::try_from(now.day()).ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const PLAN_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 0.8in, bottom: 0.8in, left: 0.8in, right: 0.8in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt)[Plot {{PLOT_NUMBER}}]],
      align(right)[#text(size: 8pt)[{{DATE}}]],
    )
  ]
)

#set text(size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 10pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[Plot Plan]
    #v(2pt)
    #text(size: 11pt)[{{OWNER}} #h(8pt) {{LOCATION}}]
  ]
]

#v(8pt)

#grid(
  columns: (auto, 1fr),
  gutter: 16pt,
  [
{{DIAGRAM}}
  ],
  [
    *Surroundings*
    #table(
      columns: (auto, 1fr),
      stroke: 0.5pt,
      inset: 5pt,
      [North], [{{NORTH}}],
      [South], [{{SOUTH}}],
      [East], [{{EAST}}],
      [West], [{{WEST}}],
    )
    #v(6pt)
    *Structures*
    #table(
      columns: (1fr, auto, auto),
      stroke: 0.5pt,
      inset: 5pt,
      table.header([*Item*], [*Size (ft)*], [*At (ft)*]),
{{ITEM_ROWS}}
    )
  ],
)

#v(10pt)

== Calculation Breakdown

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Quantity*], [*Value*], [*Unit*]),
  [Plot ({{PLOT_W}} x {{PLOT_L}})], [{{PLOT_AREA}}], [sq ft],
  [Setbacks F/B/L/R], [{{SETBACKS}}], [ft],
  [Buildable envelope], [{{BUILD_W}} x {{BUILD_L}}], [ft],
  [Buildable area], [{{BUILD_AREA}}], [sq ft],
  [Footprint (clamped)], [{{FOOT_W}} x {{FOOT_L}}], [ft],
  [Ground floor area], [{{GROUND_AREA}}], [sq ft],
  [Floors], [{{FLOORS}}], [],
  [Total built-up area ({{MODE}})], [{{TOTAL_BUA}}], [sq ft],
  [Total height], [{{HEIGHT}}], [ft],
)

{{FLOOR_TABLE}}

== Compliance

#table(
  columns: (1fr, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, right, center),
  table.header([*Check*], [*Actual*], [*Limit*], [*Status*]),
  [Ground coverage], [{{COVERAGE}} %], [{{MAX_COVERAGE}} %], [{{COVERAGE_STATUS}}],
  [Floor area ratio], [{{FAR}}], [{{MAX_FAR}}], [{{FAR_STATUS}}],
  [Footprint within buildable area], [{{REQ_W}} x {{REQ_L}}], [{{BUILD_W}} x {{BUILD_L}}], [{{FOOTPRINT_STATUS}}],
)

#v(6pt)
#align(center)[
  #text(size: 13pt, weight: "bold")[{{OVERALL}}]
]
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Render a plan and its metrics to PDF bytes.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file contents
/// * `Err(PlanError::ReportFailed)` - Typst compilation or PDF export failed
pub fn render_plan_pdf(plan: &PlanSnapshot, metrics: &ComplianceMetrics, config: &PlannerConfig) -> PlanResult<Vec<u8>> {
    let source = build_source(plan, metrics, config);
    let world = ReportWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        PlanError::ReportFailed {
            reason: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        PlanError::ReportFailed {
            reason: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    info!(bytes = pdf_bytes.len(), "rendered plan report");
    Ok(pdf_bytes)
}

/// Fill the template. Split out so the markup can be checked without compiling.
fn build_source(plan: &PlanSnapshot, metrics: &ComplianceMetrics, config: &PlannerConfig) -> String {
    let plot = plan.plot.sanitized();
    let status = |ok: bool| if ok { "OK" } else { "FAIL" };
    let setbacks = format!(
        "{:.1} / {:.1} / {:.1} / {:.1}",
        plot.setbacks.front_ft, plot.setbacks.back_ft, plot.setbacks.left_ft, plot.setbacks.right_ft
    );
    let overall = if metrics.passes() {
        "COMPLIANT".to_string()
    } else {
        format!("NON-COMPLIANT: {}", metrics.failed_checks().join(", "))
    };

    PLAN_TEMPLATE
        .replace("{{PLOT_NUMBER}}", &typst_str(&plan.identification.plot_number))
        .replace("{{OWNER}}", &typst_str(&plan.identification.owner_name))
        .replace("{{LOCATION}}", &typst_str(&plan.identification.location))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{DIAGRAM}}", &diagram_markup(plan, diagram_size_pt(config)))
        .replace("{{NORTH}}", &typst_str(&plan.surroundings.north))
        .replace("{{SOUTH}}", &typst_str(&plan.surroundings.south))
        .replace("{{EAST}}", &typst_str(&plan.surroundings.east))
        .replace("{{WEST}}", &typst_str(&plan.surroundings.west))
        .replace("{{ITEM_ROWS}}", &item_rows(&plan.items))
        .replace("{{PLOT_W}}", &format!("{:.1}", plot.width_ft))
        .replace("{{PLOT_L}}", &format!("{:.1}", plot.length_ft))
        .replace("{{PLOT_AREA}}", &format!("{:.0}", metrics.plot_area_sqft))
        .replace("{{SETBACKS}}", &setbacks)
        .replace("{{BUILD_W}}", &format!("{:.1}", metrics.buildable_width_ft))
        .replace("{{BUILD_L}}", &format!("{:.1}", metrics.buildable_length_ft))
        .replace("{{BUILD_AREA}}", &format!("{:.0}", metrics.buildable_area_sqft))
        .replace("{{FOOT_W}}", &format!("{:.1}", metrics.footprint_width_ft))
        .replace("{{FOOT_L}}", &format!("{:.1}", metrics.footprint_length_ft))
        .replace("{{GROUND_AREA}}", &format!("{:.0}", metrics.ground_floor_area_sqft))
        .replace("{{FLOORS}}", &metrics.floors.to_string())
        .replace("{{MODE}}", metrics.mode.display_name())
        .replace("{{TOTAL_BUA}}", &format!("{:.0}", metrics.total_built_up_area_sqft))
        .replace("{{HEIGHT}}", &format!("{:.1}", metrics.total_height_ft))
        .replace("{{FLOOR_TABLE}}", &floor_table(metrics))
        .replace("{{COVERAGE}}", &format!("{:.2}", metrics.ground_coverage_pct))
        .replace("{{MAX_COVERAGE}}", &format!("{:.1}", config.limits.max_ground_coverage_pct))
        .replace("{{COVERAGE_STATUS}}", status(metrics.is_ground_coverage_compliant))
        .replace("{{FAR}}", &format!("{:.2}", metrics.far))
        .replace("{{MAX_FAR}}", &format!("{:.2}", config.limits.max_far))
        .replace("{{FAR_STATUS}}", status(metrics.is_far_compliant))
        .replace("{{REQ_W}}", &format!("{:.1}", plan.footprint.width_ft))
        .replace("{{REQ_L}}", &format!("{:.1}", plan.footprint.length_ft))
        .replace("{{FOOTPRINT_STATUS}}", status(metrics.is_footprint_within_buildable))
        .replace("{{OVERALL}}", &overall)
}

/// The on-screen canvas size carried over to the page, capped to the text width.
fn diagram_size_pt(config: &PlannerConfig) -> f64 {
    (config.max_canvas_dimension_px * PT_PER_PX).min(DIAGRAM_MAX_PT)
}

/// Road strip above the plot, plot outline, dashed envelope, enabled items
/// and a north arrow rotated by the plot orientation.
fn diagram_markup(plan: &PlanSnapshot, max_dimension_pt: f64) -> String {
    let plot = plan.plot.sanitized();
    let scale = DiagramScale::fit(&plot, max_dimension_pt);
    let road_pt = scale.ft_to_units(plot.road_width_ft);
    let scale = scale.with_origin(Point::new(0.0, road_pt));

    let plot_rect = scale.rect_to_screen(&Rect::new(0.0, 0.0, plot.width_ft, plot.length_ft));
    let envelope = scale.rect_to_screen(&plot.buildable_envelope());

    let mut markup = format!(
        "#block(width: {w:.2}pt, height: {h:.2}pt)[\n",
        w = plot_rect.width,
        h = plot_rect.length + road_pt
    );
    if road_pt > 0.0 {
        markup.push_str(&format!(
            "  #place(top + left, rect(width: {w:.2}pt, height: {h:.2}pt, fill: rgb(\"#d9d9d9\"), stroke: none)[#align(center + horizon)[#text(size: 7pt)[Road]]])\n",
            w = plot_rect.width,
            h = road_pt
        ));
    }
    markup.push_str(&place_rect(&plot_rect, "none", "1pt + black", ""));
    markup.push_str(&place_rect(
        &envelope,
        "none",
        "(paint: rgb(\"#1f77b4\"), thickness: 0.75pt, dash: \"dashed\")",
        "",
    ));

    for item in plan.items.iter().filter(|item| item.enabled) {
        let rect = scale.rect_to_screen(&item.rect());
        let label = format!("#text(size: 6pt)[{}]", item.kind.display_name());
        markup.push_str(&place_rect(&rect, item_fill(item.kind), "0.5pt + black", &label));
    }

    markup.push_str(&format!(
        "  #place(top + right, dx: -4pt, dy: {dy:.2}pt, rotate({deg:.1}deg)[#text(size: 9pt, weight: \"bold\")[↑ N]])\n",
        dy = road_pt + 4.0,
        deg = plot.orientation_deg
    ));
    markup.push_str("]\n");
    markup
}

fn place_rect(rect: &Rect, fill: &str, stroke: &str, label: &str) -> String {
    format!(
        "  #place(top + left, dx: {x:.2}pt, dy: {y:.2}pt, rect(width: {w:.2}pt, height: {h:.2}pt, fill: {fill}, stroke: {stroke}, inset: 1pt)[#align(center + horizon)[{label}]])\n",
        x = rect.x,
        y = rect.y,
        w = rect.width,
        h = rect.length,
    )
}

fn item_fill(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::House => "rgb(\"#f4c27a\")",
        ItemKind::Staircase => "rgb(\"#9ecae1\")",
        ItemKind::Lift => "rgb(\"#c6a0d6\")",
        ItemKind::Parking => "rgb(\"#a1d99b\")",
    }
}

fn item_rows(items: &[PlaceableItem]) -> String {
    items
        .iter()
        .filter(|item| item.enabled)
        .map(|item| {
            let mut name = item.kind.display_name().to_string();
            if let Some(facing) = item.facing {
                name.push_str(&format!(" (facing {})", facing.display_name()));
            }
            let description = if item.description.is_empty() {
                String::new()
            } else {
                format!(" #linebreak() #text(size: 8pt)[{}]", typst_str(&item.description))
            };
            format!(
                "      [{}{}], [{:.1} x {:.1}], [{:.1}, {:.1}],\n",
                name, description, item.width_ft, item.length_ft, item.position.x, item.position.y
            )
        })
        .collect()
}

fn floor_table(metrics: &ComplianceMetrics) -> String {
    if metrics.mode != DeductionMode::PerFloor || metrics.floor_breakdown.is_empty() {
        return String::new();
    }
    let rows: String = metrics
        .floor_breakdown
        .iter()
        .map(|row| {
            format!(
                "  [{}], [{:.0}], [{:.0}], [{:.0}], [{:.0}], [{:.0}], [{:.0}],\n",
                typst_str(&row.name),
                row.gross_area_sqft,
                row.parking_deduction_sqft,
                row.staircase_deduction_sqft,
                row.lift_deduction_sqft,
                row.setback_deduction_sqft,
                row.net_area_sqft
            )
        })
        .collect();
    format!(
        "=== Per-floor deductions (sq ft)\n\n#table(\n  columns: (1fr, auto, auto, auto, auto, auto, auto),\n  inset: 5pt,\n  stroke: 0.5pt,\n  align: (left, right, right, right, right, right, right),\n  table.header([*Floor*], [*Gross*], [*Parking*], [*Stair*], [*Lift*], [*Setback*], [*Net*]),\n{}\n)\n",
        rows
    )
}

/// Insert user text as a Typst string literal so it can never be read as markup.
fn typst_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 3);
    out.push_str("#\"");
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlaceableItem;

    #[test]
    fn test_typst_str_escapes() {
        assert_eq!(typst_str("Plot #4 \"A\""), "#\"Plot #4 \\\"A\\\"\"");
        assert_eq!(typst_str("a\\b\nc"), "#\"a\\\\b\\nc\"");
        assert_eq!(typst_str(""), "#\"\"");
    }

    #[test]
    fn test_source_has_no_unfilled_placeholders() {
        let config = PlannerConfig {
            deduction_mode: DeductionMode::PerFloor,
            ..PlannerConfig::default()
        };
        let plan = PlanSnapshot::default();
        let metrics = plan.metrics(&config);
        let source = build_source(&plan, &metrics, &config);
        assert!(!source.contains("{{"), "unfilled placeholder in:\n{}", source);
        assert!(source.contains("Per-floor deductions"));
    }

    #[test]
    fn test_diagram_skips_disabled_items() {
        let mut plan = PlanSnapshot::default();
        plan.items = vec![
            PlaceableItem::new(ItemKind::House, 20.0, 20.0).at(5.0, 15.0),
            PlaceableItem::new(ItemKind::Parking, 10.0, 10.0).at(30.0, 40.0).disabled(),
        ];
        let markup = diagram_markup(&plan, 300.0);
        assert!(markup.contains("[House]"));
        assert!(!markup.contains("[Parking]"));
        assert!(markup.contains("Road"));
    }

    #[test]
    fn test_diagram_follows_canvas_setting() {
        let small = PlannerConfig {
            max_canvas_dimension_px: 200.0,
            ..PlannerConfig::default()
        };
        assert_eq!(diagram_size_pt(&small), 150.0);

        let huge = PlannerConfig {
            max_canvas_dimension_px: 5000.0,
            ..PlannerConfig::default()
        };
        assert_eq!(diagram_size_pt(&huge), DIAGRAM_MAX_PT);

        // Default plot is 50 x 100 ft behind a 30 ft road, so its length
        // plus road spans the full diagram height.
        let plan = PlanSnapshot::default();
        let metrics = plan.metrics(&small);
        let source = build_source(&plan, &metrics, &small);
        assert!(source.contains("height: 150.00pt"), "diagram not sized from config:\n{}", source);
    }

    #[test]
    fn test_pdf_generation() {
        let config = PlannerConfig::default();
        let mut plan = PlanSnapshot::default();
        plan.identification.owner_name = "Test Owner [#1]".to_string();
        plan.identification.plot_number = "P-42".to_string();
        let metrics = plan.metrics(&config);

        let pdf = render_plan_pdf(&plan, &metrics, &config);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
