//! # Plotwise CLI
//!
//! Terminal front-end for the plot planner. Collects plot and item inputs
//! from stdin, prints the compliance breakdown (human-readable and JSON),
//! walks the staircase through a short drag session on a virtual canvas to
//! show containment and collision handling, then optionally saves the plan
//! and exports a PDF report.
//!
//! The previous session's plan is restored from `.plotwise/` and its values
//! are offered as prompt defaults. Set `RUST_LOG=debug` to see engine logs.

use std::io::{self, BufRead, Write};
use std::path::Path;

use plot_core::config::{PlannerConfig, DEFAULT_CONFIG_PATH};
use plot_core::geometry::Point;
use plot_core::input::{parse_count, parse_flag, parse_non_negative};
use plot_core::layout::DiagramScale;
use plot_core::placement::{Facing, ItemKind, MoveOutcome, PlacementEngine};
use plot_core::report::render_plan_pdf;
use plot_core::snapshot::{load_or_default, save_snapshot, PlanSnapshot};
use plot_core::store::DirectoryStore;
use plot_core::ComplianceMetrics;
use tracing::info;

const STORE_DIR: &str = ".plotwise";

fn prompt_text(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(label: &str, default: f64) -> f64 {
    match prompt_text(&format!("{} [{}]: ", label, default)) {
        Some(text) => parse_non_negative(&text),
        None => default,
    }
}

fn prompt_u32(label: &str, default: u32) -> u32 {
    match prompt_text(&format!("{} [{}]: ", label, default)) {
        Some(text) => parse_count(&text),
        None => default,
    }
}

fn prompt_flag(label: &str, default: bool) -> bool {
    let hint = if default { "Y/n" } else { "y/N" };
    match prompt_text(&format!("{} [{}]: ", label, hint)) {
        Some(text) => parse_flag(&text) || text.eq_ignore_ascii_case("y"),
        None => default,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting plot_cli v{}", env!("CARGO_PKG_VERSION"));

    let config = if Path::new(DEFAULT_CONFIG_PATH).exists() {
        PlannerConfig::load()
    } else {
        PlannerConfig::default()
    };
    let mut store = DirectoryStore::new(STORE_DIR);
    let mut plan = load_or_default(&store);

    println!("Plotwise CLI - Plot Planning Calculator");
    println!("=======================================");
    println!();

    collect_inputs(&mut plan);

    let mut engine = plan.engine(&config);
    collect_items(&mut engine);
    plan.capture_positions(&engine);

    let metrics = plan.metrics(&config);
    print_metrics(&plan, &metrics, &config);

    run_drag_demo(&mut engine, &canvas_scale(&plan, &config));
    plan.capture_positions(&engine);

    println!();
    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(&metrics) {
        println!("{}", json);
    }
    println!();

    if prompt_flag("Save plan for next session?", false) {
        match save_snapshot(&mut store, &plan) {
            Ok(()) => println!("Plan saved to {}/", STORE_DIR),
            Err(e) => report_error(&e),
        }
    }

    if let Some(path) = prompt_text("Export PDF report to (leave empty to skip): ") {
        match render_plan_pdf(&plan, &metrics, &config) {
            Ok(bytes) => match std::fs::write(&path, bytes) {
                Ok(()) => println!("Report written to {}", path),
                Err(e) => eprintln!("Error: could not write {}: {}", path, e),
            },
            Err(e) => report_error(&e),
        }
    }
}

fn collect_inputs(plan: &mut PlanSnapshot) {
    let plot = &mut plan.plot;
    plot.width_ft = prompt_f64("Plot width (ft)", plot.width_ft);
    plot.length_ft = prompt_f64("Plot length (ft)", plot.length_ft);
    plot.road_width_ft = prompt_f64("Road width (ft)", plot.road_width_ft);
    plot.setbacks.front_ft = prompt_f64("Front setback (ft)", plot.setbacks.front_ft);
    plot.setbacks.back_ft = prompt_f64("Back setback (ft)", plot.setbacks.back_ft);
    plot.setbacks.left_ft = prompt_f64("Left setback (ft)", plot.setbacks.left_ft);
    plot.setbacks.right_ft = prompt_f64("Right setback (ft)", plot.setbacks.right_ft);
    plot.orientation_deg = prompt_f64("North orientation (deg)", plot.orientation_deg);
    *plot = plot.sanitized();

    plan.footprint.width_ft = prompt_f64("Building width (ft)", plan.footprint.width_ft);
    plan.footprint.length_ft = prompt_f64("Building length (ft)", plan.footprint.length_ft);
    plan.floors = prompt_u32("Floors", plan.floors);
    println!();
}

/// House facing plus the optional items. Every change goes through the
/// engine, which refuses sizes that leave the envelope or hit a neighbour.
fn collect_items(engine: &mut PlacementEngine) {
    if let Some(house) = engine.item(ItemKind::House) {
        let current = house.facing.unwrap_or_default();
        if let Some(text) = prompt_text(&format!("House facing (N/S/E/W) [{}]: ", current)) {
            match Facing::from_key(&text) {
                Some(facing) => {
                    if let Err(e) = engine.set_facing(ItemKind::House, facing) {
                        report_error(&e);
                    }
                }
                None => println!("  Unknown direction '{}', keeping {}", text, current),
            }
        }
    }

    for kind in [ItemKind::Staircase, ItemKind::Lift, ItemKind::Parking] {
        let Some(item) = engine.item(kind).cloned() else {
            continue;
        };
        println!();
        println!("{}:", kind.display_name());

        let enabled = prompt_flag("  Include", item.enabled);
        if let Err(e) = engine.set_enabled(kind, enabled) {
            report_error(&e);
            continue;
        }
        if !enabled {
            continue;
        }

        let width_ft = prompt_f64("  Width (ft)", item.width_ft);
        let length_ft = prompt_f64("  Length (ft)", item.length_ft);
        if (width_ft, length_ft) != (item.width_ft, item.length_ft) {
            if let Err(e) = engine.set_item_dimensions(kind, width_ft, length_ft) {
                println!("  Size kept at {:.1} x {:.1} ft: {}", item.width_ft, item.length_ft, e);
            }
        }

        if let Some(description) = prompt_text(&format!("  Description [{}]: ", item.description)) {
            if let Err(e) = engine.set_description(kind, description) {
                report_error(&e);
            }
        }
    }
    println!();
}

/// Canvas transform a renderer would use: plot and road fitted into the
/// configured canvas, road strip along the top.
fn canvas_scale(plan: &PlanSnapshot, config: &PlannerConfig) -> DiagramScale {
    let scale = DiagramScale::fit(&plan.plot, config.max_canvas_dimension_px);
    let road_px = scale.ft_to_units(plan.plot.road_width_ft);
    scale.with_origin(Point::new(0.0, road_px))
}

fn print_metrics(plan: &PlanSnapshot, metrics: &ComplianceMetrics, config: &PlannerConfig) {
    println!("═══════════════════════════════════════");
    println!("  PLOT CALCULATION RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Plot:");
    println!("  Size:       {:.1} x {:.1} ft = {:.0} sq ft", plan.plot.width_ft, plan.plot.length_ft, metrics.plot_area_sqft);
    println!("  Buildable:  {:.1} x {:.1} ft = {:.0} sq ft", metrics.buildable_width_ft, metrics.buildable_length_ft, metrics.buildable_area_sqft);
    println!("  Setback loss: {:.0} sq ft", metrics.setback_area_sqft);
    println!();
    println!("Building:");
    println!("  Footprint:  {:.1} x {:.1} ft (requested {:.1} x {:.1})",
        metrics.footprint_width_ft,
        metrics.footprint_length_ft,
        plan.footprint.width_ft,
        plan.footprint.length_ft
    );
    println!("  Ground floor: {:.0} sq ft", metrics.ground_floor_area_sqft);
    println!("  Total BUA:  {:.0} sq ft over {} floors ({})", metrics.total_built_up_area_sqft, metrics.floors, metrics.mode);
    println!("  Height:     {:.1} ft", metrics.total_height_ft);
    for row in &metrics.floor_breakdown {
        println!("    {:<14} gross {:>7.0}  net {:>7.0}", row.name, row.gross_area_sqft, row.net_area_sqft);
    }
    println!();
    println!("Compliance:");
    println!("  Ground coverage: {:.2}% (max {:.1}%) {}",
        metrics.ground_coverage_pct,
        config.limits.max_ground_coverage_pct,
        status_icon(metrics.is_ground_coverage_compliant)
    );
    println!("  FAR:             {:.2} (max {:.2}) {}",
        metrics.far,
        config.limits.max_far,
        status_icon(metrics.is_far_compliant)
    );
    println!("  Footprint fits:  {}", status_icon(metrics.is_footprint_within_buildable));
    println!();
    println!("═══════════════════════════════════════");
    if metrics.passes() {
        println!("  RESULT: PASS");
    } else {
        println!("  RESULT: FAIL ({})", metrics.failed_checks().join(", "));
    }
    println!("═══════════════════════════════════════");
}

/// Drag the staircase with canvas pointer positions (far corner, canvas
/// origin, onto the house), reporting what the engine does at each step.
fn run_drag_demo(engine: &mut PlacementEngine, scale: &DiagramScale) {
    println!();
    println!("Placement:");
    for item in engine.enabled_items() {
        println!("  {:<10} {:.1} x {:.1} ft at ({:.1}, {:.1})",
            item.kind.display_name(),
            item.width_ft,
            item.length_ft,
            item.position.x,
            item.position.y
        );
    }

    let Some(start) = engine.position(ItemKind::Staircase) else {
        return;
    };
    let grab = scale.plot_to_screen(start);
    if let Err(e) = engine.begin_drag(ItemKind::Staircase, scale.screen_to_plot(grab)) {
        println!("  Staircase drag skipped: {}", e);
        return;
    }

    let envelope = engine.envelope();
    let mut targets = vec![
        ("far corner", scale.plot_to_screen(Point::new(envelope.right() + 100.0, envelope.bottom() + 100.0))),
        ("origin", Point::ORIGIN),
    ];
    if let Some(house) = engine.item(ItemKind::House).filter(|house| house.enabled) {
        targets.push(("house", scale.plot_to_screen(house.position)));
    }

    println!();
    println!("Drag demo (staircase, {:.2} px/ft):", scale.units_per_ft);
    for (label, pointer) in targets {
        match engine.update_drag(ItemKind::Staircase, scale.screen_to_plot(pointer)) {
            MoveOutcome::Moved { position, pinned } => println!(
                "  -> {:<10} moved to ({:.1}, {:.1}){}",
                label,
                position.x,
                position.y,
                if pinned { " [pinned to envelope]" } else { "" }
            ),
            MoveOutcome::Collided { with } => println!("  -> {:<10} refused: would overlap {}", label, with),
            MoveOutcome::NotDragging => println!("  -> {:<10} ignored: not dragging", label),
        }
    }
    engine.end_drag(ItemKind::Staircase);
}

fn report_error(e: &plot_core::PlanError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
