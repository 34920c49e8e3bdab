//! # plot_core - Plot Planning Engine
//!
//! `plot_core` is the computational heart of Plotwise: given a plot, its
//! setbacks and the structures to place on it, it computes coverage and
//! floor-area-ratio compliance and keeps the structures inside the buildable
//! envelope without overlapping each other. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure calculator**: metrics are recomputed from inputs, never cached
//! - **One owner for positions**: only the [`PlacementEngine`] moves items
//! - **No fatal paths**: bad numbers are coerced, oversize is clamped,
//!   overlapping moves are refused
//! - **Renderer-agnostic**: drag input arrives as begin/update/end calls in
//!   plot-local feet
//!
//! ## Quick Start
//!
//! ```rust
//! use plot_core::config::PlannerConfig;
//! use plot_core::snapshot::PlanSnapshot;
//!
//! let config = PlannerConfig::default();
//! let plan = PlanSnapshot::default();
//!
//! let metrics = plan.metrics(&config);
//! assert!(metrics.buildable_area_sqft > 0.0);
//!
//! let json = serde_json::to_string_pretty(&metrics).unwrap();
//! assert!(json.contains("ground_coverage_pct"));
//! ```
//!
//! ## Modules
//!
//! - [`plot`] - Plot dimensions, setbacks, buildable envelope
//! - [`calculations`] - Coverage / FAR compliance and per-floor deductions
//! - [`placement`] - Placeable items and the drag-and-collision engine
//! - [`geometry`] - Points and axis-aligned rectangles in feet
//! - [`layout`] - Feet-to-canvas scaling for renderers
//! - [`input`] - Coercion of raw form values
//! - [`snapshot`] / [`store`] - Session persistence in a flat key-value store
//! - [`report`] - PDF export of the diagram and calculation breakdown
//! - [`config`] - Limits and tunables loaded from TOML
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod placement;
pub mod plot;
pub mod report;
pub mod snapshot;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, ComplianceInput, ComplianceMetrics};
pub use config::PlannerConfig;
pub use errors::{PlanError, PlanResult};
pub use placement::{ItemKind, MoveOutcome, PlaceableItem, PlacementEngine};
pub use plot::{PlotSpec, Setbacks};
pub use snapshot::{load_snapshot, reset_snapshot, save_snapshot, PlanSnapshot};
