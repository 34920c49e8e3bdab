//! # Plan Snapshots
//!
//! `PlanSnapshot` is the root container for everything a session needs to
//! restore: plot inputs, requested footprint, floors, item definitions with
//! their positions, and free-text site details. It is stored as JSON under
//! [`SNAPSHOT_KEY`] in a [`KeyValueStore`].
//!
//! ## Structure
//!
//! ```text
//! PlanSnapshot
//! ├── version, saved_at
//! ├── plot: PlotSpec (dimensions, road, setbacks, orientation)
//! ├── footprint + floors / floor_records
//! ├── items: Vec<PlaceableItem> (with positions)
//! ├── surroundings: Surroundings (what lies N/S/E/W)
//! └── identification: Identification (owner, plot number, location)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use plot_core::snapshot::{load_snapshot, save_snapshot, PlanSnapshot};
//! use plot_core::store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let mut plan = PlanSnapshot::default();
//! plan.identification.plot_number = "17-B".to_string();
//!
//! save_snapshot(&mut store, &plan)?;
//! let restored = load_snapshot(&store)?.expect("snapshot was saved");
//! assert_eq!(restored.identification.plot_number, "17-B");
//! # Ok::<(), plot_core::errors::PlanError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::{calculate, ComplianceInput, ComplianceMetrics, DeductionMode, FloorRecord, Footprint};
use crate::config::PlannerConfig;
use crate::errors::{PlanError, PlanResult};
use crate::placement::{default_items, PlaceableItem, PlacementEngine};
use crate::plot::PlotSpec;
use crate::store::KeyValueStore;

/// Current schema version for saved plans
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Store key the plan lives under
pub const SNAPSHOT_KEY: &str = "plot_plan";

/// What borders the plot on each side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Surroundings {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

/// Who and where the plan is for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Identification {
    pub owner_name: String,
    pub plot_number: String,
    pub location: String,
}

/// Everything needed to restore a planning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub saved_at: DateTime<Utc>,

    pub plot: PlotSpec,

    /// Requested building footprint, before clamping
    pub footprint: Footprint,

    /// Floor count used in clamp-footprint mode
    pub floors: u32,

    /// Floor list used in per-floor mode, ground floor first
    #[serde(default)]
    pub floor_records: Vec<FloorRecord>,

    pub items: Vec<PlaceableItem>,

    #[serde(default)]
    pub surroundings: Surroundings,

    #[serde(default)]
    pub identification: Identification,
}

impl Default for PlanSnapshot {
    fn default() -> Self {
        PlanSnapshot {
            version: SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            plot: PlotSpec::default(),
            footprint: Footprint::new(30.0, 40.0),
            floors: 2,
            floor_records: vec![
                FloorRecord::new("Ground Floor", 1500.0),
                FloorRecord::new("First Floor", 1500.0),
            ],
            items: default_items(),
            surroundings: Surroundings {
                north: "30 ft road".to_string(),
                south: "Neighbouring plot".to_string(),
                east: "Neighbouring plot".to_string(),
                west: "Neighbouring plot".to_string(),
            },
            identification: Identification::default(),
        }
    }
}

impl PlanSnapshot {
    /// Build a placement engine holding this plan's items.
    pub fn engine(&self, config: &PlannerConfig) -> PlacementEngine {
        PlacementEngine::new(self.plot.buildable_envelope(), self.items.iter().cloned())
            .with_highlight_duration(config.collision_highlight())
    }

    /// Copy the engine's authoritative items (and positions) into the plan.
    pub fn capture_positions(&mut self, engine: &PlacementEngine) {
        self.items = engine.to_items();
    }

    /// Calculator input for this plan under `config`'s limits and policy.
    pub fn compliance_input(&self, config: &PlannerConfig) -> ComplianceInput {
        let input = ComplianceInput::new(self.plot, self.footprint.width_ft, self.footprint.length_ft, self.floors)
            .with_limits(config.limits)
            .with_floor_height(config.floor_height_ft)
            .with_items(&self.items);
        match config.deduction_mode {
            DeductionMode::ClampFootprint => input,
            DeductionMode::PerFloor => input.with_floor_records(self.floor_records.clone()),
        }
    }

    pub fn metrics(&self, config: &PlannerConfig) -> ComplianceMetrics {
        calculate(&self.compliance_input(config))
    }
}

/// Serialize `snapshot` into the store under [`SNAPSHOT_KEY`], stamping `saved_at`.
pub fn save_snapshot<S: KeyValueStore + ?Sized>(store: &mut S, snapshot: &PlanSnapshot) -> PlanResult<()> {
    let mut stamped = snapshot.clone();
    stamped.version = SCHEMA_VERSION.to_string();
    stamped.saved_at = Utc::now();

    let json = serde_json::to_string_pretty(&stamped).map_err(|e| PlanError::serialization(e.to_string()))?;
    store.set(SNAPSHOT_KEY, &json)?;

    info!(items = stamped.items.len(), "saved plan snapshot");
    Ok(())
}

/// Restore the saved plan, or `None` if nothing has been saved.
///
/// # Returns
///
/// * `Ok(Some(PlanSnapshot))` - Successfully restored
/// * `Ok(None)` - Store has no plan
/// * `Err(PlanError::VersionMismatch)` - Saved with an incompatible schema
/// * `Err(PlanError::SerializationError)` - Invalid JSON
pub fn load_snapshot<S: KeyValueStore + ?Sized>(store: &S) -> PlanResult<Option<PlanSnapshot>> {
    let Some(json) = store.get(SNAPSHOT_KEY)? else {
        return Ok(None);
    };

    let snapshot: PlanSnapshot = serde_json::from_str(&json)
        .map_err(|e| PlanError::serialization(format!("Invalid plan snapshot: {}", e)))?;

    validate_version(&snapshot.version)?;

    info!(saved_at = %snapshot.saved_at, "restored plan snapshot");
    Ok(Some(snapshot))
}

/// Restore the saved plan, falling back to defaults when it is missing or unreadable.
pub fn load_or_default<S: KeyValueStore + ?Sized>(store: &S) -> PlanSnapshot {
    match load_snapshot(store) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => PlanSnapshot::default(),
        Err(err) => {
            warn!("Could not restore plan: {err}. Using defaults");
            PlanSnapshot::default()
        }
    }
}

/// Clear the saved plan and return the compiled-in defaults.
pub fn reset_snapshot<S: KeyValueStore + ?Sized>(store: &mut S) -> PlanResult<PlanSnapshot> {
    store.remove(SNAPSHOT_KEY)?;
    info!("reset plan snapshot to defaults");
    Ok(PlanSnapshot::default())
}

/// Validate that a snapshot version is compatible with the current schema.
fn validate_version(file_version: &str) -> PlanResult<()> {
    let mismatch = || PlanError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is unreadable
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
