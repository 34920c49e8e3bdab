//! # Planner Configuration
//!
//! Tunables that are not part of a saved plan: regulatory limits, storey
//! height, the deduction policy and diagram/interaction constants. Stored as
//! TOML; every field is optional and falls back to its default.
//!
//! ```toml
//! floor_height_ft = 10.5
//! deduction_mode = "per_floor"
//!
//! [limits]
//! max_ground_coverage_pct = 55.0
//! max_far = 2.0
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::compliance::{ComplianceLimits, DEFAULT_FLOOR_HEIGHT_FT};
use crate::calculations::DeductionMode;
use crate::errors::{PlanError, PlanResult};

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/planner.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Storey height used for total building height (ft)
    pub floor_height_ft: f64,
    pub deduction_mode: DeductionMode,
    /// Longest side of the diagram canvas (px). Reports convert to pt and
    /// cap the result to the page width.
    pub max_canvas_dimension_px: f64,
    /// How long a collision highlight stays visible (ms)
    pub collision_highlight_ms: u64,
    pub limits: ComplianceLimits,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            floor_height_ft: DEFAULT_FLOOR_HEIGHT_FT,
            deduction_mode: DeductionMode::ClampFootprint,
            max_canvas_dimension_px: 600.0,
            collision_highlight_ms: 500,
            limits: ComplianceLimits::default(),
        }
    }
}

impl PlannerConfig {
    /// Load from [`DEFAULT_CONFIG_PATH`].
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PlannerConfig::default()
                }
            },
            Err(err) => {
                warn!("Could not read {}: {err}. Using defaults", path.display());
                PlannerConfig::default()
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> PlanResult<Self> {
        toml::from_str(contents).map_err(|e| PlanError::ConfigError {
            reason: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> PlanResult<String> {
        toml::to_string_pretty(self).map_err(|e| PlanError::ConfigError {
            reason: e.to_string(),
        })
    }

    pub fn collision_highlight(&self) -> Duration {
        Duration::from_millis(self.collision_highlight_ms)
    }
}
