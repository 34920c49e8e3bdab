//! # Error Types
//!
//! Structured error types for plot_core. The core has no fatal paths:
//! bad numbers are coerced, oversized footprints are clamped and colliding
//! moves are refused. The errors below cover the few operations that can
//! reject a request outright (resizing an item past the buildable envelope
//! or onto a neighbour, dragging an unknown item) plus the surrounding
//! snapshot/config/report plumbing.
//!
//! ## Example
//!
//! ```rust
//! use plot_core::errors::PlanError;
//! use plot_core::placement::{ItemKind, PlaceableItem, PlacementEngine};
//! use plot_core::plot::PlotSpec;
//!
//! let mut engine = PlacementEngine::new(
//!     PlotSpec::new(60.0, 40.0).buildable_envelope(),
//!     vec![PlaceableItem::new(ItemKind::Lift, 6.0, 6.0)],
//! );
//!
//! let err = engine.set_item_dimensions(ItemKind::Lift, 500.0, 6.0).unwrap_err();
//! assert!(matches!(err, PlanError::ExceedsEnvelope { .. }));
//! assert_eq!(err.error_code(), "EXCEEDS_ENVELOPE");
//! assert!(err.is_recoverable());
//!
//! let json = serde_json::to_string(&err).unwrap();
//! assert!(json.contains("\"type\":\"ExceedsEnvelope\""));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for plot_core operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Structured error type for planning operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PlanError {
    /// No placeable item with this key exists in the engine
    #[error("Item not found: {item}")]
    ItemNotFound { item: String },

    /// The item exists but is disabled, so it cannot be dragged
    #[error("Item is disabled: {item}")]
    ItemDisabled { item: String },

    /// Requested item dimensions do not fit inside the buildable envelope
    #[error(
        "Item '{item}' ({width_ft} x {length_ft} ft) exceeds buildable envelope \
         ({envelope_width_ft} x {envelope_length_ft} ft)"
    )]
    ExceedsEnvelope {
        item: String,
        width_ft: f64,
        length_ft: f64,
        envelope_width_ft: f64,
        envelope_length_ft: f64,
    },

    /// Requested item dimensions would overlap another enabled item
    #[error("Item '{item}' would overlap '{with}'")]
    Overlaps { item: String, with: String },

    /// Snapshot store I/O error
    #[error("Store error: {operation} on '{key}' - {reason}")]
    StoreError {
        operation: String,
        key: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Snapshot schema version mismatch
    #[error("Version mismatch: snapshot version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Configuration file could not be parsed
    #[error("Config error: {reason}")]
    ConfigError { reason: String },

    /// Report generation failed
    #[error("Report failed: {reason}")]
    ReportFailed { reason: String },
}

impl PlanError {
    /// Create an ItemNotFound error
    pub fn item_not_found(item: impl Into<String>) -> Self {
        PlanError::ItemNotFound { item: item.into() }
    }

    /// Create an ItemDisabled error
    pub fn item_disabled(item: impl Into<String>) -> Self {
        PlanError::ItemDisabled { item: item.into() }
    }

    /// Create a StoreError
    pub fn store_error(operation: impl Into<String>, key: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::StoreError {
            operation: operation.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        PlanError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a rejection the user can recover from by adjusting input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlanError::ExceedsEnvelope { .. } | PlanError::Overlaps { .. } | PlanError::ItemDisabled { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PlanError::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            PlanError::ItemDisabled { .. } => "ITEM_DISABLED",
            PlanError::ExceedsEnvelope { .. } => "EXCEEDS_ENVELOPE",
            PlanError::Overlaps { .. } => "OVERLAPS",
            PlanError::StoreError { .. } => "STORE_ERROR",
            PlanError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PlanError::VersionMismatch { .. } => "VERSION_MISMATCH",
            PlanError::ConfigError { .. } => "CONFIG_ERROR",
            PlanError::ReportFailed { .. } => "REPORT_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = PlanError::ExceedsEnvelope {
            item: "house".to_string(),
            width_ft: 60.0,
            length_ft: 20.0,
            envelope_width_ft: 50.0,
            envelope_length_ft: 30.0,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"ExceedsEnvelope\""));
        let roundtrip: PlanError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PlanError::item_not_found("lift").error_code(), "ITEM_NOT_FOUND");
        assert_eq!(PlanError::serialization("bad").error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_recoverable() {
        assert!(PlanError::item_disabled("parking").is_recoverable());
        assert!(PlanError::Overlaps { item: "house".into(), with: "lift".into() }.is_recoverable());
        assert!(!PlanError::store_error("read", "k", "io").is_recoverable());
    }
}
