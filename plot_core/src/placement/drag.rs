//! Drag session state, move outcomes and the transient collision signal.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::ItemKind;
use crate::geometry::Point;

/// How long a collision highlight stays up unless a successful move clears it.
pub const DEFAULT_COLLISION_HIGHLIGHT: Duration = Duration::from_millis(500);

/// Per-item drag state machine: `Idle -> Dragging -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer-to-item-origin offset captured at `begin_drag`
    Dragging { offset: Point },
}

/// Result of a single drag update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The position was accepted. `pinned` is set when the candidate had to
    /// be clamped to stay inside the envelope.
    Moved { position: Point, pinned: bool },
    /// The candidate overlapped another enabled item; nothing moved.
    Collided { with: ItemKind },
    /// No drag session is open for this item.
    NotDragging,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Transient "these two collided" signal for UI highlighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSignal {
    /// The item being dragged
    pub moving: ItemKind,
    /// The item it would have overlapped
    pub with: ItemKind,
    pub raised_at: Instant,
}

impl CollisionSignal {
    /// Still visible at `now` given the highlight duration?
    pub fn is_active_at(&self, now: Instant, duration: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) < duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_expiry() {
        let raised_at = Instant::now();
        let signal = CollisionSignal {
            moving: ItemKind::Lift,
            with: ItemKind::House,
            raised_at,
        };
        assert!(signal.is_active_at(raised_at, DEFAULT_COLLISION_HIGHLIGHT));
        assert!(signal.is_active_at(raised_at + Duration::from_millis(499), DEFAULT_COLLISION_HIGHLIGHT));
        assert!(!signal.is_active_at(raised_at + Duration::from_millis(500), DEFAULT_COLLISION_HIGHLIGHT));
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&MoveOutcome::Collided { with: ItemKind::Parking }).unwrap();
        assert_eq!(json, r#"{"outcome":"collided","with":"parking"}"#);
    }
}
