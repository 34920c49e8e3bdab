//! # Placement Engine
//!
//! Owns the authoritative position of every placeable item and enforces two
//! rules while the user drags:
//!
//! 1. **Containment** - an item's rectangle stays inside the buildable
//!    envelope. Out-of-bounds candidates are pinned to the boundary.
//! 2. **Non-overlap** - an item may not overlap any other *enabled* item.
//!    Overlapping candidates are refused outright and the item stays put.
//!
//! Renderers translate pointer events into plot-local feet and call
//! [`PlacementEngine::begin_drag`], [`PlacementEngine::update_drag`] and
//! [`PlacementEngine::end_drag`]; nothing else writes positions.
//!
//! ## Example
//!
//! ```rust
//! use plot_core::geometry::Point;
//! use plot_core::placement::{ItemKind, MoveOutcome, PlaceableItem, PlacementEngine};
//! use plot_core::plot::{PlotSpec, Setbacks};
//!
//! let plot = PlotSpec::new(60.0, 40.0).with_setbacks(Setbacks::uniform(5.0));
//! let mut engine = PlacementEngine::new(
//!     plot.buildable_envelope(),
//!     vec![PlaceableItem::new(ItemKind::Lift, 10.0, 6.0).at(20.0, 10.0)],
//! );
//!
//! // Grab the lift at its top-left corner and drag far past the envelope.
//! engine.begin_drag(ItemKind::Lift, Point::new(20.0, 10.0))?;
//! let outcome = engine.update_drag(ItemKind::Lift, Point::new(100.0, 100.0));
//! assert_eq!(outcome, MoveOutcome::Moved { position: Point::new(45.0, 29.0), pinned: true });
//! engine.end_drag(ItemKind::Lift);
//! # Ok::<(), plot_core::errors::PlanError>(())
//! ```

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::debug;

use super::drag::{CollisionSignal, DragState, MoveOutcome, DEFAULT_COLLISION_HIGHLIGHT};
use super::{Facing, ItemKind, PlaceableItem};
use crate::errors::{PlanError, PlanResult};
use crate::geometry::{Point, Rect};
use crate::input::coerce_non_negative;

/// Constrained drag-and-collision engine for placeable items.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    envelope: Rect,
    items: BTreeMap<ItemKind, PlaceableItem>,
    /// Grab offsets of open drag sessions; absent means idle
    drags: BTreeMap<ItemKind, Point>,
    collision: Option<CollisionSignal>,
    highlight: Duration,
}

impl PlacementEngine {
    /// Create an engine for `envelope`. Each item's position is pinned into
    /// the envelope. A later item with the same kind replaces an earlier one.
    pub fn new(envelope: Rect, items: impl IntoIterator<Item = PlaceableItem>) -> Self {
        let mut engine = PlacementEngine {
            envelope,
            items: items.into_iter().map(|item| (item.kind, item)).collect(),
            drags: BTreeMap::new(),
            collision: None,
            highlight: DEFAULT_COLLISION_HIGHLIGHT,
        };
        engine.pin_all();
        engine
    }

    /// Override how long collision signals stay active.
    pub fn with_highlight_duration(mut self, highlight: Duration) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn envelope(&self) -> Rect {
        self.envelope
    }

    /// Replace the envelope after a plot or setback edit and re-pin every item.
    pub fn set_envelope(&mut self, envelope: Rect) {
        self.envelope = envelope;
        self.pin_all();
    }

    pub fn item(&self, kind: ItemKind) -> Option<&PlaceableItem> {
        self.items.get(&kind)
    }

    /// All items in key order
    pub fn items(&self) -> impl Iterator<Item = &PlaceableItem> {
        self.items.values()
    }

    pub fn enabled_items(&self) -> impl Iterator<Item = &PlaceableItem> {
        self.items.values().filter(|item| item.enabled)
    }

    pub fn position(&self, kind: ItemKind) -> Option<Point> {
        self.items.get(&kind).map(|item| item.position)
    }

    /// False when an item is larger than the envelope (possible after the
    /// envelope shrinks). Renderers flag these items.
    pub fn is_within_envelope(&self, kind: ItemKind) -> bool {
        self.items
            .get(&kind)
            .is_some_and(|item| self.envelope.contains_rect(&item.rect()))
    }

    /// Resize an item. Rejected when the new size cannot fit the envelope,
    /// or when the resized rectangle would overlap another enabled item. A
    /// rejected resize leaves the item untouched.
    pub fn set_item_dimensions(&mut self, kind: ItemKind, width_ft: f64, length_ft: f64) -> PlanResult<()> {
        let width_ft = coerce_non_negative(width_ft);
        let length_ft = coerce_non_negative(length_ft);
        let envelope = self.envelope;

        let item = self
            .items
            .get(&kind)
            .ok_or_else(|| PlanError::item_not_found(kind.key()))?;

        if width_ft > envelope.width || length_ft > envelope.length {
            debug!(item = kind.key(), width_ft, length_ft, "resize rejected: exceeds envelope");
            return Err(PlanError::ExceedsEnvelope {
                item: kind.key().to_string(),
                width_ft,
                length_ft,
                envelope_width_ft: envelope.width,
                envelope_length_ft: envelope.length,
            });
        }

        let position = envelope.clamp_origin(item.position, width_ft, length_ft);
        if item.enabled {
            let rect = Rect::at(position, width_ft, length_ft);
            if let Some(with) = self.blocker(kind, &rect) {
                debug!(item = kind.key(), with = with.key(), width_ft, length_ft, "resize rejected: overlap");
                return Err(PlanError::Overlaps {
                    item: kind.key().to_string(),
                    with: with.key().to_string(),
                });
            }
        }

        if let Some(item) = self.items.get_mut(&kind) {
            item.width_ft = width_ft;
            item.length_ft = length_ft;
            item.position = position;
        }
        Ok(())
    }

    /// Enable or disable an item. Disabling closes any open drag on it and
    /// removes it from collision checks.
    pub fn set_enabled(&mut self, kind: ItemKind, enabled: bool) -> PlanResult<()> {
        let item = self
            .items
            .get_mut(&kind)
            .ok_or_else(|| PlanError::item_not_found(kind.key()))?;
        item.enabled = enabled;
        if !enabled {
            self.drags.remove(&kind);
            if self
                .collision
                .is_some_and(|signal| signal.moving == kind || signal.with == kind)
            {
                self.collision = None;
            }
        }
        Ok(())
    }

    pub fn set_description(&mut self, kind: ItemKind, description: impl Into<String>) -> PlanResult<()> {
        let item = self
            .items
            .get_mut(&kind)
            .ok_or_else(|| PlanError::item_not_found(kind.key()))?;
        item.description = description.into();
        Ok(())
    }

    /// Set the house facing. Other items have no facing; the call is ignored.
    pub fn set_facing(&mut self, kind: ItemKind, facing: Facing) -> PlanResult<()> {
        let item = self
            .items
            .get_mut(&kind)
            .ok_or_else(|| PlanError::item_not_found(kind.key()))?;
        if kind == ItemKind::House {
            item.facing = Some(facing);
        } else {
            debug!(item = kind.key(), "facing ignored for non-house item");
        }
        Ok(())
    }

    pub fn drag_state(&self, kind: ItemKind) -> DragState {
        match self.drags.get(&kind) {
            Some(&offset) => DragState::Dragging { offset },
            None => DragState::Idle,
        }
    }

    /// Open a drag session. The grab offset is remembered so the item tracks
    /// the same point under the pointer. A repeated call resets the offset.
    pub fn begin_drag(&mut self, kind: ItemKind, pointer: Point) -> PlanResult<()> {
        let item = self
            .items
            .get(&kind)
            .ok_or_else(|| PlanError::item_not_found(kind.key()))?;
        if !item.enabled {
            return Err(PlanError::item_disabled(kind.key()));
        }
        self.drags.insert(kind, pointer - item.position);
        Ok(())
    }

    /// Move the dragged item so its grab point sits under `pointer`.
    pub fn update_drag(&mut self, kind: ItemKind, pointer: Point) -> MoveOutcome {
        self.update_drag_at(kind, pointer, Instant::now())
    }

    /// [`update_drag`](Self::update_drag) with an explicit clock.
    pub fn update_drag_at(&mut self, kind: ItemKind, pointer: Point, now: Instant) -> MoveOutcome {
        let Some(offset) = self.drags.get(&kind).copied() else {
            return MoveOutcome::NotDragging;
        };
        let Some(item) = self.items.get(&kind).filter(|item| item.enabled) else {
            return MoveOutcome::NotDragging;
        };

        let candidate = pointer - offset;
        let position = self.envelope.clamp_origin(candidate, item.width_ft, item.length_ft);
        let pinned = position != candidate;
        let rect = Rect::at(position, item.width_ft, item.length_ft);

        if let Some(with) = self.blocker(kind, &rect) {
            debug!(item = kind.key(), with = with.key(), x = position.x, y = position.y, "move rejected: collision");
            self.collision = Some(CollisionSignal {
                moving: kind,
                with,
                raised_at: now,
            });
            return MoveOutcome::Collided { with };
        }

        if let Some(item) = self.items.get_mut(&kind) {
            item.position = position;
        }
        self.collision = None;
        MoveOutcome::Moved { position, pinned }
    }

    /// Close the drag session. Safe to call when no session is open.
    pub fn end_drag(&mut self, kind: ItemKind) {
        self.drags.remove(&kind);
    }

    /// Current collision highlight, if it has not yet expired.
    pub fn active_collision(&self) -> Option<CollisionSignal> {
        self.active_collision_at(Instant::now())
    }

    pub fn active_collision_at(&self, now: Instant) -> Option<CollisionSignal> {
        self.collision
            .filter(|signal| signal.is_active_at(now, self.highlight))
    }

    /// Drop an expired collision signal. Renderers call this on their tick.
    pub fn expire_collision_at(&mut self, now: Instant) {
        self.collision = self.active_collision_at(now);
    }

    /// Owned copies of every item, for snapshots and reports.
    pub fn to_items(&self) -> Vec<PlaceableItem> {
        self.items.values().cloned().collect()
    }

    /// First enabled item other than `kind` that overlaps `rect`.
    fn blocker(&self, kind: ItemKind, rect: &Rect) -> Option<ItemKind> {
        self.items
            .values()
            .find(|other| other.kind != kind && other.enabled && other.rect().overlaps(rect))
            .map(|other| other.kind)
    }

    fn pin_all(&mut self) {
        let envelope = self.envelope;
        for item in self.items.values_mut() {
            item.position = envelope.clamp_origin(item.position, item.width_ft, item.length_ft);
        }
    }
}
