//! # Item Placement
//!
//! Rectangular structures (house, staircase, lift, parking) placed inside the
//! buildable envelope. Each item follows the same pattern as the rest of the
//! crate:
//!
//! - [`PlaceableItem`] - JSON-serializable item definition plus its position
//! - [`PlacementEngine`] - sole owner of authoritative positions, driven by a
//!   begin/update/end drag protocol
//! - [`MoveOutcome`] - what a drag update did (moved, pinned, refused)
//!
//! ## Available Items
//!
//! - [`ItemKind::House`] - main structure; the only item with a facing
//! - [`ItemKind::Staircase`]
//! - [`ItemKind::Lift`]
//! - [`ItemKind::Parking`]

pub mod drag;
pub mod engine;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::input::coerce_non_negative;

pub use drag::{CollisionSignal, DragState, MoveOutcome, DEFAULT_COLLISION_HIGHLIGHT};
pub use engine::PlacementEngine;

/// Identity key of a placeable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    House,
    Staircase,
    Lift,
    Parking,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::House,
        ItemKind::Staircase,
        ItemKind::Lift,
        ItemKind::Parking,
    ];

    /// Stable lowercase key (matches the JSON form)
    pub fn key(&self) -> &'static str {
        match self {
            ItemKind::House => "house",
            ItemKind::Staircase => "staircase",
            ItemKind::Lift => "lift",
            ItemKind::Parking => "parking",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::House => "House",
            ItemKind::Staircase => "Staircase",
            ItemKind::Lift => "Lift",
            ItemKind::Parking => "Parking",
        }
    }

    /// Look up a kind by its key, ignoring case.
    pub fn from_key(key: &str) -> Option<ItemKind> {
        let key = key.trim();
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Compass direction the house entrance faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[default]
    North,
    South,
    East,
    West,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::South, Facing::East, Facing::West];

    pub fn display_name(&self) -> &'static str {
        match self {
            Facing::North => "North",
            Facing::South => "South",
            Facing::East => "East",
            Facing::West => "West",
        }
    }

    /// Parse a direction name or its initial ("n", "South", ...), ignoring case.
    pub fn from_key(key: &str) -> Option<Facing> {
        let key = key.trim();
        Facing::ALL.into_iter().find(|facing| {
            let name = facing.display_name();
            name.eq_ignore_ascii_case(key) || name[..1].eq_ignore_ascii_case(key)
        })
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A rectangle the user can position inside the buildable envelope.
///
/// ## JSON Example
///
/// ```json
/// {
///   "kind": "house",
///   "width_ft": 30.0,
///   "length_ft": 40.0,
///   "enabled": true,
///   "facing": "north",
///   "description": "G+2 residence",
///   "position": { "x": 5.0, "y": 15.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableItem {
    pub kind: ItemKind,

    /// Extent along x (ft)
    pub width_ft: f64,

    /// Extent along y (ft)
    pub length_ft: f64,

    /// Disabled items are neither drawn nor considered for collisions
    pub enabled: bool,

    /// House only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Facing>,

    #[serde(default)]
    pub description: String,

    /// Top-left corner in plot-local feet
    #[serde(default)]
    pub position: Point,
}

impl PlaceableItem {
    /// Create an enabled item at the plot origin. Dimensions are coerced to `>= 0`.
    pub fn new(kind: ItemKind, width_ft: f64, length_ft: f64) -> Self {
        PlaceableItem {
            kind,
            width_ft: coerce_non_negative(width_ft),
            length_ft: coerce_non_negative(length_ft),
            enabled: true,
            facing: if kind == ItemKind::House { Some(Facing::default()) } else { None },
            description: String::new(),
            position: Point::ORIGIN,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the facing. Ignored for anything but the house.
    pub fn with_facing(mut self, facing: Facing) -> Self {
        if self.kind == ItemKind::House {
            self.facing = Some(facing);
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.width_ft, self.length_ft)
    }

    pub fn area_sqft(&self) -> f64 {
        self.rect().area()
    }

    /// Area counted by the calculator: zero when disabled.
    pub fn effective_area_sqft(&self) -> f64 {
        if self.enabled {
            self.area_sqft()
        } else {
            0.0
        }
    }
}

/// Items present at the start of a fresh session.
///
/// Positions fit the default plot's envelope without overlapping.
pub fn default_items() -> Vec<PlaceableItem> {
    vec![
        PlaceableItem::new(ItemKind::House, 30.0, 40.0)
            .at(5.0, 15.0)
            .with_facing(Facing::North),
        PlaceableItem::new(ItemKind::Staircase, 8.0, 12.0).at(35.0, 15.0),
        PlaceableItem::new(ItemKind::Lift, 6.0, 6.0).at(35.0, 30.0),
        PlaceableItem::new(ItemKind::Parking, 10.0, 18.0)
            .at(5.0, 60.0)
            .disabled(),
    ]
}
