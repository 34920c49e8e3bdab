//! Per-floor built-up area with internal deductions.
//!
//! Each floor's gross area is reduced by the staircase, lift and setback
//! areas. Parking is deducted from the ground floor (the first record) only.
//! The setback loss is charged to every floor, not just the ground floor.

use serde::{Deserialize, Serialize};

use crate::input::coerce_non_negative;
use crate::placement::{ItemKind, PlaceableItem};

/// A named floor with its gross area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorRecord {
    pub name: String,
    pub gross_area_sqft: f64,
}

impl FloorRecord {
    pub fn new(name: impl Into<String>, gross_area_sqft: f64) -> Self {
        FloorRecord {
            name: name.into(),
            gross_area_sqft: coerce_non_negative(gross_area_sqft),
        }
    }
}

/// Areas of the internal structures that are deducted from floor area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemAreas {
    pub parking_sqft: f64,
    pub staircase_sqft: f64,
    pub lift_sqft: f64,
}

impl ItemAreas {
    /// Sum areas of the enabled parking, staircase and lift items.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a PlaceableItem>) -> Self {
        let mut areas = ItemAreas::default();
        for item in items {
            let area = item.effective_area_sqft();
            match item.kind {
                ItemKind::Parking => areas.parking_sqft += area,
                ItemKind::Staircase => areas.staircase_sqft += area,
                ItemKind::Lift => areas.lift_sqft += area,
                ItemKind::House => {}
            }
        }
        areas
    }

    pub fn sanitized(&self) -> Self {
        ItemAreas {
            parking_sqft: coerce_non_negative(self.parking_sqft),
            staircase_sqft: coerce_non_negative(self.staircase_sqft),
            lift_sqft: coerce_non_negative(self.lift_sqft),
        }
    }
}

/// One row of the per-floor deduction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAreaBreakdown {
    pub name: String,
    pub gross_area_sqft: f64,
    pub parking_deduction_sqft: f64,
    pub staircase_deduction_sqft: f64,
    pub lift_deduction_sqft: f64,
    pub setback_deduction_sqft: f64,
    /// Never negative
    pub net_area_sqft: f64,
}

/// Compute net built-up area for each floor, ground floor first.
pub fn net_floor_areas(floors: &[FloorRecord], items: &ItemAreas, setback_area_sqft: f64) -> Vec<FloorAreaBreakdown> {
    let items = items.sanitized();
    let setback = coerce_non_negative(setback_area_sqft);

    floors
        .iter()
        .enumerate()
        .map(|(index, floor)| {
            let gross = coerce_non_negative(floor.gross_area_sqft);
            let parking = if index == 0 { items.parking_sqft } else { 0.0 };
            let net = (gross - parking - items.staircase_sqft - items.lift_sqft - setback).max(0.0);
            FloorAreaBreakdown {
                name: floor.name.clone(),
                gross_area_sqft: gross,
                parking_deduction_sqft: parking,
                staircase_deduction_sqft: items.staircase_sqft,
                lift_deduction_sqft: items.lift_sqft,
                setback_deduction_sqft: setback,
                net_area_sqft: net,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas() -> ItemAreas {
        ItemAreas {
            parking_sqft: 180.0,
            staircase_sqft: 96.0,
            lift_sqft: 36.0,
        }
    }

    #[test]
    fn test_parking_only_on_ground_floor() {
        let floors = vec![
            FloorRecord::new("Ground", 2000.0),
            FloorRecord::new("First", 2000.0),
        ];
        let rows = net_floor_areas(&floors, &areas(), 500.0);
        assert_eq!(rows[0].parking_deduction_sqft, 180.0);
        assert_eq!(rows[0].net_area_sqft, 2000.0 - 180.0 - 96.0 - 36.0 - 500.0);
        assert_eq!(rows[1].parking_deduction_sqft, 0.0);
        assert_eq!(rows[1].net_area_sqft, 2000.0 - 96.0 - 36.0 - 500.0);
    }

    #[test]
    fn test_setback_charged_on_every_floor() {
        let floors = vec![
            FloorRecord::new("Ground", 1000.0),
            FloorRecord::new("First", 1000.0),
            FloorRecord::new("Second", 1000.0),
        ];
        let rows = net_floor_areas(&floors, &ItemAreas::default(), 250.0);
        assert!(rows.iter().all(|row| row.setback_deduction_sqft == 250.0));
        assert!(rows.iter().all(|row| row.net_area_sqft == 750.0));
    }

    #[test]
    fn test_net_area_never_negative() {
        let floors = vec![FloorRecord::new("Ground", 100.0)];
        let rows = net_floor_areas(&floors, &areas(), 5000.0);
        assert_eq!(rows[0].net_area_sqft, 0.0);
    }

    #[test]
    fn test_areas_from_enabled_items_only() {
        let items = vec![
            PlaceableItem::new(ItemKind::House, 30.0, 40.0),
            PlaceableItem::new(ItemKind::Staircase, 8.0, 12.0),
            PlaceableItem::new(ItemKind::Lift, 6.0, 6.0),
            PlaceableItem::new(ItemKind::Parking, 10.0, 18.0).disabled(),
        ];
        let areas = ItemAreas::from_items(&items);
        assert_eq!(areas.staircase_sqft, 96.0);
        assert_eq!(areas.lift_sqft, 36.0);
        assert_eq!(areas.parking_sqft, 0.0);
    }

    #[test]
    fn test_negative_gross_coerced() {
        let floors = vec![FloorRecord {
            name: "Bad".to_string(),
            gross_area_sqft: -50.0,
        }];
        let rows = net_floor_areas(&floors, &ItemAreas::default(), 0.0);
        assert_eq!(rows[0].gross_area_sqft, 0.0);
        assert_eq!(rows[0].net_area_sqft, 0.0);
    }
}
