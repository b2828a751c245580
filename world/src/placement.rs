//! Placement legality for purchases and drag drops.

use lane_defence_core::{CellCoord, GridLayout, PlacementError, TowerId, Zone};

use crate::towers::{TowerRegistry, TowerState};

/// Outcome of a legal placement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementDecision {
    /// The tower may rest on the empty target cell.
    Place,
    /// The target is the dragged tower's own cell; the drop cancels the drag.
    Return,
    /// The dragged tower would upgrade the tower on the target cell.
    Merge(TowerId),
    /// The dragged tower would exchange cells with the tower on the target cell.
    Swap(TowerId),
}

/// Evaluates whether `source` (or a fresh purchase when `None`) may land on `target`.
pub(crate) fn decide(
    grid: &GridLayout,
    towers: &TowerRegistry,
    target: CellCoord,
    source: Option<&TowerState>,
) -> Result<PlacementDecision, PlacementError> {
    let target_zone = grid.zone_of(target);
    match target_zone {
        Zone::OutOfBounds => return Err(PlacementError::OutOfBounds),
        Zone::EnemyLane => return Err(PlacementError::EnemyLane),
        Zone::TowerSlots | Zone::Inventory | Zone::Open => {}
    }

    let occupant = towers.at(target);
    let Some(source) = source else {
        return match (target_zone, occupant) {
            (_, Some(_)) => Err(PlacementError::Occupied),
            (Zone::Inventory, None) => Ok(PlacementDecision::Place),
            (_, None) => Err(PlacementError::ZoneMismatch),
        };
    };

    let source_in_inventory = grid.is_in_zone(source.cell, Zone::Inventory);
    match occupant {
        Some(other) if other.id == source.id => Ok(PlacementDecision::Return),
        Some(other) if source.can_merge(other) => Ok(PlacementDecision::Merge(other.id)),
        Some(other) => {
            let swappable = (target_zone == Zone::TowerSlots && !source_in_inventory)
                || (target_zone == Zone::Inventory && source_in_inventory);
            if swappable {
                Ok(PlacementDecision::Swap(other.id))
            } else {
                Err(PlacementError::ZoneMismatch)
            }
        }
        None => {
            let movable = (target_zone == Zone::TowerSlots && source_in_inventory)
                || (target_zone == Zone::Inventory && !source_in_inventory);
            if movable {
                Ok(PlacementDecision::Place)
            } else {
                Err(PlacementError::ZoneMismatch)
            }
        }
    }
}
