//! Grid geometry and the fixed zone layout.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{CellCoord, WorldPoint};

/// First grid row covered by the enemy lane band.
pub const LANE_FIRST_ROW: u32 = 2;

/// Last grid row covered by the enemy lane band.
pub const LANE_LAST_ROW: u32 = 5;

/// Functional region a grid cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Cells enemies walk across; towers never rest here.
    EnemyLane,
    /// Combat column next to the lane.
    TowerSlots,
    /// Storage columns along the right edge.
    Inventory,
    /// Any in-bounds cell outside the lane band.
    Open,
    /// Outside the grid.
    OutOfBounds,
}

/// Dimensions of the square-celled grid in canvas units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl GridLayout {
    /// Creates a new grid layout.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single cell in canvas units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell containing the canvas point, or `None` when the point is off the grid.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        if point.x() < 0.0 || point.y() < 0.0 || self.cell_size <= 0.0 {
            return None;
        }

        let column = (point.x() / self.cell_size).floor() as u32;
        let row = (point.y() / self.cell_size).floor() as u32;
        let cell = CellCoord::new(column, row);
        self.contains(cell).then_some(cell)
    }

    /// Row index containing the vertical canvas coordinate.
    ///
    /// Unlike [`GridLayout::cell_at`] this never fails, so callers comparing
    /// rows of moving entities get a value even for positions above the grid.
    #[must_use]
    pub fn row_index(&self, y: f32) -> i64 {
        (y / self.cell_size).floor() as i64
    }

    /// Canvas position of the cell centre.
    #[must_use]
    pub fn center_of(&self, cell: CellCoord) -> WorldPoint {
        let half = self.cell_size / 2.0;
        WorldPoint::new(
            cell.column() as f32 * self.cell_size + half,
            cell.row() as f32 * self.cell_size + half,
        )
    }

    /// Column holding the tower slots.
    #[must_use]
    pub const fn tower_slot_column(&self) -> u32 {
        self.columns.saturating_sub(3)
    }

    /// Rows covered by the lane band.
    #[must_use]
    pub const fn lane_rows(&self) -> RangeInclusive<u32> {
        LANE_FIRST_ROW..=LANE_LAST_ROW
    }

    /// Classifies a cell into its zone.
    #[must_use]
    pub fn zone_of(&self, cell: CellCoord) -> Zone {
        if !self.contains(cell) {
            return Zone::OutOfBounds;
        }
        if !self.lane_rows().contains(&cell.row()) {
            return Zone::Open;
        }

        let slot_column = self.tower_slot_column();
        if cell.column() < slot_column {
            Zone::EnemyLane
        } else if cell.column() == slot_column {
            Zone::TowerSlots
        } else {
            Zone::Inventory
        }
    }

    /// Reports whether the cell belongs to the provided zone.
    #[must_use]
    pub fn is_in_zone(&self, cell: CellCoord, zone: Zone) -> bool {
        self.zone_of(cell) == zone
    }

    /// Tower slot cells from top to bottom.
    pub fn tower_slot_cells(&self) -> impl Iterator<Item = CellCoord> {
        let column = self.tower_slot_column();
        self.lane_rows().map(move |row| CellCoord::new(column, row))
    }

    /// Inventory cells in row-major order.
    pub fn inventory_cells(&self) -> impl Iterator<Item = CellCoord> {
        let first = self.tower_slot_column() + 1;
        let columns = self.columns;
        self.lane_rows()
            .flat_map(move |row| (first..columns).map(move |column| CellCoord::new(column, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(17, 8, 40.0)
    }

    #[test]
    fn zones_partition_lane_band() {
        let grid = layout();
        assert_eq!(grid.zone_of(CellCoord::new(0, 2)), Zone::EnemyLane);
        assert_eq!(grid.zone_of(CellCoord::new(13, 5)), Zone::EnemyLane);
        assert_eq!(grid.zone_of(CellCoord::new(14, 3)), Zone::TowerSlots);
        assert_eq!(grid.zone_of(CellCoord::new(15, 4)), Zone::Inventory);
        assert_eq!(grid.zone_of(CellCoord::new(16, 5)), Zone::Inventory);
    }

    #[test]
    fn rows_outside_band_are_open() {
        let grid = layout();
        assert_eq!(grid.zone_of(CellCoord::new(0, 0)), Zone::Open);
        assert_eq!(grid.zone_of(CellCoord::new(14, 1)), Zone::Open);
        assert_eq!(grid.zone_of(CellCoord::new(16, 7)), Zone::Open);
    }

    #[test]
    fn is_in_zone_matches_classification() {
        let grid = layout();
        assert!(grid.is_in_zone(CellCoord::new(14, 2), Zone::TowerSlots));
        assert!(!grid.is_in_zone(CellCoord::new(14, 2), Zone::Inventory));
        assert!(grid.is_in_zone(CellCoord::new(15, 5), Zone::Inventory));
        assert!(grid.is_in_zone(CellCoord::new(40, 40), Zone::OutOfBounds));
    }

    #[test]
    fn cells_past_edges_are_out_of_bounds() {
        let grid = layout();
        assert_eq!(grid.zone_of(CellCoord::new(17, 3)), Zone::OutOfBounds);
        assert_eq!(grid.zone_of(CellCoord::new(3, 8)), Zone::OutOfBounds);
    }

    #[test]
    fn cell_at_rejects_negative_and_far_points() {
        let grid = layout();
        assert_eq!(grid.cell_at(WorldPoint::new(-1.0, 10.0)), None);
        assert_eq!(grid.cell_at(WorldPoint::new(680.0, 10.0)), None);
        assert_eq!(
            grid.cell_at(WorldPoint::new(579.0, 121.0)),
            Some(CellCoord::new(14, 3))
        );
    }

    #[test]
    fn center_of_is_half_a_cell_in() {
        let grid = layout();
        assert_eq!(
            grid.center_of(CellCoord::new(15, 2)),
            WorldPoint::new(620.0, 100.0)
        );
    }

    #[test]
    fn inventory_cells_are_row_major() {
        let grid = layout();
        let cells: Vec<_> = grid.inventory_cells().take(3).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(15, 2),
                CellCoord::new(16, 2),
                CellCoord::new(15, 3)
            ]
        );
        assert_eq!(grid.inventory_cells().count(), 8);
        assert_eq!(grid.tower_slot_cells().count(), 4);
    }
}
