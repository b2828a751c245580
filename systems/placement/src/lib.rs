#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement controller that translates pointer input into drag commands.
//!
//! The controller is a two-state machine. Pressing on a non-lane cell that
//! holds a tower captures it, pointer motion snaps the dragged tower onto the
//! hovered cell (lane cells freeze the feedback), and releasing the pointer
//! asks the world to resolve the drop. Legality is never decided here; the
//! world answers the final [`Command::EndDrag`] with a move, merge, swap or a
//! snap-back.

use lane_defence_core::{
    CellCoord, Command, DragPreview, GridLayout, PointerEvent, TowerId, WorldPoint, Zone,
};

/// Current state of the drag interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    /// No tower is captured.
    Idle,
    /// A tower follows the pointer.
    Dragging {
        /// Tower captured by the pointer.
        tower: TowerId,
        /// Cell the tower rested on when the drag started.
        origin: CellCoord,
        /// Pointer position relative to the origin cell centre at capture time.
        grab_offset: WorldPoint,
        /// Latest pointer position.
        pointer: WorldPoint,
    },
}

/// Pure system interpreting normalised pointer events.
#[derive(Debug)]
pub struct PlacementController {
    state: DragState,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Current drag state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Tower being dragged, if any.
    #[must_use]
    pub const fn dragged_tower(&self) -> Option<TowerId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { tower, .. } => Some(tower),
        }
    }

    /// Drops any captured tower without emitting commands.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Consumes a pointer event and emits the resulting drag commands.
    pub fn handle<F>(
        &mut self,
        pointer: PointerEvent,
        grid: &GridLayout,
        tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> Option<TowerId>,
    {
        match (self.state, pointer) {
            (DragState::Idle, PointerEvent::Down(position)) => {
                let Some(cell) = grid.cell_at(position) else {
                    return;
                };
                if grid.zone_of(cell) == Zone::EnemyLane {
                    return;
                }
                let Some(tower) = tower_at(cell) else {
                    return;
                };

                self.state = DragState::Dragging {
                    tower,
                    origin: cell,
                    grab_offset: position.offset_from(grid.center_of(cell)),
                    pointer: position,
                };
                out.push(Command::BeginDrag { tower });
            }
            (
                DragState::Dragging {
                    tower,
                    origin,
                    grab_offset,
                    ..
                },
                PointerEvent::Move(position),
            ) => {
                self.state = DragState::Dragging {
                    tower,
                    origin,
                    grab_offset,
                    pointer: position,
                };
                let Some(cell) = grid.cell_at(position) else {
                    return;
                };
                if grid.zone_of(cell) != Zone::EnemyLane {
                    out.push(Command::UpdateDrag {
                        tower,
                        position: grid.center_of(cell),
                    });
                }
            }
            (DragState::Dragging { tower, .. }, PointerEvent::Up(position)) => {
                self.state = DragState::Idle;
                out.push(Command::EndDrag {
                    tower,
                    target: grid.cell_at(position),
                });
            }
            (DragState::Idle, PointerEvent::Move(_) | PointerEvent::Up(_))
            | (DragState::Dragging { .. }, PointerEvent::Down(_)) => {}
        }
    }

    /// Describes the placement feedback for the current drag.
    ///
    /// `can_place` reports whether the dragged tower may be dropped on a cell.
    #[must_use]
    pub fn preview<F>(&self, grid: &GridLayout, can_place: F) -> Option<DragPreview>
    where
        F: Fn(CellCoord, TowerId) -> bool,
    {
        let DragState::Dragging {
            tower,
            grab_offset,
            pointer,
            ..
        } = self.state
        else {
            return None;
        };

        let cell = grid.cell_at(pointer);
        Some(DragPreview {
            tower,
            cell,
            placeable: cell.map_or(false, |cell| can_place(cell, tower)),
            sprite_origin: pointer.offset_from(grab_offset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridLayout {
        GridLayout::new(17, 8, 40.0)
    }

    fn tower_in_inventory(cell: CellCoord) -> Option<TowerId> {
        (cell == CellCoord::new(15, 2)).then_some(TowerId::new(3))
    }

    #[test]
    fn press_on_empty_cell_stays_idle() {
        let mut controller = PlacementController::new();
        let mut commands = Vec::new();
        controller.handle(
            PointerEvent::Down(WorldPoint::new(660.0, 100.0)),
            &grid(),
            tower_in_inventory,
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn press_in_lane_never_captures() {
        let mut controller = PlacementController::new();
        let mut commands = Vec::new();
        controller.handle(
            PointerEvent::Down(WorldPoint::new(100.0, 100.0)),
            &grid(),
            |_| Some(TowerId::new(0)),
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(controller.dragged_tower(), None);
    }

    #[test]
    fn capture_records_grab_offset() {
        let mut controller = PlacementController::new();
        let mut commands = Vec::new();
        controller.handle(
            PointerEvent::Down(WorldPoint::new(610.0, 95.0)),
            &grid(),
            tower_in_inventory,
            &mut commands,
        );

        assert_eq!(commands, vec![Command::BeginDrag { tower: TowerId::new(3) }]);
        let preview = controller.preview(&grid(), |_, _| true).expect("dragging");
        assert_eq!(preview.sprite_origin, WorldPoint::new(620.0, 100.0));
        assert_eq!(preview.cell, Some(CellCoord::new(15, 2)));
    }

    #[test]
    fn lane_motion_updates_pointer_but_not_position() {
        let mut controller = PlacementController::new();
        let mut commands = Vec::new();
        let grid = grid();
        controller.handle(
            PointerEvent::Down(WorldPoint::new(620.0, 100.0)),
            &grid,
            tower_in_inventory,
            &mut commands,
        );
        commands.clear();

        controller.handle(
            PointerEvent::Move(WorldPoint::new(300.0, 140.0)),
            &grid,
            tower_in_inventory,
            &mut commands,
        );
        assert!(commands.is_empty());
        let preview = controller.preview(&grid, |_, _| false).expect("dragging");
        assert_eq!(preview.cell, Some(CellCoord::new(7, 3)));
        assert!(!preview.placeable);

        controller.handle(
            PointerEvent::Move(WorldPoint::new(575.0, 150.0)),
            &grid,
            tower_in_inventory,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::UpdateDrag {
                tower: TowerId::new(3),
                position: WorldPoint::new(580.0, 140.0),
            }]
        );
    }

    #[test]
    fn release_ends_drag_with_hovered_cell() {
        let mut controller = PlacementController::new();
        let mut commands = Vec::new();
        let grid = grid();
        controller.handle(
            PointerEvent::Down(WorldPoint::new(620.0, 100.0)),
            &grid,
            tower_in_inventory,
            &mut commands,
        );
        commands.clear();

        controller.handle(
            PointerEvent::Up(WorldPoint::new(-5.0, 100.0)),
            &grid,
            tower_in_inventory,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::EndDrag {
                tower: TowerId::new(3),
                target: None,
            }]
        );
        assert_eq!(controller.state(), DragState::Idle);
        assert!(controller.preview(&grid, |_, _| true).is_none());
    }
}
