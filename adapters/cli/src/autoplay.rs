//! Scripted player used by headless runs.

use lane_defence_core::{CellCoord, Frame, TowerId, TowerKind, TowerSnapshot, Zone};

/// Single action chosen by the scripted player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Move {
    /// Purchase a tower into the inventory.
    Buy(TowerKind),
    /// Drag a tower onto the centre of another cell.
    Drag {
        /// Tower picked up.
        tower: TowerId,
        /// Cell the tower is released over.
        to: CellCoord,
    },
}

/// Chooses the next move: deploy or merge inventory towers first, then buy.
pub(crate) fn plan(frame: &Frame, money: u32) -> Option<Move> {
    if frame.game_over || frame.drag.is_some() {
        return None;
    }

    let grid = &frame.grid;
    let towers: Vec<&TowerSnapshot> = frame.towers.iter().collect();
    let occupied = |cell: CellCoord| towers.iter().any(|tower| tower.cell == cell);

    for candidate in towers
        .iter()
        .filter(|tower| grid.zone_of(tower.cell) == Zone::Inventory)
    {
        let partner = towers
            .iter()
            .filter(|other| {
                other.id != candidate.id
                    && other.kind == candidate.kind
                    && other.level == candidate.level
            })
            .min_by_key(|other| grid.zone_of(other.cell) != Zone::TowerSlots);
        if let Some(partner) = partner {
            return Some(Move::Drag {
                tower: candidate.id,
                to: partner.cell,
            });
        }
        if let Some(free) = grid.tower_slot_cells().find(|cell| !occupied(*cell)) {
            return Some(Move::Drag {
                tower: candidate.id,
                to: free,
            });
        }
    }

    let kind = TowerKind::Basic;
    let inventory_free = grid.inventory_cells().any(|cell| !occupied(cell));
    (inventory_free && money >= kind.cost()).then_some(Move::Buy(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{EnemyView, GridLayout, TowerView, WorldPoint};

    fn tower(id: u32, kind: TowerKind, level: u32, cell: CellCoord) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            level,
            cell,
            position: WorldPoint::new(0.0, 0.0),
            range: kind.range(),
            selected: false,
            projectiles: Vec::new(),
        }
    }

    fn frame(towers: Vec<TowerSnapshot>) -> Frame {
        Frame {
            grid: GridLayout::new(17, 8, 40.0),
            enemies: EnemyView::default(),
            towers: TowerView::from_snapshots(towers),
            drag: None,
            game_over: false,
        }
    }

    #[test]
    fn buys_when_nothing_to_deploy() {
        assert_eq!(plan(&frame(Vec::new()), 50), Some(Move::Buy(TowerKind::Basic)));
        assert_eq!(plan(&frame(Vec::new()), 49), None);
    }

    #[test]
    fn deploys_inventory_tower_to_first_free_slot() {
        let towers = vec![
            tower(0, TowerKind::Basic, 2, CellCoord::new(14, 2)),
            tower(1, TowerKind::Basic, 1, CellCoord::new(15, 2)),
        ];
        assert_eq!(
            plan(&frame(towers), 0),
            Some(Move::Drag {
                tower: TowerId::new(1),
                to: CellCoord::new(14, 3),
            })
        );
    }

    #[test]
    fn prefers_merging_onto_deployed_tower() {
        let towers = vec![
            tower(0, TowerKind::Basic, 1, CellCoord::new(14, 4)),
            tower(1, TowerKind::Basic, 1, CellCoord::new(15, 2)),
            tower(2, TowerKind::Basic, 1, CellCoord::new(16, 2)),
        ];
        assert_eq!(
            plan(&frame(towers), 100),
            Some(Move::Drag {
                tower: TowerId::new(1),
                to: CellCoord::new(14, 4),
            })
        );
    }

    #[test]
    fn stays_idle_after_game_over() {
        let mut finished = frame(Vec::new());
        finished.game_over = true;
        assert_eq!(plan(&finished, 500), None);
    }
}
