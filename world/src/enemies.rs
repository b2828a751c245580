//! Lane waypoints and enemy movement.

use std::collections::BTreeMap;

use lane_defence_core::{
    CellCoord, EnemyId, EnemyKind, EnemySnapshot, GridLayout, Health, LaneId,
    WorldPoint,
};

/// Waypoint sequences grouped into lanes by the row they share.
#[derive(Clone, Debug, Default)]
pub struct PathTable {
    lanes: BTreeMap<LaneId, Vec<WorldPoint>>,
}

impl PathTable {
    /// Builds the table from waypoint cells, grouping them by row in the order provided.
    #[must_use]
    pub fn from_waypoints(grid: &GridLayout, waypoints: &[CellCoord]) -> Self {
        let mut lanes: BTreeMap<LaneId, Vec<WorldPoint>> = BTreeMap::new();
        for cell in waypoints {
            lanes
                .entry(LaneId::new(cell.row()))
                .or_default()
                .push(grid.center_of(*cell));
        }
        Self { lanes }
    }

    /// Straight lanes crossing the lane band from column zero to the column before the inventory.
    #[must_use]
    pub fn for_grid(grid: &GridLayout) -> Self {
        let last_column = grid.columns().saturating_sub(2);
        let waypoints: Vec<_> = grid
            .lane_rows()
            .flat_map(|row| {
                [
                    CellCoord::new(0, row),
                    CellCoord::new(last_column, row),
                ]
            })
            .collect();
        Self::from_waypoints(grid, &waypoints)
    }

    /// Lanes in ascending row order.
    pub fn lanes(&self) -> impl Iterator<Item = LaneId> + '_ {
        self.lanes.keys().copied()
    }

    /// Waypoints followed by enemies on the lane.
    #[must_use]
    pub fn waypoints(&self, lane: LaneId) -> Option<&[WorldPoint]> {
        self.lanes.get(&lane).map(Vec::as_slice)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    lane: LaneId,
    position: WorldPoint,
    waypoint: usize,
    health: Health,
    dead: bool,
    reached_end: bool,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, lane: LaneId, start: WorldPoint) -> Self {
        Self {
            id,
            kind,
            lane,
            position: start,
            waypoint: 0,
            health: Health::new(kind.stats().max_health),
            dead: false,
            reached_end: false,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn lane(&self) -> LaneId {
        self.lane
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn size(&self) -> f32 {
        self.kind.stats().size
    }

    pub(crate) fn reward(&self) -> u32 {
        self.kind.stats().reward
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.dead
    }

    pub(crate) fn reached_end(&self) -> bool {
        self.reached_end
    }

    /// Alive and still walking; only these may be targeted or damaged.
    pub(crate) fn is_active(&self) -> bool {
        !self.dead && !self.reached_end
    }

    /// Moves one tick toward the next waypoint, snapping when closer than one step.
    pub(crate) fn advance(&mut self, waypoints: &[WorldPoint]) {
        if !self.is_active() {
            return;
        }

        let Some(target) = waypoints.get(self.waypoint + 1).copied() else {
            self.reached_end = true;
            return;
        };

        let speed = self.kind.stats().speed;
        if self.position.distance(target) < speed {
            self.position = target;
            self.waypoint += 1;
        } else {
            self.position = self.position.step_toward(target, speed);
        }
    }

    /// Callers check [`Enemy::is_active`] first.
    pub(crate) fn take_damage(&mut self, amount: u32) {
        self.health = self.health.damaged(amount);
        if self.health.is_zero() {
            self.dead = true;
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            lane: self.lane,
            position: self.position,
            size: self.size(),
            health: self.health,
            max_health: Health::new(self.kind.stats().max_health),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridLayout {
        GridLayout::new(17, 8, 40.0)
    }

    #[test]
    fn default_table_has_one_lane_per_band_row() {
        let table = PathTable::for_grid(&grid());
        let lanes: Vec<_> = table.lanes().map(|lane| lane.row()).collect();
        assert_eq!(lanes, vec![2, 3, 4, 5]);
        assert_eq!(
            table.waypoints(LaneId::new(3)),
            Some(&[WorldPoint::new(20.0, 140.0), WorldPoint::new(620.0, 140.0)][..])
        );
    }

    #[test]
    fn waypoints_group_by_row_preserving_order() {
        let cells = [
            CellCoord::new(0, 2),
            CellCoord::new(0, 4),
            CellCoord::new(5, 2),
            CellCoord::new(9, 2),
        ];
        let table = PathTable::from_waypoints(&grid(), &cells);
        let lane = table.waypoints(LaneId::new(2)).expect("lane two");
        assert_eq!(lane.len(), 3);
        assert_eq!(lane[2], WorldPoint::new(380.0, 100.0));
        assert_eq!(table.lanes().count(), 2);
    }

    #[test]
    fn enemy_snaps_to_final_waypoint_then_reaches_end() {
        let waypoints = [WorldPoint::new(0.0, 0.0), WorldPoint::new(1.25, 0.0)];
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Fast, LaneId::new(2), waypoints[0]);

        enemy.advance(&waypoints);
        assert_eq!(enemy.position(), WorldPoint::new(0.5, 0.0));
        enemy.advance(&waypoints);
        assert_eq!(enemy.position(), WorldPoint::new(1.0, 0.0));

        enemy.advance(&waypoints);
        assert_eq!(enemy.position(), waypoints[1]);
        assert!(!enemy.reached_end());

        enemy.advance(&waypoints);
        assert!(enemy.reached_end());
        assert_eq!(enemy.position(), waypoints[1]);

        enemy.advance(&waypoints);
        assert_eq!(enemy.position(), waypoints[1]);
    }

    #[test]
    fn enemy_walks_every_segment_without_overshooting() {
        let waypoints = [
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(2.0, 0.0),
        ];
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Normal, LaneId::new(2), waypoints[0]);

        let mut ticks = 0;
        while !enemy.reached_end() {
            enemy.advance(&waypoints);
            ticks += 1;
            assert!(enemy.position().x() <= 2.0);
            assert_eq!(enemy.position().y(), 0.0);
            if ticks == 5 {
                assert_eq!(enemy.position(), waypoints[1]);
            }
            assert!(ticks <= 20, "enemy never reached the end");
        }

        assert_eq!(ticks, 11);
        assert_eq!(enemy.position(), waypoints[2]);
    }

    #[test]
    fn damage_clamps_health_and_marks_dead() {
        let mut enemy = Enemy::spawn(
            EnemyId::new(1),
            EnemyKind::Fast,
            LaneId::new(2),
            WorldPoint::new(20.0, 100.0),
        );
        enemy.take_damage(30);
        assert!(enemy.is_active());
        enemy.take_damage(30);
        assert!(enemy.is_dead());
        assert!(enemy.snapshot().health.is_zero());

        enemy.advance(&[WorldPoint::new(20.0, 100.0), WorldPoint::new(620.0, 100.0)]);
        assert_eq!(enemy.position(), WorldPoint::new(20.0, 100.0));
    }
}
