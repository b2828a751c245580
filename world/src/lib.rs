#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.

mod economy;
mod enemies;
mod placement;
mod towers;

use std::time::Duration;

use lane_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, GridLayout, LaneId, PlacementError, TowerId,
    TowerKind, WorldPoint,
};
use tracing::{debug, info};

pub use economy::EconomyState;
pub use enemies::PathTable;
pub use placement::PlacementDecision;

use enemies::Enemy;
use towers::TowerRegistry;

const DEFAULT_GRID: GridLayout = GridLayout::new(17, 8, 40.0);
const DEFAULT_STARTING_MONEY: u32 = 100;
const DEFAULT_STARTING_LIVES: i32 = 10;
const DEFAULT_WAVE_CLEAR_REWARD: u32 = 50;

/// Parameters the world is created with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    grid: GridLayout,
    starting_money: u32,
    starting_lives: i32,
    wave_clear_reward: u32,
}

impl Config {
    /// Creates a new world configuration.
    #[must_use]
    pub const fn new(
        grid: GridLayout,
        starting_money: u32,
        starting_lives: i32,
        wave_clear_reward: u32,
    ) -> Self {
        Self {
            grid,
            starting_money,
            starting_lives,
            wave_clear_reward,
        }
    }

    /// Grid layout the world is built on.
    #[must_use]
    pub const fn grid(&self) -> GridLayout {
        self.grid
    }

    /// Money available before the first purchase.
    #[must_use]
    pub const fn starting_money(&self) -> u32 {
        self.starting_money
    }

    /// Lives available before the first escape.
    #[must_use]
    pub const fn starting_lives(&self) -> i32 {
        self.starting_lives
    }

    /// Flat reward paid whenever a wave is cleared.
    #[must_use]
    pub const fn wave_clear_reward(&self) -> u32 {
        self.wave_clear_reward
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_GRID,
            DEFAULT_STARTING_MONEY,
            DEFAULT_STARTING_LIVES,
            DEFAULT_WAVE_CLEAR_REWARD,
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    tower: TowerId,
    position: WorldPoint,
}

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    grid: GridLayout,
    paths: PathTable,
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
    towers: TowerRegistry,
    economy: EconomyState,
    wave_clear_reward: u32,
    wave: u32,
    drag: Option<DragState>,
    clock: Duration,
}

impl World {
    /// Creates a new world ready for simulation.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let grid = config.grid();
        Self {
            grid,
            paths: PathTable::for_grid(&grid),
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            towers: TowerRegistry::new(),
            economy: EconomyState::new(config.starting_money(), config.starting_lives()),
            wave_clear_reward: config.wave_clear_reward(),
            wave: 0,
            drag: None,
            clock: Duration::ZERO,
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, lane: LaneId, out_events: &mut Vec<Event>) {
        let Some(start) = self
            .paths
            .waypoints(lane)
            .and_then(|waypoints| waypoints.first().copied())
        else {
            debug!(lane = lane.row(), "ignoring spawn on unknown lane");
            return;
        };

        let enemy = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(enemy.get().saturating_add(1));
        self.enemies.push(Enemy::spawn(enemy, kind, lane, start));
        debug!(enemy = enemy.get(), ?kind, lane = lane.row(), "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy, kind, lane });
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        for index in (0..self.enemies.len()).rev() {
            let waypoints = self
                .paths
                .waypoints(self.enemies[index].lane())
                .unwrap_or(&[]);
            self.enemies[index].advance(waypoints);

            let enemy = &self.enemies[index];
            if enemy.is_dead() {
                let (id, reward) = (enemy.id(), enemy.reward());
                let _ = self.enemies.remove(index);
                self.economy.earn(reward);
                debug!(enemy = id.get(), reward, "enemy killed");
                out_events.push(Event::EnemyKilled { enemy: id, reward });
            } else if enemy.reached_end() {
                let id = enemy.id();
                let _ = self.enemies.remove(index);
                let ended = self.economy.lose_life();
                debug!(enemy = id.get(), lives = self.economy.lives(), "enemy escaped");
                out_events.push(Event::EnemyEscaped {
                    enemy: id,
                    lives: self.economy.lives(),
                });
                if ended {
                    info!(wave = self.wave, "game over");
                    self.drag = None;
                    out_events.push(Event::GameOver);
                }
            }
        }
    }

    fn resolve_combat(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let grid = self.grid;
        for tower in self.towers.iter_mut() {
            tower.resolve_combat(now, &grid, &mut self.enemies, out_events);
        }
    }

    fn purchase(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        let cost = kind.cost();
        self.economy.spend(cost);
        let tower = self.towers.insert(kind, cell);
        debug!(tower = tower.get(), ?kind, ?cell, cost, "tower purchased");
        out_events.push(Event::TowerPurchased {
            tower,
            kind,
            cell,
            cost,
        });
    }

    fn buy_tower(&mut self, kind: TowerKind, out_events: &mut Vec<Event>) {
        if !self.economy.can_afford(kind.cost()) {
            out_events.push(Event::PurchaseRejected {
                kind,
                reason: PlacementError::InsufficientFunds,
            });
            return;
        }

        let free = self.grid.inventory_cells().find(|cell| {
            placement::decide(&self.grid, &self.towers, *cell, None).is_ok()
        });
        match free {
            Some(cell) => self.purchase(kind, cell, out_events),
            None => out_events.push(Event::PurchaseRejected {
                kind,
                reason: PlacementError::InventoryFull,
            }),
        }
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        let verdict = if self.economy.can_afford(kind.cost()) {
            placement::decide(&self.grid, &self.towers, cell, None)
        } else {
            Err(PlacementError::InsufficientFunds)
        };

        match verdict {
            Ok(_) => self.purchase(kind, cell, out_events),
            Err(reason) => out_events.push(Event::PurchaseRejected { kind, reason }),
        }
    }

    fn begin_drag(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.get(tower) else {
            out_events.push(Event::DropRejected {
                tower,
                reason: PlacementError::MissingTower,
            });
            return;
        };

        self.drag = Some(DragState {
            tower,
            position: self.grid.center_of(state.cell),
        });
        out_events.push(Event::DragStarted { tower });
    }

    fn update_drag(&mut self, tower: TowerId, position: WorldPoint) {
        if let Some(drag) = self.drag.as_mut().filter(|drag| drag.tower == tower) {
            drag.position = position;
        }
    }

    fn end_drag(&mut self, tower: TowerId, target: Option<CellCoord>, out_events: &mut Vec<Event>) {
        let dragging = self.drag.take().filter(|drag| drag.tower == tower);
        let Some(source) = dragging.and_then(|_| self.towers.get(tower)) else {
            out_events.push(Event::DropRejected {
                tower,
                reason: PlacementError::MissingTower,
            });
            return;
        };
        let Some(target) = target else {
            out_events.push(Event::DropRejected {
                tower,
                reason: PlacementError::OutOfBounds,
            });
            return;
        };

        let from = source.cell;
        match placement::decide(&self.grid, &self.towers, target, Some(source)) {
            Ok(PlacementDecision::Return) => {
                debug!(tower = tower.get(), "drag cancelled");
            }
            Ok(PlacementDecision::Place) => {
                if let Some(state) = self.towers.get_mut(tower) {
                    state.cell = target;
                }
                debug!(tower = tower.get(), ?from, to = ?target, "tower moved");
                out_events.push(Event::TowerMoved {
                    tower,
                    from,
                    to: target,
                });
            }
            Ok(PlacementDecision::Merge(upgraded)) => {
                let _ = self.towers.remove(tower);
                let Some(state) = self.towers.get_mut(upgraded) else {
                    return;
                };
                state.upgrade();
                let level = state.level;
                debug!(consumed = tower.get(), upgraded = upgraded.get(), level, "towers merged");
                out_events.push(Event::TowersMerged {
                    consumed: tower,
                    upgraded,
                    level,
                });
            }
            Ok(PlacementDecision::Swap(other)) => {
                if let Some(state) = self.towers.get_mut(other) {
                    state.cell = from;
                }
                if let Some(state) = self.towers.get_mut(tower) {
                    state.cell = target;
                }
                debug!(dragged = tower.get(), other = other.get(), "towers swapped");
                out_events.push(Event::TowersSwapped {
                    dragged: tower,
                    other,
                });
            }
            Err(reason) => {
                debug!(tower = tower.get(), ?reason, "drop rejected");
                out_events.push(Event::DropRejected { tower, reason });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game is over every command is ignored; purchases and drags are
/// answered with a rejection carrying [`PlacementError::GameOver`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.economy.is_game_over() {
        match command {
            Command::BuyTower { kind } | Command::PlaceTower { kind, .. } => {
                out_events.push(Event::PurchaseRejected {
                    kind,
                    reason: PlacementError::GameOver,
                });
            }
            Command::BeginDrag { tower } | Command::EndDrag { tower, .. } => {
                out_events.push(Event::DropRejected {
                    tower,
                    reason: PlacementError::GameOver,
                });
            }
            _ => {}
        }
        return;
    }

    match command {
        Command::Tick { now } => {
            world.clock = now;
            out_events.push(Event::TimeAdvanced { now });
        }
        Command::StartWave { wave } => {
            world.wave = wave;
            info!(wave, "wave started");
            out_events.push(Event::WaveStarted { wave });
        }
        Command::SpawnEnemy { kind, lane } => world.spawn_enemy(kind, lane, out_events),
        Command::CompleteWave { wave } => {
            let reward = world.wave_clear_reward;
            world.economy.earn(reward);
            info!(wave, reward, "wave cleared");
            out_events.push(Event::WaveCleared { wave, reward });
        }
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::ResolveCombat => world.resolve_combat(out_events),
        Command::BuyTower { kind } => world.buy_tower(kind, out_events),
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::BeginDrag { tower } => world.begin_drag(tower, out_events),
        Command::UpdateDrag { tower, position } => world.update_drag(tower, position),
        Command::EndDrag { tower, target } => world.end_drag(tower, target, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use lane_defence_core::{
        CellCoord, EnemyView, GridLayout, LaneId, PlacementError, TowerId, TowerSnapshot,
        TowerView,
    };

    use super::{placement, EconomyState, PathTable, PlacementDecision, World};

    /// Grid layout the world is built on.
    #[must_use]
    pub fn grid(world: &World) -> GridLayout {
        world.grid
    }

    /// Provides read-only access to the lane waypoints.
    #[must_use]
    pub fn path_table(world: &World) -> &PathTable {
        &world.paths
    }

    /// Lanes enemies may be spawned on, in ascending row order.
    #[must_use]
    pub fn lanes(world: &World) -> Vec<LaneId> {
        world.paths.lanes().collect()
    }

    /// Current world clock.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.clock
    }

    /// Most recently started wave, zero before the first one.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Money, lives and game-over state.
    #[must_use]
    pub fn economy(world: &World) -> EconomyState {
        world.economy
    }

    /// Reports whether the terminal state was reached.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.economy.is_game_over()
    }

    /// Number of enemies still on the field.
    #[must_use]
    pub fn active_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the active enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the towers and their projectiles.
    ///
    /// The dragged tower reports the pointer position and is flagged as selected.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots = world
            .towers
            .iter()
            .map(|tower| {
                let dragged = world.drag.filter(|drag| drag.tower == tower.id);
                TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    level: tower.level,
                    cell: tower.cell,
                    position: dragged
                        .map(|drag| drag.position)
                        .unwrap_or_else(|| world.grid.center_of(tower.cell)),
                    range: tower.kind.range(),
                    selected: dragged.is_some(),
                    projectiles: tower.projectile_snapshots(),
                }
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Tower resting on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.at(cell).map(|tower| tower.id)
    }

    /// Cell the tower rests on, if it exists.
    #[must_use]
    pub fn tower_cell(world: &World, tower: TowerId) -> Option<CellCoord> {
        world.towers.get(tower).map(|state| state.cell)
    }

    /// Tower currently being dragged, if any.
    #[must_use]
    pub fn dragged_tower(world: &World) -> Option<TowerId> {
        world.drag.map(|drag| drag.tower)
    }

    /// Evaluates the placement rules for `source` (or a fresh purchase) onto `target`.
    pub fn placement_decision(
        world: &World,
        target: CellCoord,
        source: Option<TowerId>,
    ) -> Result<PlacementDecision, PlacementError> {
        let source = match source {
            Some(id) => Some(world.towers.get(id).ok_or(PlacementError::MissingTower)?),
            None => None,
        };
        placement::decide(&world.grid, &world.towers, target, source)
    }

    /// Reports whether `source` (or a fresh purchase) may land on `target`.
    #[must_use]
    pub fn can_place_tower(world: &World, target: CellCoord, source: Option<TowerId>) -> bool {
        placement_decision(world, target, source).is_ok()
    }
}
