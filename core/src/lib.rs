#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and the orchestrator submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Rejected requests never surface as
//! errors; they are reported as events carrying a [`PlacementError`] reason and
//! leave the world untouched.
//!
//! Read-only snapshots ([`EnemyView`], [`TowerView`], [`Frame`],
//! [`HudSnapshot`]) and the collaborator contracts ([`Clock`], [`RenderSink`],
//! [`UiSink`]) let rendering and UI layers observe the simulation without any
//! write access to it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod grid;
mod kinds;

pub use grid::{GridLayout, Zone, LANE_FIRST_ROW, LANE_LAST_ROW};
pub use kinds::{EnemyKind, EnemyStats, TowerKind, TowerStats};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the world clock to the provided absolute timestamp.
    Tick {
        /// Time elapsed since the simulation started.
        now: Duration,
    },
    /// Announces that a new wave entered its spawning phase.
    StartWave {
        /// Number of the wave that started.
        wave: u32,
    },
    /// Requests that a new enemy enters the provided lane.
    SpawnEnemy {
        /// Preset applied to the spawned enemy.
        kind: EnemyKind,
        /// Lane the enemy follows for its whole lifetime.
        lane: LaneId,
    },
    /// Announces that every enemy of the wave was spawned and removed.
    CompleteWave {
        /// Number of the wave that was cleared.
        wave: u32,
    },
    /// Moves every active enemy one step and removes dead or finished ones.
    AdvanceEnemies,
    /// Runs target acquisition, firing and projectile resolution for every tower.
    ResolveCombat,
    /// Purchases a tower into the first free inventory slot.
    BuyTower {
        /// Type of tower to purchase.
        kind: TowerKind,
    },
    /// Purchases a tower directly into the provided cell.
    PlaceTower {
        /// Type of tower to purchase.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Starts dragging an existing tower.
    BeginDrag {
        /// Tower captured by the pointer.
        tower: TowerId,
    },
    /// Moves the displayed position of the dragged tower.
    UpdateDrag {
        /// Tower currently being dragged.
        tower: TowerId,
        /// Canvas position the tower should be displayed at.
        position: WorldPoint,
    },
    /// Drops the dragged tower, resolving a move, merge, swap or snap-back.
    EndDrag {
        /// Tower currently being dragged.
        tower: TowerId,
        /// Cell under the pointer on release, if the pointer was on the grid.
        target: Option<CellCoord>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Absolute timestamp the world clock now reports.
        now: Duration,
    },
    /// Announces that a wave started spawning enemies.
    WaveStarted {
        /// Number of the wave.
        wave: u32,
    },
    /// Announces that a wave was cleared and its reward granted.
    WaveCleared {
        /// Number of the wave.
        wave: u32,
        /// Money granted for clearing the wave.
        reward: u32,
    },
    /// Confirms that an enemy entered a lane.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Preset applied to the enemy.
        kind: EnemyKind,
        /// Lane followed by the enemy.
        lane: LaneId,
    },
    /// Reports that a dead enemy was removed and its reward paid out.
    EnemyKilled {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Money granted for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the end of its lane and cost a life.
    EnemyEscaped {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Lives remaining after the escape.
        lives: i32,
    },
    /// Announces the terminal game-over state.
    GameOver,
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Reports that a projectile struck one or more enemies.
    ProjectileImpact {
        /// Tower that owned the projectile.
        tower: TowerId,
        /// Number of enemies damaged by the impact.
        enemies_hit: u32,
    },
    /// Confirms that a tower was purchased.
    TowerPurchased {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Type of the purchased tower.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: CellCoord,
        /// Money deducted for the purchase.
        cost: u32,
    },
    /// Reports that a purchase request was rejected without side effects.
    PurchaseRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Specific reason the purchase failed.
        reason: PlacementError,
    },
    /// Confirms that a tower is now being dragged.
    DragStarted {
        /// Tower captured by the pointer.
        tower: TowerId,
    },
    /// Confirms that a dragged tower moved to an empty cell.
    TowerMoved {
        /// Tower that moved.
        tower: TowerId,
        /// Cell the tower occupied before the drag.
        from: CellCoord,
        /// Cell the tower occupies now.
        to: CellCoord,
    },
    /// Confirms that two towers exchanged cells.
    TowersSwapped {
        /// Tower that was dragged.
        dragged: TowerId,
        /// Tower that occupied the drop cell.
        other: TowerId,
    },
    /// Confirms that the dragged tower was consumed to upgrade another one.
    TowersMerged {
        /// Tower removed by the merge.
        consumed: TowerId,
        /// Tower that gained a level.
        upgraded: TowerId,
        /// Level reached by the upgraded tower.
        level: u32,
    },
    /// Reports that a drop was illegal and the tower returned to its cell.
    DropRejected {
        /// Tower that snapped back.
        tower: TowerId,
        /// Specific reason the drop failed.
        reason: PlacementError,
    },
}

/// Reasons a purchase, placement or drop may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The game is over, so no further mutations are accepted.
    GameOver,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell belongs to the enemy lane.
    EnemyLane,
    /// The requested cell already holds a tower.
    Occupied,
    /// The zone of the requested cell does not accept the tower.
    ZoneMismatch,
    /// The player cannot afford the tower.
    InsufficientFunds,
    /// Every inventory slot is occupied.
    InventoryFull,
    /// No tower with the provided identifier exists or is being dragged.
    MissingTower,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifies an enemy lane by the grid row its waypoints share.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(u32);

impl LaneId {
    /// Creates a lane identifier for the provided grid row.
    #[must_use]
    pub const fn new(row: u32) -> Self {
        Self(row)
    }

    /// Grid row shared by every waypoint of the lane.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Continuous position expressed in canvas units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point from canvas coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point displaced by `distance` toward `target`.
    ///
    /// A zero-length direction leaves the point unchanged.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, distance: f32) -> Self {
        let length = self.distance(target);
        if length <= 0.0 {
            return self;
        }

        Self {
            x: self.x + (target.x - self.x) / length * distance,
            y: self.y + (target.y - self.y) / length * distance,
        }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn offset_from(self, other: WorldPoint) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Remaining hit points of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health left after taking `amount` damage, clamped at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Normalised pointer input already translated into canvas space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// The pointer button was pressed.
    Down(WorldPoint),
    /// The pointer moved.
    Move(WorldPoint),
    /// The pointer button was released.
    Up(WorldPoint),
}

impl PointerEvent {
    /// Canvas position carried by the event.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        match self {
            Self::Down(point) | Self::Move(point) | Self::Up(point) => *point,
        }
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Preset applied to the enemy.
    pub kind: EnemyKind,
    /// Lane followed by the enemy.
    pub lane: LaneId,
    /// Current canvas position.
    pub position: WorldPoint,
    /// Collision and drawing radius.
    pub size: f32,
    /// Remaining health.
    pub health: Health,
    /// Health the enemy spawned with.
    pub max_health: Health,
}

impl EnemySnapshot {
    /// Fraction of health remaining, in `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health.is_zero() {
            return 0.0;
        }
        self.health.get() as f32 / self.max_health.get() as f32
    }
}

/// Read-only snapshot describing all active enemies in spawn order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Current canvas position.
    pub position: WorldPoint,
    /// Splash radius, zero for single-target projectiles.
    pub splash_radius: f32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Type of the tower.
    pub kind: TowerKind,
    /// Current level, starting at one.
    pub level: u32,
    /// Cell the tower rests on.
    pub cell: CellCoord,
    /// Displayed canvas position; follows the pointer while dragged.
    pub position: WorldPoint,
    /// Targeting range in canvas units.
    pub range: f32,
    /// Whether the tower is selected and should show its range indicator.
    pub selected: bool,
    /// Projectiles owned by the tower.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl TowerSnapshot {
    /// Short label combining the type initial and the level, such as `A2`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.kind.initial(), self.level)
    }
}

/// Read-only snapshot describing all towers in insertion order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Placement feedback shown while a tower is dragged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPreview {
    /// Tower being dragged.
    pub tower: TowerId,
    /// Cell currently under the pointer, if any.
    pub cell: Option<CellCoord>,
    /// Whether releasing the pointer here would be accepted.
    pub placeable: bool,
    /// Pointer position minus the offset captured when the drag started.
    pub sprite_origin: WorldPoint,
}

/// Values shown by the player-facing status display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Money available for purchases.
    pub money: u32,
    /// Lives remaining.
    pub lives: i32,
    /// Current wave number.
    pub wave: u32,
    /// Whether the game reached its terminal state.
    pub game_over: bool,
}

/// Everything a render sink needs to draw a single frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Grid dimensions and zone layout.
    pub grid: GridLayout,
    /// Active enemies.
    pub enemies: EnemyView,
    /// Placed towers with their projectiles.
    pub towers: TowerView,
    /// Drag feedback, present only while a tower is dragged.
    pub drag: Option<DragPreview>,
    /// Whether the end screen should be shown.
    pub game_over: bool,
}

/// Source of the current timestamp fed into each simulation tick.
pub trait Clock {
    /// Time elapsed since the simulation started.
    fn now(&self) -> Duration;
}

/// Consumer of per-frame snapshots; has no write access to the simulation.
pub trait RenderSink {
    /// Draws the provided frame.
    fn present(&mut self, frame: &Frame);
}

/// Consumer of status display updates.
pub trait UiSink {
    /// Called whenever money, lives, wave or game-over state changed.
    fn hud_changed(&mut self, hud: &HudSnapshot);
}
