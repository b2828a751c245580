#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation orchestrator for Lane Defence.
//!
//! [`Simulation`] owns the authoritative world together with the wave
//! scheduler and placement controller, and advances them once per
//! [`Simulation::tick`] in a fixed order:
//!
//! 1. wave phase check and spawning,
//! 2. enemy movement,
//! 3. removal of dead or finished enemies with their economy effects,
//! 4. tower targeting, firing and projectile resolution in insertion order.
//!
//! Render and UI layers read [`Frame`] and [`HudSnapshot`] values; input
//! layers feed normalised [`PointerEvent`] values or call the purchase
//! commands directly. [`Session`] wires the simulation to injected
//! [`lane_defence_core::Clock`], [`lane_defence_core::RenderSink`] and
//! [`lane_defence_core::UiSink`] collaborators.

mod config;
mod runner;

use std::time::Duration;

use lane_defence_core::{
    Command, Event, Frame, HudSnapshot, LaneId, PointerEvent, TowerId, TowerKind, WorldPoint,
};
use lane_defence_system_placement::PlacementController;
use lane_defence_system_waves::{WavePhase, WaveScheduler};
use lane_defence_world::{self as world, query, World};
use tracing::debug;

pub use config::{ConfigError, EconomyConfig, GridConfig, SimulationConfig, WaveConfig};
pub use runner::{FrameClock, ManualClock, Session};

/// Explicit simulation context replacing any global game state.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    waves: WaveScheduler,
    placement: PlacementController,
    lanes: Vec<LaneId>,
    selected: Option<TowerKind>,
    events: Vec<Event>,
}

impl Simulation {
    /// Builds a simulation from a validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = World::new(config.world_config());
        let lanes = query::lanes(&world);
        Ok(Self {
            world,
            waves: WaveScheduler::new(config.wave_config()),
            placement: PlacementController::new(),
            lanes,
            selected: None,
            events: Vec::new(),
        })
    }

    /// Advances the simulation to `now`, measured from the start of the run.
    ///
    /// Does nothing once the game is over.
    pub fn tick(&mut self, now: Duration) {
        if query::is_game_over(&self.world) {
            return;
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { now }, &mut events);

        let mut commands = Vec::new();
        self.waves.handle(
            &events,
            query::active_enemy_count(&self.world),
            &self.lanes,
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::AdvanceEnemies, &mut events);
        if query::is_game_over(&self.world) {
            self.placement.cancel();
            self.selected = None;
        } else {
            world::apply(&mut self.world, Command::ResolveCombat, &mut events);
        }

        self.events.append(&mut events);
    }

    /// Purchases a tower into the first free inventory slot.
    pub fn buy_tower(&mut self, kind: TowerKind) {
        self.execute(Command::BuyTower { kind });
    }

    /// Selects the tower type used by the next [`Simulation::place_tower`] call.
    pub fn select_tower_type(&mut self, kind: TowerKind) {
        self.selected = Some(kind);
    }

    /// Tower type awaiting direct placement, if any.
    #[must_use]
    pub fn selected_tower_type(&self) -> Option<TowerKind> {
        self.selected
    }

    /// Purchases the selected tower type onto the cell under `position`.
    ///
    /// The selection is cleared whether or not the placement succeeds.
    pub fn place_tower(&mut self, position: WorldPoint) {
        let Some(kind) = self.selected.take() else {
            return;
        };
        let Some(cell) = query::grid(&self.world).cell_at(position) else {
            debug!(?kind, "placement outside the grid ignored");
            return;
        };
        self.execute(Command::PlaceTower { kind, cell });
    }

    /// Feeds a normalised pointer event through the placement controller.
    pub fn pointer(&mut self, pointer: PointerEvent) {
        if query::is_game_over(&self.world) {
            debug!(?pointer, "pointer input ignored after game over");
            return;
        }

        let grid = query::grid(&self.world);
        let mut commands = Vec::new();
        let state = &self.world;
        self.placement.handle(
            pointer,
            &grid,
            |cell| query::tower_at(state, cell),
            &mut commands,
        );
        for command in commands {
            if matches!(command, Command::EndDrag { .. }) {
                self.selected = None;
            }
            self.execute(command);
        }
    }

    /// Captures a tower as if the pointer pressed on its cell.
    pub fn begin_drag(&mut self, tower: TowerId) {
        let Some(cell) = query::tower_cell(&self.world, tower) else {
            debug!(tower = tower.get(), "drag requested for unknown tower");
            return;
        };
        let centre = query::grid(&self.world).center_of(cell);
        self.pointer(PointerEvent::Down(centre));
    }

    /// Moves the dragged tower toward `position`.
    pub fn update_drag(&mut self, position: WorldPoint) {
        self.pointer(PointerEvent::Move(position));
    }

    /// Releases the dragged tower over `position`.
    pub fn end_drag(&mut self, position: WorldPoint) {
        self.pointer(PointerEvent::Up(position));
    }

    fn execute(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    /// Removes and returns every event recorded since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot of everything a render sink draws.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let grid = query::grid(&self.world);
        let game_over = query::is_game_over(&self.world);
        let drag = if game_over {
            None
        } else {
            self.placement.preview(&grid, |cell, tower| {
                query::can_place_tower(&self.world, cell, Some(tower))
            })
        };

        Frame {
            grid,
            enemies: query::enemy_view(&self.world),
            towers: query::tower_view(&self.world),
            drag,
            game_over,
        }
    }

    /// Values shown by the status display.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        let economy = query::economy(&self.world);
        HudSnapshot {
            money: economy.money(),
            lives: economy.lives(),
            wave: query::wave(&self.world),
            game_over: economy.is_game_over(),
        }
    }

    /// Reports whether the terminal state was reached.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_game_over(&self.world)
    }

    /// Current phase of the wave cycle.
    #[must_use]
    pub fn wave_phase(&self) -> WavePhase {
        self.waves.phase()
    }

    /// Enemies the current (or next) wave spawns in total.
    #[must_use]
    pub fn enemies_per_wave(&self) -> u32 {
        self.waves.enemies_per_wave()
    }

    /// Read-only access to the authoritative world for detailed queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}
