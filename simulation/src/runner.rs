//! Drives a simulation with injected clock, render and UI collaborators.

use std::time::Duration;

use lane_defence_core::{Clock, HudSnapshot, RenderSink, UiSink};

use crate::Simulation;

/// Clock whose time only moves when told to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock reading `now`.
    #[must_use]
    pub const fn new(now: Duration) -> Self {
        Self { now }
    }

    /// Jumps to an absolute time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Moves time forward by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.now = self.now.saturating_add(delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Clock advancing in fixed frame increments for headless runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    frame_length: Duration,
    frame: u32,
}

impl FrameClock {
    /// Creates a clock at frame zero.
    #[must_use]
    pub const fn new(frame_length: Duration) -> Self {
        Self {
            frame_length,
            frame: 0,
        }
    }

    /// Advances to the next frame.
    pub fn next_frame(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }

    /// Number of frames elapsed.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }
}

impl Clock for FrameClock {
    fn now(&self) -> Duration {
        self.frame_length.saturating_mul(self.frame)
    }
}

/// Simulation bound to its clock and output sinks.
#[derive(Debug)]
pub struct Session<C, R, U> {
    simulation: Simulation,
    clock: C,
    render: R,
    ui: U,
    last_hud: Option<HudSnapshot>,
}

impl<C, R, U> Session<C, R, U>
where
    C: Clock,
    R: RenderSink,
    U: UiSink,
{
    /// Creates a session; nothing is presented until the first step.
    pub fn new(simulation: Simulation, clock: C, render: R, ui: U) -> Self {
        Self {
            simulation,
            clock,
            render,
            ui,
            last_hud: None,
        }
    }

    /// Ticks the simulation at the clock's time and presents the result.
    pub fn step(&mut self) {
        self.simulation.tick(self.clock.now());
        self.present();
    }

    /// Draws the current frame and pushes the status display if it changed.
    pub fn present(&mut self) {
        self.render.present(&self.simulation.frame());

        let hud = self.simulation.hud();
        if self.last_hud != Some(hud) {
            self.ui.hud_changed(&hud);
            self.last_hud = Some(hud);
        }
    }

    /// Read-only access to the simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Mutable access for issuing commands and pointer input.
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Read-only access to the render sink.
    pub fn render_sink(&self) -> &R {
        &self.render
    }

    /// Read-only access to the UI sink.
    pub fn ui_sink(&self) -> &U {
        &self.ui
    }
}
