#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling system that drives enemy spawning cadence and wave progression.

use std::time::Duration;

use lane_defence_core::{Command, EnemyKind, Event, LaneId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: Duration,
    time_between_waves: Duration,
    initial_enemies_per_wave: u32,
    enemies_per_wave_growth: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, quota and seed.
    #[must_use]
    pub const fn new(
        spawn_interval: Duration,
        time_between_waves: Duration,
        initial_enemies_per_wave: u32,
        enemies_per_wave_growth: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            spawn_interval,
            time_between_waves,
            initial_enemies_per_wave,
            enemies_per_wave_growth,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(1_000),
            Duration::from_millis(5_000),
            10,
            5,
            0x5eed_1a4e,
        )
    }
}

/// Phase of the per-wave cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// Counting down until the next wave starts.
    Waiting,
    /// Emitting one enemy per spawn interval until the quota is met.
    Spawning,
    /// Quota met; waiting for the field to empty.
    Draining,
}

/// Pure system that owns the wave configuration and emits wave commands.
#[derive(Debug)]
pub struct WaveScheduler {
    spawn_interval: Duration,
    time_between_waves: Duration,
    enemies_per_wave_growth: u32,
    phase: WavePhase,
    wave: u32,
    enemies_per_wave: u32,
    enemies_spawned: u32,
    last_spawn: Duration,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Creates a new scheduler waiting for its first wave.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            time_between_waves: config.time_between_waves,
            enemies_per_wave_growth: config.enemies_per_wave_growth,
            phase: WavePhase::Waiting,
            wave: 0,
            enemies_per_wave: config.initial_enemies_per_wave,
            enemies_spawned: 0,
            last_spawn: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Current phase of the wave cycle.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Number of the most recently started wave, zero before the first.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Enemies the current (or next) wave spawns in total.
    #[must_use]
    pub const fn enemies_per_wave(&self) -> u32 {
        self.enemies_per_wave
    }

    /// Enemies spawned so far in the current wave.
    #[must_use]
    pub const fn enemies_spawned(&self) -> u32 {
        self.enemies_spawned
    }

    /// Consumes world events and emits at most one phase action per call.
    ///
    /// `active_enemies` is the number of enemies on the field before any
    /// command emitted here is applied.
    pub fn handle(
        &mut self,
        events: &[Event],
        active_enemies: usize,
        lanes: &[LaneId],
        out: &mut Vec<Command>,
    ) {
        let Some(now) = latest_time(events) else {
            return;
        };
        let elapsed = now.saturating_sub(self.last_spawn);

        match self.phase {
            WavePhase::Waiting => {
                if elapsed >= self.time_between_waves {
                    self.phase = WavePhase::Spawning;
                    self.enemies_spawned = 0;
                    self.wave = self.wave.saturating_add(1);
                    debug!(wave = self.wave, quota = self.enemies_per_wave, "wave spawning");
                    out.push(Command::StartWave { wave: self.wave });
                }
            }
            WavePhase::Spawning => {
                if elapsed < self.spawn_interval || lanes.is_empty() {
                    return;
                }

                let kind = EnemyKind::ALL[self.rng.gen_range(0..EnemyKind::ALL.len())];
                let lane = lanes[self.rng.gen_range(0..lanes.len())];
                self.enemies_spawned = self.enemies_spawned.saturating_add(1);
                self.last_spawn = now;
                trace!(wave = self.wave, spawned = self.enemies_spawned, ?kind, "spawn");
                out.push(Command::SpawnEnemy { kind, lane });

                if self.enemies_spawned >= self.enemies_per_wave {
                    debug!(wave = self.wave, "wave draining");
                    self.phase = WavePhase::Draining;
                }
            }
            WavePhase::Draining => {
                if active_enemies == 0 {
                    self.phase = WavePhase::Waiting;
                    self.last_spawn = now;
                    self.enemies_per_wave = self
                        .enemies_per_wave
                        .saturating_add(self.enemies_per_wave_growth);
                    debug!(wave = self.wave, next_quota = self.enemies_per_wave, "wave complete");
                    out.push(Command::CompleteWave { wave: self.wave });
                }
            }
        }
    }
}

fn latest_time(events: &[Event]) -> Option<Duration> {
    events.iter().rev().find_map(|event| match event {
        Event::TimeAdvanced { now } => Some(*now),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_batches_without_time() {
        let mut scheduler = WaveScheduler::new(Config::default());
        let mut commands = Vec::new();
        scheduler.handle(&[Event::GameOver], 0, &[LaneId::new(2)], &mut commands);
        assert!(commands.is_empty());
        assert_eq!(scheduler.phase(), WavePhase::Waiting);
    }

    #[test]
    fn latest_time_prefers_last_event() {
        let events = [
            Event::TimeAdvanced {
                now: Duration::from_millis(10),
            },
            Event::TimeAdvanced {
                now: Duration::from_millis(20),
            },
        ];
        assert_eq!(latest_time(&events), Some(Duration::from_millis(20)));
    }
}
