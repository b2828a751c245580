//! Serialisable configuration for a whole simulation.

use std::time::Duration;

use lane_defence_core::GridLayout;
use lane_defence_system_waves as waves;
use lane_defence_world as world;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest column count that fits a lane column, the tower slots and two inventory columns.
const MIN_COLUMNS: u32 = 4;
/// Smallest row count that covers the lane band.
const MIN_ROWS: u32 = 6;

/// Reasons a configuration cannot drive a simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The grid cannot host the zone layout.
    #[error("grid of {columns}x{rows} is too small; need at least {}x{}", MIN_COLUMNS, MIN_ROWS)]
    GridTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The cell size is zero, negative or not a number.
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    /// Enemies would spawn without delay.
    #[error("spawn interval must be greater than zero")]
    ZeroSpawnInterval,
    /// Waves would never spawn anything.
    #[error("waves must contain at least one enemy")]
    EmptyWave,
    /// The TOML document could not be decoded.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Side length of a cell in canvas units.
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 17,
            rows: 8,
            cell_size: 40.0,
        }
    }
}

/// Starting resources and rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money available before the first purchase.
    pub starting_money: u32,
    /// Lives available before the first escape.
    pub starting_lives: i32,
    /// Flat reward for clearing a wave.
    pub wave_clear_reward: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: 100,
            starting_lives: 10,
            wave_clear_reward: 50,
        }
    }
}

/// Wave cadence, quotas and the spawn seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Milliseconds between spawns inside a wave.
    pub spawn_interval_ms: u64,
    /// Milliseconds between a cleared wave and the next one.
    pub time_between_waves_ms: u64,
    /// Enemies spawned by the first wave.
    pub initial_enemies_per_wave: u32,
    /// Enemies added to the quota after every cleared wave.
    pub enemies_per_wave_growth: u32,
    /// Seed for enemy type and lane selection.
    pub seed: u64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1_000,
            time_between_waves_ms: 5_000,
            initial_enemies_per_wave: 10,
            enemies_per_wave_growth: 5,
            seed: 0x5eed_1a4e,
        }
    }
}

/// Complete configuration of a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid dimensions.
    pub grid: GridConfig,
    /// Starting resources and rewards.
    pub economy: EconomyConfig,
    /// Wave cadence and randomness.
    pub waves: WaveConfig,
}

impl SimulationConfig {
    /// Parses and validates a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridConfig {
            columns,
            rows,
            cell_size,
        } = self.grid;
        if columns < MIN_COLUMNS || rows < MIN_ROWS {
            return Err(ConfigError::GridTooSmall { columns, rows });
        }
        if cell_size.is_nan() || cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        if self.waves.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if self.waves.initial_enemies_per_wave == 0 {
            return Err(ConfigError::EmptyWave);
        }
        Ok(())
    }

    /// Grid layout described by the configuration.
    #[must_use]
    pub fn grid_layout(&self) -> GridLayout {
        GridLayout::new(self.grid.columns, self.grid.rows, self.grid.cell_size)
    }

    /// World parameters.
    #[must_use]
    pub fn world_config(&self) -> world::Config {
        world::Config::new(
            self.grid_layout(),
            self.economy.starting_money,
            self.economy.starting_lives,
            self.economy.wave_clear_reward,
        )
    }

    /// Wave scheduler parameters.
    #[must_use]
    pub fn wave_config(&self) -> waves::Config {
        waves::Config::new(
            Duration::from_millis(self.waves.spawn_interval_ms),
            Duration::from_millis(self.waves.time_between_waves_ms),
            self.waves.initial_enemies_per_wave,
            self.waves.enemies_per_wave_growth,
            self.waves.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SimulationConfig::from_toml_str("").expect("defaults are valid");
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.grid_layout(), GridLayout::new(17, 8, 40.0));
    }

    #[test]
    fn partial_sections_override_only_named_keys() {
        let config = SimulationConfig::from_toml_str(
            "[economy]\nstarting_money = 250\n\n[waves]\nseed = 42\n",
        )
        .expect("valid config");
        assert_eq!(config.economy.starting_money, 250);
        assert_eq!(config.economy.starting_lives, 10);
        assert_eq!(config.waves.seed, 42);
        assert_eq!(config.waves.spawn_interval_ms, 1_000);
    }

    #[test]
    fn rejects_grids_without_room_for_zones() {
        let error = SimulationConfig::from_toml_str("[grid]\ncolumns = 3\n").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::GridTooSmall {
                columns: 3,
                rows: 8
            }
        ));
    }

    #[test]
    fn rejects_degenerate_cell_size_and_waves() {
        let mut config = SimulationConfig::default();
        config.grid.cell_size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCellSize(_))
        ));

        let mut config = SimulationConfig::default();
        config.waves.spawn_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSpawnInterval)
        ));

        let mut config = SimulationConfig::default();
        config.waves.initial_enemies_per_wave = 0;
        assert!(matches!(config.validate(), Err(ConfigError::EmptyWave)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error = SimulationConfig::from_toml_str("[grid\ncolumns = 3").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().starts_with("failed to parse configuration"));
    }
}
