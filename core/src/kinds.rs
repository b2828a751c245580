//! Enemy and tower presets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Enemy presets spawned by waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Balanced enemy.
    Normal,
    /// Quick and fragile enemy.
    Fast,
    /// Slow enemy with a large health pool.
    Tank,
}

/// Fixed attributes of an enemy preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Canvas units travelled per tick.
    pub speed: f32,
    /// Health the enemy spawns with.
    pub max_health: u32,
    /// Money granted when the enemy is killed.
    pub reward: u32,
    /// Collision and drawing radius.
    pub size: f32,
}

static NORMAL_ENEMY: EnemyStats = EnemyStats {
    speed: 0.25,
    max_health: 100,
    reward: 20,
    size: 20.0,
};

static FAST_ENEMY: EnemyStats = EnemyStats {
    speed: 0.5,
    max_health: 50,
    reward: 15,
    size: 15.0,
};

static TANK_ENEMY: EnemyStats = EnemyStats {
    speed: 0.125,
    max_health: 200,
    reward: 25,
    size: 25.0,
};

impl EnemyKind {
    /// Every enemy preset, in the order waves sample from.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Fast, EnemyKind::Tank];

    /// Attributes associated with the preset.
    #[must_use]
    pub fn stats(self) -> &'static EnemyStats {
        match self {
            Self::Normal => &NORMAL_ENEMY,
            Self::Fast => &FAST_ENEMY,
            Self::Tank => &TANK_ENEMY,
        }
    }
}

/// Purchasable tower types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap single-target tower.
    Basic,
    /// Heavy single-target tower with a slow fire rate.
    Sniper,
    /// Area-of-effect tower.
    Aoe,
}

/// Level-one attributes of a tower type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage per projectile at level one.
    pub base_damage: u32,
    /// Targeting range in canvas units.
    pub range: f32,
    /// Minimum time between shots at level one.
    pub base_fire_interval: Duration,
    /// Purchase price.
    pub cost: u32,
    /// Splash radius at level one, zero for single-target towers.
    pub base_splash_radius: f32,
}

static BASIC_TOWER: TowerStats = TowerStats {
    base_damage: 25,
    range: 800.0,
    base_fire_interval: Duration::from_millis(1000),
    cost: 50,
    base_splash_radius: 0.0,
};

static SNIPER_TOWER: TowerStats = TowerStats {
    base_damage: 50,
    range: 800.0,
    base_fire_interval: Duration::from_millis(1500),
    cost: 100,
    base_splash_radius: 0.0,
};

static AOE_TOWER: TowerStats = TowerStats {
    base_damage: 20,
    range: 800.0,
    base_fire_interval: Duration::from_millis(2000),
    cost: 150,
    base_splash_radius: 50.0,
};

impl TowerKind {
    /// Every purchasable tower type.
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Sniper, TowerKind::Aoe];

    /// Level-one attributes of the tower type.
    #[must_use]
    pub fn stats(self) -> &'static TowerStats {
        match self {
            Self::Basic => &BASIC_TOWER,
            Self::Sniper => &SNIPER_TOWER,
            Self::Aoe => &AOE_TOWER,
        }
    }

    /// Purchase price.
    #[must_use]
    pub fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Targeting range; does not scale with level.
    #[must_use]
    pub fn range(self) -> f32 {
        self.stats().range
    }

    /// Damage per projectile at the provided level.
    #[must_use]
    pub fn damage_at(self, level: u32) -> u32 {
        self.stats().base_damage.saturating_mul(level.max(1))
    }

    /// Minimum time between shots at the provided level.
    #[must_use]
    pub fn fire_interval_at(self, level: u32) -> Duration {
        self.stats().base_fire_interval / level.max(1)
    }

    /// Splash radius at the provided level, zero for single-target towers.
    #[must_use]
    pub fn splash_radius_at(self, level: u32) -> f32 {
        self.stats().base_splash_radius * level.max(1) as f32
    }

    /// Single upper-case letter identifying the type.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Basic => 'B',
            Self::Sniper => 'S',
            Self::Aoe => 'A',
        }
    }
}
