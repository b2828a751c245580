//! Authoritative tower state, targeting and projectile resolution.

use std::time::Duration;

use lane_defence_core::{
    CellCoord, EnemyId, Event, GridLayout, ProjectileSnapshot, TowerId, TowerKind, WorldPoint,
    Zone,
};

use crate::enemies::Enemy;

/// Canvas units a projectile travels per tick.
pub(crate) const PROJECTILE_SPEED: f32 = 5.0;

/// Multiple of the tower range after which a projectile despawns.
const PROJECTILE_RANGE_FACTOR: f32 = 1.5;

/// Homing damage packet owned by the tower that fired it.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    position: WorldPoint,
    aim: WorldPoint,
    target: EnemyId,
    travelled: f32,
    damage: u32,
    splash_radius: f32,
}

impl Projectile {
    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            splash_radius: self.splash_radius,
        }
    }

    /// Advances one tick and applies hits, returning the number of enemies
    /// damaged and whether the projectile should be removed.
    fn advance(&mut self, enemies: &mut [Enemy], range: f32) -> (u32, bool) {
        if let Some(enemy) = enemies
            .iter()
            .find(|enemy| enemy.id() == self.target && enemy.is_active())
        {
            self.aim = enemy.position();
        }

        let distance = self.position.distance(self.aim);
        if distance > 0.0 {
            self.position = self.position.step_toward(self.aim, PROJECTILE_SPEED);
            self.travelled += PROJECTILE_SPEED;
        }

        let mut hits = 0;
        if self.splash_radius > 0.0 {
            for enemy in enemies.iter_mut() {
                if enemy.is_active() && self.position.distance(enemy.position()) <= self.splash_radius
                {
                    enemy.take_damage(self.damage);
                    hits += 1;
                }
            }
        } else if let Some(enemy) = enemies.iter_mut().find(|enemy| {
            enemy.is_active() && self.position.distance(enemy.position()) < enemy.size()
        }) {
            enemy.take_damage(self.damage);
            hits = 1;
        }

        let expired = hits > 0
            || distance < PROJECTILE_SPEED
            || self.travelled > range * PROJECTILE_RANGE_FACTOR;
        (hits, expired)
    }
}

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) level: u32,
    pub(crate) cell: CellCoord,
    target: Option<EnemyId>,
    last_shot: Duration,
    projectiles: Vec<Projectile>,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            level: 1,
            cell,
            target: None,
            last_shot: Duration::ZERO,
            projectiles: Vec::new(),
        }
    }

    /// Same type and level.
    pub(crate) fn can_merge(&self, other: &TowerState) -> bool {
        self.kind == other.kind && self.level == other.level
    }

    pub(crate) fn upgrade(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    pub(crate) fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles.iter().map(Projectile::snapshot).collect()
    }

    /// Runs targeting, firing and projectile updates for a single tick.
    pub(crate) fn resolve_combat(
        &mut self,
        now: Duration,
        grid: &GridLayout,
        enemies: &mut [Enemy],
        out_events: &mut Vec<Event>,
    ) {
        if grid.zone_of(self.cell) == Zone::Inventory {
            self.target = None;
        } else {
            self.find_target(grid, enemies);
            self.attack(now, grid, enemies, out_events);
        }
        self.update_projectiles(enemies, out_events);
    }

    fn find_target(&mut self, grid: &GridLayout, enemies: &[Enemy]) {
        let origin = grid.center_of(self.cell);
        let range = self.kind.range();
        let reachable =
            |enemy: &Enemy| enemy.is_active() && origin.distance(enemy.position()) <= range;

        if let Some(current) = self.target {
            if enemies
                .iter()
                .any(|enemy| enemy.id() == current && reachable(enemy))
            {
                return;
            }
        }

        let row = i64::from(self.cell.row());
        self.target = enemies
            .iter()
            .find(|enemy| reachable(enemy) && grid.row_index(enemy.position().y()) == row)
            .or_else(|| enemies.iter().find(|enemy| reachable(enemy)))
            .map(Enemy::id);
    }

    fn attack(
        &mut self,
        now: Duration,
        grid: &GridLayout,
        enemies: &[Enemy],
        out_events: &mut Vec<Event>,
    ) {
        let Some(target) = self.target else {
            return;
        };
        if now.saturating_sub(self.last_shot) < self.kind.fire_interval_at(self.level) {
            return;
        }
        let Some(enemy) = enemies.iter().find(|enemy| enemy.id() == target) else {
            return;
        };

        self.projectiles.push(Projectile {
            position: grid.center_of(self.cell),
            aim: enemy.position(),
            target,
            travelled: 0.0,
            damage: self.kind.damage_at(self.level),
            splash_radius: self.kind.splash_radius_at(self.level),
        });
        self.last_shot = now;
        out_events.push(Event::ProjectileFired {
            tower: self.id,
            target,
        });
    }

    fn update_projectiles(&mut self, enemies: &mut [Enemy], out_events: &mut Vec<Event>) {
        let range = self.kind.range();
        for index in (0..self.projectiles.len()).rev() {
            let (hits, expired) = self.projectiles[index].advance(enemies, range);
            if hits > 0 {
                out_events.push(Event::ProjectileImpact {
                    tower: self.id,
                    enemies_hit: hits,
                });
            }
            if expired {
                let _ = self.projectiles.remove(index);
            }
        }
    }
}

/// Stores towers in insertion order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: Vec<TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        self.entries.push(TowerState::new(id, kind, cell));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.iter().find(|tower| tower.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.iter_mut().find(|tower| tower.id == id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        let index = self.entries.iter().position(|tower| tower.id == id)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn at(&self, cell: CellCoord) -> Option<&TowerState> {
        self.entries.iter().find(|tower| tower.cell == cell)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.iter_mut()
    }
}
