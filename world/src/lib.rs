#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lifeline Defence.
//!
//! The world owns every piece of mutable game state. It is only ever changed
//! through [`apply`], which validates each [`Command`] against the current
//! phase and resources before mutating anything and reports the outcome as
//! [`Event`] values. Rejected commands leave the state untouched.

mod effects;
mod enemies;
mod obstacles;
mod towers;

use std::time::Duration;

use lifeline_defence_core::{
    CellCoord, Command, EnemyBlueprint, EnemyId, Event, GamePhase, Heading, MergeError,
    ObstacleError, ObstacleId, ObstacleKind, ObstacleSlot, PlacementError, ProjectileId,
    ProjectileLaunch, ProjectileMotion, ProjectileSnapshot, SplashHit, TowerId, Tuning,
    WeaponKind, WorldPoint, WELCOME_BANNER,
};
use tracing::{debug, info};

use effects::EffectLog;
use enemies::{DamageOutcome, EnemyState};
use obstacles::ObstacleField;
use towers::{TowerRegistry, TowerState};

/// Represents the authoritative Lifeline Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    phase: GamePhase,
    clock: Duration,
    health: u32,
    coins: u32,
    wave: WaveCounters,
    enemies: Vec<EnemyState>,
    next_enemy_id: EnemyId,
    towers: TowerRegistry,
    projectiles: Vec<ProjectileSnapshot>,
    next_projectile_id: ProjectileId,
    obstacles: ObstacleField,
    effects: EffectLog,
    selected_cell: Option<CellCoord>,
    selected_weapon: WeaponKind,
    kills: u32,
    leaks: u32,
}

impl World {
    /// Creates a new world in the menu phase using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates a new world in the menu phase using the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        let wave = WaveCounters::first(&tuning, Duration::ZERO);
        Self {
            banner: WELCOME_BANNER,
            phase: GamePhase::Menu,
            clock: Duration::ZERO,
            health: tuning.economy.starting_health,
            coins: tuning.economy.starting_coins,
            wave,
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
            obstacles: ObstacleField::new(),
            effects: EffectLog::new(),
            selected_cell: None,
            selected_weapon: WeaponKind::Turret,
            kills: 0,
            leaks: 0,
            tuning,
        }
    }

    fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    fn start_session(&mut self, out_events: &mut Vec<Event>) {
        let tuning = std::mem::take(&mut self.tuning);
        let selected_weapon = self.selected_weapon;
        *self = Self::with_tuning(tuning);
        self.selected_weapon = selected_weapon;
        self.phase = GamePhase::Playing;

        info!(
            target: "lifeline_defence::world",
            health = self.health,
            coins = self.coins,
            quota = self.wave.enemies_in_wave,
            "session started"
        );
        out_events.push(Event::GamePhaseChanged {
            phase: GamePhase::Playing,
        });
        out_events.push(Event::WaveStarted {
            wave: self.wave.wave,
            quota: self.wave.enemies_in_wave,
        });
    }

    fn end_session(&mut self, out_events: &mut Vec<Event>) {
        if !self.is_playing() {
            return;
        }

        self.phase = GamePhase::GameOver;
        info!(
            target: "lifeline_defence::world",
            wave = self.wave.wave,
            kills = self.kills,
            leaks = self.leaks,
            "game over"
        );
        out_events.push(Event::GamePhaseChanged {
            phase: GamePhase::GameOver,
        });
    }

    fn select_cell(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if !self.tuning.grid.contains(cell) {
            return;
        }

        self.selected_cell = Some(cell);
        out_events.push(Event::CellSelected { cell });
    }

    fn check_tower_placement(
        &self,
        kind: WeaponKind,
        cell: CellCoord,
    ) -> Result<u32, PlacementError> {
        if !self.is_playing() {
            return Err(PlacementError::InvalidPhase);
        }

        if !self.tuning.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if self.towers.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }

        let cost = self.tuning.towers.stats(kind).cost;
        if self.coins < cost {
            return Err(PlacementError::InsufficientFunds);
        }

        Ok(cost)
    }

    fn place_tower(&mut self, kind: WeaponKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        let cost = match self.check_tower_placement(kind, cell) {
            Ok(cost) => cost,
            Err(reason) => {
                debug!(target: "lifeline_defence::world", ?kind, ?cell, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
                return;
            }
        };

        let tower = self.towers.allocate_id();
        self.towers
            .insert(TowerState::purchased(tower, kind, cell, &self.tuning.towers));
        self.coins -= cost;
        debug!(target: "lifeline_defence::world", tower = tower.get(), ?kind, ?cell, cost, "tower placed");
        out_events.push(Event::TowerPlaced { tower, kind, cell });
    }

    fn merge_towers(&mut self, source: TowerId, target: TowerId, out_events: &mut Vec<Event>) {
        let checked = if self.is_playing() {
            self.towers
                .validate_merge(source, target, self.tuning.towers.level_cap())
                .map(|(_, survivor)| survivor.clone())
        } else {
            Err(MergeError::InvalidPhase)
        };

        let survivor = match checked {
            Ok(survivor) => survivor,
            Err(reason) => {
                debug!(target: "lifeline_defence::world", source = source.get(), target = target.get(), %reason, "merge rejected");
                out_events.push(Event::TowerMergeRejected {
                    source,
                    target,
                    reason,
                });
                return;
            }
        };

        let _ = self.towers.remove(source);
        let _ = self.towers.remove(target);
        let merged = self.towers.allocate_id();
        let upgraded = survivor.merged(merged, &self.tuning.towers);
        let level = upgraded.level;
        self.towers.insert(upgraded);

        debug!(target: "lifeline_defence::world", merged = merged.get(), level, "towers merged");
        out_events.push(Event::TowersMerged {
            source,
            target,
            merged,
            level,
        });
    }

    fn place_obstacle(
        &mut self,
        slot: ObstacleSlot,
        kind: ObstacleKind,
        out_events: &mut Vec<Event>,
    ) {
        let cost = self.tuning.economy.obstacle_cost;
        let rejection = if !self.is_playing() {
            Some(ObstacleError::InvalidPhase)
        } else if slot.position().is_none() {
            Some(ObstacleError::UnknownSlot)
        } else if self.obstacles.is_occupied(slot) {
            Some(ObstacleError::Occupied)
        } else if self.coins < cost {
            Some(ObstacleError::InsufficientFunds)
        } else {
            None
        };

        if let Some(reason) = rejection {
            out_events.push(Event::ObstaclePlacementRejected { slot, reason });
            return;
        }

        if let Some(obstacle) = self.obstacles.place(slot, kind) {
            self.coins -= cost;
            out_events.push(Event::ObstaclePlaced { obstacle, slot });
        }
    }

    fn remove_obstacle(&mut self, obstacle: ObstacleId, out_events: &mut Vec<Event>) {
        if self.is_playing() && self.obstacles.remove(obstacle) {
            out_events.push(Event::ObstacleRemoved { obstacle });
        }
    }

    fn spawn_enemy(&mut self, blueprint: EnemyBlueprint, out_events: &mut Vec<Event>) {
        if self.wave.quota_met() {
            debug!(target: "lifeline_defence::world", wave = self.wave.wave, "spawn ignored, quota met");
            return;
        }

        let id = self.next_enemy_id;
        let Some(enemy) = EnemyState::spawn(id, blueprint) else {
            return;
        };

        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let kind = enemy.kind;
        self.enemies.push(enemy);
        self.wave.enemies_spawned += 1;

        debug!(
            target: "lifeline_defence::world",
            enemy = id.get(),
            kind = kind.tag(),
            spawned = self.wave.enemies_spawned,
            quota = self.wave.enemies_in_wave,
            "enemy spawned"
        );
        out_events.push(Event::EnemySpawned { enemy: id, kind });
    }

    fn move_enemy(&mut self, enemy: EnemyId, position: WorldPoint, path_index: usize) {
        if let Some(state) = self.enemies.iter_mut().find(|state| state.id == enemy) {
            state.relocate(position, path_index);
        }
    }

    fn leak_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemies.iter().position(|state| state.id == enemy) else {
            return;
        };

        let _ = self.enemies.remove(index);
        self.health = self.health.saturating_sub(1);
        self.leaks = self.leaks.saturating_add(1);
        debug!(target: "lifeline_defence::world", enemy = enemy.get(), health = self.health, "enemy leaked");
        out_events.push(Event::EnemyLeaked {
            enemy,
            health: self.health,
        });

        if self.health == 0 {
            self.end_session(out_events);
        }
    }

    fn fire_projectile(
        &mut self,
        tower: TowerId,
        launch: ProjectileLaunch,
        out_events: &mut Vec<Event>,
    ) {
        let grid = &self.tuning.grid;
        let clock = self.clock;
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };

        let aim = match launch.motion {
            ProjectileMotion::DirectFire { direction } => direction,
            ProjectileMotion::AreaFire { target, .. } => grid
                .cell_to_world(state.cell)
                .heading_to(target)
                .unwrap_or(Heading::FORWARD),
        };
        state.last_shot = Some(clock);
        state.target_facing = aim.angle();

        let projectile = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(projectile.get().saturating_add(1));
        self.projectiles.push(ProjectileSnapshot {
            id: projectile,
            position: launch.origin,
            height: launch.height,
            motion: launch.motion,
            speed: launch.speed,
            damage: launch.damage,
            tint: launch.tint,
        });
        out_events.push(Event::ProjectileFired { projectile, tower });
    }

    fn move_projectile(&mut self, projectile: ProjectileId, position: WorldPoint) {
        if let Some(state) = self
            .projectiles
            .iter_mut()
            .find(|state| state.id == projectile)
        {
            state.position = position;
        }
    }

    fn discard_projectile(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let before = self.projectiles.len();
        self.projectiles.retain(|state| state.id != projectile);
        if self.projectiles.len() != before {
            out_events.push(Event::ProjectileExpired { projectile });
        }
    }

    fn strike_enemy(
        &mut self,
        projectile: ProjectileId,
        enemy: EnemyId,
        damage: u32,
        impact: WorldPoint,
        out_events: &mut Vec<Event>,
    ) {
        if !self.projectiles.iter().any(|state| state.id == projectile) {
            return;
        }

        let outcome = match self
            .enemies
            .iter_mut()
            .find(|state| state.id == enemy && state.is_alive())
        {
            Some(target) => target.take_damage(damage),
            None => return,
        };

        self.projectiles.retain(|state| state.id != projectile);
        self.record_damage(enemy, damage, outcome, out_events);

        let height = self.tuning.projectiles.impact_height;
        let effect = self.effects.record_impact(impact, height, self.clock);
        out_events.push(Event::ImpactSpawned {
            effect,
            position: impact,
        });
    }

    fn detonate_shell(
        &mut self,
        projectile: ProjectileId,
        hits: Vec<SplashHit>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(shell) = self
            .projectiles
            .iter()
            .find(|state| state.id == projectile)
            .copied()
        else {
            return;
        };

        let ProjectileMotion::AreaFire {
            target,
            splash_radius,
        } = shell.motion
        else {
            return;
        };

        self.projectiles.retain(|state| state.id != projectile);
        for hit in hits {
            let outcome = match self.enemies.iter_mut().find(|state| state.id == hit.enemy) {
                Some(enemy) => enemy.take_damage(hit.damage),
                None => continue,
            };
            self.record_damage(hit.enemy, hit.damage, outcome, out_events);
        }

        let effect = self.effects.record_explosion(
            target,
            shell.height,
            splash_radius,
            shell.tint,
            self.clock,
        );
        out_events.push(Event::ExplosionSpawned {
            effect,
            position: target,
            radius: splash_radius,
        });
    }

    fn record_damage(
        &mut self,
        enemy: EnemyId,
        damage: u32,
        outcome: DamageOutcome,
        out_events: &mut Vec<Event>,
    ) {
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { remaining } => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    damage,
                    remaining,
                });
            }
            DamageOutcome::Killed { reward } => {
                self.coins = self.coins.saturating_add(reward);
                self.kills = self.kills.saturating_add(1);
                debug!(target: "lifeline_defence::world", enemy = enemy.get(), reward, coins = self.coins, "enemy killed");
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    damage,
                    remaining: 0,
                });
                out_events.push(Event::EnemyKilled { enemy, reward });
            }
        }
    }

    fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|enemy| enemy.is_alive()).count()
    }

    fn complete_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.wave.completed_at.is_some() || !self.wave.quota_met() || self.living_enemies() > 0
        {
            return;
        }

        let wave = self.wave.wave;
        let bonus = self.tuning.waves.completion_bonus(wave);
        self.wave.completed_at = Some(self.clock);
        self.coins = self.coins.saturating_add(bonus);

        info!(target: "lifeline_defence::world", wave, bonus, coins = self.coins, "wave completed");
        out_events.push(Event::WaveCompleted { wave, bonus });
    }

    fn start_next_wave(&mut self, out_events: &mut Vec<Event>) {
        let Some(completed_at) = self.wave.completed_at else {
            return;
        };

        if self.clock.saturating_sub(completed_at) < self.tuning.waves.completion_delay() {
            return;
        }

        let quota = self.tuning.waves.quota_after(self.wave.wave);
        self.wave = WaveCounters {
            wave: self.wave.wave.saturating_add(1),
            enemies_in_wave: quota,
            enemies_spawned: 0,
            started_at: self.clock,
            completed_at: None,
        };

        info!(target: "lifeline_defence::world", wave = self.wave.wave, quota, "wave started");
        out_events.push(Event::WaveStarted {
            wave: self.wave.wave,
            quota,
        });
    }

    fn remove_dead_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                return true;
            }

            out_events.push(Event::EnemyRemoved { enemy: enemy.id });
            false
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame | Command::RestartGame => world.start_session(out_events),
        Command::EndGame => world.end_session(out_events),
        Command::SelectCell { cell } => world.select_cell(cell, out_events),
        Command::SelectWeapon { kind } => world.selected_weapon = kind,
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::MergeTowers { source, target } => world.merge_towers(source, target, out_events),
        Command::PlaceObstacle { slot, kind } => world.place_obstacle(slot, kind, out_events),
        Command::DismissEffect { effect } => {
            let _ = world.effects.dismiss(effect);
        }
        Command::SetTowerFacing { tower, facing } => {
            if let Some(state) = world.towers.get_mut(tower) {
                state.facing = facing;
            }
        }
        simulation_command => {
            if world.is_playing() {
                apply_simulation(world, simulation_command, out_events);
            }
        }
    }
}

fn apply_simulation(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::RemoveObstacle { obstacle } => world.remove_obstacle(obstacle, out_events),
        Command::SpawnEnemy { enemy } => world.spawn_enemy(enemy, out_events),
        Command::MoveEnemy {
            enemy,
            position,
            path_index,
        } => world.move_enemy(enemy, position, path_index),
        Command::LeakEnemy { enemy } => world.leak_enemy(enemy, out_events),
        Command::FireProjectile { tower, launch } => {
            world.fire_projectile(tower, launch, out_events)
        }
        Command::MoveProjectile {
            projectile,
            position,
        } => world.move_projectile(projectile, position),
        Command::DiscardProjectile { projectile } => {
            world.discard_projectile(projectile, out_events)
        }
        Command::StrikeEnemy {
            projectile,
            enemy,
            damage,
            impact,
        } => world.strike_enemy(projectile, enemy, damage, impact, out_events),
        Command::DetonateShell { projectile, hits } => {
            world.detonate_shell(projectile, hits, out_events)
        }
        Command::CompleteWave => world.complete_wave(out_events),
        Command::StartNextWave => world.start_next_wave(out_events),
        Command::RemoveDeadEnemies => world.remove_dead_enemies(out_events),
        Command::StartGame
        | Command::RestartGame
        | Command::EndGame
        | Command::SelectCell { .. }
        | Command::SelectWeapon { .. }
        | Command::PlaceTower { .. }
        | Command::MergeTowers { .. }
        | Command::PlaceObstacle { .. }
        | Command::DismissEffect { .. }
        | Command::SetTowerFacing { .. } => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use lifeline_defence_core::{
        EnemyView, Explosion, GamePhase, GridLayout, Impact, ObstacleSnapshot, ProjectileView,
        SelectionStatus, TowerView, Tuning, WaveSnapshot, WeaponKind,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Mapping between tower cells and world positions.
    #[must_use]
    pub fn grid_layout(world: &World) -> &GridLayout {
        &world.tuning.grid
    }

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Simulation time elapsed since the session started.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.clock
    }

    /// Remaining player health.
    #[must_use]
    pub fn health(world: &World) -> u32 {
        world.health
    }

    /// Coins available to the player.
    #[must_use]
    pub fn coins(world: &World) -> u32 {
        world.coins
    }

    /// Captures the wave counters.
    #[must_use]
    pub fn wave(world: &World) -> WaveSnapshot {
        world.wave.snapshot()
    }

    /// Captures a read-only view of the enemies on the field, dead ones included
    /// until cleanup removes them.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Number of enemies on the field with positive health.
    #[must_use]
    pub fn living_enemy_count(world: &World) -> usize {
        world.living_enemies()
    }

    /// Captures a read-only view of the towers placed on the grid.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.projectiles.clone())
    }

    /// Obstacles placed in the obstacle slots.
    #[must_use]
    pub fn obstacles(world: &World) -> Vec<ObstacleSnapshot> {
        world.obstacles.iter().copied().collect()
    }

    /// Impact effects awaiting dismissal.
    #[must_use]
    pub fn impacts(world: &World) -> &[Impact] {
        world.effects.impacts()
    }

    /// Explosion effects awaiting dismissal.
    #[must_use]
    pub fn explosions(world: &World) -> &[Explosion] {
        world.effects.explosions()
    }

    /// Weapon kind the next purchase will use.
    #[must_use]
    pub fn selected_weapon(world: &World) -> WeaponKind {
        world.selected_weapon
    }

    /// Derived information about the selected cell, if any.
    #[must_use]
    pub fn selection(world: &World) -> Option<SelectionStatus> {
        let cell = world.selected_cell?;
        let tower = world.towers.occupant(cell).map(|tower| tower.id);
        let can_place = world
            .check_tower_placement(world.selected_weapon, cell)
            .is_ok();
        let can_merge = tower.is_some_and(|tower| {
            world
                .towers
                .has_merge_partner(tower, world.tuning.towers.level_cap())
        });

        Some(SelectionStatus {
            cell,
            tower,
            weapon: world.selected_weapon,
            can_place,
            can_merge,
        })
    }

    /// Kill and leak counters accumulated during the session.
    #[must_use]
    pub fn session_stats(world: &World) -> SessionStats {
        SessionStats {
            kills: world.kills,
            leaks: world.leaks,
        }
    }

    /// Kill and leak counters accumulated during the session.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SessionStats {
        /// Enemies killed by towers.
        pub kills: u32,
        /// Enemies that reached the life line.
        pub leaks: u32,
    }
}

#[derive(Clone, Copy, Debug)]
struct WaveCounters {
    wave: u32,
    enemies_in_wave: u32,
    enemies_spawned: u32,
    started_at: Duration,
    completed_at: Option<Duration>,
}

impl WaveCounters {
    fn first(tuning: &Tuning, started_at: Duration) -> Self {
        Self {
            wave: 1,
            enemies_in_wave: tuning.waves.initial_quota,
            enemies_spawned: 0,
            started_at,
            completed_at: None,
        }
    }

    fn quota_met(&self) -> bool {
        self.enemies_spawned >= self.enemies_in_wave
    }

    fn progress(&self) -> f32 {
        if self.enemies_in_wave == 0 {
            return 100.0;
        }

        (self.enemies_spawned as f32 / self.enemies_in_wave as f32 * 100.0).min(100.0)
    }

    fn snapshot(&self) -> lifeline_defence_core::WaveSnapshot {
        lifeline_defence_core::WaveSnapshot {
            wave: self.wave,
            enemies_in_wave: self.enemies_in_wave,
            enemies_spawned: self.enemies_spawned,
            progress: self.progress(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}
