#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that runs every Lifeline Defence system against the world.
//!
//! A tick advances the clock and then runs the stages in a fixed order:
//! spawning, enemy movement, tower fire, projectile resolution, the wave
//! lifecycle and finally the removal of dead enemies. Each stage reads fresh
//! views, so it observes everything the previous stages changed. When a leak
//! ends the game the remaining stages are skipped.

use std::time::Duration;

use lifeline_defence_core::{Command, Event, GamePhase, TowerTarget, Tuning};
use lifeline_defence_system_movement::{self as movement, Movement};
use lifeline_defence_system_projectiles::{self as projectiles, Projectiles};
use lifeline_defence_system_spawning::{self as spawning, Spawning};
use lifeline_defence_system_tower_combat::{self as tower_combat, TowerCombat};
use lifeline_defence_system_tower_targeting::TowerTargeting;
use lifeline_defence_system_waves::{self as waves, Waves};
use lifeline_defence_world::{self as world, query, World};
use tracing::trace;

/// Owns the systems and scratch buffers needed to advance a session.
#[derive(Debug)]
pub struct Simulation {
    spawning: Spawning,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    waves: Waves,
    tick_events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
}

impl Simulation {
    /// Creates the systems from the provided tuning and random seed.
    ///
    /// The tuning should match the one the world was created with.
    #[must_use]
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            spawning: Spawning::new(spawning::Config::new(tuning, seed)),
            movement: Movement::new(movement::Config::from_tuning(tuning)),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(tower_combat::Config::from_tuning(tuning)),
            projectiles: Projectiles::new(projectiles::Config::from_tuning(tuning)),
            waves: Waves::new(waves::Config::from_tuning(tuning)),
            tick_events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Creates the systems using the tuning the world was created with.
    #[must_use]
    pub fn for_world(world: &World, seed: u64) -> Self {
        Self::new(query::tuning(world), seed)
    }

    /// Advances the session by `dt`, appending every emitted event to `out_events`.
    ///
    /// Does nothing unless a game is in progress.
    pub fn tick(&mut self, world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
        if query::phase(world) != GamePhase::Playing {
            return;
        }

        self.tick_events.clear();
        world::apply(world, Command::Tick { dt }, &mut self.tick_events);
        out_events.extend(self.tick_events.iter().cloned());

        self.spawning
            .handle(query::now(world), &query::wave(world), &mut self.commands);
        if !self.flush(world, out_events) {
            return;
        }

        self.movement
            .handle(&self.tick_events, &query::enemy_view(world), &mut self.commands);
        if !self.flush(world, out_events) {
            return;
        }

        let tower_view = query::tower_view(world);
        self.targeting.handle(
            &tower_view,
            &query::enemy_view(world),
            query::grid_layout(world),
            &mut self.targets,
        );
        self.combat.handle(
            query::now(world),
            &tower_view,
            &self.targets,
            &mut self.commands,
        );
        if !self.flush(world, out_events) {
            return;
        }

        self.projectiles.handle(
            &self.tick_events,
            &query::projectile_view(world),
            &query::enemy_view(world),
            &query::obstacles(world),
            &mut self.commands,
        );
        if !self.flush(world, out_events) {
            return;
        }

        self.waves.handle(
            query::now(world),
            &query::wave(world),
            query::living_enemy_count(world),
            &mut self.commands,
        );
        if !self.flush(world, out_events) {
            return;
        }

        self.commands.push(Command::RemoveDeadEnemies);
        let _ = self.flush(world, out_events);

        trace!(
            target: "lifeline_defence::simulation",
            now_ms = query::now(world).as_millis() as u64,
            enemies = query::enemy_view(world).len(),
            projectiles = query::projectile_view(world).len(),
            "tick resolved"
        );
    }

    /// Applies the queued commands and reports whether the game is still running.
    fn flush(&mut self, world: &mut World, out_events: &mut Vec<Event>) -> bool {
        for command in self.commands.drain(..) {
            world::apply(world, command, out_events);
        }

        query::phase(world) == GamePhase::Playing
    }
}
