#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along their paths.
//!
//! Enemies never steer: each one heads straight for the next waypoint of its
//! own path and snaps onto it once close enough. Enemies that crossed the life
//! line or exhausted their path are reported as leaks.

use std::time::Duration;

use lifeline_defence_core::{Command, EnemySnapshot, EnemyView, Event, Tuning};

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    life_line_z: f32,
    waypoint_epsilon: f32,
}

impl Config {
    /// Creates a new configuration from the life line depth and snap distance.
    #[must_use]
    pub const fn new(life_line_z: f32, waypoint_epsilon: f32) -> Self {
        Self {
            life_line_z,
            waypoint_epsilon,
        }
    }

    /// Reads the movement parameters from the shared tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.field.life_line_z, tuning.field.waypoint_epsilon)
    }
}

/// Pure system that reacts to elapsed time and emits movement commands.
#[derive(Debug)]
pub struct Movement {
    life_line_z: f32,
    waypoint_epsilon: f32,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            life_line_z: config.life_line_z,
            waypoint_epsilon: config.waypoint_epsilon,
        }
    }

    /// Consumes world events and the enemy view to emit movement commands.
    pub fn handle(&self, events: &[Event], enemy_view: &EnemyView, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        let mut advanced = false;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
                advanced = true;
            }
        }

        if !advanced {
            return;
        }

        let dt = elapsed.as_secs_f32();
        for enemy in enemy_view.iter().filter(|enemy| enemy.health > 0) {
            out.push(self.step(enemy, dt));
        }
    }

    fn step(&self, enemy: &EnemySnapshot, dt: f32) -> Command {
        if enemy.position.z() > self.life_line_z || enemy.path_index >= enemy.path.last_index() {
            return Command::LeakEnemy { enemy: enemy.id };
        }

        let Some(waypoint) = enemy.path.get(enemy.path_index + 1) else {
            return Command::LeakEnemy { enemy: enemy.id };
        };

        if enemy.position.distance(waypoint) < self.waypoint_epsilon {
            return Command::MoveEnemy {
                enemy: enemy.id,
                position: waypoint,
                path_index: enemy.path_index + 1,
            };
        }

        Command::MoveEnemy {
            enemy: enemy.id,
            position: enemy.position.step_toward(waypoint, enemy.speed * dt),
            path_index: enemy.path_index,
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::from_tuning(&Tuning::default()))
    }
}
