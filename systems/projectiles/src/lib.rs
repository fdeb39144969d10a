#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic projectile resolution.
//!
//! Bullets travel in a straight line and strike the first living enemy whose
//! hit radius contains either end of the frame's motion. Shells ignore
//! everything on the way and detonate once they are close enough to the
//! point they were aimed at, damaging every enemy inside the blast with a
//! distance falloff. The system only proposes outcomes; the world applies the
//! damage and pays for kills.

use std::time::Duration;

use lifeline_defence_core::{
    tuning::{FieldTuning, ProjectileTuning},
    Command, EnemyId, EnemyView, Event, Heading, ObstacleSnapshot, ProjectileSnapshot,
    ProjectileMotion, ProjectileView, SplashHit, Tuning, WorldPoint,
};

/// Configuration parameters required to construct the projectile system.
#[derive(Clone, Debug)]
pub struct Config {
    field: FieldTuning,
    projectiles: ProjectileTuning,
}

impl Config {
    /// Creates a new configuration from the playfield and projectile tuning.
    #[must_use]
    pub fn new(field: FieldTuning, projectiles: ProjectileTuning) -> Self {
        Self { field, projectiles }
    }

    /// Reads the projectile parameters from the shared tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.field.clone(), tuning.projectiles.clone())
    }
}

/// Projectile system that advances projectiles and resolves their hits.
#[derive(Debug)]
pub struct Projectiles {
    field: FieldTuning,
    tuning: ProjectileTuning,
    enemy_workspace: Vec<EnemyTarget>,
}

impl Projectiles {
    /// Creates a new projectile system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            field: config.field,
            tuning: config.projectiles,
            enemy_workspace: Vec::new(),
        }
    }

    /// Consumes world events and views to emit projectile commands.
    ///
    /// Projectiles are resolved in launch order. Damage proposed for earlier
    /// projectiles is tracked so later ones do not strike an enemy that is
    /// already dead within the same frame.
    pub fn handle(
        &mut self,
        events: &[Event],
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        obstacles: &[ObstacleSnapshot],
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        let mut advanced = false;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
                advanced = true;
            }
        }

        if !advanced || projectiles.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        let dt = elapsed.as_secs_f32();
        for projectile in projectiles.iter() {
            let command = match projectile.motion {
                ProjectileMotion::DirectFire { direction } => {
                    self.advance_bullet(projectile, direction, dt, obstacles)
                }
                ProjectileMotion::AreaFire {
                    target,
                    splash_radius,
                } => self.advance_shell(projectile, target, splash_radius, dt),
            };
            out.push(command);
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for enemy in enemies.iter().filter(|enemy| enemy.health > 0) {
            self.enemy_workspace.push(EnemyTarget {
                id: enemy.id,
                position: enemy.position,
                hit_radius: enemy.kind.hit_radius(),
                remaining: enemy.health,
            });
        }
    }

    fn advance_bullet(
        &mut self,
        bullet: &ProjectileSnapshot,
        direction: Heading,
        dt: f32,
        obstacles: &[ObstacleSnapshot],
    ) -> Command {
        let next = bullet.position.offset(direction, bullet.speed * dt);
        if !self.field.contains(next) {
            return Command::DiscardProjectile {
                projectile: bullet.id,
            };
        }

        let absorbed = obstacles
            .iter()
            .any(|obstacle| obstacle.position.distance(next) < self.tuning.obstacle_radius);
        if absorbed {
            return Command::DiscardProjectile {
                projectile: bullet.id,
            };
        }

        let struck = self.enemy_workspace.iter_mut().find(|enemy| {
            enemy.remaining > 0
                && (enemy.position.distance(bullet.position) < enemy.hit_radius
                    || enemy.position.distance(next) < enemy.hit_radius)
        });

        match struck {
            Some(enemy) => {
                enemy.remaining = enemy.remaining.saturating_sub(bullet.damage);
                Command::StrikeEnemy {
                    projectile: bullet.id,
                    enemy: enemy.id,
                    damage: bullet.damage,
                    impact: enemy
                        .position
                        .offset(direction, -self.tuning.impact_offset),
                }
            }
            None => Command::MoveProjectile {
                projectile: bullet.id,
                position: next,
            },
        }
    }

    fn advance_shell(
        &mut self,
        shell: &ProjectileSnapshot,
        target: WorldPoint,
        splash_radius: f32,
        dt: f32,
    ) -> Command {
        let next = shell.position.step_toward(target, shell.speed * dt);
        if !self.field.contains(next) {
            return Command::DiscardProjectile {
                projectile: shell.id,
            };
        }

        if next.distance(target) > self.tuning.shell_arrival {
            return Command::MoveProjectile {
                projectile: shell.id,
                position: next,
            };
        }

        let mut hits = Vec::new();
        for enemy in self
            .enemy_workspace
            .iter_mut()
            .filter(|enemy| enemy.remaining > 0)
        {
            let distance = enemy.position.distance(target);
            if distance > splash_radius {
                continue;
            }

            let scaled = shell.damage as f32 * self.tuning.falloff(distance, splash_radius);
            let damage = scaled.floor() as u32;
            enemy.remaining = enemy.remaining.saturating_sub(damage);
            hits.push(SplashHit {
                enemy: enemy.id,
                damage,
            });
        }

        Command::DetonateShell {
            projectile: shell.id,
            hits,
        }
    }
}

impl Default for Projectiles {
    fn default() -> Self {
        Self::new(Config::from_tuning(&Tuning::default()))
    }
}

#[derive(Clone, Copy, Debug)]
struct EnemyTarget {
    id: EnemyId,
    position: WorldPoint,
    hit_radius: f32,
    remaining: u32,
}
