#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use std::time::Duration;

use lifeline_defence_core::{
    tuning::ProjectileTuning, Command, Heading, ProjectileLaunch, ProjectileMotion, Tint,
    TowerSnapshot, TowerTarget, TowerView, Tuning, WeaponKind,
};

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Debug)]
pub struct Config {
    projectiles: ProjectileTuning,
}

impl Config {
    /// Creates a new configuration from the projectile tuning.
    #[must_use]
    pub fn new(projectiles: ProjectileTuning) -> Self {
        Self { projectiles }
    }

    /// Reads the combat parameters from the shared tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.projectiles.clone())
    }
}

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug)]
pub struct TowerCombat {
    projectiles: ProjectileTuning,
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            projectiles: config.projectiles,
            scratch: Vec::new(),
        }
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire at `now`.
    pub fn handle(
        &mut self,
        now: Duration,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            let Some(tower) = towers.get(target.tower) else {
                continue;
            };

            if !tower.is_ready(now) {
                continue;
            }

            self.scratch.push(Command::FireProjectile {
                tower: tower.id,
                launch: self.launch(tower, target),
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn launch(&self, tower: &TowerSnapshot, target: &TowerTarget) -> ProjectileLaunch {
        let aim = target
            .tower_position
            .heading_to(target.enemy_position)
            .unwrap_or(Heading::FORWARD);
        let motion = match tower.kind {
            WeaponKind::Turret => ProjectileMotion::DirectFire { direction: aim },
            WeaponKind::Mortar => ProjectileMotion::AreaFire {
                target: target.enemy_position,
                splash_radius: self.projectiles.splash_radius(tower.level),
            },
        };

        ProjectileLaunch {
            origin: target
                .tower_position
                .offset(aim, tower.kind.barrel_length(tower.level)),
            height: tower.kind.muzzle_height(tower.level) + self.projectiles.muzzle_clearance,
            motion,
            speed: self.projectiles.speed(tower.kind),
            damage: tower.damage,
            tint: Tint::for_level(tower.level),
        }
    }
}

impl Default for TowerCombat {
    fn default() -> Self {
        Self::new(Config::from_tuning(&Tuning::default()))
    }
}
