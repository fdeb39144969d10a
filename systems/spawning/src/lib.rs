#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.
//!
//! Spawns are paced by the time elapsed since the wave started rather than by
//! an accumulator, so a long frame never produces more than one enemy and a
//! wave never spawns more than its quota.

pub mod factory;
pub mod paths;

use std::time::Duration;

use lifeline_defence_core::{
    tuning::{EnemyTuning, SpawnTuning, WaveTuning, WeightTable},
    Command, EnemyKind, Tuning, WaveSnapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    waves: WaveTuning,
    roster: SpawnTuning,
    scaling: EnemyTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from the shared tuning and an RNG seed.
    #[must_use]
    pub fn new(tuning: &Tuning, rng_seed: u64) -> Self {
        Self {
            waves: tuning.waves.clone(),
            roster: tuning.spawning.clone(),
            scaling: tuning.enemies.clone(),
            rng_seed,
        }
    }
}

/// Pure system that emits at most one spawn command per tick.
#[derive(Debug)]
pub struct Spawning {
    waves: WaveTuning,
    roster: SpawnTuning,
    scaling: EnemyTuning,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            waves: config.waves,
            roster: config.roster,
            scaling: config.scaling,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits a spawn command when the wave schedule is behind the clock.
    pub fn handle(&mut self, now: Duration, wave: &WaveSnapshot, out: &mut Vec<Command>) {
        if wave.quota_met() {
            return;
        }

        let elapsed = now.saturating_sub(wave.started_at);
        let interval = self.waves.spawn_interval(wave.wave);
        let expected = elapsed.as_millis() / interval.as_millis().max(1);
        if expected <= u128::from(wave.enemies_spawned) {
            return;
        }

        let unlocked = self.roster.unlocked(wave.wave);
        let mut kind = draw_kind(&mut self.rng, &unlocked, self.roster.table_for(wave.wave));
        if wave.enemies_spawned + 1 == wave.enemies_in_wave {
            if let Some(milestone) = self.waves.milestone_kind(wave.wave) {
                kind = milestone;
            }
        }

        let path = paths::pick_path(&mut self.rng, self.scaling.endpoint_jitter);
        out.push(Command::SpawnEnemy {
            enemy: factory::create_enemy(kind, wave.wave, path, &self.scaling),
        });
    }
}

/// Draws an enemy kind from `unlocked` using the weights of `table`.
///
/// Kinds missing from the table weigh nothing. When every weight is zero the
/// first unlocked kind is returned.
pub fn draw_kind<R: Rng + ?Sized>(
    rng: &mut R,
    unlocked: &[EnemyKind],
    table: Option<&WeightTable>,
) -> EnemyKind {
    let fallback = unlocked.first().copied().unwrap_or(EnemyKind::Basic);
    let weights: Vec<(EnemyKind, u32)> = unlocked
        .iter()
        .map(|kind| (*kind, table.map_or(0, |table| table.weight_of(*kind))))
        .collect();
    let total: u64 = weights.iter().map(|(_, weight)| u64::from(*weight)).sum();
    if total == 0 {
        return fallback;
    }

    let mut roll = rng.gen::<f64>() * total as f64;
    for (kind, weight) in &weights {
        if *weight == 0 {
            continue;
        }

        roll -= f64::from(*weight);
        if roll <= 0.0 {
            return *kind;
        }
    }

    weights
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0)
        .map_or(fallback, |(kind, _)| *kind)
}
