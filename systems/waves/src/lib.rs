#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave lifecycle system.
//!
//! Observes the wave counters and proposes the two lifecycle transitions:
//! completing a cleared wave and starting the next one after the pause. The
//! world guards both transitions, so repeating a proposal is harmless.

use std::time::Duration;

use lifeline_defence_core::{Command, Tuning, WavePhase, WaveSnapshot};

/// Configuration parameters required to construct the wave system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    completion_delay: Duration,
}

impl Config {
    /// Creates a new configuration with the provided inter-wave pause.
    #[must_use]
    pub const fn new(completion_delay: Duration) -> Self {
        Self { completion_delay }
    }

    /// Reads the wave parameters from the shared tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.waves.completion_delay())
    }
}

/// Pure system that drives the wave lifecycle.
#[derive(Debug)]
pub struct Waves {
    completion_delay: Duration,
}

impl Waves {
    /// Creates a new wave system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            completion_delay: config.completion_delay,
        }
    }

    /// Emits the lifecycle command appropriate for the current wave state.
    pub fn handle(
        &self,
        now: Duration,
        wave: &WaveSnapshot,
        living_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        match wave.phase(living_enemies) {
            WavePhase::Spawning | WavePhase::Clearing => {}
            WavePhase::Completed => out.push(Command::CompleteWave),
            WavePhase::Pausing => {
                let paused = wave
                    .completed_at
                    .map_or(Duration::ZERO, |completed_at| now.saturating_sub(completed_at));
                if paused >= self.completion_delay {
                    out.push(Command::StartNextWave);
                }
            }
        }
    }
}

impl Default for Waves {
    fn default() -> Self {
        Self::new(Config::from_tuning(&Tuning::default()))
    }
}
