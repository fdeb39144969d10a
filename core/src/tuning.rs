//! Tunable constants that shape economy, pacing and combat.
//!
//! Every knob carries the default used by the shipped game. The tree derives
//! [`serde::Deserialize`] with container defaults so that adapters can load a
//! partial configuration file and override individual values.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{EnemyKind, GridLayout, WeaponKind, WorldPoint, MAX_TOWER_LEVEL};

/// Root of the tuning tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Starting resources and prices.
    pub economy: EconomyTuning,
    /// Tower grid geometry.
    pub grid: GridLayout,
    /// Playfield limits.
    pub field: FieldTuning,
    /// Wave pacing.
    pub waves: WaveTuning,
    /// Enemy roster per wave.
    pub spawning: SpawnTuning,
    /// Enemy stat scaling.
    pub enemies: EnemyTuning,
    /// Tower stats and merge multipliers.
    pub towers: TowerTuning,
    /// Projectile kinematics and damage shaping.
    pub projectiles: ProjectileTuning,
}

/// Starting resources and prices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Coins available when a session starts.
    pub starting_coins: u32,
    /// Health available when a session starts.
    pub starting_health: u32,
    /// Price of a single obstacle.
    pub obstacle_cost: u32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            starting_coins: 75,
            starting_health: 20,
            obstacle_cost: 10,
        }
    }
}

/// Playfield limits used by movement and projectile culling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    /// Depth past which an enemy counts as leaked.
    pub life_line_z: f32,
    /// Distance under which an enemy snaps onto its next waypoint.
    pub waypoint_epsilon: f32,
    /// Smallest lateral coordinate a projectile may occupy.
    pub min_x: f32,
    /// Largest lateral coordinate a projectile may occupy.
    pub max_x: f32,
    /// Smallest depth coordinate a projectile may occupy.
    pub min_z: f32,
    /// Largest depth coordinate a projectile may occupy.
    pub max_z: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            life_line_z: 8.0,
            waypoint_epsilon: 0.1,
            min_x: -15.0,
            max_x: 15.0,
            min_z: -10.0,
            max_z: 10.0,
        }
    }
}

impl FieldTuning {
    /// Reports whether a projectile at `point` is still inside the playfield.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        (self.min_x..=self.max_x).contains(&point.x())
            && (self.min_z..=self.max_z).contains(&point.z())
    }
}

/// Wave pacing knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Quota of the first wave.
    pub initial_quota: u32,
    /// Constant term of the quota formula.
    pub quota_base: f32,
    /// Quota added per cleared wave.
    pub quota_growth: f32,
    /// Spawn interval of wave zero in milliseconds.
    pub spawn_interval_ms: u64,
    /// Milliseconds removed from the spawn interval per wave.
    pub spawn_interval_step_ms: u64,
    /// Lower bound of the spawn interval in milliseconds.
    pub min_spawn_interval_ms: u64,
    /// Constant part of the completion bonus.
    pub bonus_base: u32,
    /// Bonus added per wave number.
    pub bonus_per_wave: u32,
    /// Pause between a cleared wave and the next one in milliseconds.
    pub completion_delay_ms: u64,
    /// The last spawn of every wave divisible by this becomes a boss.
    pub boss_every: u32,
    /// The last spawn of every wave divisible by this becomes a mega boss.
    pub mega_boss_every: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            initial_quota: 5,
            quota_base: 5.0,
            quota_growth: 1.5,
            spawn_interval_ms: 1_500,
            spawn_interval_step_ms: 50,
            min_spawn_interval_ms: 500,
            bonus_base: 2,
            bonus_per_wave: 1,
            completion_delay_ms: 3_000,
            boss_every: 5,
            mega_boss_every: 10,
        }
    }
}

impl WaveTuning {
    /// Quota of the wave that follows `wave`.
    #[must_use]
    pub fn quota_after(&self, wave: u32) -> u32 {
        (self.quota_base + wave as f32 * self.quota_growth)
            .floor()
            .max(1.0) as u32
    }

    /// Time between consecutive spawns during `wave`.
    #[must_use]
    pub fn spawn_interval(&self, wave: u32) -> Duration {
        let reduction = self
            .spawn_interval_step_ms
            .saturating_mul(u64::from(wave));
        let millis = self
            .spawn_interval_ms
            .saturating_sub(reduction)
            .max(self.min_spawn_interval_ms)
            .max(1);
        Duration::from_millis(millis)
    }

    /// Coins granted for clearing `wave`.
    #[must_use]
    pub fn completion_bonus(&self, wave: u32) -> u32 {
        self.bonus_base
            .saturating_add(self.bonus_per_wave.saturating_mul(wave))
    }

    /// Pause between a cleared wave and the next one.
    #[must_use]
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// Kind forced onto the final spawn of `wave`, if the wave is a milestone.
    #[must_use]
    pub fn milestone_kind(&self, wave: u32) -> Option<EnemyKind> {
        if self.mega_boss_every > 0 && wave % self.mega_boss_every == 0 {
            Some(EnemyKind::MegaBoss)
        } else if self.boss_every > 0 && wave % self.boss_every == 0 {
            Some(EnemyKind::Boss)
        } else {
            None
        }
    }
}

/// Enemy kind that joins the roster from a given wave onward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KindUnlock {
    /// Kind being unlocked.
    pub kind: EnemyKind,
    /// First wave in which the kind may spawn.
    pub from_wave: u32,
}

/// Relative draw weight of a single kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KindWeight {
    /// Kind being weighted.
    pub kind: EnemyKind,
    /// Relative weight; zero disables the kind.
    pub weight: u32,
}

/// Weights applied to every wave up to and including `through_wave`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    /// Last wave the table applies to.
    pub through_wave: u32,
    /// Weights of the kinds in the table.
    pub weights: Vec<KindWeight>,
}

impl WeightTable {
    /// Weight of `kind`, zero when the table does not list it.
    #[must_use]
    pub fn weight_of(&self, kind: EnemyKind) -> u32 {
        self.weights
            .iter()
            .find(|entry| entry.kind == kind)
            .map_or(0, |entry| entry.weight)
    }
}

/// Enemy roster per wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Unlock schedule, in draw order.
    pub unlocks: Vec<KindUnlock>,
    /// Weight tables sorted by `through_wave`; the last one covers later waves.
    pub weight_tables: Vec<WeightTable>,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        let unlock = |kind, from_wave| KindUnlock { kind, from_wave };
        let weight = |kind, weight| KindWeight { kind, weight };
        Self {
            unlocks: vec![
                unlock(EnemyKind::Basic, 1),
                unlock(EnemyKind::Fast, 2),
                unlock(EnemyKind::Heavy, 3),
                unlock(EnemyKind::Armored, 5),
                unlock(EnemyKind::Elite, 8),
            ],
            weight_tables: vec![
                WeightTable {
                    through_wave: 3,
                    weights: vec![
                        weight(EnemyKind::Basic, 70),
                        weight(EnemyKind::Fast, 25),
                        weight(EnemyKind::Heavy, 5),
                    ],
                },
                WeightTable {
                    through_wave: 7,
                    weights: vec![
                        weight(EnemyKind::Basic, 40),
                        weight(EnemyKind::Fast, 30),
                        weight(EnemyKind::Heavy, 20),
                        weight(EnemyKind::Armored, 10),
                    ],
                },
                WeightTable {
                    through_wave: u32::MAX,
                    weights: vec![
                        weight(EnemyKind::Basic, 20),
                        weight(EnemyKind::Fast, 25),
                        weight(EnemyKind::Heavy, 25),
                        weight(EnemyKind::Armored, 20),
                        weight(EnemyKind::Elite, 10),
                    ],
                },
            ],
        }
    }
}

impl SpawnTuning {
    /// Kinds allowed to spawn during `wave`, in draw order.
    #[must_use]
    pub fn unlocked(&self, wave: u32) -> Vec<EnemyKind> {
        self.unlocks
            .iter()
            .filter(|unlock| unlock.from_wave <= wave)
            .map(|unlock| unlock.kind)
            .collect()
    }

    /// Weight table that applies to `wave`.
    #[must_use]
    pub fn table_for(&self, wave: u32) -> Option<&WeightTable> {
        self.weight_tables
            .iter()
            .find(|table| wave <= table.through_wave)
            .or_else(|| self.weight_tables.last())
    }
}

/// Enemy stat scaling across waves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Health growth rate at wave one.
    pub health_rate_base: f32,
    /// Health growth rate added per wave.
    pub health_rate_step: f32,
    /// Upper bound of the health growth rate.
    pub health_rate_cap: f32,
    /// Speed bonus added per wave.
    pub speed_step: f32,
    /// Upper bound of the speed bonus.
    pub speed_cap: f32,
    /// Maximum lateral offset applied to a path's final waypoint.
    pub endpoint_jitter: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            health_rate_base: 0.05,
            health_rate_step: 0.01,
            health_rate_cap: 0.15,
            speed_step: 0.005,
            speed_cap: 0.05,
            endpoint_jitter: 0.5,
        }
    }
}

impl EnemyTuning {
    /// Multiplier applied to base health during `wave`.
    #[must_use]
    pub fn health_multiplier(&self, wave: u32) -> f32 {
        let waves_survived = wave.saturating_sub(1) as f32;
        let rate = (self.health_rate_base + waves_survived * self.health_rate_step)
            .min(self.health_rate_cap);
        1.0 + waves_survived * rate
    }

    /// Multiplier applied to base speed during `wave`.
    #[must_use]
    pub fn speed_multiplier(&self, wave: u32) -> f32 {
        let waves_survived = wave.saturating_sub(1) as f32;
        1.0 + (waves_survived * self.speed_step).min(self.speed_cap)
    }
}

/// Level one stats of a weapon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Purchase price.
    pub cost: u32,
    /// Damage per projectile.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Milliseconds between shots.
    pub fire_interval_ms: u64,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self::turret()
    }
}

impl WeaponStats {
    /// Stats of a freshly bought turret.
    #[must_use]
    pub const fn turret() -> Self {
        Self {
            cost: 15,
            damage: 15,
            range: 6.0,
            fire_interval_ms: 500,
        }
    }

    /// Stats of a freshly bought mortar.
    #[must_use]
    pub const fn mortar() -> Self {
        Self {
            cost: 25,
            damage: 55,
            range: 7.0,
            fire_interval_ms: 1_400,
        }
    }

    /// Minimum time between shots.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }
}

/// Tower stats and merge multipliers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerTuning {
    /// Stats of a freshly bought turret.
    #[serde(deserialize_with = "turret_overrides")]
    pub turret: WeaponStats,
    /// Stats of a freshly bought mortar.
    #[serde(deserialize_with = "mortar_overrides")]
    pub mortar: WeaponStats,
    /// Damage multiplier applied by a merge.
    pub merge_damage: f32,
    /// Range multiplier applied by a merge.
    pub merge_range: f32,
    /// Fire interval multiplier applied by a merge.
    pub merge_interval: f32,
    /// Merges never push the fire interval below this many milliseconds.
    pub min_fire_interval_ms: u64,
    /// Highest reachable level.
    pub max_level: u8,
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            turret: WeaponStats::turret(),
            mortar: WeaponStats::mortar(),
            merge_damage: 2.2,
            merge_range: 1.15,
            merge_interval: 0.85,
            min_fire_interval_ms: 150,
            max_level: MAX_TOWER_LEVEL,
        }
    }
}

/// Weapon fields present in a configuration file; absent ones keep the
/// weapon's own defaults.
#[derive(Deserialize)]
struct WeaponOverrides {
    cost: Option<u32>,
    damage: Option<u32>,
    range: Option<f32>,
    fire_interval_ms: Option<u64>,
}

impl WeaponOverrides {
    fn apply(self, base: WeaponStats) -> WeaponStats {
        WeaponStats {
            cost: self.cost.unwrap_or(base.cost),
            damage: self.damage.unwrap_or(base.damage),
            range: self.range.unwrap_or(base.range),
            fire_interval_ms: self.fire_interval_ms.unwrap_or(base.fire_interval_ms),
        }
    }
}

fn turret_overrides<'de, D>(deserializer: D) -> Result<WeaponStats, D::Error>
where
    D: Deserializer<'de>,
{
    WeaponOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply(WeaponStats::turret()))
}

fn mortar_overrides<'de, D>(deserializer: D) -> Result<WeaponStats, D::Error>
where
    D: Deserializer<'de>,
{
    WeaponOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply(WeaponStats::mortar()))
}

impl TowerTuning {
    /// Highest reachable level, never above [`MAX_TOWER_LEVEL`] nor below one.
    #[must_use]
    pub fn level_cap(&self) -> u8 {
        self.max_level.clamp(1, MAX_TOWER_LEVEL)
    }

    /// Level one stats of the provided weapon.
    #[must_use]
    pub fn stats(&self, kind: WeaponKind) -> &WeaponStats {
        match kind {
            WeaponKind::Turret => &self.turret,
            WeaponKind::Mortar => &self.mortar,
        }
    }
}

/// Projectile kinematics and damage shaping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Travel speed of turret bullets.
    pub turret_speed: f32,
    /// Travel speed of mortar shells.
    pub mortar_speed: f32,
    /// Splash radius of a level zero shell.
    pub splash_base: f32,
    /// Splash radius added per tower level.
    pub splash_per_level: f32,
    /// Lowest fraction of damage dealt at the edge of a blast.
    pub falloff_floor: f32,
    /// Distance from its target at which a shell detonates.
    pub shell_arrival: f32,
    /// Radius within which obstacles absorb bullets.
    pub obstacle_radius: f32,
    /// Distance the impact effect is pulled back from the enemy centre.
    pub impact_offset: f32,
    /// Cosmetic height of impact effects.
    pub impact_height: f32,
    /// Gap between the tower top and the muzzle.
    pub muzzle_clearance: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            turret_speed: 12.0,
            mortar_speed: 4.0,
            splash_base: 1.2,
            splash_per_level: 0.4,
            falloff_floor: 0.3,
            shell_arrival: 0.5,
            obstacle_radius: 0.8,
            impact_offset: 0.3,
            impact_height: 0.5,
            muzzle_clearance: 0.05,
        }
    }
}

impl ProjectileTuning {
    /// Travel speed of projectiles fired by the provided weapon.
    #[must_use]
    pub fn speed(&self, kind: WeaponKind) -> f32 {
        match kind {
            WeaponKind::Turret => self.turret_speed,
            WeaponKind::Mortar => self.mortar_speed,
        }
    }

    /// Blast radius of shells fired by a mortar of the provided level.
    #[must_use]
    pub fn splash_radius(&self, level: u8) -> f32 {
        self.splash_base + f32::from(level) * self.splash_per_level
    }

    /// Fraction of full damage dealt at `distance` from a blast of `radius`.
    ///
    /// The fraction never increases with distance and never drops below the
    /// configured floor.
    #[must_use]
    pub fn falloff(&self, distance: f32, radius: f32) -> f32 {
        if radius <= 0.0 {
            return 1.0;
        }

        (1.0 - distance / radius).max(self.falloff_floor)
    }
}
