#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lifeline Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume immutable views of the
//! world and respond exclusively with new command batches.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

pub mod tuning;

pub use tuning::Tuning;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lifeline Defence.";

/// Highest level a tower may reach through merging.
pub const MAX_TOWER_LEVEL: u8 = 5;

/// Describes the lifecycle phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session is running; the player sits in the main menu.
    Menu,
    /// A session is running and ticks advance the simulation.
    Playing,
    /// The player ran out of health; the simulation is frozen.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh session, discarding any previous progress.
    StartGame,
    /// Restarts the current session from scratch.
    RestartGame,
    /// Ends the running session immediately.
    EndGame,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Marks a grid cell as the player's current selection.
    SelectCell {
        /// Cell chosen by the player.
        cell: CellCoord,
    },
    /// Chooses the weapon kind used by subsequent purchases.
    SelectWeapon {
        /// Weapon kind to purchase next.
        kind: WeaponKind,
    },
    /// Requests purchase of a level one tower on the provided cell.
    PlaceTower {
        /// Weapon carried by the new tower.
        kind: WeaponKind,
        /// Grid cell the tower should occupy.
        cell: CellCoord,
    },
    /// Requests that two adjacent towers merge into one stronger tower.
    MergeTowers {
        /// Tower consumed by the merge.
        source: TowerId,
        /// Tower whose cell hosts the merged result.
        target: TowerId,
    },
    /// Requests purchase of an obstacle in one of the fixed obstacle slots.
    PlaceObstacle {
        /// Slot receiving the obstacle.
        slot: ObstacleSlot,
        /// Appearance of the obstacle.
        kind: ObstacleKind,
    },
    /// Requests removal of an existing obstacle.
    RemoveObstacle {
        /// Identifier of the obstacle to remove.
        obstacle: ObstacleId,
    },
    /// Removes a cosmetic effect once its animation finished.
    DismissEffect {
        /// Identifier of the impact or explosion to discard.
        effect: EffectId,
    },
    /// Records the facing a presentation layer currently renders for a tower.
    SetTowerFacing {
        /// Tower being rotated.
        tower: TowerId,
        /// Current facing angle in radians.
        facing: f32,
    },
    /// Inserts a freshly created enemy at the start of its path.
    SpawnEnemy {
        /// Fully initialised enemy description.
        enemy: EnemyBlueprint,
    },
    /// Moves an enemy along its path.
    MoveEnemy {
        /// Enemy being moved.
        enemy: EnemyId,
        /// Position after the move.
        position: WorldPoint,
        /// Path cursor after the move.
        path_index: usize,
    },
    /// Removes an enemy that crossed the life line and charges the player.
    LeakEnemy {
        /// Enemy that leaked.
        enemy: EnemyId,
    },
    /// Launches a projectile from a tower.
    FireProjectile {
        /// Tower that fired.
        tower: TowerId,
        /// Kinematics and payload of the new projectile.
        launch: ProjectileLaunch,
    },
    /// Moves an in-flight projectile.
    MoveProjectile {
        /// Projectile being moved.
        projectile: ProjectileId,
        /// Position after the move.
        position: WorldPoint,
    },
    /// Removes a projectile without applying any damage.
    DiscardProjectile {
        /// Projectile to remove.
        projectile: ProjectileId,
    },
    /// Resolves a direct-fire projectile against a single enemy.
    StrikeEnemy {
        /// Projectile that connected.
        projectile: ProjectileId,
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage dealt to the enemy.
        damage: u32,
        /// Contact point used for the impact effect.
        impact: WorldPoint,
    },
    /// Detonates an area projectile at its precomputed target point.
    DetonateShell {
        /// Shell that arrived.
        projectile: ProjectileId,
        /// Damage dealt to each enemy caught in the blast.
        hits: Vec<SplashHit>,
    },
    /// Marks the current wave as cleared and grants the completion bonus.
    CompleteWave,
    /// Starts the next wave once the inter-wave pause elapsed.
    StartNextWave,
    /// Removes every enemy whose health reached zero.
    RemoveDeadEnemies,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new phase.
    GamePhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Confirms that the player's selection changed.
    CellSelected {
        /// Cell that is now selected.
        cell: CellCoord,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
    },
    /// Reports that an enemy crossed the life line.
    EnemyLeaked {
        /// Enemy that leaked.
        enemy: EnemyId,
        /// Player health remaining after the leak.
        health: u32,
    },
    /// Reports that an enemy took damage.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage applied by the hit.
        damage: u32,
        /// Health remaining after the hit.
        remaining: u32,
    },
    /// Reports that a hit reduced an enemy to zero health.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Coins awarded for the kill.
        reward: u32,
    },
    /// Confirms that a dead enemy was removed from the field.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired it.
        tower: TowerId,
    },
    /// Reports that a projectile left play without resolving.
    ProjectileExpired {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
    /// Announces a new impact effect for presentation.
    ImpactSpawned {
        /// Identifier of the effect.
        effect: EffectId,
        /// Location of the impact.
        position: WorldPoint,
    },
    /// Announces a new explosion effect for presentation.
    ExplosionSpawned {
        /// Identifier of the effect.
        effect: EffectId,
        /// Centre of the explosion.
        position: WorldPoint,
        /// Radius of the blast.
        radius: f32,
    },
    /// Reports that the current wave was cleared.
    WaveCompleted {
        /// Wave number that was cleared.
        wave: u32,
        /// Coins granted as completion bonus.
        bonus: u32,
    },
    /// Reports that a new wave started.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
        /// Enemies scheduled for the wave.
        quota: u32,
    },
    /// Confirms that a tower was purchased.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Weapon carried by the tower.
        kind: WeaponKind,
        /// Cell the tower occupies.
        cell: CellCoord,
    },
    /// Reports that a tower purchase was rejected.
    TowerPlacementRejected {
        /// Weapon requested for placement.
        kind: WeaponKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that two towers merged.
    TowersMerged {
        /// Tower consumed by the merge.
        source: TowerId,
        /// Tower whose cell hosts the result.
        target: TowerId,
        /// Identifier assigned to the merged tower.
        merged: TowerId,
        /// Level of the merged tower.
        level: u8,
    },
    /// Reports that a merge request was rejected.
    TowerMergeRejected {
        /// Tower named as merge source.
        source: TowerId,
        /// Tower named as merge target.
        target: TowerId,
        /// Specific reason the merge failed.
        reason: MergeError,
    },
    /// Confirms that an obstacle was purchased.
    ObstaclePlaced {
        /// Identifier assigned to the obstacle.
        obstacle: ObstacleId,
        /// Slot the obstacle occupies.
        slot: ObstacleSlot,
    },
    /// Reports that an obstacle purchase was rejected.
    ObstaclePlacementRejected {
        /// Slot provided in the request.
        slot: ObstacleSlot,
        /// Specific reason the placement failed.
        reason: ObstacleError,
    },
    /// Confirms that an obstacle was removed.
    ObstacleRemoved {
        /// Identifier of the removed obstacle.
        obstacle: ObstacleId,
    },
}

/// RGB colour attached to projectiles and explosions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Colour used for projectiles fired by a tower of the provided level.
    #[must_use]
    pub const fn for_level(level: u8) -> Self {
        match level {
            0 | 1 => Self::from_rgb(0x22, 0xc5, 0x5e),
            2 => Self::from_rgb(0x3b, 0x82, 0xf6),
            3 => Self::from_rgb(0xa8, 0x55, 0xf7),
            4 => Self::from_rgb(0xef, 0x44, 0x44),
            _ => Self::from_rgb(0xf5, 0x9e, 0x0b),
        }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier shared by impact and explosion effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(u32);

impl EffectId {
    /// Creates a new effect identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tower grid cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether two cells share an edge (diagonals excluded).
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Continuous position on the ground plane.
///
/// The `z` axis points from the spawn tunnels toward the life line, so enemies
/// advance toward increasing `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    z: f32,
}

impl WorldPoint {
    /// Creates a new world-plane position.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Lateral coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Depth coordinate; grows toward the life line.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Planar Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit heading pointing from `self` toward `other`.
    ///
    /// Returns `None` when the points coincide, so callers never divide by a
    /// vanishing length.
    #[must_use]
    pub fn heading_to(self, other: WorldPoint) -> Option<Heading> {
        Heading::from_components(other.x - self.x, other.z - self.z)
    }

    /// Point reached by travelling `distance` units along `heading`.
    #[must_use]
    pub fn offset(self, heading: Heading, distance: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + heading.x() * distance,
            self.z + heading.z() * distance,
        )
    }

    /// Moves toward `destination` by at most `step` units without overshooting.
    #[must_use]
    pub fn step_toward(self, destination: WorldPoint, step: f32) -> WorldPoint {
        let remaining = self.distance(destination);
        if step >= remaining {
            return destination;
        }

        match self.heading_to(destination) {
            Some(heading) => self.offset(heading, step),
            None => destination,
        }
    }
}

/// Normalised direction on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    x: f32,
    z: f32,
}

impl Heading {
    /// Heading pointing straight at the life line.
    pub const FORWARD: Heading = Heading { x: 0.0, z: 1.0 };

    const MIN_LENGTH: f32 = 1e-6;

    /// Normalises the provided components, rejecting near-zero vectors.
    #[must_use]
    pub fn from_components(x: f32, z: f32) -> Option<Self> {
        let length = (x * x + z * z).sqrt();
        if !length.is_finite() || length < Self::MIN_LENGTH {
            return None;
        }

        Some(Self {
            x: x / length,
            z: z / length,
        })
    }

    /// Lateral component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Depth component.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Yaw angle in radians, measured from the +z axis toward +x.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.x.atan2(self.z)
    }
}

/// Affine mapping between tower grid cells and world-plane positions.
///
/// Every conversion between the two coordinate systems goes through this type
/// so targeting and presentation agree on where a tower stands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Number of tower columns.
    pub columns: u32,
    /// Number of tower rows.
    pub rows: u32,
    /// Distance between neighbouring cell centres in world units.
    pub spacing: f32,
    /// World position of the centre of cell `(0, 0)`.
    pub origin: WorldPoint,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 5,
            rows: 3,
            spacing: 2.5,
            origin: WorldPoint::new(-5.0, 1.25),
        }
    }
}

impl GridLayout {
    /// Reports whether the cell lies within the configured grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// World-plane centre of the provided cell.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x() + cell.column() as f32 * self.spacing,
            self.origin.z() + cell.row() as f32 * self.spacing,
        )
    }

    /// Cell whose centre lies nearest to `point`, if it falls inside the grid.
    #[must_use]
    pub fn world_to_cell(&self, point: WorldPoint) -> Option<CellCoord> {
        if self.spacing <= 0.0 {
            return None;
        }

        let column = ((point.x() - self.origin.x()) / self.spacing).round();
        let row = ((point.z() - self.origin.z()) / self.spacing).round();
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }

        let cell = CellCoord::new(column as u32, row as u32);
        self.contains(cell).then_some(cell)
    }
}

/// Enemy archetypes that can appear in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Weak, common grunt.
    Basic,
    /// Fast but fragile runner.
    Fast,
    /// Slow, tanky brute.
    Heavy,
    /// Shielded enemy with a large health pool.
    Armored,
    /// Late-game elite.
    Elite,
    /// Milestone boss closing every fifth wave.
    Boss,
    /// Milestone boss closing every tenth wave.
    MegaBoss,
}

impl EnemyKind {
    /// Every enemy kind in ascending strength.
    pub const ALL: [EnemyKind; 7] = [
        Self::Basic,
        Self::Fast,
        Self::Heavy,
        Self::Armored,
        Self::Elite,
        Self::Boss,
        Self::MegaBoss,
    ];

    /// Unscaled stats looked up from the fixed archetype table.
    #[must_use]
    pub const fn base_stats(self) -> EnemyStats {
        match self {
            Self::Basic => EnemyStats::new(220, 1.2, 1),
            Self::Fast => EnemyStats::new(180, 2.0, 2),
            Self::Heavy => EnemyStats::new(400, 1.0, 2),
            Self::Armored => EnemyStats::new(580, 1.1, 3),
            Self::Elite => EnemyStats::new(850, 1.3, 4),
            Self::Boss => EnemyStats::new(1_350, 0.9, 8),
            Self::MegaBoss => EnemyStats::new(2_700, 0.8, 15),
        }
    }

    /// Collision radius used by direct-fire projectiles; bigger enemies are easier to hit.
    #[must_use]
    pub const fn hit_radius(self) -> f32 {
        match self {
            Self::Basic => 0.35,
            Self::Fast => 0.3,
            Self::Heavy => 0.45,
            Self::Armored => 0.5,
            Self::Elite => 0.55,
            Self::Boss => 0.65,
            Self::MegaBoss => 0.85,
        }
    }

    /// Stable lowercase tag used by adapters and configuration files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Fast => "fast",
            Self::Heavy => "heavy",
            Self::Armored => "armored",
            Self::Elite => "elite",
            Self::Boss => "boss",
            Self::MegaBoss => "megaboss",
        }
    }

    /// Resolves a tag, falling back to [`EnemyKind::Basic`] for unknown values.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or(Self::Basic)
    }
}

/// Unscaled enemy statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health at wave one.
    pub health: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Coins awarded for a kill.
    pub reward: u32,
}

impl EnemyStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(health: u32, speed: f32, reward: u32) -> Self {
        Self {
            health,
            speed,
            reward,
        }
    }
}

/// Weapons a tower can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Rapid direct-fire gun.
    Turret,
    /// Slow ballistic launcher dealing area damage.
    Mortar,
}

impl WeaponKind {
    /// Distance from the tower centre to the muzzle for a given level.
    #[must_use]
    pub const fn barrel_length(self, level: u8) -> f32 {
        match (self, level) {
            (Self::Turret, 2) => 0.64,
            (Self::Turret, 3) => 0.8,
            (Self::Turret, 4) => 1.0,
            (Self::Turret, 5) => 1.24,
            (Self::Turret, _) => 0.5,
            (Self::Mortar, 2) => 0.5,
            (Self::Mortar, 3) => 0.64,
            (Self::Mortar, 4) => 0.8,
            (Self::Mortar, 5) => 1.0,
            (Self::Mortar, _) => 0.36,
        }
    }

    /// Height of the tower top for a given level; projectiles leave just above it.
    #[must_use]
    pub const fn muzzle_height(self, level: u8) -> f32 {
        match (self, level) {
            (Self::Turret, 2) => 0.18,
            (Self::Turret, 3) => 0.26,
            (Self::Turret, 4) => 0.36,
            (Self::Turret, 5) => 0.48,
            (Self::Turret, _) => 0.12,
            (Self::Mortar, 2) => 0.15,
            (Self::Mortar, 3) => 0.22,
            (Self::Mortar, 4) => 0.31,
            (Self::Mortar, 5) => 0.42,
            (Self::Mortar, _) => 0.1,
        }
    }

    /// Stable lowercase tag used by adapters.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Turret => "turret",
            Self::Mortar => "mortar",
        }
    }
}

/// Cosmetic appearance of an obstacle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Boulder.
    #[default]
    Rock,
    /// Tree.
    Tree,
    /// Man-made barrier.
    Barrier,
}

const OBSTACLE_SLOT_POSITIONS: [WorldPoint; 12] = [
    WorldPoint::new(-4.0, -4.0),
    WorldPoint::new(-2.0, -4.0),
    WorldPoint::new(0.0, -4.0),
    WorldPoint::new(2.0, -4.0),
    WorldPoint::new(4.0, -4.0),
    WorldPoint::new(-3.0, -5.0),
    WorldPoint::new(-1.0, -5.0),
    WorldPoint::new(1.0, -5.0),
    WorldPoint::new(3.0, -5.0),
    WorldPoint::new(-2.0, -6.0),
    WorldPoint::new(0.0, -6.0),
    WorldPoint::new(2.0, -6.0),
];

/// One of the fixed obstacle slots laid out in front of the tower grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleSlot(u8);

impl ObstacleSlot {
    /// Number of obstacle slots on the field.
    pub const COUNT: usize = OBSTACLE_SLOT_POSITIONS.len();

    /// Creates a slot reference from its index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Index of the slot.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// World position of the slot, or `None` if the index is unknown.
    #[must_use]
    pub fn position(&self) -> Option<WorldPoint> {
        OBSTACLE_SLOT_POSITIONS.get(usize::from(self.0)).copied()
    }

    /// Iterator over every valid slot.
    pub fn all() -> impl Iterator<Item = ObstacleSlot> {
        (0..Self::COUNT as u8).map(ObstacleSlot)
    }
}

/// Immutable polyline an enemy follows from its tunnel to the life line.
///
/// Paths are shared between an enemy and every snapshot of it, so cloning
/// never copies the waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Arc<[WorldPoint]>,
}

impl Path {
    /// Wraps the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<WorldPoint>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }

    /// Ordered waypoints composing the path.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Waypoint at the provided index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<WorldPoint> {
        self.waypoints.get(index).copied()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint; reaching it means the enemy leaked.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }
}

/// Fully initialised enemy produced by the enemy factory.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBlueprint {
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Starting and maximum health.
    pub health: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Coins awarded for a kill.
    pub reward: u32,
    /// Route the enemy follows.
    pub path: Path,
}

/// Motion model of a projectile, fixed at launch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileMotion {
    /// Straight-line bullet that hits the first enemy it touches.
    DirectFire {
        /// Travel direction.
        direction: Heading,
    },
    /// Ballistic shell that detonates at a precomputed point.
    AreaFire {
        /// Point the shell flies to.
        target: WorldPoint,
        /// Radius of the blast.
        splash_radius: f32,
    },
}

/// Everything needed to create a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileLaunch {
    /// Muzzle position on the ground plane.
    pub origin: WorldPoint,
    /// Cosmetic launch height.
    pub height: f32,
    /// Motion model.
    pub motion: ProjectileMotion,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Damage carried by the projectile.
    pub damage: u32,
    /// Colour derived from the firing tower's level.
    pub tint: Tint,
}

/// Damage dealt to one enemy by a detonating shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplashHit {
    /// Enemy caught in the blast.
    pub enemy: EnemyId,
    /// Damage after distance falloff.
    pub damage: u32,
}

/// Target assignment produced by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// World position of the tower centre.
    pub tower_position: WorldPoint,
    /// World position of the enemy when it was selected.
    pub enemy_position: WorldPoint,
}

/// Cosmetic impact left by a direct-fire hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// Identifier used to dismiss the effect.
    pub id: EffectId,
    /// Contact point.
    pub position: WorldPoint,
    /// Cosmetic height.
    pub height: f32,
    /// Simulation time the effect was created.
    pub created_at: Duration,
}

/// Cosmetic explosion left by a detonating shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    /// Identifier used to dismiss the effect.
    pub id: EffectId,
    /// Blast centre.
    pub position: WorldPoint,
    /// Cosmetic height.
    pub height: f32,
    /// Blast radius.
    pub radius: f32,
    /// Colour of the shell that exploded.
    pub tint: Tint,
    /// Simulation time the effect was created.
    pub created_at: Duration,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current world position.
    pub position: WorldPoint,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Index of the last waypoint reached.
    pub path_index: usize,
    /// Coins awarded for a kill.
    pub reward: u32,
    /// Route the enemy follows.
    pub path: Path,
}

/// Read-only snapshot describing all enemies on the field.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Weapon carried by the tower.
    pub kind: WeaponKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Upgrade tier.
    pub level: u8,
    /// Damage per projectile.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between shots.
    pub fire_interval: Duration,
    /// Simulation time of the last shot, if any.
    pub last_shot: Option<Duration>,
    /// Facing rendered by the presentation layer, in radians.
    pub facing: f32,
    /// Facing the tower wants to aim at, in radians.
    pub target_facing: f32,
}

impl TowerSnapshot {
    /// Reports whether the fire interval elapsed at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Duration) -> bool {
        match self.last_shot {
            Some(last_shot) => now.saturating_sub(last_shot) >= self.fire_interval,
            None => true,
        }
    }
}

/// Read-only snapshot describing all towers placed on the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Tower standing on the provided cell, if any.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&TowerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Tower with the provided identifier, if any.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated by the world.
    pub id: ProjectileId,
    /// Current ground-plane position.
    pub position: WorldPoint,
    /// Cosmetic height.
    pub height: f32,
    /// Motion model.
    pub motion: ProjectileMotion,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Damage carried by the projectile.
    pub damage: u32,
    /// Colour of the projectile.
    pub tint: Tint,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a placed obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    /// Identifier allocated by the world.
    pub id: ObstacleId,
    /// Slot the obstacle occupies.
    pub slot: ObstacleSlot,
    /// Appearance of the obstacle.
    pub kind: ObstacleKind,
    /// World position of the slot.
    pub position: WorldPoint,
}

/// Derived stage of the wave lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// The quota has not been spawned yet.
    Spawning,
    /// The quota is spawned but enemies remain on the field.
    Clearing,
    /// The field is clear and the completion bonus is still pending.
    Completed,
    /// The bonus was granted; the next wave starts after the pause.
    Pausing,
}

/// Wave counters exposed by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSnapshot {
    /// Current wave number, starting at one.
    pub wave: u32,
    /// Enemies scheduled for the current wave.
    pub enemies_in_wave: u32,
    /// Enemies spawned so far in the current wave.
    pub enemies_spawned: u32,
    /// Spawn progress percentage in `0..=100`.
    pub progress: f32,
    /// Simulation time the wave started.
    pub started_at: Duration,
    /// Simulation time the wave was cleared, set only during the pause.
    pub completed_at: Option<Duration>,
}

impl WaveSnapshot {
    /// Reports whether the whole quota has been spawned.
    #[must_use]
    pub fn quota_met(&self) -> bool {
        self.enemies_spawned >= self.enemies_in_wave
    }

    /// Derives the lifecycle stage from the counters and the live enemy count.
    #[must_use]
    pub fn phase(&self, enemies_on_field: usize) -> WavePhase {
        if !self.quota_met() {
            WavePhase::Spawning
        } else if self.completed_at.is_some() {
            WavePhase::Pausing
        } else if enemies_on_field > 0 {
            WavePhase::Clearing
        } else {
            WavePhase::Completed
        }
    }
}

/// Derived information about the player's current grid selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionStatus {
    /// Selected cell.
    pub cell: CellCoord,
    /// Tower standing on the cell, if any.
    pub tower: Option<TowerId>,
    /// Weapon kind the next purchase would use.
    pub weapon: WeaponKind,
    /// Whether a tower of the selected weapon can be bought on the cell.
    pub can_place: bool,
    /// Whether the tower on the cell has an adjacent merge partner.
    pub can_merge: bool,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// No game is in progress.
    #[error("towers can only be bought while a game is in progress")]
    InvalidPhase,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the tower grid")]
    OutOfBounds,
    /// Another tower already stands on the cell.
    #[error("cell is already occupied by a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("not enough coins to buy the tower")]
    InsufficientFunds,
}

/// Reasons a merge request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum MergeError {
    /// No game is in progress.
    #[error("towers can only be merged while a game is in progress")]
    InvalidPhase,
    /// One of the named towers does not exist.
    #[error("merge references a tower that does not exist")]
    MissingTower,
    /// A tower cannot merge with itself.
    #[error("a tower cannot merge with itself")]
    SameTower,
    /// The towers do not share an edge.
    #[error("towers must be horizontally or vertically adjacent")]
    NotAdjacent,
    /// The towers carry different weapons.
    #[error("towers carry different weapons")]
    WeaponMismatch,
    /// The towers have different levels.
    #[error("towers have different levels")]
    LevelMismatch,
    /// The towers are already at the highest level.
    #[error("towers are already at the maximum level")]
    MaxLevel,
}

/// Reasons an obstacle request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum ObstacleError {
    /// No game is in progress.
    #[error("obstacles can only be bought while a game is in progress")]
    InvalidPhase,
    /// The slot index does not name a known slot.
    #[error("obstacle slot does not exist")]
    UnknownSlot,
    /// Another obstacle already fills the slot.
    #[error("obstacle slot is already occupied")]
    Occupied,
    /// The player cannot afford the obstacle.
    #[error("not enough coins to buy the obstacle")]
    InsufficientFunds,
}
