//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use lifeline_defence_core::{
    tuning::TowerTuning, CellCoord, MergeError, TowerId, TowerSnapshot, WeaponKind,
};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Weapon carried by the tower.
    pub(crate) kind: WeaponKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    pub(crate) level: u8,
    pub(crate) damage: u32,
    pub(crate) range: f32,
    pub(crate) fire_interval: Duration,
    pub(crate) last_shot: Option<Duration>,
    pub(crate) facing: f32,
    pub(crate) target_facing: f32,
}

impl TowerState {
    /// Creates a freshly purchased level one tower.
    pub(crate) fn purchased(
        id: TowerId,
        kind: WeaponKind,
        cell: CellCoord,
        tuning: &TowerTuning,
    ) -> Self {
        let stats = tuning.stats(kind);
        Self {
            id,
            kind,
            cell,
            level: 1,
            damage: stats.damage,
            range: stats.range,
            fire_interval: stats.fire_interval(),
            last_shot: None,
            facing: 0.0,
            target_facing: 0.0,
        }
    }

    /// Produces the tower that results from merging a partner into `self`.
    ///
    /// The result inherits the position, cooldown and facing of `self`.
    pub(crate) fn merged(&self, id: TowerId, tuning: &TowerTuning) -> Self {
        let floor = Duration::from_millis(tuning.min_fire_interval_ms);
        let scaled = self.fire_interval.as_secs_f64() * f64::from(tuning.merge_interval);
        let fire_interval = Duration::try_from_secs_f64(scaled)
            .unwrap_or(floor)
            .max(floor);

        Self {
            id,
            level: self.level.saturating_add(1),
            damage: (self.damage as f32 * tuning.merge_damage).floor() as u32,
            range: self.range * tuning.merge_range,
            fire_interval,
            ..self.clone()
        }
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            level: self.level,
            damage: self.damage,
            range: self.range,
            fire_interval: self.fire_interval,
            last_shot: self.last_shot,
            facing: self.facing,
            target_facing: self.target_facing,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, state: TowerState) {
        let _ = self.entries.insert(state.id, state);
    }

    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerState> {
        self.entries.remove(&tower)
    }

    pub(crate) fn get(&self, tower: TowerId) -> Option<&TowerState> {
        self.entries.get(&tower)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<&TowerState> {
        self.entries.values().find(|tower| tower.cell == cell)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Checks every merge rule for the provided pair.
    pub(crate) fn validate_merge(
        &self,
        source: TowerId,
        target: TowerId,
        max_level: u8,
    ) -> Result<(&TowerState, &TowerState), MergeError> {
        if source == target {
            return Err(MergeError::SameTower);
        }

        let (Some(source), Some(target)) = (self.get(source), self.get(target)) else {
            return Err(MergeError::MissingTower);
        };

        if source.kind != target.kind {
            return Err(MergeError::WeaponMismatch);
        }

        if source.level != target.level {
            return Err(MergeError::LevelMismatch);
        }

        if target.level >= max_level {
            return Err(MergeError::MaxLevel);
        }

        if !source.cell.is_adjacent(target.cell) {
            return Err(MergeError::NotAdjacent);
        }

        Ok((source, target))
    }

    /// Reports whether any neighbour of `tower` satisfies the merge rules.
    pub(crate) fn has_merge_partner(&self, tower: TowerId, max_level: u8) -> bool {
        self.entries
            .keys()
            .any(|candidate| self.validate_merge(*candidate, tower, max_level).is_ok())
    }
}
