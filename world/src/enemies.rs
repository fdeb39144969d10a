//! Enemy bookkeeping and damage application.

use lifeline_defence_core::{
    EnemyBlueprint, EnemyId, EnemyKind, EnemySnapshot, Path, WorldPoint,
};

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: WorldPoint,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) speed: f32,
    pub(crate) path_index: usize,
    pub(crate) reward: u32,
    pub(crate) path: Path,
}

/// Result of applying a hit to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The enemy was already dead; nothing changed.
    Ignored,
    /// The enemy survived with the provided health.
    Wounded { remaining: u32 },
    /// The hit took the enemy from positive to zero health.
    Killed { reward: u32 },
}

impl EnemyState {
    /// Places a new enemy on the first waypoint of its path.
    pub(crate) fn spawn(id: EnemyId, blueprint: EnemyBlueprint) -> Option<Self> {
        let position = blueprint.path.get(0)?;
        let health = blueprint.health.max(1);
        Some(Self {
            id,
            kind: blueprint.kind,
            position,
            health,
            max_health: health,
            speed: blueprint.speed,
            path_index: 0,
            reward: blueprint.reward,
            path: blueprint.path,
        })
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub(crate) fn take_damage(&mut self, damage: u32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            DamageOutcome::Killed {
                reward: self.reward,
            }
        } else {
            DamageOutcome::Wounded {
                remaining: self.health,
            }
        }
    }

    /// Moves the enemy; the path cursor never moves backwards.
    pub(crate) fn relocate(&mut self, position: WorldPoint, path_index: usize) {
        self.position = position;
        self.path_index = self.path_index.max(path_index.min(self.path.last_index()));
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            path_index: self.path_index,
            reward: self.reward,
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(health: u32) -> EnemyState {
        let blueprint = EnemyBlueprint {
            kind: EnemyKind::Basic,
            health,
            speed: 1.0,
            reward: 3,
            path: Path::new(vec![WorldPoint::new(0.0, -15.0), WorldPoint::new(0.0, 6.0)]),
        };
        EnemyState::spawn(EnemyId::new(0), blueprint).expect("path has waypoints")
    }

    #[test]
    fn lethal_hit_reports_reward_once() {
        let mut target = enemy(20);
        assert_eq!(
            target.take_damage(15),
            DamageOutcome::Wounded { remaining: 5 }
        );
        assert_eq!(target.take_damage(15), DamageOutcome::Killed { reward: 3 });
        assert_eq!(target.take_damage(15), DamageOutcome::Ignored);
        assert_eq!(target.health, 0);
    }

    #[test]
    fn path_cursor_never_decreases() {
        let mut target = enemy(20);
        target.relocate(WorldPoint::new(0.0, 6.0), 1);
        target.relocate(WorldPoint::new(0.0, 5.0), 0);
        assert_eq!(target.path_index, 1);
    }

    #[test]
    fn empty_path_cannot_spawn() {
        let blueprint = EnemyBlueprint {
            kind: EnemyKind::Fast,
            health: 10,
            speed: 1.0,
            reward: 1,
            path: Path::new(Vec::new()),
        };
        assert!(EnemyState::spawn(EnemyId::new(0), blueprint).is_none());
    }
}
