#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Every tower picks the living enemy within range that progressed furthest
//! along its path. Ties go to the enemy that spawned first.

use lifeline_defence_core::{
    EnemyId, EnemyView, GridLayout, TowerId, TowerTarget, TowerView, WorldPoint,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        enemies: &EnemyView,
        grid: &GridLayout,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        self.prepare_tower_workspace(towers, grid);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                if tower.position.distance(candidate.position) > tower.range {
                    continue;
                }

                let current = BestCandidate {
                    path_index: candidate.path_index,
                    enemy: candidate.id,
                    position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    tower_position: tower.position,
                    enemy_position: best_candidate.position,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView, grid: &GridLayout) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: grid.cell_to_world(snapshot.cell),
                range: snapshot.range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter().filter(|enemy| enemy.health > 0) {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                path_index: snapshot.path_index,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: WorldPoint,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: WorldPoint,
    path_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    path_index: usize,
    enemy: EnemyId,
    position: WorldPoint,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.path_index != other.path_index {
            return self.path_index > other.path_index;
        }

        self.enemy < other.enemy
    }
}
