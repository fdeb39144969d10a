#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for emitting tower purchase and merge commands.

use lifeline_defence_core::{
    Command, Event, GamePhase, SelectionStatus, TowerSnapshot, TowerView, Tuning, MAX_TOWER_LEVEL,
};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player asked to buy a tower on the selected cell.
    pub place_action: bool,
    /// Indicates whether the player asked to merge the selected tower.
    pub merge_action: bool,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(place_action: bool, merge_action: bool) -> Self {
        Self {
            place_action,
            merge_action,
        }
    }
}

/// Builder system that translates the selection and input into world commands.
#[derive(Debug, Clone)]
pub struct Builder {
    phase: GamePhase,
    max_level: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: GamePhase::Menu,
            max_level: MAX_TOWER_LEVEL,
        }
    }

    /// Creates a builder honouring the merge cap of the provided tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            max_level: tuning.towers.level_cap(),
            ..Self::new()
        }
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// Placing targets the selected cell with the selected weapon whenever the
    /// cell is empty; the world reports funding problems as a rejection. Merging
    /// consumes the first adjacent tower that carries the same weapon at the same
    /// level, and the merged tower takes the selected tower's cell.
    pub fn handle(
        &mut self,
        events: &[Event],
        selection: Option<SelectionStatus>,
        input: BuilderInput,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::GamePhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        let Some(selection) = selection else {
            return;
        };

        if input.place_action && selection.tower.is_none() {
            out.push(Command::PlaceTower {
                kind: selection.weapon,
                cell: selection.cell,
            });
        }

        if input.merge_action {
            if let Some(target) = selection.tower.and_then(|tower| towers.get(tower)) {
                if let Some(source) = self.merge_partner(target, towers) {
                    out.push(Command::MergeTowers {
                        source: source.id,
                        target: target.id,
                    });
                }
            }
        }
    }

    fn merge_partner<'a>(
        &self,
        target: &TowerSnapshot,
        towers: &'a TowerView,
    ) -> Option<&'a TowerSnapshot> {
        if target.level >= self.max_level {
            return None;
        }

        towers.iter().find(|candidate| {
            candidate.id != target.id
                && candidate.cell.is_adjacent(target.cell)
                && candidate.kind == target.kind
                && candidate.level == target.level
        })
    }
}
