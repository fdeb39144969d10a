//! Obstacles purchased into the fixed slots in front of the tower grid.

use lifeline_defence_core::{ObstacleId, ObstacleKind, ObstacleSlot, ObstacleSnapshot};

#[derive(Debug)]
pub(crate) struct ObstacleField {
    entries: Vec<ObstacleSnapshot>,
    next_obstacle_id: ObstacleId,
}

impl ObstacleField {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_obstacle_id: ObstacleId::new(0),
        }
    }

    pub(crate) fn is_occupied(&self, slot: ObstacleSlot) -> bool {
        self.entries.iter().any(|entry| entry.slot == slot)
    }

    /// Fills a free slot, returning `None` when the slot does not exist.
    pub(crate) fn place(&mut self, slot: ObstacleSlot, kind: ObstacleKind) -> Option<ObstacleId> {
        let position = slot.position()?;
        let id = self.next_obstacle_id;
        self.next_obstacle_id = ObstacleId::new(id.get().saturating_add(1));
        self.entries.push(ObstacleSnapshot {
            id,
            slot,
            kind,
            position,
        });
        Some(id)
    }

    pub(crate) fn remove(&mut self, obstacle: ObstacleId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != obstacle);
        before != self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ObstacleSnapshot> {
        self.entries.iter()
    }
}
