//! Cosmetic impacts and explosions left behind by resolved projectiles.

use std::time::Duration;

use lifeline_defence_core::{EffectId, Explosion, Impact, Tint, WorldPoint};

/// Append-only log of effects awaiting dismissal by the presentation layer.
#[derive(Debug)]
pub(crate) struct EffectLog {
    impacts: Vec<Impact>,
    explosions: Vec<Explosion>,
    next_effect_id: EffectId,
}

impl EffectLog {
    pub(crate) fn new() -> Self {
        Self {
            impacts: Vec::new(),
            explosions: Vec::new(),
            next_effect_id: EffectId::new(0),
        }
    }

    fn allocate_id(&mut self) -> EffectId {
        let id = self.next_effect_id;
        self.next_effect_id = EffectId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn record_impact(
        &mut self,
        position: WorldPoint,
        height: f32,
        created_at: Duration,
    ) -> EffectId {
        let id = self.allocate_id();
        self.impacts.push(Impact {
            id,
            position,
            height,
            created_at,
        });
        id
    }

    pub(crate) fn record_explosion(
        &mut self,
        position: WorldPoint,
        height: f32,
        radius: f32,
        tint: Tint,
        created_at: Duration,
    ) -> EffectId {
        let id = self.allocate_id();
        self.explosions.push(Explosion {
            id,
            position,
            height,
            radius,
            tint,
            created_at,
        });
        id
    }

    /// Removes the effect with the provided identifier, reporting whether it existed.
    pub(crate) fn dismiss(&mut self, effect: EffectId) -> bool {
        let before = self.impacts.len() + self.explosions.len();
        self.impacts.retain(|impact| impact.id != effect);
        self.explosions.retain(|explosion| explosion.id != effect);
        before != self.impacts.len() + self.explosions.len()
    }

    pub(crate) fn impacts(&self) -> &[Impact] {
        &self.impacts
    }

    pub(crate) fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }
}
