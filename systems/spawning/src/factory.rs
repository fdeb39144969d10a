//! Turns an enemy kind and wave number into a fully initialised enemy.

use lifeline_defence_core::{tuning::EnemyTuning, EnemyBlueprint, EnemyKind, Path};

/// Builds an enemy of `kind` scaled for `wave`.
///
/// Health grows by a per-wave rate that itself grows until it hits the
/// configured cap; speed grows slowly up to its own cap. Rewards do not scale.
#[must_use]
pub fn create_enemy(kind: EnemyKind, wave: u32, path: Path, tuning: &EnemyTuning) -> EnemyBlueprint {
    let base = kind.base_stats();
    let health = (base.health as f32 * tuning.health_multiplier(wave)).floor() as u32;

    EnemyBlueprint {
        kind,
        health: health.max(1),
        speed: base.speed * tuning.speed_multiplier(wave),
        reward: base.reward,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeline_defence_core::WorldPoint;

    fn path() -> Path {
        Path::new(vec![WorldPoint::new(0.0, -15.0), WorldPoint::new(0.0, 6.0)])
    }

    #[test]
    fn first_wave_uses_base_stats() {
        let enemy = create_enemy(EnemyKind::Heavy, 1, path(), &EnemyTuning::default());
        assert_eq!(enemy.health, 400);
        assert!((enemy.speed - 1.0).abs() < f32::EPSILON);
        assert_eq!(enemy.reward, 2);
    }

    #[test]
    fn health_and_speed_scale_with_wave() {
        let tuning = EnemyTuning::default();
        let enemy = create_enemy(EnemyKind::Basic, 3, path(), &tuning);
        assert_eq!(enemy.health, 250);
        assert!((enemy.speed - 1.212).abs() < 1e-5);

        let late = create_enemy(EnemyKind::Boss, 20, path(), &tuning);
        assert_eq!(late.health, 5_197);
        assert!((late.speed - 0.945).abs() < 1e-5);
        assert_eq!(late.reward, 8);
    }

    #[test]
    fn unknown_tags_build_basic_enemies() {
        let enemy = create_enemy(
            EnemyKind::from_tag("unknown"),
            1,
            path(),
            &EnemyTuning::default(),
        );
        assert_eq!(enemy.kind, EnemyKind::Basic);
        assert_eq!(enemy.health, 220);
    }
}
