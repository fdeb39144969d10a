use std::time::Duration;

use lifeline_defence_core::{
    CellCoord, Command, EnemyBlueprint, EnemyId, EnemyKind, Event, Heading, Path, ProjectileLaunch,
    ProjectileMotion, Tint, TowerId, WeaponKind, WorldPoint,
};
use lifeline_defence_system_projectiles::Projectiles;
use lifeline_defence_world::{self as world, query, World};

fn world_with_enemy(health: u32, position: WorldPoint) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    for (kind, column) in [(WeaponKind::Turret, 2), (WeaponKind::Mortar, 3)] {
        world::apply(
            &mut world,
            Command::PlaceTower {
                kind,
                cell: CellCoord::new(column, 0),
            },
            &mut events,
        );
    }
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            enemy: EnemyBlueprint {
                kind: EnemyKind::Basic,
                health,
                speed: 1.2,
                reward: 3,
                path: Path::new(vec![position, WorldPoint::new(0.0, 6.0)]),
            },
        },
        &mut events,
    );
    world
}

fn launch(motion: ProjectileMotion, origin: WorldPoint, damage: u32) -> ProjectileLaunch {
    ProjectileLaunch {
        origin,
        height: 0.17,
        motion,
        speed: 12.0,
        damage,
        tint: Tint::for_level(1),
    }
}

fn resolve(world: &mut World, system: &mut Projectiles, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    );

    let mut commands = Vec::new();
    system.handle(
        &events,
        &query::projectile_view(world),
        &query::enemy_view(world),
        &query::obstacles(world),
        &mut commands,
    );

    let mut resolved = Vec::new();
    for command in commands {
        world::apply(world, command, &mut resolved);
    }
    resolved
}

#[test]
fn simultaneous_lethal_hits_pay_once() {
    let mut world = world_with_enemy(20, WorldPoint::new(0.0, -1.2));
    let direction = Heading::from_components(0.0, -1.0).expect("unit heading");
    let mut events = Vec::new();
    for _ in 0..2 {
        world::apply(
            &mut world,
            Command::FireProjectile {
                tower: TowerId::new(0),
                launch: launch(
                    ProjectileMotion::DirectFire { direction },
                    WorldPoint::new(0.0, -1.0),
                    15,
                ),
            },
            &mut events,
        );
    }
    let coins_before = query::coins(&world);

    let mut system = Projectiles::default();
    let first = resolve(&mut world, &mut system, 16);
    let second = resolve(&mut world, &mut system, 16);

    let kills = first
        .iter()
        .chain(second.iter())
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 1);
    assert_eq!(query::coins(&world), coins_before + 3);
    assert_eq!(query::session_stats(&world).kills, 1);
    assert!(query::impacts(&world).len() >= 2);
}

#[test]
fn bullet_wounds_one_of_two_overlapping_enemies() {
    let mut world = world_with_enemy(220, WorldPoint::new(0.0, -1.1));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            enemy: EnemyBlueprint {
                kind: EnemyKind::Basic,
                health: 220,
                speed: 1.2,
                reward: 3,
                path: Path::new(vec![WorldPoint::new(0.1, -1.1), WorldPoint::new(0.1, 6.0)]),
            },
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(0),
            launch: launch(
                ProjectileMotion::DirectFire {
                    direction: Heading::from_components(0.0, -1.0).expect("unit heading"),
                },
                WorldPoint::new(0.0, -1.0),
                15,
            ),
        },
        &mut events,
    );

    let mut system = Projectiles::default();
    let resolved = resolve(&mut world, &mut system, 16);

    let damaged: Vec<&Event> = resolved
        .iter()
        .filter(|event| matches!(event, Event::EnemyDamaged { .. }))
        .collect();
    assert_eq!(
        damaged,
        vec![&Event::EnemyDamaged {
            enemy: EnemyId::new(0),
            damage: 15,
            remaining: 205,
        }]
    );
    assert!(query::projectile_view(&world).is_empty());

    let health: Vec<u32> = query::enemy_view(&world)
        .iter()
        .map(|enemy| enemy.health)
        .collect();
    assert_eq!(health, vec![205, 220]);
}

#[test]
fn detonation_leaves_an_explosion_and_wounds_enemies() {
    let target = WorldPoint::new(0.0, -3.0);
    let mut world = world_with_enemy(220, target);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(1),
            launch: ProjectileLaunch {
                speed: 4.0,
                ..launch(
                    ProjectileMotion::AreaFire {
                        target,
                        splash_radius: 1.6,
                    },
                    WorldPoint::new(0.0, -2.0),
                    55,
                )
            },
        },
        &mut events,
    );

    let mut system = Projectiles::default();
    let mut resolved = Vec::new();
    for _ in 0..10 {
        resolved.extend(resolve(&mut world, &mut system, 50));
    }

    assert!(query::projectile_view(&world).is_empty());
    assert_eq!(query::explosions(&world).len(), 1);
    assert!(resolved.contains(&Event::EnemyDamaged {
        enemy: EnemyId::new(0),
        damage: 55,
        remaining: 165,
    }));
}

#[test]
fn stray_bullets_expire_at_field_edge() {
    let mut world = world_with_enemy(220, WorldPoint::new(9.0, -3.0));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(0),
            launch: launch(
                ProjectileMotion::DirectFire {
                    direction: Heading::FORWARD,
                },
                WorldPoint::new(0.0, 1.75),
                15,
            ),
        },
        &mut events,
    );

    let mut system = Projectiles::default();
    let mut resolved = Vec::new();
    for _ in 0..20 {
        resolved.extend(resolve(&mut world, &mut system, 100));
    }

    assert!(query::projectile_view(&world).is_empty());
    assert!(resolved
        .iter()
        .any(|event| matches!(event, Event::ProjectileExpired { .. })));
}
