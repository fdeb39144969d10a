use std::time::Duration;

use lifeline_defence_core::{Command, EnemyBlueprint, EnemyKind, Event, Path, WorldPoint};
use lifeline_defence_system_movement::{Config, Movement};
use lifeline_defence_world::{self as world, query, World};

fn world_with_enemy(waypoints: Vec<WorldPoint>, speed: f32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            enemy: EnemyBlueprint {
                kind: EnemyKind::Fast,
                health: 180,
                speed,
                reward: 2,
                path: Path::new(waypoints),
            },
        },
        &mut events,
    );
    world
}

fn pump(world: &mut World, movement: &Movement, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    movement.handle(&events, &query::enemy_view(world), &mut commands);

    let mut outcome = Vec::new();
    for command in commands {
        world::apply(world, command, &mut outcome);
    }
    outcome
}

#[test]
fn enemies_advance_by_speed_times_dt() {
    let mut world = world_with_enemy(
        vec![WorldPoint::new(0.0, -15.0), WorldPoint::new(0.0, 6.0)],
        2.0,
    );
    let movement = Movement::default();

    let _ = pump(&mut world, &movement, Duration::from_millis(500));

    let enemy = query::enemy_view(&world).into_vec().remove(0);
    assert!((enemy.position.z() - -14.0).abs() < 1e-5);
    assert_eq!(enemy.position.x(), 0.0);
    assert_eq!(enemy.path_index, 0);
}

#[test]
fn no_movement_without_elapsed_time() {
    let world = world_with_enemy(
        vec![WorldPoint::new(0.0, -15.0), WorldPoint::new(0.0, 6.0)],
        2.0,
    );
    let movement = Movement::default();

    let mut commands = Vec::new();
    movement.handle(&[], &query::enemy_view(&world), &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn enemies_follow_waypoints_and_leak_at_path_end() {
    let mut world = world_with_enemy(
        vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(1.0, 1.0),
        ],
        1.0,
    );
    let movement = Movement::default();
    let coins = query::coins(&world);

    let mut leaked = Vec::new();
    let mut last_index = 0;
    for _ in 0..200 {
        for event in pump(&mut world, &movement, Duration::from_millis(50)) {
            if let Event::EnemyLeaked { health, .. } = event {
                leaked.push(health);
            }
        }

        if let Some(enemy) = query::enemy_view(&world).iter().next() {
            assert!(enemy.path_index >= last_index, "path cursor moved backwards");
            last_index = enemy.path_index;
        }
    }

    assert_eq!(leaked, vec![19]);
    assert_eq!(query::health(&world), 19);
    assert_eq!(query::coins(&world), coins);
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::session_stats(&world).leaks, 1);
}

#[test]
fn crossing_the_life_line_leaks_immediately() {
    let mut world = world_with_enemy(
        vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(0.0, 20.0),
            WorldPoint::new(0.0, 30.0),
        ],
        10.0,
    );
    let movement = Movement::new(Config::new(8.0, 0.1));

    let first = pump(&mut world, &movement, Duration::from_secs(1));
    assert!(first.is_empty(), "enemy is still in front of the line");
    assert!(query::enemy_view(&world).iter().all(|enemy| enemy.position.z() > 8.0));

    let second = pump(&mut world, &movement, Duration::from_millis(16));
    assert!(second
        .iter()
        .any(|event| matches!(event, Event::EnemyLeaked { health: 19, .. })));
}
