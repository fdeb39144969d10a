use lifeline_defence_core::{
    CellCoord, Command, Event, GamePhase, SelectionStatus, TowerId, WeaponKind,
};
use lifeline_defence_system_builder::{Builder, BuilderInput};
use lifeline_defence_world::{self as world, query, World};

fn playing_event() -> Event {
    Event::GamePhaseChanged {
        phase: GamePhase::Playing,
    }
}

fn empty_selection(cell: CellCoord) -> SelectionStatus {
    SelectionStatus {
        cell,
        tower: None,
        weapon: WeaponKind::Mortar,
        can_place: true,
        can_merge: false,
    }
}

fn started_world() -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    (world, events)
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn place_emits_purchase_for_selected_weapon() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[playing_event()],
        Some(empty_selection(CellCoord::new(1, 2))),
        BuilderInput::new(true, false),
        &Default::default(),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            kind: WeaponKind::Mortar,
            cell: CellCoord::new(1, 2),
        }],
        "builder should buy the selected weapon on the selected cell",
    );
}

#[test]
fn place_ignored_outside_playing_phase() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[],
        Some(empty_selection(CellCoord::new(1, 2))),
        BuilderInput::new(true, false),
        &Default::default(),
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "system must not emit commands before a game starts",
    );

    builder.handle(
        &[
            playing_event(),
            Event::GamePhaseChanged {
                phase: GamePhase::GameOver,
            },
        ],
        Some(empty_selection(CellCoord::new(1, 2))),
        BuilderInput::new(true, false),
        &Default::default(),
        &mut commands,
    );

    assert!(commands.is_empty(), "game over freezes the builder");
}

#[test]
fn place_ignored_on_occupied_cell() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[playing_event()],
        Some(SelectionStatus {
            tower: Some(TowerId::new(3)),
            can_place: false,
            ..empty_selection(CellCoord::new(0, 0))
        }),
        BuilderInput::new(true, false),
        &Default::default(),
        &mut commands,
    );

    assert!(commands.is_empty(), "occupied cells cannot host a purchase");
}

#[test]
fn merge_upgrades_selected_tower_with_adjacent_partner() {
    let (mut world, events) = started_world();
    let mut builder = Builder::default();
    builder.handle(
        &events,
        None,
        BuilderInput::default(),
        &query::tower_view(&world),
        &mut Vec::new(),
    );

    let _ = apply_all(
        &mut world,
        vec![
            Command::PlaceTower {
                kind: WeaponKind::Turret,
                cell: CellCoord::new(2, 1),
            },
            Command::PlaceTower {
                kind: WeaponKind::Turret,
                cell: CellCoord::new(3, 1),
            },
            Command::SelectCell {
                cell: CellCoord::new(2, 1),
            },
        ],
    );

    let selection = query::selection(&world);
    assert!(selection.is_some_and(|status| status.can_merge));

    let mut commands = Vec::new();
    builder.handle(
        &[],
        selection,
        BuilderInput::new(false, true),
        &query::tower_view(&world),
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::MergeTowers {
            source: TowerId::new(1),
            target: TowerId::new(0),
        }],
    );

    let events = apply_all(&mut world, commands);
    assert!(matches!(
        events.as_slice(),
        [Event::TowersMerged { level: 2, .. }]
    ));

    let towers = query::tower_view(&world).into_vec();
    assert_eq!(towers.len(), 1);
    assert_eq!(towers[0].cell, CellCoord::new(2, 1));
    assert_eq!(towers[0].level, 2);
}

#[test]
fn merge_ignored_without_partner() {
    let (mut world, events) = started_world();
    let mut builder = Builder::default();
    let _ = apply_all(
        &mut world,
        vec![
            Command::PlaceTower {
                kind: WeaponKind::Turret,
                cell: CellCoord::new(0, 0),
            },
            Command::PlaceTower {
                kind: WeaponKind::Mortar,
                cell: CellCoord::new(1, 0),
            },
            Command::SelectCell {
                cell: CellCoord::new(0, 0),
            },
        ],
    );

    let mut commands = Vec::new();
    builder.handle(
        &events,
        query::selection(&world),
        BuilderInput::new(false, true),
        &query::tower_view(&world),
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "towers carrying different weapons cannot merge"
    );
}
