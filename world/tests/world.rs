use breach_planner_core::{
    Cell, Command, Edge, Event, GameConfig, GameState, Owner, ResourceKind, SpawnError,
    SpawnIntent, UnitKind, UnitRoster,
};
use breach_planner_world::{self as world, query, PlayerTurn, World};

const CONFIG: &str = r#"{"unitInformation": [
    {"shorthand": "FF", "cost": 1.0},
    {"shorthand": "EF", "cost": 4.0, "range": 3.0},
    {"shorthand": "DF", "cost": 3.0, "damage": 4.0, "range": 3.0},
    {"shorthand": "PI", "cost": 1.0, "damage": 1.0, "range": 3.0},
    {"shorthand": "EI", "cost": 3.0, "damage": 3.0, "range": 5.0},
    {"shorthand": "SI", "cost": 1.0, "damage": 1.0, "range": 3.0}
]}"#;

fn fresh_world() -> World {
    let config = GameConfig::from_json(CONFIG).expect("config parses");
    World::new(UnitRoster::from_game_config(&config).expect("roster resolves"))
}

fn fund(world: &mut World, owner: Owner, bits: f64, cores: f64) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SetResources { owner, bits, cores },
        &mut events,
    );
}

fn place(world: &mut World, owner: Owner, kind: UnitKind, cell: Cell) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Spawn { owner, kind, cell }, &mut events);
    events
}

#[test]
fn stationary_spawn_spends_cores_and_occupies_cell() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Friendly, 0.0, 10.0);

    let events = place(&mut world, Owner::Friendly, UnitKind::Destructor, Cell::new(13, 5));

    assert_eq!(
        events,
        vec![Event::UnitSpawned {
            owner: Owner::Friendly,
            kind: UnitKind::Destructor,
            cell: Cell::new(13, 5),
        }]
    );
    assert!(query::is_occupied(&world, Cell::new(13, 5)));
    assert!((query::resource(&world, Owner::Friendly, ResourceKind::Cores) - 7.0).abs() < 1e-9);
}

#[test]
fn spawn_rejections_report_reason() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Friendly, 1.0, 3.0);

    let cases = [
        (UnitKind::Filter, Cell::new(0, 0), SpawnError::OutOfBounds(Cell::new(0, 0))),
        (UnitKind::Filter, Cell::new(13, 20), SpawnError::ForeignHalf(Cell::new(13, 20))),
        (UnitKind::Ping, Cell::new(13, 5), SpawnError::NotOnLaunchEdge(Cell::new(13, 5))),
    ];

    for (kind, cell, expected) in cases {
        let events = place(&mut world, Owner::Friendly, kind, cell);
        match events.as_slice() {
            [Event::SpawnRejected { reason, .. }] => assert_eq!(*reason, expected),
            other => panic!("unexpected events: {other:?}"),
        }
    }

    let _ = place(&mut world, Owner::Friendly, UnitKind::Destructor, Cell::new(13, 5));
    let events = place(&mut world, Owner::Friendly, UnitKind::Filter, Cell::new(14, 5));
    assert!(matches!(
        events.as_slice(),
        [Event::SpawnRejected {
            reason: SpawnError::InsufficientResources { .. },
            ..
        }]
    ));
}

#[test]
fn path_runs_from_launch_cell_to_opposite_edge() {
    let world = fresh_world();
    let start = Cell::new(13, 0);

    let path = query::path_to_edge(&world, start);

    assert_eq!(path.first(), Some(&start));
    let last = *path.last().expect("path not empty");
    assert!(Edge::TopRight.contains(last), "ended at {last:?}");
    for pair in path.windows(2) {
        assert_eq!(pair[0].distance_squared(pair[1]), 1);
    }
}

#[test]
fn path_detours_around_stationary_units() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Friendly, 0.0, 30.0);
    let baseline = query::path_to_edge(&world, Cell::new(13, 0));
    let blocker = baseline[3];

    let _ = place(&mut world, Owner::Friendly, UnitKind::Filter, blocker);
    let detour = query::path_to_edge(&world, Cell::new(13, 0));

    assert!(!detour.contains(&blocker));
    assert!(Edge::TopRight.contains(*detour.last().expect("path not empty")));
}

#[test]
fn blocked_launch_cell_has_no_path() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Friendly, 0.0, 1.0);
    let _ = place(&mut world, Owner::Friendly, UnitKind::Filter, Cell::new(13, 0));

    assert!(query::path_to_edge(&world, Cell::new(13, 0)).is_empty());
}

#[test]
fn attackers_counted_by_owner_kind_and_range() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Opponent, 0.0, 30.0);
    let _ = place(&mut world, Owner::Opponent, UnitKind::Destructor, Cell::new(13, 16));
    let _ = place(&mut world, Owner::Opponent, UnitKind::Destructor, Cell::new(14, 16));
    let _ = place(&mut world, Owner::Opponent, UnitKind::Filter, Cell::new(13, 15));

    let near = Cell::new(13, 14);
    assert_eq!(
        query::attackers_of(&world, near, Owner::Opponent, UnitKind::Destructor),
        2
    );
    assert_eq!(
        query::attackers_of(&world, near, Owner::Friendly, UnitKind::Destructor),
        0
    );
    assert_eq!(
        query::attackers_of(&world, near, Owner::Opponent, UnitKind::Filter),
        0,
        "filters have no reach"
    );
    assert_eq!(
        query::attackers_of(&world, Cell::new(13, 10), Owner::Opponent, UnitKind::Destructor),
        0
    );
}

#[test]
fn player_turn_spawns_until_resources_run_out() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Friendly, 2.5, 0.0);

    let mut turn = PlayerTurn::new(&mut world, Owner::Friendly);
    let spawned = turn
        .attempt_spawn(UnitKind::Ping, Cell::new(13, 0), 5)
        .expect("at least one ping fits");
    assert_eq!(spawned, 2);

    let error = turn
        .attempt_spawn(UnitKind::Ping, Cell::new(13, 0), 1)
        .expect_err("budget exhausted");
    assert!(matches!(error, SpawnError::InsufficientResources { .. }));

    turn.submit_turn();
    let events = turn.into_events();
    assert_eq!(
        events.last(),
        Some(&Event::TurnSubmitted {
            owner: Owner::Friendly,
            turn: 0,
            launched: vec![SpawnIntent::new(UnitKind::Ping, Cell::new(13, 0), 2)],
        })
    );
    assert_eq!(query::turn(&world, Owner::Friendly), 1);
    assert!(query::launched(&world, Owner::Friendly).is_empty());
}

#[test]
fn zero_count_spawn_is_rejected() {
    let mut world = fresh_world();
    let mut turn = PlayerTurn::new(&mut world, Owner::Friendly);
    assert_eq!(
        turn.attempt_spawn(UnitKind::Ping, Cell::new(13, 0), 0),
        Err(SpawnError::EmptyRequest)
    );
    assert!(turn.events().is_empty());
}

#[test]
fn removing_unit_frees_cell() {
    let mut world = fresh_world();
    fund(&mut world, Owner::Friendly, 0.0, 1.0);
    let _ = place(&mut world, Owner::Friendly, UnitKind::Filter, Cell::new(13, 4));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RemoveUnit {
            cell: Cell::new(13, 4),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::UnitRemoved {
            owner: Owner::Friendly,
            kind: UnitKind::Filter,
            cell: Cell::new(13, 4),
        }]
    );
    assert!(query::unit_at(&world, Cell::new(13, 4)).is_none());
    assert_eq!(query::stationary_units(&world).count(), 0);
}
