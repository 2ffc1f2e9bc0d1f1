use afk_spot_core::{
    AttackRule, CellKey, ClearReason, Command, Composition, EntityId, EntitySnapshot, EntityView,
    Event, Extent, Plane, RegionId, SessionState,
};
use afk_spot_world::{self as world, query, World};

fn npc(id: u32, name: &str, cell: CellKey) -> EntitySnapshot {
    EntitySnapshot {
        id: EntityId::new(id),
        footprint: Some(Extent::single(cell)),
        alive: true,
        name: Some(name.to_owned()),
        composition: Some(Composition::new(vec![
            "Attack".to_owned(),
            "Examine".to_owned(),
        ])),
    }
}

fn tick(plane: i32, region: u32, entities: Vec<EntitySnapshot>) -> Command {
    Command::Tick {
        plane: Plane::new(plane),
        region: RegionId::new(region),
        entities: EntityView::from_snapshots(entities),
    }
}

fn logged_in_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ChangeSession {
            state: SessionState::LoggedIn,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::OccupancyCleared {
            reason: ClearReason::Login
        }]
    );
    world
}

#[test]
fn ticks_are_ignored_until_logged_in() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        tick(0, 1, vec![npc(0, "Goblin", CellKey::new(1, 1, 0))]),
        &mut events,
    );

    assert!(events.is_empty(), "no tick processing while logged out");
    assert!(query::occupancy_view(&world).is_empty());
    assert_eq!(query::tick_index(&world), 0);
}

#[test]
fn repeated_presence_never_inflates_occupancy() {
    let mut world = logged_in_world();
    let cell = CellKey::new(10, 20, 0);
    let mut events = Vec::new();

    for _ in 0..5 {
        world::apply(&mut world, tick(0, 1, vec![npc(4, "Goblin", cell)]), &mut events);
        assert_eq!(query::occupancy_view(&world).occupancy(cell), 1);
    }

    let changes: Vec<bool> = events
        .iter()
        .filter_map(|event| match event {
            Event::OccupancyRecorded { changed, .. } => Some(*changed),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![true, false, false, false, false]);
}

#[test]
fn occupancy_accumulates_across_ticks_without_expiry() {
    let mut world = logged_in_world();
    let cell = CellKey::new(10, 20, 0);
    let mut events = Vec::new();

    world::apply(&mut world, tick(0, 1, vec![npc(0, "Goblin", cell)]), &mut events);
    world::apply(&mut world, tick(0, 1, vec![npc(1, "Goblin", cell)]), &mut events);
    world::apply(&mut world, tick(0, 1, Vec::new()), &mut events);

    assert_eq!(query::occupancy_view(&world).occupancy(cell), 2);
}

#[test]
fn plane_change_resets_window_before_recording() {
    let mut world = logged_in_world();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        tick(0, 1, vec![npc(0, "Goblin", CellKey::new(1, 1, 0))]),
        &mut events,
    );
    events.clear();

    world::apply(&mut world, tick(1, 1, Vec::new()), &mut events);

    assert_eq!(
        events,
        vec![
            Event::OccupancyCleared {
                reason: ClearReason::PlaneChanged
            },
            Event::OccupancyRecorded {
                tick: 2,
                changed: false
            },
        ]
    );
    assert!(query::occupancy_view(&world).is_empty());
    assert_eq!(query::current_plane(&world), Some(Plane::new(1)));
}

#[test]
fn region_change_resets_window() {
    let mut world = logged_in_world();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        tick(0, 100, vec![npc(0, "Goblin", CellKey::new(1, 1, 0))]),
        &mut events,
    );
    world::apply(
        &mut world,
        tick(0, 101, vec![npc(1, "Goblin", CellKey::new(5, 5, 0))]),
        &mut events,
    );

    assert!(events.contains(&Event::OccupancyCleared {
        reason: ClearReason::RegionChanged
    }));
    let view = query::occupancy_view(&world);
    assert_eq!(view.len(), 1);
    assert_eq!(view.occupancy(CellKey::new(1, 1, 0)), 0);
    assert_eq!(view.occupancy(CellKey::new(5, 5, 0)), 1);
}

#[test]
fn relogging_clears_the_window() {
    let mut world = logged_in_world();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        tick(0, 1, vec![npc(0, "Goblin", CellKey::new(1, 1, 0))]),
        &mut events,
    );
    world::apply(
        &mut world,
        Command::ChangeSession {
            state: SessionState::Loading,
        },
        &mut events,
    );
    assert_eq!(query::occupancy_view(&world).len(), 1, "loading keeps the window");

    world::apply(
        &mut world,
        Command::ChangeSession {
            state: SessionState::LoggedIn,
        },
        &mut events,
    );
    assert!(query::occupancy_view(&world).is_empty());
}

#[test]
fn filter_change_rebuilds_and_clears() {
    let mut world = logged_in_world();
    let cell = CellKey::new(3, 3, 0);
    let mut events = Vec::new();

    world::apply(
        &mut world,
        tick(
            0,
            1,
            vec![npc(0, "Goblin", cell), npc(1, "Giant Rat", cell)],
        ),
        &mut events,
    );
    assert_eq!(query::occupancy_view(&world).occupancy(cell), 2);
    events.clear();

    world::apply(
        &mut world,
        Command::ConfigureNameFilter {
            raw: "goblin".to_owned(),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![
            Event::FilterRebuilt { names: 1 },
            Event::OccupancyCleared {
                reason: ClearReason::FilterChanged
            },
        ]
    );
    assert!(query::occupancy_view(&world).is_empty());

    world::apply(
        &mut world,
        tick(
            0,
            1,
            vec![npc(0, "Goblin", cell), npc(1, "Giant Rat", cell)],
        ),
        &mut events,
    );
    assert_eq!(query::occupancy_view(&world).occupancy(cell), 1);
}

#[test]
fn identical_filter_string_keeps_window() {
    let mut world = logged_in_world();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::ConfigureNameFilter {
            raw: "goblin".to_owned(),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        tick(0, 1, vec![npc(0, "Goblin", CellKey::new(3, 3, 0))]),
        &mut events,
    );
    events.clear();

    world::apply(
        &mut world,
        Command::ConfigureNameFilter {
            raw: "goblin".to_owned(),
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(query::occupancy_view(&world).len(), 1);
}

#[test]
fn attack_rule_change_clears_and_widens_population() {
    let mut world = logged_in_world();
    let cell = CellKey::new(8, 8, 0);
    let mut guard = npc(0, "Guard", cell);
    guard.composition = Some(Composition::new(vec!["Cannot Attack".to_owned()]));
    let mut events = Vec::new();

    world::apply(&mut world, tick(0, 1, vec![guard.clone()]), &mut events);
    assert!(query::occupancy_view(&world).is_empty());

    world::apply(
        &mut world,
        Command::ConfigureAttackRule {
            rule: AttackRule::Substring,
        },
        &mut events,
    );
    world::apply(&mut world, tick(0, 1, vec![guard]), &mut events);

    assert!(events.contains(&Event::OccupancyCleared {
        reason: ClearReason::RuleChanged
    }));
    assert_eq!(query::occupancy_view(&world).occupancy(cell), 1);
}

#[test]
fn malformed_entries_do_not_abort_the_tick() {
    let mut world = logged_in_world();
    let cell = CellKey::new(2, 2, 0);
    let mut events = Vec::new();

    let mut nowhere = npc(0, "Goblin", cell);
    nowhere.footprint = None;
    let mut nameless = npc(1, "Goblin", cell);
    nameless.name = None;
    let mut undefined = npc(2, "Goblin", cell);
    undefined.composition = None;

    world::apply(
        &mut world,
        tick(0, 1, vec![nowhere, nameless, undefined, npc(3, "Goblin", cell)]),
        &mut events,
    );

    assert_eq!(query::occupancy_view(&world).occupancy(cell), 2);
}

#[test]
fn shutdown_returns_to_startup_state() {
    let mut world = logged_in_world();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::ConfigureNameFilter {
            raw: "goblin".to_owned(),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        tick(2, 7, vec![npc(0, "Goblin", CellKey::new(1, 1, 2))]),
        &mut events,
    );
    events.clear();

    world::apply(&mut world, Command::Shutdown, &mut events);

    assert_eq!(
        events,
        vec![Event::OccupancyCleared {
            reason: ClearReason::Shutdown
        }]
    );
    assert!(query::occupancy_view(&world).is_empty());
    assert!(query::filters(&world).is_empty());
    assert_eq!(query::current_plane(&world), None);
    assert_eq!(query::session(&world), SessionState::LoggedIn);
}
