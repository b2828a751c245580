use lane_defence_core::{
    CellCoord, Command, Event, GridLayout, PlacementError, PointerEvent, TowerId, TowerKind,
    WorldPoint,
};
use lane_defence_system_placement::PlacementController;
use lane_defence_world::{self as world, query, World};

struct Harness {
    world: World,
    controller: PlacementController,
    events: Vec<Event>,
}

impl Harness {
    fn with_money(money: u32) -> Self {
        let config = world::Config::new(GridLayout::new(17, 8, 40.0), money, 10, 50);
        Self {
            world: World::new(config),
            controller: PlacementController::new(),
            events: Vec::new(),
        }
    }

    fn command(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn pointer(&mut self, pointer: PointerEvent) {
        let grid = query::grid(&self.world);
        let mut commands = Vec::new();
        let state = &self.world;
        self.controller
            .handle(pointer, &grid, |cell| query::tower_at(state, cell), &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn drag(&mut self, from: WorldPoint, to: WorldPoint) -> Vec<Event> {
        self.events.clear();
        self.pointer(PointerEvent::Down(from));
        self.pointer(PointerEvent::Move(to));
        self.pointer(PointerEvent::Up(to));
        std::mem::take(&mut self.events)
    }
}

#[test]
fn dragging_from_inventory_onto_slot_moves_tower() {
    let mut harness = Harness::with_money(100);
    harness.command(Command::BuyTower {
        kind: TowerKind::Basic,
    });

    let events = harness.drag(WorldPoint::new(620.0, 100.0), WorldPoint::new(580.0, 180.0));

    assert_eq!(
        events,
        vec![
            Event::DragStarted {
                tower: TowerId::new(0)
            },
            Event::TowerMoved {
                tower: TowerId::new(0),
                from: CellCoord::new(15, 2),
                to: CellCoord::new(14, 4),
            },
        ]
    );
    assert_eq!(
        query::tower_at(&harness.world, CellCoord::new(14, 4)),
        Some(TowerId::new(0))
    );
}

#[test]
fn dropping_equal_tower_merges_into_target() {
    let mut harness = Harness::with_money(100);
    harness.command(Command::BuyTower {
        kind: TowerKind::Basic,
    });
    harness.command(Command::BuyTower {
        kind: TowerKind::Basic,
    });

    let events = harness.drag(WorldPoint::new(660.0, 100.0), WorldPoint::new(620.0, 100.0));

    assert!(events.contains(&Event::TowersMerged {
        consumed: TowerId::new(1),
        upgraded: TowerId::new(0),
        level: 2,
    }));
    let towers = query::tower_view(&harness.world).into_vec();
    assert_eq!(towers.len(), 1);
    assert_eq!(towers[0].kind.damage_at(towers[0].level), 50);
}

#[test]
fn dropping_on_lane_snaps_back() {
    let mut harness = Harness::with_money(100);
    harness.command(Command::BuyTower {
        kind: TowerKind::Basic,
    });

    let events = harness.drag(WorldPoint::new(620.0, 100.0), WorldPoint::new(200.0, 100.0));

    assert_eq!(
        events.last(),
        Some(&Event::DropRejected {
            tower: TowerId::new(0),
            reason: PlacementError::EnemyLane,
        })
    );
    assert_eq!(
        query::tower_at(&harness.world, CellCoord::new(15, 2)),
        Some(TowerId::new(0))
    );
}

#[test]
fn preview_reports_legality_of_hovered_cell() {
    let mut harness = Harness::with_money(100);
    harness.command(Command::BuyTower {
        kind: TowerKind::Basic,
    });
    harness.pointer(PointerEvent::Down(WorldPoint::new(620.0, 100.0)));
    harness.pointer(PointerEvent::Move(WorldPoint::new(580.0, 140.0)));

    let grid = query::grid(&harness.world);
    let state = &harness.world;
    let preview = harness
        .controller
        .preview(&grid, |cell, tower| {
            query::can_place_tower(state, cell, Some(tower))
        })
        .expect("dragging");
    assert_eq!(preview.cell, Some(CellCoord::new(14, 3)));
    assert!(preview.placeable);

    harness.pointer(PointerEvent::Move(WorldPoint::new(660.0, 140.0)));
    let state = &harness.world;
    let preview = harness
        .controller
        .preview(&grid, |cell, tower| {
            query::can_place_tower(state, cell, Some(tower))
        })
        .expect("dragging");
    assert!(!preview.placeable);
}
