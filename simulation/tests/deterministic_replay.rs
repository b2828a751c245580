use std::time::Duration;

use lane_defence_core::{Event, TowerId, TowerKind, WorldPoint};
use lane_defence_simulation::{Simulation, SimulationConfig};

fn scripted_run(seed: u64) -> (Vec<Event>, u32) {
    let mut config = SimulationConfig::default();
    config.waves.seed = seed;
    config.economy.starting_money = 200;
    let mut simulation = Simulation::new(config).expect("valid configuration");

    simulation.buy_tower(TowerKind::Basic);
    simulation.buy_tower(TowerKind::Basic);
    simulation.begin_drag(TowerId::new(1));
    simulation.end_drag(WorldPoint::new(620.0, 100.0));
    simulation.begin_drag(TowerId::new(0));
    simulation.end_drag(WorldPoint::new(580.0, 140.0));

    let mut log = simulation.drain_events();
    for frame in 1..=4_000u32 {
        simulation.tick(Duration::from_millis(16) * frame);
        if frame == 1_200 {
            simulation.buy_tower(TowerKind::Sniper);
        }
        log.extend(simulation.drain_events());
    }

    (log, simulation.hud().money)
}

#[test]
fn scripted_runs_replay_identically() {
    let first = scripted_run(0x1234_5678);
    let second = scripted_run(0x1234_5678);
    assert_eq!(first, second);
    assert!(first
        .0
        .iter()
        .any(|event| matches!(event, Event::TowersMerged { level: 2, .. })));
}
