#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::{Array1, Array2, array};
use roadevo::simulation::brain::{Brain, BrainRecord, Level};
use roadevo::simulation::geometric_utils::polygons_intersect;
use roadevo::simulation::params::{Settings, TrafficSpec};
use roadevo::simulation::storage::{BrainStore, MemoryStore};
use roadevo::simulation::world::World;

fn create_test_settings() -> Settings {
    Settings {
        car_count: 8,
        seed: 7,
        ..Settings::default()
    }
}

/// Single-level brain that holds forward and releases everything else.
fn forward_only_record(ray_count: usize) -> BrainRecord {
    let level = Level::from_parts(Array2::zeros((ray_count, 4)), array![1.0, -1.0, -1.0, -1.0]);
    Brain::from_levels(vec![level]).unwrap().to_record()
}

#[test]
fn test_world_starts_fresh_with_empty_store() {
    let settings = create_test_settings();
    let mut store = MemoryStore::new();

    let world = World::new(settings.clone(), &mut store).unwrap();

    assert_eq!(world.generation(), 0);
    assert_eq!(world.tick_count(), 0);
    assert_eq!(world.population().agents().len(), settings.car_count);
    assert_eq!(world.traffic().len(), settings.traffic.len());
    assert_eq!(world.road().lane_count, settings.lane_count);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = Settings {
        car_count: 0,
        ..create_test_settings()
    };
    let mut store = MemoryStore::new();
    assert!(World::new(settings, &mut store).is_err());
}

#[test]
fn test_traffic_moves_before_agents() {
    let settings = create_test_settings();
    let mut store = MemoryStore::new();
    let mut world = World::new(settings.clone(), &mut store).unwrap();

    world.tick();

    assert_eq!(world.tick_count(), 1);
    for (vehicle, spec) in world.traffic().iter().zip(&settings.traffic) {
        assert!((vehicle.pos.y - (spec.y - spec.max_speed)).abs() < 1e-4);
        assert!(!vehicle.is_damaged());
    }
}

#[test]
fn test_agents_collide_with_moved_traffic() {
    // Lanes narrower than a car, so neighbouring lanes overlap sideways.
    // The obstacle starts just behind the agent and moves into it.
    let settings = Settings {
        car_count: 1,
        lane_count: 9,
        spawn_lane: 4,
        traffic: vec![TrafficSpec {
            lane: 5,
            y: 151.0,
            max_speed: 2.0,
        }],
        ..create_test_settings()
    };
    let mut world = World::new(settings, &mut MemoryStore::new()).unwrap();

    let agent = &world.population().agents()[0];
    assert!(!polygons_intersect(agent.polygon(), world.traffic()[0].polygon()));

    world.tick();

    let agent = &world.population().agents()[0];
    assert!((world.traffic()[0].pos.y - 149.0).abs() < 1e-4);
    assert_eq!(agent.pos.y, 100.0);
    assert!(agent.is_damaged());
}

#[test]
fn test_reset_keeps_mutation_rate() {
    let settings = Settings {
        car_count: 3,
        mutation_rate: 0.25,
        ..create_test_settings()
    };
    let mut store = MemoryStore::new();
    let mut world = World::new(settings, &mut store).unwrap();

    world.reset(&mut store).unwrap();

    assert_eq!(world.population().mutation_rate(), 0.25);
    assert_eq!(world.generation(), 1);
}

#[test]
fn test_same_seed_same_run() {
    let settings = create_test_settings();
    let mut first = World::new(settings.clone(), &mut MemoryStore::new()).unwrap();
    let mut second = World::new(settings, &mut MemoryStore::new()).unwrap();

    for _ in 0..60 {
        first.tick();
        second.tick();
    }

    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn test_save_and_reset_seeds_from_leader() {
    let settings = create_test_settings();
    let mut store = MemoryStore::new();
    let mut world = World::new(settings, &mut store).unwrap();

    world.run(30);
    let leader = world.population().leader_brain().unwrap().clone();
    world.save_leader(&mut store).unwrap();
    assert!(store.json().is_some());

    world.reset(&mut store).unwrap();

    assert_eq!(world.generation(), 1);
    assert_eq!(world.tick_count(), 0);
    let agents = world.population().agents();
    assert_eq!(agents[0].brain().unwrap().to_flat_vector(), leader.to_flat_vector());
    assert_ne!(agents[1].brain().unwrap().to_flat_vector(), leader.to_flat_vector());
    assert_eq!(world.population().survivors(), agents.len());
}

#[test]
fn test_discard_saved_brain() {
    let settings = create_test_settings();
    let mut store = MemoryStore::new();
    let world = World::new(settings, &mut store).unwrap();

    world.save_leader(&mut store).unwrap();
    assert!(store.load().unwrap().is_some());

    world.discard_saved(&mut store).unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_corrupted_store_is_discarded() {
    let settings = create_test_settings();
    let mut store = MemoryStore::with_json("{ \"levels\": [ { \"weights\": ");

    let world = World::new(settings.clone(), &mut store).unwrap();

    assert!(store.json().is_none());
    assert_eq!(world.population().agents().len(), settings.car_count);
}

#[test]
fn test_mismatched_store_is_discarded() {
    let settings = create_test_settings();
    let mut store = MemoryStore::new();
    store.save(&forward_only_record(3)).unwrap();

    let world = World::new(settings.clone(), &mut store).unwrap();

    assert!(store.json().is_none());
    for agent in world.population().agents() {
        assert_eq!(agent.brain().unwrap().layout(), settings.layout());
    }
}

#[test]
fn test_run_stops_when_all_damaged() {
    // Cars are wider than the road and crash on the first tick.
    let settings = Settings {
        road_width: 20.0,
        lane_count: 1,
        spawn_lane: 0,
        traffic: Vec::new(),
        ..create_test_settings()
    };
    let mut world = World::new(settings, &mut MemoryStore::new()).unwrap();

    let summary = world.run(100);

    assert_eq!(summary.ticks, 1);
    assert_eq!(summary.survivors, 0);
    assert!(world.population().all_damaged());
}

#[test]
fn test_straight_corridor_run() {
    let settings = Settings {
        car_count: 5,
        mutation_rate: 0.0,
        lane_count: 2,
        spawn_lane: 0,
        hidden_layers: Vec::new(),
        traffic: Vec::new(),
        ..create_test_settings()
    };
    let mut store = MemoryStore::new();
    store.save(&forward_only_record(settings.ray_count)).unwrap();

    let mut world = World::new(settings.clone(), &mut store).unwrap();
    let start_x = world.road().lane_center(0);
    let summary = world.run(500);

    assert_eq!(summary.ticks, 500);
    assert_eq!(summary.survivors, settings.car_count);
    assert!(summary.best_progress > 1000.0);
    for agent in world.population().agents() {
        assert!(!agent.is_damaged());
        assert_eq!(agent.heading, 0.0);
        assert!((agent.pos.x - start_x).abs() < 1e-3);
    }
}

#[test]
fn test_snapshot_contents() {
    let settings = create_test_settings();
    let mut world = World::new(settings.clone(), &mut MemoryStore::new()).unwrap();
    world.tick();

    let snapshot = world.snapshot();

    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.generation, 0);
    assert_eq!(snapshot.agents.len(), settings.car_count);
    assert_eq!(snapshot.traffic.len(), settings.traffic.len());

    let agent = &snapshot.agents[0];
    assert_eq!(agent.corners.len(), 4);
    assert_eq!(agent.rays.len(), settings.ray_count);
    assert_eq!(agent.readings.len(), settings.ray_count);
    assert!(snapshot.traffic[0].rays.is_empty());

    let levels = snapshot.leader_brain.as_ref().unwrap();
    assert_eq!(levels.len(), settings.layout().len() - 1);
    assert_eq!(levels[0].inputs.len(), settings.ray_count);
    assert_eq!(
        Array1::from_vec(levels[0].inputs.clone()),
        world.population().leader().unwrap().sensor().unwrap().inputs()
    );

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"leader_brain\""));
}
