#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roadevo::simulation::brain::Brain;
use roadevo::simulation::params::{Settings, SettingsError, TrafficSpec};
use roadevo::simulation::storage::{BrainStore, JsonFileStore, MemoryStore, StoreError};
use roadevo::simulation::world::World;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("roadevo_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_json_file_store_round_trip() {
    let path = temp_path("store_round_trip");
    let mut store = JsonFileStore::new(&path);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let record = Brain::new_random(&[5, 6, 4], &mut rng).unwrap().to_record();

    store.save(&record).unwrap();
    assert!(path.exists());
    assert_eq!(store.load().unwrap(), Some(record));

    store.discard().unwrap();
    assert!(!path.exists());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_json_file_store_missing_file() {
    let path = temp_path("store_missing");
    let _ = fs::remove_file(&path);
    let mut store = JsonFileStore::new(&path);

    assert_eq!(store.load().unwrap(), None);
    store.discard().unwrap();
}

#[test]
fn test_json_file_store_corrupted_file() {
    let path = temp_path("store_corrupted");
    fs::write(&path, "not a brain").unwrap();
    let store = JsonFileStore::new(&path);

    assert!(matches!(store.load(), Err(StoreError::Json(_))));

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_world_discards_corrupted_file() {
    let path = temp_path("world_corrupted");
    fs::write(&path, "{\"levels\": 3}").unwrap();
    let mut store = JsonFileStore::new(&path);

    let settings = Settings {
        car_count: 4,
        ..Settings::default()
    };
    let world = World::new(settings, &mut store).unwrap();

    assert!(!path.exists());
    assert_eq!(world.population().agents().len(), 4);
}

#[test]
fn test_memory_store() {
    let mut store = MemoryStore::new();
    assert_eq!(store.load().unwrap(), None);

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let record = Brain::new_random(&[2, 4], &mut rng).unwrap().to_record();
    store.save(&record).unwrap();
    assert_eq!(store.load().unwrap(), Some(record));

    store.discard().unwrap();
    assert_eq!(store.json(), None);
}

#[test]
fn test_default_settings_are_valid() {
    let settings = Settings::default();
    settings.validate().unwrap();

    assert_eq!(settings.car_count, 100);
    assert_eq!(settings.max_speed, 4.0);
    assert_eq!(settings.mutation_rate, 0.1);
    assert_eq!(settings.layout(), vec![5, 6, 4]);
    assert_eq!(settings.traffic.len(), 11);
    assert!(settings.lane_policy().is_some());
}

#[test]
fn test_invalid_settings() {
    let base = Settings::default();

    let no_cars = Settings {
        car_count: 0,
        ..base.clone()
    };
    assert!(matches!(no_cars.validate(), Err(SettingsError::NoCars)));

    let bad_speed = Settings {
        max_speed: f32::NAN,
        ..base.clone()
    };
    assert!(matches!(bad_speed.validate(), Err(SettingsError::MaxSpeed(_))));

    let bad_rate = Settings {
        mutation_rate: 1.5,
        ..base.clone()
    };
    assert!(matches!(bad_rate.validate(), Err(SettingsError::MutationRate(_))));

    let empty_layer = Settings {
        hidden_layers: vec![6, 0],
        ..base.clone()
    };
    assert!(matches!(
        empty_layer.validate(),
        Err(SettingsError::EmptyHiddenLayer { index: 1 })
    ));

    let bad_lane = Settings {
        traffic: vec![TrafficSpec {
            lane: 4,
            y: 0.0,
            max_speed: 2.0,
        }],
        ..base
    };
    assert!(matches!(
        bad_lane.validate(),
        Err(SettingsError::TrafficLane {
            index: 0,
            lane: 4,
            lane_count: 4
        })
    ));
}

#[test]
fn test_partial_settings_use_defaults() {
    let settings: Settings = serde_json::from_str("{ \"car_count\": 3, \"lane_rules\": false }").unwrap();

    assert_eq!(settings.car_count, 3);
    assert!(settings.lane_policy().is_none());
    assert_eq!(settings.ray_count, Settings::default().ray_count);
}

#[test]
fn test_settings_file_round_trip() {
    let path = temp_path("settings");
    let settings = Settings {
        car_count: 12,
        hidden_layers: vec![8, 5],
        ..Settings::default()
    };

    settings.save_to_file(&path).unwrap();
    let loaded = Settings::load_from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(loaded, settings);
}
