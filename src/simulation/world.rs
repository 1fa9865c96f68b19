//! The road, its traffic and one generation of agents.
//!
//! A tick moves all traffic first, rebuilds the spatial index over the moved
//! traffic, then moves every agent in index order. Agents never see each
//! other.

use geo::Coord;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::brain::{Brain, ShapeError};
use super::evolution::Population;
use super::params::{Settings, SettingsError};
use super::rng::create_rng;
use super::road::Road;
use super::snapshot::{Snapshot, VehicleState, brain_state};
use super::spatial::SpatialIndex;
use super::storage::{BrainStore, StoreError};
use super::vehicle::Vehicle;

/// Errors raised while building a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The settings are out of range.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// A brain could not be built for the configured layout.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Outcome of a generation so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation counter.
    pub generation: u64,
    /// Ticks run in this generation.
    pub ticks: u64,
    /// Agents still undamaged.
    pub survivors: usize,
    /// Agents spawned.
    pub agents: usize,
    /// Leader's distance from the spawn point.
    pub best_progress: f32,
    /// Index of the leader.
    pub leader: usize,
}

/// A complete simulation: road, traffic and population.
#[derive(Debug, Clone)]
pub struct World {
    settings: Settings,
    road: Road,
    traffic: Vec<Vehicle>,
    population: Population,
    tick: u64,
    generation: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world seeded from `settings.seed`.
    ///
    /// The first generation is seeded from `store` when it holds a brain that
    /// fits the configured layout.
    pub fn new(settings: Settings, store: &mut dyn BrainStore) -> Result<Self, WorldError> {
        let rng = create_rng(settings.seed);
        Self::with_rng(settings, store, rng)
    }

    /// Creates a world that draws randomness from `rng`.
    pub fn with_rng(
        settings: Settings,
        store: &mut dyn BrainStore,
        mut rng: ChaCha8Rng,
    ) -> Result<Self, WorldError> {
        settings.validate()?;
        let road = Road::new(settings.road_x, settings.road_width, settings.lane_count);
        let traffic = spawn_traffic(&settings, &road);
        let elite = load_elite(store, &settings.layout());
        let population = Population::new(&settings, &road, elite.as_ref(), &mut rng)?;

        info!(
            agents = settings.car_count,
            traffic = traffic.len(),
            seeded = elite.is_some(),
            "Created world"
        );

        Ok(Self {
            settings,
            road,
            traffic,
            population,
            tick: 0,
            generation: 0,
            rng,
        })
    }

    /// Advances the whole world by one tick.
    pub fn tick(&mut self) {
        for vehicle in &mut self.traffic {
            vehicle.update(&self.road, &[]);
        }

        let index = SpatialIndex::build(&self.traffic).unwrap_or_else(|err| {
            warn!(error = %err, "Falling back to exhaustive traffic queries");
            SpatialIndex::exhaustive(&self.traffic)
        });

        self.population.tick(&self.road, &self.traffic, &index);
        self.tick += 1;
    }

    /// Runs up to `max_ticks` ticks, stopping early once every agent is
    /// damaged.
    pub fn run(&mut self, max_ticks: u64) -> GenerationSummary {
        for _ in 0..max_ticks {
            if self.population.all_damaged() {
                break;
            }
            self.tick();
        }
        let summary = self.summary();
        debug!(
            generation = summary.generation,
            ticks = summary.ticks,
            survivors = summary.survivors,
            best_progress = summary.best_progress,
            "Generation run finished"
        );
        summary
    }

    /// Starts a new generation from the brain in `store`.
    ///
    /// Traffic is rebuilt from the layout. A stored brain that cannot be read
    /// or does not fit the layout is discarded and the generation starts from
    /// random brains.
    pub fn reset(&mut self, store: &mut dyn BrainStore) -> Result<(), WorldError> {
        let elite = load_elite(store, &self.settings.layout());
        self.population = Population::new(&self.settings, &self.road, elite.as_ref(), &mut self.rng)?;
        self.traffic = spawn_traffic(&self.settings, &self.road);
        self.tick = 0;
        self.generation += 1;
        info!(
            generation = self.generation,
            seeded = elite.is_some(),
            mutation_rate = self.population.mutation_rate(),
            "Started generation"
        );
        Ok(())
    }

    /// Stores the current leader's brain.
    pub fn save_leader(&self, store: &mut dyn BrainStore) -> Result<(), StoreError> {
        let Some(brain) = self.population.leader_brain() else {
            return Ok(());
        };
        store.save(&brain.to_record())?;
        info!(
            leader = self.population.leader_index(),
            progress = self.population.best_progress(),
            "Saved leader brain"
        );
        Ok(())
    }

    /// Removes any stored brain.
    pub fn discard_saved(&self, store: &mut dyn BrainStore) -> Result<(), StoreError> {
        store.discard()?;
        info!("Discarded saved brain");
        Ok(())
    }

    /// Render state of the current tick.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            generation: self.generation,
            leader: self.population.leader_index(),
            agents: self.population.agents().iter().map(VehicleState::from).collect(),
            traffic: self.traffic.iter().map(VehicleState::from).collect(),
            leader_brain: self.population.leader_brain().map(brain_state),
        }
    }

    /// Summary of the current generation.
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            generation: self.generation,
            ticks: self.tick,
            survivors: self.population.survivors(),
            agents: self.population.agents().len(),
            best_progress: self.population.best_progress(),
            leader: self.population.leader_index(),
        }
    }

    /// Settings the world was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The road.
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// Traffic vehicles in layout order.
    pub fn traffic(&self) -> &[Vehicle] {
        &self.traffic
    }

    /// The current generation's agents.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Ticks since the generation started.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Generations started since creation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn spawn_traffic(settings: &Settings, road: &Road) -> Vec<Vehicle> {
    settings
        .traffic
        .iter()
        .map(|spec| {
            let pos = Coord {
                x: road.lane_center(spec.lane),
                y: spec.y,
            };
            Vehicle::obstacle(pos, settings.car_width, settings.car_height, spec.max_speed)
        })
        .collect()
}

/// Loads the stored brain if it fits `layout`.
///
/// Anything unusable is discarded from the store so it is not retried.
fn load_elite(store: &mut dyn BrainStore, layout: &[usize]) -> Option<Brain> {
    let problem = match store.load() {
        Ok(None) => return None,
        Ok(Some(record)) => match Brain::from_record(&record, layout) {
            Ok(brain) => return Some(brain),
            Err(err) => err.to_string(),
        },
        Err(err) => err.to_string(),
    };

    warn!(error = %problem, "Discarding unusable saved brain");
    if let Err(err) = store.discard() {
        warn!(error = %err, "Failed to discard saved brain");
    }
    None
}
