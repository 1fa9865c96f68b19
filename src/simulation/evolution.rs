//! Population of agents and mutation-only evolution.
//!
//! A generation is a fixed set of agents driving in lock-step. The elite brain
//! (if any) is copied into agent 0 unchanged and every other agent gets a
//! mutated copy of it. There is no crossover and no in-run reproduction.

use geo::{Coord, Polygon};
use rand::Rng;
use tracing::debug;

use super::brain::{Brain, ShapeError};
use super::locatable::Locatable;
use super::params::Settings;
use super::road::Road;
use super::spatial::SpatialIndex;
use super::vehicle::{Autopilot, Sensor, Vehicle};

/// The agents of one generation and their current leader.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Vehicle>,
    leader: usize,
    spawn: Coord<f32>,
    mutation_rate: f32,
}

impl Population {
    /// Spawns `settings.car_count` agents on the spawn lane.
    ///
    /// # Arguments
    ///
    /// * `settings` - Population, vehicle and sensor options
    /// * `road` - Road the agents spawn on
    /// * `elite` - Brain to seed the generation from, if any
    /// * `rng` - Random number generator
    pub fn new<R: Rng + ?Sized>(
        settings: &Settings,
        road: &Road,
        elite: Option<&Brain>,
        rng: &mut R,
    ) -> Result<Self, ShapeError> {
        let spawn = Coord {
            x: road.lane_center(settings.spawn_lane),
            y: settings.spawn_y,
        };
        let layout = settings.layout();

        let mut agents = Vec::with_capacity(settings.car_count);
        for i in 0..settings.car_count {
            let brain = match elite {
                Some(elite) if i == 0 => elite.clone(),
                Some(elite) => {
                    let mut brain = elite.clone();
                    brain.mutate(settings.mutation_rate, rng);
                    brain
                }
                None => Brain::new_random(&layout, rng)?,
            };
            let sensor = Sensor::new(settings.ray_count, settings.ray_length, settings.ray_spread);
            let autopilot = Autopilot::new(sensor, brain, settings.lane_policy())?;
            agents.push(Vehicle::agent(
                spawn,
                settings.car_width,
                settings.car_height,
                settings.agent_physics(),
                autopilot,
            ));
        }

        debug!(
            agents = agents.len(),
            seeded = elite.is_some(),
            "Spawned population"
        );

        Ok(Self {
            agents,
            leader: 0,
            spawn,
            mutation_rate: settings.mutation_rate,
        })
    }

    /// Advances every agent by one tick, in index order.
    ///
    /// Each agent only sees the traffic outlines that `index` reports within
    /// reach of its sensor and body. `traffic` must be the slice `index` was
    /// built from.
    pub fn tick(&mut self, road: &Road, traffic: &[Vehicle], index: &SpatialIndex) {
        for agent in &mut self.agents {
            let ray_length = agent.sensor().map_or(0.0, Sensor::ray_length);
            let reach = ray_length + agent.bounding_radius() + agent.physics.max_speed;
            let nearby: Vec<&Polygon<f32>> = index
                .near(agent.pos, reach)
                .into_iter()
                .filter_map(|i| traffic.get(i))
                .map(Vehicle::polygon)
                .collect();
            agent.update(road, &nearby);
        }
        self.leader = select_leader(&self.agents).unwrap_or(0);
    }

    /// All agents in spawn order.
    pub fn agents(&self) -> &[Vehicle] {
        &self.agents
    }

    /// Index of the current leader.
    pub fn leader_index(&self) -> usize {
        self.leader
    }

    /// The current leader, `None` for an empty population.
    pub fn leader(&self) -> Option<&Vehicle> {
        self.agents.get(self.leader)
    }

    /// Brain of the current leader.
    pub fn leader_brain(&self) -> Option<&Brain> {
        self.leader().and_then(Vehicle::brain)
    }

    /// Mutation amount this generation was seeded with.
    pub fn mutation_rate(&self) -> f32 {
        self.mutation_rate
    }

    /// Number of undamaged agents.
    pub fn survivors(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_damaged()).count()
    }

    /// Returns `true` when no agent can move anymore.
    pub fn all_damaged(&self) -> bool {
        self.agents.iter().all(Vehicle::is_damaged)
    }

    /// Distance the leader has travelled from the spawn point along the road.
    pub fn best_progress(&self) -> f32 {
        self.leader().map_or(0.0, |leader| self.spawn.y - leader.pos.y)
    }
}

/// Picks the agent furthest along the road.
///
/// Undamaged agents are preferred; the smallest `y` wins and an exact tie
/// keeps the earlier agent. When every agent is damaged the smallest `y`
/// overall wins. Returns `None` for an empty slice.
pub fn select_leader(agents: &[Vehicle]) -> Option<usize> {
    furthest(agents, |a| !a.is_damaged()).or_else(|| furthest(agents, |_| true))
}

fn furthest(agents: &[Vehicle], eligible: impl Fn(&Vehicle) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, agent) in agents.iter().enumerate().filter(|(_, a)| eligible(*a)) {
        if best.is_none_or(|(_, y)| agent.pos.y < y) {
            best = Some((i, agent.pos.y));
        }
    }
    best.map(|(i, _)| i)
}
