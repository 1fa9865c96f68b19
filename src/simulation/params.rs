//! Simulation settings.
//!
//! Settings are plain serde data with defaults for every field, so a settings
//! file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::brain::CONTROL_OUTPUTS;
use super::vehicle::{LanePolicy, Physics};

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The population must contain at least one car.
    #[error("car_count must be positive")]
    NoCars,
    /// The agent speed cap must be positive.
    #[error("max_speed must be positive, got {0}")]
    MaxSpeed(f32),
    /// The mutation rate is a blend factor.
    #[error("mutation_rate must be within [0, 1], got {0}")]
    MutationRate(f32),
    /// The road needs at least one lane.
    #[error("lane_count must be positive")]
    NoLanes,
    /// The road must have a positive width.
    #[error("road_width must be positive, got {0}")]
    RoadWidth(f32),
    /// Sensors need at least one ray.
    #[error("ray_count must be positive")]
    NoRays,
    /// Rays must have a positive length.
    #[error("ray_length must be positive, got {0}")]
    RayLength(f32),
    /// Hidden layers cannot be empty.
    #[error("hidden layer {index} has zero neurons")]
    EmptyHiddenLayer {
        /// Position in `hidden_layers`.
        index: usize,
    },
    /// A traffic entry names a lane the road does not have.
    #[error("traffic entry {index} uses lane {lane} but the road has {lane_count} lanes")]
    TrafficLane {
        /// Position in `traffic`.
        index: usize,
        /// Lane requested.
        lane: usize,
        /// Lanes available.
        lane_count: usize,
    },
    /// Reading the settings file failed.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON.
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// One cruising traffic vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSpec {
    /// Lane index.
    pub lane: usize,
    /// Starting `y`.
    pub y: f32,
    /// Cruising speed.
    pub max_speed: f32,
}

impl TrafficSpec {
    const fn new(lane: usize, y: f32, max_speed: f32) -> Self {
        Self { lane, y, max_speed }
    }
}

/// Simulation parameters that control the road, the population and evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of agents per generation.
    pub car_count: usize,
    /// Speed cap of agent vehicles.
    pub max_speed: f32,
    /// Mutation amount applied to every non-elite agent.
    pub mutation_rate: f32,
    /// Seed for the simulation's random generator.
    pub seed: u64,
    /// Horizontal centre of the road.
    pub road_x: f32,
    /// Total road width.
    pub road_width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Lane the agents start in.
    pub spawn_lane: usize,
    /// `y` the agents start at.
    pub spawn_y: f32,
    /// Vehicle width.
    pub car_width: f32,
    /// Vehicle length.
    pub car_height: f32,
    /// Speed gained per tick while accelerating.
    pub acceleration: f32,
    /// Speed lost per tick to friction.
    pub friction: f32,
    /// Base steering rate.
    pub handling: f32,
    /// Deceleration when braking from forward motion.
    pub brake_force: f32,
    /// Steering share available at any non-zero speed.
    pub steering_baseline: f32,
    /// Rays per sensor.
    pub ray_count: usize,
    /// Length of each ray.
    pub ray_length: f32,
    /// Angle covered by the ray fan, in radians.
    pub ray_spread: f32,
    /// Hidden layer sizes between sensor inputs and control outputs.
    pub hidden_layers: Vec<usize>,
    /// Whether the lane policy overrides raw brain output.
    pub lane_rules: bool,
    /// Offset below which a reading ahead forces braking.
    pub brake_offset: f32,
    /// Half-angle of the cone considered "ahead".
    pub forward_cone: f32,
    /// Traffic layout.
    pub traffic: Vec<TrafficSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        let physics = Physics::default();
        let policy = LanePolicy::default();
        Self {
            car_count: 100,
            max_speed: 4.0,
            mutation_rate: 0.1,
            seed: 42,
            road_x: 100.0,
            road_width: 180.0,
            lane_count: 4,
            spawn_lane: 1,
            spawn_y: 100.0,
            car_width: 30.0,
            car_height: 50.0,
            acceleration: physics.acceleration,
            friction: physics.friction,
            handling: physics.handling,
            brake_force: physics.brake_force,
            steering_baseline: physics.steering_baseline,
            ray_count: 5,
            ray_length: 150.0,
            ray_spread: std::f32::consts::FRAC_PI_2,
            hidden_layers: vec![6],
            lane_rules: true,
            brake_offset: policy.brake_offset,
            forward_cone: policy.forward_cone,
            traffic: vec![
                TrafficSpec::new(0, -100.0, 2.0),
                TrafficSpec::new(0, -400.0, 2.1),
                TrafficSpec::new(0, -700.0, 1.9),
                TrafficSpec::new(1, -150.0, 2.2),
                TrafficSpec::new(1, -500.0, 2.0),
                TrafficSpec::new(1, -850.0, 2.3),
                TrafficSpec::new(2, -300.0, 2.5),
                TrafficSpec::new(2, -600.0, 2.1),
                TrafficSpec::new(3, -50.0, 1.8),
                TrafficSpec::new(3, -350.0, 2.2),
                TrafficSpec::new(3, -650.0, 2.0),
            ],
        }
    }
}

impl Settings {
    /// Checks every option against its valid range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.car_count == 0 {
            return Err(SettingsError::NoCars);
        }
        if self.max_speed.is_nan() || self.max_speed <= 0.0 {
            return Err(SettingsError::MaxSpeed(self.max_speed));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SettingsError::MutationRate(self.mutation_rate));
        }
        if self.lane_count == 0 {
            return Err(SettingsError::NoLanes);
        }
        if self.road_width.is_nan() || self.road_width <= 0.0 {
            return Err(SettingsError::RoadWidth(self.road_width));
        }
        if self.ray_count == 0 {
            return Err(SettingsError::NoRays);
        }
        if self.ray_length.is_nan() || self.ray_length <= 0.0 {
            return Err(SettingsError::RayLength(self.ray_length));
        }
        if let Some(index) = self.hidden_layers.iter().position(|&n| n == 0) {
            return Err(SettingsError::EmptyHiddenLayer { index });
        }
        if let Some((index, spec)) = self
            .traffic
            .iter()
            .enumerate()
            .find(|(_, spec)| spec.lane >= self.lane_count)
        {
            return Err(SettingsError::TrafficLane {
                index,
                lane: spec.lane,
                lane_count: self.lane_count,
            });
        }
        Ok(())
    }

    /// Neuron counts of an agent brain: rays, hidden layers, controls.
    pub fn layout(&self) -> Vec<usize> {
        let mut layout = Vec::with_capacity(self.hidden_layers.len() + 2);
        layout.push(self.ray_count);
        layout.extend(&self.hidden_layers);
        layout.push(CONTROL_OUTPUTS);
        layout
    }

    /// Physical constants of an agent vehicle.
    pub fn agent_physics(&self) -> Physics {
        Physics {
            acceleration: self.acceleration,
            friction: self.friction,
            max_speed: self.max_speed,
            handling: self.handling,
            brake_force: self.brake_force,
            steering_baseline: self.steering_baseline,
        }
    }

    /// Lane policy for agents, if enabled.
    pub fn lane_policy(&self) -> Option<LanePolicy> {
        self.lane_rules.then_some(LanePolicy {
            brake_offset: self.brake_offset,
            forward_cone: self.forward_cone,
        })
    }

    /// Saves the settings as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads settings from a JSON file and validates them.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }
}
