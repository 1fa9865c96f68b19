//! Read-only render state of a world at one tick.

use serde::{Deserialize, Serialize};

use super::brain::{Brain, Level};
use super::vehicle::Vehicle;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks since the generation started.
    pub tick: u64,
    /// Generation counter.
    pub generation: u64,
    /// Index of the leading agent.
    pub leader: usize,
    /// Agents in spawn order.
    pub agents: Vec<VehicleState>,
    /// Traffic vehicles in layout order.
    pub traffic: Vec<VehicleState>,
    /// The leader's network with its last activations.
    pub leader_brain: Option<Vec<LevelState>>,
}

/// Pose, outline and perception of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Centre `x`.
    pub x: f32,
    /// Centre `y`.
    pub y: f32,
    /// Heading in radians.
    pub heading: f32,
    /// Signed speed.
    pub speed: f32,
    /// Whether the vehicle has crashed.
    pub damaged: bool,
    /// Outline corners, not closed.
    pub corners: Vec<[f32; 2]>,
    /// Ray start and end points; empty for traffic.
    pub rays: Vec<[[f32; 2]; 2]>,
    /// Closest hit per ray as `[x, y, offset]`.
    pub readings: Vec<Option<[f32; 3]>>,
}

/// Parameters and last activations of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    /// Inputs of the last recorded pass.
    pub inputs: Vec<f32>,
    /// Outputs of the last recorded pass.
    pub outputs: Vec<f32>,
    /// One row per input neuron.
    pub weights: Vec<Vec<f32>>,
    /// One bias per output neuron.
    pub biases: Vec<f32>,
}

impl From<&Vehicle> for VehicleState {
    fn from(vehicle: &Vehicle) -> Self {
        let ring = &vehicle.polygon().exterior().0;
        let open = ring.len().saturating_sub(1);
        let corners = ring.iter().take(open).map(|c| [c.x, c.y]).collect();

        let (rays, readings) = match vehicle.sensor() {
            Some(sensor) => (
                sensor
                    .rays()
                    .iter()
                    .map(|ray| [[ray.start.x, ray.start.y], [ray.end.x, ray.end.y]])
                    .collect(),
                sensor
                    .readings()
                    .iter()
                    .map(|r| r.map(|r| [r.point.x, r.point.y, r.offset]))
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            x: vehicle.pos.x,
            y: vehicle.pos.y,
            heading: vehicle.heading,
            speed: vehicle.speed,
            damaged: vehicle.is_damaged(),
            corners,
            rays,
            readings,
        }
    }
}

impl From<&Level> for LevelState {
    fn from(level: &Level) -> Self {
        Self {
            inputs: level.inputs.to_vec(),
            outputs: level.outputs.to_vec(),
            weights: level.weights.rows().into_iter().map(|row| row.to_vec()).collect(),
            biases: level.biases.to_vec(),
        }
    }
}

pub(crate) fn brain_state(brain: &Brain) -> Vec<LevelState> {
    brain.levels().iter().map(LevelState::from).collect()
}
