//! Control signals and the lane policy applied on top of raw brain output.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::super::road::Road;
use super::Pose;
use super::sensor::Sensor;

/// The four discrete driving signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Accelerate.
    pub forward: bool,
    /// Steer left (increase heading).
    pub left: bool,
    /// Steer right (decrease heading).
    pub right: bool,
    /// Brake, then reverse.
    pub reverse: bool,
}

impl Controls {
    /// Controls with only `forward` held.
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Reads controls from brain outputs ordered forward, left, right, reverse.
    ///
    /// Missing outputs read as released.
    pub fn from_outputs(outputs: &Array1<f32>) -> Self {
        let on = |i: usize| outputs.get(i).is_some_and(|&v| v > 0.0);
        Self {
            forward: on(0),
            left: on(1),
            right: on(2),
            reverse: on(3),
        }
    }
}

/// Safety rules that override the brain's raw output.
///
/// Two rules are applied in order:
///
/// 1. Forced braking: when a ray inside the forward cone reports a hit closer
///    than `brake_offset` and that hit lies in the vehicle's own lane, forward
///    is released and reverse is held.
/// 2. Edge suppression: in the leftmost lane the left signal is released, in
///    the rightmost lane the right signal is released.
///
/// The brain's parameters are never modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanePolicy {
    /// Readings with a smaller offset trigger forced braking.
    pub brake_offset: f32,
    /// Half-angle in radians around the heading that counts as "ahead".
    pub forward_cone: f32,
}

impl Default for LanePolicy {
    fn default() -> Self {
        Self {
            brake_offset: 0.3,
            forward_cone: 0.3,
        }
    }
}

impl LanePolicy {
    /// Applies the rules to `raw` for a vehicle at `pose` using its sensor.
    pub fn apply(&self, raw: Controls, sensor: &Sensor, pose: Pose, road: &Road) -> Controls {
        let mut controls = raw;
        let lane = road.lane_index(pose.pos.x);

        let blocked = sensor
            .readings()
            .iter()
            .enumerate()
            .filter(|(i, _)| sensor.ray_angle(*i).abs() <= self.forward_cone)
            .filter_map(|(_, reading)| *reading)
            .any(|r| r.offset < self.brake_offset && road.lane_index(r.point.x) == lane);

        if blocked {
            controls.forward = false;
            controls.reverse = true;
        }

        if road.is_leftmost(lane) {
            controls.left = false;
        }
        if road.is_rightmost(lane) {
            controls.right = false;
        }

        controls
    }
}
