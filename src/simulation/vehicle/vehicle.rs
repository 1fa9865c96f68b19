//! Vehicle kinematics, outline and damage state.

use geo::{Coord, Line, LineString, Polygon};
use serde::{Deserialize, Serialize};

use super::super::brain::{Brain, CONTROL_OUTPUTS, ShapeError};
use super::super::geometric_utils::{polygon_crosses_segment, polygons_intersect};
use super::super::locatable::Locatable;
use super::super::road::Road;
use super::controls::{Controls, LanePolicy};
use super::sensor::Sensor;

/// Position and heading of a vehicle.
///
/// Heading is in radians; `0` points toward decreasing `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Centre of the vehicle.
    pub pos: Coord<f32>,
    /// Heading in radians.
    pub heading: f32,
}

/// Tunable physical constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    /// Speed gained per tick while `forward` is held.
    pub acceleration: f32,
    /// Speed lost per tick toward zero.
    pub friction: f32,
    /// Forward speed cap; reverse is capped at half of it.
    pub max_speed: f32,
    /// Base steering rate in radians per tick.
    pub handling: f32,
    /// Deceleration applied by `reverse` while still moving forward.
    pub brake_force: f32,
    /// Steering share available at any non-zero speed.
    pub steering_baseline: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            acceleration: 0.25,
            friction: 0.1,
            max_speed: 10.0,
            handling: 0.04,
            brake_force: 0.15,
            steering_baseline: 1.0,
        }
    }
}

/// Perception and decision equipment of an agent vehicle.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Ray fan used for perception.
    pub sensor: Sensor,
    /// Network that turns sensor inputs into controls.
    pub brain: Brain,
    /// Rule layer applied to raw brain output, if any.
    pub policy: Option<LanePolicy>,
}

impl Autopilot {
    /// Bundles a sensor, brain and optional policy.
    ///
    /// The brain must take one input per ray and produce the four control
    /// signals.
    pub fn new(sensor: Sensor, brain: Brain, policy: Option<LanePolicy>) -> Result<Self, ShapeError> {
        if brain.input_count() != sensor.ray_count() {
            return Err(ShapeError::SensorInputs {
                expected: sensor.ray_count(),
                actual: brain.input_count(),
            });
        }
        let outputs = brain.layout().last().copied().unwrap_or(0);
        if outputs != CONTROL_OUTPUTS {
            return Err(ShapeError::ControlOutputs {
                expected: CONTROL_OUTPUTS,
                actual: outputs,
            });
        }
        Ok(Self {
            sensor,
            brain,
            policy,
        })
    }
}

/// Closed set of vehicle behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    /// Perceives, decides and can be damaged.
    Agent,
    /// Cruises straight at a fixed speed; traffic.
    Obstacle,
}

/// A rectangular vehicle on the road.
///
/// A vehicle is either an agent (it carries an [`Autopilot`]) or an obstacle
/// (it does not). Once damaged a vehicle never moves again.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Centre position.
    pub pos: Coord<f32>,
    /// Heading in radians, `0` = toward negative `y`.
    pub heading: f32,
    /// Signed scalar speed, positive = forward.
    pub speed: f32,
    /// Extent across the direction of travel.
    pub width: f32,
    /// Extent along the direction of travel.
    pub height: f32,
    /// Physical constants.
    pub physics: Physics,
    /// Controls applied on the next update.
    pub controls: Controls,
    damaged: bool,
    polygon: Polygon<f32>,
    autopilot: Option<Autopilot>,
}

impl Vehicle {
    /// Creates an obstacle that cruises at `max_speed`.
    pub fn obstacle(pos: Coord<f32>, width: f32, height: f32, max_speed: f32) -> Self {
        let physics = Physics {
            max_speed,
            ..Physics::default()
        };
        Self::build(pos, width, height, physics, None)
    }

    /// Creates an agent driven by `autopilot`.
    pub fn agent(
        pos: Coord<f32>,
        width: f32,
        height: f32,
        physics: Physics,
        autopilot: Autopilot,
    ) -> Self {
        let mut vehicle = Self::build(pos, width, height, physics, Some(autopilot));
        let pose = vehicle.pose();
        if let Some(autopilot) = &mut vehicle.autopilot {
            autopilot.sensor.aim(pose);
        }
        vehicle
    }

    fn build(
        pos: Coord<f32>,
        width: f32,
        height: f32,
        physics: Physics,
        autopilot: Option<Autopilot>,
    ) -> Self {
        let mut vehicle = Self {
            pos,
            heading: 0.0,
            speed: 0.0,
            width,
            height,
            physics,
            controls: Controls::default(),
            damaged: false,
            polygon: Polygon::new(LineString::new(Vec::new()), Vec::new()),
            autopilot,
        };
        vehicle.refresh_polygon();
        vehicle
    }

    /// Which behaviour this vehicle follows.
    pub fn kind(&self) -> VehicleKind {
        if self.autopilot.is_some() {
            VehicleKind::Agent
        } else {
            VehicleKind::Obstacle
        }
    }

    /// The vehicle's autopilot, if it is an agent.
    pub fn autopilot(&self) -> Option<&Autopilot> {
        self.autopilot.as_ref()
    }

    /// The vehicle's sensor, if it is an agent.
    pub fn sensor(&self) -> Option<&Sensor> {
        self.autopilot.as_ref().map(|a| &a.sensor)
    }

    /// The vehicle's brain, if it is an agent.
    pub fn brain(&self) -> Option<&Brain> {
        self.autopilot.as_ref().map(|a| &a.brain)
    }

    /// Mutable access to the brain, if it is an agent.
    pub fn brain_mut(&mut self) -> Option<&mut Brain> {
        self.autopilot.as_mut().map(|a| &mut a.brain)
    }

    /// Whether the vehicle has crashed.
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// Outline computed from the current pose.
    pub fn polygon(&self) -> &Polygon<f32> {
        &self.polygon
    }

    /// Current pose.
    pub fn pose(&self) -> Pose {
        Pose {
            pos: self.pos,
            heading: self.heading,
        }
    }

    /// Moves the vehicle and recomputes its outline.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pos = pose.pos;
        self.heading = pose.heading;
        self.refresh_polygon();
    }

    /// Advances the vehicle by one tick.
    ///
    /// Agents move from their current controls, recompute their outline,
    /// check for damage against `road` borders and `traffic`, then sense and
    /// choose the controls for the next tick. Obstacles only cruise.
    pub fn update(&mut self, road: &Road, traffic: &[&Polygon<f32>]) {
        let borders = road.borders();

        if !self.damaged {
            match self.kind() {
                VehicleKind::Agent => {
                    self.drive();
                    self.refresh_polygon();
                    self.damaged = self.assess_damage(&borders, traffic);
                }
                VehicleKind::Obstacle => {
                    self.cruise();
                    self.refresh_polygon();
                }
            }
        }

        let pose = self.pose();
        let damaged = self.damaged;
        if let Some(autopilot) = &mut self.autopilot {
            autopilot.sensor.update(pose, &borders, traffic);
            if !damaged {
                let outputs = autopilot.brain.feed_forward(&autopilot.sensor.inputs());
                let raw = Controls::from_outputs(&outputs);
                self.controls = match &autopilot.policy {
                    Some(policy) => policy.apply(raw, &autopilot.sensor, pose, road),
                    None => raw,
                };
            }
        }
    }

    /// Integrates the current controls into speed, heading and position.
    pub fn drive(&mut self) {
        let Physics {
            acceleration,
            friction,
            max_speed,
            handling,
            brake_force,
            steering_baseline,
        } = self.physics;

        if self.controls.forward {
            self.speed += acceleration;
        }
        if self.controls.reverse {
            if self.speed > 0.0 {
                self.speed -= brake_force;
            } else {
                self.speed -= acceleration;
            }
        }

        self.speed = self.speed.clamp(-max_speed / 2.0, max_speed);

        if self.speed > 0.0 {
            self.speed -= friction;
        } else if self.speed < 0.0 {
            self.speed += friction;
        }
        if self.speed.abs() < friction {
            self.speed = 0.0;
        }

        if self.speed != 0.0 {
            let flip = self.speed.signum();
            let turn = handling * (steering_baseline + (self.speed / max_speed).abs());
            if self.controls.left {
                self.heading += turn * flip;
            }
            if self.controls.right {
                self.heading -= turn * flip;
            }
        }

        self.advance();
    }

    /// Moves straight ahead at the speed cap.
    pub fn cruise(&mut self) {
        self.speed = self.physics.max_speed;
        self.advance();
    }

    fn advance(&mut self) {
        self.pos.x -= self.heading.sin() * self.speed;
        self.pos.y -= self.heading.cos() * self.speed;
    }

    /// Rebuilds the outline from the current pose.
    pub fn refresh_polygon(&mut self) {
        let radius = self.bounding_radius();
        let alpha = self.width.atan2(self.height);
        let corner = |angle: f32| Coord {
            x: self.pos.x - angle.sin() * radius,
            y: self.pos.y - angle.cos() * radius,
        };
        let pi = std::f32::consts::PI;
        let corners = vec![
            corner(self.heading - alpha),
            corner(self.heading + alpha),
            corner(pi + self.heading - alpha),
            corner(pi + self.heading + alpha),
        ];
        self.polygon = Polygon::new(LineString::new(corners), Vec::new());
    }

    /// Returns `true` if the outline crosses a border or any traffic outline.
    pub fn assess_damage(&self, borders: &[Line<f32>], traffic: &[&Polygon<f32>]) -> bool {
        borders
            .iter()
            .any(|border| polygon_crosses_segment(&self.polygon, border))
            || traffic
                .iter()
                .any(|other| polygons_intersect(&self.polygon, other))
    }
}

impl Locatable for Vehicle {
    fn pos(&self) -> Coord<f32> {
        self.pos
    }

    fn bounding_radius(&self) -> f32 {
        self.width.hypot(self.height) / 2.0
    }
}
