//! Vehicle module containing kinematics, perception and control policy.

mod controls;
mod sensor;
mod vehicle;

pub use controls::{Controls, LanePolicy};
pub use sensor::{Reading, Sensor};
pub use vehicle::*;
