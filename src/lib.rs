//! # Roadevo - Neuroevolution of Self-Driving Cars
//!
//! A headless simulation of a population of cars learning to drive down a
//! multi-lane road through mutation of a stored best network.
//!
//! ## Features
//!
//! - Ray fan sensors against road borders and traffic outlines
//! - Step-activation feed-forward networks
//! - Mutation-only evolution seeded from the best car of a previous run
//! - Lane rules layered over raw network output
//! - JSON persistence of settings and networks
//!
//! ## Core Modules
//!
//! - [`simulation::world`] - Tick loop, generation reset and snapshots
//! - [`simulation::evolution`] - Population and leader selection
//! - [`simulation::vehicle`] - Kinematics, sensor and controls
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::geometric_utils`] - Segment and polygon intersection

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for vehicle autopilots.
    pub mod brain;
    /// Population of agents and leader selection.
    pub mod evolution;
    /// Geometric utility functions for intersection tests.
    pub mod geometric_utils;
    /// Trait for entities with a position and a bounding circle.
    ///
    /// The [`locatable::Locatable`] trait is implemented by [`vehicle::Vehicle`]
    /// so traffic can be indexed spatially.
    pub mod locatable;
    /// Simulation parameters.
    pub mod params;
    /// Deterministic random number generation.
    pub mod rng;
    /// The road the vehicles drive on.
    pub mod road;
    /// Serialisable render state.
    pub mod snapshot;
    /// KD-tree index over traffic.
    pub mod spatial;
    /// Persistence of the best brain.
    pub mod storage;
    /// Vehicles, sensors and controls.
    pub mod vehicle;
    /// The complete simulation.
    pub mod world;
}
