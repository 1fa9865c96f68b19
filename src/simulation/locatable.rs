//! Trait for entities that occupy space on the road.
//!
//! The spatial index is built over any slice of locatable entities.

use geo::Coord;

/// Trait for entities with a position and a bounding circle.
pub trait Locatable {
    /// Returns the entity's centre.
    fn pos(&self) -> Coord<f32>;

    /// Returns the radius of a circle around [`Locatable::pos`] that contains
    /// the whole entity.
    fn bounding_radius(&self) -> f32;
}
