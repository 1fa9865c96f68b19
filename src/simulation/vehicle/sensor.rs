//! Ray fan sensor mounted on a vehicle.
//!
//! The sensor casts a fixed number of rays from the vehicle centre and keeps,
//! per ray, the closest hit against the road borders and nearby vehicle
//! outlines.

use geo::{Coord, Line, Polygon};
use ndarray::Array1;

use super::super::geometric_utils::{intersect_segments, lerp};
use super::Pose;

/// Closest hit along a single ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Point where the ray first touches an obstacle.
    pub point: Coord<f32>,
    /// Fractional distance along the ray, `0` at the origin and `1` at full range.
    pub offset: f32,
}

/// A fan of rays spread evenly around the vehicle's heading.
///
/// The sensor does not hold a reference to its vehicle; the owner passes its
/// pose on every update.
#[derive(Debug, Clone)]
pub struct Sensor {
    ray_count: usize,
    ray_length: f32,
    ray_spread: f32,
    rays: Vec<Line<f32>>,
    readings: Vec<Option<Reading>>,
}

impl Sensor {
    /// Creates a sensor with `ray_count` rays of `ray_length`, spread over
    /// `ray_spread` radians.
    pub fn new(ray_count: usize, ray_length: f32, ray_spread: f32) -> Self {
        Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: vec![None; ray_count],
        }
    }

    /// Number of rays.
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Length of each ray.
    pub fn ray_length(&self) -> f32 {
        self.ray_length
    }

    /// Angle of ray `index` relative to the vehicle heading.
    ///
    /// Ray 0 points to the left edge of the fan (positive angle). A single
    /// ray points straight ahead.
    pub fn ray_angle(&self, index: usize) -> f32 {
        let t = if self.ray_count == 1 {
            0.5
        } else {
            index as f32 / (self.ray_count - 1) as f32
        };
        lerp(self.ray_spread / 2.0, -self.ray_spread / 2.0, t)
    }

    /// Rays cast on the last update.
    pub fn rays(&self) -> &[Line<f32>] {
        &self.rays
    }

    /// One reading per ray; `None` means nothing within range.
    pub fn readings(&self) -> &[Option<Reading>] {
        &self.readings
    }

    /// Recasts the rays from `pose`, leaving the readings as they are.
    pub fn aim(&mut self, pose: Pose) {
        self.rays.clear();
        for i in 0..self.ray_count {
            let angle = pose.heading + self.ray_angle(i);
            let end = Coord {
                x: pose.pos.x - angle.sin() * self.ray_length,
                y: pose.pos.y - angle.cos() * self.ray_length,
            };
            self.rays.push(Line::new(pose.pos, end));
        }
    }

    /// Recasts every ray and replaces every reading.
    ///
    /// # Arguments
    ///
    /// * `pose` - Pose of the owning vehicle
    /// * `borders` - Road boundary segments
    /// * `traffic` - Outlines of other vehicles that may be hit
    pub fn update(&mut self, pose: Pose, borders: &[Line<f32>], traffic: &[&Polygon<f32>]) {
        self.aim(pose);
        for (ray, reading) in self.rays.iter().zip(self.readings.iter_mut()) {
            *reading = closest_hit(ray, borders, traffic);
        }
    }

    /// Converts the readings into brain inputs.
    ///
    /// A hit becomes `1 - offset`, so closer obstacles give values nearer 1;
    /// an empty ray gives 0.
    pub fn inputs(&self) -> Array1<f32> {
        self.readings
            .iter()
            .map(|reading| reading.map_or(0.0, |r| 1.0 - r.offset))
            .collect()
    }
}

fn closest_hit(
    ray: &Line<f32>,
    borders: &[Line<f32>],
    traffic: &[&Polygon<f32>],
) -> Option<Reading> {
    let edges = traffic.iter().flat_map(|polygon| polygon.exterior().lines());

    borders
        .iter()
        .copied()
        .chain(edges)
        .filter_map(|segment| intersect_segments(ray, &segment))
        .map(|hit| Reading {
            point: hit.point,
            offset: hit.offset_a,
        })
        .min_by(|a, b| a.offset.total_cmp(&b.offset))
}
