//! Straight multi-lane road that provides the environment boundaries.

use geo::{Coord, Line};
use serde::{Deserialize, Serialize};

/// Extent used for the road's top and bottom, far beyond any realistic run.
const ROAD_EXTENT: f32 = 1_000_000.0;

/// A straight vertical road split into equally wide lanes.
///
/// Progress along the road decreases `y`, so the road runs from `bottom`
/// (large positive `y`) to `top` (large negative `y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Horizontal centre of the road.
    pub x: f32,
    /// Total width of the road.
    pub width: f32,
    /// Number of lanes, at least one.
    pub lane_count: usize,
    /// X coordinate of the left border.
    pub left: f32,
    /// X coordinate of the right border.
    pub right: f32,
    /// Y coordinate where the borders start.
    pub top: f32,
    /// Y coordinate where the borders end.
    pub bottom: f32,
}

impl Road {
    /// Creates a road centred on `x` with the given width and lane count.
    pub fn new(x: f32, width: f32, lane_count: usize) -> Self {
        Self {
            x,
            width,
            lane_count: lane_count.max(1),
            left: x - width / 2.0,
            right: x + width / 2.0,
            top: -ROAD_EXTENT,
            bottom: ROAD_EXTENT,
        }
    }

    /// Width of a single lane.
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// X coordinate of the centre of lane `index`, clamped to the last lane.
    pub fn lane_center(&self, index: usize) -> f32 {
        let lane = index.min(self.lane_count.saturating_sub(1));
        self.left + self.lane_width() / 2.0 + lane as f32 * self.lane_width()
    }

    /// Index of the lane containing `x`, clamped to the valid range.
    pub fn lane_index(&self, x: f32) -> usize {
        let lane = ((x - self.left) / self.lane_width()).floor().max(0.0) as usize;
        lane.min(self.lane_count.saturating_sub(1))
    }

    /// Returns `true` for the leftmost lane.
    pub fn is_leftmost(&self, lane: usize) -> bool {
        lane == 0
    }

    /// Returns `true` for the rightmost lane.
    pub fn is_rightmost(&self, lane: usize) -> bool {
        lane + 1 >= self.lane_count
    }

    /// The left and right road edges as segments.
    pub fn borders(&self) -> [Line<f32>; 2] {
        [
            Line::new(
                Coord {
                    x: self.left,
                    y: self.top,
                },
                Coord {
                    x: self.left,
                    y: self.bottom,
                },
            ),
            Line::new(
                Coord {
                    x: self.right,
                    y: self.top,
                },
                Coord {
                    x: self.right,
                    y: self.bottom,
                },
            ),
        ]
    }
}
