//! Geometric primitives for ray casting and collision tests.
//!
//! Segments are [`geo::Line`]s and vehicle outlines are [`geo::Polygon`]s. All
//! tests are written so that degenerate input (parallel or zero-length
//! segments) is reported as "no intersection" rather than an error.

use geo::{Coord, Line, Polygon};

/// Determinants with a smaller magnitude are treated as parallel segments.
const PARALLEL_EPSILON: f32 = 1e-9;

/// Result of a successful segment intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point where the two segments cross.
    pub point: Coord<f32>,
    /// Fractional position of the point along the first segment, in `[0, 1]`.
    pub offset_a: f32,
    /// Fractional position of the point along the second segment, in `[0, 1]`.
    pub offset_b: f32,
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Intersects two segments by solving the 2x2 parametric system.
///
/// # Arguments
///
/// * `a` - First segment
/// * `b` - Second segment
///
/// # Returns
///
/// The crossing point with its offset along each segment, or `None` when the
/// segments are parallel, collinear, degenerate, or do not reach each other.
pub fn intersect_segments(a: &Line<f32>, b: &Line<f32>) -> Option<Intersection> {
    let (p, q) = (a.start, a.end);
    let (r, s) = (b.start, b.end);

    let t_top = (s.x - r.x) * (p.y - r.y) - (s.y - r.y) * (p.x - r.x);
    let u_top = (r.y - p.y) * (p.x - q.x) - (r.x - p.x) * (p.y - q.y);
    let bottom = (s.y - r.y) * (q.x - p.x) - (s.x - r.x) * (q.y - p.y);

    if bottom.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(Intersection {
        point: Coord {
            x: lerp(p.x, q.x, t),
            y: lerp(p.y, q.y, t),
        },
        offset_a: t,
        offset_b: u,
    })
}

/// Returns `true` if any edge of `p` crosses any edge of `q`.
///
/// One polygon lying strictly inside the other is not reported; vehicles only
/// ever overlap by crossing edges first.
pub fn polygons_intersect(p: &Polygon<f32>, q: &Polygon<f32>) -> bool {
    p.exterior().lines().any(|edge_p| {
        q.exterior()
            .lines()
            .any(|edge_q| intersect_segments(&edge_p, &edge_q).is_some())
    })
}

/// Returns `true` if any edge of `polygon` crosses `segment`.
pub fn polygon_crosses_segment(polygon: &Polygon<f32>, segment: &Line<f32>) -> bool {
    polygon
        .exterior()
        .lines()
        .any(|edge| intersect_segments(&edge, segment).is_some())
}
