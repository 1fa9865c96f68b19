#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::{Coord, Line, LineString, Polygon};
use roadevo::simulation::geometric_utils::{
    intersect_segments, lerp, polygon_crosses_segment, polygons_intersect,
};

fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Line<f32> {
    Line::new(Coord { x: x1, y: y1 }, Coord { x: x2, y: y2 })
}

fn square(x: f32, y: f32, size: f32) -> Polygon<f32> {
    Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + size, y),
            (x + size, y + size),
            (x, y + size),
        ]),
        vec![],
    )
}

#[test]
fn test_lerp() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
}

#[test]
fn test_crossing_segments() {
    let a = line(0.0, 0.0, 2.0, 2.0);
    let b = line(0.0, 2.0, 2.0, 0.0);

    let hit = intersect_segments(&a, &b).expect("segments cross");
    assert!((hit.point.x - 1.0).abs() < 1e-6);
    assert!((hit.point.y - 1.0).abs() < 1e-6);
    assert!((hit.offset_a - 0.5).abs() < 1e-6);
    assert!((hit.offset_b - 0.5).abs() < 1e-6);
}

#[test]
fn test_intersection_is_symmetric() {
    let a = line(0.0, 0.0, 10.0, 0.0);
    let b = line(2.0, -1.0, 2.0, 3.0);

    let ab = intersect_segments(&a, &b).expect("a crosses b");
    let ba = intersect_segments(&b, &a).expect("b crosses a");

    assert!((ab.point.x - ba.point.x).abs() < 1e-5);
    assert!((ab.point.y - ba.point.y).abs() < 1e-5);
    assert!((ab.offset_a - ba.offset_b).abs() < 1e-6);
    assert!((ab.offset_b - ba.offset_a).abs() < 1e-6);
    assert!((ab.offset_a - 0.2).abs() < 1e-6);
    assert!((ab.offset_b - 0.25).abs() < 1e-6);
}

#[test]
fn test_disjoint_segments() {
    let a = line(0.0, 0.0, 1.0, 0.0);
    let b = line(2.0, -1.0, 2.0, 1.0);
    assert!(intersect_segments(&a, &b).is_none());
    assert!(intersect_segments(&b, &a).is_none());
}

#[test]
fn test_degenerate_segments() {
    // Parallel
    let a = line(0.0, 0.0, 4.0, 0.0);
    let b = line(0.0, 1.0, 4.0, 1.0);
    assert!(intersect_segments(&a, &b).is_none());

    // Collinear and overlapping
    let c = line(2.0, 0.0, 6.0, 0.0);
    assert!(intersect_segments(&a, &c).is_none());

    // Zero length
    let point = line(2.0, 0.0, 2.0, 0.0);
    assert!(intersect_segments(&a, &point).is_none());
    assert!(intersect_segments(&point, &point).is_none());
}

#[test]
fn test_touching_endpoints() {
    let a = line(0.0, 0.0, 1.0, 0.0);
    let b = line(1.0, 0.0, 1.0, 1.0);
    let hit = intersect_segments(&a, &b).expect("endpoints touch");
    assert!((hit.offset_a - 1.0).abs() < 1e-6);
    assert!(hit.offset_b.abs() < 1e-6);
}

#[test]
fn test_overlapping_squares() {
    let p = square(0.0, 0.0, 2.0);
    let q = square(1.0, 1.0, 2.0);
    assert!(polygons_intersect(&p, &q));
    assert!(polygons_intersect(&q, &p));
}

#[test]
fn test_separate_squares() {
    let p = square(0.0, 0.0, 2.0);
    let q = square(5.0, 5.0, 2.0);
    assert!(!polygons_intersect(&p, &q));
    assert!(!polygons_intersect(&q, &p));
}

#[test]
fn test_polygon_crosses_segment() {
    let p = square(0.0, 0.0, 2.0);
    assert!(polygon_crosses_segment(&p, &line(1.0, -5.0, 1.0, 5.0)));
    assert!(!polygon_crosses_segment(&p, &line(3.0, -5.0, 3.0, 5.0)));
}

#[test]
fn test_unit_squares() {
    let origin = square(-0.5, -0.5, 1.0);
    let far = square(9.5, 9.5, 1.0);
    let shifted = square(0.0, 0.0, 1.0);

    assert!(!polygons_intersect(&origin, &far));
    assert!(polygons_intersect(&origin, &shifted));
}
