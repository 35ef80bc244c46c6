//! Polygon intersection tests used for feature picking
//!
//! Polygons are closed rings given as point slices; the closing edge from the
//! last point back to the first is implied.

use crate::foundation::math::Point2;

/// Corners of an axis-aligned box as a ring (clockwise in screen space)
pub fn box_ring(x1: f32, y1: f32, x2: f32, y2: f32) -> [Point2; 4] {
    [
        Point2::new(x1, y1),
        Point2::new(x2, y1),
        Point2::new(x2, y2),
        Point2::new(x1, y2),
    ]
}

/// Check if a point is inside a polygon ring (even-odd rule)
///
/// # Arguments
/// * `ring` - Polygon vertices
/// * `point` - Point to test
///
/// # Returns
/// `true` if the point is inside the ring
pub fn polygon_contains_point(ring: &[Point2], point: Point2) -> bool {
    let mut inside = false;
    let mut j = match ring.len() {
        0 => return false,
        n => n - 1,
    };
    for i in 0..ring.len() {
        let p1 = ring[i];
        let p2 = ring[j];
        if (p1.y > point.y) != (p2.y > point.y)
            && point.x < (p2.x - p1.x) * (point.y - p1.y) / (p2.y - p1.y) + p1.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn is_counter_clockwise(a: Point2, b: Point2, c: Point2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Check if segment `a0 -> a1` properly crosses segment `b0 -> b1`
pub fn segments_intersect(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> bool {
    is_counter_clockwise(a0, b0, b1) != is_counter_clockwise(a1, b0, b1)
        && is_counter_clockwise(a0, a1, b0) != is_counter_clockwise(a0, a1, b1)
}

fn ring_edges(ring: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    let n = ring.len();
    (0..n).filter(move |_| n > 1).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Check if two polygon rings overlap
///
/// True when a vertex of either ring lies inside the other, or when any pair
/// of edges cross. Empty rings never intersect.
pub fn polygon_intersects_polygon(a: &[Point2], b: &[Point2]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.iter().any(|&p| polygon_contains_point(b, p)) {
        return true;
    }
    if b.iter().any(|&p| polygon_contains_point(a, p)) {
        return true;
    }
    ring_edges(a).any(|(a0, a1)| ring_edges(b).any(|(b0, b1)| segments_intersect(a0, a1, b0, b1)))
}

/// Check if a polygon ring overlaps an axis-aligned box
pub fn polygon_intersects_box(ring: &[Point2], x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
    polygon_intersects_polygon(ring, &box_ring(x1, y1, x2, y2))
}
