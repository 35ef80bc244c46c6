//! Segment clipping against axis-aligned rectangles
//!
//! Cohen–Sutherland region codes settle the trivial cases; the rest goes
//! through a per-axis slab test that narrows the parametric interval of the
//! segment (Liang–Barsky).

use bitflags::bitflags;

use crate::foundation::math::Point2;

/// Default threshold for degenerate segments and axis-parallel directions
pub const CLIP_EPSILON: f32 = 1e-6;

bitflags! {
    /// Cohen–Sutherland region code of a point relative to a rectangle
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutCode: u8 {
        /// Left of `min.x`
        const LEFT = 1 << 0;
        /// Right of `max.x`
        const RIGHT = 1 << 1;
        /// Above `min.y`
        const TOP = 1 << 2;
        /// Below `max.y`
        const BOTTOM = 1 << 3;
    }
}

impl OutCode {
    /// Classify `point` against the rectangle `[min, max]`
    pub fn of(point: Point2, min: Point2, max: Point2) -> Self {
        let mut code = Self::empty();
        if point.x < min.x {
            code |= Self::LEFT;
        } else if point.x > max.x {
            code |= Self::RIGHT;
        }
        if point.y < min.y {
            code |= Self::TOP;
        } else if point.y > max.y {
            code |= Self::BOTTOM;
        }
        code
    }
}

/// Clip the segment `start -> end` to the rectangle `[min, max]`
///
/// Returns the part of the segment inside the rectangle, or `None` when they
/// are disjoint. A segment entirely inside comes back unmodified, as does a
/// degenerate segment shorter than `epsilon`.
pub fn clip_line(start: Point2, end: Point2, min: Point2, max: Point2, epsilon: f32) -> Option<(Point2, Point2)> {
    let code_start = OutCode::of(start, min, max);
    let code_end = OutCode::of(end, min, max);

    if code_start.is_empty() && code_end.is_empty() {
        return Some((start, end));
    }
    if code_start.intersects(code_end) {
        return None;
    }

    let delta = end - start;
    let length = delta.norm();
    if length < epsilon {
        return Some((start, end));
    }
    let dir = delta / length;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..2 {
        let origin = start[axis];
        let d = dir[axis];
        if d.abs() < epsilon {
            // Parallel to this slab
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let mut t1 = (min[axis] - origin) / d;
        let mut t2 = (max[axis] - origin) / d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);

        if t_min > t_max || t_max < 0.0 {
            return None;
        }
    }

    let t_min = t_min.clamp(0.0, length);
    let t_max = t_max.clamp(0.0, length);
    Some((start + dir * t_min, start + dir * t_max))
}
