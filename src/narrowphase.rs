use crate::api::NarrowphaseApi;
use crate::fixed::Fixed;
use crate::geometry::{Aabb, LineSegment, Parallelogram, RightTriangle, Vector};

/// Exact separating-axis tests on raw fixed-point values.
///
/// Projections are computed in `i128` from raw components, so no test ever
/// rounds or overflows.
pub struct Narrowphase;

type Interval = (i128, i128);

#[inline]
fn wide(f: Fixed) -> i128 {
    f.raw() as i128
}

#[inline]
fn sorted(a: i128, b: i128) -> Interval {
    if a <= b { (a, b) } else { (b, a) }
}

#[inline]
fn span(a: Fixed, b: Fixed) -> Interval {
    sorted(wide(a), wide(b))
}

#[inline]
fn project(p: Vector, n: (i128, i128)) -> i128 {
    wide(p.x) * n.0 + wide(p.y) * n.1
}

fn project_box(b: &Aabb, n: (i128, i128)) -> Interval {
    let mut lo = i128::MAX;
    let mut hi = i128::MIN;
    for c in [b.left_top(), b.right_top(), b.left_bottom(), b.right_bottom()] {
        let v = project(c, n);
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo, hi)
}

#[inline]
fn strict(a: Interval, b: Interval) -> bool {
    a.0 < b.1 && b.0 < a.1
}

#[inline]
fn closed(a: Interval, b: Interval) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Interval overlap where a zero-length interval is a point tested against
/// the other half-open interval.
fn axis_overlap(a0: Fixed, a1: Fixed, b0: Fixed, b1: Fixed) -> bool {
    match (a0 == a1, b0 == b1) {
        (true, true) => a0 == b0,
        (true, false) => b0 <= a0 && a0 < b1,
        (false, true) => a0 <= b0 && b0 < a1,
        (false, false) => a0 < b1 && b0 < a1,
    }
}

/// Closed segment extent against a half-open box extent.
fn segment_axis(s: Interval, b0: Fixed, b1: Fixed) -> bool {
    let (b0, b1) = (wide(b0), wide(b1));
    if b0 == b1 { s.0 <= b0 && b0 <= s.1 } else { s.0 < b1 && b0 <= s.1 }
}

impl NarrowphaseApi for Narrowphase {
    fn overlap_aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
        axis_overlap(a.left(), a.right(), b.left(), b.right())
            && axis_overlap(a.top(), a.bottom(), b.top(), b.bottom())
    }

    fn overlap_point_aabb(p: Vector, b: &Aabb) -> bool {
        b.left() <= p.x && p.x < b.right() && b.top() <= p.y && p.y < b.bottom()
    }

    fn segment_aabb(seg: &LineSegment, b: &Aabb) -> bool {
        if !segment_axis(span(seg.start.x, seg.end.x), b.left(), b.right()) { return false; }
        if !segment_axis(span(seg.start.y, seg.end.y), b.top(), b.bottom()) { return false; }
        let d = seg.vector();
        let n = (-wide(d.y), wide(d.x));
        let c = project(seg.start, n);
        let (lo, hi) = project_box(b, n);
        lo <= c && c <= hi
    }

    fn triangle_aabb(tri: &RightTriangle, b: &Aabb) -> bool {
        let o = tri.origin;
        if !strict(span(o.x, o.x + tri.h_cathetus), (wide(b.left()), wide(b.right()))) { return false; }
        if !strict(span(o.y, o.y + tri.v_cathetus), (wide(b.top()), wide(b.bottom()))) { return false; }
        // Hypotenuse normal.
        let n = (wide(tri.v_cathetus), wide(tri.h_cathetus));
        let base = project(o, n);
        let t = sorted(base, base + wide(tri.h_cathetus) * wide(tri.v_cathetus));
        strict(t, project_box(b, n))
    }

    fn triangle_point(tri: &RightTriangle, p: Vector) -> bool {
        let o = tri.origin;
        let px = (wide(p.x), wide(p.x));
        let py = (wide(p.y), wide(p.y));
        if !closed(span(o.x, o.x + tri.h_cathetus), px) { return false; }
        if !closed(span(o.y, o.y + tri.v_cathetus), py) { return false; }
        let n = (wide(tri.v_cathetus), wide(tri.h_cathetus));
        let base = project(o, n);
        let v = project(p, n);
        closed(sorted(base, base + wide(tri.h_cathetus) * wide(tri.v_cathetus)), (v, v))
    }

    fn parallelogram_aabb(para: &Parallelogram, b: &Aabb) -> bool {
        let o = para.origin;
        let d = para.direction;
        // Zero area: the sweep collapses to a segment.
        if para.height.is_zero() {
            return Self::segment_aabb(&LineSegment::new(o, o + d), b);
        }
        if d.x.is_zero() {
            let top = o.y.min(o.y + d.y);
            let bottom = o.y.max(o.y + d.y) + para.height;
            return Self::segment_aabb(&LineSegment::new(Vector::new(o.x, top), Vector::new(o.x, bottom)), b);
        }
        if !strict(span(o.x, o.x + d.x), (wide(b.left()), wide(b.right()))) { return false; }
        let (y0, y1) = span(o.y, o.y + d.y);
        if !strict((y0, y1 + wide(para.height)), (wide(b.top()), wide(b.bottom()))) { return false; }
        let n = (-wide(d.y), wide(d.x));
        let base = project(o, n);
        let p = sorted(base, base + wide(para.height) * wide(d.x));
        strict(p, project_box(b, n))
    }

    fn parallelogram_point(para: &Parallelogram, p: Vector) -> bool {
        let o = para.origin;
        let d = para.direction;
        let (px, py) = ((wide(p.x), wide(p.x)), (wide(p.y), wide(p.y)));
        if !closed(span(o.x, o.x + d.x), px) { return false; }
        let (y0, y1) = span(o.y, o.y + d.y);
        if !closed((y0, y1 + wide(para.height)), py) { return false; }
        let n = (-wide(d.y), wide(d.x));
        let base = project(o, n);
        let v = project(p, n);
        closed(sorted(base, base + wide(para.height) * wide(d.x)), (v, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(l: i32, t: i32, w: i32, h: i32) -> Aabb {
        Aabb::from_ints(l, t, w, h)
    }

    fn v(x: i32, y: i32) -> Vector {
        Vector::from_ints(x, y)
    }

    #[test]
    fn test_overlap_aabb_aabb_basic() {
        assert!(Narrowphase::overlap_aabb_aabb(&b(0, 0, 4, 4), &b(3, 3, 4, 4)));
        assert!(!Narrowphase::overlap_aabb_aabb(&b(0, 0, 4, 4), &b(4, 0, 4, 4)));
        assert!(!Narrowphase::overlap_aabb_aabb(&b(0, 0, 4, 4), &b(-5, 0, 4, 4)));
    }

    #[test]
    fn test_overlap_aabb_aabb_degenerate() {
        // Both points.
        assert!(Narrowphase::overlap_aabb_aabb(&b(2, 2, 0, 0), &b(2, 2, 0, 0)));
        assert!(!Narrowphase::overlap_aabb_aabb(&b(2, 2, 0, 0), &b(2, 3, 0, 0)));
        // Point on the closed (left/top) edge counts, on the open edge it does not.
        assert!(Narrowphase::overlap_aabb_aabb(&b(0, 0, 0, 0), &b(0, 0, 4, 4)));
        assert!(!Narrowphase::overlap_aabb_aabb(&b(4, 4, 0, 0), &b(0, 0, 4, 4)));
    }

    #[test]
    fn test_point_aabb_half_open() {
        let a = b(0, 0, 4, 4);
        assert!(Narrowphase::overlap_point_aabb(v(0, 0), &a));
        assert!(Narrowphase::overlap_point_aabb(v(3, 3), &a));
        assert!(!Narrowphase::overlap_point_aabb(v(4, 0), &a));
        assert!(!Narrowphase::overlap_point_aabb(v(0, 4), &a));
    }

    #[test]
    fn test_segment_aabb_hit_and_miss() {
        let a = b(-1, -1, 2, 2);
        assert!(Narrowphase::segment_aabb(&LineSegment::new(v(-2, 0), v(2, 0)), &a));
        assert!(!Narrowphase::segment_aabb(&LineSegment::new(v(-2, 2), v(2, 2)), &a));
        // Diagonal passing beside the corner.
        assert!(!Narrowphase::segment_aabb(&LineSegment::new(v(-3, 0), v(0, 3)), &a));
        // Degenerate segment acts as a point.
        assert!(Narrowphase::segment_aabb(&LineSegment::new(v(0, 0), v(0, 0)), &a));
        assert!(!Narrowphase::segment_aabb(&LineSegment::new(v(1, 0), v(1, 0)), &a));
    }

    #[test]
    fn test_triangle_rising_right() {
        // Surface (0,16) -> (16,0): solid below-right of the diagonal.
        let tri = RightTriangle::new(v(16, 16), Fixed::from_int(-16), Fixed::from_int(-16));
        assert!(Narrowphase::triangle_aabb(&tri, &b(12, 12, 4, 4)));
        assert!(!Narrowphase::triangle_aabb(&tri, &b(0, 0, 4, 4)));
        assert!(!Narrowphase::triangle_aabb(&tri, &b(16, 0, 4, 16)));
        assert!(Narrowphase::triangle_point(&tri, v(16, 16)));
        assert!(Narrowphase::triangle_point(&tri, v(8, 8)));
        assert!(!Narrowphase::triangle_point(&tri, v(7, 8)));
    }

    #[test]
    fn test_parallelogram_degenerate_falls_back_to_segment() {
        let flat = Parallelogram::new(v(0, 0), v(10, 0), Fixed::ZERO);
        assert!(Narrowphase::parallelogram_aabb(&flat, &b(4, -1, 2, 2)));
        assert!(!Narrowphase::parallelogram_aabb(&flat, &b(4, 1, 2, 2)));
        let vertical = Parallelogram::new(v(0, 0), v(0, 10), Fixed::from_int(4));
        assert!(Narrowphase::parallelogram_aabb(&vertical, &b(-1, 12, 2, 1)));
        assert!(!Narrowphase::parallelogram_aabb(&vertical, &b(-1, 15, 2, 1)));
    }
}
