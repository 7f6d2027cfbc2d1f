use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::{IVec2, Vec2};

use crate::api::NarrowphaseApi;
use crate::fixed::Fixed;
use crate::narrowphase::Narrowphase;

/// 2D vector in fixed-point world units (y grows downward).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: Fixed,
    pub y: Fixed,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: Fixed::ZERO, y: Fixed::ZERO };
    pub const LEFT: Vector = Vector { x: Fixed::from_int(-1), y: Fixed::ZERO };
    pub const UP: Vector = Vector { x: Fixed::ZERO, y: Fixed::from_int(-1) };
    pub const RIGHT: Vector = Vector { x: Fixed::ONE, y: Fixed::ZERO };
    pub const DOWN: Vector = Vector { x: Fixed::ZERO, y: Fixed::ONE };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self { x: Fixed::from_int(x), y: Fixed::from_int(y) }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Exact squared length in raw units squared, for magnitude comparisons.
    pub fn length_squared(self) -> i128 {
        let (x, y) = (self.x.raw() as i128, self.y.raw() as i128);
        x * x + y * y
    }

    /// Exact dot product in raw units squared.
    pub fn dot_raw(self, other: Vector) -> i128 {
        self.x.raw() as i128 * other.x.raw() as i128 + self.y.raw() as i128 * other.y.raw() as i128
    }

    /// Lossy conversion for renderers.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x.to_f32(), self.y.to_f32())
    }
}

impl From<IVec2> for Vector {
    fn from(v: IVec2) -> Self {
        Vector::from_ints(v.x, v.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    #[inline]
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    #[inline]
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;
    #[inline]
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl Mul<Fixed> for Vector {
    type Output = Vector;
    #[inline]
    fn mul(self, rhs: Fixed) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<i32> for Vector {
    type Output = Vector;
    #[inline]
    fn mul(self, rhs: i32) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        *self = *self - rhs;
    }
}

/// Axis-aligned box with half-open extents `[left, right) x [top, bottom)`.
///
/// Width and height are never negative; constructing with a negative extent
/// grows the box toward the opposite side instead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb {
    left: Fixed,
    top: Fixed,
    width: Fixed,
    height: Fixed,
}

impl Aabb {
    pub fn new(left: Fixed, top: Fixed, width: Fixed, height: Fixed) -> Self {
        let (left, width) = if width.is_negative() { (left + width, -width) } else { (left, width) };
        let (top, height) = if height.is_negative() { (top + height, -height) } else { (top, height) };
        Self { left, top, width, height }
    }

    pub fn from_ints(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left.into(), top.into(), width.into(), height.into())
    }

    pub fn from_origin(origin: Vector, width: Fixed, height: Fixed) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Box spanning two opposite corners, in any order.
    pub fn from_corners(a: Vector, b: Vector) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self { left, top, width: a.x.max(b.x) - left, height: a.y.max(b.y) - top }
    }

    #[inline] pub fn left(&self) -> Fixed { self.left }
    #[inline] pub fn top(&self) -> Fixed { self.top }
    #[inline] pub fn right(&self) -> Fixed { self.left + self.width }
    #[inline] pub fn bottom(&self) -> Fixed { self.top + self.height }
    #[inline] pub fn width(&self) -> Fixed { self.width }
    #[inline] pub fn height(&self) -> Fixed { self.height }

    #[inline] pub fn origin(&self) -> Vector { Vector::new(self.left, self.top) }
    #[inline] pub fn left_top(&self) -> Vector { self.origin() }
    #[inline] pub fn right_top(&self) -> Vector { Vector::new(self.right(), self.top) }
    #[inline] pub fn left_bottom(&self) -> Vector { Vector::new(self.left, self.bottom()) }
    #[inline] pub fn right_bottom(&self) -> Vector { Vector::new(self.right(), self.bottom()) }
    #[inline] pub fn size(&self) -> Vector { Vector::new(self.width, self.height) }

    pub fn center(&self) -> Vector {
        Vector::new(self.left + self.width / 2, self.top + self.height / 2)
    }

    /// True when either extent is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    pub fn translate(&self, delta: Vector) -> Aabb {
        Aabb { left: self.left + delta.x, top: self.top + delta.y, ..*self }
    }

    /// Same size, moved so its left-top corner is `origin`.
    pub fn with_origin(&self, origin: Vector) -> Aabb {
        Aabb { left: origin.x, top: origin.y, ..*self }
    }

    /// Remove `amount` from the top edge. Negative amounts grow the box upward.
    pub fn clip_top(&self, amount: Fixed) -> Aabb {
        let height = (self.height - amount).max(Fixed::ZERO);
        Aabb { top: self.bottom() - height, height, ..*self }
    }

    /// Remove `amount` from the bottom edge. Negative amounts grow the box downward.
    pub fn clip_bottom(&self, amount: Fixed) -> Aabb {
        Aabb { height: (self.height - amount).max(Fixed::ZERO), ..*self }
    }

    pub fn clip_left(&self, amount: Fixed) -> Aabb {
        let width = (self.width - amount).max(Fixed::ZERO);
        Aabb { left: self.right() - width, width, ..*self }
    }

    pub fn clip_right(&self, amount: Fixed) -> Aabb {
        Aabb { width: (self.width - amount).max(Fixed::ZERO), ..*self }
    }

    pub fn half_left(&self) -> Aabb {
        Aabb { width: self.width / 2, ..*self }
    }

    pub fn half_right(&self) -> Aabb {
        let half = self.width / 2;
        Aabb { left: self.left + half, width: self.width - half, ..*self }
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::from_corners(
            Vector::new(self.left.min(other.left), self.top.min(other.top)),
            Vector::new(self.right().max(other.right()), self.bottom().max(other.bottom())),
        )
    }

    /// Common area, or `None` when the boxes do not overlap.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Aabb::from_corners(
            Vector::new(self.left.max(other.left), self.top.max(other.top)),
            Vector::new(self.right().min(other.right()), self.bottom().min(other.bottom())),
        ))
    }

    /// Positive-area overlap; a zero extent acts as a point on that axis.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        Narrowphase::overlap_aabb_aabb(self, other)
    }

    #[inline]
    pub fn contains_point(&self, p: Vector) -> bool {
        Narrowphase::overlap_point_aabb(p, self)
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl Add<Vector> for Aabb {
    type Output = Aabb;
    #[inline]
    fn add(self, rhs: Vector) -> Aabb {
        self.translate(rhs)
    }
}

impl Sub<Vector> for Aabb {
    type Output = Aabb;
    #[inline]
    fn sub(self, rhs: Vector) -> Aabb {
        self.translate(-rhs)
    }
}

/// Closed line segment between two points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineSegment {
    pub start: Vector,
    pub end: Vector,
}

impl LineSegment {
    pub const fn new(start: Vector, end: Vector) -> Self {
        Self { start, end }
    }

    pub fn vector(&self) -> Vector {
        self.end - self.start
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_corners(self.start, self.end)
    }

    pub fn intersects_box(&self, b: &Aabb) -> bool {
        Narrowphase::segment_aabb(self, b)
    }
}

/// Right triangle describing a ramp tile.
///
/// `origin` is the right-angle vertex; the catheti run from it by the signed
/// lengths `h_cathetus` along x and `v_cathetus` along y.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RightTriangle {
    pub origin: Vector,
    pub h_cathetus: Fixed,
    pub v_cathetus: Fixed,
}

impl RightTriangle {
    pub const fn new(origin: Vector, h_cathetus: Fixed, v_cathetus: Fixed) -> Self {
        Self { origin, h_cathetus, v_cathetus }
    }

    #[inline]
    pub fn h_cathetus_sign(&self) -> i32 {
        self.h_cathetus.signum()
    }

    #[inline]
    pub fn v_cathetus_sign(&self) -> i32 {
        self.v_cathetus.signum()
    }

    /// Vertex at the far end of the horizontal cathetus.
    pub fn h_vertex(&self) -> Vector {
        Vector::new(self.origin.x + self.h_cathetus, self.origin.y)
    }

    /// Vertex at the far end of the vertical cathetus.
    pub fn v_vertex(&self) -> Vector {
        Vector::new(self.origin.x, self.origin.y + self.v_cathetus)
    }

    pub fn wrapping_box(&self) -> Aabb {
        Aabb::from_corners(self.origin, self.origin + Vector::new(self.h_cathetus, self.v_cathetus))
    }

    pub fn translate(&self, delta: Vector) -> RightTriangle {
        RightTriangle { origin: self.origin + delta, ..*self }
    }

    pub fn intersects_box(&self, b: &Aabb) -> bool {
        Narrowphase::triangle_aabb(self, b)
    }

    /// Closed containment test (edges count as inside).
    pub fn contains_point(&self, p: Vector) -> bool {
        Narrowphase::triangle_point(self, p)
    }
}

/// Region swept by the vertical segment `origin .. origin + (0, height)`
/// moving along `direction`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Parallelogram {
    pub origin: Vector,
    pub direction: Vector,
    pub height: Fixed,
}

impl Parallelogram {
    pub const fn new(origin: Vector, direction: Vector, height: Fixed) -> Self {
        Self { origin, direction, height }
    }

    pub fn wrapping_box(&self) -> Aabb {
        let far = self.origin + self.direction;
        Aabb::from_corners(self.origin, far)
            .union(&Aabb::from_corners(far, far + Vector::new(Fixed::ZERO, self.height)))
            .union(&Aabb::from_origin(self.origin, Fixed::ZERO, self.height))
    }

    pub fn intersects_box(&self, b: &Aabb) -> bool {
        Narrowphase::parallelogram_aabb(self, b)
    }

    pub fn contains_point(&self, p: Vector) -> bool {
        Narrowphase::parallelogram_point(self, p)
    }
}
