//! Geometry primitives: points, vectors, and the orientation predicates the
//! rest of the crate treats as ground truth.
//!
//! Visibility and coplanarity decisions are all routed through
//! [`signed_volume`], which is backed by [`robust::orient3d`] rather than a
//! naive floating-point determinant, so near-degenerate inputs don't flip
//! sign due to round-off.

use glam::DVec3;

/// A point in Euclidean 3-space.
pub type Point3 = DVec3;

/// A free vector in Euclidean 3-space.
pub type Vector3 = DVec3;

trait ToRobust {
    fn to_robust(self) -> robust::Coord3D<f64>;
}

impl ToRobust for Point3 {
    fn to_robust(self) -> robust::Coord3D<f64> {
        robust::Coord3D { x: self.x, y: self.y, z: self.z }
    }
}

/// Signed volume of the tetrahedron `(a, b, c, d)`.
///
/// Positive when `d` lies on the same side of `plane(a, b, c)` as the
/// outward normal of the triangle `(a, b, c)` traversed counter-clockwise
/// when viewed from outside. A triangular face with vertices `(v0, v1, v2)`
/// in `next` order is visible from a point `p` iff
/// `signed_volume(v0, v1, v2, p) > 0`.
#[must_use]
pub fn signed_volume(a: Point3, b: Point3, c: Point3, d: Point3) -> f64 {
    // `robust::orient3d` is positive when `d` is below the plane through
    // `a, b, c` in right-handed orientation; negate to match this crate's
    // "positive = visible" convention.
    -robust::orient3d(a.to_robust(), b.to_robust(), c.to_robust(), d.to_robust())
}

/// The 2D collinearity predicate, evaluated on the xy-projection of `a`,
/// `b`, and `c`. Zero iff the three points project to collinear points in
/// the xy-plane.
///
/// This is a weak test: two points that differ only in z project to the
/// same xy-coordinate, so this can report "collinear" for points that
/// aren't truly collinear in 3-space. Prefer [`collinear3d`] unless you
/// specifically need the xy-projection behavior.
#[must_use]
pub fn collinear2d(a: Point3, b: Point3, c: Point3) -> f64 {
    a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)
}

/// A true 3D collinearity test: the cross product of `b - a` and `c - a`,
/// zero iff `a`, `b`, and `c` are collinear in 3-space.
#[must_use]
pub fn collinear3d(a: Point3, b: Point3, c: Point3) -> Vector3 {
    (b - a).cross(c - a)
}

/// Computes the outward unit normal of the triangle `(a, b, c)`, assuming a
/// counter-clockwise winding when viewed from outside.
#[must_use]
pub fn triangle_normal(a: Point3, b: Point3, c: Point3) -> Vector3 {
    (b - a).cross(c - a).normalize()
}
