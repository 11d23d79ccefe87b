//! Various math tools that are usefull for several modules.

use crate::math::{Point, Vector, vector};

/// Tolerance below which two points are considered equal.
pub const EPSILON: f64 = 1e-6;

/// Returns `tan(2·atan(d))`.
#[inline]
pub fn tan2atan(d: f64) -> f64 {
    2.0 * d / (1.0 - d * d)
}

/// Returns `sin(2·atan(d))`.
#[inline]
pub fn sin2atan(d: f64) -> f64 {
    2.0 * d / (1.0 + d * d)
}

/// Returns `cos(2·atan(d))`.
#[inline]
pub fn cos2atan(d: f64) -> f64 {
    (1.0 - d * d) / (1.0 + d * d)
}

/// Rotates `v` 90° counterclockwise.
#[inline]
pub fn perpendicular(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Normalizes `v`, leaving a zero vector unchanged rather than producing
/// NaNs.
#[inline]
pub fn normalize_or_zero(v: Vector) -> Vector {
    let d = v.length();
    if d == 0.0 { v } else { v / d }
}

/// Expresses `v` in the basis `(bx, perpendicular(bx))`.
#[inline]
pub fn rebase(v: Vector, bx: Vector) -> Vector {
    vector(v.dot(bx), v.dot(perpendicular(bx)))
}

/// Angle of `v` against the x axis, in radians.
#[inline]
pub fn vector_angle(v: Vector) -> f64 {
    v.y.atan2(v.x)
}

/// Whether two points coincide up to the relative [`EPSILON`](constant.EPSILON.html) policy.
#[inline]
pub fn points_are_near(a: Point, b: Point) -> bool {
    let scale = a.to_vector()
        .square_length()
        .max(b.to_vector().square_length())
        .max(1.0);
    (a - b).square_length() <= EPSILON * EPSILON * scale
}

#[test]
fn double_angle_identities() {
    for &d in &[-2.5, -1.0, -0.3, 0.01, 0.5, 1.5] {
        let a = 2.0 * f64::atan(d);
        assert!((tan2atan(d) - a.tan()).abs() < 1e-9);
        assert!((sin2atan(d) - a.sin()).abs() < 1e-9);
        assert!((cos2atan(d) - a.cos()).abs() < 1e-9);
    }
}

#[test]
fn rebase_roundtrip() {
    let b = vector(0.6, 0.8);
    let v = vector(3.0, -2.0);
    let r = rebase(v, b);
    // Rebase against a unit basis preserves length.
    assert!((r.length() - v.length()).abs() < 1e-9);
    assert!((r.x - v.dot(b)).abs() < 1e-9);
}
