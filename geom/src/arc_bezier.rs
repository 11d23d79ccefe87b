//! Approximating a cubic bézier with a single circular arc.

use crate::arc::Arc;
use crate::cubic_bezier::CubicBezierSegment;
use crate::math::{vector, Vector};
use crate::utils::{normalize_or_zero, rebase};

use arrayvec::ArrayVec;

/// Strategy estimating the supremum of `|d₀·t(1−t)² + d₁·t²(1−t)|` over
/// `t ∈ [0, 1]`: the deviation between two cubics sharing their endpoints
/// whose control points differ by `d₀` and `d₁`.
pub trait MaxDeviation {
    fn deviation(d0: f64, d1: f64) -> f64;
}

/// Cheap upper bound for the deviation supremum.
pub struct FastDeviation;

impl MaxDeviation for FastDeviation {
    fn deviation(d0: f64, d1: f64) -> f64 {
        let d0 = d0.abs();
        let d1 = d1.abs();
        let e0 = 3.0 / 4.0 * d0.max(d1);
        let e1 = 4.0 / 9.0 * (d0 + d1);
        e0.min(e1)
    }
}

/// Exact deviation supremum, from the closed-form roots of the derivative.
pub struct ExactDeviation;

impl MaxDeviation for ExactDeviation {
    fn deviation(d0: f64, d1: f64) -> f64 {
        let mut candidates = ArrayVec::<[f64; 4]>::new();
        candidates.push(0.0);
        candidates.push(1.0);
        if d0 == d1 {
            candidates.push(0.5);
        } else {
            let delta = d0 * d0 - d0 * d1 + d1 * d1;
            let t2 = 1.0 / (3.0 * (d0 - d1));
            let t0 = (2.0 * d0 - d1) * t2;
            if delta == 0.0 {
                candidates.push(t0);
            } else if delta > 0.0 {
                let t1 = delta.sqrt() * t2;
                candidates.push(t0 - t1);
                candidates.push(t0 + t1);
            }
        }

        let mut e: f64 = 0.0;
        for &t in &candidates {
            if t < 0.0 || t > 1.0 {
                continue;
            }
            let ee = (3.0 * t * (1.0 - t) * (d0 * (1.0 - t) + d1 * t)).abs();
            e = e.max(ee);
        }

        e
    }
}

/// The default deviation estimator.
pub type DefaultDeviation = ExactDeviation;

/// Upper bound on `max dist(b0(t), a)` for an arc `a` sharing the endpoints
/// of `b0`.
///
/// The bound combines the arc's intrinsic arc-to-cubic error with the
/// control-point deviation of the two cubics, rebased so the x axis is the
/// chord, and tightened by the arc's curvature when the deviation direction
/// leaves the arc's half-angle cone.
pub fn arc_bezier_error<M: MaxDeviation>(b0: &CubicBezierSegment, a: &Arc) -> f64 {
    debug_assert!(b0.from == a.p0);
    debug_assert!(b0.to == a.p1);

    let (b1, ea) = a.approximate_bezier();

    debug_assert!(b0.from == b1.from);
    debug_assert!(b0.to == b1.to);

    // A degenerate curve has no chord direction; the rebased deviations
    // collapse to zero and the weak bound below takes over.
    let chord = normalize_or_zero(b0.to - b0.from);
    let v0 = rebase(b1.ctrl1 - b0.ctrl1, chord);
    let v1 = rebase(b1.ctrl2 - b0.ctrl2, chord);

    let mut v: Vector = vector(M::deviation(v0.x, v1.x), M::deviation(v0.y, v1.y));

    // If d² is too close to 1 fall back to the weak bound.
    if (a.d * a.d - 1.0).abs() < 1e-4 {
        return ea + v.length();
    }

    let tan_half_alpha = 2.0 * a.d.abs() / (1.0 - a.d * a.d);
    if v.y.abs() < 1e-6 {
        v.y = 1e-6;
    }
    let tan_v = v.x / v.y;

    if a.d.abs() < 1e-6
        || tan_half_alpha < 0.0
        || (-tan_half_alpha <= tan_v && tan_v <= tan_half_alpha)
    {
        return ea + v.length();
    }

    let c2 = (b1.to - b1.from).length() / 2.0;
    let r = c2 * (a.d * a.d + 1.0) / (2.0 * a.d.abs());

    ea + (Vector::new(c2 / tan_half_alpha + v.y, c2 + v.x).length() - r)
}

/// Approximates `b` with a single arc through its parametric midpoint and
/// reports an upper bound on the deviation, estimated separately over each
/// half of the curve.
pub fn approximate_bezier_with_arc(b: &CubicBezierSegment) -> (Arc, f64) {
    let (first, second) = b.halve();
    let m = second.from;

    let a0 = Arc::from_points(b.from, m, b.to, true);
    let a1 = Arc::from_points(m, b.to, b.from, true);

    let e0 = arc_bezier_error::<DefaultDeviation>(&first, &a0);
    let e1 = arc_bezier_error::<DefaultDeviation>(&second, &a1);

    (Arc::from_points(b.from, b.to, m, false), e0.max(e1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn deviation_estimators() {
        // With d0 == d1 == 1 the supremum is 3t(1-t), maximal at t = 1/2.
        assert!((ExactDeviation::deviation(1.0, 1.0) - 0.75).abs() < 1e-12);
        assert!((ExactDeviation::deviation(-1.0, -1.0) - 0.75).abs() < 1e-12);
        assert_eq!(ExactDeviation::deviation(0.0, 0.0), 0.0);

        // The fast estimator is never below the exact one.
        for &(d0, d1) in &[(1.0, 1.0), (0.3, -0.7), (2.0, 0.1), (-0.5, 0.0)] {
            assert!(FastDeviation::deviation(d0, d1) >= ExactDeviation::deviation(d0, d1) - 1e-12);
        }
    }

    #[test]
    fn quarter_circle_arc() {
        // The standard cubic approximation of a unit quarter circle.
        let k = 4.0 / 3.0 * (FRAC_PI_4 / 2.0).tan();
        let b = CubicBezierSegment {
            from: point(1.0, 0.0),
            ctrl1: point(1.0, k),
            ctrl2: point(k, 1.0),
            to: point(0.0, 1.0),
        };

        let (arc, error) = approximate_bezier_with_arc(&b);
        assert_eq!(arc.p0, b.from);
        assert_eq!(arc.p1, b.to);
        // The cubic is an excellent circle approximation, so the arc should
        // be very close to the true quarter circle.
        assert!((arc.d - (FRAC_PI_4 / 2.0).tan()).abs() < 1e-3);
        assert!(error < 5e-3);

        // The reported error really bounds the sampled deviation.
        for i in 1..20 {
            let t = i as f64 / 20.0;
            let dist = arc.distance_to_point(b.sample(t)).abs();
            assert!(dist <= error + 1e-12);
        }
    }

    #[test]
    fn straight_cubic() {
        // Control points at the thirds: a uniformly parametrized line.
        let b = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(4.0 / 3.0, 0.0),
            ctrl2: point(8.0 / 3.0, 0.0),
            to: point(4.0, 0.0),
        };
        let (arc, error) = approximate_bezier_with_arc(&b);
        assert_eq!(arc.d, 0.0);
        // The estimator floors the deviation direction at 1e-6, so "zero"
        // error comes out in that ballpark.
        assert!(error < 1e-5);

        // A line with a skewed parametrization is still a zero-depth arc, but
        // the parametric bound is allowed to be conservative.
        let skewed = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 0.0),
            ctrl2: point(3.0, 0.0),
            to: point(4.0, 0.0),
        };
        let (arc, error) = approximate_bezier_with_arc(&skewed);
        assert_eq!(arc.d, 0.0);
        assert!(error >= 0.0 && error < 1.0);
    }
}
