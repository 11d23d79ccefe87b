use crate::math::{Point, Vector};

use std::ops::Range;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicBezierSegment {
    /// Lifts a quadratic bézier to the equivalent cubic.
    pub fn from_quadratic(from: Point, ctrl: Point, to: Point) -> Self {
        CubicBezierSegment {
            from,
            ctrl1: from.lerp(ctrl, 2.0 / 3.0),
            ctrl2: to.lerp(ctrl, 2.0 / 3.0),
            to,
        }
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;
        self.from * one_t3
            + self.ctrl1.to_vector() * 3.0 * one_t2 * t
            + self.ctrl2.to_vector() * 3.0 * one_t * t2
            + self.to.to_vector() * t3
    }

    #[inline]
    fn derivative_coefficients(&self, t: f64) -> (f64, f64, f64, f64) {
        let t2 = t * t;
        (
            -3.0 * t2 + 6.0 * t - 3.0,
            9.0 * t2 - 12.0 * t + 3.0,
            -9.0 * t2 + 6.0 * t,
            3.0 * t2,
        )
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: f64) -> Vector {
        let (c0, c1, c2, c3) = self.derivative_coefficients(t);
        self.from.to_vector() * c0
            + self.ctrl1.to_vector() * c1
            + self.ctrl2.to_vector() * c2
            + self.to.to_vector() * c3
    }

    /// Split this curve into two sub-curves.
    ///
    /// De Casteljau: the intermediate lerps of the evaluation at `t` are the
    /// control points of the two halves.
    pub fn split(&self, t: f64) -> (CubicBezierSegment, CubicBezierSegment) {
        let ab = self.from.lerp(self.ctrl1, t);
        let bc = self.ctrl1.lerp(self.ctrl2, t);
        let cd = self.ctrl2.lerp(self.to, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let split_point = abc.lerp(bcd, t);
        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ab,
                ctrl2: abc,
                to: split_point,
            },
            CubicBezierSegment {
                from: split_point,
                ctrl1: bcd,
                ctrl2: cd,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: f64) -> CubicBezierSegment {
        self.split(t).0
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: f64) -> CubicBezierSegment {
        self.split(t).1
    }

    /// Split this curve at its parametric midpoint.
    ///
    /// Cheaper than `split(0.5)` and, more importantly, both halves share the
    /// midpoint bit-exactly.
    pub fn halve(&self) -> (CubicBezierSegment, CubicBezierSegment) {
        let p01 = self.from.lerp(self.ctrl1, 0.5);
        let p12 = self.ctrl1.lerp(self.ctrl2, 0.5);
        let p23 = self.ctrl2.lerp(self.to, 0.5);
        let p012 = p01.lerp(p12, 0.5);
        let p123 = p12.lerp(p23, 0.5);
        let p0123 = p012.lerp(p123, 0.5);
        (
            CubicBezierSegment { from: self.from, ctrl1: p01, ctrl2: p012, to: p0123 },
            CubicBezierSegment { from: p0123, ctrl1: p123, ctrl2: p23, to: self.to },
        )
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<f64>) -> CubicBezierSegment {
        let (t0, t1) = (t_range.start, t_range.end);
        if (t1 - t0).abs() < 1e-6 {
            let p = self.sample(t0);
            return CubicBezierSegment { from: p, ctrl1: p, ctrl2: p, to: p };
        }
        self.after_split(t0).before_split((t1 - t0) / (1.0 - t0))
    }
}
