//! Circular arcs in the endpoint + depth representation.

use crate::cubic_bezier::CubicBezierSegment;
use crate::extents::Extents;
use crate::line::LineSegment;
use crate::math::{Point, point, Vector};
use crate::utils::{cos2atan, perpendicular, points_are_near, sin2atan, tan2atan};

use std::f64::consts::FRAC_PI_2;

/// Below this depth an arc degenerates to its chord; center and radius are
/// undefined.
const LINE_DEPTH: f64 = 1e-5;

/// A circle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// A circular arc from `p0` to `p1`.
///
/// The depth `d` is `tan(θ/4)` for a signed sweep angle `θ`; its sign picks
/// the sweep direction and `|d| > 1` describes the larger of the two arcs
/// through the endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc {
    pub p0: Point,
    pub p1: Point,
    pub d: f64,
}

impl Arc {
    #[inline]
    pub fn new(p0: Point, p1: Point, d: f64) -> Self {
        Arc { p0, p1, d }
    }

    /// The arc from `p0` to `p1` passing through `pm`, or its complement when
    /// `complement` is true.
    pub fn from_points(p0: Point, p1: Point, pm: Point, complement: bool) -> Self {
        let d = if points_are_near(p0, pm) || points_are_near(p1, pm) {
            0.0
        } else {
            let a1 = (p1 - pm).y.atan2((p1 - pm).x);
            let a0 = (p0 - pm).y.atan2((p0 - pm).x);
            ((a1 - a0) / 2.0 - if complement { 0.0 } else { FRAC_PI_2 }).tan()
        };
        Arc { p0, p1, d }
    }

    /// Whether the depth is below the straight-line cutoff.
    #[inline]
    pub fn is_a_line(&self) -> bool {
        self.d.abs() < LINE_DEPTH
    }

    #[inline]
    fn to_segment(&self) -> LineSegment {
        LineSegment { from: self.p0, to: self.p1 }
    }

    pub fn radius(&self) -> f64 {
        ((self.p1 - self.p0).length() / (2.0 * sin2atan(self.d))).abs()
    }

    pub fn center(&self) -> Point {
        self.p0.lerp(self.p1, 0.5) + perpendicular(self.p1 - self.p0) / (2.0 * tan2atan(self.d))
    }

    pub fn circle(&self) -> Circle {
        Circle { center: self.center(), radius: self.radius() }
    }

    /// Tangent vectors at `p0` and `p1`, pointing along the direction of
    /// travel. Not unit length.
    pub fn tangents(&self) -> (Vector, Vector) {
        let dp = (self.p1 - self.p0) * 0.5;
        let pp = perpendicular(dp) * -sin2atan(self.d);
        let dp = dp * cos2atan(self.d);
        (dp + pp, dp - pp)
    }

    /// Whether `p` falls in the angular wedge spanned by the arc: the convex
    /// cone from the center through `(p0, p1)`, with the convention reversed
    /// for `|d| > 1`.
    pub fn wedge_contains_point(&self, p: Point) -> bool {
        let t = self.tangents();
        if self.d.abs() <= 1.0 {
            (p - self.p0).dot(t.0) >= 0.0 && (p - self.p1).dot(t.1) <= 0.0
        } else {
            (p - self.p0).dot(t.0) >= 0.0 || (p - self.p1).dot(t.1) <= 0.0
        }
    }

    /// Signed distance from `p` to the arc.
    ///
    /// Inside the wedge this is the distance to the full circle, signed by
    /// `sgn(d) · sgn(|p − center| − radius)`; outside it is the distance to
    /// the nearer endpoint, signed by the tangent line of the extended arc at
    /// that endpoint.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        if self.is_a_line() {
            return self.to_segment().distance_to_point(p);
        }

        if self.wedge_contains_point(p) {
            let c = self.center();
            let sd = ((p - c).length() - self.radius()).abs();
            let negative = ((p - c).length() < self.radius()) ^ (self.d < 0.0);
            return if negative { -sd } else { sd };
        }

        let d0 = (p - self.p0).square_length();
        let d1 = (p - self.p1).square_length();
        // The extension of the arc past its endpoints has depth (1+d)/(1-d).
        let extension = Arc::new(self.p0, self.p1, (1.0 + self.d) / (1.0 - self.d));
        let negative = !extension.wedge_contains_point(p);
        d0.min(d1).sqrt() * if negative { -1.0 } else { 1.0 }
    }

    /// Squared distance from `p` to the arc (unsigned).
    pub fn squared_distance_to_point(&self, p: Point) -> f64 {
        if self.is_a_line() {
            return self.to_segment().squared_distance_to_point(p);
        }

        if self.wedge_contains_point(p) {
            let a = (p - self.center()).length() - self.radius();
            return a * a;
        }

        (p - self.p0)
            .square_length()
            .min((p - self.p1).square_length())
    }

    /// Signed distance from `p` to the tangent line at the nearer end of the
    /// arc. Only meaningful for points outside the wedge.
    pub fn extended_dist(&self, p: Point) -> f64 {
        let m = self.p0.lerp(self.p1, 0.5);
        let dp = (self.p1 - self.p0) * 0.5;
        let pp = perpendicular(dp);
        let d2 = tan2atan(self.d);
        if (p - m).dot(self.p1 - m) < 0.0 {
            (p - self.p0).dot((pp + dp * d2).normalize())
        } else {
            (p - self.p1).dot((pp - dp * d2).normalize())
        }
    }

    /// The point of the arc nearest to `p`.
    pub fn nearest_part(&self, p: Point) -> Point {
        if self.is_a_line() {
            return self.to_segment().nearest_part(p);
        }

        if self.wedge_contains_point(p) {
            let c = self.center();
            return p + (c - p) * (1.0 - self.radius() / (p - c).length());
        }

        let d0 = (p - self.p0).square_length();
        let d1 = (p - self.p1).square_length();
        if d0 < d1 { self.p0 } else { self.p1 }
    }

    /// The unique cubic bézier sharing this arc's endpoints and tangent
    /// directions, together with an upper bound on their deviation:
    /// `|p1 − p0| · |d|⁵ / (54 · (1 + d²))`.
    pub fn approximate_bezier(&self) -> (CubicBezierSegment, f64) {
        let d = self.d;
        let dp = self.p1 - self.p0;
        let pp = perpendicular(dp);
        let error = dp.length() * d.abs().powi(5) / (54.0 * (1.0 + d * d));
        let bezier = CubicBezierSegment {
            from: self.p0,
            ctrl1: self.p0 + dp * ((1.0 - d * d) / 3.0) - pp * (2.0 * d / 3.0),
            ctrl2: self.p1 - dp * ((1.0 - d * d) / 3.0) - pp * (2.0 * d / 3.0),
            to: self.p1,
        };
        (bezier, error)
    }

    /// Leftmost point of the arc.
    pub fn leftmost(&self) -> Point {
        if !self.is_a_line() {
            let c = self.center();
            let answer = point(c.x - self.radius(), c.y);
            if self.wedge_contains_point(answer) {
                return answer;
            }
        }
        if self.p0.x < self.p1.x { self.p0 } else { self.p1 }
    }

    /// Rightmost point of the arc.
    pub fn rightmost(&self) -> Point {
        if !self.is_a_line() {
            let c = self.center();
            let answer = point(c.x + self.radius(), c.y);
            if self.wedge_contains_point(answer) {
                return answer;
            }
        }
        if self.p0.x > self.p1.x { self.p0 } else { self.p1 }
    }

    /// Lowest point of the arc.
    pub fn lowest(&self) -> Point {
        if !self.is_a_line() {
            let c = self.center();
            let answer = point(c.x, c.y - self.radius());
            if self.wedge_contains_point(answer) {
                return answer;
            }
        }
        if self.p0.y < self.p1.y { self.p0 } else { self.p1 }
    }

    /// Highest point of the arc.
    pub fn highest(&self) -> Point {
        if !self.is_a_line() {
            let c = self.center();
            let answer = point(c.x, c.y + self.radius());
            if self.wedge_contains_point(answer) {
                return answer;
            }
        }
        if self.p0.y > self.p1.y { self.p0 } else { self.p1 }
    }

    /// Axis-aligned bounds of the arc alone.
    pub fn extents(&self, extents: &mut Extents) {
        extents.clear();
        extents.add(self.p0);
        extents.add(self.p1);

        if self.is_a_line() {
            return;
        }

        let c = self.center();
        let r = self.radius();
        let cardinals = [
            point(c.x - r, c.y),
            point(c.x + r, c.y),
            point(c.x, c.y - r),
            point(c.x, c.y + r),
        ];
        for &q in &cardinals {
            if self.wedge_contains_point(q) {
                extents.add(q);
            }
        }
    }

    /// A point where this arc crosses `other`, if one exists.
    pub fn intersects_arc(&self, other: &Arc) -> Option<Point> {
        match (self.is_a_line(), other.is_a_line()) {
            (true, true) => {
                let p = self
                    .to_segment()
                    .to_line()
                    .intersect(&other.to_segment().to_line());
                if p.x.is_finite()
                    && self.to_segment().contains_in_span(p)
                    && other.to_segment().contains_in_span(p)
                {
                    Some(p)
                } else {
                    None
                }
            }
            (true, false) => segment_arc_intersection(&self.to_segment(), other),
            (false, true) => segment_arc_intersection(&other.to_segment(), self),
            (false, false) => arc_arc_intersection(self, other),
        }
    }
}

fn segment_arc_intersection(seg: &LineSegment, arc: &Arc) -> Option<Point> {
    if seg.from == seg.to {
        return None;
    }
    let c = arc.center();
    let r = arc.radius();
    let foot = seg.to_line().nearest_point(c);
    let h2 = r * r - (foot - c).square_length();
    if h2 < 0.0 {
        return None;
    }
    let dir = seg.to_vector().normalize();
    let h = h2.sqrt();
    for &q in &[foot + dir * h, foot - dir * h] {
        if seg.contains_in_span(q) && arc.wedge_contains_point(q) {
            return Some(q);
        }
    }
    None
}

fn arc_arc_intersection(a: &Arc, b: &Arc) -> Option<Point> {
    let ca = a.center();
    let cb = b.center();
    let ra = a.radius();
    let rb = b.radius();
    let v = cb - ca;
    let dist = v.length();
    if dist == 0.0 || dist > ra + rb || dist < (ra - rb).abs() {
        return None;
    }
    let along = (ra * ra - rb * rb + dist * dist) / (2.0 * dist);
    let h2 = ra * ra - along * along;
    if h2 < 0.0 {
        return None;
    }
    let h = h2.sqrt();
    let u = v / dist;
    let m = ca + u * along;
    for &q in &[m + perpendicular(u) * h, m - perpendicular(u) * h] {
        if a.wedge_contains_point(q) && b.wedge_contains_point(q) {
            return Some(q);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, SQRT_2};

    #[test]
    fn quarter_circle() {
        let arc = Arc::new(point(1.0, 0.0), point(0.0, 1.0), FRAC_PI_8.tan());
        let c = arc.center();
        assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9);
        assert!((arc.radius() - 1.0).abs() < 1e-9);

        // The same arc reconstructed from its midpoint.
        let mid = point(FRAC_PI_4.cos(), FRAC_PI_4.sin());
        let built = Arc::from_points(arc.p0, arc.p1, mid, false);
        assert!((built.d - arc.d).abs() < 1e-9);

        // Tangent at p0 points up, tangent at p1 points left.
        let (t0, t1) = arc.tangents();
        assert!(t0.x.abs() < 1e-9 && t0.y > 0.0);
        assert!(t1.y.abs() < 1e-9 && t1.x < 0.0);
    }

    #[test]
    fn wedge() {
        let arc = Arc::new(point(1.0, 0.0), point(0.0, 1.0), FRAC_PI_8.tan());
        assert!(arc.wedge_contains_point(point(SQRT_2, SQRT_2)));
        assert!(arc.wedge_contains_point(point(0.1, 0.2)));
        assert!(!arc.wedge_contains_point(point(-1.0, 0.5)));
        assert!(!arc.wedge_contains_point(point(0.5, -1.0)));

        // The complement arc contains exactly the rest of the plane's
        // directions.
        let large = Arc::new(point(1.0, 0.0), point(0.0, 1.0), (FRAC_PI_8 - FRAC_PI_2).tan());
        assert!(!large.wedge_contains_point(point(SQRT_2, SQRT_2)));
        assert!(large.wedge_contains_point(point(-1.0, -1.0)));
    }

    #[test]
    fn distances() {
        let arc = Arc::new(point(1.0, 0.0), point(0.0, 1.0), FRAC_PI_8.tan());

        // In the wedge: distance to the circle, positive outside for d > 0.
        assert!((arc.distance_to_point(point(2.0, 0.00001)) - 1.0).abs() < 1e-4);
        assert!((arc.distance_to_point(point(0.5, 0.5)) + (1.0 - SQRT_2 / 2.0)).abs() < 1e-6);

        // Out of the wedge: distance to the nearest endpoint.
        let d = arc.distance_to_point(point(1.0, -1.0));
        assert!((d.abs() - 1.0).abs() < 1e-9);
        assert!((arc.squared_distance_to_point(point(1.0, -1.0)) - 1.0).abs() < 1e-9);

        // Degenerate depth behaves as a segment.
        let line = Arc::new(point(0.0, 0.0), point(100.0, 0.0), 0.0);
        assert!((line.distance_to_point(point(50.0, 10.0)) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn nearest() {
        let arc = Arc::new(point(1.0, 0.0), point(0.0, 1.0), FRAC_PI_8.tan());
        let n = arc.nearest_part(point(2.0, 2.0));
        assert!((n - point(SQRT_2 / 2.0, SQRT_2 / 2.0)).length() < 1e-6);
        assert_eq!(arc.nearest_part(point(1.2, -2.0)), point(1.0, 0.0));
    }

    #[test]
    fn osculating_bezier() {
        let arc = Arc::new(point(1.0, 0.0), point(0.0, 1.0), FRAC_PI_8.tan());
        let (b, e) = arc.approximate_bezier();
        assert_eq!(b.from, arc.p0);
        assert_eq!(b.to, arc.p1);
        let expected =
            (arc.p1 - arc.p0).length() * arc.d.abs().powi(5) / (54.0 * (1.0 + arc.d * arc.d));
        assert!((e - expected).abs() < 1e-12);

        // The curve midpoint should sit on the arc.
        let m = b.sample(0.5);
        assert!(((m - point(0.0, 0.0)).length() - 1.0).abs() < e + 1e-9);
    }

    #[test]
    fn arc_extents() {
        // Upper semicircle, counterclockwise.
        let arc = Arc::new(point(1.0, 0.0), point(-1.0, 0.0), 1.0);
        let mut extents = Extents::new();
        arc.extents(&mut extents);
        assert!((extents.max_y - 1.0).abs() < 1e-9);
        assert!((extents.min_y - 0.0).abs() < 1e-9);
        assert!((extents.min_x + 1.0).abs() < 1e-9);
        assert!((extents.max_x - 1.0).abs() < 1e-9);

        assert!((arc.highest().y - 1.0).abs() < 1e-9);
        assert_eq!(arc.lowest(), point(-1.0, 0.0));
    }

    #[test]
    fn intersections() {
        let a = Arc::new(point(-1.0, -1.0), point(1.0, 1.0), 0.0);
        let b = Arc::new(point(-1.0, 1.0), point(1.0, -1.0), 0.0);
        let p = a.intersects_arc(&b).unwrap();
        assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);

        // Parallel segments do not intersect.
        let c = Arc::new(point(-1.0, 2.0), point(1.0, 2.0), 0.0);
        let d = Arc::new(point(-1.0, 3.0), point(1.0, 3.0), 0.0);
        assert!(c.intersects_arc(&d).is_none());

        // Unit quarter circle against a segment through it.
        let arc = Arc::new(point(1.0, 0.0), point(0.0, 1.0), FRAC_PI_8.tan());
        let seg = Arc::new(point(0.0, 0.0), point(2.0, 2.0), 0.0);
        let q = seg.intersects_arc(&arc).unwrap();
        assert!((q.to_vector().length() - 1.0).abs() < 1e-9);

        // Two unit circles' upper halves crossing.
        let a = Arc::new(point(0.0, 0.0), point(2.0, 0.0), -1.0);
        let b = Arc::new(point(1.0, 0.0), point(3.0, 0.0), -1.0);
        let q = a.intersects_arc(&b).unwrap();
        assert!((q.x - 1.5).abs() < 1e-9 && q.y > 0.0);
    }
}
