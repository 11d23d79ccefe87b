use crate::math::{Point, point, Vector};
use crate::utils::perpendicular;

/// An infinite line in normal form `n·p = c`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line {
    /// Normal vector (not necessarily unit length).
    pub n: Vector,
    /// Offset such that `n.dot(p) == c` for every point `p` on the line.
    pub c: f64,
}

impl Line {
    #[inline]
    pub fn new(n: Vector, c: f64) -> Self {
        Line { n, c }
    }

    /// The line through two points.
    #[inline]
    pub fn from_points(p0: Point, p1: Point) -> Self {
        let n = perpendicular(p1 - p0);
        Line { n, c: n.dot(p0.to_vector()) }
    }

    /// Returns a line with the same geometry and a unit normal.
    pub fn normalized(&self) -> Self {
        let d = self.n.length();
        if d == 0.0 {
            return *self;
        }
        Line { n: self.n / d, c: self.c / d }
    }

    #[inline]
    pub fn normal(&self) -> Vector {
        self.n
    }

    /// Intersection of two lines, or `(∞, ∞)` when they are parallel.
    pub fn intersect(&self, other: &Line) -> Point {
        let det = self.n.x * other.n.y - self.n.y * other.n.x;
        if det == 0.0 {
            return point(f64::INFINITY, f64::INFINITY);
        }
        point(
            (self.c * other.n.y - self.n.y * other.c) / det,
            (self.n.x * other.c - self.c * other.n.x) / det,
        )
    }

    /// Signed perpendicular distance from `p` to the line. The sign is
    /// negative on the side the normal points to.
    #[inline]
    pub fn signed_distance_to_point(&self, p: Point) -> f64 {
        -(self.n.dot(p.to_vector()) - self.c) / self.n.length()
    }

    /// Orthogonal projection of `p` onto the line.
    pub fn nearest_point(&self, p: Point) -> Point {
        p + self.n.normalize() * self.signed_distance_to_point(p)
    }
}

/// A line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    /// Returns the line containing this segment.
    #[inline]
    pub fn to_line(&self) -> Line {
        Line::from_points(self.from, self.to)
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    /// Whether the orthogonal projection of `p` falls between the endpoints,
    /// i.e. `p` is in the stripe swept by sliding this segment along its
    /// normal.
    pub fn contains_in_span(&self, p: Point) -> bool {
        if self.from == self.to {
            return false;
        }

        let z = self.to_line().nearest_point(p);

        // Compare along the dominant axis.
        if (self.to.y - self.from.y).abs() > (self.to.x - self.from.x).abs() {
            let dz = z.y - self.from.y;
            let dw = self.to.y - self.from.y;
            (dz > 0.0 && dw > dz) || (dz < 0.0 && dw < dz)
        } else {
            let dz = z.x - self.from.x;
            let dw = self.to.x - self.from.x;
            (dz > 0.0 && dw > dz) || (dz < 0.0 && dw < dz)
        }
    }

    /// Shortest distance from `p` to the segment, signed by which side of the
    /// segment's supporting line `p` lies on.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        if self.from == self.to {
            return 0.0;
        }

        let line = self.to_line();
        let mag = line.signed_distance_to_point(p);
        if self.contains_in_span(p) {
            return mag;
        }

        let d0 = (p - self.from).length();
        let d1 = (p - self.to).length();
        d0.min(d1) * if mag < 0.0 { -1.0 } else { 1.0 }
    }

    /// Shortest squared distance from `p` to the segment.
    pub fn squared_distance_to_point(&self, p: Point) -> f64 {
        if self.from == self.to {
            return 0.0;
        }

        if self.contains_in_span(p) {
            let line = self.to_line();
            let v = line.n.dot(p.to_vector()) - line.c;
            return v * v / line.n.square_length();
        }

        (p - self.from)
            .square_length()
            .min((p - self.to).square_length())
    }

    /// The point of the segment nearest to `p`.
    pub fn nearest_part(&self, p: Point) -> Point {
        if self.contains_in_span(p) {
            return self.to_line().nearest_point(p);
        }
        if (p - self.from).square_length() < (p - self.to).square_length() {
            self.from
        } else {
            self.to
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vector;

    #[test]
    fn intersection() {
        let l1 = Line::from_points(point(0.0, 0.0), point(2.0, 0.0));
        let l2 = Line::from_points(point(1.0, -1.0), point(1.0, 1.0));
        let p = l1.intersect(&l2);
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);

        // Parallel lines meet at infinity.
        let l3 = Line::new(vector(0.0, 2.0), 5.0);
        assert!(l1.intersect(&l3).x.is_infinite());
    }

    #[test]
    fn segment_distance() {
        let s = LineSegment { from: point(0.0, 0.0), to: point(100.0, 0.0) };

        assert!(s.contains_in_span(point(50.0, 10.0)));
        assert!(!s.contains_in_span(point(150.0, 10.0)));

        // Above the segment (normal points up): negative side.
        assert!((s.distance_to_point(point(50.0, 10.0)) + 10.0).abs() < 1e-9);
        // Below: positive.
        assert!((s.distance_to_point(point(50.0, -10.0)) - 10.0).abs() < 1e-9);
        // Past an endpoint, distance goes to the endpoint.
        let d = s.distance_to_point(point(103.0, 4.0));
        assert!((d.abs() - 5.0).abs() < 1e-9);
        assert!((s.squared_distance_to_point(point(103.0, 4.0)) - 25.0).abs() < 1e-9);

        assert_eq!(s.nearest_part(point(103.0, 4.0)), point(100.0, 0.0));
        let near = s.nearest_part(point(50.0, 10.0));
        assert!((near.x - 50.0).abs() < 1e-9 && near.y.abs() < 1e-9);
    }
}
