//! Operations on whole arc endpoint streams: extents, contour reversal and
//! winding normalization.

use crate::ArcEndpoint;
use crate::geom::arc::Arc;
use crate::geom::extents::Extents;
use crate::geom::math::{Point, point};
use crate::geom::utils::points_are_near;

use std::ops::Range;

/// Accumulates the axis-aligned bounds of every arc in the stream into
/// `extents`.
pub fn arc_list_extents(endpoints: &[ArcEndpoint], extents: &mut Extents) {
    extents.clear();
    let mut p0 = point(0.0, 0.0);
    let mut arc_extents = Extents::new();
    for endpoint in endpoints {
        if endpoint.is_move() {
            p0 = endpoint.p;
            continue;
        }
        let arc = Arc::new(p0, endpoint.p, endpoint.d);
        p0 = endpoint.p;

        arc.extents(&mut arc_extents);
        extents.extend(&arc_extents);
    }
}

/// Reverses a contour in place.
///
/// The depths shift by one position (each arc keeps its geometry, negated)
/// and the record order flips, so the leading move stays a move.
pub fn reverse(endpoints: &mut [ArcEndpoint]) {
    if endpoints.is_empty() {
        return;
    }

    // Shift the d's first.
    let n = endpoints.len();
    let d0 = endpoints[0].d;
    for i in 0..n - 1 {
        endpoints[i].d = -endpoints[i + 1].d;
    }
    endpoints[n - 1].d = d0;

    endpoints.reverse();
}

/// Number of times the horizontal ray going left from `p` crosses the arcs
/// of `endpoints`, ignoring records whose index falls in `skip`.
fn leftward_crossings(p: Point, endpoints: &[ArcEndpoint], skip: Range<usize>) -> usize {
    let mut count = 0;
    let mut p0 = point(0.0, 0.0);
    for (i, endpoint) in endpoints.iter().enumerate() {
        if endpoint.is_move() {
            p0 = endpoint.p;
            continue;
        }
        let arc = Arc::new(p0, endpoint.p, endpoint.d);
        p0 = endpoint.p;

        if skip.contains(&i) {
            continue;
        }

        if arc.is_a_line() {
            let s0 = arc.p0.y <= p.y;
            let s1 = arc.p1.y <= p.y;
            if s0 == s1 {
                continue;
            }
            let x = arc.p0.x + (arc.p1.x - arc.p0.x) * (p.y - arc.p0.y) / (arc.p1.y - arc.p0.y);
            if x < p.x {
                count += 1;
            }
        } else {
            let c = arc.center();
            let r = arc.radius();
            let dy = p.y - c.y;
            let dx2 = r * r - dy * dy;
            if dx2 <= 0.0 {
                continue;
            }
            let dx = dx2.sqrt();
            for &x in &[c.x - dx, c.x + dx] {
                if x < p.x && arc.wedge_contains_point(point(x, p.y)) {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Whether `p` is inside the contour under the even-odd rule.
pub fn contour_contains_point(contour: &[ArcEndpoint], p: Point) -> bool {
    leftward_crossings(p, contour, 0..0) % 2 == 1
}

/// Whether the contour turns counterclockwise.
///
/// Finds the leftmost part of the contour. If that is the interior of an
/// arc, the arc's sweep sign decides directly; if it is a corner, the
/// incoming and outgoing tangent angles there are compared.
fn winding(endpoints: &[ArcEndpoint]) -> bool {
    let n = endpoints.len();

    let mut corner = 0;
    for i in 1..n {
        let p = endpoints[i].p;
        let c = endpoints[corner].p;
        if p.x < c.x || (p.x == c.x && p.y < c.y) {
            corner = i;
        }
    }

    let mut min_x = endpoints[corner].p.x;
    let mut winner = None;
    let mut p0 = point(0.0, 0.0);
    for (i, endpoint) in endpoints.iter().enumerate() {
        // Arcs only, not lines.
        if endpoint.is_move() || endpoint.d == 0.0 {
            p0 = endpoint.p;
            continue;
        }
        let arc = Arc::new(p0, endpoint.p, endpoint.d);
        p0 = endpoint.p;

        let c = arc.center();
        let r = arc.radius();
        if c.x - r < min_x && arc.wedge_contains_point(point(c.x - r, c.y)) {
            min_x = c.x - r;
            winner = Some(i);
        }
    }

    if let Some(winner) = winner {
        return endpoints[winner].d > 0.0;
    }

    // The leftmost part is the corner endpoint. The contour is closed, so the
    // leading move and the last record are the same point; normalize to the
    // index carrying the incoming arc.
    let corner = if corner == 0 { n - 1 } else { corner };
    let ethis = endpoints[corner];
    let eprev = endpoints[corner - 1];
    // The outgoing arc of the last point is the contour's first arc.
    let enext = endpoints[if corner == n - 1 { 1 } else { corner + 1 }];

    let incoming = -Arc::new(eprev.p, ethis.p, ethis.d).tangents().1;
    let outgoing = Arc::new(ethis.p, enext.p, enext.d).tangents().0;
    incoming.y.atan2(incoming.x) > outgoing.y.atan2(outgoing.x)
}

fn process_contour(range: Range<usize>, endpoints: &mut [ArcEndpoint], inverse: bool) -> bool {
    // Need at least two arcs.
    if range.len() < 3 {
        return false;
    }
    // Leave open contours alone.
    if !points_are_near(endpoints[range.start].p, endpoints[range.end - 1].p) {
        return false;
    }

    let even_odd = leftward_crossings(endpoints[range.start].p, endpoints, range.clone()) % 2 == 1;

    if inverse ^ winding(&endpoints[range.clone()]) ^ even_odd {
        reverse(&mut endpoints[range]);
        return true;
    }

    false
}

/// Reorients every contour so that an even-odd-filled outline renders
/// correctly under the winding rule: contours at even nesting depth turn
/// clockwise, odd ones counterclockwise, or the opposite with `inverse`.
///
/// Returns whether any contour was reversed. Applying this twice with the
/// same `inverse` flag is the identity.
pub fn winding_from_even_odd(endpoints: &mut [ArcEndpoint], inverse: bool) -> bool {
    let mut ret = false;
    let mut start = 0;
    for i in 1..endpoints.len() {
        if endpoints[i].is_move() {
            ret |= process_contour(start..i, endpoints, inverse);
            start = i;
        }
    }
    if !endpoints.is_empty() {
        ret |= process_contour(start..endpoints.len(), endpoints, inverse);
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_8;

    fn moveto(x: f64, y: f64) -> ArcEndpoint {
        ArcEndpoint::new(point(x, y), f64::INFINITY)
    }

    fn lineto(x: f64, y: f64) -> ArcEndpoint {
        ArcEndpoint::new(point(x, y), 0.0)
    }

    // A counterclockwise unit square at (x, y).
    fn ccw_square(x: f64, y: f64, size: f64) -> Vec<ArcEndpoint> {
        vec![
            moveto(x, y),
            lineto(x + size, y),
            lineto(x + size, y + size),
            lineto(x, y + size),
            lineto(x, y),
        ]
    }

    #[test]
    fn extents_with_arc_bulge() {
        // A quarter circle reaches past its endpoints' box.
        let endpoints = [
            moveto(1.0, 0.0),
            ArcEndpoint::new(point(0.0, 1.0), FRAC_PI_8.tan()),
        ];
        let mut extents = Extents::new();
        arc_list_extents(&endpoints, &mut extents);
        assert!((extents.max_x - 1.0).abs() < 1e-9);
        assert!((extents.max_y - 1.0).abs() < 1e-9);
        assert!(extents.min_x.abs() < 1e-9);
        assert!(extents.min_y.abs() < 1e-9);

        // Moves alone contribute nothing.
        let mut empty = Extents::new();
        arc_list_extents(&[moveto(3.0, 4.0)], &mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn double_reversal_is_identity() {
        let original = vec![
            moveto(0.0, 0.0),
            lineto(10.0, 0.0),
            ArcEndpoint::new(point(10.0, 10.0), 0.3),
            lineto(0.0, 0.0),
        ];
        let mut endpoints = original.clone();
        reverse(&mut endpoints);
        assert!(endpoints[0].is_move());
        assert_eq!(endpoints[0].p, point(0.0, 0.0));
        // The arc keeps its geometry with a negated sweep.
        assert_eq!(endpoints[2].p, point(10.0, 10.0));
        assert_eq!(endpoints[2].d, -0.3);

        reverse(&mut endpoints);
        assert_eq!(endpoints, original);
    }

    #[test]
    fn contour_containment() {
        let square = ccw_square(0.0, 0.0, 10.0);
        assert!(contour_contains_point(&square, point(5.0, 5.0)));
        assert!(!contour_contains_point(&square, point(15.0, 5.0)));
        assert!(!contour_contains_point(&square, point(-5.0, 5.0)));

        // A circle made of two arcs.
        let circle = vec![
            moveto(1.0, 0.0),
            ArcEndpoint::new(point(-1.0, 0.0), 1.0),
            ArcEndpoint::new(point(1.0, 0.0), 1.0),
        ];
        assert!(contour_contains_point(&circle, point(0.0, 0.3)));
        assert!(!contour_contains_point(&circle, point(0.0, 1.5)));
    }

    #[test]
    fn winding_normalization() {
        // Outer and inner contour, both counterclockwise.
        let mut endpoints = ccw_square(0.0, 0.0, 100.0);
        endpoints.extend(ccw_square(25.0, 25.0, 50.0));

        let modified = winding_from_even_odd(&mut endpoints, false);
        assert!(modified);

        // The outer contour is now clockwise: its second record goes up the
        // left edge instead of along the bottom.
        assert_eq!(endpoints[0].p, point(0.0, 0.0));
        assert_eq!(endpoints[1].p, point(0.0, 100.0));
        // The inner contour kept its counterclockwise direction.
        assert_eq!(endpoints[5].p, point(25.0, 25.0));
        assert_eq!(endpoints[6].p, point(75.0, 25.0));

        // Idempotence.
        let snapshot = endpoints.clone();
        assert!(!winding_from_even_odd(&mut endpoints, false));
        assert_eq!(endpoints, snapshot);

        // The inverse flag flips both decisions.
        let mut inverted = ccw_square(0.0, 0.0, 100.0);
        inverted.extend(ccw_square(25.0, 25.0, 50.0));
        assert!(winding_from_even_odd(&mut inverted, true));
        assert_eq!(inverted[1].p, point(100.0, 0.0));
        assert_eq!(inverted[6].p, point(25.0, 75.0));
    }

    #[test]
    fn winding_with_arc_at_extreme() {
        // Clockwise circle (TrueType-style filled disc).
        let mut cw_circle = vec![
            moveto(1.0, 0.0),
            ArcEndpoint::new(point(-1.0, 0.0), -1.0),
            ArcEndpoint::new(point(1.0, 0.0), -1.0),
        ];
        // Already clockwise at even depth: nothing to do.
        assert!(!winding_from_even_odd(&mut cw_circle, false));

        let mut ccw_circle = vec![
            moveto(1.0, 0.0),
            ArcEndpoint::new(point(-1.0, 0.0), 1.0),
            ArcEndpoint::new(point(1.0, 0.0), 1.0),
        ];
        assert!(winding_from_even_odd(&mut ccw_circle, false));
        assert_eq!(ccw_circle[1].d, -1.0);
        assert_eq!(ccw_circle[2].d, -1.0);
    }
}
