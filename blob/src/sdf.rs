//! Signed distance to an arc list, computed on the CPU.

use crate::geom::arc::Arc;
use crate::geom::math::{Point, point};
use crate::path::ArcEndpoint;

const EPSILON: f64 = 1e-6;

/// Signed distance from `p` to the outline described by the endpoint
/// stream. Negative inside the fill of clockwise contours, positive outside;
/// `+∞` for an empty stream.
///
/// Walks every arc and keeps the nearest. Distances measured inside an arc's
/// wedge carry a sign already; when the nearest feature is a shared endpoint
/// the sign is taken from whichever adjoining arc's tangent-line extension
/// lies farther from `p`.
pub fn sdf_from_arc_list(endpoints: &[ArcEndpoint], p: Point) -> f64 {
    let mut min_dist = f64::INFINITY;
    let mut side = 0i32;
    let mut closest_arc: Option<Arc> = None;

    let mut p0 = point(0.0, 0.0);
    for endpoint in endpoints {
        if endpoint.is_move() {
            p0 = endpoint.p;
            continue;
        }
        let arc = Arc::new(p0, endpoint.p, endpoint.d);
        p0 = endpoint.p;

        if arc.wedge_contains_point(p) {
            let sdist = arc.distance_to_point(p);
            let udist = sdist.abs() * (1.0 - EPSILON);
            if udist <= min_dist {
                min_dist = udist;
                side = if sdist >= 0.0 { -1 } else { 1 };
            }
        } else {
            let udist = (p - arc.p0).length().min((p - arc.p1).length());
            if udist < min_dist {
                min_dist = udist;
                side = 0; // unsure
                closest_arc = Some(arc);
            } else if side == 0 && udist == min_dist {
                // Tie at a shared endpoint: take the sign from the arc whose
                // tangent-line extension is farther away.
                let old_ext_dist = closest_arc.as_ref().map_or(0.0, |a| a.extended_dist(p));
                let new_ext_dist = arc.extended_dist(p);
                let ext_dist = if new_ext_dist.abs() <= old_ext_dist.abs() {
                    old_ext_dist
                } else {
                    new_ext_dist
                };
                side = if ext_dist >= 0.0 { 1 } else { -1 };
            }
        }
    }

    if side == 0 {
        let ext_dist = closest_arc.as_ref().map_or(0.0, |a| a.extended_dist(p));
        side = if ext_dist >= 0.0 { 1 } else { -1 };
    }

    min_dist * side as f64
}
