//! Subdivision of a cubic bézier into a chain of circular arcs within a
//! tolerance.
//!
//! An outer sweep tries increasing arc counts. At each count, if at least one
//! segment already meets the tolerance, the knots are re-weighted a few times
//! like a relaxing spring system: each segment gets a length proportional to
//! `l·e^(-0.3)` so high-error spans shrink and low-error spans grow. The
//! exponent is an empirically tuned spring constant that settles quickly on
//! the cusp, loop and inflection shapes found in font outlines.

use crate::arc::Arc;
use crate::arc_bezier::approximate_bezier_with_arc;
use crate::cubic_bezier::CubicBezierSegment;

/// Upper bound on the number of arcs produced for one curve.
pub const DEFAULT_MAX_SEGMENTS: usize = 1000;

fn calc_arcs(
    b: &CubicBezierSegment,
    t: &[f64],
    e: &mut Vec<f64>,
    arcs: &mut Vec<Arc>,
) -> (f64, f64) {
    let n = t.len() - 1;
    e.clear();
    arcs.clear();
    let mut max_e: f64 = 0.0;
    let mut min_e: f64 = f64::INFINITY;
    for i in 0..n {
        let segment = b.split_range(t[i]..t[i + 1]);
        let (arc, error) = approximate_bezier_with_arc(&segment);
        arcs.push(arc);
        e.push(error);

        max_e = max_e.max(error);
        min_e = min_e.min(error);
    }
    (max_e, min_e)
}

fn jiggle(
    b: &CubicBezierSegment,
    t: &mut [f64],
    e: &mut Vec<f64>,
    arcs: &mut Vec<Arc>,
    max_e: &mut f64,
    min_e: &mut f64,
    tolerance: f64,
) {
    let n = t.len() - 1;
    let max_jiggle = (n as f64).log2() as usize;
    for _ in 0..=max_jiggle {
        let mut total = 0.0;
        for i in 0..n {
            let l = t[i + 1] - t[i];
            // Zero-error segments would blow the weights up to infinity.
            let k_inv = l * e[i].max(1e-30).powf(-0.3);
            total += k_inv;
            e[i] = k_inv;
        }
        for i in 0..n {
            let l = e[i] / total;
            t[i + 1] = t[i] + l;
        }

        let (new_max, new_min) = calc_arcs(b, t, e, arcs);
        *max_e = new_max;
        *min_e = new_min;

        if *max_e < tolerance || 2.0 * *min_e - *max_e > tolerance {
            break;
        }
    }
}

/// Approximates `b` with a chain of arcs whose deviation is at most
/// `tolerance` each, unless `max_segments` is reached first, in which case
/// the best attempt is kept. Returns the largest per-arc deviation bound.
pub fn approximate_bezier_with_arcs(
    b: &CubicBezierSegment,
    tolerance: f64,
    max_segments: usize,
    arcs: &mut Vec<Arc>,
) -> f64 {
    let mut t = Vec::new();
    let mut e = Vec::new();
    let mut max_e = 0.0;
    let mut min_e;

    // Technically speaking we could bsearch for n.
    for n in 1..=max_segments {
        t.clear();
        for i in 0..=n {
            t.push(i as f64 / n as f64);
        }

        let r = calc_arcs(b, &t, &mut e, arcs);
        max_e = r.0;
        min_e = r.1;

        if min_e <= tolerance {
            jiggle(b, &mut t, &mut e, arcs, &mut max_e, &mut min_e, tolerance);
        }

        if max_e <= tolerance {
            break;
        }
    }

    max_e
}
