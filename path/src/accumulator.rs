//! Accumulating path commands into an arc endpoint stream.

use crate::ArcEndpoint;
use crate::geom::arc::Arc;
use crate::geom::arc_fit::{approximate_bezier_with_arcs, DEFAULT_MAX_SEGMENTS};
use crate::geom::cubic_bezier::CubicBezierSegment;
use crate::geom::math::{Point, point};
use crate::geom::utils::points_are_near;

/// Consumes move/line/quadratic/cubic path commands and emits the endpoint
/// stream of an arc approximation through a callback.
///
/// The callback accepts each endpoint in emission order and returns whether
/// to keep going; the first refusal latches `success` to false and turns the
/// remaining operations into no-ops (they stay safe to call).
///
/// ```
/// use arcfield_path::ArcAccumulator;
/// use arcfield_path::geom::math::point;
///
/// let mut endpoints = Vec::new();
/// let mut acc = ArcAccumulator::new(0.01, |e| { endpoints.push(e); true });
/// acc.move_to(point(0.0, 0.0));
/// acc.line_to(point(100.0, 0.0));
/// drop(acc);
/// assert_eq!(endpoints.len(), 2);
/// ```
pub struct ArcAccumulator<F: FnMut(ArcEndpoint) -> bool> {
    /// Maximum deviation allowed between a curve command and its arcs.
    pub tolerance: f64,
    /// Supremum of the per-curve deviations observed so far.
    pub max_error: f64,
    /// False once the callback has refused an endpoint.
    pub success: bool,
    /// Number of endpoints accepted so far.
    pub num_endpoints: usize,

    current_point: Point,
    start_point: Point,
    callback: F,
    arcs: Vec<Arc>,
}

impl<F: FnMut(ArcEndpoint) -> bool> ArcAccumulator<F> {
    pub fn new(tolerance: f64, callback: F) -> Self {
        ArcAccumulator {
            tolerance,
            max_error: 0.0,
            success: true,
            num_endpoints: 0,
            current_point: point(0.0, 0.0),
            start_point: point(0.0, 0.0),
            callback,
            arcs: Vec::new(),
        }
    }

    /// The position the next command starts from.
    #[inline]
    pub fn current_position(&self) -> Point {
        self.current_point
    }

    fn accumulate(&mut self, p: Point, d: f64) {
        if self.num_endpoints > 0 && points_are_near(self.current_point, p) {
            return;
        }
        self.success = self.success && (self.callback)(ArcEndpoint::new(p, d));
        if self.success {
            self.num_endpoints += 1;
            self.current_point = p;
        }
    }

    fn emit_move(&mut self, p: Point) {
        if self.num_endpoints == 0 || !points_are_near(p, self.current_point) {
            self.accumulate(p, f64::INFINITY);
        }
    }

    fn emit_arc(&mut self, arc: Arc) {
        self.emit_move(arc.p0);
        self.accumulate(arc.p1, arc.d);
    }

    /// Sets the current position in preparation for the next sub-path.
    pub fn move_to(&mut self, p: Point) {
        self.emit_move(p);
        self.start_point = p;
    }

    /// Adds a line segment to the current sub-path.
    pub fn line_to(&mut self, to: Point) {
        self.emit_arc(Arc::new(self.current_point, to, 0.0));
    }

    /// Adds a quadratic bézier, lifted to the equivalent cubic.
    pub fn quadratic_bezier_to(&mut self, ctrl: Point, to: Point) {
        self.cubic_bezier_to(
            self.current_point.lerp(ctrl, 2.0 / 3.0),
            to.lerp(ctrl, 2.0 / 3.0),
            to,
        );
    }

    /// Adds a cubic bézier, approximated with arcs within `tolerance`.
    pub fn cubic_bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let b = CubicBezierSegment { from: self.current_point, ctrl1, ctrl2, to };

        let mut arcs = std::mem::replace(&mut self.arcs, Vec::new());
        let e = approximate_bezier_with_arcs(&b, self.tolerance, DEFAULT_MAX_SEGMENTS, &mut arcs);
        self.max_error = self.max_error.max(e);

        for i in 0..arcs.len() {
            self.emit_arc(arcs[i]);
        }
        self.arcs = arcs;
    }

    /// Adds a circular arc of depth `d` to the current sub-path.
    pub fn arc_to(&mut self, to: Point, d: f64) {
        self.emit_arc(Arc::new(self.current_point, to, d));
    }

    /// Adds a line segment back to the start of the current sub-path, unless
    /// the sub-path already ends there.
    pub fn close_path(&mut self) {
        if !points_are_near(self.current_point, self.start_point) {
            self.line_to(self.start_point);
        }
    }
}
