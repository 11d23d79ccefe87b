#![deny(bare_trait_objects)]

//! 2D geometric primitives for arc-based glyph rendering, on top of euclid.
//!
//! This crate is reexported in [arcfield](https://docs.rs/arcfield/).
//!
//! # Overview
//!
//! This crate implements the maths to work with:
//!
//! - lines and line segments,
//! - circles and circular arcs in the `(p0, p1, d)` representation,
//! - cubic bézier curves,
//! - approximation of béziers with sequences of circular arcs.
//!
//! # Arc representation
//!
//! An arc is stored as its two endpoints plus a scalar *depth* `d = tan(θ/4)`
//! where `θ` is the signed sweep angle from `p0` to `p1`. `d = 0` degenerates
//! to a straight line segment, `|d| = 1` is a semicircle and the sign of `d`
//! picks the sweep direction. This representation is closed under reversal
//! (negate `d`) and makes the center, radius and tangent directions cheap to
//! derive without trigonometry.
//!
//! # Approximation
//!
//! The approximation algorithms take a tolerance threshold corresponding to
//! the maximum distance between a curve and the arcs standing in for it. The
//! smaller the tolerance, the more arcs are generated. The subdivision is not
//! recursive: an outer sweep increases the arc count while an inner
//! re-weighting loop (see [`arc_fit`](arc_fit/index.html)) balances the error
//! across the arcs.

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod utils;
pub mod line;
pub mod arc;
pub mod cubic_bezier;
pub mod arc_bezier;
pub mod arc_fit;
pub mod extents;

#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::arc::{Arc, Circle};
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::extents::Extents;
#[doc(inline)]
pub use crate::arc_bezier::approximate_bezier_with_arc;
#[doc(inline)]
pub use crate::arc_fit::{approximate_bezier_with_arcs, DEFAULT_MAX_SEGMENTS};

pub mod math {
    //! Basic f64 types that are used everywhere. Most other arcfield crates
    //! reexport them.

    use euclid;

    /// Alias for ```euclid::default::Point2D<f64>```.
    pub type Point = euclid::default::Point2D<f64>;

    /// Alias for ```euclid::default::Vector2D<f64>```.
    pub type Vector = euclid::default::Vector2D<f64>;

    /// Shorthand for `Vector::new(x, y)`.
    pub use euclid::vec2 as vector;

    /// Shorthand for `Point::new(x, y)`.
    pub use euclid::point2 as point;
}
