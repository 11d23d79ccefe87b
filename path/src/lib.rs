#![deny(bare_trait_objects)]

//! Arc endpoint streams.
//!
//! This crate is reexported in [arcfield](https://docs.rs/arcfield/).
//!
//! An outline is represented as a flat, ordered sequence of
//! [`ArcEndpoint`](struct.ArcEndpoint.html) records. A record with an
//! infinite `d` is a *move* and begins a new sub-contour; every following
//! record with a finite `d` is a circular arc from the previous endpoint to
//! its position, with depth `d` (see `arcfield_geom`). A contour closes
//! implicitly when the next move appears or the stream ends, and the first
//! record of a non-empty stream is always a move.
//!
//! The [`ArcAccumulator`](accumulator/struct.ArcAccumulator.html) produces
//! such streams from move/line/quadratic/cubic path commands, and the
//! [`outline`](outline/index.html) module computes extents, reverses
//! contours, and normalizes winding directions.

pub use arcfield_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod accumulator;
pub mod outline;

#[doc(inline)]
pub use crate::accumulator::ArcAccumulator;
#[doc(inline)]
pub use crate::outline::{arc_list_extents, reverse, winding_from_even_odd};

use crate::geom::math::Point;

/// One record of an arc endpoint stream.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcEndpoint {
    pub p: Point,
    /// Arc depth, or ±∞ for a move record. The sentinel is only ever
    /// compared, never used in arithmetic.
    pub d: f64,
}

impl ArcEndpoint {
    #[inline]
    pub fn new(p: Point, d: f64) -> Self {
        ArcEndpoint { p, d }
    }

    /// Whether this record begins a new sub-contour.
    #[inline]
    pub fn is_move(&self) -> bool {
        self.d.is_infinite()
    }
}
