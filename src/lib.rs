//! Resolution-independent glyph rendering in Rust.
//!
//! # Crates
//!
//! * **arcfield_geom** - Circular arcs, cubic béziers and the arc
//!   approximation math.
//! * **arcfield_path** - Arc endpoint streams: accumulating outlines into
//!   arc approximations and manipulating them.
//! * **arcfield_blob** - Encoding arc outlines into texture-addressable
//!   signed distance field blobs, and the reference decoder.
//!
//! This meta-crate (`arcfield`) mostly reexports the other arcfield crates
//! for convenience.
//!
//! # Overview
//!
//! A glyph outline made of line segments and quadratic/cubic béziers is
//! approximated with circular arcs to a caller-supplied tolerance, stitched
//! into a canonical endpoint stream, and packed into a flat RGBA blob from
//! which a fragment shader (or the bundled CPU decoder) recovers a signed
//! distance field at arbitrary magnification.
//!
//! ```
//! use arcfield::math::point;
//! use arcfield::path::ArcAccumulator;
//! use arcfield::blob::{encode_blob, Rgba};
//!
//! let mut endpoints = Vec::new();
//! let mut acc = ArcAccumulator::new(0.01, |e| { endpoints.push(e); true });
//! acc.move_to(point(0.0, 0.0));
//! acc.line_to(point(10.0, 0.0));
//! acc.line_to(point(5.0, 8.0));
//! acc.close_path();
//! drop(acc);
//!
//! let mut blob = vec![Rgba { r: 0, g: 0, b: 0, a: 0 }; 2048];
//! let summary = encode_blob(&endpoints, 1.0, &mut blob).unwrap();
//! assert!(summary.len <= blob.len());
//! ```

pub use arcfield_geom as geom;
pub use arcfield_path as path;
pub use arcfield_blob as blob;

pub use arcfield_geom::math;
