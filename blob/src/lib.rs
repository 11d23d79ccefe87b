#![deny(bare_trait_objects)]

//! Packing arc outlines into signed distance field blobs.
//!
//! This crate is reexported in [arcfield](https://docs.rs/arcfield/).
//!
//! The [encoder](encoder/index.html) partitions a glyph's padded bounding box
//! into a uniform grid and selects, for every cell, the subset of arcs that
//! can influence the signed distance anywhere inside the cell. The per-cell
//! arc lists are bit-packed into a flat array of RGBA texels behind a header
//! grid, ready to be uploaded as-is to a texture and walked by a fragment
//! shader at arbitrary magnification.
//!
//! The [decoder](decoder/index.html) is the CPU reference for that shader:
//! it reconstructs the signed distance from the packed texels alone and pins
//! down the bit-exact layout the consumer must follow.

pub use arcfield_geom as geom;
pub use arcfield_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod sdf;
pub mod encoder;
pub mod decoder;

#[doc(inline)]
pub use crate::encoder::{encode_blob, BlobSummary, EncodeError};
#[doc(inline)]
pub use crate::sdf::sdf_from_arc_list;
#[doc(inline)]
pub use crate::decoder::sdf_from_blob;

/// Number of grid cells along the longer axis of a glyph.
pub const GRID_SIZE: u32 = 24;

/// Largest arc depth the 8-bit quantization can represent.
pub const MAX_D: f64 = 0.5;

/// Largest quantized x coordinate (12 bits).
pub const MAX_X: u32 = 4095;
/// Largest quantized y coordinate (12 bits).
pub const MAX_Y: u32 = 4095;

/// One 32-bit RGBA texel of a blob.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
