//! CPU reference decoder for the blob format.
//!
//! This mirrors, bit for bit, what the fragment shader does with the texels;
//! the tests use it to pin the encoding down. The rules a consumer must
//! follow:
//!
//! 1. Look the header cell up at `floor(p · grid)` in the padded extents.
//! 2. Decode `(first_group, offset, count)` from it. `count == 0` is an
//!    empty cell lying outside the glyph, the special value 255 an empty
//!    cell inside it; both short-circuit to an infinite distance of that
//!    sign.
//! 3. If the pool texel at `offset` carries the line-form marker (high bit
//!    of its leading byte), the cell is a single infinite line recentered on
//!    the glyph midpoint and scaled by the grid unit.
//! 4. Otherwise walk `count` endpoint texels. The first record and every
//!    record whose depth decodes to the move sentinel update the current
//!    point without contributing an arc (a cell's first record is a move
//!    whatever its depth byte says, which is why the encoder may alias cells
//!    that differ only there).
//! 5. Signs are resolved per bipartition group (the boundary is
//!    `first_group`) and a point is inside if either group says so.

use crate::encoder::BlobSummary;
use crate::geom::math::{Point, point, vector};
use crate::path::ArcEndpoint;
use crate::sdf::sdf_from_arc_list;
use crate::{Rgba, MAX_D, MAX_X, MAX_Y};

use std::f64::consts::PI;

fn arc_endpoint_decode(v: Rgba, extents_min: Point, width: f64, height: f64) -> ArcEndpoint {
    let d = if v.r == 0 {
        f64::INFINITY
    } else {
        (v.r as f64 - 128.0) * MAX_D / 127.0
    };
    let ix = ((v.a as u32 >> 4) << 8) | v.g as u32;
    let iy = ((v.a as u32 & 0xF) << 8) | v.b as u32;
    ArcEndpoint::new(
        point(
            ix as f64 / MAX_X as f64 * width + extents_min.x,
            iy as f64 / MAX_Y as f64 * height + extents_min.y,
        ),
        d,
    )
}

fn line_decode(v: Rgba, center: Point, unit: f64, p: Point) -> f64 {
    let ua = (((v.r as u32) << 8) | v.g as u32) & 0x7FFF;
    let angle = -((ua as i32 - 0x4000) as f64) / 0x3FFF as f64 * PI;
    let n = vector(angle.cos(), angle.sin());

    let ud = ((v.b as u32) << 8) | v.a as u32;
    // Sign-extend the 15-bit two's-complement offset.
    let id = ((ud << 17) as i32) >> 17;
    let distance = id as f64 / 0x1FFF as f64 * unit;

    (p - center).dot(n) - distance
}

/// Reconstructs the signed distance at `p` from the encoded blob alone.
///
/// Empty cells decode to `±∞`; the consumer clamps to its own notion of
/// "far" (the encoder's `faraway`).
pub fn sdf_from_blob(blob: &[Rgba], summary: &BlobSummary, p: Point) -> f64 {
    let w = summary.nominal_width as usize;
    let h = summary.nominal_height as usize;
    let extents = &summary.extents;
    let width = extents.max_x - extents.min_x;
    let height = extents.max_y - extents.min_y;

    // NaN from empty extents falls back to cell 0.
    let col = ((p.x - extents.min_x) / width * w as f64)
        .floor()
        .max(0.0)
        .min(w as f64 - 1.0) as usize;
    let row = ((p.y - extents.min_y) / height * h as f64)
        .floor()
        .max(0.0)
        .min(h as f64 - 1.0) as usize;

    let header = blob[row * w + col];
    let first_group = header.r as usize;
    let offset = ((header.g as usize) << 8) | header.b as usize;
    let count = header.a as usize;

    if count == 255 {
        return f64::NEG_INFINITY;
    }
    if count == 0 {
        return f64::INFINITY;
    }

    let first = blob[offset];
    if first.r & 0x80 != 0 {
        let center = point(
            extents.min_x + width * 0.5,
            extents.min_y + height * 0.5,
        );
        return line_decode(first, center, width.max(height), p);
    }

    let origin = point(extents.min_x, extents.min_y);
    let mut endpoints = Vec::with_capacity(count);
    for i in 0..count {
        let mut endpoint = arc_endpoint_decode(blob[offset + i], origin, width, height);
        if i == 0 {
            // A cell always opens with a move, whatever the depth byte says.
            endpoint.d = f64::INFINITY;
        }
        endpoints.push(endpoint);
    }

    let boundary = first_group.min(endpoints.len());
    let sdf1 = sdf_from_arc_list(&endpoints[..boundary], p);
    let sdf2 = sdf_from_arc_list(&endpoints[boundary..], p);

    // Either group claiming the point is inside wins.
    let magnitude = sdf1.abs().min(sdf2.abs());
    if sdf1 < 0.0 || sdf2 < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}
