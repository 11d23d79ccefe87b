//! The SDF blob encoder.
//!
//! A blob is a flat array of RGBA texels. The first `w·h` texels form a
//! header grid over the glyph's padded bounding box; each header points into
//! the endpoint pool that follows it and carries the number of endpoints a
//! fragment in that cell must walk.

use crate::geom::arc::Arc;
use crate::geom::extents::Extents;
use crate::geom::line::Line;
use crate::geom::math::{Point, point, vector};
use crate::path::outline::{arc_list_extents, contour_contains_point};
use crate::path::ArcEndpoint;
use crate::sdf::sdf_from_arc_list;
use crate::{Rgba, GRID_SIZE, MAX_D, MAX_X, MAX_Y};

use std::f64::consts::PI;
use std::fmt;

/// Outcome of a successful encode.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobSummary {
    /// Number of RGBA texels written.
    pub len: usize,
    /// Header grid width.
    pub nominal_width: u32,
    /// Header grid height.
    pub nominal_height: u32,
    /// Glyph bounds expanded by `faraway` and squared up to the grid.
    pub extents: Extents,
    /// `1 + arcs-per-cell` averaged over the grid: the predicted number of
    /// texture fetches per fragment.
    pub avg_fetch: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EncodeError {
    /// The caller's buffer cannot hold the blob; nothing was written. Retry
    /// with at least `required` texels.
    BufferTooSmall { required: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::BufferTooSmall { required } => {
                write!(f, "blob buffer too small, {} texels required", required)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

fn arc_endpoint_encode(ix: u32, iy: u32, d: f64) -> Rgba {
    debug_assert!(ix <= MAX_X && iy <= MAX_Y);

    // 12 bits for each of x and y, 8 bits for d.
    let id = if d.is_infinite() {
        0
    } else {
        debug_assert!(d.abs() <= MAX_D);
        // A finite d must never collide with the move sentinel.
        (128 + (d * 127.0 / MAX_D).round() as i32).max(1).min(255) as u32
    };

    Rgba {
        r: id as u8,
        g: (ix & 0xFF) as u8,
        b: (iy & 0xFF) as u8,
        a: (((ix >> 8) << 4) | (iy >> 8)) as u8,
    }
}

fn arc_list_encode(first_group_len: u32, offset: usize, num_points: u32, side: i32) -> Rgba {
    debug_assert!(first_group_len < 0x80);
    debug_assert!(offset < 0x10000);

    let mut a = (num_points & 0xFF) as u8;
    if side < 0 && num_points == 0 {
        a = 255; // empty cell, inside the glyph
    }
    Rgba {
        r: (first_group_len & 0x7F) as u8,
        g: ((offset >> 8) & 0xFF) as u8,
        b: (offset & 0xFF) as u8,
        a,
    }
}

fn line_encode(line: &Line) -> Rgba {
    let l = line.normalized();
    let angle = l.n.y.atan2(l.n.x);
    let distance = l.c;

    let ia = (-angle / PI * 0x3FFF as f64).round() as i32;
    let ua = (ia + 0x4000) as u32;
    debug_assert!(ua & !0x7FFF == 0);
    // High bit marks the line form; the leading byte of an ordinary cell is
    // a move sentinel and always below 0x80.
    let ua = (ua & 0x7FFF) | 0x8000;

    let id = (distance * 0x1FFF as f64).round() as i32;
    debug_assert!(id > -0x4000 && id < 0x4000);
    let ud = (id as u32) & 0x7FFF;

    Rgba {
        r: (ua >> 8) as u8,
        g: (ua & 0xFF) as u8,
        b: (ud >> 8) as u8,
        a: (ud & 0xFF) as u8,
    }
}

/// Fills `near_endpoints` with the arcs that may be nearest to some point of
/// the cell `[c0, c1]`, and returns `(num_first_group, side)`.
///
/// Every arc close to the cell must be close to its center: if `d` is the
/// distance from the center to the nearest arc, all candidates lie within
/// `d + half_diagonal`.
fn closest_arcs_to_cell(
    c0: Point,
    c1: Point,
    faraway: f64,
    endpoints: &[ArcEndpoint],
    cutoff: usize,
    near_endpoints: &mut Vec<ArcEndpoint>,
) -> (usize, i32) {
    let c = c0.lerp(c1, 0.5);

    // The sign tag is assigned per contour group so that two disjoint filled
    // regions cannot negate each other's interior.
    let min_dist1 = sdf_from_arc_list(&endpoints[..cutoff], c);
    let min_dist2 = sdf_from_arc_list(&endpoints[cutoff..], c);
    let min_dist = sdf_from_arc_list(endpoints, c).abs();

    let mut side = if min_dist1 >= 0.0 { 1 } else { -1 };
    if min_dist2 < 0.0 {
        side = -1;
    }

    let half_diagonal = (c - c0).length();
    let radius_squared = (min_dist + half_diagonal) * (min_dist + half_diagonal);

    let mut near_arcs: Vec<Arc> = Vec::new();
    let mut num_selected_group_1 = 0;

    let reachable = min_dist - half_diagonal <= faraway;
    let deep_inside = min_dist1 < -half_diagonal || min_dist2 < -half_diagonal;

    if reachable && !deep_inside {
        let mut p0 = point(0.0, 0.0);
        for (i, endpoint) in endpoints.iter().enumerate() {
            if endpoint.is_move() {
                p0 = endpoint.p;
                continue;
            }
            let arc = Arc::new(p0, endpoint.p, endpoint.d);
            p0 = endpoint.p;

            if arc.squared_distance_to_point(c) <= radius_squared {
                near_arcs.push(arc);
                if i < cutoff {
                    num_selected_group_1 += 1;
                }
            }
        }
    }

    // Re-emit the selected arcs as an endpoint stream, inserting a move
    // wherever the chain breaks and at the group boundary. Group-1 arcs come
    // first since the input stream is ordered.
    let mut num_group_1 = num_selected_group_1;
    let mut p1 = point(0.0, 0.0);
    for (i, arc) in near_arcs.iter().enumerate() {
        if i == 0 || p1 != arc.p0 || i == num_selected_group_1 {
            near_endpoints.push(ArcEndpoint::new(arc.p0, f64::INFINITY));
            p1 = arc.p0;
            if i < num_selected_group_1 {
                num_group_1 += 1;
            }
        }
        near_endpoints.push(ArcEndpoint::new(arc.p1, arc.d));
        p1 = arc.p1;
    }

    (num_group_1, side)
}

struct ContourVertex {
    start: usize,
    end: usize,
    dotted: Vec<usize>,
    solid: Vec<usize>,
}

/// Whether any arc of `a` crosses any arc of `b`.
fn contours_intersect(endpoints: &[ArcEndpoint], a: &ContourVertex, b: &ContourVertex) -> bool {
    let mut extents_a = Extents::new();
    arc_list_extents(&endpoints[a.start..a.end], &mut extents_a);
    let mut extents_b = Extents::new();
    arc_list_extents(&endpoints[b.start..b.end], &mut extents_b);

    if !extents_a.overlaps(&extents_b) {
        return false;
    }

    for j in a.start + 1..a.end {
        let arc_a = Arc::new(endpoints[j - 1].p, endpoints[j].p, endpoints[j].d);
        for i in b.start + 1..b.end {
            let arc_b = Arc::new(endpoints[i - 1].p, endpoints[i].p, endpoints[i].d);
            if arc_a.intersects_arc(&arc_b).is_some() {
                return true;
            }
        }
    }
    false
}

/// Rearranges contours into two groups for the per-cell sign assignment, and
/// returns the endpoint stream together with the index where group 2 begins.
///
/// Contours form a graph: a solid edge where two contours cross, a dotted
/// edge where one strictly contains the other. Dotted components collapse
/// into one vertex (nested contours stay together), then the solid-edge graph
/// is bipartitioned by DFS level parity.
fn rearrange_contours(endpoints: &[ArcEndpoint]) -> (Vec<ArcEndpoint>, usize) {
    if endpoints.is_empty() {
        return (Vec::new(), 0);
    }

    let mut contours: Vec<ContourVertex> = Vec::new();
    {
        let mut i = 0;
        let mut prev = 0;
        while i < endpoints.len() {
            while i + 1 < endpoints.len() && !endpoints[i + 1].is_move() {
                i += 1;
            }
            i += 1;
            contours.push(ContourVertex { start: prev, end: i, dotted: Vec::new(), solid: Vec::new() });
            prev = i;
        }
    }

    for k in 0..contours.len() {
        for j in 0..k {
            if contours_intersect(endpoints, &contours[k], &contours[j]) {
                contours[k].solid.push(j);
                contours[j].solid.push(k);
            } else {
                // Disjoint contours nest iff either one's start point is
                // inside the other.
                let pk = endpoints[contours[k].start].p;
                let pj = endpoints[contours[j].start].p;
                let nested = contour_contains_point(
                    &endpoints[contours[j].start..contours[j].end],
                    pk,
                ) || contour_contains_point(
                    &endpoints[contours[k].start..contours[k].end],
                    pj,
                );
                if nested {
                    contours[k].dotted.push(j);
                    contours[j].dotted.push(k);
                }
            }
        }
    }

    // Collapse dotted components, concatenating their endpoint runs.
    let mut seen = vec![false; contours.len()];
    let mut owner = vec![0usize; contours.len()];
    let mut rearranged: Vec<ArcEndpoint> = Vec::with_capacity(endpoints.len());
    struct Merged {
        start: usize,
        end: usize,
        members: Vec<usize>,
        solid: Vec<usize>,
    }
    let mut merged: Vec<Merged> = Vec::new();

    for j in 0..contours.len() {
        if seen[j] {
            continue;
        }
        let start = rearranged.len();
        let mut members = Vec::new();
        let mut stack = vec![j];
        while let Some(c) = stack.pop() {
            if seen[c] {
                continue;
            }
            seen[c] = true;
            owner[c] = merged.len();
            members.push(c);
            rearranged.extend_from_slice(&endpoints[contours[c].start..contours[c].end]);
            stack.extend_from_slice(&contours[c].dotted);
        }
        merged.push(Merged { start, end: rearranged.len(), members, solid: Vec::new() });
    }

    // Merge the solid edge lists onto the collapsed vertices.
    for m in 0..merged.len() {
        let mut solid = Vec::new();
        for &c in &merged[m].members {
            for &s in &contours[c].solid {
                let target = owner[s];
                if target != m && !solid.contains(&target) {
                    solid.push(target);
                }
            }
        }
        merged[m].solid = solid;
    }

    // Bipartition by DFS levelling over the solid edges.
    let mut levels = vec![usize::MAX; merged.len()];
    for m in 0..merged.len() {
        if levels[m] != usize::MAX {
            continue;
        }
        let mut stack = vec![(m, 0)];
        while let Some((v, level)) = stack.pop() {
            if levels[v] != usize::MAX {
                continue;
            }
            levels[v] = level;
            for &s in &merged[v].solid {
                stack.push((s, level + 1));
            }
        }
    }

    // Even levels first; the boundary index is the cutoff.
    let mut first: Vec<ArcEndpoint> = Vec::new();
    let mut second: Vec<ArcEndpoint> = Vec::new();
    for (m, vertex) in merged.iter().enumerate() {
        let run = &rearranged[vertex.start..vertex.end];
        if levels[m] % 2 == 0 {
            first.extend_from_slice(run);
        } else {
            second.extend_from_slice(run);
        }
    }
    let cutoff = first.len();
    first.extend_from_slice(&second);
    (first, cutoff)
}

/// Compares a freshly appended cell against a window of the pool. The first
/// texel's `d` byte is skipped for ordinary cells (the decoder treats a
/// cell's first record as a move whatever its depth), but not for line cells
/// whose leading byte is meaningful.
///
/// An ordinary cell must never land on a window whose leading byte carries
/// the line-form marker, or the decoder would misread it as a line.
fn cells_match(needle: &[Rgba], haystack: &[Rgba], skip_first_byte: bool) -> bool {
    let first = &needle[0];
    let candidate = &haystack[0];
    let head_matches = if skip_first_byte {
        candidate.r & 0x80 == 0
            && first.g == candidate.g
            && first.b == candidate.b
            && first.a == candidate.a
    } else {
        first == candidate
    };
    head_matches && needle[1..] == haystack[1..needle.len()]
}

/// Encodes an arc endpoint stream into `blob`.
///
/// `faraway` is the padding in design units beyond which the distance field
/// is uninteresting; it both expands the reported extents and empties the
/// cells it puts out of reach. On success nothing beyond `summary.len`
/// texels has been touched; on overflow nothing is written at all.
pub fn encode_blob(
    endpoints: &[ArcEndpoint],
    faraway: f64,
    blob: &mut [Rgba],
) -> Result<BlobSummary, EncodeError> {
    let mut extents = Extents::new();
    arc_list_extents(endpoints, &mut extents);

    if extents.is_empty() {
        // Empty glyph: a single header cell marked "outside".
        if blob.is_empty() {
            return Err(EncodeError::BufferTooSmall { required: 1 });
        }
        blob[0] = arc_list_encode(0, 0, 0, 1);
        return Ok(BlobSummary {
            len: 1,
            nominal_width: 1,
            nominal_height: 1,
            extents,
            avg_fetch: 1.0,
        });
    }

    extents.min_x -= faraway;
    extents.min_y -= faraway;
    extents.max_x += faraway;
    extents.max_y += faraway;

    let mut glyph_width = extents.max_x - extents.min_x;
    let mut glyph_height = extents.max_y - extents.min_y;
    let unit = glyph_width.max(glyph_height);

    // Squeeze the shorter axis until the cells are (nearly) square.
    let mut grid_w = GRID_SIZE;
    let mut grid_h = GRID_SIZE;
    if glyph_width > glyph_height {
        while (grid_h - 1) as f64 * unit / grid_w as f64 > glyph_height {
            grid_h -= 1;
        }
        glyph_height = grid_h as f64 * unit / grid_w as f64;
        extents.max_y = extents.min_y + glyph_height;
    } else {
        while (grid_w - 1) as f64 * unit / grid_h as f64 > glyph_width {
            grid_w -= 1;
        }
        glyph_width = grid_w as f64 * unit / grid_h as f64;
        extents.max_x = extents.min_x + glyph_width;
    }

    let cell_unit = unit / grid_w.max(grid_h) as f64;

    let (rearranged, cutoff) = rearrange_contours(endpoints);
    let endpoints = &rearranged[..];

    let header_len = (grid_w * grid_h) as usize;
    let mut tex_data = vec![Rgba { r: 0, g: 0, b: 0, a: 0 }; header_len];
    let mut offset = header_len;

    let origin = point(extents.min_x, extents.min_y);
    let mut total_arcs = 0usize;
    let mut near_endpoints: Vec<ArcEndpoint> = Vec::new();

    let quantize_x = |x: f64| (MAX_X as f64 * ((x - extents.min_x) / glyph_width)).round() as u32;
    let quantize_y = |y: f64| (MAX_Y as f64 * ((y - extents.min_y) / glyph_height)).round() as u32;
    let snap = |p: Point| {
        point(
            quantize_x(p.x) as f64 / MAX_X as f64 * glyph_width + extents.min_x,
            quantize_y(p.y) as f64 / MAX_Y as f64 * glyph_height + extents.min_y,
        )
    };

    for row in 0..grid_h {
        for col in 0..grid_w {
            let cp0 = origin + vector(col as f64 * cell_unit, row as f64 * cell_unit);
            let cp1 = origin + vector((col + 1) as f64 * cell_unit, (row + 1) as f64 * cell_unit);
            near_endpoints.clear();

            let (mut num_group_1, side) = closest_arcs_to_cell(
                cp0,
                cp1,
                faraway,
                endpoints,
                cutoff,
                &mut near_endpoints,
            );

            let mut is_line_cell = false;

            if near_endpoints.len() == 2 && near_endpoints[1].d == 0.0 {
                // A lone straight edge: encode the infinite line through it,
                // recentered on the glyph and scaled by the grid unit.
                let center = point(
                    extents.min_x + glyph_width * 0.5,
                    extents.min_y + glyph_height * 0.5,
                );
                let mut line = Line::from_points(snap(near_endpoints[0].p), snap(near_endpoints[1].p));
                line.c -= line.n.dot(center.to_vector());
                line.c /= unit;
                tex_data.push(line_encode(&line));
                is_line_cell = true;
            } else {
                // Two chains that close into each other can drop the second
                // move when reordered. Only safe when they share a group.
                if near_endpoints.len() == 4
                    && near_endpoints[2].is_move()
                    && near_endpoints[0].p == near_endpoints[3].p
                    && (num_group_1 == 0 || num_group_1 == 4)
                {
                    let e0 = near_endpoints[2];
                    let e1 = near_endpoints[3];
                    let e2 = near_endpoints[1];
                    near_endpoints.clear();
                    near_endpoints.push(e0);
                    near_endpoints.push(e1);
                    near_endpoints.push(e2);
                    if num_group_1 == 4 {
                        num_group_1 = 3;
                    }
                }

                for endpoint in &near_endpoints {
                    tex_data.push(arc_endpoint_encode(
                        quantize_x(endpoint.p.x),
                        quantize_y(endpoint.p.y),
                        endpoint.d,
                    ));
                }
            }

            let current_endpoints = tex_data.len() - offset;
            let mut cell_offset = offset;

            // See if an identical run is already in the pool and reuse it.
            if current_endpoints > 0 && offset - header_len >= current_endpoints {
                let (pool, needle) = tex_data.split_at(offset);
                for start in header_len..=offset - current_endpoints {
                    if cells_match(needle, &pool[start..], !is_line_cell) {
                        cell_offset = start;
                        break;
                    }
                }
                if cell_offset != offset {
                    tex_data.truncate(offset);
                }
            }

            let num_points = if is_line_cell { 2 } else { current_endpoints as u32 };
            tex_data[(row * grid_w + col) as usize] =
                arc_list_encode(num_group_1 as u32, cell_offset, num_points, side);
            offset = tex_data.len();

            total_arcs += current_endpoints;
        }
    }

    let avg_fetch = 1.0 + total_arcs as f64 / (grid_w * grid_h) as f64;

    if tex_data.len() > blob.len() {
        return Err(EncodeError::BufferTooSmall { required: tex_data.len() });
    }
    blob[..tex_data.len()].copy_from_slice(&tex_data);

    Ok(BlobSummary {
        len: tex_data.len(),
        nominal_width: grid_w,
        nominal_height: grid_h,
        extents,
        avg_fetch,
    })
}
