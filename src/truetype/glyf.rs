//! Glyph outline decoding: simple glyphs via the flag/delta-coordinate
//! streams, composite glyphs via recursive affine-transformed references
//! to other glyphs (spec section 4.E).
//!
//! Grounded on `truetype_loader/glyph_data_table.rs`'s `GlyphDescription` /
//! `ComponentGlyphDescription` (flag run-length decode, delta-coordinate
//! accumulation, the component-flag bit layout) and
//! `original_source/GlyphComponent.{h,cpp}` for the component/bounding-rect
//! data shape. The teacher never actually composed composite transforms;
//! that part, and the `||a|-|c||` normalization fix (spec section 9), are
//! new.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::numerics::{Affine, Vec2};
use crate::reader::BinaryReader;

/// `{xMin, xMax, yMin, yMax}` in design units (spec section 3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundingRect {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

/// One simple-glyph outline, or one leaf of a flattened composite.
#[derive(Clone, Debug)]
pub struct GlyphComponent {
    pub num_vertices: u16,
    /// Vertex indices marking the last vertex of each contour, ascending.
    pub end_pts_of_contours: Vec<u16>,
    /// Per-vertex on/off-curve flag, packed as a bit-vector (spec section 9).
    pub on_curve: Vec<bool>,
    pub bounding_rect: BoundingRect,
    /// Post-transform floating-point positions, one per vertex.
    pub coordinates: Vec<Vec2>,
    is_contour_end: Vec<bool>,
}

impl GlyphComponent {
    fn new(
        end_pts_of_contours: Vec<u16>,
        on_curve: Vec<bool>,
        bounding_rect: BoundingRect,
        coordinates: Vec<Vec2>,
    ) -> GlyphComponent {
        let num_vertices = coordinates.len() as u16;
        let mut is_contour_end = vec![false; coordinates.len()];
        for &e in &end_pts_of_contours {
            is_contour_end[e as usize] = true;
        }
        GlyphComponent { num_vertices, end_pts_of_contours, on_curve, bounding_rect, coordinates, is_contour_end }
    }

    pub fn is_on_curve(&self, i: usize) -> bool {
        self.on_curve[i]
    }

    pub fn is_contour_end(&self, i: usize) -> bool {
        self.is_contour_end[i]
    }

    /// The vertex after `i`, respecting contour wraparound: the successor
    /// of an end-of-contour vertex is that contour's first vertex, not
    /// `i + 1` (spec section 3's cyclic-sequence invariant).
    pub fn contour_successor(&self, i: usize) -> usize {
        if !self.is_contour_end[i] {
            return i + 1;
        }
        match self.end_pts_of_contours.iter().position(|&e| e as usize == i) {
            Some(0) => 0,
            Some(k) => self.end_pts_of_contours[k - 1] as usize + 1,
            None => 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Glyph {
    pub components: Vec<GlyphComponent>,
}

const FLAG_ON_CURVE: u8 = 0x01;
const FLAG_X_SHORT: u8 = 0x02;
const FLAG_Y_SHORT: u8 = 0x04;
const FLAG_REPEAT: u8 = 0x08;
const FLAG_X_SAME_OR_POSITIVE: u8 = 0x10;
const FLAG_Y_SAME_OR_POSITIVE: u8 = 0x20;

const CGF_ARGS_ARE_WORDS: u16 = 0x0001;
const CGF_ARGS_ARE_XY: u16 = 0x0002;
const CGF_WE_HAVE_A_SCALE: u16 = 0x0008;
const CGF_MORE_COMPONENTS: u16 = 0x0020;
const CGF_WE_HAVE_XY_SCALE: u16 = 0x0040;
const CGF_WE_HAVE_2X2: u16 = 0x0080;
const CGF_USE_MY_METRICS: u16 = 0x0200;

fn transform_bounding_rect(rect: &BoundingRect, affine: &Affine) -> BoundingRect {
    let corners = [
        Vec2::new(rect.x_min as f32, rect.y_min as f32),
        Vec2::new(rect.x_max as f32, rect.y_min as f32),
        Vec2::new(rect.x_max as f32, rect.y_max as f32),
        Vec2::new(rect.x_min as f32, rect.y_max as f32),
    ]
    .map(|p| affine.apply(p));

    let (mut x_min, mut x_max) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f32::INFINITY, f32::NEG_INFINITY);
    for c in corners {
        x_min = x_min.min(c.x);
        x_max = x_max.max(c.x);
        y_min = y_min.min(c.y);
        y_max = y_max.max(c.y);
    }
    BoundingRect {
        x_min: x_min.floor() as i32,
        x_max: x_max.ceil() as i32,
        y_min: y_min.floor() as i32,
        y_max: y_max.ceil() as i32,
    }
}

fn decode_simple<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    num_contours: u16,
    local_rect: BoundingRect,
    affine: &Affine,
) -> Result<GlyphComponent> {
    let mut end_pts_of_contours = Vec::with_capacity(num_contours as usize);
    for _ in 0..num_contours {
        end_pts_of_contours.push(reader.read_u16()?);
    }
    let num_vertices = (*end_pts_of_contours.last().unwrap_or(&0) as usize + 1).max(1);

    let instruction_length = reader.read_u16()?;
    reader.skip(instruction_length as i64)?;

    let mut flags = Vec::with_capacity(num_vertices);
    while flags.len() < num_vertices {
        let f = reader.read_u8()?;
        flags.push(f);
        if f & FLAG_REPEAT != 0 {
            let repeat_count = reader.read_u8()?;
            for _ in 0..repeat_count {
                if flags.len() >= num_vertices {
                    return Err(Error::InvalidFlagRun);
                }
                flags.push(f);
            }
        }
    }
    if flags.len() != num_vertices {
        return Err(Error::InvalidFlagRun);
    }

    let mut xs = Vec::with_capacity(num_vertices);
    let mut x = 0i32;
    for &f in &flags {
        let short = f & FLAG_X_SHORT != 0;
        let same_or_positive = f & FLAG_X_SAME_OR_POSITIVE != 0;
        let delta = if short {
            let magnitude = reader.read_u8()? as i32;
            if same_or_positive {
                magnitude
            } else {
                -magnitude
            }
        } else if same_or_positive {
            0
        } else {
            reader.read_i16()? as i32
        };
        x += delta;
        xs.push(x);
    }

    let mut ys = Vec::with_capacity(num_vertices);
    let mut y = 0i32;
    for &f in &flags {
        let short = f & FLAG_Y_SHORT != 0;
        let same_or_positive = f & FLAG_Y_SAME_OR_POSITIVE != 0;
        let delta = if short {
            let magnitude = reader.read_u8()? as i32;
            if same_or_positive {
                magnitude
            } else {
                -magnitude
            }
        } else if same_or_positive {
            0
        } else {
            reader.read_i16()? as i32
        };
        y += delta;
        ys.push(y);
    }

    let on_curve: Vec<bool> = flags.iter().map(|f| f & FLAG_ON_CURVE != 0).collect();
    let coordinates: Vec<Vec2> = xs
        .iter()
        .zip(ys.iter())
        .map(|(&px, &py)| affine.apply(Vec2::new(px as f32, py as f32)))
        .collect();

    let bounding_rect = transform_bounding_rect(&local_rect, affine);
    Ok(GlyphComponent::new(end_pts_of_contours, on_curve, bounding_rect, coordinates))
}

/// Per-Apple-spec composite scale normalization (spec section 4.E), with the
/// section 9 defect fix: the comparison is on absolute magnitude equality,
/// not the signed difference.
fn composite_scale_normalization(a: f32, b: f32, c: f32, d: f32) -> (f32, f32) {
    let mut m = a.abs().max(b.abs());
    if (a.abs() - c.abs()).abs() <= 33.0 / 65536.0 {
        m *= 2.0;
    }
    let mut n = c.abs().max(d.abs());
    if (b.abs() - d.abs()).abs() <= 33.0 / 65536.0 {
        n *= 2.0;
    }
    (m, n)
}

fn decode_composite<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    glyf_table_offset: u32,
    glyph_offsets: &[u32],
    outer: Affine,
    depth: usize,
) -> Result<(Vec<GlyphComponent>, Option<u16>)> {
    let mut components = Vec::new();
    let mut metric_override = None;

    loop {
        let flags = reader.read_u16()?;
        let child_index = reader.read_u16()?;

        let (arg1, arg2) = if flags & CGF_ARGS_ARE_WORDS != 0 {
            (reader.read_i16()? as f32, reader.read_i16()? as f32)
        } else {
            (reader.read_i8()? as f32, reader.read_i8()? as f32)
        };
        if flags & CGF_ARGS_ARE_XY == 0 {
            return Err(Error::UnsupportedComposite);
        }
        let (dx, dy) = (arg1, arg2);

        let (a, b, c, d) = if flags & CGF_WE_HAVE_A_SCALE != 0 {
            let s = reader.read_f2dot14()?;
            (s, 0.0, 0.0, s)
        } else if flags & CGF_WE_HAVE_XY_SCALE != 0 {
            (reader.read_f2dot14()?, 0.0, 0.0, reader.read_f2dot14()?)
        } else if flags & CGF_WE_HAVE_2X2 != 0 {
            (reader.read_f2dot14()?, reader.read_f2dot14()?, reader.read_f2dot14()?, reader.read_f2dot14()?)
        } else {
            (1.0, 0.0, 0.0, 1.0)
        };

        let (m, n) = composite_scale_normalization(a, b, c, d);
        let child_local = Affine { a, b, c, d, e: m * dx, f: n * dy };
        let composed = outer.compose(&child_local);

        if depth >= glyph_offsets.len() {
            return Err(Error::UnknownGlyph(child_index as u32));
        }
        log::trace!("composite component: child_index={child_index} depth={depth}");
        let saved_pos = reader.tell()?;
        let (mut child_components, child_metric_override) =
            decode_outline(reader, glyf_table_offset, glyph_offsets, child_index, composed, depth + 1)?;
        reader.seek_absolute(saved_pos)?;

        if flags & CGF_USE_MY_METRICS != 0 {
            metric_override = Some(child_metric_override.unwrap_or(child_index));
        }
        components.append(&mut child_components);

        if flags & CGF_MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok((components, metric_override))
}

/// Decodes `glyph_index`'s outline, applying `affine` to every coordinate.
/// Returns the flattened component list plus, for composites, the glyph
/// index whose metric should be adopted (`USE_MY_METRICS`).
pub fn decode_outline<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    glyf_table_offset: u32,
    glyph_offsets: &[u32],
    glyph_index: u16,
    affine: Affine,
    depth: usize,
) -> Result<(Vec<GlyphComponent>, Option<u16>)> {
    let offset = *glyph_offsets.get(glyph_index as usize).ok_or(Error::UnknownGlyph(glyph_index as u32))?;
    if offset == 0 {
        return Ok((Vec::new(), None));
    }

    reader.seek_absolute(glyf_table_offset as u64 + offset as u64)?;
    let num_contours = reader.read_i16()?;
    let x_min = reader.read_i16()? as i32;
    let y_min = reader.read_i16()? as i32;
    let x_max = reader.read_i16()? as i32;
    let y_max = reader.read_i16()? as i32;
    let local_rect = BoundingRect { x_min, x_max, y_min, y_max };

    if num_contours > 0 {
        let component = decode_simple(reader, num_contours as u16, local_rect, &affine)?;
        Ok((vec![component], None))
    } else if num_contours < 0 {
        decode_composite(reader, glyf_table_offset, glyph_offsets, affine, depth)
    } else {
        Ok((Vec::new(), None))
    }
}
