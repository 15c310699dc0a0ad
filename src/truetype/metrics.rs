//! `head`, `maxp`, `hhea`, `hmtx`, `loca` — everything needed for ascent /
//! descent, per-glyph advance width / left side bearing, and the glyph
//! index -> byte offset map `glyf` is read through.
//!
//! Grounded on `truetype_loader/mod.rs`'s `FontHeader`, `MaxProfileTable`,
//! `LocationTable` structs and their `from_binary` constructors.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::reader::BinaryReader;

/// Ascent/descent in font design units (spec section 3). Descent is
/// typically negative.
#[derive(Copy, Clone, Debug)]
pub struct FontMetrics {
    pub ascent: i16,
    pub descent: i16,
}

/// Per-glyph advance width / left side bearing, in design units.
#[derive(Copy, Clone, Debug)]
pub struct GlyphMetric {
    pub advance_width: u16,
    pub left_side_bearing: i16,
}

/// `head.indexToLocFormat`, read at byte 50 of the table.
pub fn index_to_loc_format<R: Read + Seek>(reader: &mut BinaryReader<R>, head_offset: u32) -> Result<i16> {
    reader.seek_absolute(head_offset as u64 + 50)?;
    let format = reader.read_i16()?;
    if format != 0 && format != 1 {
        return Err(Error::UnsupportedIndexToLocFormat(format));
    }
    Ok(format)
}

/// `maxp.numGlyphs`, read at byte 4 of the table.
pub fn num_glyphs<R: Read + Seek>(reader: &mut BinaryReader<R>, maxp_offset: u32) -> Result<u16> {
    reader.seek_absolute(maxp_offset as u64 + 4)?;
    reader.read_u16()
}

/// Ascent/descent at bytes 4/6, `numLongHorMetrics` at byte 34 of `hhea`.
pub fn font_metrics<R: Read + Seek>(reader: &mut BinaryReader<R>, hhea_offset: u32) -> Result<(FontMetrics, u16)> {
    reader.seek_absolute(hhea_offset as u64 + 4)?;
    let ascent = reader.read_i16()?;
    let descent = reader.read_i16()?;
    reader.seek_absolute(hhea_offset as u64 + 34)?;
    let num_long_hor_metrics = reader.read_u16()?;
    Ok((FontMetrics { ascent, descent }, num_long_hor_metrics))
}

/// `hmtx`: `num_long_hor_metrics` `{advance: u16, lsb: i16}` pairs, then one
/// `i16` LSB per remaining glyph sharing the last long metric's advance
/// (spec section 3's "trailing glyphs share the last advance").
pub fn glyph_metrics<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    hmtx_offset: u32,
    num_long_hor_metrics: u16,
    num_glyphs: u16,
) -> Result<Vec<GlyphMetric>> {
    reader.seek_absolute(hmtx_offset as u64)?;
    let mut metrics = Vec::with_capacity(num_glyphs as usize);
    for _ in 0..num_long_hor_metrics {
        let advance_width = reader.read_u16()?;
        let left_side_bearing = reader.read_i16()?;
        metrics.push(GlyphMetric { advance_width, left_side_bearing });
    }
    let last_advance = metrics.last().map(|m| m.advance_width).unwrap_or(0);
    while metrics.len() < num_glyphs as usize {
        let left_side_bearing = reader.read_i16()?;
        metrics.push(GlyphMetric { advance_width: last_advance, left_side_bearing });
    }
    Ok(metrics)
}

/// `loca`: `num_glyphs + 1` offsets, 16-bit (doubled) or 32-bit per
/// `index_to_loc_format`.
pub fn loca_offsets<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    loca_offset: u32,
    num_glyphs: u16,
    index_to_loc_format: i16,
) -> Result<Vec<u32>> {
    reader.seek_absolute(loca_offset as u64)?;
    let mut offsets = Vec::with_capacity(num_glyphs as usize + 1);
    for _ in 0..=num_glyphs {
        let off = if index_to_loc_format == 1 {
            reader.read_u32()?
        } else {
            reader.read_u16()? as u32 * 2
        };
        offsets.push(off);
    }
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rejects_unsupported_loc_format() {
        let mut head = vec![0u8; 52];
        head[50..52].copy_from_slice(&2i16.to_be_bytes());
        let mut r = BinaryReader::new(Cursor::new(head));
        match index_to_loc_format(&mut r, 0) {
            Err(Error::UnsupportedIndexToLocFormat(2)) => {}
            other => panic!("expected UnsupportedIndexToLocFormat(2), got {:?}", other),
        }
    }

    #[test]
    fn trailing_glyphs_share_last_advance() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&100u16.to_be_bytes());
        buf.extend_from_slice(&(-5i16).to_be_bytes());
        buf.extend_from_slice(&(3i16).to_be_bytes()); // lsb-only glyph #1
        buf.extend_from_slice(&(7i16).to_be_bytes()); // lsb-only glyph #2
        let mut r = BinaryReader::new(Cursor::new(buf));
        let m = glyph_metrics(&mut r, 0, 1, 3).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m[0].advance_width, 100);
        assert_eq!(m[1].advance_width, 100);
        assert_eq!(m[1].left_side_bearing, 3);
        assert_eq!(m[2].advance_width, 100);
        assert_eq!(m[2].left_side_bearing, 7);
    }

    #[test]
    fn loca_short_format_doubles_offsets() {
        let mut buf = Vec::new();
        for v in [0u16, 10, 10, 30] {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        let mut r = BinaryReader::new(Cursor::new(buf));
        let offsets = loca_offsets(&mut r, 0, 3, 0).unwrap();
        assert_eq!(offsets, vec![0, 20, 20, 60]);
    }
}
