//! The `Font` handle: opens an sfnt byte source, parses every required
//! table once, and exposes glyph lookup/decoding on demand.
//!
//! Grounded on `truetype_loader/mod.rs`'s `SfntFont::from_binary`
//! orchestration — parse the directory, then each table it points at — but
//! the teacher eagerly decoded every glyph into memory; this keeps glyph
//! bytes behind the font's own reader and decodes lazily (spec section 3's
//! "a font owns the byte source exclusively").

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};
use crate::reader::BinaryReader;
use crate::truetype::cmap::CharacterMap;
use crate::truetype::glyf::{self, Glyph};
use crate::truetype::metrics::{self, FontMetrics, GlyphMetric};
use crate::truetype::table_directory::TableDirectory;
use crate::numerics::Affine;

pub struct Font<R> {
    reader: BinaryReader<R>,
    glyf_offset: u32,
    glyph_offsets: Vec<u32>,
    glyph_metrics: Vec<GlyphMetric>,
    font_metrics: FontMetrics,
    character_map: CharacterMap,
}

impl Font<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Font<File>> {
        let file = File::open(path).map_err(Error::IoOpen)?;
        Font::from_reader(file)
    }
}

impl<R: Read + Seek> Font<R> {
    pub fn from_reader(inner: R) -> Result<Font<R>> {
        let mut reader = BinaryReader::new(inner);
        let directory = TableDirectory::parse(&mut reader)?;

        let head_offset = directory.offset_of(b"head", "head")?;
        let maxp_offset = directory.offset_of(b"maxp", "maxp")?;
        let hhea_offset = directory.offset_of(b"hhea", "hhea")?;
        let hmtx_offset = directory.offset_of(b"hmtx", "hmtx")?;
        let loca_offset = directory.offset_of(b"loca", "loca")?;
        let glyf_offset = directory.offset_of(b"glyf", "glyf")?;
        let cmap_offset = directory.offset_of(b"cmap", "cmap")?;

        let index_to_loc_format = metrics::index_to_loc_format(&mut reader, head_offset)?;
        let num_glyphs = metrics::num_glyphs(&mut reader, maxp_offset)?;
        let (font_metrics, num_long_hor_metrics) = metrics::font_metrics(&mut reader, hhea_offset)?;
        let glyph_metrics = metrics::glyph_metrics(&mut reader, hmtx_offset, num_long_hor_metrics, num_glyphs)?;
        let glyph_offsets = metrics::loca_offsets(&mut reader, loca_offset, num_glyphs, index_to_loc_format)?;
        let character_map = CharacterMap::parse(&mut reader, cmap_offset)?;

        log::info!("loaded font with {} glyphs, ascent={} descent={}", num_glyphs, font_metrics.ascent, font_metrics.descent);

        Ok(Font { reader, glyf_offset, glyph_offsets, glyph_metrics, font_metrics, character_map })
    }

    pub fn font_metrics(&self) -> FontMetrics {
        self.font_metrics
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyph_metrics.len()
    }

    pub fn glyph_index(&self, code_point: char) -> Result<u32> {
        self.character_map.lookup(code_point).ok_or(Error::GlyphNotFound(code_point))
    }

    pub fn advance(&self, glyph_index: u32) -> Result<GlyphMetric> {
        self.glyph_metrics
            .get(glyph_index as usize)
            .copied()
            .ok_or(Error::UnknownGlyph(glyph_index))
    }

    /// Decodes a glyph's outline, recursively resolving composite
    /// components, and returns it alongside the metric that should drive
    /// layout advance: the composite's own `hmtx` entry, unless a component
    /// set `USE_MY_METRICS`, in which case that component's metric is
    /// adopted instead (spec section 4.E).
    pub fn glyph_with_metric(&mut self, glyph_index: u32) -> Result<(Glyph, GlyphMetric)> {
        if glyph_index as usize >= self.glyph_metrics.len() {
            return Err(Error::UnknownGlyph(glyph_index));
        }
        let (components, metric_override) = glyf::decode_outline(
            &mut self.reader,
            self.glyf_offset,
            &self.glyph_offsets,
            glyph_index as u16,
            Affine::IDENTITY,
            0,
        )?;
        let metric = match metric_override {
            Some(ix) => self.advance(ix as u32)?,
            None => self.advance(glyph_index)?,
        };
        Ok((Glyph { components }, metric))
    }

    pub fn glyph(&mut self, glyph_index: u32) -> Result<Glyph> {
        self.glyph_with_metric(glyph_index).map(|(glyph, _)| glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn minimal_font_bytes() -> Vec<u8> {
        // One glyph: an empty glyph (sentinel loca offset 0), so the whole
        // pipeline (directory -> head/maxp/hhea/hmtx/loca/cmap) can be
        // exercised without needing real outline data.
        let mut buf = vec![0u8; 0];

        let num_tables = 7u16;
        let header_len = 12 + 16 * num_tables as usize;
        let head_off = header_len as u32;
        let maxp_off = head_off + 54;
        let hhea_off = maxp_off + 6;
        let hmtx_off = hhea_off + 36;
        let loca_off = hmtx_off + 4;
        let glyf_off = loca_off + 4;
        let cmap_off = glyf_off + 0;

        buf.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        buf.extend_from_slice(&num_tables.to_be_bytes());
        buf.extend_from_slice(&[0u8; 6]);

        let mut push_entry = |tag: &[u8; 4], offset: u32, length: u32| {
            buf.extend_from_slice(tag);
            buf.extend_from_slice(&0u32.to_be_bytes());
            buf.extend_from_slice(&offset.to_be_bytes());
            buf.extend_from_slice(&length.to_be_bytes());
        };
        push_entry(b"head", head_off, 54);
        push_entry(b"maxp", maxp_off, 6);
        push_entry(b"hhea", hhea_off, 36);
        push_entry(b"hmtx", hmtx_off, 4);
        push_entry(b"loca", loca_off, 4);
        push_entry(b"glyf", glyf_off, 0);
        push_entry(b"cmap", cmap_off, 22);

        // head: indexToLocFormat (i16) at byte 50 of a 54-byte table
        let mut head = vec![0u8; 54];
        head[50..52].copy_from_slice(&1i16.to_be_bytes());
        buf.extend_from_slice(&head);

        // maxp: numGlyphs (u16) at byte 4
        let mut maxp = vec![0u8; 6];
        maxp[4..6].copy_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&maxp);

        // hhea: ascent/descent at 4/6, numLongHorMetrics at 34
        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
        hhea[34..36].copy_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&hhea);

        // hmtx: one long metric {advance=500, lsb=0}
        buf.extend_from_slice(&500u16.to_be_bytes());
        buf.extend_from_slice(&0i16.to_be_bytes());

        // loca: format 1, two u32 offsets, both 0 (sentinel: empty glyph)
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());

        // cmap: format 12, one group mapping 'A' (0x41) -> glyph 0
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&4u16.to_be_bytes());
        buf.extend_from_slice(&12u32.to_be_bytes());
        buf.extend_from_slice(&12u16.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&1u32.to_be_bytes());
        buf.extend_from_slice(&0x41u32.to_be_bytes());
        buf.extend_from_slice(&0x41u32.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());

        buf
    }

    #[test]
    fn opens_and_resolves_ascent_descent_and_glyph_lookup() {
        let bytes = minimal_font_bytes();
        let mut font = Font::from_reader(Cursor::new(bytes)).unwrap();
        let m = font.font_metrics();
        assert_eq!(m.ascent, 800);
        assert_eq!(m.descent, -200);

        let gi = font.glyph_index('A').unwrap();
        assert_eq!(gi, 0);

        let advance = font.advance(gi).unwrap();
        assert_eq!(advance.advance_width, 500);

        let glyph = font.glyph(gi).unwrap();
        assert!(glyph.components.is_empty());
    }

    #[test]
    fn missing_code_point_is_reported() {
        let bytes = minimal_font_bytes();
        let mut font = Font::from_reader(Cursor::new(bytes)).unwrap();
        match font.glyph_index('Z') {
            Err(Error::GlyphNotFound('Z')) => {}
            other => panic!("expected GlyphNotFound('Z'), got {:?}", other),
        }
    }
}
