//! Drives a font and a scan-line filler across a run of text (spec section
//! 4.H). Grounded on spec section 4.H directly, with the overall
//! "open font, walk code points, advance a pen" shape taken from
//! `original_source/main.cpp`.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::numerics::Affine;
use crate::raster::canvas::{Canvas, Rgb8};
use crate::raster::fill::{self, FillRule};
use crate::truetype::font::Font;

/// Per-run summary: glyph count actually rendered and total pen advance,
/// in pixels.
#[derive(Copy, Clone, Debug)]
pub struct LayoutMetrics {
    pub glyph_count: usize,
    pub total_advance: f32,
}

/// Renders `text` onto `canvas`, left-to-right starting at `(x_origin,
/// baseline)`, at `pixel_height` pixels of ascent-to-descent span. Missing
/// code points fail the whole call with `Error::GlyphNotFound`.
pub fn render_text<R: Read + Seek>(
    font: &mut Font<R>,
    text: &str,
    pixel_height: f32,
    x_origin: f32,
    baseline: f32,
    fill_rule: FillRule,
    color: Rgb8,
    canvas: &mut Canvas,
) -> Result<LayoutMetrics> {
    let metrics = font.font_metrics();
    let units_per_em = (metrics.ascent - metrics.descent) as f32;
    let scale = if units_per_em.abs() > f32::EPSILON { pixel_height / units_per_em } else { 0.0 };

    let mut pen_x = x_origin;
    let mut glyph_count = 0usize;

    for code_point in text.chars() {
        let glyph_index = font.glyph_index(code_point)?;
        let (glyph, glyph_metric) = font.glyph_with_metric(glyph_index)?;

        let render_transform = Affine { a: scale, b: 0.0, c: 0.0, d: -scale, e: pen_x, f: baseline };
        for component in &glyph.components {
            fill::render_component(canvas, component, &render_transform, fill_rule, color);
        }

        pen_x += glyph_metric.advance_width as f32 * scale;
        glyph_count += 1;
    }

    Ok(LayoutMetrics { glyph_count, total_advance: pen_x - x_origin })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::canvas::{BLACK, WHITE};
    use std::io::Cursor;

    fn single_empty_glyph_font_bytes() -> Vec<u8> {
        let num_tables = 7u16;
        let header_len = 12 + 16 * num_tables as usize;
        let head_off = header_len as u32;
        let maxp_off = head_off + 54;
        let hhea_off = maxp_off + 6;
        let hmtx_off = hhea_off + 36;
        let loca_off = hmtx_off + 4;
        let glyf_off = loca_off + 4;
        let cmap_off = glyf_off;

        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        buf.extend_from_slice(&num_tables.to_be_bytes());
        buf.extend_from_slice(&[0u8; 6]);

        let mut push_entry = |buf: &mut Vec<u8>, tag: &[u8; 4], offset: u32, length: u32| {
            buf.extend_from_slice(tag);
            buf.extend_from_slice(&0u32.to_be_bytes());
            buf.extend_from_slice(&offset.to_be_bytes());
            buf.extend_from_slice(&length.to_be_bytes());
        };
        push_entry(&mut buf, b"head", head_off, 54);
        push_entry(&mut buf, b"maxp", maxp_off, 6);
        push_entry(&mut buf, b"hhea", hhea_off, 36);
        push_entry(&mut buf, b"hmtx", hmtx_off, 4);
        push_entry(&mut buf, b"loca", loca_off, 4);
        push_entry(&mut buf, b"glyf", glyf_off, 0);
        push_entry(&mut buf, b"cmap", cmap_off, 22);

        let mut head = vec![0u8; 54];
        head[50..52].copy_from_slice(&1i16.to_be_bytes());
        buf.extend_from_slice(&head);

        let mut maxp = vec![0u8; 6];
        maxp[4..6].copy_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&maxp);

        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
        hhea[34..36].copy_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&hhea);

        buf.extend_from_slice(&500u16.to_be_bytes());
        buf.extend_from_slice(&0i16.to_be_bytes());

        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());

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
    fn empty_glyph_still_advances_the_pen() {
        let bytes = single_empty_glyph_font_bytes();
        let mut font = Font::from_reader(Cursor::new(bytes)).unwrap();
        let mut canvas = Canvas::new(50, 50, WHITE);

        let metrics = render_text(&mut font, "A", 200.0, 0.0, 40.0, FillRule::NonZero, BLACK, &mut canvas).unwrap();
        assert_eq!(metrics.glyph_count, 1);
        assert!(metrics.total_advance > 0.0);
        assert!(canvas.pixels().iter().all(|p| *p == WHITE));
    }

    /// S2: a monospaced glyph rendered at pixel height 200 leaves the top
    /// and bottom canvas rows untouched and has ink in the left column of
    /// its bounding box, verifying the baseline/ascent transform.
    fn solid_rectangle_font_bytes() -> Vec<u8> {
        let num_tables = 7u16;
        let header_len = 12 + 16 * num_tables as usize;
        let head_off = header_len as u32;
        let maxp_off = head_off + 54;
        let hhea_off = maxp_off + 6;
        let hmtx_off = hhea_off + 36;
        let loca_off = hmtx_off + 4;
        let glyf_off = loca_off + 8; // 2 offsets, format 1 (u32)
        let glyph_len = 34u32;
        let cmap_off = glyf_off + glyph_len;

        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        buf.extend_from_slice(&num_tables.to_be_bytes());
        buf.extend_from_slice(&[0u8; 6]);

        let mut push_entry = |buf: &mut Vec<u8>, tag: &[u8; 4], offset: u32, length: u32| {
            buf.extend_from_slice(tag);
            buf.extend_from_slice(&0u32.to_be_bytes());
            buf.extend_from_slice(&offset.to_be_bytes());
            buf.extend_from_slice(&length.to_be_bytes());
        };
        push_entry(&mut buf, b"head", head_off, 54);
        push_entry(&mut buf, b"maxp", maxp_off, 6);
        push_entry(&mut buf, b"hhea", hhea_off, 36);
        push_entry(&mut buf, b"hmtx", hmtx_off, 4);
        push_entry(&mut buf, b"loca", loca_off, 8);
        push_entry(&mut buf, b"glyf", glyf_off, glyph_len);
        push_entry(&mut buf, b"cmap", cmap_off, 22);

        let mut head = vec![0u8; 54];
        head[50..52].copy_from_slice(&1i16.to_be_bytes()); // long loca format
        buf.extend_from_slice(&head);

        let mut maxp = vec![0u8; 6];
        maxp[4..6].copy_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&maxp);

        let mut hhea = vec![0u8; 36];
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
        hhea[34..36].copy_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&hhea);

        buf.extend_from_slice(&1000u16.to_be_bytes()); // advance width
        buf.extend_from_slice(&100i16.to_be_bytes()); // lsb

        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&glyph_len.to_be_bytes());

        // A single-contour rectangle: (100,0) -> (900,0) -> (900,700) -> (100,700).
        buf.extend_from_slice(&1i16.to_be_bytes()); // numContours
        buf.extend_from_slice(&100i16.to_be_bytes()); // xMin
        buf.extend_from_slice(&0i16.to_be_bytes()); // yMin
        buf.extend_from_slice(&900i16.to_be_bytes()); // xMax
        buf.extend_from_slice(&700i16.to_be_bytes()); // yMax
        buf.extend_from_slice(&3u16.to_be_bytes()); // endPtsOfContours[0]
        buf.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
        for _ in 0..4 {
            buf.push(0x01); // ON_CURVE, explicit (non-short) deltas
        }
        for dx in [100i16, 800, 0, -800] {
            buf.extend_from_slice(&dx.to_be_bytes());
        }
        for dy in [0i16, 0, 700, 0] {
            buf.extend_from_slice(&dy.to_be_bytes());
        }

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
    fn solid_glyph_leaves_top_and_bottom_rows_clean_with_ink_on_the_left() {
        let bytes = solid_rectangle_font_bytes();
        let mut font = Font::from_reader(Cursor::new(bytes)).unwrap();
        let mut canvas = Canvas::new(220, 232, WHITE);

        render_text(&mut font, "A", 200.0, 16.0, 176.0, FillRule::NonZero, BLACK, &mut canvas).unwrap();

        let width = canvas.width() as usize;
        let top_row = &canvas.pixels()[0..width];
        let bottom_row = &canvas.pixels()[(canvas.height() as usize - 1) * width..];
        assert!(top_row.iter().all(|p| *p == WHITE));
        assert!(bottom_row.iter().all(|p| *p == WHITE));

        let left_column_has_ink = (0..canvas.height() as usize).any(|y| canvas.pixels()[y * width + 36] == BLACK);
        assert!(left_column_has_ink);
    }

    #[test]
    fn missing_glyph_fails_the_whole_run() {
        let bytes = single_empty_glyph_font_bytes();
        let mut font = Font::from_reader(Cursor::new(bytes)).unwrap();
        let mut canvas = Canvas::new(50, 50, WHITE);

        match render_text(&mut font, "Z", 200.0, 0.0, 40.0, FillRule::NonZero, BLACK, &mut canvas) {
            Err(Error::GlyphNotFound('Z')) => {}
            other => panic!("expected GlyphNotFound('Z'), got {:?}", other),
        }
    }
}
