//! Unicode character map, format 12 only (spec section 4.D). Grounded on
//! `truetype_loader/char_glyph_mapping_table.rs`'s subtable-record scan and
//! per-format byte layout, narrowed to the one subtable and format this
//! design ever selects (platform 0 / encoding 4 / format 12).

use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::reader::BinaryReader;

#[derive(Debug)]
pub struct CharacterMap {
    code_point_to_glyph: HashMap<u32, u32>,
}

impl CharacterMap {
    pub fn parse<R: Read + Seek>(reader: &mut BinaryReader<R>, cmap_offset: u32) -> Result<CharacterMap> {
        reader.seek_absolute(cmap_offset as u64)?;
        reader.skip(2)?; // table version
        let num_subtables = reader.read_u16()?;

        let mut subtable_offset = None;
        for i in 0..num_subtables {
            reader.seek_absolute(cmap_offset as u64 + 4 + 8 * i as u64)?;
            let platform_id = reader.read_u16()?;
            let encoding_id = reader.read_u16()?;
            let offset = reader.read_u32()?;
            if platform_id == 0 && encoding_id == 4 {
                subtable_offset = Some(cmap_offset + offset);
                break;
            }
        }
        let subtable_offset = subtable_offset.ok_or(Error::UnsupportedCmapFormat(0))?;

        reader.seek_absolute(subtable_offset as u64)?;
        let format = reader.read_u16()?;
        if format != 12 {
            return Err(Error::UnsupportedCmapFormat(format));
        }
        reader.skip(10)?; // reserved(u16) + length(u32) + language(u32)
        let num_groups = reader.read_u32()?;

        let mut code_point_to_glyph = HashMap::new();
        for _ in 0..num_groups {
            let start_char_code = reader.read_u32()?;
            let end_char_code = reader.read_u32()?;
            let start_glyph_code = reader.read_u32()?;
            for cp in start_char_code..=end_char_code {
                code_point_to_glyph.insert(cp, start_glyph_code + (cp - start_char_code));
            }
        }

        log::debug!("parsed format-12 cmap with {} groups", num_groups);
        Ok(CharacterMap { code_point_to_glyph })
    }

    pub fn lookup(&self, code_point: char) -> Option<u32> {
        self.code_point_to_glyph.get(&(code_point as u32)).copied()
    }
}
