//! `sfnt` table directory. Grounded on `truetype_loader/mod.rs`'s
//! `TableDirectoryEntry` / `SfntFont::from_binary` directory loop, modernized
//! off the teacher's `unsafe { mem::transmute(...) }` tag decoding to a plain
//! `[u8; 4]` comparison.

use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::reader::BinaryReader;

/// `{checksum, offset, length}` keyed by 4-byte ASCII tag (spec section 3).
#[derive(Copy, Clone, Debug)]
pub struct TableEntry {
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

const REQUIRED_TABLES: &[(&[u8; 4], &str)] = &[
    (b"head", "head"),
    (b"maxp", "maxp"),
    (b"hhea", "hhea"),
    (b"hmtx", "hmtx"),
    (b"loca", "loca"),
    (b"glyf", "glyf"),
    (b"cmap", "cmap"),
];

#[derive(Debug)]
pub struct TableDirectory {
    entries: HashMap<[u8; 4], TableEntry>,
}

impl TableDirectory {
    pub fn parse<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<TableDirectory> {
        reader.skip(4)?; // sfnt version
        let num_tables = reader.read_u16()?;
        reader.skip(6)?; // searchRange, entrySelector, rangeShift

        let mut entries = HashMap::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = reader.read_tag()?;
            let checksum = reader.read_u32()?;
            let offset = reader.read_u32()?;
            let length = reader.read_u32()?;
            entries.insert(tag, TableEntry { checksum, offset, length });
        }

        for (tag, name) in REQUIRED_TABLES {
            if !entries.contains_key(*tag) {
                return Err(Error::MissingTable(name));
            }
        }

        log::debug!("parsed table directory with {} tables", entries.len());
        Ok(TableDirectory { entries })
    }

    pub fn get(&self, tag: &[u8; 4]) -> Option<&TableEntry> {
        self.entries.get(tag)
    }

    pub fn offset_of(&self, tag: &[u8; 4], name: &'static str) -> Result<u32> {
        self.get(tag).map(|e| e.offset).ok_or(Error::MissingTable(name))
    }
}
