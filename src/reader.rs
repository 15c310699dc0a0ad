use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::Result;

/// Random-access big-endian primitive decoding over a byte source.
///
/// Multi-byte reads fail with `Error::TruncatedInput` when the underlying
/// source hits end-of-file mid-value (see the `From<io::Error>` impl on
/// `Error`, which maps `UnexpectedEof` that way).
pub struct BinaryReader<R> {
    inner: R,
}

impl<R: Read + Seek> BinaryReader<R> {
    pub fn new(inner: R) -> BinaryReader<R> {
        BinaryReader { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn seek_absolute(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn skip(&mut self, n: i64) -> Result<()> {
        self.inner.seek(SeekFrom::Current(n))?;
        Ok(())
    }

    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::Current(0))?)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<BigEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<BigEndian>()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.inner.read_i8()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.inner.read_i16::<BigEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<BigEndian>()?)
    }

    /// Signed 2.14 fixed-point: value = raw / 16384.
    pub fn read_f2dot14(&mut self) -> Result<f32> {
        let raw = self.read_i16()?;
        Ok(raw as f32 / 16384.0)
    }

    /// Four ASCII bytes, returned verbatim (not required to be valid UTF-8
    /// beyond ASCII, but every table tag in practice is).
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader_over(bytes: Vec<u8>) -> BinaryReader<Cursor<Vec<u8>>> {
        BinaryReader::new(Cursor::new(bytes))
    }

    #[test]
    fn reads_big_endian_primitives() {
        let mut r = reader_over(vec![0x01, 0x02, 0xff, 0xfe, 0x00, 0x00, 0x00, 0x2a]);
        assert_eq!(r.read_u16().unwrap(), 0x0102);
        assert_eq!(r.read_i16().unwrap(), -2i16);
        assert_eq!(r.read_u32().unwrap(), 42);
    }

    #[test]
    fn f2dot14_matches_spec_scale() {
        let mut r = reader_over(vec![0x40, 0x00]);
        assert_eq!(r.read_f2dot14().unwrap(), 1.0);
        let mut r = reader_over(vec![0xC0, 0x00]);
        assert_eq!(r.read_f2dot14().unwrap(), -1.0);
    }

    #[test]
    fn truncated_multibyte_read_fails() {
        let mut r = reader_over(vec![0x00]);
        match r.read_u16() {
            Err(crate::error::Error::TruncatedInput) => {}
            other => panic!("expected TruncatedInput, got {:?}", other),
        }
    }

    #[test]
    fn tag_round_trip() {
        let mut r = reader_over(b"glyf".to_vec());
        assert_eq!(&r.read_tag().unwrap(), b"glyf");
    }

    #[test]
    fn seek_skip_tell() {
        let mut r = reader_over(vec![0u8; 16]);
        r.seek_absolute(4).unwrap();
        assert_eq!(r.tell().unwrap(), 4);
        r.skip(3).unwrap();
        assert_eq!(r.tell().unwrap(), 7);
    }
}
