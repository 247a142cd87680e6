//! Little-endian cursor over binary asset bytes

use crate::rasterizer::RasterError;

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], RasterError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&e| e <= self.bytes.len())
            .ok_or_else(|| {
                RasterError::FormatError(format!(
                    "unexpected end of data reading {} at byte {}",
                    what, self.pos
                ))
            })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn u8(&mut self, what: &str) -> Result<u8, RasterError> {
        Ok(self.take(1, what)?[0])
    }

    pub fn i32(&mut self, what: &str) -> Result<i32, RasterError> {
        let b = self.take(4, what)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// A count field: non-negative i32
    pub fn count(&mut self, what: &str) -> Result<usize, RasterError> {
        let n = self.i32(what)?;
        usize::try_from(n)
            .map_err(|_| RasterError::FormatError(format!("negative {}: {}", what, n)))
    }

    pub fn i32_array(&mut self, len: usize, what: &str) -> Result<Vec<i32>, RasterError> {
        let byte_len = len
            .checked_mul(4)
            .ok_or_else(|| RasterError::FormatError(format!("{} too large", what)))?;
        Ok(self
            .take(byte_len, what)?
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }
}
