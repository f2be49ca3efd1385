//! Bounds-checked big-endian reader over an input buffer

/// Cursor over a byte slice that never reads past its end
///
/// Every read returns `None` instead of panicking when the buffer is short,
/// leaving the position untouched. Callers turn `None` into the error that
/// fits their context (truncated header vs. truncated frame).
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `len` bytes
    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Take the next `N` bytes as an array
    pub fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N)?.try_into().ok()
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.take_array::<1>().map(|[b]| b)
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.take_array().map(u16::from_be_bytes)
    }

    /// Read a 24-bit big-endian unsigned integer
    pub fn read_u24(&mut self) -> Option<u32> {
        self.take_array::<3>()
            .map(|[a, b, c]| u32::from_be_bytes([0, a, b, c]))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Option<i16> {
        self.take_array().map(i16::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        self.take_array().map(u64::from_be_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xFF, 0xFE];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u8(), Some(0x01));
        assert_eq!(reader.read_u24(), Some(0x02_0304));
        assert_eq!(reader.read_u16(), Some(0x0506));
        assert_eq!(reader.read_i16(), Some(-2));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_short_read_keeps_position() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u8(), Some(0xAA));
        assert_eq!(reader.read_u32(), None);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_u16(), Some(0xBBCC));
    }

    #[test]
    fn test_take_overflowing_length() {
        let data = [0u8; 4];
        let mut reader = ByteReader::new(&data);
        reader.take(2);
        assert_eq!(reader.take(usize::MAX), None);
        assert_eq!(reader.remaining(), 2);
    }
}
