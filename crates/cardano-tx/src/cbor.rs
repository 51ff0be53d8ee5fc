//! Minimal CBOR encoder
//!
//! Covers the definite-length subset needed for transaction bodies, outputs
//! and metadata: unsigned integers, byte/text strings, arrays, maps and
//! booleans.

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;

const SIMPLE_FALSE: u8 = 0xf4;
const SIMPLE_TRUE: u8 = 0xf5;

#[derive(Debug, Default, Clone)]
pub struct CborEncoder {
    buf: Vec<u8>,
}

impl CborEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Major type plus argument, in the shortest form
    fn head(&mut self, major: u8, n: u64) -> &mut Self {
        let tag = major << 5;
        if n < 24 {
            self.buf.push(tag | n as u8);
        } else if n <= u8::MAX as u64 {
            self.buf.push(tag | 24);
            self.buf.push(n as u8);
        } else if n <= u16::MAX as u64 {
            self.buf.push(tag | 25);
            self.buf.extend_from_slice(&(n as u16).to_be_bytes());
        } else if n <= u32::MAX as u64 {
            self.buf.push(tag | 26);
            self.buf.extend_from_slice(&(n as u32).to_be_bytes());
        } else {
            self.buf.push(tag | 27);
            self.buf.extend_from_slice(&n.to_be_bytes());
        }
        self
    }

    pub fn unsigned(&mut self, n: u64) -> &mut Self {
        self.head(MAJOR_UNSIGNED, n)
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.head(MAJOR_BYTES, data.len() as u64);
        self.buf.extend_from_slice(data);
        self
    }

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.head(MAJOR_TEXT, s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn array(&mut self, len: usize) -> &mut Self {
        self.head(MAJOR_ARRAY, len as u64)
    }

    pub fn map(&mut self, len: usize) -> &mut Self {
        self.head(MAJOR_MAP, len as u64)
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.buf.push(if value { SIMPLE_TRUE } else { SIMPLE_FALSE });
        self
    }

    /// Append an already encoded item
    pub fn raw(&mut self, encoded: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(encoded);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned_hex(n: u64) -> String {
        let mut enc = CborEncoder::new();
        enc.unsigned(n);
        hex::encode(enc.into_bytes())
    }

    #[test]
    fn test_unsigned_widths() {
        assert_eq!(unsigned_hex(0), "00");
        assert_eq!(unsigned_hex(23), "17");
        assert_eq!(unsigned_hex(24), "1818");
        assert_eq!(unsigned_hex(1000), "1903e8");
        assert_eq!(unsigned_hex(80_000_000), "1a04c4b400");
        assert_eq!(unsigned_hex(0x1_0000_0000), "1b0000000100000000");
    }

    #[test]
    fn test_strings_and_containers() {
        let mut enc = CborEncoder::new();
        enc.array(3).text("to").bytes(&[0xde, 0xad]).bool(true).map(0);
        assert_eq!(hex::encode(enc.into_bytes()), "8362746f42deadf5a0");
    }
}
