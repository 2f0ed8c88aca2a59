//! Packed bit sequences for encoded records.
//!
//! Encoded records are `'0'/'1'` strings, one byte per bit. `BitWriter` packs
//! them MSB-first into bytes and `BitReader` walks them back out. The exact
//! bit length travels with the bytes in [`PackedRecord`], so the zero bits
//! that pad the final byte are never mistaken for data.
//!
//! # Example
//! ```
//! use huffbatch_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.push_code("101").unwrap();
//! writer.push_code("11").unwrap();
//! // 10111 -> padded to 10111000
//!
//! let packed = writer.finish();
//! assert_eq!(packed.bytes(), &[0b10111000]);
//! assert_eq!(packed.bit_len(), 5);
//!
//! let bits: Vec<bool> = BitReader::new(&packed).collect();
//! assert_eq!(bits, vec![true, false, true, true, true]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BitIoError, Result};

/// Bytes plus the number of meaningful bits in them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedRecord {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl PackedRecord {
    /// Wrap raw bytes with a known bit length.
    ///
    /// # Errors
    /// `BitIoError::LengthOverflow` if `bit_len` exceeds `bytes.len() * 8`.
    pub fn new(bytes: Vec<u8>, bit_len: usize) -> Result<Self> {
        let capacity = bytes.len() * 8;
        if bit_len > capacity {
            return Err(BitIoError::LengthOverflow { bit_len, capacity }.into());
        }
        Ok(Self { bytes, bit_len })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }
}

/// Packs bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit.
    pub fn push_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit of a `'0'/'1'` string.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitChar` on any other character. Bits before the
    /// offending character have already been written.
    pub fn push_code(&mut self, code: &str) -> Result<()> {
        for (position, ch) in code.chars().enumerate() {
            match ch {
                '0' => self.push_bit(false),
                '1' => self.push_bit(true),
                _ => return Err(BitIoError::InvalidBitChar { ch, position }.into()),
            }
        }
        Ok(())
    }

    /// Total number of bits written (including the partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Finish writing. The final partial byte is padded with zeros.
    pub fn finish(mut self) -> PackedRecord {
        let bit_len = self.bit_len();
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        PackedRecord {
            bytes: self.bytes,
            bit_len,
        }
    }
}

/// Reads bits MSB-first from a [`PackedRecord`], stopping at its bit length.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(packed: &'a PackedRecord) -> Self {
        Self {
            data: &packed.bytes,
            bit_len: packed.bit_len,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once `bit_len` bits have been read.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    pub fn position(&self) -> usize {
        self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_single_byte() {
        let mut writer = BitWriter::new();
        writer.push_code("10110011").unwrap();

        let packed = writer.finish();
        assert_eq!(packed.bytes(), &[0b10110011]);
        assert_eq!(packed.bit_len(), 8);
    }

    #[test]
    fn test_partial_byte_padding() {
        let mut writer = BitWriter::new();
        writer.push_bit(true);

        let packed = writer.finish();
        assert_eq!(packed.bytes(), &[0b10000000]);
        assert_eq!(packed.bit_len(), 1);

        let mut reader = BitReader::new(&packed);
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_empty());
    }

    #[test]
    fn test_multi_byte() {
        let mut writer = BitWriter::new();
        writer.push_code("1010101111110000").unwrap();
        writer.push_code("11").unwrap();

        let packed = writer.finish();
        assert_eq!(packed.bytes(), &[0b10101011, 0b11110000, 0b11000000]);
        assert_eq!(packed.bit_len(), 18);

        let text: String = BitReader::new(&packed)
            .map(|b| if b { '1' } else { '0' })
            .collect();
        assert_eq!(text, "101010111111000011");
    }

    #[test]
    fn test_read_past_end() {
        let packed = PackedRecord::new(vec![0xFF], 3).unwrap();
        let mut reader = BitReader::new(&packed);

        assert_eq!(reader.bits_remaining(), 3);
        for _ in 0..3 {
            assert!(reader.read_bit().unwrap());
        }
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_invalid_char() {
        let mut writer = BitWriter::new();
        let result = writer.push_code("0192");
        assert!(matches!(
            result,
            Err(Error::BitIo(BitIoError::InvalidBitChar { ch: '9', position: 2 }))
        ));
        assert_eq!(writer.bit_len(), 2);
    }

    #[test]
    fn test_length_overflow() {
        assert!(PackedRecord::new(vec![0], 9).is_err());
        assert!(PackedRecord::new(Vec::new(), 0).unwrap().is_empty());
    }
}
