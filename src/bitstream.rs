//! Bit-level packing and unpacking.
//!
//! Bits are packed MSB-first within each byte. A finished stream carries the
//! number of valid bits so the zero padding of the last byte is never read
//! back as data.

use bitstream_io::{BigEndian, BitRead, BitWrite};

use crate::error::{Result, SqueezError};

/// Accumulates single bits into a byte buffer.
pub struct BitWriter {
    inner: bitstream_io::BitWriter<Vec<u8>, BigEndian>,
    bits: u64,
}

/// Output of [`BitWriter::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedBits {
    pub bytes: Vec<u8>,
    /// Number of valid bits across all of `bytes`.
    pub total_bits: u64,
    /// Valid bits in the final byte (1..=8), or 0 for an empty stream.
    pub last_byte_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            inner: bitstream_io::BitWriter::endian(Vec::new(), BigEndian),
            bits: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.inner.write_bit(bit)?;
        self.bits += 1;
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &[bool]) -> Result<()> {
        for &bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.bits
    }

    /// Zero-pad the partial final byte and hand back the packed bytes.
    pub fn finish(mut self) -> Result<FinishedBits> {
        self.inner.byte_align()?;
        let total_bits = self.bits;
        let last_byte_bits = match total_bits % 8 {
            0 if total_bits == 0 => 0,
            0 => 8,
            n => n as u8,
        };
        Ok(FinishedBits {
            bytes: self.inner.into_writer(),
            total_bits,
            last_byte_bits,
        })
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads back exactly `total_bits` bits from a packed buffer.
pub struct BitReader<'a> {
    inner: bitstream_io::BitReader<&'a [u8], BigEndian>,
    total_bits: u64,
    position: u64,
}

impl<'a> BitReader<'a> {
    /// Fails with `TruncatedPayload` when `bytes` cannot hold `total_bits`.
    pub fn new(bytes: &'a [u8], total_bits: u64) -> Result<Self> {
        let available = bytes.len() as u64 * 8;
        if total_bits > available {
            return Err(SqueezError::TruncatedPayload(format!(
                "{} bits declared but only {} present",
                total_bits, available
            )));
        }
        Ok(Self {
            inner: bitstream_io::BitReader::endian(bytes, BigEndian),
            total_bits,
            position: 0,
        })
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.total_bits {
            return Err(SqueezError::StreamExhausted);
        }
        let bit = self.inner.read_bit()?;
        self.position += 1;
        Ok(bit)
    }

    /// Number of bits consumed.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.total_bits - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_msb_first_packing() {
        let mut writer = BitWriter::new();
        writer.write_bits(&bits("1011")).unwrap();
        let finished = writer.finish().unwrap();
        assert_eq!(finished.bytes, vec![0b1011_0000]);
        assert_eq!(finished.total_bits, 4);
        assert_eq!(finished.last_byte_bits, 4);
    }

    #[test]
    fn test_full_bytes_have_no_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(&bits("1111000010101010")).unwrap();
        assert_eq!(writer.bit_len(), 16);
        let finished = writer.finish().unwrap();
        assert_eq!(finished.bytes, vec![0xF0, 0xAA]);
        assert_eq!(finished.last_byte_bits, 8);
    }

    #[test]
    fn test_empty_writer() {
        let finished = BitWriter::new().finish().unwrap();
        assert!(finished.bytes.is_empty());
        assert_eq!(finished.total_bits, 0);
        assert_eq!(finished.last_byte_bits, 0);
    }

    #[test]
    fn test_reader_stops_at_valid_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(&bits("110")).unwrap();
        let finished = writer.finish().unwrap();

        let mut reader = BitReader::new(&finished.bytes, finished.total_bits).unwrap();
        assert!(reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 3);
        // the padding bits of the byte are still physically there
        assert!(matches!(reader.read_bit(), Err(SqueezError::StreamExhausted)));
    }

    #[test]
    fn test_reader_rejects_short_buffer() {
        let result = BitReader::new(&[0xFF], 9);
        assert!(matches!(result, Err(SqueezError::TruncatedPayload(_))));
    }
}
