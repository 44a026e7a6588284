//! squeez: lossless Huffman compression for Unicode text.
//!
//! The engine runs a two-pass pipeline over an in-memory input:
//! - frequency analysis over code points
//! - deterministic Huffman tree construction
//! - codeword assignment
//! - bit packing behind a self-describing header
//!
//! Decoding rebuilds the tree from the header and walks it bit by bit.

pub mod bitstream;
pub mod code_table;
pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod queue;
pub mod tree;

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

pub use crate::code_table::{CodeTable, Codeword};
pub use crate::codec::{Frame, HEADER_SEPARATOR};
pub use crate::config::CodecConfig;
pub use crate::error::{Result, SqueezError};
pub use crate::frequency::FrequencyTable;
pub use crate::tree::TreeNode;

/// Statistics about one encoded input
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodingReport {
    pub symbol_count: u64,
    pub distinct_symbols: usize,
    pub input_bytes: usize,
    pub header_bytes: usize,
    pub payload_bits: u64,
    pub frame_bytes: usize,
    /// Frame bytes divided by input bytes.
    pub ratio: f64,
    /// Shannon entropy in bits per symbol.
    pub entropy_bits: f64,
    /// Weighted mean codeword length in bits per symbol.
    pub average_code_length: f64,
}

impl EncodingReport {
    fn from_frame(text: &str, frame: &[u8]) -> Result<Self> {
        let frequencies = FrequencyTable::analyze(text);
        let parsed = Frame::parse(frame)?;
        let symbol_count = frequencies.total();

        Ok(EncodingReport {
            symbol_count,
            distinct_symbols: frequencies.len(),
            input_bytes: text.len(),
            header_bytes: parsed.header.len(),
            payload_bits: parsed.bit_count,
            frame_bytes: frame.len(),
            ratio: if text.is_empty() {
                1.0
            } else {
                frame.len() as f64 / text.len() as f64
            },
            entropy_bits: frequencies.entropy(),
            average_code_length: if symbol_count == 0 {
                0.0
            } else {
                parsed.bit_count as f64 / symbol_count as f64
            },
        })
    }
}

/// The compression engine. Holds only configuration; every call owns its
/// own frequency table, tree and code table.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode text into a frame
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        self.check_size(text.len())?;
        let frame = codec::encode(text)?;

        if self.config.verify_roundtrip && codec::decode(&frame)? != text {
            return Err(SqueezError::VerificationFailed);
        }
        Ok(frame)
    }

    /// Decode a frame back into text
    pub fn decode(&self, frame: &[u8]) -> Result<String> {
        self.check_size(frame.len())?;
        codec::decode(frame)
    }

    /// Encode `text` and write the finished frame to `output`.
    pub fn encode_to<W: Write>(&self, text: &str, mut output: W) -> Result<usize> {
        let frame = self.encode(text)?;
        output.write_all(&frame)?;
        output.flush()?;
        Ok(frame.len())
    }

    /// Read a whole frame from `input` and decode it.
    pub fn decode_from<R: Read>(&self, input: R) -> Result<String> {
        let frame = self.read_bounded(input)?;
        self.decode(&frame)
    }

    /// Encode without keeping the frame, returning its statistics.
    pub fn report(&self, text: &str) -> Result<EncodingReport> {
        let frame = self.encode(text)?;
        EncodingReport::from_frame(text, &frame)
    }

    /// Compress the UTF-8 file at `input` into a new or truncated `output`.
    pub fn compress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<EncodingReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        let raw = self.read_bounded(fs::File::open(input)?)?;
        let text = std::str::from_utf8(&raw)?;
        let frame = self.encode(text)?;
        fs::write(output, &frame)?;

        let report = EncodingReport::from_frame(text, &frame)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            input_bytes = report.input_bytes,
            frame_bytes = report.frame_bytes,
            "compressed file"
        );
        Ok(report)
    }

    /// Decompress the frame file at `input`, writing UTF-8 text to `output`.
    /// Returns the number of symbols written.
    pub fn decompress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize> {
        let input = input.as_ref();
        let output = output.as_ref();

        let text = self.decode_from(fs::File::open(input)?)?;
        fs::write(output, text.as_bytes())?;

        let symbols = text.chars().count();
        info!(
            input = %input.display(),
            output = %output.display(),
            symbols,
            "decompressed file"
        );
        Ok(symbols)
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.config.max_input_size {
            return Err(SqueezError::InputTooLarge {
                size,
                limit: self.config.max_input_size,
            });
        }
        Ok(())
    }

    fn read_bounded<R: Read>(&self, input: R) -> Result<Vec<u8>> {
        let limit = self.config.max_input_size as u64;
        let mut buf = Vec::new();
        input.take(limit.saturating_add(1)).read_to_end(&mut buf)?;
        self.check_size(buf.len())?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let codec = Codec::default();
        let text = "the quick brown fox jumps over the lazy dog";
        let frame = codec.encode(text).unwrap();
        assert_eq!(codec.decode(&frame).unwrap(), text);
    }

    #[test]
    fn test_empty_roundtrip() {
        let codec = Codec::default();
        let frame = codec.encode("").unwrap();
        assert_eq!(codec.decode(&frame).unwrap(), "");
    }

    #[test]
    fn test_input_too_large() {
        let codec = Codec::new(CodecConfig {
            max_input_size: 8,
            ..CodecConfig::default()
        });
        let err = codec.encode("more than eight bytes").unwrap_err();
        assert!(matches!(
            err,
            SqueezError::InputTooLarge { size: 21, limit: 8 }
        ));
    }

    #[test]
    fn test_verified_encode() {
        let codec = Codec::new(CodecConfig {
            verify_roundtrip: true,
            ..CodecConfig::default()
        });
        let text = "verified 🦀 text";
        let frame = codec.encode(text).unwrap();
        assert_eq!(codec.decode(&frame).unwrap(), text);
    }

    #[test]
    fn test_encode_to_and_decode_from() {
        let codec = Codec::default();
        let mut sink = Vec::new();
        let written = codec.encode_to("streamed through io", &mut sink).unwrap();
        assert_eq!(written, sink.len());
        let text = codec.decode_from(sink.as_slice()).unwrap();
        assert_eq!(text, "streamed through io");
    }

    #[test]
    fn test_report() {
        let codec = Codec::default();
        let report = codec.report("aaaaaaaabc").unwrap();
        assert_eq!(report.symbol_count, 10);
        assert_eq!(report.distinct_symbols, 3);
        assert_eq!(report.payload_bits, 12);
        assert!((report.average_code_length - 1.2).abs() < 1e-9);
        assert!(report.average_code_length >= report.entropy_bits);
    }

    #[test]
    fn test_compression_ratio() {
        let codec = Codec::default();
        let data = "aaaaaaaaaa".repeat(100);
        let report = codec.report(&data).unwrap();
        assert!(report.ratio < 1.0, "repetitive data should compress well");
    }
}
