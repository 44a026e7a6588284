//! Frame encoding and decoding.
//!
//! A frame is laid out as
//!
//! ```text
//! [header: JSON code table][HEADER_SEPARATOR][valid bits: u64 BE][payload]
//! ```
//!
//! The payload packs codewords MSB-first; the bit count tells the decoder
//! where the zero padding of the last byte begins.

use tracing::{debug, warn};

use crate::bitstream::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{Result, SqueezError};
use crate::frequency::FrequencyTable;
use crate::tree::{build_tree, DecodeTree, Walk};

/// Ends the header block. Compact JSON never contains a raw newline.
pub const HEADER_SEPARATOR: &[u8] = b"\nEND OF HEADER\n";

/// Size of the valid-bit count that follows the separator.
pub const LENGTH_FIELD_BYTES: usize = 8;

/// Borrowed view of the sections of an encoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub header: &'a [u8],
    pub bit_count: u64,
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Split `bytes` at the first separator and read the length field.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let split = bytes
            .windows(HEADER_SEPARATOR.len())
            .position(|window| window == HEADER_SEPARATOR)
            .ok_or_else(|| SqueezError::MalformedHeader("header separator not found".into()))?;

        let header = &bytes[..split];
        let rest = &bytes[split + HEADER_SEPARATOR.len()..];
        if rest.len() < LENGTH_FIELD_BYTES {
            return Err(SqueezError::MalformedHeader(format!(
                "length field needs {} bytes, found {}",
                LENGTH_FIELD_BYTES,
                rest.len()
            )));
        }

        let (length, payload) = rest.split_at(LENGTH_FIELD_BYTES);
        let mut raw = [0u8; LENGTH_FIELD_BYTES];
        raw.copy_from_slice(length);

        Ok(Frame {
            header,
            bit_count: u64::from_be_bytes(raw),
            payload,
        })
    }

    /// Bytes the payload must occupy for `bit_count` bits.
    pub fn expected_payload_len(&self) -> u64 {
        self.bit_count.div_ceil(8)
    }
}

/// Encode `text` into a complete frame.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    // pass 1
    let frequencies = FrequencyTable::analyze(text);
    let table = match build_tree(&frequencies)? {
        Some(root) => CodeTable::from_tree(&root),
        None => CodeTable::default(),
    };
    let header = table.to_header()?;

    // pass 2
    let mut writer = BitWriter::new();
    for symbol in text.chars() {
        let code = table.get(symbol).ok_or(SqueezError::UnknownSymbol(symbol))?;
        writer.write_bits(code.bits())?;
    }
    let packed = writer.finish()?;

    debug!(
        symbols = frequencies.total(),
        distinct = table.len(),
        header_bytes = header.len(),
        payload_bits = packed.total_bits,
        "encoded frame"
    );

    let mut frame = Vec::with_capacity(
        header.len() + HEADER_SEPARATOR.len() + LENGTH_FIELD_BYTES + packed.bytes.len(),
    );
    frame.extend_from_slice(&header);
    frame.extend_from_slice(HEADER_SEPARATOR);
    frame.extend_from_slice(&packed.total_bits.to_be_bytes());
    frame.extend_from_slice(&packed.bytes);
    Ok(frame)
}

/// Decode a frame produced by [`encode`]. Nothing partial is returned on error.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let frame = Frame::parse(bytes)?;
    let table = CodeTable::from_header(frame.header)?;

    let expected = frame.expected_payload_len();
    let actual = frame.payload.len() as u64;
    if actual < expected {
        return Err(SqueezError::TruncatedPayload(format!(
            "{} bits need {} bytes, found {}",
            frame.bit_count, expected, actual
        )));
    }
    if actual > expected {
        return Err(SqueezError::CorruptPayload(format!(
            "{} trailing bytes after the payload",
            actual - expected
        )));
    }

    let Some(tree) = DecodeTree::from_code_table(&table)? else {
        if frame.bit_count == 0 {
            return Ok(String::new());
        }
        return Err(SqueezError::CorruptPayload(format!(
            "{} payload bits with an empty code table",
            frame.bit_count
        )));
    };

    let mut reader = BitReader::new(frame.payload, frame.bit_count)?;
    let mut text = String::new();
    let mut cursor = tree.root();
    let mut at_root = true;
    while reader.remaining() > 0 {
        match tree.step(cursor, reader.read_bit()?)? {
            Walk::Inner(next) => {
                cursor = next;
                at_root = false;
            }
            Walk::Emit(symbol) => {
                text.push(symbol);
                cursor = tree.root();
                at_root = true;
            }
        }
    }
    if !at_root {
        return Err(SqueezError::TruncatedPayload(format!(
            "bit stream ended inside a codeword after {} bits",
            reader.position()
        )));
    }

    if has_dirty_padding(&frame) {
        warn!("frame padding bits are not zero");
    }
    debug!(
        symbols = text.chars().count(),
        payload_bits = frame.bit_count,
        "decoded frame"
    );
    Ok(text)
}

fn has_dirty_padding(frame: &Frame<'_>) -> bool {
    let pad = (frame.expected_payload_len() * 8 - frame.bit_count) as u32;
    match frame.payload.last() {
        Some(&last) if pad > 0 => last & ((1u8 << pad) - 1) != 0,
        _ => false,
    }
}
