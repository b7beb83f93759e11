//! Maker-block decoding pipeline
//!
//! Single-pass, side-effect-free composition over an in-memory buffer:
//! normalize the captured bytes, locate the vendor header, try the
//! embedded directory, scan for sub-structures. The stages are
//! independent: a failed directory parse degrades to `None` and never
//! blocks the scanner, and vice versa. One decode invocation is one
//! unit of work with no shared state, so independent inputs can be
//! decoded concurrently.

use log::{debug, info, warn};

use crate::io::byte_order::ByteOrder;
use crate::maker::constants::header;
use crate::maker::directory::Directory;
use crate::maker::normalize::RawBlock;
use crate::maker::parser::DirectoryParser;
use crate::maker::scanner::{ScanReport, StructureScanner};

/// Result of one decode invocation, immutable thereafter
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBlock {
    /// Length of the block after normalization
    pub raw_data_length: usize,
    /// Offset of the vendor header signature, if found
    pub header_position: Option<usize>,
    /// Byte order marker seen after the header, kept even when the
    /// directory fails to parse later
    pub byte_order: Option<ByteOrder>,
    /// Parsed directory; None when absent or malformed
    pub directory: Option<Directory>,
    /// Fragments and heuristic candidates from the scanning passes
    pub scan: ScanReport,
}

/// Decodes a maker block from raw or escape-captured bytes
pub fn decode(input: &[u8]) -> DecodedBlock {
    let block = RawBlock::from_captured(input);
    decode_block(&block)
}

/// Decodes an already normalized block
pub fn decode_block(block: &RawBlock) -> DecodedBlock {
    let data = block.as_bytes();
    info!("Decoding maker block of {} bytes", data.len());

    let header_position = find_header(data);
    let mut byte_order = None;
    let mut directory = None;

    if let Some(position) = header_position {
        debug!("Vendor header at offset {}", position);
        let directory_start = position + header::APPLE_SIGNATURE.len();

        if directory_start + 2 <= data.len() {
            byte_order = match [data[directory_start], data[directory_start + 1]] {
                header::BIG_ENDIAN_MARKER => Some(ByteOrder::BigEndian),
                header::LITTLE_ENDIAN_MARKER => Some(ByteOrder::LittleEndian),
                _ => None,
            };
        }

        if byte_order.is_some() {
            match DirectoryParser::parse(&data[directory_start..]) {
                Ok(parsed) => directory = Some(parsed),
                Err(e) => {
                    // No structured tag data; fragment and candidate
                    // scanning still applies.
                    warn!("Directory parse failed: {}", e);
                }
            }
        }
    }

    let scan = StructureScanner::scan(data);

    DecodedBlock {
        raw_data_length: data.len(),
        header_position,
        byte_order,
        directory,
        scan,
    }
}

/// Locates the vendor header signature within the block
fn find_header(data: &[u8]) -> Option<usize> {
    let signature = header::APPLE_SIGNATURE;
    if data.len() < signature.len() {
        return None;
    }
    data.windows(signature.len()).position(|w| w == signature)
}
