//! Byte normalization for captured maker-block data
//!
//! Maker blocks rarely arrive as clean bytes: upstream extraction layers
//! often hand over the textual escape form they logged, complete with a
//! `b"..."` wrapper and backslash-hex escapes. This module recovers the
//! raw byte sequence from whichever representation was captured. It is a
//! total function: unrecognized escapes pass through verbatim, so raw
//! bytes survive the round trip untouched apart from wrapper removal.

use log::debug;

/// Immutable owned byte buffer holding a normalized maker block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    data: Vec<u8>,
}

impl RawBlock {
    /// Wraps bytes that are already in raw form
    pub fn new(data: Vec<u8>) -> Self {
        RawBlock { data }
    }

    /// Recovers raw bytes from a possibly escaped textual capture
    pub fn from_captured(input: &[u8]) -> Self {
        let unwrapped = strip_wrapper(input);
        let data = decode_hex_escapes(unwrapped);

        debug!(
            "Normalized {} captured bytes into {} raw bytes",
            input.len(),
            data.len()
        );

        RawBlock { data }
    }

    /// The normalized bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length of the normalized block
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the block is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Removes a surrounding `"..."`, `b'...'` or `b"..."` wrapper if present
fn strip_wrapper(input: &[u8]) -> &[u8] {
    if input.len() >= 2 && input.starts_with(b"\"") && input.ends_with(b"\"") {
        &input[1..input.len() - 1]
    } else if input.len() >= 3 && input.starts_with(b"b'") && input.ends_with(b"'") {
        &input[2..input.len() - 1]
    } else if input.len() >= 3 && input.starts_with(b"b\"") && input.ends_with(b"\"") {
        &input[2..input.len() - 1]
    } else {
        input
    }
}

/// Decodes `\xHH` escape sequences, passing malformed ones through
fn decode_hex_escapes(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] == b'\\' && i + 4 <= input.len() && input[i + 1] == b'x' {
            if let Some(byte) = hex_pair(input[i + 2], input[i + 3]) {
                output.push(byte);
                i += 4;
                continue;
            }
        }
        output.push(input[i]);
        i += 1;
    }

    output
}

/// Parses two hex digit bytes into a value
fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
