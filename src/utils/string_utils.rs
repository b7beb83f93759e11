//! String utility functions
//!
//! Utilities for working with strings and text data.

/// Minimum printable run length worth keeping in a preview
const MIN_RUN: usize = 3;

/// Extracts printable-ASCII runs from binary data
///
/// Runs of length >= 3 are kept and joined with single spaces; shorter
/// runs are treated as noise.
pub fn readable_strings(data: &[u8]) -> String {
    let mut readable = String::new();
    let mut current = String::new();

    for &byte in data {
        if (32..=126).contains(&byte) {
            current.push(byte as char);
        } else {
            if current.len() >= MIN_RUN {
                readable.push_str(&current);
                readable.push(' ');
            }
            current.clear();
        }
    }

    if current.len() >= MIN_RUN {
        readable.push_str(&current);
    }

    readable.trim().to_string()
}
