//! Maker-block format constants
//!
//! This module defines constants used throughout the decoding code,
//! making the code more readable and maintainable by replacing magic
//! numbers with descriptive names. The heuristic tables mirror values
//! observed in real captures; they are deliberately not tunable.

/// Maker-block header constants
pub mod header {
    /// ASCII signature that opens an Apple maker block
    pub const APPLE_SIGNATURE: &[u8] = b"Apple iOS\x00\x00";

    /// Directory magic number (42), shared with TIFF
    pub const DIRECTORY_MAGIC: u16 = 42;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// Size of one fixed directory entry record
    pub const ENTRY_SIZE: usize = 12;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// Fixed signatures located by the sub-structure scanner
pub mod signatures {
    /// Magic that opens a serialized binary property list
    pub const BPLIST_MAGIC: &[u8] = b"bplist00";
}

/// Value tables and windows for the heuristic scanning passes
pub mod heuristics {
    /// Plausible ISO sensitivity values, as 2-byte integers
    pub const ISO_VALUES: [u16; 7] = [100, 200, 400, 800, 1600, 3200, 6400];

    /// Plausible f-numbers, as 4-byte floats
    pub const APERTURE_VALUES: [f32; 7] = [1.8, 2.0, 2.2, 2.8, 4.0, 5.6, 8.0];

    /// Plausible focal lengths in millimetres, as 4-byte floats
    pub const FOCAL_LENGTH_VALUES: [f32; 6] = [4.0, 6.0, 7.5, 9.0, 12.0, 14.0];

    /// Raw second counts outside this open interval are never timestamps
    pub const TIMESTAMP_RAW_MIN: u32 = 300_000_000;
    pub const TIMESTAMP_RAW_MAX: u32 = 800_000_000;

    /// A decoded timestamp must land strictly between these years
    pub const TIMESTAMP_YEAR_MIN: i32 = 2010;
    pub const TIMESTAMP_YEAR_MAX: i32 = 2030;

    /// How far to look back for a key token before a plist signature
    pub const KEY_LOOKBACK: usize = 30;

    /// Forward window scanned after a plist signature
    pub const PLIST_SCAN_WINDOW: usize = 100;

    /// Portion of the forward window used for the content preview
    pub const PREVIEW_WINDOW: usize = 50;

    /// Cap on timestamp and coordinate candidate lists
    pub const MAX_CANDIDATES: usize = 3;

    /// Keywords that suggest time-related plist content
    pub const TIME_KEYWORDS: [&str; 5] = ["time", "date", "epoch", "scale", "timestamp"];
}
