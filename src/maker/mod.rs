//! Maker-block decoding module
//!
//! This module provides structures and functions for decoding the
//! vendor-proprietary binary metadata block embedded in image tag data:
//! its IFD-like sub-directory, serialized property-list fragments,
//! device identifiers, and heuristic camera-setting candidates.

pub mod constants;
pub mod decoder;
pub mod directory;
pub mod errors;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod tag_defs;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use decoder::{decode, decode_block, DecodedBlock};
pub use directory::{Directory, DirectoryEntry};
pub use errors::{MakerError, MakerResult};
pub use normalize::RawBlock;
pub use parser::DirectoryParser;
pub use report::{CleanSummary, MakerNoteReport};
pub use scanner::{Fragment, FragmentKind, ScanReport, StructureScanner};
pub use tag_defs::TagDefinitions;
