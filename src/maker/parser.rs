//! Sub-directory parser for the maker block
//!
//! Parses the embedded IFD-like tag directory from a slice that begins
//! at the 2-byte order marker. Only the header checks can fail; an
//! out-of-range table offset or a truncated entry table degrades to a
//! directory with fewer entries than declared, because partial captures
//! are the common case rather than the exception.

use std::io::{Cursor, Seek, SeekFrom};

use log::{debug, warn};

use crate::io::byte_order::ByteOrder;
use crate::maker::constants::header;
use crate::maker::directory::{Directory, DirectoryEntry};
use crate::maker::errors::{MakerError, MakerResult};

/// Parser for the embedded tag directory
pub struct DirectoryParser;

impl DirectoryParser {
    /// Parses a directory from a slice beginning at the byte order marker
    ///
    /// Layout: 2-byte order marker ("MM" or "II"), 2-byte magic (must be
    /// 42), 4-byte offset of the entry table, then at that offset a
    /// 2-byte entry count followed by fixed 12-byte records.
    pub fn parse(data: &[u8]) -> MakerResult<Directory> {
        if data.len() < 8 {
            return Err(MakerError::TruncatedHeader(data.len()));
        }

        let mut cursor = Cursor::new(data);
        let byte_order = ByteOrder::detect(&mut cursor)?;
        let handler = byte_order.create_handler();

        let magic = handler.read_u16(&mut cursor)?;
        if magic != header::DIRECTORY_MAGIC {
            return Err(MakerError::InvalidMagic(magic));
        }

        let first_offset = handler.read_u32(&mut cursor)?;
        let mut directory = Directory::new(byte_order, magic, first_offset);

        // Out-of-range table offsets are routine: upstream extractors
        // often truncate the block. Not an error.
        let table_start = first_offset as usize;
        if table_start.saturating_add(2) > data.len() {
            warn!(
                "Directory table offset {} exceeds block length {}, returning empty directory",
                first_offset,
                data.len()
            );
            return Ok(directory);
        }

        cursor.seek(SeekFrom::Start(first_offset as u64))?;
        let declared = handler.read_u16(&mut cursor)?;
        directory.declared_count = Some(declared);
        debug!("Directory declares {} entries", declared);

        for index in 0..declared {
            let entry_start = table_start + 2 + index as usize * header::ENTRY_SIZE;
            if entry_start + header::ENTRY_SIZE > data.len() {
                debug!(
                    "Entry table truncated after {} of {} entries",
                    index, declared
                );
                break;
            }

            let tag = handler.read_u16(&mut cursor)?;
            let field_type = handler.read_u16(&mut cursor)?;
            let count = handler.read_u32(&mut cursor)?;
            let value_offset = handler.read_u32(&mut cursor)?;

            directory.add_entry(DirectoryEntry::new(tag, field_type, count, value_offset));
        }

        debug!("Read directory with {} entries", directory.entry_count());
        Ok(directory)
    }
}
