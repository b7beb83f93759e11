//! Maker-block directory structures and methods
//!
//! The vendor block embeds a miniature IFD-like directory: a
//! length-prefixed table of fixed 12-byte tag/type/count/value records
//! with its own byte order marker and magic number. This module holds the
//! parsed representation; the records preserve file order and are never
//! sorted or scored.

use std::fmt;

use log::trace;

use crate::io::byte_order::ByteOrder;
use crate::maker::constants::field_types;
use crate::maker::tag_defs::TagDefinitions;

/// Represents an entry in the embedded tag directory
///
/// Each entry is a fixed 12-byte record. The value_offset field holds the
/// value itself when `count × size(type) ≤ 4`, and a pointer into the
/// block otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u32,
    /// Value or offset to values
    pub value_offset: u32,
    /// Literal value, resolved only for single-count SHORT/LONG entries
    pub value: Option<u32>,
}

impl DirectoryEntry {
    /// Creates a new directory entry
    ///
    /// Single-count SHORT and LONG entries have their literal value
    /// resolved immediately; array and variable-length payloads (strings,
    /// rationals) are left unresolved.
    pub fn new(tag: u16, field_type: u16, count: u32, value_offset: u32) -> Self {
        let value = match (field_type, count) {
            (field_types::SHORT, 1) => Some(value_offset & 0xFFFF),
            (field_types::LONG, 1) => Some(value_offset),
            _ => None,
        };

        trace!(
            "New directory entry: tag={}, type={}, count={}, offset/value={}",
            tag,
            field_type,
            count,
            value_offset
        );

        Self {
            tag,
            field_type,
            count,
            value_offset,
            value,
        }
    }

    /// Size in bytes of a single value of this entry's field type
    pub fn field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE
            | field_types::ASCII
            | field_types::SBYTE
            | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            _ => 1,
        }
    }

    /// Determines if the value is stored inline in value_offset
    /// rather than at the offset location
    pub fn is_value_inline(&self) -> bool {
        self.field_type_size() * self.count as usize <= 4
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self, defs: &TagDefinitions) -> String {
        format!(
            "Tag: {} ({}), Type: {} ({}), Count: {}, Value/Offset: {}",
            self.tag,
            defs.tag_name(self.tag),
            self.field_type,
            defs.type_name(self.field_type),
            self.count,
            self.value_offset
        )
    }
}

/// Represents the embedded tag directory of a maker block
///
/// Constructed only when the byte order marker and magic number check
/// out; an out-of-range directory offset yields a directory with zero
/// entries, since truncated captures are routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// Byte order declared by the order marker
    pub byte_order: ByteOrder,
    /// Magic number from the header (always 42 once constructed)
    pub magic: u16,
    /// Offset of the entry table within the directory slice
    pub first_offset: u32,
    /// Entry count declared in the block; exceeds entries.len() on
    /// truncated input, None when the table offset was out of range
    pub declared_count: Option<u16>,
    /// Entries in file order
    pub entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// Creates a new directory with no entries
    pub fn new(byte_order: ByteOrder, magic: u16, first_offset: u32) -> Self {
        Self {
            byte_order,
            magic,
            first_offset,
            declared_count: None,
            entries: Vec::new(),
        }
    }

    /// Adds an entry, preserving file order
    pub fn add_entry(&mut self, entry: DirectoryEntry) {
        self.entries.push(entry);
    }

    /// Gets the first entry carrying the given tag, if any
    pub fn get_entry(&self, tag: u16) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Number of entries actually decoded
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defs = TagDefinitions::builtin();

        writeln!(
            f,
            "Directory ({}, table at {})",
            self.byte_order.description(),
            self.first_offset
        )?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        for entry in &self.entries {
            writeln!(f, "    {}", entry.description(defs))?;
        }

        Ok(())
    }
}
