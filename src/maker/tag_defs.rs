//! EXIF tag name definitions and lookups
//!
//! Tag and field type names are loaded once from an embedded TOML file
//! into an immutable `TagDefinitions` table, which is passed by reference
//! wherever names are resolved. There is no global mutable state.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::maker::errors::{MakerError, MakerResult};

lazy_static! {
    // Parse the TOML definitions at startup
    static ref EXIF_DEFINITIONS: TagDefinitions = {
        let content = include_str!("../../exif_tags.toml");
        TagDefinitions::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse EXIF tag definitions: {}", e);
            TagDefinitions::default()
        })
    };
}

/// Container for EXIF tag and field type name definitions
#[derive(Debug, Default)]
pub struct TagDefinitions {
    /// Maps tag IDs to tag names
    pub tag_names: HashMap<u16, String>,
    /// Maps field type IDs to type names
    pub type_names: HashMap<u16, String>,
}

impl TagDefinitions {
    /// Parse tag definitions from a TOML string
    pub fn from_str(content: &str) -> MakerResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => {
                return Err(MakerError::MalformedInput(format!(
                    "Failed to parse TOML: {}",
                    e
                )))
            }
        };

        let mut defs = TagDefinitions::default();

        if let Some(table) = toml_value.get("tag_ids").and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    defs.tag_names.insert(id, name.to_string());
                }
            }
        }

        if let Some(table) = toml_value.get("field_types").and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    defs.type_names.insert(id, name.to_string());
                }
            }
        }

        Ok(defs)
    }

    /// Returns the built-in definitions parsed from the embedded file
    pub fn builtin() -> &'static TagDefinitions {
        &EXIF_DEFINITIONS
    }

    /// Get the name of an EXIF tag from its ID
    pub fn tag_name(&self, tag: u16) -> String {
        match self.tag_names.get(&tag) {
            Some(name) => name.clone(),
            None => format!("Unknown({:04X})", tag),
        }
    }

    /// Get the name of a TIFF field type from its ID
    pub fn type_name(&self, field_type: u16) -> String {
        match self.type_names.get(&field_type) {
            Some(name) => name.clone(),
            None => format!("Unknown({})", field_type),
        }
    }
}
