//! Result assembly
//!
//! Pure projections of a `DecodedBlock` into the two stable output
//! schemas: the raw report, which records everything found together with
//! positions, and the clean summary, which commits to one value per
//! semantic field. Selection is the first candidate by ascending offset
//! with ties broken by discovery order; a fixed, reproducible policy
//! rather than a confidence ranking. Absent fields are omitted from the
//! serialized output, never emitted as null, so consumers must treat
//! every field as optional. Identical input bytes always serialize to
//! byte-identical output.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::maker::decoder::DecodedBlock;
use crate::maker::scanner::{
    CoordinateCandidate, Fragment, FragmentKind, SettingCandidate, TimestampCandidate,
};
use crate::maker::tag_defs::TagDefinitions;

/// Report `type` marker for this block format
const BLOCK_TYPE: &str = "Apple iOS MakerNote";

/// Header name reported when the vendor signature is present
const HEADER_NAME: &str = "Apple iOS";

/// Fixed caveat attached to heuristic location output
const LOCATION_NOTE: &str = "Potential location coordinates (latitude, longitude)";

/// Raw decode report: everything found, with positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakerNoteReport {
    #[serde(rename = "type")]
    pub block_type: String,
    pub raw_data_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiff_byte_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiff_structure: Option<DirectoryReport>,
    pub plist_count: usize,
    pub identified_structures: Vec<StructureReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid_position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_uuids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_iso_values: Option<Vec<SettingCandidate<u16>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_aperture_values: Option<Vec<SettingCandidate<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_focal_length_values: Option<Vec<SettingCandidate<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_coordinates: Option<Vec<CoordinateCandidate>>,
}

/// Parsed directory portion of the raw report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryReport {
    /// Order marker as text, "MM" or "II"
    pub header: String,
    pub magic: u16,
    pub ifd_offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_entries: Option<u16>,
    pub entries: Vec<EntryReport>,
}

/// One directory entry with resolved names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    pub tag: u16,
    pub tag_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub count: u32,
    pub value_offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

/// One identified fragment in the raw report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureReport {
    #[serde(rename = "type")]
    pub structure_type: String,
    pub position: usize,
    pub content_preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_data: Option<TimestampData>,
}

/// Timestamp findings attached to a fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<TimestampCandidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// Clean summary: one best value per semantic field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSummary {
    #[serde(rename = "type")]
    pub block_type: String,
    pub metadata: SummaryMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceSummary>,
}

/// Metadata portion of the clean summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiff: Option<TiffSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_lists: Option<Vec<PropertyListSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_settings: Option<CameraSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSummary>,
}

/// Directory summary with resolved tag values only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiffSummary {
    pub byte_order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif_tags: Option<BTreeMap<String, u32>>,
}

/// One property list in the clean summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyListSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Best-guess camera settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CameraSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
}

/// Best-guess location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub coordinates: [f32; 2],
    pub note: String,
}

/// Device identification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub uuid: String,
}

impl MakerNoteReport {
    /// Serializes the report, omitting absent fields
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl CleanSummary {
    /// Serializes the summary, omitting absent fields
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl DecodedBlock {
    /// Builds the raw report from this decode result
    pub fn to_report(&self, defs: &TagDefinitions) -> MakerNoteReport {
        let plists: Vec<&Fragment> = self.plist_fragments();
        let uuids: Vec<&Fragment> = self.uuid_fragments();

        let identified_structures = plists
            .iter()
            .map(|fragment| StructureReport {
                structure_type: "Binary plist".to_string(),
                position: fragment.offset,
                content_preview: fragment.preview.clone(),
                potential_key: fragment.key.clone(),
                timestamp_data: timestamp_data(fragment),
            })
            .collect();

        let additional: Vec<String> = uuids
            .iter()
            .skip(1)
            .map(|fragment| fragment.preview.clone())
            .collect();

        MakerNoteReport {
            block_type: BLOCK_TYPE.to_string(),
            raw_data_length: self.raw_data_length,
            header: self.header_position.map(|_| HEADER_NAME.to_string()),
            header_position: self.header_position,
            tiff_byte_order: self.byte_order.map(|order| order.description().to_string()),
            tiff_structure: self.directory.as_ref().map(|directory| DirectoryReport {
                header: directory.byte_order.marker().to_string(),
                magic: directory.magic,
                ifd_offset: directory.first_offset,
                num_entries: directory.declared_count,
                entries: directory
                    .entries
                    .iter()
                    .map(|entry| EntryReport {
                        tag: entry.tag,
                        tag_name: defs.tag_name(entry.tag),
                        field_type: defs.type_name(entry.field_type),
                        count: entry.count,
                        value_offset: entry.value_offset,
                        value: entry.value,
                    })
                    .collect(),
            }),
            plist_count: plists.len(),
            identified_structures,
            device_uuid: uuids.first().map(|fragment| fragment.preview.clone()),
            uuid_position: uuids.first().map(|fragment| fragment.offset),
            additional_uuids: if additional.is_empty() {
                None
            } else {
                Some(additional)
            },
            potential_iso_values: non_empty(&self.scan.iso_candidates),
            potential_aperture_values: non_empty(&self.scan.aperture_candidates),
            potential_focal_length_values: non_empty(&self.scan.focal_length_candidates),
            potential_coordinates: non_empty(&self.scan.coordinate_candidates),
        }
    }

    /// Derives the clean summary from this decode result
    pub fn clean_summary(&self, defs: &TagDefinitions) -> CleanSummary {
        let mut metadata = SummaryMetadata::default();

        if let Some(directory) = &self.directory {
            let mut exif_tags = BTreeMap::new();
            for entry in &directory.entries {
                if let Some(value) = entry.value {
                    exif_tags.insert(defs.tag_name(entry.tag), value);
                }
            }

            metadata.tiff = Some(TiffSummary {
                byte_order: directory.byte_order.description().to_string(),
                exif_tags: if exif_tags.is_empty() {
                    None
                } else {
                    Some(exif_tags)
                },
            });
        }

        let plists: Vec<PropertyListSummary> = self
            .plist_fragments()
            .iter()
            .filter_map(|fragment| {
                let summary = PropertyListSummary {
                    key: fragment.key.clone(),
                    content: if fragment.preview.is_empty() {
                        None
                    } else {
                        Some(fragment.preview.clone())
                    },
                    // Candidates arrive in ascending window order, so the
                    // first one is the earliest-offset pick.
                    timestamp: fragment
                        .timestamps
                        .first()
                        .map(|candidate| candidate.date_time.clone()),
                };
                if summary == PropertyListSummary::default() {
                    None
                } else {
                    Some(summary)
                }
            })
            .collect();
        if !plists.is_empty() {
            metadata.property_lists = Some(plists);
        }

        let settings = CameraSettings {
            iso: earliest(&self.scan.iso_candidates).map(|candidate| candidate.value),
            // {:?} keeps the trailing .0 on whole-numbered table values
            aperture: earliest(&self.scan.aperture_candidates)
                .map(|candidate| format!("f/{:?}", candidate.value)),
            focal_length: earliest(&self.scan.focal_length_candidates)
                .map(|candidate| format!("{:?}mm", candidate.value)),
        };
        if settings != CameraSettings::default() {
            metadata.camera_settings = Some(settings);
        }

        if let Some(coordinate) = self.scan.coordinate_candidates.first() {
            metadata.location = Some(LocationSummary {
                coordinates: coordinate.values,
                note: LOCATION_NOTE.to_string(),
            });
        }

        CleanSummary {
            block_type: BLOCK_TYPE.to_string(),
            metadata,
            device: self.uuid_fragments().first().map(|fragment| DeviceSummary {
                uuid: fragment.preview.clone(),
            }),
        }
    }

    fn plist_fragments(&self) -> Vec<&Fragment> {
        self.scan
            .fragments
            .iter()
            .filter(|fragment| fragment.kind == FragmentKind::PropertyList)
            .collect()
    }

    fn uuid_fragments(&self) -> Vec<&Fragment> {
        self.scan
            .fragments
            .iter()
            .filter(|fragment| fragment.kind == FragmentKind::DeviceUuid)
            .collect()
    }
}

/// Builds the optional timestamp_data block for a fragment
fn timestamp_data(fragment: &Fragment) -> Option<TimestampData> {
    if fragment.timestamps.is_empty() && fragment.keywords.is_empty() {
        return None;
    }

    Some(TimestampData {
        candidates: if fragment.timestamps.is_empty() {
            None
        } else {
            Some(fragment.timestamps.clone())
        },
        keywords: if fragment.keywords.is_empty() {
            None
        } else {
            Some(fragment.keywords.clone())
        },
    })
}

/// Clones a candidate list, mapping empty to absent
fn non_empty<T: Clone>(candidates: &[T]) -> Option<Vec<T>> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates.to_vec())
    }
}

/// First candidate by ascending offset, ties broken by discovery order
fn earliest<T>(candidates: &[SettingCandidate<T>]) -> Option<&SettingCandidate<T>> {
    candidates.iter().min_by_key(|candidate| candidate.position)
}
