//! Sub-structure scanner for the maker block
//!
//! Locates fixed-signature fragments (serialized property lists, device
//! identifiers) and opportunistic numeric candidates (ISO, aperture,
//! focal length, timestamps, coordinates) by signature and value-range
//! matching over the whole block. The format is undocumented, so the
//! qualification rules here are tuned against real captures and must be
//! preserved as-is rather than "improved" (notably the zero-byte prefix
//! check on ISO matches). Scanning runs independently of directory-parse
//! success and never fails: zero matches is a normal, common result.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::bytes::Regex;
use serde::Serialize;

use crate::maker::constants::{heuristics, signatures};
use crate::utils::string_utils;

lazy_static! {
    // Canonical uppercase 8-4-4-4-12 dashed hex device identifier
    static ref UUID_PATTERN: Regex = Regex::new(
        r"[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}"
    )
    .expect("UUID pattern compiles");

    // ASCII key token immediately preceding a plist signature
    static ref PLIST_KEY_PATTERN: Regex =
        Regex::new(r"([A-Za-z0-9]+)(?:\x00+|\s+)bplist00").expect("key pattern compiles");

    // Timestamps count seconds from 2001-01-01T00:00:00Z
    static ref REFERENCE_EPOCH: NaiveDateTime = NaiveDate::from_ymd_opt(2001, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
}

/// Kinds of partially identified regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Serialized binary property list
    PropertyList,
    /// Dashed-hex device identifier
    DeviceUuid,
}

/// Located-but-undecoded region of the block
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// What the signature match identified
    pub kind: FragmentKind,
    /// Offset of the signature within the block
    pub offset: usize,
    /// Printable preview for plists, the identifier itself for UUIDs
    pub preview: String,
    /// Best-effort key token found just before a plist signature
    pub key: Option<String>,
    /// Time-related keywords spotted in the forward window
    pub keywords: Vec<String>,
    /// Plausible timestamps found in the forward window, capped at 3
    pub timestamps: Vec<TimestampCandidate>,
}

/// Heuristic timestamp finding near a plist signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampCandidate {
    /// Offset of the 4-byte value within the block
    pub position: usize,
    /// Raw seconds-since-epoch value
    pub timestamp_value: u32,
    /// Decoded moment, formatted `YYYY-MM-DD HH:MM:SS`
    pub date_time: String,
}

/// Heuristic camera-setting finding (ISO, aperture, focal length)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingCandidate<T> {
    /// Matched table value
    pub value: T,
    /// Offset of the match within the block
    pub position: usize,
}

/// Heuristic latitude/longitude pair finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateCandidate {
    /// Offset of the first float within the block
    pub position: usize,
    /// The two decoded values, in file order
    pub values: [f32; 2],
    /// Human-readable restatement of the pair
    pub interpretation: String,
}

/// Everything the scanning stage recovered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Fragments in discovery order: plists first, then UUIDs
    pub fragments: Vec<Fragment>,
    /// ISO matches in table-scan order
    pub iso_candidates: Vec<SettingCandidate<u16>>,
    /// Aperture matches in table-scan order
    pub aperture_candidates: Vec<SettingCandidate<f32>>,
    /// Focal length matches in table-scan order
    pub focal_length_candidates: Vec<SettingCandidate<f32>>,
    /// Coordinate pair matches, earliest offset first, capped at 3
    pub coordinate_candidates: Vec<CoordinateCandidate>,
}

/// Signature and value-range scanner
pub struct StructureScanner;

impl StructureScanner {
    /// Runs every scanning pass over the block
    pub fn scan(data: &[u8]) -> ScanReport {
        let mut report = ScanReport::default();

        Self::scan_property_lists(data, &mut report.fragments);
        Self::scan_device_uuids(data, &mut report.fragments);
        report.iso_candidates = Self::scan_iso_values(data);
        report.aperture_candidates = Self::scan_float_values(data, &heuristics::APERTURE_VALUES);
        report.focal_length_candidates =
            Self::scan_float_values(data, &heuristics::FOCAL_LENGTH_VALUES);
        report.coordinate_candidates = Self::scan_coordinates(data);

        debug!(
            "Scan found {} fragments, {} ISO, {} aperture, {} focal length, {} coordinate candidates",
            report.fragments.len(),
            report.iso_candidates.len(),
            report.aperture_candidates.len(),
            report.focal_length_candidates.len(),
            report.coordinate_candidates.len()
        );

        report
    }

    /// Locates plist signatures and inspects the bytes around each
    fn scan_property_lists(data: &[u8], fragments: &mut Vec<Fragment>) {
        for position in find_signature(data, signatures::BPLIST_MAGIC) {
            let window_end = (position + heuristics::PLIST_SCAN_WINDOW).min(data.len());
            let window = &data[position..window_end];

            let preview_end = heuristics::PREVIEW_WINDOW.min(window.len());
            let preview = string_utils::readable_strings(&window[..preview_end]);

            trace!("Property list signature at {}", position);

            fragments.push(Fragment {
                kind: FragmentKind::PropertyList,
                offset: position,
                preview,
                key: Self::plist_key(data, position),
                keywords: Self::time_keywords(window),
                timestamps: Self::timestamp_candidates(data, position),
            });
        }
    }

    /// Looks back up to 30 bytes for an ASCII key token before a signature
    fn plist_key(data: &[u8], position: usize) -> Option<String> {
        let start = position.saturating_sub(heuristics::KEY_LOOKBACK);
        let end = (position + signatures::BPLIST_MAGIC.len()).min(data.len());

        PLIST_KEY_PATTERN
            .captures(&data[start..end])
            .and_then(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
    }

    /// Collects time-related keywords present in the forward window
    fn time_keywords(window: &[u8]) -> Vec<String> {
        let lowered: Vec<u8> = window.iter().map(|b| b.to_ascii_lowercase()).collect();

        heuristics::TIME_KEYWORDS
            .iter()
            .filter(|keyword| !find_signature(&lowered, keyword.as_bytes()).is_empty())
            .map(|keyword| keyword.to_string())
            .collect()
    }

    /// Scans the forward window for 4-byte values that decode to a
    /// plausible moment, trying big-endian before little-endian at each
    /// offset; capped at 3 candidates in window order
    fn timestamp_candidates(data: &[u8], position: usize) -> Vec<TimestampCandidate> {
        let mut found = Vec::new();
        let end = (position + heuristics::PLIST_SCAN_WINDOW).min(data.len());

        for i in position..end {
            if i + 4 > data.len() {
                break;
            }
            let quad = [data[i], data[i + 1], data[i + 2], data[i + 3]];

            for value in [u32::from_be_bytes(quad), u32::from_le_bytes(quad)] {
                if let Some(date_time) = Self::plausible_timestamp(value) {
                    found.push(TimestampCandidate {
                        position: i,
                        timestamp_value: value,
                        date_time,
                    });
                    if found.len() == heuristics::MAX_CANDIDATES {
                        return found;
                    }
                }
            }
        }

        found
    }

    /// Formats a raw second count if it lands in the plausible year range
    fn plausible_timestamp(value: u32) -> Option<String> {
        if value <= heuristics::TIMESTAMP_RAW_MIN || value >= heuristics::TIMESTAMP_RAW_MAX {
            return None;
        }

        let moment = REFERENCE_EPOCH.checked_add_signed(Duration::seconds(value as i64))?;
        if moment.year() > heuristics::TIMESTAMP_YEAR_MIN
            && moment.year() < heuristics::TIMESTAMP_YEAR_MAX
        {
            Some(moment.format("%Y-%m-%d %H:%M:%S").to_string())
        } else {
            None
        }
    }

    /// Locates dashed-hex device identifiers anywhere in the block
    fn scan_device_uuids(data: &[u8], fragments: &mut Vec<Fragment>) {
        for m in UUID_PATTERN.find_iter(data) {
            trace!("Device identifier at {}", m.start());

            fragments.push(Fragment {
                kind: FragmentKind::DeviceUuid,
                offset: m.start(),
                preview: String::from_utf8_lossy(m.as_bytes()).into_owned(),
                key: None,
                keywords: Vec::new(),
                timestamps: Vec::new(),
            });
        }
    }

    /// Scans for plausible ISO values as 2-byte integers in both byte
    /// orders, requiring a zero byte immediately before the match
    fn scan_iso_values(data: &[u8]) -> Vec<SettingCandidate<u16>> {
        let mut matches = Vec::new();

        for &iso in &heuristics::ISO_VALUES {
            for needle in [iso.to_be_bytes(), iso.to_le_bytes()] {
                for position in find_signature(data, &needle) {
                    // The zero-byte prefix weeds out hits inside larger numbers
                    if position > 0 && data[position - 1] == 0 {
                        matches.push(SettingCandidate {
                            value: iso,
                            position,
                        });
                    }
                }
            }
        }

        matches
    }

    /// Scans for table values as 4-byte floats in both byte orders
    fn scan_float_values(data: &[u8], table: &[f32]) -> Vec<SettingCandidate<f32>> {
        let mut matches = Vec::new();

        for &value in table {
            for needle in [value.to_be_bytes(), value.to_le_bytes()] {
                for position in find_signature(data, &needle) {
                    matches.push(SettingCandidate { value, position });
                }
            }
        }

        matches
    }

    /// Scans consecutive big-endian float pairs for in-range coordinates
    fn scan_coordinates(data: &[u8]) -> Vec<CoordinateCandidate> {
        let mut matches = Vec::new();
        if data.len() < 8 {
            return matches;
        }

        for i in 0..=data.len() - 8 {
            let first = f32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
            let second =
                f32::from_be_bytes([data[i + 4], data[i + 5], data[i + 6], data[i + 7]]);

            if (-90.0..=90.0).contains(&first) && (-180.0..=180.0).contains(&second) {
                matches.push(CoordinateCandidate {
                    position: i,
                    values: [first, second],
                    interpretation: format!("Possible coordinates: {:?}, {:?}", first, second),
                });
                if matches.len() == heuristics::MAX_CANDIDATES {
                    break;
                }
            }
        }

        matches
    }
}

/// Returns every offset at which the needle occurs in the data
fn find_signature(data: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || data.len() < needle.len() {
        return Vec::new();
    }

    data.windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(index, _)| index)
        .collect()
}
