//! Tests for the sub-structure scanner

extern crate std;

use crate::maker::scanner::{FragmentKind, StructureScanner};

#[test]
fn test_iso_match_requires_zero_prefix() {
    // 100 as a big-endian u16 preceded by a zero byte
    let qualified = [0x00u8, 0x00, 0x64];
    let report = StructureScanner::scan(&qualified);

    std::assert_eq!(report.iso_candidates.len(), 1);
    std::assert_eq!(report.iso_candidates[0].value, 100);
    std::assert_eq!(report.iso_candidates[0].position, 1);

    // The identical bytes without the zero prefix are not reported
    let unqualified = [0x12u8, 0x00, 0x64];
    let report = StructureScanner::scan(&unqualified);

    std::assert!(report.iso_candidates.is_empty());
}

#[test]
fn test_iso_matches_both_byte_orders() {
    // 800 little-endian (0x20, 0x03) with a zero prefix
    let data = [0x00u8, 0x20, 0x03];
    let report = StructureScanner::scan(&data);

    std::assert_eq!(report.iso_candidates.len(), 1);
    std::assert_eq!(report.iso_candidates[0].value, 800);
}

#[test]
fn test_aperture_float_is_found() {
    let mut data = vec![0xAAu8; 3];
    data.extend_from_slice(&2.8f32.to_be_bytes());
    let report = StructureScanner::scan(&data);

    std::assert_eq!(report.aperture_candidates.len(), 1);
    std::assert_eq!(report.aperture_candidates[0].value, 2.8);
    std::assert_eq!(report.aperture_candidates[0].position, 3);
}

#[test]
fn test_focal_length_float_is_found_little_endian() {
    let mut data = vec![0xAAu8; 2];
    data.extend_from_slice(&4.0f32.to_le_bytes());
    let report = StructureScanner::scan(&data);

    std::assert!(report
        .focal_length_candidates
        .iter()
        .any(|candidate| candidate.value == 4.0 && candidate.position == 2));
}

#[test]
fn test_uuid_is_extracted_exactly() {
    let mut data = vec![0x07u8, 0x80, 0xFF];
    data.extend_from_slice(b"2ADD3835-BCFD-4C9A-B471-29819AF606CF");
    data.extend_from_slice(&[0x00, 0x13]);

    let report = StructureScanner::scan(&data);
    let uuids: Vec<_> = report
        .fragments
        .iter()
        .filter(|fragment| fragment.kind == FragmentKind::DeviceUuid)
        .collect();

    std::assert_eq!(uuids.len(), 1);
    std::assert_eq!(uuids[0].preview, "2ADD3835-BCFD-4C9A-B471-29819AF606CF");
    std::assert_eq!(uuids[0].offset, 3);
}

#[test]
fn test_coordinate_pair_in_range() {
    let mut data = Vec::new();
    data.extend_from_slice(&45.0f32.to_be_bytes());
    data.extend_from_slice(&(-93.0f32).to_be_bytes());

    let report = StructureScanner::scan(&data);

    std::assert!(!report.coordinate_candidates.is_empty());
    std::assert_eq!(report.coordinate_candidates[0].position, 0);
    std::assert_eq!(report.coordinate_candidates[0].values, [45.0, -93.0]);
    std::assert_eq!(
        report.coordinate_candidates[0].interpretation,
        "Possible coordinates: 45.0, -93.0"
    );
}

#[test]
fn test_coordinate_pair_out_of_range() {
    // Latitude 200 is impossible, so the pair does not qualify
    let mut data = Vec::new();
    data.extend_from_slice(&200.0f32.to_be_bytes());
    data.extend_from_slice(&10.0f32.to_be_bytes());

    let report = StructureScanner::scan(&data);

    std::assert!(report.coordinate_candidates.is_empty());
}

#[test]
fn test_coordinate_candidates_are_capped() {
    // All-zero bytes qualify at every offset; the list stays capped
    let data = vec![0u8; 64];
    let report = StructureScanner::scan(&data);

    std::assert_eq!(report.coordinate_candidates.len(), 3);
    std::assert_eq!(report.coordinate_candidates[0].position, 0);
    std::assert_eq!(report.coordinate_candidates[1].position, 1);
    std::assert_eq!(report.coordinate_candidates[2].position, 2);
}

#[test]
fn test_plist_fragment_with_key_and_timestamp() {
    let mut data = Vec::new();
    data.extend_from_slice(b"runtime\x00");
    data.extend_from_slice(b"bplist00");
    data.extend_from_slice(&600_000_000u32.to_be_bytes());
    data.extend_from_slice(&[0u8; 4]);

    let report = StructureScanner::scan(&data);
    let plists: Vec<_> = report
        .fragments
        .iter()
        .filter(|fragment| fragment.kind == FragmentKind::PropertyList)
        .collect();

    std::assert_eq!(plists.len(), 1);
    std::assert_eq!(plists[0].offset, 8);
    std::assert_eq!(plists[0].key.as_deref(), Some("runtime"));
    std::assert!(plists[0].preview.contains("bplist00"));

    // 600000000 seconds from the 2001 reference epoch
    let decoded = plists[0]
        .timestamps
        .iter()
        .find(|candidate| candidate.timestamp_value == 600_000_000)
        .expect("timestamp candidate present");
    std::assert_eq!(decoded.date_time, "2020-01-06 10:40:00");
}

#[test]
fn test_plist_time_keywords() {
    let mut data = Vec::new();
    data.extend_from_slice(b"bplist00");
    data.extend_from_slice(b"UflagsUvalueYtimescaleUepoch");

    let report = StructureScanner::scan(&data);

    std::assert_eq!(report.fragments.len(), 1);
    let keywords = &report.fragments[0].keywords;
    std::assert!(keywords.contains(&"time".to_string()));
    std::assert!(keywords.contains(&"epoch".to_string()));
    std::assert!(keywords.contains(&"scale".to_string()));
    std::assert!(!keywords.contains(&"date".to_string()));
}

#[test]
fn test_empty_input_scans_clean() {
    let report = StructureScanner::scan(&[]);

    std::assert!(report.fragments.is_empty());
    std::assert!(report.iso_candidates.is_empty());
    std::assert!(report.aperture_candidates.is_empty());
    std::assert!(report.focal_length_candidates.is_empty());
    std::assert!(report.coordinate_candidates.is_empty());
}
