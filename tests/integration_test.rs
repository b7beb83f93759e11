//! Integration tests for the maker module

extern crate std;

use regex::Regex;

use makerkit::maker::decoder::decode;
use makerkit::maker::tag_defs::TagDefinitions;
use makerkit::ByteOrder;

/// Builds a complete maker block in memory: vendor signature,
/// big-endian directory, plist fragment with a timestamp, device UUID
fn sample_block() -> Vec<u8> {
    let mut buffer = Vec::new();

    buffer.extend_from_slice(b"Apple iOS\x00\x00");

    // Directory header (big-endian)
    buffer.extend_from_slice(&[0x4D, 0x4D]); // "MM"
    buffer.extend_from_slice(&[0x00, 0x2A]); // magic number
    buffer.extend_from_slice(&[0, 0, 0, 8]); // offset to entry table

    buffer.extend_from_slice(&[0, 2]); // number of entries

    // Entry 1: Orientation (tag 274)
    buffer.extend_from_slice(&[0x01, 0x12]); // Tag
    buffer.extend_from_slice(&[0x00, 0x03]); // Type (SHORT)
    buffer.extend_from_slice(&[0, 0, 0, 1]); // Count
    buffer.extend_from_slice(&[0, 0, 0, 6]); // Value (rotated 90 CW)

    // Entry 2: PixelXDimension (tag 40962)
    buffer.extend_from_slice(&[0xA0, 0x02]); // Tag
    buffer.extend_from_slice(&[0x00, 0x04]); // Type (LONG)
    buffer.extend_from_slice(&[0, 0, 0, 1]); // Count
    buffer.extend_from_slice(&[0, 0, 0x0F, 0xC0]); // Value (4032)

    // Keyed plist fragment with an embedded 2001-epoch timestamp
    buffer.extend_from_slice(b"runtime\x00");
    buffer.extend_from_slice(b"bplist00");
    buffer.extend_from_slice(&600_000_000u32.to_be_bytes());
    buffer.extend_from_slice(&[0u8; 16]);

    buffer.extend_from_slice(b"2ADD3835-BCFD-4C9A-B471-29819AF606CF");
    buffer
}

#[test]
fn test_complete_decode_workflow() {
    let _ = env_logger::builder().is_test(true).try_init();

    let block = sample_block();
    let decoded = decode(&block);

    std::assert_eq!(decoded.raw_data_length, block.len());
    std::assert_eq!(decoded.header_position, Some(0));
    std::assert_eq!(decoded.byte_order, Some(ByteOrder::BigEndian));

    let directory = decoded.directory.as_ref().unwrap();
    std::assert_eq!(directory.entry_count(), 2);
    std::assert_eq!(directory.entries[0].tag, 274);
    std::assert_eq!(directory.entries[0].value, Some(6));
    std::assert_eq!(directory.entries[1].tag, 40962);
    std::assert_eq!(directory.entries[1].value, Some(4032));

    let defs = TagDefinitions::builtin();
    let report = decoded.to_report(defs);

    std::assert_eq!(
        report.tiff_byte_order.as_deref(),
        Some("big-endian (Motorola)")
    );
    std::assert_eq!(report.plist_count, 1);
    std::assert_eq!(
        report.identified_structures[0].potential_key.as_deref(),
        Some("runtime")
    );
    std::assert_eq!(
        report.device_uuid.as_deref(),
        Some("2ADD3835-BCFD-4C9A-B471-29819AF606CF")
    );

    // The embedded 2001-epoch value decodes among the candidates
    let candidates = report.identified_structures[0]
        .timestamp_data
        .as_ref()
        .and_then(|data| data.candidates.as_ref())
        .unwrap();
    std::assert!(candidates
        .iter()
        .any(|candidate| candidate.timestamp_value == 600_000_000
            && candidate.date_time == "2020-01-06 10:40:00"));
}

#[test]
fn test_clean_summary_output() {
    let block = sample_block();
    let defs = TagDefinitions::builtin();
    let summary = decode(&block).clean_summary(defs);

    std::assert_eq!(summary.block_type, "Apple iOS MakerNote");

    let tiff = summary.metadata.tiff.as_ref().unwrap();
    std::assert_eq!(tiff.byte_order, "big-endian (Motorola)");
    let exif_tags = tiff.exif_tags.as_ref().unwrap();
    std::assert_eq!(exif_tags.get("Orientation"), Some(&6));
    std::assert_eq!(exif_tags.get("PixelXDimension"), Some(&4032));

    // Every decoded timestamp follows one rendering format
    let plists = summary.metadata.property_lists.as_ref().unwrap();
    let timestamp = plists[0].timestamp.as_deref().unwrap();
    let format = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
    std::assert!(format.is_match(timestamp));

    std::assert_eq!(
        summary.device.as_ref().unwrap().uuid,
        "2ADD3835-BCFD-4C9A-B471-29819AF606CF"
    );
}

#[test]
fn test_escaped_capture_matches_raw_bytes() {
    let block = sample_block();

    // The same block captured as an escaped textual dump
    let mut escaped = String::from("b\"");
    for byte in &block {
        escaped.push_str(&format!("\\x{:02x}", byte));
    }
    escaped.push('"');

    let from_raw = decode(&block);
    let from_escaped = decode(escaped.as_bytes());

    std::assert_eq!(from_raw, from_escaped);
}

#[test]
fn test_output_is_stable_across_runs() {
    let block = sample_block();
    let defs = TagDefinitions::builtin();

    let first = decode(&block);
    let second = decode(&block);

    std::assert_eq!(
        first.to_report(defs).to_json().unwrap(),
        second.to_report(defs).to_json().unwrap()
    );
    std::assert_eq!(
        first.clean_summary(defs).to_json().unwrap(),
        second.clean_summary(defs).to_json().unwrap()
    );
}
