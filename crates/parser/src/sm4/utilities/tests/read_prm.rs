use miniz_oxide::deflate::compress_to_vec_zlib;

use super::put_u32;
use crate::{
    error::FileError,
    sm4::{
        structs::{ObjectType, RawObject},
        utilities::read_prm::{parse_prm_text, read_prm},
    },
};

#[test]
fn data_line_under_plain_section() {
    let meta = parse_prm_text("[Sect]\n<0001> Foo :: Bar\n");
    assert_eq!(meta.len(), 1);
    assert_eq!(meta["Sect::Foo"], "Bar");
}

#[test]
fn nested_sections_flatten_with_double_colons() {
    let text = "\
****[Hardware]****\n\
[Piezo]\n\
   ---- Drive ----\n\
<0001> Gain :: 12\n\
[Scan]\n\
<0002> Speed :: 1.5 um/s\n";
    let meta = parse_prm_text(text);
    assert_eq!(meta["Hardware::Piezo::Drive::Gain"], "12");
    // A new plain section resets the sub-sub-section.
    assert_eq!(meta["Hardware::Scan::Speed"], "1.5 um/s");
    assert_eq!(meta.len(), 2);
}

#[test]
fn starred_section_resets_everything_below() {
    let text = "\
****[One]****\n\
[Sub]\n\
****[Two]****\n\
<0001> K :: v\n";
    let meta = parse_prm_text(text);
    assert_eq!(meta["Two::K"], "v");
}

#[test]
fn values_are_trimmed_and_may_be_empty() {
    let meta = parse_prm_text("[S]\n<0001> Key ::   padded  \n<0002> Empty ::\n");
    assert_eq!(meta["S::Key"], "padded");
    assert_eq!(meta["S::Empty"], "");
}

#[test]
fn data_before_any_section_is_dropped() {
    let meta = parse_prm_text("<0001> Foo :: Bar\n[S]\n<0002> Baz :: Qux\n");
    assert_eq!(meta.len(), 1);
    assert_eq!(meta["S::Baz"], "Qux");
}

#[test]
fn unmatched_lines_are_skipped() {
    let meta = parse_prm_text("[S]\ngarbage line\n<12> short tag :: x\n<0001> Ok :: yes\n");
    assert_eq!(meta.len(), 1);
    assert_eq!(meta["S::Ok"], "yes");
}

#[test]
fn starred_subsub_headers_are_discarded() {
    let text = "\
****[Top]****\n\
[Sub]\n\
  --*deleted*--\n\
<0001> K :: v\n";
    let meta = parse_prm_text(text);
    assert_eq!(meta["Top::Sub::K"], "v");
}

fn prm_objects(compressed: u32, decompressed_size: u32, payload: &[u8]) -> (Vec<u8>, RawObject, RawObject) {
    let mut buf = Vec::new();
    put_u32(&mut buf, compressed);
    put_u32(&mut buf, decompressed_size);
    put_u32(&mut buf, payload.len() as u32);
    let header = RawObject {
        object_type: ObjectType::PrmHeader,
        offset: 0,
        size: 12,
    };
    let data = RawObject {
        object_type: ObjectType::Prm,
        offset: 12,
        size: payload.len() as u32,
    };
    buf.extend_from_slice(payload);
    (buf, header, data)
}

#[test]
fn uncompressed_prm_block() {
    let text = b"[Sect]\n<0001> Foo :: Bar\n";
    let (buf, header, data) = prm_objects(0, text.len() as u32, text);

    let meta = read_prm(&buf, &header, &data).unwrap().unwrap();
    assert_eq!(meta["Sect::Foo"], "Bar");
}

#[test]
fn compressed_prm_block_inflates_to_the_declared_size() {
    let text = b"[Sect]\n<0001> Foo :: Bar\n<0002> Temp :: 300 K\n";
    let packed = compress_to_vec_zlib(text, 6);
    let (buf, header, data) = prm_objects(1, text.len() as u32, &packed);

    let meta = read_prm(&buf, &header, &data).unwrap().unwrap();
    assert_eq!(meta["Sect::Foo"], "Bar");
    assert_eq!(meta["Sect::Temp"], "300 K");
}

#[test]
fn broken_zlib_stream_is_a_decompression_error() {
    let garbage = [0x9c, 0x78, 0x00, 0x01, 0x02, 0x03];
    let (buf, header, data) = prm_objects(1, 100, &garbage);

    assert!(matches!(
        read_prm(&buf, &header, &data),
        Err(FileError::DecompressionFailed(_))
    ));
}

#[test]
fn size_disagreements_degrade_to_none() {
    // Uncompressed, but the data object is not decompressed_size long.
    let text = b"[S]\n<0001> A :: b\n";
    let (buf, header, data) = prm_objects(0, text.len() as u32 + 5, text);
    assert_eq!(read_prm(&buf, &header, &data).unwrap(), None);

    // A PRM header of the wrong size is ignored outright.
    let (buf, mut header, data) = prm_objects(0, text.len() as u32, text);
    header.size = 16;
    assert_eq!(read_prm(&buf, &header, &data).unwrap(), None);
}

#[test]
fn cp437_payload_decodes_before_parsing() {
    // 0xe6 is µ in CP437.
    let mut text = b"[S]\n<0001> Range :: 5".to_vec();
    text.push(0xe6);
    text.extend_from_slice(b"m\n");
    let (buf, header, data) = prm_objects(0, text.len() as u32, &text);

    let meta = read_prm(&buf, &header, &data).unwrap().unwrap();
    assert_eq!(meta["S::Range"], "5\u{b5}m");
}
