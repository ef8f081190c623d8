use crate::{error::FileError, utilities::reader::Reader};

#[test]
fn primitive_reads_are_little_endian() {
    let bytes = [
        0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, // u16, u32, i32
        0x00, 0x00, 0x80, 0x3f, // f32 1.0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f, // f64 1.0
    ];
    let mut r = Reader::new(&bytes, "Test");
    assert_eq!(r.read_u16_le().unwrap(), 1);
    assert_eq!(r.read_u32_le().unwrap(), 2);
    assert_eq!(r.read_i32_le().unwrap(), -1);
    assert_eq!(r.read_f32_le().unwrap(), 1.0);
    assert_eq!(r.read_f64_le().unwrap(), 1.0);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn underflow_names_the_object() {
    let mut r = Reader::new(&[0u8; 3], "PageHeader");
    assert_eq!(
        r.read_u32_le(),
        Err(FileError::TruncatedObject {
            object: "PageHeader"
        })
    );
}

#[test]
fn seek_and_skip() {
    let bytes = [0, 1, 2, 3, 4, 5];
    let mut r = Reader::new(&bytes, "Test");
    r.skip(2).unwrap();
    assert_eq!(r.read_u8().unwrap(), 2);
    r.seek(5);
    assert_eq!(r.read_u8().unwrap(), 5);
    assert!(r.skip(1).is_err());
}

#[test]
fn utf16_string_reads_length_prefix() {
    // "Ab" as two UTF-16LE code units.
    let bytes = [0x02, 0x00, 0x41, 0x00, 0x62, 0x00, 0xaa];
    let mut r = Reader::new(&bytes, "StringData");
    assert_eq!(r.read_utf16_string().as_deref(), Some("Ab"));
    assert_eq!(r.pos(), 6);
}

#[test]
fn utf16_string_truncated_leaves_cursor() {
    // Declares 4 characters but only one fits.
    let bytes = [0x04, 0x00, 0x41, 0x00];
    let mut r = Reader::new(&bytes, "StringData");
    assert_eq!(r.read_utf16_string(), None);
    assert_eq!(r.pos(), 0);
}

#[test]
fn utf16_empty_string() {
    let bytes = [0x00, 0x00];
    let mut r = Reader::new(&bytes, "StringData");
    assert_eq!(r.read_utf16_string().as_deref(), Some(""));
}
