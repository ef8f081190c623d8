use crate::utilities::cp437;

#[test]
fn ascii_passes_through() {
    assert_eq!(cp437::decode(b"[Page]\n<0001> A :: B"), "[Page]\n<0001> A :: B");
}

#[test]
fn high_half_maps_through_the_table() {
    assert_eq!(cp437::decode(&[0x80]), "\u{c7}"); // Ç
    assert_eq!(cp437::decode(&[0xe6]), "\u{b5}"); // µ
    assert_eq!(cp437::decode(&[0xf8]), "\u{b0}"); // °
    assert_eq!(cp437::decode(&[0xff]), "\u{a0}");
}

#[test]
fn mixed_text() {
    assert_eq!(cp437::decode(&[b'5', 0xe6, b'm']), "5\u{b5}m");
}
