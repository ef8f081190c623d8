use crate::{
    sm4::structs::RawObject,
    types::{PageStrings, StringKind},
    utilities::reader::Reader,
};

/// Read up to the known number of string slots from a StringData object.
///
/// Returns the slots filled so far and whether all requested strings were
/// read; a string running past the object end stops the scan but keeps
/// what was already decoded.
pub fn read_string_data(buffer: &[u8], obj: &RawObject, count: u16) -> (PageStrings, bool) {
    let region = &buffer[obj.offset as usize..obj.offset as usize + obj.size as usize];
    let mut r = Reader::new(region, "StringData");

    let mut strings = PageStrings::default();
    let count = (count as usize).min(StringKind::COUNT);
    for i in 0..count {
        match r.read_utf16_string() {
            Some(s) => strings.set(i, s),
            None => return (strings, false),
        }
    }

    (strings, true)
}
