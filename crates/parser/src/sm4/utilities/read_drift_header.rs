use crate::{
    sm4::structs::{DriftOption, RawObject, SpecDriftHeader},
    utilities::reader::Reader,
};

const DRIFT_HEADER_MIN_SIZE: u32 = 16;

/// Non-essential metadata: any malformation yields `None` instead of an
/// error.
pub fn read_drift_header(buffer: &[u8], obj: &RawObject) -> Option<SpecDriftHeader> {
    if obj.size < DRIFT_HEADER_MIN_SIZE {
        return None;
    }

    let region = &buffer[obj.offset as usize..obj.offset as usize + obj.size as usize];
    let mut r = Reader::new(region, "SpecDriftHeader");
    let start_time = r.read_u64_le().ok()?;
    let drift_opt = DriftOption::from_raw(r.read_i16_le().ok()?);
    let nstrings = r.read_u16_le().ok()?;

    let mut strings = Vec::with_capacity(nstrings as usize);
    for _ in 0..nstrings {
        strings.push(r.read_utf16_string()?);
    }

    Some(SpecDriftHeader {
        start_time,
        drift_opt,
        strings,
    })
}
