use crate::{
    sm4::structs::{PiezoSensitivity, PiezoStringKind, RawObject},
    utilities::reader::Reader,
};

/// Eight doubles plus a declared string count.
const PIEZO_MIN_SIZE: u32 = 8 * 8 + 2;

/// Observed files declare this object as 68 bytes, just enough for the
/// doubles and the count, even when `string_count` claims strings follow.
/// The loop below then finds no room and leaves the slots empty; whether
/// that is a writer bug or the intended layout is unconfirmed, so the
/// strings are best-effort rather than an error.
pub fn read_piezo_sensitivity(buffer: &[u8], obj: &RawObject) -> Option<PiezoSensitivity> {
    if obj.size < PIEZO_MIN_SIZE {
        return None;
    }

    let region = &buffer[obj.offset as usize..obj.offset as usize + obj.size as usize];
    let mut r = Reader::new(region, "PiezoSensitivity");
    let tube_x = r.read_f64_le().ok()?;
    let tube_y = r.read_f64_le().ok()?;
    let tube_z = r.read_f64_le().ok()?;
    let tube_z_offset = r.read_f64_le().ok()?;
    let scan_x = r.read_f64_le().ok()?;
    let scan_y = r.read_f64_le().ok()?;
    let scan_z = r.read_f64_le().ok()?;
    let actuator = r.read_f64_le().ok()?;
    let string_count = r.read_u32_le().ok()?;

    let mut strings: [Option<String>; PiezoStringKind::COUNT] = Default::default();
    let nstrings = (string_count as usize).min(PiezoStringKind::COUNT);
    for slot in strings.iter_mut().take(nstrings) {
        match r.read_utf16_string() {
            Some(s) => *slot = Some(s),
            None => break,
        }
    }

    Some(PiezoSensitivity {
        tube_x,
        tube_y,
        tube_z,
        tube_z_offset,
        scan_x,
        scan_y,
        scan_z,
        actuator,
        string_count,
        strings,
    })
}
