mod read_prm;

pub(crate) fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_f64(out: &mut Vec<u8>, v: f64) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Append a UTF-16LE string with its character-count prefix.
pub(crate) fn put_utf16(out: &mut Vec<u8>, s: &str) {
    let units: Vec<u16> = s.encode_utf16().collect();
    put_u16(out, units.len() as u16);
    for u in units {
        put_u16(out, u);
    }
}

/// Append one 12-byte object record.
pub(crate) fn put_object(out: &mut Vec<u8>, object_type: u32, offset: u32, size: u32) {
    put_u32(out, object_type);
    put_u32(out, offset);
    put_u32(out, size);
}
