use crate::{
    sm4::structs::{RawObject, SpecInfo},
    utilities::reader::Reader,
};

/// On-disk stride of one record; the object's declared size describes a
/// single record, not the whole array.
const SPEC_INFO_SIZE: u32 = 28;

/// Read one 28-byte record per spectrum line. `None` unless the declared
/// size matches the record stride and the whole array fits in the buffer.
pub fn read_spec_info(buffer: &[u8], obj: &RawObject, nspec: u32) -> Option<Vec<SpecInfo>> {
    if obj.size != SPEC_INFO_SIZE {
        return None;
    }
    if obj.offset as u64 + nspec as u64 * SPEC_INFO_SIZE as u64 >= buffer.len() as u64 {
        return None;
    }

    let mut r = Reader::new_at(buffer, obj.offset as usize, "SpecDriftData");
    let mut infos = Vec::with_capacity(nspec as usize);
    for _ in 0..nspec {
        infos.push(SpecInfo {
            ftime: r.read_f32_le().ok()? as f64,
            x_coord: r.read_f32_le().ok()? as f64,
            y_coord: r.read_f32_le().ok()? as f64,
            dx: r.read_f32_le().ok()? as f64,
            dy: r.read_f32_le().ok()? as f64,
            cumulative_dx: r.read_f32_le().ok()? as f64,
            cumulative_dy: r.read_f32_le().ok()? as f64,
        });
    }

    Some(infos)
}
