use crate::{
    error::{FileError, Result},
    sm4::structs::RawObject,
};

/// Borrow the raw sample region of a page. The region must hold exactly
/// `x_size * y_size` little-endian `i32` values.
pub fn read_page_data<'a>(
    buffer: &'a [u8],
    obj: &RawObject,
    x_size: u32,
    y_size: u32,
) -> Result<&'a [u8]> {
    let expected = 4 * x_size as u64 * y_size as u64;
    if expected != obj.size as u64 {
        return Err(FileError::SizeMismatch {
            expected,
            actual: obj.size as u64,
        });
    }

    Ok(&buffer[obj.offset as usize..obj.offset as usize + obj.size as usize])
}
