use crate::{
    error::{FileError, Result},
    sm4::{
        structs::{DataType, GUID_SIZE, ObjectType, PageIndexEntry, RawObject},
        utilities::read_objects::read_objects,
    },
    types::SourceType,
    utilities::reader::Reader,
};

pub const PAGE_INDEX_ENTRY_SIZE: u32 = GUID_SIZE as u32 + 16;

/// Decode one entry of the page-index array. The array object describes
/// the fixed part of a single entry; the caller advances it across the
/// sequence by `size + 12 * object_count` per entry.
pub fn read_page_index(buffer: &[u8], obj: &RawObject) -> Result<PageIndexEntry> {
    if obj.size < PAGE_INDEX_ENTRY_SIZE {
        return Err(FileError::TruncatedObject {
            object: ObjectType::PageIndexArray.name(),
        });
    }

    let mut r = Reader::new_at(buffer, obj.offset as usize, "PageIndexArray");
    let id = r.read_arr::<GUID_SIZE>()?;
    let data_type = DataType::from_raw(r.read_u32_le()?);
    let source = SourceType::from_raw(r.read_u32_le()?);
    let object_count = r.read_u32_le()?;
    let minor_version = r.read_u32_le()?;
    log::debug!(
        "page index entry: data_type {data_type:?}, source {source:?}, \
         object_count {object_count}, minor version {minor_version}"
    );

    let objects = read_objects(buffer, r.pos(), object_count, "PageIndexArray")?;

    Ok(PageIndexEntry {
        id,
        data_type,
        source,
        object_count,
        minor_version,
        objects,
    })
}
