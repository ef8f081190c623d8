use crate::{
    error::{FileError, Result},
    sm4::{
        structs::{ObjectType, PageIndexHeader, RawObject},
        utilities::read_objects::read_objects,
    },
    utilities::reader::Reader,
};

pub const PAGE_INDEX_HEADER_SIZE: u32 = 16;

pub fn read_page_index_header(buffer: &[u8], obj: &RawObject) -> Result<PageIndexHeader> {
    if obj.size < PAGE_INDEX_HEADER_SIZE {
        return Err(FileError::TruncatedObject {
            object: ObjectType::PageIndexHeader.name(),
        });
    }

    let mut r = Reader::new_at(buffer, obj.offset as usize, "PageIndexHeader");
    let page_count = r.read_u32_le()?;
    let object_count = r.read_u32_le()?;
    log::debug!("page index header: page_count {page_count}, object_count {object_count}");
    let reserved1 = r.read_u32_le()?;
    let reserved2 = r.read_u32_le()?;

    let objects = read_objects(buffer, r.pos(), object_count, "PageIndexHeader")?;

    Ok(PageIndexHeader {
        page_count,
        object_count,
        reserved1,
        reserved2,
        objects,
    })
}
