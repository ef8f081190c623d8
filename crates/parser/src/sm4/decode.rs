use log::warn;

use crate::{
    error::{FileError, Result},
    sm4::{
        structs::{
            DataType, FileHeader, OBJECT_SIZE, ObjectType, Page, PageIndexEntry, RawObject,
            Sm4File,
        },
        utilities::{
            read_drift_header::read_drift_header,
            read_objects::{find_object, read_objects, require_object},
            read_page_data::read_page_data,
            read_page_header::read_page_header,
            read_page_index::read_page_index,
            read_page_index_header::read_page_index_header,
            read_piezo_sensitivity::read_piezo_sensitivity,
            read_prm::read_prm,
            read_spec_info::read_spec_info,
            read_string_data::read_string_data,
        },
    },
    types::{MetadataMap, PageStrings},
    utilities::reader::Reader,
};

pub const MAGIC_OFFSET: usize = 2;
/// `STiMage 005.` in UTF-16LE; the build info that follows is not checked.
pub const MAGIC: [u8; 24] = [
    0x53, 0x00, 0x54, 0x00, 0x69, 0x00, 0x4d, 0x00, 0x61, 0x00, 0x67, 0x00, //
    0x65, 0x00, 0x20, 0x00, 0x30, 0x00, 0x30, 0x00, 0x35, 0x00, 0x2e, 0x00,
];
pub const MAGIC_TOTAL_SIZE: usize = 36;
pub const HEADER_SIZE: usize = MAGIC_OFFSET + MAGIC_TOTAL_SIZE + 5 * 4;

/// Quick magic sniff over the head of a file.
pub fn detect(head: &[u8]) -> bool {
    head.len() > MAGIC_TOTAL_SIZE && head[MAGIC_OFFSET..MAGIC_OFFSET + MAGIC.len()] == MAGIC
}

/// Decode an SM4 container from an in-memory buffer.
///
/// Failures in the file header or page index header abort the load. A page
/// whose header or data cannot be decoded is skipped; the call fails with
/// `NoData` only when no page survives.
pub fn parse_sm4(buffer: &[u8]) -> Result<Sm4File<'_>> {
    if buffer.len() < HEADER_SIZE {
        return Err(FileError::TooShort);
    }
    if buffer[MAGIC_OFFSET..MAGIC_OFFSET + MAGIC.len()] != MAGIC {
        return Err(FileError::FileTypeMismatch);
    }

    let file_header = read_file_header(buffer)?;

    let obj = require_object(
        &file_header.objects,
        ObjectType::PageIndexHeader,
        "FileHeader",
    )?;
    let index_header = read_page_index_header(buffer, obj)?;

    // A single object in the index header's list covers a page_count-long
    // sequence of page-index entries.
    let array_obj = require_object(
        &index_header.objects,
        ObjectType::PageIndexArray,
        "PageIndexHeader",
    )?;

    // The declared count is untrusted; entries grow as they actually parse.
    let mut entries = Vec::with_capacity(index_header.page_count.min(1024) as usize);
    let mut cursor = *array_obj;
    for i in 0..index_header.page_count {
        match read_page_index(buffer, &cursor) {
            Ok(entry) => {
                let advance = cursor.size as u64 + OBJECT_SIZE as u64 * entry.object_count as u64;
                entries.push(entry);
                match (cursor.offset as u64).checked_add(advance) {
                    Some(next) if next <= u32::MAX as u64 => cursor.offset = next as u32,
                    _ => {
                        warn!("page index entry {i} advances past the addressable range");
                        break;
                    }
                }
            }
            // The entries are chained, so nothing after a bad one can be
            // located. Losing the very first means losing everything.
            Err(e) if i == 0 => return Err(e),
            Err(e) => {
                warn!("stopping page index scan at entry {i}: {e}");
                break;
            }
        }
    }

    let prm = read_prm_metadata(buffer, &file_header.objects);

    let mut pages = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match read_page(buffer, entry, i) {
            Ok(page) => pages.push(page),
            Err(e) => warn!("skipping page {i}: {e}"),
        }
    }

    if pages.is_empty() {
        return Err(FileError::NoData);
    }

    Ok(Sm4File {
        page_count: index_header.page_count,
        pages,
        prm,
    })
}

fn read_file_header(buffer: &[u8]) -> Result<FileHeader> {
    let mut r = Reader::new_at(buffer, MAGIC_OFFSET + MAGIC_TOTAL_SIZE, "FileHeader");
    let page_count = r.read_u32_le()?;
    let object_count = r.read_u32_le()?;
    let object_field_size = r.read_u32_le()?;
    log::debug!(
        "file header: page_count {page_count}, object_count {object_count}, \
         object_field_size {object_field_size}"
    );
    if object_field_size != OBJECT_SIZE {
        warn!("object field size {object_field_size} differs from {OBJECT_SIZE}");
    }
    let reserved1 = r.read_u32_le()?;
    let reserved2 = r.read_u32_le()?;

    let objects = read_objects(buffer, r.pos(), object_count, "FileHeader")?;

    Ok(FileHeader {
        page_count,
        object_count,
        object_field_size,
        reserved1,
        reserved2,
        objects,
    })
}

fn read_prm_metadata(buffer: &[u8], objects: &[RawObject]) -> Option<MetadataMap> {
    let header_obj = find_object(objects, ObjectType::PrmHeader)?;
    let data_obj = find_object(objects, ObjectType::Prm)?;
    match read_prm(buffer, header_obj, data_obj) {
        Ok(prm) => prm,
        Err(e) => {
            warn!("ignoring unreadable PRM metadata: {e}");
            None
        }
    }
}

fn read_page<'a>(buffer: &'a [u8], entry: &PageIndexEntry, index: usize) -> Result<Page<'a>> {
    // Header and data are the two objects a page cannot do without.
    let obj = require_object(&entry.objects, ObjectType::PageHeader, "PageIndex")?;
    let header = read_page_header(buffer, obj, entry.data_type)?;

    let obj = require_object(&entry.objects, ObjectType::PageData, "PageIndex")?;
    let data = read_page_data(buffer, obj, header.x_size, header.y_size)?;

    let mut strings = PageStrings::default();
    match find_object(&header.objects, ObjectType::StringData) {
        Some(obj) => {
            let (decoded, complete) = read_string_data(buffer, obj, header.string_count);
            strings = decoded;
            if !complete {
                warn!("failed to read string data in page {index}");
            }
        }
        None => warn!("failed to read string data in page {index}"),
    }

    let piezo_sensitivity = find_object(&header.objects, ObjectType::PiezoSensitivity)
        .and_then(|obj| read_piezo_sensitivity(buffer, obj));

    let mut drift_header = None;
    let mut spec_info = Vec::new();
    if entry.data_type == DataType::Line {
        drift_header = find_object(&header.objects, ObjectType::SpecDriftHeader)
            .and_then(|obj| read_drift_header(buffer, obj));
        spec_info = find_object(&header.objects, ObjectType::SpecDriftData)
            .and_then(|obj| read_spec_info(buffer, obj, header.y_size))
            .unwrap_or_default();
    }

    Ok(Page {
        id: entry.id,
        data_type: entry.data_type,
        source: entry.source,
        minor_version: entry.minor_version,
        header,
        data,
        strings,
        drift_header,
        spec_info,
        piezo_sensitivity,
    })
}
