use crate::{
    error::{FileError, Result},
    sm4::structs::{OBJECT_SIZE, ObjectType, RawObject},
    utilities::reader::Reader,
};

/// Read `count` 12-byte `(type, offset, size)` records starting at `pos`.
///
/// The whole table must end strictly before the end of the buffer, and
/// every record must describe a region inside it. Records of type
/// `Undefined` with size 0 are valid empty slots.
pub fn read_objects(
    buffer: &[u8],
    pos: usize,
    count: u32,
    parent: &'static str,
) -> Result<Vec<RawObject>> {
    let table_end = pos as u64 + count as u64 * OBJECT_SIZE as u64;
    if table_end >= buffer.len() as u64 {
        return Err(FileError::TruncatedObjectList { in_object: parent });
    }

    let mut r = Reader::new_at(buffer, pos, parent);
    let mut objects = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let object_type = ObjectType::from_raw(r.read_u32_le()?);
        let offset = r.read_u32_le()?;
        let size = r.read_u32_le()?;
        if offset as u64 + size as u64 > buffer.len() as u64 {
            return Err(FileError::TruncatedObject {
                object: object_type.name(),
            });
        }
        objects.push(RawObject {
            object_type,
            offset,
            size,
        });
    }

    Ok(objects)
}

/// First object of the given type, if any. Soft lookup for optional
/// sub-objects.
pub fn find_object(objects: &[RawObject], object_type: ObjectType) -> Option<&RawObject> {
    objects.iter().find(|o| o.object_type == object_type)
}

/// Like [`find_object`] but for objects a page or file cannot do without.
pub fn require_object<'o>(
    objects: &'o [RawObject],
    object_type: ObjectType,
    parent: &'static str,
) -> Result<&'o RawObject> {
    find_object(objects, object_type).ok_or(FileError::MissingRequiredObject {
        object: object_type.name(),
        parent,
    })
}
