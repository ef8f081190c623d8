use log::warn;

use crate::{
    error::{FileError, Result},
    sm4::{
        structs::{DataType, ObjectType, PageHeader, RawObject},
        utilities::read_objects::read_objects,
    },
    types::{ImageType, LineType, PageType, ScanDirection},
    utilities::reader::Reader,
};

pub const PAGE_HEADER_SIZE: u32 = 170;
/// Bytes consumed by the fields enumerated below; `field_size` covers
/// these plus reserved trailing words we never interpret.
const PAGE_HEADER_FIXED: u32 = 116;

const DIMENSION_CEILING: u32 = 1 << 16;

/// Decode the fixed page header and its nested object table.
///
/// `field_size` is self-describing: the object table always starts at
/// `offset + field_size`, so writers may append fields without breaking
/// older readers.
pub fn read_page_header(
    buffer: &[u8],
    obj: &RawObject,
    data_type: DataType,
) -> Result<PageHeader> {
    if obj.size < PAGE_HEADER_SIZE {
        return Err(truncated());
    }

    let mut r = Reader::new_at(buffer, obj.offset as usize, "PageHeader");
    let field_size = r.read_u16_le()?;
    if (obj.size < field_size as u32) || ((field_size as u32) < PAGE_HEADER_FIXED) {
        return Err(truncated());
    }

    let string_count = r.read_u16_le()?;
    let page_type = PageType::from_raw(r.read_u32_le()?);
    let data_sub_source = r.read_u32_le()?;
    let line_type = LineType::from_raw(r.read_u32_le()?);
    let x_coord = r.read_i32_le()?;
    let y_coord = r.read_i32_le()?;
    let x_size = r.read_u32_le()?;
    let y_size = r.read_u32_le()?;
    log::debug!("page header: x_size {x_size}, y_size {y_size}, page_type {page_type:?}");

    // Non-image data can have y_size = 1 and a huge x_size, so the sanity
    // ceiling applies to images only; the product guard applies to all.
    if data_type == DataType::Image {
        for dim in [x_size, y_size] {
            if dim < 1 || dim > DIMENSION_CEILING {
                return Err(FileError::InvalidDimension { dim });
            }
        }
    }
    if y_size != 0 && x_size > 0x8000_0000u32 / y_size {
        return Err(FileError::InvalidDimension {
            dim: x_size.max(y_size),
        });
    }

    let image_type = ImageType::from_raw(r.read_u32_le()?);
    let scan_dir = ScanDirection::from_raw(r.read_u32_le()?);
    let group_id = r.read_u32_le()?;
    let data_size = r.read_u32_le()?;
    let min_z_value = r.read_i32_le()?;
    let max_z_value = r.read_i32_le()?;

    let mut x_scale = r.read_f32_le()? as f64;
    let mut y_scale = r.read_f32_le()? as f64;
    let z_scale = r.read_f32_le()? as f64;
    // Must not take absolute values here, spectra may have valid negative
    // scales.
    if x_scale == 0.0 {
        warn!("real x scale is 0.0, fixing to 1.0");
        x_scale = 1.0;
    }
    if y_scale == 0.0 {
        if data_type == DataType::Image {
            warn!("real y scale is 0.0, fixing to 1.0");
        }
        y_scale = 1.0;
    }
    let xy_scale = r.read_f32_le()? as f64;
    let x_offset = r.read_f32_le()? as f64;
    let y_offset = r.read_f32_le()? as f64;
    let z_offset = r.read_f32_le()? as f64;
    let period = r.read_f32_le()? as f64;
    let bias = r.read_f32_le()? as f64;
    let current = r.read_f32_le()? as f64;
    let angle = r.read_f32_le()? as f64;

    let color_info_count = r.read_u32_le()?;
    let grid_x_size = r.read_u32_le()?;
    let grid_y_size = r.read_u32_le()?;
    let object_count = r.read_u32_le()?;

    let objects = read_objects(
        buffer,
        obj.offset as usize + field_size as usize,
        object_count,
        "PageHeader",
    )?;

    Ok(PageHeader {
        field_size,
        string_count,
        page_type,
        data_sub_source,
        line_type,
        x_coord,
        y_coord,
        x_size,
        y_size,
        image_type,
        scan_dir,
        group_id,
        data_size,
        min_z_value,
        max_z_value,
        x_scale,
        y_scale,
        z_scale,
        xy_scale,
        x_offset,
        y_offset,
        z_offset,
        period,
        bias,
        current,
        angle,
        color_info_count,
        grid_x_size,
        grid_y_size,
        object_count,
        objects,
    })
}

fn truncated() -> FileError {
    FileError::TruncatedObject {
        object: ObjectType::PageHeader.name(),
    }
}
