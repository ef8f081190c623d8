use log::{debug, warn};

use crate::{
    error::{FileError, Result},
    sm3::structs::{PageKind, Sm3File, Sm3Page},
    types::{
        ImageType, LineType, PageStrings, PageType, ScanDirection, SourceType, StringKind,
    },
    utilities::reader::Reader,
};

pub const MAGIC_OFFSET: usize = 2;
/// `STiMage 004.` in UTF-16LE, repeated at the head of every page.
pub const MAGIC: [u8; 24] = [
    0x53, 0x00, 0x54, 0x00, 0x69, 0x00, 0x4d, 0x00, 0x61, 0x00, 0x67, 0x00, //
    0x65, 0x00, 0x20, 0x00, 0x30, 0x00, 0x30, 0x00, 0x34, 0x00, 0x2e, 0x00,
];
pub const MAGIC_TOTAL_SIZE: usize = 36;
pub const HEADER_SIZE: usize = 2 + MAGIC_TOTAL_SIZE + 2 * 4 + 15 * 4 + 11 * 4 + 16;

pub fn detect(head: &[u8]) -> bool {
    head.len() > MAGIC_TOTAL_SIZE && head[MAGIC_OFFSET..MAGIC_OFFSET + MAGIC.len()] == MAGIC
}

/// Decode an SM3 stream: pages parsed back to back until the buffer runs
/// out or a page is malformed. Tolerant of trailing garbage as long as at
/// least one image or line page was importable; with none, the first
/// stream error (or `NoData`) is returned.
pub fn parse_sm3(buffer: &[u8]) -> Result<Sm3File<'_>> {
    if buffer.len() < HEADER_SIZE {
        return Err(FileError::TooShort);
    }

    let mut pages = Vec::new();
    let mut pos = 0;
    let mut count = 0u32;
    let mut first_err = None;
    loop {
        match read_page(buffer, &mut pos, count + 1) {
            Ok(Some(page)) => {
                count += 1;
                if !matches!(page.kind, PageKind::Image | PageKind::Line) {
                    debug!("page {count} is neither image nor line, skipping");
                    continue;
                }
                pages.push(page);
            }
            Ok(None) => break,
            Err(e) => {
                first_err = Some(e);
                break;
            }
        }
    }

    if pages.is_empty() {
        return Err(first_err.unwrap_or(FileError::NoData));
    }
    if let Some(e) = first_err {
        warn!("keeping {} pages decoded before error: {e}", pages.len());
    }

    Ok(Sm3File { pages })
}

/// Read one page at `*pos`, advancing past it. `Ok(None)` at a clean end
/// of the stream.
fn read_page<'a>(buffer: &'a [u8], pos: &mut usize, page_no: u32) -> Result<Option<Sm3Page<'a>>> {
    let start = *pos;
    let remaining = buffer.len() - start;
    if remaining == 0 {
        return Ok(None);
    }
    if remaining < HEADER_SIZE + 4 {
        return Err(truncated("PageHeader"));
    }
    if buffer[start + MAGIC_OFFSET..start + MAGIC_OFFSET + MAGIC.len()] != MAGIC {
        return Err(FileError::FileTypeMismatch);
    }

    let mut r = Reader::new_at(buffer, start, "PageHeader");
    let param_size = r.read_u16_le()?;
    debug!("param_size = {param_size}");
    if remaining < param_size as usize + 4 {
        return Err(truncated("PageHeader"));
    }

    let version = read_version(r.take(MAGIC_TOTAL_SIZE)?);
    let string_count = r.read_u16_le()?;
    let kind = PageKind::from_raw(r.read_u32_le()?);
    let page_type = PageType::from_raw(r.read_u32_le()?);
    let data_sub_source = r.read_u32_le()?;
    let line_type = LineType::from_raw(r.read_u32_le()?);
    let x_coord = r.read_i32_le()?;
    let y_coord = r.read_i32_le()?;
    let x_size = r.read_u32_le()?;
    let y_size = r.read_u32_le()?;
    debug!("x_size = {x_size}, y_size = {y_size}");
    for dim in [x_size, y_size] {
        if dim < 1 || dim > 1 << 16 {
            return Err(FileError::InvalidDimension { dim });
        }
    }

    let source = SourceType::from_raw(r.read_u32_le()?);
    let image_type = ImageType::from_raw(r.read_u32_le()?);
    let scan_dir = ScanDirection::from_raw(r.read_u32_le()?);
    let group_id = r.read_u32_le()?;
    let data_size = r.read_u32_le()?;
    let min_z_value = r.read_i32_le()?;
    let max_z_value = r.read_i32_le()?;

    let mut x_scale = (r.read_f32_le()? as f64).abs();
    if x_scale == 0.0 {
        warn!("real x scale is 0.0, fixing to 1.0");
        x_scale = 1.0;
    }
    let mut y_scale = (r.read_f32_le()? as f64).abs();
    if y_scale == 0.0 {
        warn!("real y scale is 0.0, fixing to 1.0");
        y_scale = 1.0;
    }
    let z_scale = r.read_f32_le()? as f64;
    let xy_scale = r.read_f32_le()? as f64;
    let x_offset = r.read_f32_le()? as f64;
    let y_offset = r.read_f32_le()? as f64;
    let z_offset = r.read_f32_le()? as f64;
    let period = r.read_f32_le()? as f64;
    let bias = r.read_f32_le()? as f64;
    let current = r.read_f32_le()? as f64;
    let angle = r.read_f32_le()? as f64;
    let page_id = r.read_arr::<16>()?;

    // Strings start right after the declared parameter block, whatever it
    // actually contained.
    r.seek(start + 2 + param_size as usize);
    let mut strings = PageStrings::default();
    for i in 0..string_count as usize {
        match r.read_utf16_string() {
            Some(s) if i < StringKind::SM3_COUNT => strings.set(i, s.trim().to_string()),
            Some(_) => {}
            None => return Err(truncated("StringData")),
        }
    }

    let expected = 4 * x_size as u64 * y_size as u64;
    let available = (buffer.len() - r.pos()) as u64;
    if expected > available {
        return Err(FileError::SizeMismatch {
            expected,
            actual: available,
        });
    }
    let data = r.take(expected as usize)?;

    // Image pages drag a color table behind the samples; the length field
    // is 16-bit in reality whatever the XPMPro manual says.
    if kind == PageKind::Image {
        if buffer.len() - r.pos() < 4 {
            return Err(truncated("ColorInfo"));
        }
        let color_size = r.read_u16_le()? as usize;
        if buffer.len() - r.pos() < color_size {
            return Err(truncated("ColorInfo"));
        }
        r.skip(color_size)?;
    }

    *pos = r.pos();
    Ok(Some(Sm3Page {
        page_no,
        param_size,
        version,
        string_count,
        kind,
        page_type,
        data_sub_source,
        line_type,
        x_coord,
        y_coord,
        x_size,
        y_size,
        source,
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
        page_id,
        strings,
        data,
    }))
}

fn read_version(raw: &[u8]) -> String {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&units).trim_end_matches('\0').to_string()
}

fn truncated(object: &'static str) -> FileError {
    FileError::TruncatedObject { object }
}
