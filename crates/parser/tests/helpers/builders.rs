//! Byte-level builders for synthetic SM3/SM4 files. Every offset is
//! computed before the referencing tables are written, so the files hold
//! together without any patch-up.

// Each test binary uses a different subset of the builders.
#![allow(dead_code)]

use miniz_oxide::deflate::compress_to_vec_zlib;

pub const SM4_MAGIC: [u8; 24] = [
    0x53, 0x00, 0x54, 0x00, 0x69, 0x00, 0x4d, 0x00, 0x61, 0x00, 0x67, 0x00, //
    0x65, 0x00, 0x20, 0x00, 0x30, 0x00, 0x30, 0x00, 0x35, 0x00, 0x2e, 0x00,
];
pub const SM3_MAGIC: [u8; 24] = [
    0x53, 0x00, 0x54, 0x00, 0x69, 0x00, 0x4d, 0x00, 0x61, 0x00, 0x67, 0x00, //
    0x65, 0x00, 0x20, 0x00, 0x30, 0x00, 0x30, 0x00, 0x34, 0x00, 0x2e, 0x00,
];

const OBJECT_SIZE: u32 = 12;
const PAGE_HEADER_SIZE: u32 = 170;

pub fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_utf16(out: &mut Vec<u8>, s: &str) {
    let units: Vec<u16> = s.encode_utf16().collect();
    put_u16(out, units.len() as u16);
    for u in units {
        put_u16(out, u);
    }
}

fn put_object(out: &mut Vec<u8>, object_type: u32, offset: u32, size: u32) {
    put_u32(out, object_type);
    put_u32(out, offset);
    put_u32(out, size);
}

#[derive(Clone)]
pub struct DriftSpec {
    pub start_time: u64,
    pub drift_opt: i16,
    pub strings: Vec<String>,
}

#[derive(Clone)]
pub struct Sm4PageSpec {
    pub guid: [u8; 16],
    /// 0 image, 1 line.
    pub data_type: u32,
    pub source: u32,
    pub page_type: u32,
    pub line_type: u32,
    pub scan_dir: u32,
    pub x_size: u32,
    pub y_size: u32,
    pub samples: Vec<i32>,
    pub x_scale: f32,
    pub y_scale: f32,
    pub z_scale: f32,
    pub x_offset: f32,
    pub z_offset: f32,
    pub strings: Vec<String>,
    /// Override for the declared PageData size; the builder also pads the
    /// real region to this size so only the header disagrees.
    pub data_size_override: Option<u32>,
    pub drift: Option<DriftSpec>,
    /// 7 floats per spectrum row.
    pub spec_info: Vec<[f32; 7]>,
}

impl Default for Sm4PageSpec {
    fn default() -> Self {
        Self {
            guid: *b"0123456789abcdef",
            data_type: 0,
            source: 0,
            page_type: 1,
            line_type: 0,
            scan_dir: 0,
            x_size: 2,
            y_size: 2,
            samples: vec![1, 2, 3, 4],
            x_scale: 1.0e-9,
            y_scale: -1.0e-9,
            z_scale: 1.0,
            x_offset: 0.0,
            z_offset: 0.0,
            strings: Vec::new(),
            data_size_override: None,
            drift: None,
            spec_info: Vec::new(),
        }
    }
}

impl Sm4PageSpec {
    fn string_blob(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for s in &self.strings {
            put_utf16(&mut out, s);
        }
        out
    }

    fn drift_blob(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(d) = &self.drift {
            out.extend_from_slice(&d.start_time.to_le_bytes());
            out.extend_from_slice(&d.drift_opt.to_le_bytes());
            put_u16(&mut out, d.strings.len() as u16);
            for s in &d.strings {
                put_utf16(&mut out, s);
            }
        }
        out
    }

    fn spec_info_blob(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for rec in &self.spec_info {
            for v in rec {
                put_f32(&mut out, *v);
            }
        }
        out
    }

    fn object_count(&self) -> u32 {
        let mut n = 0;
        if !self.strings.is_empty() {
            n += 1;
        }
        if self.drift.is_some() {
            n += 1;
        }
        if !self.spec_info.is_empty() {
            n += 1;
        }
        n
    }

    fn header_size(&self) -> u32 {
        PAGE_HEADER_SIZE + OBJECT_SIZE * self.object_count()
    }

    fn data_size(&self) -> u32 {
        self.data_size_override
            .unwrap_or(4 * self.x_size * self.y_size)
    }
}

pub struct PrmSpec {
    pub compressed: bool,
    pub text: Vec<u8>,
}

/// Assemble a complete SM4 file. Layout: file header + root table, page
/// index header, page index array, optional PRM header and payload, then
/// one header/strings/drift/spec-info/data group per page.
pub fn build_sm4(pages: &[Sm4PageSpec], prm: Option<&PrmSpec>) -> Vec<u8> {
    let root_count: u32 = if prm.is_some() { 3 } else { 1 };
    let pih_off = 58 + OBJECT_SIZE * root_count;
    let pih_size = 16 + OBJECT_SIZE;
    let pia_off = pih_off + pih_size;
    let pia_entry_fixed = 32u32;
    let pia_total = pages.len() as u32 * (pia_entry_fixed + OBJECT_SIZE * 2);

    let prm_payload: Vec<u8> = match prm {
        Some(spec) if spec.compressed => compress_to_vec_zlib(&spec.text, 6),
        Some(spec) => spec.text.clone(),
        None => Vec::new(),
    };
    let prmh_off = pia_off + pia_total;
    let prmh_size = if prm.is_some() { 12 } else { 0 };
    let prm_off = prmh_off + prmh_size;

    // Per-page segment offsets.
    let mut cursor = prm_off + prm_payload.len() as u32;
    struct PageLayout {
        header: u32,
        strings: u32,
        drift: u32,
        spec_info: u32,
        data: u32,
    }
    let mut layouts = Vec::new();
    for page in pages {
        let header = cursor;
        let strings = header + page.header_size();
        let drift = strings + page.string_blob().len() as u32;
        let spec_info = drift + page.drift_blob().len() as u32;
        let data = spec_info + page.spec_info_blob().len() as u32;
        cursor = data + page.data_size();
        layouts.push(PageLayout {
            header,
            strings,
            drift,
            spec_info,
            data,
        });
    }

    let mut out = Vec::with_capacity(cursor as usize);
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&SM4_MAGIC);
    // Build info the reader does not interpret.
    for unit in "001 1".encode_utf16() {
        put_u16(&mut out, unit);
    }
    put_u16(&mut out, 0);
    assert_eq!(out.len(), 38);
    put_u32(&mut out, pages.len() as u32);
    put_u32(&mut out, root_count);
    put_u32(&mut out, OBJECT_SIZE);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);

    put_object(&mut out, 1, pih_off, pih_size);
    if prm.is_some() {
        put_object(&mut out, 15, prmh_off, 12);
        put_object(&mut out, 13, prm_off, prm_payload.len() as u32);
    }

    // Page index header.
    assert_eq!(out.len() as u32, pih_off);
    put_u32(&mut out, pages.len() as u32);
    put_u32(&mut out, 1);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    let pia_entry_size = if pages.is_empty() { 0 } else { pia_entry_fixed };
    put_object(&mut out, 2, pia_off, pia_entry_size);

    // Page index array.
    assert_eq!(out.len() as u32, pia_off);
    for (page, layout) in pages.iter().zip(&layouts) {
        out.extend_from_slice(&page.guid);
        put_u32(&mut out, page.data_type);
        put_u32(&mut out, page.source);
        put_u32(&mut out, 2);
        put_u32(&mut out, 0);
        put_object(&mut out, 3, layout.header, page.header_size());
        put_object(&mut out, 4, layout.data, page.data_size());
    }

    if let Some(spec) = prm {
        assert_eq!(out.len() as u32, prmh_off);
        put_u32(&mut out, spec.compressed as u32);
        put_u32(&mut out, spec.text.len() as u32);
        put_u32(
            &mut out,
            if spec.compressed {
                prm_payload.len() as u32
            } else {
                0
            },
        );
        out.extend_from_slice(&prm_payload);
    }

    for (page, layout) in pages.iter().zip(&layouts) {
        assert_eq!(out.len() as u32, layout.header);
        put_u16(&mut out, PAGE_HEADER_SIZE as u16);
        put_u16(&mut out, page.strings.len() as u16);
        put_u32(&mut out, page.page_type);
        put_u32(&mut out, 0); // data_sub_source
        put_u32(&mut out, page.line_type);
        put_i32(&mut out, 0);
        put_i32(&mut out, 0);
        put_u32(&mut out, page.x_size);
        put_u32(&mut out, page.y_size);
        put_u32(&mut out, 0); // image_type
        put_u32(&mut out, page.scan_dir);
        put_u32(&mut out, 0x1234abcd); // group_id
        put_u32(&mut out, page.data_size());
        put_i32(&mut out, -1);
        put_i32(&mut out, 1);
        put_f32(&mut out, page.x_scale);
        put_f32(&mut out, page.y_scale);
        put_f32(&mut out, page.z_scale);
        put_f32(&mut out, 0.0); // xy_scale
        put_f32(&mut out, page.x_offset);
        put_f32(&mut out, 0.0); // y_offset
        put_f32(&mut out, page.z_offset);
        put_f32(&mut out, 0.01); // period
        put_f32(&mut out, -0.5); // bias
        put_f32(&mut out, 1e-10); // current
        put_f32(&mut out, 0.0); // angle
        put_u32(&mut out, 0); // color_info_count
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);
        put_u32(&mut out, page.object_count());
        out.resize(layout.header as usize + PAGE_HEADER_SIZE as usize, 0);
        if !page.strings.is_empty() {
            put_object(&mut out, 10, layout.strings, page.string_blob().len() as u32);
        }
        if page.drift.is_some() {
            put_object(&mut out, 7, layout.drift, page.drift_blob().len() as u32);
        }
        if !page.spec_info.is_empty() {
            put_object(&mut out, 8, layout.spec_info, 28);
        }

        out.extend_from_slice(&page.string_blob());
        out.extend_from_slice(&page.drift_blob());
        out.extend_from_slice(&page.spec_info_blob());

        assert_eq!(out.len() as u32, layout.data);
        let mut data = Vec::new();
        for v in &page.samples {
            put_i32(&mut data, *v);
        }
        data.resize(page.data_size() as usize, 0);
        out.extend_from_slice(&data);
    }

    // Keeps the trailing object table of an empty file strictly inside the
    // buffer, like real writers that always append page data.
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

#[derive(Clone)]
pub struct Sm3PageSpec {
    /// 0 image, 1 line, 3 annotated line.
    pub kind: u32,
    pub page_type: u32,
    pub line_type: u32,
    pub scan_dir: u32,
    pub x_size: u32,
    pub y_size: u32,
    pub samples: Vec<i32>,
    pub x_scale: f32,
    pub y_scale: f32,
    pub z_scale: f32,
    pub x_offset: f32,
    pub z_offset: f32,
    pub strings: Vec<String>,
    pub color_info: Vec<u8>,
}

impl Default for Sm3PageSpec {
    fn default() -> Self {
        Self {
            kind: 0,
            page_type: 1,
            line_type: 0,
            scan_dir: 2,
            x_size: 2,
            y_size: 2,
            samples: vec![1, 2, 3, 4],
            x_scale: 1.0e-9,
            y_scale: 1.0e-9,
            z_scale: 1.0,
            x_offset: 0.0,
            z_offset: 0.0,
            strings: Vec::new(),
            color_info: Vec::new(),
        }
    }
}

/// Fixed SM3 page parameter block: everything from the `param_size` field
/// to the page id, strings following directly.
const SM3_PARAM_SIZE: u16 = 158;

pub fn build_sm3(pages: &[Sm3PageSpec]) -> Vec<u8> {
    let mut out = Vec::new();
    for page in pages {
        let start = out.len();
        put_u16(&mut out, SM3_PARAM_SIZE);
        out.extend_from_slice(&SM3_MAGIC);
        for unit in "001 1".encode_utf16() {
            put_u16(&mut out, unit);
        }
        put_u16(&mut out, 0);
        assert_eq!(out.len() - start, 38);
        put_u16(&mut out, page.strings.len() as u16);
        put_u32(&mut out, page.kind);
        put_u32(&mut out, page.page_type);
        put_u32(&mut out, 0); // data_sub_source
        put_u32(&mut out, page.line_type);
        put_i32(&mut out, 0);
        put_i32(&mut out, 0);
        put_u32(&mut out, page.x_size);
        put_u32(&mut out, page.y_size);
        put_u32(&mut out, 0); // source
        put_u32(&mut out, 0); // image_type
        put_u32(&mut out, page.scan_dir);
        put_u32(&mut out, 7); // group_id
        put_u32(&mut out, 4 * page.x_size * page.y_size);
        put_i32(&mut out, -1);
        put_i32(&mut out, 1);
        put_f32(&mut out, page.x_scale);
        put_f32(&mut out, page.y_scale);
        put_f32(&mut out, page.z_scale);
        put_f32(&mut out, 0.0);
        put_f32(&mut out, page.x_offset);
        put_f32(&mut out, 0.0);
        put_f32(&mut out, page.z_offset);
        put_f32(&mut out, 0.02);
        put_f32(&mut out, -1.0);
        put_f32(&mut out, 2e-10);
        put_f32(&mut out, 45.0);
        out.extend_from_slice(b"fedcba9876543210");
        assert_eq!(out.len() - start, 2 + SM3_PARAM_SIZE as usize);

        for s in &page.strings {
            put_utf16(&mut out, s);
        }
        for v in &page.samples {
            put_i32(&mut out, *v);
        }
        if page.kind == 0 {
            put_u16(&mut out, page.color_info.len() as u16);
            out.extend_from_slice(&page.color_info);
            // Real writers always leave the full 4-byte color header (2-byte
            // size plus slack) in the buffer, so the reader's faithful 4-byte
            // guard is satisfied; pad empty color tables up to that minimum.
            let block = 2 + page.color_info.len();
            if block < 4 {
                out.resize(out.len() + (4 - block), 0);
            }
        }
    }
    out
}
