use serde::Serialize;

use crate::types::{
    ImageType, LineType, PageStrings, PageType, ScanDirection, SourceType, StringKind,
};

/// Page payload kind. SM3 files interleave these freely; only image and
/// line pages are importable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    Image,
    Line,
    AnnotatedLine,
    Unknown(u32),
}

impl PageKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Image,
            1 => Self::Line,
            3 => Self::AnnotatedLine,
            other => Self::Unknown(other),
        }
    }
}

/// One page of the sequential SM3 stream. Unlike SM4 there is no object
/// table; header, strings and samples follow each other directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Sm3Page<'a> {
    /// 1-based position in the stream.
    pub page_no: u32,
    pub param_size: u16,
    /// The per-page `STiMage 004.…` version string.
    pub version: String,
    pub string_count: u16,
    pub kind: PageKind,
    pub page_type: PageType,
    pub data_sub_source: u32,
    pub line_type: LineType,
    pub x_coord: i32,
    pub y_coord: i32,
    pub x_size: u32,
    pub y_size: u32,
    pub source: SourceType,
    pub image_type: ImageType,
    pub scan_dir: ScanDirection,
    pub group_id: u32,
    pub data_size: u32,
    pub min_z_value: i32,
    pub max_z_value: i32,
    /// SM3 scales are stored absolute; zero is fixed to 1.0 on read.
    pub x_scale: f64,
    pub y_scale: f64,
    pub z_scale: f64,
    pub xy_scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    pub period: f64,
    pub bias: f64,
    pub current: f64,
    pub angle: f64,
    pub page_id: [u8; 16],
    pub strings: PageStrings,
    pub data: &'a [u8],
}

impl<'a> Sm3Page<'a> {
    pub fn samples(&self) -> impl Iterator<Item = i32> + 'a {
        self.data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    pub fn physical(&self, raw: i32) -> f64 {
        raw as f64 * self.z_scale + self.z_offset
    }

    pub fn label(&self) -> Option<&str> {
        self.strings.get(StringKind::Label)
    }
}

/// A decoded SM3 stream: the image and line pages that survived.
#[derive(Debug, Clone, PartialEq)]
pub struct Sm3File<'a> {
    pub pages: Vec<Sm3Page<'a>>,
}
