use serde::Serialize;

use crate::types::{
    ImageType, LineType, PageStrings, PageType, ScanDirection, SourceType, StringKind,
};

pub const OBJECT_SIZE: u32 = 12;
pub const GUID_SIZE: usize = 16;

/// Region descriptors used throughout an SM4 file. Discriminants 0–31 are
/// the on-disk object types; anything newer decodes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectType {
    Undefined,
    PageIndexHeader,
    PageIndexArray,
    PageHeader,
    PageData,
    ImageDriftHeader,
    ImageDrift,
    SpecDriftHeader,
    SpecDriftData,
    ColorInfo,
    StringData,
    TipTrackHeader,
    TipTrackData,
    Prm,
    Thumbnail,
    PrmHeader,
    ThumbnailHeader,
    ApiInfo,
    HistoryInfo,
    PiezoSensitivity,
    FrequencySweepData,
    ScanProcessorInfo,
    PllInfo,
    Ch1DriveInfo,
    Ch2DriveInfo,
    Lockin0Info,
    Lockin1Info,
    ZpiInfo,
    KpiInfo,
    AuxPiInfo,
    LowpassFilter0Info,
    LowpassFilter1Info,
    Unknown(u32),
}

impl ObjectType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Undefined,
            1 => Self::PageIndexHeader,
            2 => Self::PageIndexArray,
            3 => Self::PageHeader,
            4 => Self::PageData,
            5 => Self::ImageDriftHeader,
            6 => Self::ImageDrift,
            7 => Self::SpecDriftHeader,
            8 => Self::SpecDriftData,
            9 => Self::ColorInfo,
            10 => Self::StringData,
            11 => Self::TipTrackHeader,
            12 => Self::TipTrackData,
            13 => Self::Prm,
            14 => Self::Thumbnail,
            15 => Self::PrmHeader,
            16 => Self::ThumbnailHeader,
            17 => Self::ApiInfo,
            18 => Self::HistoryInfo,
            19 => Self::PiezoSensitivity,
            20 => Self::FrequencySweepData,
            21 => Self::ScanProcessorInfo,
            22 => Self::PllInfo,
            23 => Self::Ch1DriveInfo,
            24 => Self::Ch2DriveInfo,
            25 => Self::Lockin0Info,
            26 => Self::Lockin1Info,
            27 => Self::ZpiInfo,
            28 => Self::KpiInfo,
            29 => Self::AuxPiInfo,
            30 => Self::LowpassFilter0Info,
            31 => Self::LowpassFilter1Info,
            other => Self::Unknown(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::PageIndexHeader => "PageIndexHeader",
            Self::PageIndexArray => "PageIndexArray",
            Self::PageHeader => "PageHeader",
            Self::PageData => "PageData",
            Self::ImageDriftHeader => "ImageDriftHeader",
            Self::ImageDrift => "ImageDrift",
            Self::SpecDriftHeader => "SpecDriftHeader",
            Self::SpecDriftData => "SpecDriftData",
            Self::ColorInfo => "ColorInfo",
            Self::StringData => "StringData",
            Self::TipTrackHeader => "TipTrackHeader",
            Self::TipTrackData => "TipTrackData",
            Self::Prm => "PRM",
            Self::Thumbnail => "Thumbnail",
            Self::PrmHeader => "PRMHeader",
            Self::ThumbnailHeader => "ThumbnailHeader",
            Self::ApiInfo => "APIInfo",
            Self::HistoryInfo => "HistoryInfo",
            Self::PiezoSensitivity => "PiezoSensitivity",
            Self::FrequencySweepData => "FrequencySweepData",
            Self::ScanProcessorInfo => "ScanProcessorInfo",
            Self::PllInfo => "PLLInfo",
            Self::Ch1DriveInfo => "Ch1DriveInfo",
            Self::Ch2DriveInfo => "Ch2DriveInfo",
            Self::Lockin0Info => "Lockin0Info",
            Self::Lockin1Info => "Lockin1Info",
            Self::ZpiInfo => "ZPIInfo",
            Self::KpiInfo => "KPIInfo",
            Self::AuxPiInfo => "AuxPIInfo",
            Self::LowpassFilter0Info => "LowpassFilter0Info",
            Self::LowpassFilter1Info => "LowpassFilter1Info",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// What shape of dataset a page-index entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    Image,
    Line,
    XyData,
    AnnotatedLine,
    Text,
    AnnotatedText,
    Sequential,
    Movie,
    Unknown(u32),
}

impl DataType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Image,
            1 => Self::Line,
            2 => Self::XyData,
            3 => Self::AnnotatedLine,
            4 => Self::Text,
            5 => Self::AnnotatedText,
            6 => Self::Sequential,
            7 => Self::Movie,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriftOption {
    Disabled,
    EachSpectra,
    EachLocation,
    Unknown(i16),
}

impl DriftOption {
    pub fn from_raw(raw: i16) -> Self {
        match raw {
            0 => Self::Disabled,
            1 => Self::EachSpectra,
            2 => Self::EachLocation,
            other => Self::Unknown(other),
        }
    }
}

/// Unit and calibration string slots of the piezo-sensitivity block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiezoStringKind {
    TubeXUnit,
    TubeYUnit,
    TubeZUnit,
    TubeZOffsetUnit,
    ScanXUnit,
    ScanYUnit,
    ScanZUnit,
    ActuatorUnit,
    TubeCalibration,
    ScanCalibration,
    ActuatorCalibration,
}

impl PiezoStringKind {
    pub const COUNT: usize = 11;
}

/// One entry of an object table: a typed region within the file buffer.
/// The table reader guarantees `offset + size` fits inside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawObject {
    pub object_type: ObjectType,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub page_count: u32,
    pub object_count: u32,
    pub object_field_size: u32,
    pub reserved1: u32,
    pub reserved2: u32,
    pub objects: Vec<RawObject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndexHeader {
    pub page_count: u32,
    pub object_count: u32,
    pub reserved1: u32,
    pub reserved2: u32,
    pub objects: Vec<RawObject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndexEntry {
    pub id: [u8; GUID_SIZE],
    pub data_type: DataType,
    pub source: SourceType,
    pub object_count: u32,
    pub minor_version: u32,
    pub objects: Vec<RawObject>,
}

/// The fixed part of a page header. The scale/offset calibration is stored
/// as 32-bit floats on disk and widened here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageHeader {
    pub field_size: u16,
    pub string_count: u16,
    pub page_type: PageType,
    pub data_sub_source: u32,
    pub line_type: LineType,
    pub x_coord: i32,
    pub y_coord: i32,
    pub x_size: u32,
    pub y_size: u32,
    pub image_type: ImageType,
    pub scan_dir: ScanDirection,
    pub group_id: u32,
    pub data_size: u32,
    pub min_z_value: i32,
    pub max_z_value: i32,
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
    pub color_info_count: u32,
    pub grid_x_size: u32,
    pub grid_y_size: u32,
    pub object_count: u32,
    #[serde(skip)]
    pub objects: Vec<RawObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDriftHeader {
    pub start_time: u64,
    pub drift_opt: DriftOption,
    pub strings: Vec<String>,
}

/// Piezo calibration block. The string slots are declared by
/// `string_count` but files in the wild size the object too small to hold
/// them, so they usually stay empty (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiezoSensitivity {
    pub tube_x: f64,
    pub tube_y: f64,
    pub tube_z: f64,
    pub tube_z_offset: f64,
    pub scan_x: f64,
    pub scan_y: f64,
    pub scan_z: f64,
    pub actuator: f64,
    pub string_count: u32,
    pub strings: [Option<String>; PiezoStringKind::COUNT],
}

/// Per-spectrum acquisition position and drift record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecInfo {
    pub ftime: f64,
    pub x_coord: f64,
    pub y_coord: f64,
    pub dx: f64,
    pub dy: f64,
    pub cumulative_dx: f64,
    pub cumulative_dy: f64,
}

/// One fully decoded dataset: index-entry identity, header, raw samples,
/// and whatever optional sub-objects the page carried. Borrows the sample
/// region from the input buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub id: [u8; GUID_SIZE],
    pub data_type: DataType,
    pub source: SourceType,
    pub minor_version: u32,
    pub header: PageHeader,
    pub data: &'a [u8],
    pub strings: PageStrings,
    pub drift_header: Option<SpecDriftHeader>,
    pub spec_info: Vec<SpecInfo>,
    pub piezo_sensitivity: Option<PiezoSensitivity>,
}

impl<'a> Page<'a> {
    /// Raw little-endian `i32` samples, row-major.
    pub fn samples(&self) -> impl Iterator<Item = i32> + 'a {
        self.data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    pub fn raw_sample(&self, index: usize) -> i32 {
        let c = &self.data[4 * index..4 * index + 4];
        i32::from_le_bytes([c[0], c[1], c[2], c[3]])
    }

    /// Calibrated value of one raw sample.
    pub fn physical(&self, raw: i32) -> f64 {
        raw as f64 * self.header.z_scale + self.header.z_offset
    }

    pub fn label(&self) -> Option<&str> {
        self.strings.get(StringKind::Label)
    }
}

/// A decoded SM4 container.
#[derive(Debug, Clone, PartialEq)]
pub struct Sm4File<'a> {
    /// Page count declared by the page-index header; pages that failed to
    /// decode are not in `pages`.
    pub page_count: u32,
    pub pages: Vec<Page<'a>>,
    pub prm: Option<crate::types::MetadataMap>,
}
