use thiserror::Error;

pub type Result<T, E = FileError> = std::result::Result<T, E>;

/// Hard failures raised while decoding an SM3/SM4 container.
///
/// Optional sub-objects (strings, drift header, piezo sensitivity, spec
/// info, PRM metadata) never surface these; they degrade to `None`/empty
/// values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FileError {
    #[error("file is too short to be of the assumed file type")]
    TooShort,
    #[error("file is not an RHK STiMage file, it is damaged, or it is of an unknown format version")]
    FileTypeMismatch,
    #[error("object list in {in_object} is truncated")]
    TruncatedObjectList { in_object: &'static str },
    #[error("object of type {object} is truncated")]
    TruncatedObject { object: &'static str },
    #[error("invalid field dimension: {dim}")]
    InvalidDimension { dim: u32 },
    #[error("expected data size calculated from file headers is {expected} bytes, but the real size is {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("cannot find object {object} in {parent}")]
    MissingRequiredObject {
        object: &'static str,
        parent: &'static str,
    },
    #[error("decompression of compressed data failed: {0}")]
    DecompressionFailed(String),
    #[error("file contains no importable data")]
    NoData,
}
