pub mod error;
pub use error::{FileError, Result};
pub mod field;
pub use field::{Curve, DataField};
pub mod sm3;
pub use sm3::{parse_sm3, structs::*};
pub mod sm4;
pub use sm4::{parse_sm4, structs::*};
pub mod types;
pub use types::*;
pub mod utilities;

/// A decoded RHK container of either vintage.
#[derive(Debug, Clone, PartialEq)]
pub enum SpmFile<'a> {
    Sm3(Sm3File<'a>),
    Sm4(Sm4File<'a>),
}

/// Sniff the magic and dispatch to the matching parser.
pub fn parse(buffer: &[u8]) -> Result<SpmFile<'_>> {
    if sm4::detect(buffer) {
        return sm4::parse_sm4(buffer).map(SpmFile::Sm4);
    }
    if sm3::detect(buffer) {
        return sm3::parse_sm3(buffer).map(SpmFile::Sm3);
    }
    Err(FileError::FileTypeMismatch)
}
