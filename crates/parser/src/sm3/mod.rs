pub mod decode;
pub use decode::{detect, parse_sm3};
pub mod metadata;
pub mod structs;
