pub mod decode;
pub use decode::{detect, parse_sm4};
pub mod structs;
pub mod utilities;
