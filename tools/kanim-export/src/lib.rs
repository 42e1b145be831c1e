//! kanim-export library
//!
//! File-level conversions behind the `kanim-export` binary, usable from
//! other tools: SCML export, texture and atlas frame extraction, container
//! inspection and manifest builds.

pub mod frames;
pub mod inspect;
pub mod manifest;
pub mod placeholders;
pub mod scml;
pub mod texture;

pub use scml::{ScmlSummary, convert_scml};
pub use texture::convert_texture;

/// Extension of exported SCML projects
pub const SCML_EXT: &str = "scml";

/// Extension of decoded textures and extracted frames
pub const PNG_EXT: &str = "png";
