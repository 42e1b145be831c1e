//! kanim: atlas build and animation bank readers with SCML export
//!
//! This crate reads the two containers that describe a 2D cut-out
//! animation, then rebuilds an editable SCML project from them:
//!
//! - **`BILD` builds** ([`Build`]): named symbols, their frames, the
//!   triangle geometry that places each frame inside an atlas texture, and
//!   the atlas file names.
//! - **`ANIM` banks** ([`AnimBank`]): named clips made of frames, each frame a
//!   flat list of elements (symbol frame + affine transform + stacking key).
//!
//! Elements carry no persistent layer identity from frame to frame, so the
//! exporter first reconciles them into stable layers ([`LayerSet`]), then
//! decomposes each element's matrix into editor-friendly keys
//! ([`decompose`]) and assembles a [`Node`] tree ([`emit_scml`]) that
//! [`write_document`] renders to text.
//!
//! # Usage
//!
//! ```ignore
//! use kanim::{AnimBank, Build, EmitOptions, emit_scml, write_document};
//!
//! let anim = AnimBank::read(&std::fs::read("anim.bin")?)?;
//! let build = Build::read(&std::fs::read("build.bin")?)?;
//!
//! let output = emit_scml(&anim, &build, &EmitOptions::default());
//! std::fs::write("anim.scml", write_document(&output.document))?;
//!
//! for line in output.missing.lines() {
//!     println!("missing: {}", line);
//! }
//! ```

mod anim;
mod atlas;
mod error;
pub mod facing;
mod layers;
pub mod scml;
mod transform;

#[cfg(test)]
pub(crate) mod fixtures;

pub use anim::{ANIM_MAGIC, Affine, AnimBank, AnimFrame, AnimationClip, Element};
pub use atlas::{
    BUILD_MAGIC, BoundingBox, Build, DEPTH_TOLERANCE, FrameGeometry, RawSymbolFrame, Symbol,
    SymbolFrame, Triangle, Vertex, derive_geometry,
};
pub use error::KanimError;
pub use layers::{Layer, LayerEntry, LayerSet};
pub use scml::{
    EmitOptions, FileInfo, MissingReport, MissingSymbol, Node, ScmlOutput, emit_scml,
    write_document,
};
pub use transform::{Decomposed, SpinTracker, decompose, display_angle};
