//! SCML project generation
//!
//! [`emit_scml`] turns a bank and its build into a [`Node`] tree;
//! [`write_document`] renders any tree with the editor's text conventions.

mod document;
mod emit;
mod writer;

pub use document::Node;
pub use emit::{
    EmitOptions, FileInfo, MissingReport, MissingSymbol, ScmlOutput, emit_scml, format_decimal,
    format_number,
};
pub use writer::{SELF_CLOSING, write_document};
