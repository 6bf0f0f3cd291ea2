//! Conversion of rendered SVG faces into a single printable PDF.

mod assemble;

pub use assemble::{AssembleError, AssembleOptions, assemble_document};
