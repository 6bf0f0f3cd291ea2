use thiserror::Error;

use crate::core::page::RenderError;
use crate::document::AssembleError;

/// Terminal failure of a deck generation run.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("no usable cards: {skipped} record(s) skipped, {duplicates} duplicate(s)")]
    Empty { skipped: usize, duplicates: usize },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}
