//! Typesetting of music-quiz card decks: track records in, a double-sided
//! printable PDF of QR codes and labels out.

mod core;
mod document;
mod error;
mod pipeline;

pub use crate::core::{
    AssemblyMode, Card, CardError, CardSelection, CardStyle, CodecError, Deck, DeckConfig,
    Fragment, HashAlgorithm, IdentifierConfig, IdentifierSource, Page, QrSymbol, RenderError,
    RenderMode, TrackRecord, build_pages, cards_from_records, encode_qr, faces, hash, hash_bytes,
    infer_year, load_records, normalize_label, parse_records, track_seed, wrap,
};
pub use crate::core::page::{CELL_SIDE_MM, GRID_COLUMNS, GRID_ROWS, SHEET_HEIGHT_MM, SHEET_WIDTH_MM};
pub use document::{AssembleError, AssembleOptions, assemble_document};
pub use error::DeckError;
pub use pipeline::{GenerateSummary, generate_document};
