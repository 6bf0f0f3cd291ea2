//! End-to-end deck generation.

use std::path::Path;

use tracing::info;

use crate::core::{Deck, DeckConfig, TrackRecord, cards_from_records};
use crate::document::{AssembleOptions, assemble_document};
use crate::error::DeckError;

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub cards: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub pages: usize,
    pub document_pages: usize,
}

/// Run the whole pipeline: records to cards, cards to pages, pages to SVG
/// faces, faces to one PDF at `output`.
pub fn generate_document(
    records: &[TrackRecord],
    config: &DeckConfig,
    footer: &str,
    output: &Path,
) -> Result<GenerateSummary, DeckError> {
    let selection = cards_from_records(records, config.identifier.source());
    let skipped = selection.skipped.len();
    let duplicates = selection.duplicates;
    if selection.cards.is_empty() {
        return Err(DeckError::Empty { skipped, duplicates });
    }

    let deck = Deck::from_cards(selection.cards);
    info!(cards = deck.card_count(), pages = deck.pages().len(), "paginated deck");

    let fragments = deck.render(config, footer)?;
    let options = AssembleOptions {
        font_family: Some(config.style.font_family.clone()),
        font_dirs: config.fonts.clone(),
        scratch_root: None,
    };
    assemble_document(&fragments, output, &options)?;

    Ok(GenerateSummary {
        cards: deck.card_count(),
        skipped,
        duplicates,
        pages: deck.pages().len(),
        document_pages: fragments.len(),
    })
}
