//! Sorting, pagination and per-face rendering of a whole deck.

use std::collections::HashSet;
use std::thread;

use tracing::{debug, warn};

use crate::core::card::{Card, CardError, IdentifierSource};
use crate::core::config::{AssemblyMode, DeckConfig};
use crate::core::page::{GRID_COLUMNS, GRID_ROWS, Page, RenderError, RenderMode};
use crate::core::record::TrackRecord;

/// One rendered face of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub page: usize,
    pub mode: RenderMode,
    pub svg: String,
}

/// Cards accepted from a batch of records, plus the reasons others were not.
#[derive(Debug, Default)]
pub struct CardSelection {
    pub cards: Vec<Card>,
    pub skipped: Vec<CardError>,
    pub duplicates: usize,
}

/// Turn records into cards, dropping exact duplicates and records that lack
/// a required field.
pub fn cards_from_records(records: &[TrackRecord], source: IdentifierSource) -> CardSelection {
    let mut seen = HashSet::new();
    let mut selection = CardSelection::default();
    for record in records {
        if !seen.insert(record) {
            selection.duplicates += 1;
            continue;
        }
        match Card::from_record(record, source) {
            Ok(card) => selection.cards.push(card),
            Err(err) => {
                warn!("skipping record: {}", err);
                selection.skipped.push(err);
            }
        }
    }
    debug!(
        accepted = selection.cards.len(),
        skipped = selection.skipped.len(),
        duplicates = selection.duplicates,
        "selected cards from records"
    );
    selection
}

/// Sort cards into deck order and cut them into pages of `width * height`.
///
/// Every page but the last is full and no page is ever empty.
pub fn build_pages(mut cards: Vec<Card>, width: usize, height: usize) -> Vec<Page> {
    cards.sort_by(Card::deck_order);

    let mut cards = cards.into_iter().peekable();
    let mut pages = Vec::new();
    while cards.peek().is_some() {
        let mut page = Page::new(width, height);
        page.fill_from(&mut cards);
        pages.push(page);
    }
    pages
}

/// Faces rendered per page, in document order.
pub fn faces(mode: AssemblyMode) -> &'static [RenderMode] {
    match mode {
        AssemblyMode::DoubleSided => &[RenderMode::Qr, RenderMode::Label],
        AssemblyMode::SingleSided => &[RenderMode::Qr],
    }
}

/// The ordered pages of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    pages: Vec<Page>,
}

impl Deck {
    /// Paginate onto the standard 3x4 sheet.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self::with_grid(cards, GRID_COLUMNS, GRID_ROWS)
    }

    pub fn with_grid(cards: Vec<Card>, width: usize, height: usize) -> Self {
        Self {
            pages: build_pages(cards, width, height),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Pages the output document will have under `mode`.
    pub fn document_page_count(&self, mode: AssemblyMode) -> usize {
        self.pages.len() * mode.faces_per_page()
    }

    /// Render every page face in document order: page by page, and within a
    /// page the QR face before the label face.
    ///
    /// Pages are independent, so they are spread over scoped worker threads;
    /// results are stitched back in page order.
    pub fn render(&self, config: &DeckConfig, footer: &str) -> Result<Vec<Fragment>, RenderError> {
        if self.pages.is_empty() {
            return Ok(Vec::new());
        }
        let faces = faces(config.assembly);
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, self.pages.len());
        let chunk = self.pages.len().div_ceil(workers);

        let chunks: Vec<Result<Vec<Fragment>, RenderError>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .pages
                .chunks(chunk)
                .enumerate()
                .map(|(n, pages)| {
                    scope.spawn(move || render_pages(n * chunk, pages, faces, footer, config))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut fragments = Vec::with_capacity(self.pages.len() * faces.len());
        for part in chunks {
            fragments.extend(part?);
        }
        debug!(fragments = fragments.len(), "rendered deck");
        Ok(fragments)
    }
}

fn render_pages(
    first: usize,
    pages: &[Page],
    faces: &[RenderMode],
    footer: &str,
    config: &DeckConfig,
) -> Result<Vec<Fragment>, RenderError> {
    let mut out = Vec::with_capacity(pages.len() * faces.len());
    for (offset, page) in pages.iter().enumerate() {
        for &mode in faces {
            out.push(Fragment {
                page: first + offset,
                mode,
                svg: page.render(mode, footer, &config.style)?,
            });
        }
    }
    Ok(out)
}
