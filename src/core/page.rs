//! One printed sheet: a fixed grid of cards rendered to SVG.
//!
//! All geometry is in millimeters, which the SVG maps 1:1 to user units via
//! its `viewBox`. The numbers are fixed by the physical card format and must
//! not drift, or new prints stop lining up with existing decks.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::card::Card;
use crate::core::config::CardStyle;
use crate::core::identifier::CodecError;
use crate::core::wrap::wrap;

pub const SHEET_WIDTH_MM: f64 = 210.0;
pub const SHEET_HEIGHT_MM: f64 = 297.0;
/// Smaller than the nominal 65mm card so crop marks stay printable.
pub const CELL_SIDE_MM: f64 = 62.0;
pub const GRID_COLUMNS: usize = 3;
pub const GRID_ROWS: usize = 4;

const CROP_MARK_GAP_MM: f64 = 1.0;
const CROP_MARK_END_MM: f64 = 5.0;
const YEAR_OFFSET_MM: f64 = 6.5;
const ARTIST_OFFSET_MM: f64 = -19.0;
const TITLE_OFFSET_MM: f64 = 18.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to draw QR code for card {identifier}")]
    Qr {
        identifier: String,
        #[source]
        source: CodecError,
    },
}

/// Which face of the sheet to draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Qr,
    Label,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Qr => write!(f, "qr"),
            RenderMode::Label => write!(f, "label"),
        }
    }
}

/// Ordered, fixed-capacity grid of cards. Insertion order decides position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    width: usize,
    height: usize,
    cells: Vec<Card>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(GRID_COLUMNS, GRID_ROWS)
    }
}

impl Page {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            cells: Vec::with_capacity(width * height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn capacity(&self) -> usize {
        self.width * self.height
    }

    pub fn cells(&self) -> &[Card] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cells.len() >= self.capacity()
    }

    /// Append a card, handing it back if the page is already full.
    pub fn push(&mut self, card: Card) -> Result<(), Card> {
        if self.is_full() {
            return Err(card);
        }
        self.cells.push(card);
        Ok(())
    }

    /// Move cards into the page until it is full or `cards` runs dry.
    pub fn fill_from<I: Iterator<Item = Card>>(&mut self, cards: &mut I) {
        while !self.is_full() {
            match cards.next() {
                Some(card) => self.cells.push(card),
                None => break,
            }
        }
    }

    /// Grid `(column, row)` of cell `index` on the given face.
    ///
    /// The QR face is mirrored horizontally so that, once the sheet is
    /// flipped along its vertical edge, each code sits behind its own label.
    pub fn cell_position(&self, index: usize, mode: RenderMode) -> (usize, usize) {
        let natural = index % self.width;
        let row = index / self.width;
        match mode {
            RenderMode::Qr => (self.width - 1 - natural, row),
            RenderMode::Label => (natural, row),
        }
    }

    fn margin(&self) -> f64 {
        (SHEET_WIDTH_MM - self.width as f64 * CELL_SIDE_MM) / 2.0
    }

    /// Draw one face of the sheet as a standalone SVG document.
    pub fn render(&self, mode: RenderMode, footer: &str, style: &CardStyle) -> Result<String, RenderError> {
        let margin = self.margin();
        let table_w = self.width as f64 * CELL_SIDE_MM;
        let table_h = self.height as f64 * CELL_SIDE_MM;

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg version="1.1" width="{}mm" height="{}mm" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            num(SHEET_WIDTH_MM),
            num(SHEET_HEIGHT_MM),
            num(SHEET_WIDTH_MM),
            num(SHEET_HEIGHT_MM)
        );
        let _ = writeln!(
            out,
            "<style>\ntext {{ font-family: {font}; }}\n.year {{ font-size: {year}px; font-weight: 900; }}\n.title, .artist, .footer {{ font-size: {label}px; font-weight: 400; }}\n.title {{ font-style: italic; }}\nrect, line {{ stroke: black; stroke-width: {stroke}; }}\n</style>",
            font = escape_xml(&css_string(&style.font_family)),
            year = num(style.year_font_size),
            label = num(style.label_font_size),
            stroke = num(style.stroke_width),
        );

        if style.grid {
            let _ = writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke-linejoin="miter"/>"#,
                num(margin),
                num(margin),
                num(table_w),
                num(table_h)
            );
        }

        for ix in 0..=self.width {
            let x = margin + ix as f64 * CELL_SIDE_MM;
            if style.grid && ix > 0 && ix < self.width {
                line(&mut out, (x, margin), (x, margin + table_h));
            }
            if style.crop_marks {
                line(
                    &mut out,
                    (x, margin - CROP_MARK_END_MM),
                    (x, margin - CROP_MARK_GAP_MM),
                );
                line(
                    &mut out,
                    (x, margin + table_h + CROP_MARK_GAP_MM),
                    (x, margin + table_h + CROP_MARK_END_MM),
                );
            }
        }

        for iy in 0..=self.height {
            let y = margin + iy as f64 * CELL_SIDE_MM;
            if style.grid && iy > 0 && iy < self.height {
                line(&mut out, (margin, y), (margin + table_w, y));
            }
            if style.crop_marks {
                line(
                    &mut out,
                    (margin - CROP_MARK_END_MM, y),
                    (margin - CROP_MARK_GAP_MM, y),
                );
                line(
                    &mut out,
                    (margin + table_w + CROP_MARK_GAP_MM, y),
                    (margin + table_w + CROP_MARK_END_MM, y),
                );
            }
        }

        for (idx, card) in self.cells.iter().enumerate() {
            let (col, row) = self.cell_position(idx, mode);
            let cell_x = margin + col as f64 * CELL_SIDE_MM;
            let cell_y = margin + row as f64 * CELL_SIDE_MM;
            match mode {
                RenderMode::Qr => {
                    let symbol = card.qr_symbol(style.qr_module_mm).map_err(|source| {
                        RenderError::Qr {
                            identifier: card.identifier().to_string(),
                            source,
                        }
                    })?;
                    // Centered, never scaled.
                    let inset = (CELL_SIDE_MM - symbol.side_mm) / 2.0;
                    let _ = writeln!(
                        out,
                        r#"<g transform="translate({}, {})">{}</g>"#,
                        num(cell_x + inset),
                        num(cell_y + inset),
                        symbol.path
                    );
                }
                RenderMode::Label => {
                    let cx = cell_x + CELL_SIDE_MM / 2.0;
                    let cy = cell_y + CELL_SIDE_MM / 2.0;
                    let _ = writeln!(
                        out,
                        r#"<text x="{}" y="{}" text-anchor="middle" class="year">{}</text>"#,
                        num(cx),
                        num(cy + YEAR_OFFSET_MM),
                        card.year()
                    );
                    label_lines(&mut out, cx, cy + ARTIST_OFFSET_MM, card.artist(), "artist", style);
                    label_lines(&mut out, cx, cy + TITLE_OFFSET_MM, card.title(), "title", style);
                }
            }
        }

        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="end" class="footer">{}</text>"#,
            num(SHEET_WIDTH_MM - margin),
            num(SHEET_HEIGHT_MM - margin),
            escape_xml(footer)
        );
        out.push_str("</svg>\n");
        Ok(out)
    }
}

/// Wrapped label lines, stacked and vertically centered on `y`.
fn label_lines(out: &mut String, x: f64, y: f64, text: &str, class: &str, style: &CardStyle) {
    let lines = wrap(text, style.max_line_width);
    let block_h = style.line_height_mm * lines.len() as f64;
    for (idx, text) in lines.iter().enumerate() {
        let dy = style.line_height_mm * (idx + 1) as f64 - block_h / 2.0;
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" class="{class}">{}</text>"#,
            num(x),
            num(y + dy),
            escape_xml(text)
        );
    }
}

fn line(out: &mut String, from: (f64, f64), to: (f64, f64)) {
    let _ = writeln!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
        num(from.0),
        num(from.1),
        num(to.0),
        num(to.1)
    );
}

/// Millimeter value with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let mut s = format!("{value:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Quote `value` as a CSS string literal. Double quotes are preferred so a
/// family like `Tom's Font` needs no escaping at all.
fn css_string(value: &str) -> String {
    let quote = if value.contains('"') && !value.contains('\'') { '\'' } else { '"' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        if ch == quote || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page_with(n: usize) -> Page {
        let mut page = Page::default();
        for i in 0..n {
            let id = format!("id{i:02}");
            page.push(Card::new("Artist", "Title", 1970 + i as i32, id.as_str()))
                .unwrap();
        }
        page
    }

    #[test]
    fn qr_face_mirrors_columns() {
        let page = Page::default();
        assert_eq!(page.cell_position(0, RenderMode::Qr), (2, 0));
        assert_eq!(page.cell_position(0, RenderMode::Label), (0, 0));
        assert_eq!(page.cell_position(4, RenderMode::Qr), (1, 1));
        assert_eq!(page.cell_position(5, RenderMode::Qr), (0, 1));
        assert_eq!(page.cell_position(5, RenderMode::Label), (2, 1));
        assert_eq!(page.cell_position(11, RenderMode::Label), (2, 3));
    }

    #[test]
    fn page_fills_to_capacity() {
        let mut page = page_with(12);
        assert!(page.is_full());
        let extra = Card::new("X", "Y", 2000, "zz");
        assert_eq!(page.push(extra.clone()), Err(extra));
        assert_eq!(page.len(), 12);
    }

    #[test]
    fn margins_center_the_grid() {
        assert_eq!(Page::default().margin(), 12.0);
    }

    #[test]
    fn label_face_is_deterministic() {
        let page = page_with(4);
        let style = CardStyle::default();
        let a = page.render(RenderMode::Label, "deck 1", &style).unwrap();
        let b = page.render(RenderMode::Label, "deck 1", &style).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.matches(r#"class="year""#).count(), 4);
    }

    #[test]
    fn guides_do_not_depend_on_card_count() {
        let style = CardStyle::default();
        let empty = Page::default().render(RenderMode::Qr, "", &style).unwrap();
        let partial = page_with(4).render(RenderMode::Qr, "", &style).unwrap();
        // 2 interior columns + 3 interior rows, 4 vertical and 5 horizontal boundaries with 2 marks each.
        let expected = 2 + 3 + 2 * 4 + 2 * 5;
        assert_eq!(empty.matches("<line ").count(), expected);
        assert_eq!(partial.matches("<line ").count(), expected);
        assert_eq!(partial.matches("<g transform").count(), 4);
    }

    #[test]
    fn guides_can_be_switched_off() {
        let style = CardStyle {
            grid: false,
            crop_marks: false,
            ..CardStyle::default()
        };
        let svg = page_with(1).render(RenderMode::Label, "", &style).unwrap();
        assert!(!svg.contains("<line "));
        assert!(!svg.contains("<rect "));
    }

    #[test]
    fn crop_marks_leave_a_gap_before_the_grid() {
        let style = CardStyle::default();
        let svg = Page::default().render(RenderMode::Label, "", &style).unwrap();
        assert!(svg.contains(r#"<line x1="12" y1="7" x2="12" y2="11"/>"#));
        assert!(svg.contains(r#"<line x1="199" y1="12" x2="203" y2="12"/>"#));
    }

    #[test]
    fn qr_is_centered_in_mirrored_cell() {
        let style = CardStyle::default();
        let svg = page_with(1).render(RenderMode::Qr, "", &style).unwrap();
        // Short identifier -> version 1, 29 modules of 0.8mm = 23.2mm, inset 19.4mm.
        let x = 12.0 + 2.0 * CELL_SIDE_MM + 19.4;
        assert!(svg.contains(&format!(r#"translate({}, 31.4)"#, num(x))), "{svg}");
    }

    #[test]
    fn footer_and_labels_are_escaped() {
        let mut page = Page::default();
        page.push(Card::new("Simon & Garfunkel", "<Intro>", 1970, "x")).unwrap();
        let svg = page
            .render(RenderMode::Label, "Tom's \"deck\"", &CardStyle::default())
            .unwrap();
        assert!(svg.contains("Simon &amp; Garfunkel"));
        assert!(svg.contains("&lt;Intro&gt;"));
        assert!(svg.contains("Tom&#x27;s &quot;deck&quot;"));
    }

    #[test]
    fn font_family_is_quoted_for_css() {
        let style = CardStyle {
            font_family: "Tom's Font".to_string(),
            ..CardStyle::default()
        };
        let svg = Page::default().render(RenderMode::Label, "", &style).unwrap();
        assert!(svg.contains("font-family: &quot;Tom&#x27;s Font&quot;;"), "{svg}");

        assert_eq!(css_string("DejaVu Sans"), r#""DejaVu Sans""#);
        assert_eq!(css_string("Tom's Font"), r#""Tom's Font""#);
        assert_eq!(css_string(r#"The "Best" Font"#), r#"'The "Best" Font'"#);
        assert_eq!(css_string(r#"Both's "Kinds""#), r#""Both's \"Kinds\"""#);
        assert_eq!(css_string(r"Back\slash"), r#""Back\\slash""#);
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(155.39999999), "155.4");
        assert_eq!(num(-0.0001), "0");
    }
}
