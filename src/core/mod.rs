//! Core domain: records, cards, pages and decks.

pub mod card;
pub mod config;
pub mod deck;
pub mod identifier;
pub mod page;
pub mod record;
pub mod wrap;

pub use card::{Card, CardError, IdentifierSource};
pub use config::{AssemblyMode, CardStyle, DeckConfig, IdentifierConfig};
pub use deck::{CardSelection, Deck, Fragment, build_pages, cards_from_records, faces};
pub use identifier::{CodecError, HashAlgorithm, QrSymbol, encode_qr, hash, hash_bytes, track_seed};
pub use page::{Page, RenderError, RenderMode};
pub use record::{TrackRecord, infer_year, load_records, normalize_label, parse_records};
pub use wrap::wrap;
