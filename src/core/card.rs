//! A single track's printable card.

use std::cmp::Ordering;

use thiserror::Error;

use crate::core::identifier::{self, CodecError, HashAlgorithm, QrSymbol};
use crate::core::record::{TrackRecord, normalize_label};

/// Why a record could not become a card.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("record {record} is missing {field}")]
    MissingField { field: &'static str, record: String },
}

/// How identifiers are obtained for records that arrive without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierSource {
    /// Records without an identifier are rejected.
    Required,
    /// Missing identifiers are derived from artist, title and year.
    Derive {
        length: usize,
        algorithm: HashAlgorithm,
    },
}

/// Immutable printable identity of one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    title: String,
    artist: String,
    year: i32,
    identifier: String,
    genre: Option<String>,
}

impl Card {
    pub fn new<S: Into<String>>(artist: S, title: S, year: i32, identifier: S) -> Self {
        Self {
            artist: normalize_label(&artist.into()),
            title: normalize_label(&title.into()),
            year,
            identifier: identifier.into(),
            genre: None,
        }
    }

    /// Build a card from a metadata record, rejecting records that lack a
    /// required field.
    pub fn from_record(record: &TrackRecord, source: IdentifierSource) -> Result<Self, CardError> {
        let describe = || describe_record(record);
        let artist = non_blank(record.artist.as_deref()).ok_or_else(|| CardError::MissingField {
            field: "artist",
            record: describe(),
        })?;
        let title = non_blank(record.title.as_deref()).ok_or_else(|| CardError::MissingField {
            field: "title",
            record: describe(),
        })?;
        let year = record.year.ok_or_else(|| CardError::MissingField {
            field: "year",
            record: describe(),
        })?;
        let identifier = match (non_blank(record.hash.as_deref()), source) {
            (Some(hash), _) => hash.to_string(),
            (None, IdentifierSource::Derive { length, algorithm }) => identifier::hash(
                &identifier::track_seed(artist, title, year),
                length,
                algorithm,
            ),
            (None, IdentifierSource::Required) => {
                return Err(CardError::MissingField {
                    field: "identifier",
                    record: describe(),
                });
            }
        };

        let mut card = Self::new(artist, title, year, identifier.as_str());
        card.genre = record.genre.clone();
        Ok(card)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// QR symbol carrying this card's identifier.
    pub fn qr_symbol(&self, module_mm: f64) -> Result<QrSymbol, CodecError> {
        identifier::encode_qr(&self.identifier, module_mm)
    }

    /// Deck order: year, then artist, then title. The identifier breaks
    /// remaining ties so the order is total.
    pub fn deck_order(&self, other: &Self) -> Ordering {
        (self.year, &self.artist, &self.title, &self.identifier).cmp(&(
            other.year,
            &other.artist,
            &other.title,
            &other.identifier,
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn describe_record(record: &TrackRecord) -> String {
    if let Some(filename) = record.filename.as_deref() {
        return format!("'{filename}'");
    }
    format!(
        "'{} - {}'",
        record.artist.as_deref().unwrap_or("?"),
        record.title.as_deref().unwrap_or("?")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_are_normalized_on_construction() {
        let card = Card::new("ABBA", "DANCING Queen", 1976, "abc123");
        assert_eq!(card.artist(), "Abba");
        assert_eq!(card.title(), "Dancing Queen");
        assert_eq!(card.identifier(), "abc123");
    }

    #[test]
    fn record_identifier_is_kept_verbatim() {
        let record = TrackRecord::new("Blur", "Song 2", 1997).with_hash("feedbeef0000");
        let card = Card::from_record(
            &record,
            IdentifierSource::Derive {
                length: 12,
                algorithm: HashAlgorithm::Md5,
            },
        )
        .unwrap();
        assert_eq!(card.identifier(), "feedbeef0000");
    }

    #[test]
    fn missing_identifier_is_derived_from_raw_metadata() {
        let record = TrackRecord::new("BLUR", "Song 2", 1997);
        let card = Card::from_record(
            &record,
            IdentifierSource::Derive {
                length: 12,
                algorithm: HashAlgorithm::Md5,
            },
        )
        .unwrap();
        let expected = identifier::hash("BLURSong 21997", 12, HashAlgorithm::Md5);
        assert_eq!(card.identifier(), expected);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut record = TrackRecord::new("Blur", "Song 2", 1997);
        let err = Card::from_record(&record, IdentifierSource::Required).unwrap_err();
        assert!(matches!(err, CardError::MissingField { field: "identifier", .. }));

        record.hash = Some("x".into());
        record.year = None;
        let err = Card::from_record(&record, IdentifierSource::Required).unwrap_err();
        assert!(matches!(err, CardError::MissingField { field: "year", .. }));

        record.year = Some(1997);
        record.artist = Some("   ".into());
        let err = Card::from_record(&record, IdentifierSource::Required).unwrap_err();
        assert!(matches!(err, CardError::MissingField { field: "artist", .. }));
    }

    #[test]
    fn deck_order_compares_year_artist_title() {
        let a = Card::new("Beck", "Loser", 1994, "1");
        let b = Card::new("Blur", "Girls", 1994, "2");
        let c = Card::new("Blur", "Tracy Jacks", 1994, "3");
        let d = Card::new("Abba", "Waterloo", 1974, "4");
        assert_eq!(a.deck_order(&b), Ordering::Less);
        assert_eq!(c.deck_order(&b), Ordering::Greater);
        assert_eq!(d.deck_order(&a), Ordering::Less);
    }
}
