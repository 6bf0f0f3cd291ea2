//! Track metadata records as handed over by the metadata pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// One row of track metadata. Only `artist`, `title`, `year` and `hash` are
/// needed to print a card; everything else is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub struct TrackRecord {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, alias = "identifier")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl TrackRecord {
    pub fn new<S: Into<String>>(artist: S, title: S, year: i32) -> Self {
        Self {
            artist: Some(artist.into()),
            title: Some(title.into()),
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn with_hash<S: Into<String>>(mut self, hash: S) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYear {
    Number(i64),
    Float(f64),
    Text(String),
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawYear> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawYear::Number(n)) => i32::try_from(n).ok(),
        Some(RawYear::Float(f)) if f.is_finite() && f.fract() == 0.0 => {
            i32::try_from(f as i64).ok()
        }
        Some(RawYear::Float(_)) => None,
        Some(RawYear::Text(s)) => infer_year(&s),
        None => None,
    })
}

/// First run of ASCII digits in `s`, e.g. `1994` for `"1994-05-01"`.
pub fn infer_year(s: &str) -> Option<i32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Capitalize all-caps tokens ("QUEEN" -> "Queen") and collapse whitespace.
pub fn normalize_label(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            if is_upper(token) {
                capitalize(&token.to_lowercase())
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_upper(token: &str) -> bool {
    let mut cased = token.chars().filter(|c| c.is_alphabetic()).peekable();
    cased.peek().is_some() && cased.all(|c| !c.is_lowercase())
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Load records from a JSON array or a JSON Lines file.
pub fn load_records(path: &Path) -> Result<Vec<TrackRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records {}", path.display()))?;
    parse_records(&raw).with_context(|| format!("failed to parse records in {}", path.display()))
}

/// Parse records from text; a leading `[` selects JSON array format.
pub fn parse_records(raw: &str) -> Result<Vec<TrackRecord>> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).context("invalid JSON record array");
    }
    let mut records = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: TrackRecord = serde_json::from_str(line)
            .map_err(|err| anyhow!("invalid record at line {}: {}", idx + 1, err))?;
        records.push(record);
    }
    Ok(records)
}
