//! Short deterministic identifiers and their QR symbols.

use md5::Md5;
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write};
use thiserror::Error;

/// Modules of light border drawn around every symbol.
pub const QUIET_ZONE_MODULES: usize = 4;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cannot encode {data:?} as a QR symbol: {reason}")]
    Qr { data: String, reason: String },
}

/// Digest used to derive identifiers from track metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Matches the codes printed by earlier decks.
    #[default]
    Md5,
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Hex digest of `seed`, truncated to `length` characters.
pub fn hash(seed: &str, length: usize, algorithm: HashAlgorithm) -> String {
    let mut digest = match algorithm {
        HashAlgorithm::Md5 => format!("{:x}", Md5::digest(seed.as_bytes())),
        HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(seed.as_bytes())),
    };
    digest.truncate(length);
    digest
}

/// Like [`hash`], for raw bytes. Invalid UTF-8 sequences are replaced with
/// U+FFFD before hashing so the same text always hashes the same way.
pub fn hash_bytes(seed: &[u8], length: usize, algorithm: HashAlgorithm) -> String {
    hash(&String::from_utf8_lossy(seed), length, algorithm)
}

/// The seed the metadata pipeline hashes: artist, title and year concatenated.
pub fn track_seed(artist: &str, title: &str, year: i32) -> String {
    format!("{artist}{title}{year}")
}

/// A QR symbol drawn as a single SVG path, in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct QrSymbol {
    /// `<path>` element with its origin at the top-left of the quiet zone.
    pub path: String,
    /// Side length of the square symbol including the quiet zone.
    pub side_mm: f64,
}

/// Encode `data` as a vector QR symbol where each module is `module_mm` wide.
///
/// The smallest symbol version that holds `data` at error correction level M
/// is chosen by the encoder.
pub fn encode_qr(data: &str, module_mm: f64) -> Result<QrSymbol, CodecError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M).map_err(|err| {
        CodecError::Qr {
            data: data.to_string(),
            reason: err.to_string(),
        }
    })?;
    let width = code.width();
    let colors = code.to_colors();

    let mut d = String::new();
    for (idx, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (idx % width + QUIET_ZONE_MODULES) as f64 * module_mm;
        let y = (idx / width + QUIET_ZONE_MODULES) as f64 * module_mm;
        let _ = write!(d, "M{x:.3},{y:.3}h{module_mm:.3}v{module_mm:.3}h-{module_mm:.3}z");
    }

    Ok(QrSymbol {
        path: format!(r##"<path d="{d}" fill="#000000" stroke="none"/>"##),
        side_mm: (width + 2 * QUIET_ZONE_MODULES) as f64 * module_mm,
    })
}
