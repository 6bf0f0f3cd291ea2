//! Rendering and assembly settings, passed explicitly into every stage.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::card::IdentifierSource;
use crate::core::identifier::HashAlgorithm;

/// Which faces end up in the output document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyMode {
    /// QR face followed by label face for every page.
    #[default]
    DoubleSided,
    /// QR face only.
    SingleSided,
}

impl AssemblyMode {
    pub fn faces_per_page(self) -> usize {
        match self {
            AssemblyMode::DoubleSided => 2,
            AssemblyMode::SingleSided => 1,
        }
    }
}

impl fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyMode::DoubleSided => write!(f, "double-sided"),
            AssemblyMode::SingleSided => write!(f, "single-sided"),
        }
    }
}

/// Typography and guide-line settings for page faces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardStyle {
    pub font_family: String,
    pub grid: bool,
    pub crop_marks: bool,
    pub stroke_width: f64,
    /// Characters per label line before wrapping.
    pub max_line_width: usize,
    /// Width of one QR module in millimeters.
    pub qr_module_mm: f64,
    pub year_font_size: f64,
    pub label_font_size: f64,
    pub line_height_mm: f64,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans".to_string(),
            grid: true,
            crop_marks: true,
            stroke_width: 0.2,
            max_line_width: 24,
            qr_module_mm: 0.8,
            year_font_size: 18.0,
            label_font_size: 5.2,
            line_height_mm: 6.0,
        }
    }
}

/// How card identifiers are produced when a record has none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentifierConfig {
    pub length: usize,
    pub algorithm: HashAlgorithm,
    pub derive_missing: bool,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            length: 12,
            algorithm: HashAlgorithm::Md5,
            derive_missing: false,
        }
    }
}

impl IdentifierConfig {
    pub fn source(&self) -> IdentifierSource {
        if self.derive_missing {
            IdentifierSource::Derive {
                length: self.length,
                algorithm: self.algorithm,
            }
        } else {
            IdentifierSource::Required
        }
    }
}

/// Complete configuration for one deck generation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DeckConfig {
    pub assembly: AssemblyMode,
    pub style: CardStyle,
    pub identifier: IdentifierConfig,
    /// Extra font directories for document conversion.
    pub fonts: Vec<PathBuf>,
}

impl DeckConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}
