//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use vibester::{AssemblyMode, DeckConfig, HashAlgorithm, RenderMode};

/// Sheet face selector.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RenderModeArg {
    Qr,
    Label,
}

impl From<RenderModeArg> for RenderMode {
    fn from(value: RenderModeArg) -> RenderMode {
        match value {
            RenderModeArg::Qr => RenderMode::Qr,
            RenderModeArg::Label => RenderMode::Label,
        }
    }
}

/// Digest used for identifiers.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum HashAlgorithmArg {
    Md5,
    Sha256,
}

impl From<HashAlgorithmArg> for HashAlgorithm {
    fn from(value: HashAlgorithmArg) -> HashAlgorithm {
        match value {
            HashAlgorithmArg::Md5 => HashAlgorithm::Md5,
            HashAlgorithmArg::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

/// Configuration file plus per-run overrides.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Emit only the QR face of each sheet.
    #[arg(long)]
    pub single_sided: bool,
    /// Do not draw grid lines between cards.
    #[arg(long)]
    pub no_grid: bool,
    /// Do not draw crop marks around the grid.
    #[arg(long)]
    pub no_crop_marks: bool,
    /// Font family for all text.
    #[arg(long)]
    pub font: Option<String>,
    /// Additional directory to load fonts from.
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,
    /// Derive identifiers for records that have none instead of skipping them.
    #[arg(long)]
    pub derive_missing: bool,
}

impl ConfigArgs {
    /// Load the configuration file, if any, and apply flag overrides.
    pub fn resolve(&self) -> Result<DeckConfig> {
        let mut config = match &self.config {
            Some(path) => DeckConfig::load(path)?,
            None => DeckConfig::default(),
        };
        if self.single_sided {
            config.assembly = AssemblyMode::SingleSided;
        }
        if self.no_grid {
            config.style.grid = false;
        }
        if self.no_crop_marks {
            config.style.crop_marks = false;
        }
        if let Some(font) = &self.font {
            config.style.font_family = font.clone();
        }
        if self.derive_missing {
            config.identifier.derive_missing = true;
        }
        config.fonts.extend(self.font_dirs.iter().cloned());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = ConfigArgs {
            single_sided: true,
            no_grid: true,
            font: Some("Inter".into()),
            ..ConfigArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.assembly, AssemblyMode::SingleSided);
        assert!(!config.style.grid);
        assert!(config.style.crop_marks);
        assert_eq!(config.style.font_family, "Inter");
    }
}
