//! Label line-breaking preview (`vibester wrap ...`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use vibester::{normalize_label, wrap};

use crate::cli::utils::read_stdin;

/// Arguments for `vibester wrap`.
#[derive(Args, Debug)]
pub struct WrapArgs {
    /// Label text (falls back to stdin if omitted).
    pub text: Option<String>,
    /// Maximum characters per line.
    #[arg(short = 'w', long, default_value_t = 24)]
    pub width: usize,
    /// Read label from file instead.
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
}

/// Execute `vibester wrap`.
pub fn handle(args: WrapArgs) -> Result<()> {
    let text = match (args.text, args.from) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => read_stdin()?,
    };
    for line in wrap(&normalize_label(&text), args.width) {
        println!("{line}");
    }
    Ok(())
}
