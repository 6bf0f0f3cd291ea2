//! Full pipeline (`vibester generate ...`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use vibester::generate_document;

use crate::cli::common::ConfigArgs;
use crate::cli::utils::{default_output_name, ensure_parent, read_records};

/// Arguments for `vibester generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Record file (JSON array or JSON Lines, `-` for stdin).
    pub records: PathBuf,
    /// Output PDF path. Defaults to a timestamped name in --output-dir.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory for generated documents when --output is not given.
    #[arg(long = "output-dir", default_value = "output")]
    pub output_dir: PathBuf,
    /// Text printed in the bottom-right corner of every sheet.
    #[arg(long, default_value = "")]
    pub footer: String,
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute `vibester generate`.
pub fn handle(args: GenerateArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let records = read_records(&args.records)?;

    let output = match args.output {
        Some(path) => {
            ensure_parent(&path)?;
            path
        }
        None => {
            fs::create_dir_all(&args.output_dir).with_context(|| {
                format!("failed to create output directory {}", args.output_dir.display())
            })?;
            args.output_dir.join(default_output_name(&records, Local::now()))
        }
    };

    let summary = generate_document(&records, &config, &args.footer, &output)
        .with_context(|| format!("failed to generate {}", output.display()))?;

    println!(
        "Typeset {} card(s) on {} sheet(s), {} PDF page(s) ({})",
        summary.cards, summary.pages, summary.document_pages, config.assembly
    );
    if summary.skipped > 0 || summary.duplicates > 0 {
        println!(
            "Skipped {} incomplete and {} duplicate record(s)",
            summary.skipped, summary.duplicates
        );
    }
    println!("Successfully output to: {}", output.display());
    Ok(())
}
