//! Single sheet preview (`vibester page ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use vibester::{Deck, cards_from_records};

use crate::cli::common::{ConfigArgs, RenderModeArg};
use crate::cli::utils::{read_records, write_output};

/// Arguments for `vibester page`.
#[derive(Args, Debug)]
pub struct PageArgs {
    /// Record file (JSON array or JSON Lines, `-` for stdin).
    pub records: PathBuf,
    /// 1-based sheet number.
    #[arg(short = 'p', long, default_value_t = 1)]
    pub page: usize,
    /// Face to render.
    #[arg(long, default_value_t = RenderModeArg::Label, value_enum)]
    pub mode: RenderModeArg,
    /// Footer text.
    #[arg(long, default_value = "")]
    pub footer: String,
    /// Output SVG file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute `vibester page`.
pub fn handle(args: PageArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let records = read_records(&args.records)?;
    let selection = cards_from_records(&records, config.identifier.source());
    let deck = Deck::from_cards(selection.cards);

    let page = args
        .page
        .checked_sub(1)
        .and_then(|idx| deck.pages().get(idx))
        .ok_or_else(|| anyhow!("sheet {} out of range 1..={}", args.page, deck.pages().len()))?;
    let svg = page
        .render(args.mode.into(), &args.footer, &config.style)
        .with_context(|| format!("failed to render sheet {}", args.page))?;

    write_output(&args.output, &svg)?;
    if args.output.as_os_str() != "-" {
        println!(
            "Wrote sheet {} ({} cards) to {}",
            args.page,
            page.len(),
            args.output.display()
        );
    }
    Ok(())
}
