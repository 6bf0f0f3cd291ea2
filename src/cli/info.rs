//! Record file summary (`vibester info ...`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use vibester::{Deck, cards_from_records};

use crate::cli::common::ConfigArgs;
use crate::cli::utils::read_records;

/// Arguments for `vibester info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Record file to inspect.
    pub records: PathBuf,
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute `vibester info`.
pub fn handle(args: InfoArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let records = read_records(&args.records)?;
    let selection = cards_from_records(&records, config.identifier.source());
    let skipped = selection.skipped.len();
    let duplicates = selection.duplicates;
    let deck = Deck::from_cards(selection.cards);

    println!("Records     : {}", records.len());
    println!("Cards       : {}", deck.card_count());
    println!("Skipped     : {}", skipped);
    println!("Duplicates  : {}", duplicates);
    println!("Sheets      : {}", deck.pages().len());
    println!(
        "PDF pages   : {} ({})",
        deck.document_page_count(config.assembly),
        config.assembly
    );
    if let (Some(first), Some(last)) = (deck.pages().first(), deck.pages().last()) {
        let years = first.cells().first().zip(last.cells().last());
        if let Some((low, high)) = years {
            println!("Years       : {}..={}", low.year(), high.year());
        }
    }
    Ok(())
}
