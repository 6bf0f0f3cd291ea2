//! Command-line interface wiring for the `vibester` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod generate;
pub mod hash;
pub mod info;
pub mod page;
pub mod utils;
pub mod wrap;

/// Parsed CLI entrypoint for the `vibester` binary.
#[derive(Parser, Debug)]
#[command(name = "vibester", version, about = "Printable QR card decks for music quizzes")]
pub struct Cli {
    /// Log pipeline stages (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Typeset records into a printable PDF deck.
    Generate(generate::GenerateArgs),
    /// Render a single sheet face to SVG.
    Page(page::PageArgs),
    /// Print the identifier assigned to a track.
    Hash(hash::HashArgs),
    /// Show how a label is broken into lines.
    Wrap(wrap::WrapArgs),
    /// Summarize a record file without rendering it.
    Info(info::InfoArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::handle(args),
        Command::Page(args) => page::handle(args),
        Command::Hash(args) => hash::handle(args),
        Command::Wrap(args) => wrap::handle(args),
        Command::Info(args) => info::handle(args),
    }
}
