//! Identifier lookup (`vibester hash ...`).

use anyhow::Result;
use clap::Args;
use vibester::{hash, track_seed};

use crate::cli::common::HashAlgorithmArg;

/// Arguments for `vibester hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    pub artist: String,
    pub title: String,
    pub year: i32,
    /// Number of hex digits to keep.
    #[arg(long, default_value_t = 12)]
    pub length: usize,
    #[arg(long, default_value_t = HashAlgorithmArg::Md5, value_enum)]
    pub algorithm: HashAlgorithmArg,
}

/// Execute `vibester hash`.
pub fn handle(args: HashArgs) -> Result<()> {
    let seed = track_seed(&args.artist, &args.title, args.year);
    println!("{}", hash(&seed, args.length, args.algorithm.into()));
    Ok(())
}
