//! Convenience helpers shared across command handlers.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use vibester::{TrackRecord, load_records, parse_records};

/// Load records from a file, or from stdin when the path is `-`.
pub fn read_records(path: &Path) -> Result<Vec<TrackRecord>> {
    if path.as_os_str() == "-" {
        let raw = read_stdin()?;
        return parse_records(&raw).context("failed to parse records from stdin");
    }
    load_records(path)
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    ensure_parent(path)?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Create the directory that will hold `path`, if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}

/// `output_<directories>_<timestamp>.pdf`, naming the source folders of the
/// records when they are known.
pub fn default_output_name(records: &[TrackRecord], now: DateTime<Local>) -> String {
    let directories: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.directory.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    let timestamp = now.format("%Y-%m-%d_%H-%M-%S");
    if directories.is_empty() {
        format!("output_{timestamp}.pdf")
    } else {
        let joined: Vec<&str> = directories.into_iter().collect();
        format!("output_{}_{timestamp}.pdf", joined.join("_"))
    }
}
