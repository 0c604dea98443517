//! Word-list file loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

/// Loads words from a plain-text file, one word per line.
///
/// Blank lines are skipped; everything else is kept verbatim and normalized
/// later by the corpus index.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_words<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read word list '{}'", path.as_ref().display()))?;

    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect();

    info!(count = words.len(), "Word list loaded");
    Ok(words)
}
