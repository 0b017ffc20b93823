//! Turn a `|`-joined transcript back into numbered lines.

use crate::error::Result;
use crate::extract::SEPARATOR;
use crate::fsio;
use std::path::Path;
use tracing::{info, trace};

/// Split `text` on `|`, drop empty segments and number the rest from 1.
pub fn pipes_to_numbered_lines(text: &str) -> Vec<String> {
    text.split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| format!("{}.{}", i + 1, s))
        .collect()
}

/// Rewrite the transcript at `path` in place as numbered lines.
/// Returns the number of lines written.
pub fn convert_file(path: &Path) -> Result<usize> {
    trace!("convert_file path={}", path.display());
    let content = fsio::read_text(path)?;
    let lines = pipes_to_numbered_lines(&content);
    let mut out = String::new();
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    fsio::write_atomic(path, &out)?;
    info!("converted {} to {} lines", path.display(), lines.len());
    Ok(lines.len())
}
