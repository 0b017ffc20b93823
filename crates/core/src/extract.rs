//! Flatten an SRT file into a single `|`-joined transcript.

use crate::error::Result;
use crate::fsio;
use crate::srt::{self, ParseMode};
use std::path::Path;
use tracing::{debug, info, trace};

/// Separator placed between block texts in a joined transcript.
pub const SEPARATOR: &str = "|";

/// Join the text of every block, one segment per block.
/// Lines inside a block are joined with a space; blocks whose text is empty
/// after trimming contribute no segment.
pub fn extract_text(content: &str) -> Result<String> {
    let mut segments = Vec::new();
    for block in srt::blocks(content, ParseMode::BlankLine) {
        let joined = block?.text.join(" ");
        let joined = joined.trim();
        if !joined.is_empty() {
            segments.push(joined.to_string());
        }
    }
    debug!("extracted {} segments", segments.len());
    Ok(segments.join(SEPARATOR))
}

/// Read `input`, extract its transcript and optionally write it to `output`.
pub fn extract_file(input: &Path, output: Option<&Path>) -> Result<String> {
    trace!("extract_file input={}", input.display());
    let content = fsio::read_text(input)?;
    let joined = extract_text(&content)?;
    if let Some(out) = output {
        fsio::write_atomic(out, &joined)?;
        info!("transcript saved to {}", out.display());
    }
    Ok(joined)
}
