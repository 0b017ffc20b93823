//! Bilingual merge: append one translated line to every source block.

use crate::error::{Result, SrtError};
use crate::fsio;
use crate::srt::{self, ParseMode, SrtBlock};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

static ENUMERATION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("valid enumeration regex"));

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub blocks: usize,
    pub output: PathBuf,
}

/// Strip one trailing comma and a leading `N.` enumeration from a translated line.
pub fn clean_translation_line(line: &str) -> String {
    let line = match line.strip_suffix(',') {
        Some(rest) => rest.trim(),
        None => line,
    };
    ENUMERATION_PREFIX.replace(line, "").into_owned()
}

/// Non-blank, trimmed and cleaned lines of a translation file, in order.
pub fn translation_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(clean_translation_line)
        .collect()
}

/// Merge source SRT text with translation text into bilingual blocks.
/// Each output block keeps the source number, timecode and text lines and
/// gains the matching translation as its final line.
pub fn merge_blocks(source: &str, translation: &str) -> Result<Vec<SrtBlock>> {
    let mut blocks = srt::parse(source, ParseMode::NumberAnchored)?;
    let lines = translation_lines(translation);
    debug!(
        "source blocks: {}, translation lines: {}",
        blocks.len(),
        lines.len()
    );
    if blocks.len() != lines.len() {
        return Err(SrtError::CountMismatch {
            source_blocks: blocks.len(),
            translation_lines: lines.len(),
        });
    }
    for (block, line) in blocks.iter_mut().zip(lines) {
        block.text.push(line);
    }
    Ok(blocks)
}

/// Like [`merge_blocks`] but returns the serialized SRT text.
pub fn merge_text(source: &str, translation: &str) -> Result<String> {
    Ok(srt::format(&merge_blocks(source, translation)?))
}

/// Merge the files at `source` and `translation` and write the result to `output`.
/// Nothing is written unless the merge succeeds.
pub fn merge_files(source: &Path, translation: &Path, output: &Path) -> Result<MergeReport> {
    trace!(
        "merge_files source={} translation={} output={}",
        source.display(),
        translation.display(),
        output.display()
    );
    let source_text = fsio::read_text(source)?;
    let translation_text = fsio::read_text(translation)?;
    let blocks = merge_blocks(&source_text, &translation_text)?;
    fsio::write_atomic(output, &srt::format(&blocks))?;
    info!("bilingual subtitles saved to {}", output.display());
    Ok(MergeReport {
        blocks: blocks.len(),
        output: output.to_path_buf(),
    })
}
