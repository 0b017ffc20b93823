//! Error type shared by every subtitle operation.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading, parsing or rewriting subtitle files.
#[derive(Error, Debug)]
pub enum SrtError {
    /// The input path does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Any read, write, decode or rename failure other than a missing file.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A block could not be split into number, timecode and text.
    #[error("malformed block {number:?} at line {line}: {reason}")]
    MalformedBlock {
        /// 1-based line of the sequence-number line.
        line: usize,
        number: String,
        reason: &'static str,
    },

    /// Parsed blocks could not be rendered as JSON.
    #[error("cannot serialize blocks of {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The translation does not line up 1:1 with the source blocks.
    #[error("count mismatch: {source_blocks} source blocks, {translation_lines} translation lines")]
    CountMismatch {
        source_blocks: usize,
        translation_lines: usize,
    },
}

pub type Result<T> = std::result::Result<T, SrtError>;

impl SrtError {
    /// Classify an I/O error for `path`, keeping not-found distinct.
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            SrtError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SrtError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn malformed(line: usize, number: &str, reason: &'static str) -> Self {
        SrtError::MalformedBlock {
            line,
            number: number.to_string(),
            reason,
        }
    }
}
