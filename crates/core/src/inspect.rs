//! JSON dump of parsed blocks, for checking how a file is split.

use crate::error::{Result, SrtError};
use crate::fsio;
use crate::srt::{self, ParseMode};
use std::path::Path;
use tracing::{debug, trace};

/// Parse the file at `path` in `mode` and render one JSON object per line.
pub fn inspect_file(path: &Path, mode: ParseMode) -> Result<String> {
    trace!("inspect_file path={} mode={:?}", path.display(), mode);
    let content = fsio::read_text(path)?;
    let mut out = String::new();
    let mut count = 0;
    for block in srt::blocks(&content, mode) {
        let json = serde_json::to_string(&block?).map_err(|source| SrtError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        out.push_str(&json);
        out.push('\n');
        count += 1;
    }
    debug!("inspected {count} blocks");
    Ok(out)
}
