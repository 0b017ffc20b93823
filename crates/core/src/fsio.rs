//! File helpers: UTF-8 reads and all-or-nothing writes.

use crate::error::{Result, SrtError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// Read `path` as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    trace!("read_text path={}", path.display());
    fs::read_to_string(path).map_err(|e| SrtError::io(path, e))
}

/// Replace `path` with `content`.
/// The way this works is by writing a temporary file next to the target and
/// renaming it over the target, so readers never observe a partial write.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    trace!("write_atomic path={} bytes={}", path.display(), content.len());
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SrtError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| SrtError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| SrtError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    debug!("wrote {}", path.display());
    Ok(())
}
