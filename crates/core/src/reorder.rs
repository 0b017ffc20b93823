//! In-place reordering of the last two text lines of selected blocks.
//! Used to fix bilingual files where the translation landed one line off.

use crate::error::Result;
use crate::fsio;
use crate::srt::{self, Span, TIMECODE_SEPARATOR};
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Counts collected while reordering a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReorderReport {
    /// Blocks whose number fell inside the requested range.
    pub in_range: usize,
    /// Blocks whose last two text lines were swapped.
    pub swapped: usize,
}

impl ReorderReport {
    /// Blocks in range left untouched (no timecode line or fewer than two text lines).
    pub fn skipped(&self) -> usize {
        self.in_range - self.swapped
    }
}

/// One raw line split into its content and its own terminator.
#[derive(Debug, Clone, Copy)]
struct RawLine<'a> {
    body: &'a str,
    ending: &'a str,
}

impl<'a> RawLine<'a> {
    fn split(line: &'a str) -> Self {
        let cut = if line.ends_with("\r\n") {
            line.len() - 2
        } else if line.ends_with('\n') {
            line.len() - 1
        } else {
            line.len()
        };
        let (body, ending) = line.split_at(cut);
        RawLine { body, ending }
    }
}

impl AsRef<str> for RawLine<'_> {
    fn as_ref(&self) -> &str {
        self.body
    }
}

/// Swap the last two text lines of every block numbered within `start..=end`.
/// Block numbers are matched literally, not by position. Every other byte of
/// `content`, including line terminators, is kept as is.
pub fn shift_trailing_line_text(
    content: &str,
    start: u32,
    end: u32,
) -> Result<(String, ReorderReport)> {
    let mut lines: Vec<RawLine<'_>> = content
        .split_inclusive('\n')
        .map(RawLine::split)
        .collect();
    let spans: Vec<Span> = srt::spans(&lines).collect::<Result<_>>()?;
    let mut report = ReorderReport::default();
    for span in spans.iter().filter(|s| (start..=end).contains(&s.index)) {
        report.in_range += 1;
        let timecode = (span.start + 1..span.end)
            .find(|&i| lines[i].body.contains(TIMECODE_SEPARATOR));
        let Some(tc) = timecode else {
            debug!("block {} has no timecode line, leaving it", span.index);
            continue;
        };
        let text: Vec<usize> = (tc + 1..span.end)
            .filter(|&i| !lines[i].body.trim().is_empty())
            .collect();
        if let [.., a, b] = text[..] {
            let (upper, lower) = (lines[a].body, lines[b].body);
            lines[a].body = lower;
            lines[b].body = upper;
            report.swapped += 1;
        } else {
            debug!("block {} has {} text line(s), leaving it", span.index, text.len());
        }
    }
    let out = lines.iter().flat_map(|l| [l.body, l.ending]).collect();
    Ok((out, report))
}

/// Apply [`shift_trailing_line_text`] to the file at `path`, replacing it atomically.
pub fn shift_trailing_line(path: &Path, start: u32, end: u32) -> Result<ReorderReport> {
    trace!(
        "shift_trailing_line path={} start={} end={}",
        path.display(),
        start,
        end
    );
    if start > end {
        warn!("empty block range {start}..={end}, nothing will change");
    }
    let content = fsio::read_text(path)?;
    let (out, report) = shift_trailing_line_text(&content, start, end)?;
    fsio::write_atomic(path, &out)?;
    if report.skipped() > 0 {
        warn!("{} block(s) in range were left untouched", report.skipped());
    }
    info!(
        "processed {}: swapped trailing lines in {} block(s) numbered {}-{}",
        path.display(),
        report.swapped,
        start,
        end
    );
    Ok(report)
}
