//! This module is responsible for SRT parsing and block serialization.
//! Both scanning strategies live behind [`blocks`] and yield the same
//! [`SrtBlock`] type; [`spans`] exposes the number-anchored boundaries for
//! callers that rewrite the raw lines in place.

use crate::error::{Result, SrtError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Enumerate;
use std::str::Lines;
use tracing::trace;

/// Token separating the start and end times on a timecode line.
pub const TIMECODE_SEPARATOR: &str = "-->";

const BOM: char = '\u{feff}';

/// Lines of a number-anchored block body skipped before the text search.
/// Merge always takes the line after the number as the timecode.
const BLOCK_BODY: usize = 2;

/// Raw spans end at the first blank line after the number, so a number
/// followed directly by a blank line never swallows the next block.
const SPAN_BODY: usize = 1;

/// Represents a single SRT block (number line, timecode line, text lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtBlock {
    /// Sequence-number line as written, e.g. `7` or `007`.
    pub number: String,
    /// Timecode line as written in the file, e.g. `00:00:01,000 --> 00:00:02,000`.
    pub timecode: String,
    pub text: Vec<String>,
}

impl SrtBlock {
    /// Numeric value of the sequence line, if it is one.
    pub fn index(&self) -> Option<u32> {
        self.number.parse().ok()
    }
}

impl fmt::Display for SrtBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.number)?;
        writeln!(f, "{}", self.timecode)?;
        for line in &self.text {
            writeln!(f, "{line}")?;
        }
        writeln!(f)
    }
}

/// How block boundaries are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Blocks are runs of non-blank lines; runs shorter than three lines are
    /// dropped and the first line is carried through without validation.
    BlankLine,
    /// Blocks start at a digit-only line followed by a timecode line.
    NumberAnchored,
}

/// Lazily parse `input` into blocks in file order.
pub fn blocks(input: &str, mode: ParseMode) -> Blocks<'_> {
    trace!("blocks mode={:?} bytes={}", mode, input.len());
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let inner = match mode {
        ParseMode::BlankLine => Inner::Chunks(input.lines().enumerate()),
        ParseMode::NumberAnchored => Inner::Anchored {
            lines: input.lines().collect(),
            pos: 0,
        },
    };
    Blocks { inner }
}

/// Parse the whole of `input`, stopping at the first malformed block.
pub fn parse(input: &str, mode: ParseMode) -> Result<Vec<SrtBlock>> {
    blocks(input, mode).collect()
}

/// Format SRT blocks back to text.
/// The way this works is by writing each block followed by a blank line.
pub fn format(blocks: &[SrtBlock]) -> String {
    blocks.iter().map(|b| b.to_string()).collect()
}

/// Iterator returned by [`blocks`].
pub struct Blocks<'a> {
    inner: Inner<'a>,
}

enum Inner<'a> {
    Chunks(Enumerate<Lines<'a>>),
    Anchored { lines: Vec<&'a str>, pos: usize },
}

impl Iterator for Blocks<'_> {
    type Item = Result<SrtBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Chunks(lines) => next_chunk(lines),
            Inner::Anchored { lines, pos } => {
                let span = match next_span(lines.as_slice(), pos, BLOCK_BODY)? {
                    Ok(span) => span,
                    Err(e) => return Some(Err(e)),
                };
                Some(span.to_block(lines.as_slice()))
            }
        }
    }
}

/// Pull the next run of non-blank lines that has at least three lines.
fn next_chunk(lines: &mut Enumerate<Lines<'_>>) -> Option<Result<SrtBlock>> {
    loop {
        let (start, first) = loop {
            let (n, line) = lines.next()?;
            if !is_blank(line) {
                break (n, line);
            }
        };
        let mut chunk = vec![first.trim()];
        for (_, line) in lines.by_ref() {
            if is_blank(line) {
                break;
            }
            chunk.push(line.trim());
        }
        if chunk.len() < 3 {
            trace!("dropping {}-line chunk at line {}", chunk.len(), start + 1);
            continue;
        }
        return Some(Ok(SrtBlock {
            number: chunk[0].to_string(),
            timecode: chunk[1].to_string(),
            text: chunk[2..].iter().map(|s| s.to_string()).collect(),
        }));
    }
}

/// Line range of one number-anchored block inside a line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub index: u32,
    /// Position of the sequence-number line.
    pub start: usize,
    /// One past the last text line; the blank separator or end of input.
    pub end: usize,
}

impl Span {
    /// Position of the line directly after the sequence number, if any.
    pub fn timecode_line(&self) -> Option<usize> {
        (self.start + 1 < self.end).then_some(self.start + 1)
    }

    /// Build the block, requiring a timecode line and at least one text line.
    pub fn to_block<S: AsRef<str>>(&self, lines: &[S]) -> Result<SrtBlock> {
        let number = lines[self.start].as_ref().trim_start_matches(BOM).trim();
        let Some(tc) = self.timecode_line() else {
            return Err(SrtError::malformed(
                self.start + 1,
                number,
                "sequence number is not followed by a timecode line",
            ));
        };
        let text: Vec<String> = lines[tc + 1..self.end]
            .iter()
            .map(|l| l.as_ref().trim().to_string())
            .collect();
        if text.is_empty() {
            return Err(SrtError::malformed(
                self.start + 1,
                number,
                "block has no text lines",
            ));
        }
        Ok(SrtBlock {
            number: number.to_string(),
            timecode: lines[tc].as_ref().trim().to_string(),
            text,
        })
    }
}

/// Scan `lines` for number-anchored block boundaries.
/// Each span ends at the first blank line after its number line.
pub fn spans<'s, S: AsRef<str>>(lines: &'s [S]) -> Spans<'s, S> {
    Spans { lines, pos: 0 }
}

/// Iterator returned by [`spans`].
pub struct Spans<'s, S> {
    lines: &'s [S],
    pos: usize,
}

impl<S: AsRef<str>> Iterator for Spans<'_, S> {
    type Item = Result<Span>;

    fn next(&mut self) -> Option<Self::Item> {
        next_span(self.lines, &mut self.pos, SPAN_BODY)
    }
}

/// Find the next digit-only line at or after `pos` and the extent of its block.
/// The first `body` lines after the number belong to the block unconditionally;
/// after those the block runs up to the next blank line.
fn next_span<S: AsRef<str>>(
    lines: &[S],
    pos: &mut usize,
    body: usize,
) -> Option<Result<Span>> {
    while *pos < lines.len() {
        let start = *pos;
        let number = lines[start].as_ref().trim_start_matches(BOM).trim();
        if !is_sequence_line(number) {
            *pos += 1;
            continue;
        }
        let mut end = (start + body).min(lines.len());
        while end < lines.len() && !is_blank(lines[end].as_ref()) {
            end += 1;
        }
        *pos = if end < lines.len() { end + 1 } else { end };
        return Some(parse_index(start + 1, number).map(|index| Span { index, start, end }));
    }
    None
}

fn parse_index(line: usize, number: &str) -> Result<u32> {
    number
        .parse()
        .map_err(|_| SrtError::malformed(line, number, "sequence number out of range"))
}

fn is_sequence_line(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:02,000\n你好\n\n2\n00:00:03,000 --> 00:00:04,000\n世界\nworld\n\n";

    /// Parsing then formatting reproduces well-formed input.
    #[test]
    fn roundtrip_srt() {
        let blocks = parse(SAMPLE, ParseMode::BlankLine).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, vec!["世界".to_string(), "world".to_string()]);
        assert_eq!(format(&blocks), SAMPLE);
    }

    /// Both modes agree on well-formed input.
    #[test]
    fn modes_agree_on_clean_input() {
        let a = parse(SAMPLE, ParseMode::BlankLine).unwrap();
        let b = parse(SAMPLE, ParseMode::NumberAnchored).unwrap();
        assert_eq!(a, b);
    }

    /// Chunks shorter than three lines are dropped without error.
    #[test]
    fn blank_line_mode_drops_short_chunks() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nhi\n\n\n\nstray\n\n   \n2\n00:00:03,000 --> 00:00:04,000\nthere";
        let blocks = parse(input, ParseMode::BlankLine).unwrap();
        let numbers: Vec<&str> = blocks.iter().map(|b| b.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
        assert_eq!(blocks[1].text, vec!["there".to_string()]);
    }

    /// Every chunk of three or more lines is a block, whatever its first line holds.
    #[test]
    fn blank_line_mode_keeps_chunks_without_number() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\nsecond\nthird\nfourth\n\n99999999999\n00:00:03,000 --> 00:00:04,000\nlast\n";
        let blocks = parse(input, ParseMode::BlankLine).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].number, "second");
        assert_eq!(blocks[1].index(), None);
        assert_eq!(blocks[1].text, vec!["fourth".to_string()]);
        assert_eq!(blocks[2].index(), None);
        assert_eq!(blocks[2].text, vec!["last".to_string()]);
    }

    /// Zero-padded numbers are carried through as written.
    #[test]
    fn keeps_number_text() {
        let input = "007\n00:00:01,000 --> 00:00:02,000\nhi\n";
        for mode in [ParseMode::BlankLine, ParseMode::NumberAnchored] {
            let blocks = parse(input, mode).unwrap();
            assert_eq!(blocks[0].number, "007");
            assert_eq!(blocks[0].index(), Some(7));
            assert_eq!(format(&blocks), format!("{input}\n"));
        }
    }

    /// CRLF line endings parse the same as LF.
    #[test]
    fn accepts_crlf() {
        let input = SAMPLE.replace('\n', "\r\n");
        assert_eq!(
            parse(&input, ParseMode::BlankLine).unwrap(),
            parse(SAMPLE, ParseMode::BlankLine).unwrap()
        );
        assert_eq!(
            parse(&input, ParseMode::NumberAnchored).unwrap(),
            parse(SAMPLE, ParseMode::NumberAnchored).unwrap()
        );
    }

    /// The last block is captured even without a trailing blank line.
    #[test]
    fn anchored_mode_captures_final_block_without_blank() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\na\n\n2\n00:00:03,000 --> 00:00:04,000\nb\nc";
        let blocks = parse(input, ParseMode::NumberAnchored).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, vec!["b".to_string(), "c".to_string()]);
    }

    /// A trailing sequence number with nothing after it is reported, not a panic.
    #[test]
    fn anchored_mode_reports_missing_timecode() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\na\n\n7\n";
        match parse(input, ParseMode::NumberAnchored) {
            Err(SrtError::MalformedBlock { line, number, .. }) => {
                assert_eq!(line, 5);
                assert_eq!(number, "7");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    /// A block with a timecode but no text is malformed in anchored mode.
    #[test]
    fn anchored_mode_reports_empty_text() {
        let input = "3\n00:00:01,000 --> 00:00:02,000\n\n4\n00:00:03,000 --> 00:00:04,000\nx\n";
        let err = parse(input, ParseMode::NumberAnchored).unwrap_err();
        assert!(matches!(err, SrtError::MalformedBlock { line: 1, .. }));
    }

    /// Oversized sequence numbers are malformed rather than wrapped.
    #[test]
    fn anchored_mode_rejects_overflowing_number() {
        let input = "99999999999\n00:00:01,000 --> 00:00:02,000\na\n";
        let err = parse(input, ParseMode::NumberAnchored).unwrap_err();
        assert!(matches!(err, SrtError::MalformedBlock { .. }));
    }

    /// Spans point at the number line and stop at the blank separator.
    #[test]
    fn spans_cover_block_lines() {
        let lines: Vec<&str> = SAMPLE.lines().collect();
        let found: Vec<Span> = spans(&lines).collect::<Result<_>>().unwrap();
        assert_eq!(
            found,
            vec![
                Span { index: 1, start: 0, end: 3 },
                Span { index: 2, start: 4, end: 8 },
            ]
        );
        assert_eq!(found[1].timecode_line(), Some(5));
    }

    /// A number followed directly by a blank line ends its span there.
    #[test]
    fn span_stops_at_blank_after_number() {
        let lines: Vec<&str> = "5\n\n6\n00:00:01,000 --> 00:00:02,000\na\nb\n".lines().collect();
        let found: Vec<Span> = spans(&lines).collect::<Result<_>>().unwrap();
        assert_eq!(
            found,
            vec![
                Span { index: 5, start: 0, end: 1 },
                Span { index: 6, start: 2, end: 6 },
            ]
        );
        assert_eq!(found[0].timecode_line(), None);
    }

    /// A leading byte-order mark does not hide the first block.
    #[test]
    fn tolerates_byte_order_mark() {
        let input = format!("\u{feff}{SAMPLE}");
        assert_eq!(parse(&input, ParseMode::BlankLine).unwrap().len(), 2);
        let lines: Vec<&str> = input.lines().collect();
        assert_eq!(spans(&lines).count(), 2);
    }

    /// Text between blocks that is not a number is skipped by the anchored scanner.
    #[test]
    fn anchored_mode_skips_leading_noise() {
        let input = "\u{feff}header\n\n1\n00:00:01,000 --> 00:00:02,000\na\n";
        let blocks = parse(input, ParseMode::NumberAnchored).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].index(), Some(1));
    }
}
