//! Render subtitle text as a minimal HTML page, one paragraph per block.

use crate::error::Result;
use crate::fsio;
use crate::srt::{self, ParseMode};
use std::path::Path;
use tracing::{info, trace};

/// Title of the generated page.
pub const TITLE: &str = "字幕内容";

/// Value of the `lang` attribute on the root element.
pub const LANG: &str = "zh-CN";

fn head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{LANG}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{TITLE}</title>
</head>
<body>
"#
    )
}

const TAIL: &str = "</body>\n</html>";

/// Build the page for `content`, returning the HTML and the paragraph count.
/// Text lines are joined with `<br>` and copied without escaping, so inline
/// markup already present in the subtitles renders as markup.
pub fn render_html(content: &str) -> Result<(String, usize)> {
    let mut html = head();
    let mut paragraphs = 0;
    for block in srt::blocks(content, ParseMode::BlankLine) {
        let block = block?;
        html.push_str("    <p>");
        html.push_str(&block.text.join("<br>"));
        html.push_str("</p>\n");
        paragraphs += 1;
    }
    html.push_str(TAIL);
    Ok((html, paragraphs))
}

/// Render the SRT file at `input` into `output`. Returns the paragraph count.
pub fn render_file(input: &Path, output: &Path) -> Result<usize> {
    trace!(
        "render_file input={} output={}",
        input.display(),
        output.display()
    );
    let content = fsio::read_text(input)?;
    let (html, paragraphs) = render_html(&content)?;
    info!("found {paragraphs} subtitle blocks");
    fsio::write_atomic(output, &html)?;
    info!("html saved to {}", output.display());
    Ok(paragraphs)
}
