//! Binary entry point for the bilingual subtitle tools.

use anyhow::Result;
use bisub_core::srt::ParseMode;
use bisub_core::{extract, html, inspect, merge, pipes, reorder};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options for the binary.
#[derive(Parser)]
struct Cli {
    /// Enable verbose debug and trace logs.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join the text of every block into one `|`-separated line.
    Extract {
        /// SRT file to read.
        input: PathBuf,
        /// Where to save the transcript; printed to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append one translated line to every block of a source SRT.
    Merge {
        /// Source-language SRT file.
        source: PathBuf,
        /// Translation text, one line per source block.
        translation: PathBuf,
        /// Output SRT; defaults to `<source stem>_bilingual.srt`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite a `|`-joined transcript in place as numbered lines.
    Pipes {
        /// Transcript file to convert.
        file: PathBuf,
    },

    /// Swap the last two text lines of blocks numbered START to END, in place.
    Reorder {
        /// SRT file to modify.
        file: PathBuf,
        /// First block number (inclusive).
        start: u32,
        /// Last block number (inclusive).
        end: u32,
    },

    /// Render the subtitle text as a simple HTML page.
    Html {
        /// SRT file to read.
        input: PathBuf,
        /// Output page; defaults to `<input stem>.html`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the parsed blocks as JSON lines.
    Inspect {
        /// SRT file to read.
        input: PathBuf,
        /// Block detection strategy.
        #[arg(long, value_enum, default_value_t = Mode::Anchored)]
        mode: Mode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Split on blank lines.
    Blank,
    /// Start blocks at sequence-number lines.
    Anchored,
}

impl From<Mode> for ParseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Blank => ParseMode::BlankLine,
            Mode::Anchored => ParseMode::NumberAnchored,
        }
    }
}

/// Build a sibling path of `input` named `<stem><suffix>`.
fn sibling(input: &Path, suffix: &str) -> PathBuf {
    input.with_file_name(format!(
        "{}{}",
        input.file_stem().unwrap_or_default().to_string_lossy(),
        suffix
    ))
}

/// Application entry point which parses CLI args and performs actions.
/// This function should initialize logging and delegate to the core library.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("bisub=trace".parse()?)
            .add_directive("bisub_core=trace".parse()?)
            .add_directive("info".parse()?)
    } else {
        EnvFilter::default()
            .add_directive("bisub=info".parse()?)
            .add_directive("bisub_core=info".parse()?)
            .add_directive("warn".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Extract { input, output } => {
            let joined = extract::extract_file(&input, output.as_deref())?;
            if output.is_none() {
                println!("{joined}");
            }
        }
        Command::Merge {
            source,
            translation,
            output,
        } => {
            let output = output.unwrap_or_else(|| sibling(&source, "_bilingual.srt"));
            let report = merge::merge_files(&source, &translation, &output)?;
            info!("merged {} blocks into {}", report.blocks, report.output.display());
        }
        Command::Pipes { file } => {
            let lines = pipes::convert_file(&file)?;
            info!("wrote {lines} numbered lines");
        }
        Command::Reorder { file, start, end } => {
            let report = reorder::shift_trailing_line(&file, start, end)?;
            info!(
                "{} block(s) in range, {} swapped, {} skipped",
                report.in_range,
                report.swapped,
                report.skipped()
            );
        }
        Command::Html { input, output } => {
            let output = output.unwrap_or_else(|| sibling(&input, ".html"));
            html::render_file(&input, &output)?;
        }
        Command::Inspect { input, mode } => {
            print!("{}", inspect::inspect_file(&input, mode.into())?);
        }
    }
    Ok(())
}
