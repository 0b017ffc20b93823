//! Core library for bilingual SRT tooling.
//! It parses SubRip files into blocks and implements the transcript,
//! merge, reorder and HTML operations on top of that parser.

pub mod error;
pub mod extract;
pub mod fsio;
pub mod html;
pub mod inspect;
pub mod merge;
pub mod pipes;
pub mod reorder;
pub mod srt;

pub use error::{Result, SrtError};
