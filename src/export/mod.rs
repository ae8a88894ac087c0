//! Markdown export of fetched review comments.
//!
//! The export is a single Markdown document meant to be handed to an AI
//! assistant: a summary header, a short instruction block, and one numbered
//! section per comment asking for an implementation.

mod markdown;

pub use markdown::write_markdown;

use thiserror::Error;

/// Errors raised while rendering an export.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// Writing to the output failed.
    #[error("failed to write export: {message}")]
    Io {
        /// I/O error detail.
        message: String,
    },
}

/// Media type of the rendered export.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
