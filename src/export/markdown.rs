//! Markdown formatter for exported comments.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::github::locator::FetchRequest;
use crate::github::models::ReviewComment;

use super::ExportError;

const INSTRUCTIONS: &str = "Please review the following review comments and provide \
                            implementation guidance or code fixes for each item.";
const ACTION_REQUIRED: &str =
    "Please provide a code solution or implementation guidance for this suggestion.";

/// Writes comments in Markdown format to the given writer.
///
/// The output starts with the repository, pull request number, comment
/// count, and generation time, then an instructions section, then one
/// numbered section per comment with its file, line when known, body, and
/// an action note.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(
    writer: &mut W,
    request: &FetchRequest,
    comments: &[ReviewComment],
    generated_at: DateTime<Utc>,
) -> Result<(), ExportError> {
    write_header(writer, request, comments.len(), generated_at)?;

    for (index, comment) in comments.iter().enumerate() {
        write_comment_section(writer, index.saturating_add(1), comment)?;
    }

    Ok(())
}

fn write_header<W: Write>(
    writer: &mut W,
    request: &FetchRequest,
    total: usize,
    generated_at: DateTime<Utc>,
) -> Result<(), ExportError> {
    writeln!(writer, "# Review Comments").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "**Repository:** {}/{}",
        request.owner(),
        request.repository()
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer, "**Pull Request:** #{}", request.number()).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Total Comments:** {total}").map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "**Generated:** {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    write_rule(writer)?;
    writeln!(writer, "## Instructions for AI").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{INSTRUCTIONS}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    write_rule(writer)
}

/// Writes a single numbered comment section.
fn write_comment_section<W: Write>(
    writer: &mut W,
    position: usize,
    comment: &ReviewComment,
) -> Result<(), ExportError> {
    writeln!(writer, "## {position}. {}", comment.path).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**File:** `{}`", comment.path).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    if let Some(line) = comment.line {
        writeln!(writer, "**Line:** {line}").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }

    writeln!(writer, "**Suggestion:**").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{}", comment.body).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Action Required:**").map_err(|e| io_error(&e))?;
    writeln!(writer, "{ACTION_REQUIRED}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    write_rule(writer)
}

fn write_rule<W: Write>(writer: &mut W) -> Result<(), ExportError> {
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Converts an I/O error to an [`ExportError::Io`].
fn io_error(error: &std::io::Error) -> ExportError {
    ExportError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
