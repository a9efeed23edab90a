//! Course Recommender output rendering
//!
//! Turns a [`ScreenOutput`] into something a person or a script can read.
//!
//! # Renderers
//!
//! - [`TextRenderer`] - aligned plain-text tables and tagged notices for a terminal
//! - [`MarkdownRenderer`] - Markdown with pipe tables and quoted notices
//! - [`json::JsonRenderer`] - the output elements as pretty-printed JSON
//!
//! # Example
//!
//! ```rust
//! use course_client::ScreenOutput;
//! use course_render::{render, OutputFormat};
//!
//! let mut out = ScreenOutput::new();
//! out.info("No prerequisites found for the specified course.");
//!
//! let text = render(&out, OutputFormat::Text).unwrap();
//! assert!(text.contains("INFO"));
//! ```

pub mod json;
mod markdown;
mod text;

pub use markdown::MarkdownRenderer;
pub use text::TextRenderer;

use course_client::ScreenOutput;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to serialize the output to JSON.
    #[error("failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Output formats supported by [`render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text for a terminal.
    #[default]
    Text,
    /// Markdown.
    Markdown,
    /// Pretty-printed JSON.
    Json,
}

/// Renders screen output in the requested format.
///
/// # Errors
///
/// Returns [`RenderError::Serialization`] if JSON serialization fails.
pub fn render(output: &ScreenOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(TextRenderer::new(output).render()),
        OutputFormat::Markdown => Ok(MarkdownRenderer::new(output).render()),
        OutputFormat::Json => json::JsonRenderer::new(output).render_pretty(),
    }
}

/// Shortens `s` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
