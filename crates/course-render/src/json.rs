//! JSON rendering of screen output.
//!
//! [`JsonRenderer`] serializes the output elements in order, so a script
//! driving `course-recommender --format json` sees every notice, table and
//! markup block the screen produced.
//!
//! # Example
//!
//! ```rust
//! use course_client::ScreenOutput;
//! use course_render::json::JsonRenderer;
//!
//! let mut out = ScreenOutput::new();
//! out.success("Enrollment successful.");
//!
//! let json = JsonRenderer::new(&out).render_pretty().unwrap();
//! assert!(json.contains("\"kind\": \"notice\""));
//! ```

use course_client::ScreenOutput;

use crate::{RenderError, Result};

/// JSON renderer for a single screen's output.
pub struct JsonRenderer<'a> {
    output: &'a ScreenOutput,
}

impl<'a> JsonRenderer<'a> {
    /// Creates a renderer for the given output.
    #[must_use]
    pub const fn new(output: &'a ScreenOutput) -> Self {
        Self { output }
    }

    /// Renders pretty-printed JSON with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if JSON serialization fails.
    pub fn render_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.output).map_err(RenderError::from)
    }
}
