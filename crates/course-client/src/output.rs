//! What a screen shows after a submission.
//!
//! Screens and the bridge append [`Element`]s to a [`ScreenOutput`] in
//! display order; renderers turn the list into terminal text, Markdown,
//! or JSON.

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// The action succeeded.
    Success,
    /// Neutral information, e.g. "nothing found".
    Info,
    /// The action completed but needs attention.
    Warning,
    /// The action failed.
    Error,
}

impl NoticeLevel {
    /// Short uppercase tag used in plain-text output.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// One displayable piece of screen output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    /// A status message.
    Notice {
        /// Severity.
        level: NoticeLevel,
        /// Message text.
        message: String,
    },
    /// A section heading.
    Subheader {
        /// Heading text.
        text: String,
    },
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// Rows returned by the backend.
    Table {
        /// The table.
        table: Table,
    },
    /// Presentation-ready markup from the backend, shown as-is.
    Markup {
        /// The markup.
        markup: String,
    },
}

/// Ordered output of one screen submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenOutput {
    /// Elements in display order.
    pub elements: Vec<Element>,
}

impl ScreenOutput {
    /// Creates an empty output.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.elements.push(Element::Notice {
            level,
            message: message.into(),
        });
    }

    /// Appends a success notice.
    pub fn success(&mut self, message: impl Into<String>) {
        self.notice(NoticeLevel::Success, message);
    }

    /// Appends an informational notice.
    pub fn info(&mut self, message: impl Into<String>) {
        self.notice(NoticeLevel::Info, message);
    }

    /// Appends a warning notice.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.notice(NoticeLevel::Warning, message);
    }

    /// Appends an error notice.
    pub fn error(&mut self, message: impl Into<String>) {
        self.notice(NoticeLevel::Error, message);
    }

    /// Appends a subheader.
    pub fn subheader(&mut self, text: impl Into<String>) {
        self.elements.push(Element::Subheader { text: text.into() });
    }

    /// Appends plain text.
    pub fn text(&mut self, text: impl Into<String>) {
        self.elements.push(Element::Text { text: text.into() });
    }

    /// Appends a table.
    pub fn table(&mut self, table: Table) {
        self.elements.push(Element::Table { table });
    }

    /// Appends backend markup.
    pub fn markup(&mut self, markup: impl Into<String>) {
        self.elements.push(Element::Markup {
            markup: markup.into(),
        });
    }

    /// Iterates notices of one level.
    pub fn notices(&self, level: NoticeLevel) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(move |e| match e {
            Element::Notice { level: l, message } if *l == level => Some(message.as_str()),
            _ => None,
        })
    }

    /// Iterates the tables in the output.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(|e| match e {
            Element::Table { table } => Some(table),
            _ => None,
        })
    }

    /// Returns `true` if any error notice was emitted.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.notices(NoticeLevel::Error).next().is_some()
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
