//! Error types for the Course Recommender client.
//!
//! This module defines the error hierarchy for configuration loading,
//! HTTP transport, response decoding, and typed field access on rows
//! returned by the backend.

use std::path::PathBuf;

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the Course Recommender API.
///
/// Transport and decoding variants are turned into user-visible notices by
/// the bridge; they only escape as `Err` from the `try_*` entry points.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your course-recommender.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================
    /// The endpoint is configured with a method other than GET or POST.
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod {
        /// The rejected method string.
        method: String,
    },

    /// The backend could not be reached, or the request timed out.
    #[error("Request to '{endpoint}' failed: {message}")]
    Transport {
        /// Endpoint path the request was sent to.
        endpoint: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The backend answered with a non-success status code.
    #[error("Error fetching data: {status}")]
    HttpStatus {
        /// Endpoint path the request was sent to.
        endpoint: String,
        /// Numeric HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON shape.
    #[error("Unreadable response from '{endpoint}': {message}")]
    Decode {
        /// Endpoint path the request was sent to.
        endpoint: String,
        /// Description of the decoding failure.
        message: String,
    },

    // ========================================================================
    // Field Access Errors
    // ========================================================================
    /// A row did not carry the requested field.
    #[error("Response row is missing field '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A row carried the field, but with an unexpected JSON type.
    #[error("Response field '{field}' is not a valid {expected}")]
    FieldType {
        /// Name of the mistyped field.
        field: String,
        /// Human-readable expected type.
        expected: &'static str,
    },

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// A form value failed local validation before any request was made.
    #[error("{label} {message}")]
    InvalidInput {
        /// Label of the offending form field.
        label: String,
        /// What is wrong with the value.
        message: String,
    },

    /// The screen needs a validated user and none is set on the session.
    #[error("Please log in first")]
    NotLoggedIn,
}

impl ClientError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new `HttpStatus` error.
    #[must_use]
    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new `MissingField` error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a new `FieldType` error.
    #[must_use]
    pub fn field_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::FieldType {
            field: field.into(),
            expected,
        }
    }

    /// Creates a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the request may succeed when sent again.
    ///
    /// Only transport failures qualify; a status code is the backend's answer.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns the message shown to the user when a request fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::HttpStatus { status, .. } => format!("Error fetching data: {status}"),
            Self::Transport { endpoint, message } => {
                format!("Error fetching data: could not reach '{endpoint}' ({message})")
            }
            Self::Decode { endpoint, message } => {
                format!("Error fetching data: unreadable response from '{endpoint}' ({message})")
            }
            other => other.to_string(),
        }
    }
}
