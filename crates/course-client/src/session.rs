//! Per-session state: the validated user, if any.
//!
//! The session is an explicit value owned by whoever drives the screens and
//! passed to each handler. It is set by a successful validation and never
//! cleared for the lifetime of the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::output::ScreenOutput;

/// Message shown when a screen needs a logged-in student.
pub const LOGIN_REQUIRED: &str = "Please log in first";

/// A user accepted by the validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    /// Backend user id; doubles as the student id for student-scoped calls.
    pub id: i64,
    /// Display name returned at validation.
    pub full_name: String,
    /// When the validation succeeded.
    pub validated_at: DateTime<Utc>,
}

/// State carried across screens for one user session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_user: Option<AppUser>,
}

impl Session {
    /// Creates a session with nobody logged in.
    #[must_use]
    pub const fn new() -> Self {
        Self { current_user: None }
    }

    /// Records the user returned by a successful validation.
    pub fn set_current_user(&mut self, id: i64, full_name: impl Into<String>) {
        let user = AppUser {
            id,
            full_name: full_name.into(),
            validated_at: Utc::now(),
        };
        if let Some(previous) = &self.current_user {
            tracing::info!(previous = previous.id, current = id, "Session user replaced");
        }
        self.current_user = Some(user);
    }

    /// The validated user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&AppUser> {
        self.current_user.as_ref()
    }

    /// The validated user's id, if any.
    #[must_use]
    pub fn current_user_id(&self) -> Option<i64> {
        self.current_user.as_ref().map(|u| u.id)
    }

    /// The validated user's id as a student id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotLoggedIn` if nobody is logged in.
    pub fn student_id(&self) -> Result<i64> {
        self.current_user_id().ok_or(ClientError::NotLoggedIn)
    }

    /// Returns the student id, or emits the login-required error and `None`.
    pub fn require_student(&self, out: &mut ScreenOutput) -> Option<i64> {
        match self.student_id() {
            Ok(id) => Some(id),
            Err(e) => {
                out.error(e.to_string());
                None
            }
        }
    }
}
