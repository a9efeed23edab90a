//! Course Recommender client
//!
//! Talks to the course-recommendation HTTP API on behalf of a form-driven
//! front end: configuration, the request/response bridge, session state,
//! and the eight screen handlers.

pub mod bridge;
pub mod config;
pub mod error;
pub mod handlers;
pub mod output;
pub mod screen;
pub mod session;
pub mod table;

#[cfg(any(test, feature = "test-support"))]
#[allow(clippy::expect_used)]
pub mod test_support;

pub use bridge::{Bridge, Fetched, QueryParams};
pub use config::{Config, EndpointOverride, EndpointSpec, HttpMethod, Operation};
pub use error::{ClientError, Result};
pub use handlers::{JobDescription, Screens};
pub use output::{Element, NoticeLevel, ScreenOutput};
pub use screen::{field, FieldKind, FieldSpec, Form, ScreenKind};
pub use session::{AppUser, Session, LOGIN_REQUIRED};
pub use table::{display_value, Envelope, Record, Table};
