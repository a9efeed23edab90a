//! Configuration types for the Course Recommender client.
//!
//! The backend origin, request limits, and per-deployment endpoint mappings
//! are read from `course-recommender.json`. Every field has a default, so a
//! missing file yields a working configuration against a local dev server.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "course-recommender.json";

/// Default backend origin (local development server).
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// Default per-request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

/// Default number of extra attempts for GET requests that failed in transit.
const fn default_get_retries() -> u32 {
    1
}

/// Main configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend origin; every endpoint path is resolved beneath it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single request in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts for GET requests that failed at the transport level.
    #[serde(default = "default_get_retries")]
    pub get_retries: u32,

    /// Per-operation overrides of path, method and parameter names.
    #[serde(default)]
    pub endpoints: BTreeMap<Operation, EndpointOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            get_retries: default_get_retries(),
            endpoints: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ClientError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `course-recommender.json` in a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ConfigParseError` if the file exists but contains
    /// invalid JSON or an unknown operation name, and
    /// `ClientError::ConfigValidationError` if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ClientError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let mut config: Self = serde_json::from_str(&contents)
            .map_err(|e| ClientError::config_parse(path, e.to_string()))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Trims trailing slashes from the base URL so joined paths have one separator.
    pub fn normalize(&mut self) {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        self.base_url = trimmed;
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::config_validation(
                format!("baseUrl '{}' is not an http(s) URL", self.base_url),
                "Set baseUrl to something like http://localhost:8000 in your course-recommender.json",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::config_validation(
                "timeoutSecs must be greater than 0",
                "Set timeoutSecs to at least 1 second in your course-recommender.json",
            ));
        }

        for (operation, endpoint) in &self.endpoints {
            if let Some(path) = &endpoint.path {
                if path.trim().is_empty() {
                    return Err(ClientError::config_validation(
                        format!("endpoints.{operation}.path must not be empty"),
                        "Remove the override or provide the endpoint path, e.g. 'validate_user/'",
                    ));
                }
            }
            // Unknown methods are reported by the bridge at call time.
            if let Some(method) = &endpoint.method {
                if HttpMethod::parse(method).is_err() {
                    tracing::warn!(%operation, %method, "Endpoint configured with unsupported method");
                }
            }
        }

        Ok(())
    }

    /// Resolves the endpoint for an operation, applying any override.
    #[must_use]
    pub fn endpoint(&self, operation: Operation) -> EndpointSpec {
        let mut spec = operation.default_endpoint();
        if let Some(over) = self.endpoints.get(&operation) {
            if let Some(path) = &over.path {
                spec.path.clone_from(path);
            }
            if let Some(method) = &over.method {
                spec.method.clone_from(method);
            }
            spec.param_names.extend(
                over.param_names
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        spec
    }
}

// ============================================================================
// Operations and endpoints
// ============================================================================

/// A backend operation the front end can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Check a username/password pair.
    ValidateUser,
    /// Look up this semester's offerings of a course.
    FindCourseOfferings,
    /// Look up a course's prerequisites.
    FindPrerequisites,
    /// List prerequisites a student is still missing for a course.
    CheckPrerequisites,
    /// Enroll a student in a course offering.
    EnrollStudent,
    /// List a student's enrolled offerings.
    GetEnrolledCourses,
    /// Drop a student from a course offering.
    DropCourse,
    /// List the canned job descriptions.
    GetJobDescriptions,
    /// Ask for course recommendations for a job description.
    GetRecommendations,
}

impl Operation {
    /// The name used as a key under `endpoints` in the config file.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::ValidateUser => "validateUser",
            Self::FindCourseOfferings => "findCourseOfferings",
            Self::FindPrerequisites => "findPrerequisites",
            Self::CheckPrerequisites => "checkPrerequisites",
            Self::EnrollStudent => "enrollStudent",
            Self::GetEnrolledCourses => "getEnrolledCourses",
            Self::DropCourse => "dropCourse",
            Self::GetJobDescriptions => "getJobDescriptions",
            Self::GetRecommendations => "getRecommendations",
        }
    }

    /// The built-in endpoint for this operation.
    #[must_use]
    pub fn default_endpoint(self) -> EndpointSpec {
        let (path, method) = match self {
            Self::ValidateUser => ("validate_user/", HttpMethod::Get),
            Self::FindCourseOfferings => {
                ("find_current_semester_course_offerings/", HttpMethod::Get)
            }
            Self::FindPrerequisites => ("find_prerequisites/", HttpMethod::Get),
            Self::CheckPrerequisites => (
                "check_if_student_has_taken_all_prerequisites_for_course/",
                HttpMethod::Get,
            ),
            Self::EnrollStudent => ("enroll_student_in_course_offering/", HttpMethod::Get),
            Self::GetEnrolledCourses => ("get_student_enrolled_course_offerings/", HttpMethod::Get),
            Self::DropCourse => ("drop_student_from_course_offering/", HttpMethod::Post),
            Self::GetJobDescriptions => ("get_job_descriptions/", HttpMethod::Get),
            Self::GetRecommendations => {
                ("get_recommendations_for_job_description/", HttpMethod::Get)
            }
        };
        EndpointSpec {
            path: path.to_string(),
            method: method.as_str().to_string(),
            param_names: BTreeMap::new(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Partial endpoint settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointOverride {
    /// Replacement path beneath the base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Replacement method (`get` or `post`, case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Canonical query parameter name to the name this deployment expects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub param_names: BTreeMap<String, String>,
}

/// A fully resolved endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Path beneath the base URL, e.g. `validate_user/`.
    pub path: String,
    /// Method string; checked by the bridge when the request is made.
    pub method: String,
    /// Canonical query parameter name to deployment-specific name.
    pub param_names: BTreeMap<String, String>,
}

impl EndpointSpec {
    /// Returns the wire name for a canonical query parameter.
    #[must_use]
    pub fn param_name<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.param_names
            .get(canonical)
            .map_or(canonical, String::as_str)
    }
}

/// HTTP methods the bridge knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`; retried on transport failure.
    Get,
    /// `POST`; parameters still travel on the query string.
    Post,
}

impl HttpMethod {
    /// Parses a method name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnsupportedMethod` for anything but GET or POST.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            _ => Err(ClientError::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }

    /// Lowercase method name as written in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}
