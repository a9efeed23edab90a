//! The request/response bridge between screens and the backend.
//!
//! [`Bridge::fetch`] sends one GET or POST to `base_url/endpoint` with the
//! parameters on the query string (also for POST, which the backend relies
//! on), requires status 200, decodes the `{"data": [...]}` envelope, and classifies the result as
//! [`Fetched::Absent`], [`Fetched::Empty`], or [`Fetched::Rows`]. Every
//! failure path appends exactly one error notice to the caller's output;
//! success paths append nothing.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Config, EndpointSpec, HttpMethod};
use crate::error::{ClientError, Result};
use crate::output::ScreenOutput;
use crate::table::Table;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("course-recommender/", env!("CARGO_PKG_VERSION"));

/// Query parameters in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a text parameter.
    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.push((name.to_string(), value.into()));
        self
    }

    /// Adds an integer parameter.
    #[must_use]
    pub fn int(mut self, name: &str, value: i64) -> Self {
        self.0.push((name.to_string(), value.to_string()));
        self
    }

    /// Rewrites canonical names to the names an endpoint expects.
    #[must_use]
    pub fn renamed_for(&self, endpoint: &EndpointSpec) -> Self {
        Self(
            self.0
                .iter()
                .map(|(name, value)| (endpoint.param_name(name).to_string(), value.clone()))
                .collect(),
        )
    }

    /// Parameter pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Parameter names, for logging without values.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

/// Outcome of a tabular fetch.
///
/// Callers must distinguish a failed request from a valid empty result:
/// the two drive different messages on almost every screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// The request failed; an error notice was already emitted.
    Absent,
    /// The backend answered with zero rows.
    Empty,
    /// The backend answered with at least one row.
    Rows(Table),
}

impl Fetched {
    /// Returns `true` if the request failed.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the table for any successful fetch, empty or not.
    #[must_use]
    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Absent => None,
            Self::Empty => Some(Table::default()),
            Self::Rows(table) => Some(table),
        }
    }
}

impl From<Table> for Fetched {
    fn from(table: Table) -> Self {
        if table.is_empty() {
            Self::Empty
        } else {
            Self::Rows(table)
        }
    }
}

/// HTTP client bound to one backend origin.
#[derive(Debug, Clone)]
pub struct Bridge {
    client: reqwest::Client,
    base_url: String,
    get_retries: u32,
}

impl Bridge {
    /// Creates a bridge from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ConfigValidationError` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ClientError::config_validation(
                    format!("cannot build HTTP client: {e}"),
                    "Check the TLS setup of this machine",
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            get_retries: config.get_retries,
        })
    }

    /// The backend origin.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for an endpoint path.
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Fetches a table, reporting any failure on `out` and returning `Absent`.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &QueryParams,
        method: &str,
        out: &mut ScreenOutput,
    ) -> Fetched {
        match self.try_fetch(endpoint, params, method).await {
            Ok(table) => Fetched::from(table),
            Err(e) => {
                warn!(endpoint, error = %e, "Fetch failed");
                out.error(e.user_message());
                Fetched::Absent
            }
        }
    }

    /// Fetches a table from a configured endpoint, applying its parameter names.
    pub async fn fetch_endpoint(
        &self,
        endpoint: &EndpointSpec,
        params: &QueryParams,
        out: &mut ScreenOutput,
    ) -> Fetched {
        let params = params.renamed_for(endpoint);
        self.fetch(&endpoint.path, &params, &endpoint.method, out)
            .await
    }

    /// Fetches a table, returning failures as errors instead of notices.
    pub async fn try_fetch(
        &self,
        endpoint: &str,
        params: &QueryParams,
        method: &str,
    ) -> Result<Table> {
        let body = self.send(endpoint, params, method).await?;
        let table = Table::from_envelope_str(endpoint, &body)?;
        debug!(endpoint, rows = table.len(), "Fetched table");
        Ok(table)
    }

    /// Fetches a non-enveloped markup reply from a configured endpoint.
    ///
    /// A JSON string body yields its content; other JSON is pretty-printed;
    /// anything else is returned as raw text.
    pub async fn fetch_markup(
        &self,
        endpoint: &EndpointSpec,
        params: &QueryParams,
        out: &mut ScreenOutput,
    ) -> Option<String> {
        let params = params.renamed_for(endpoint);
        match self.send(&endpoint.path, &params, &endpoint.method).await {
            Ok(body) => Some(decode_markup(&body)),
            Err(e) => {
                warn!(endpoint = %endpoint.path, error = %e, "Markup fetch failed");
                out.error(e.user_message());
                None
            }
        }
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, endpoint: &str, params: &QueryParams, method: &str) -> Result<String> {
        let method = HttpMethod::parse(method)?;
        let url = self.url_for(endpoint);
        let attempts = match method {
            HttpMethod::Get => self.get_retries + 1,
            HttpMethod::Post => 1,
        };

        let mut attempt = 1;
        loop {
            debug!(
                %method,
                endpoint,
                params = ?params.names().collect::<Vec<_>>(),
                attempt,
                "Sending request"
            );
            match self.send_once(method, &url, endpoint, params).await {
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(endpoint, attempt, error = %e, "Request failed, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<String> {
        let request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };

        let response = request
            .query(params.pairs())
            .send()
            .await
            .map_err(|e| ClientError::transport(endpoint, e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::http_status(endpoint, status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ClientError::transport(endpoint, e.to_string()))
    }
}

fn decode_markup(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(markup)) => markup,
        Ok(other) => serde_json::to_string_pretty(&other).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}
