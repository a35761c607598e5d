//! HTTP transport wrapper
//!
//! Thin layer over `ureq` that applies a fixed timeout to every request and
//! folds all transport-level failures into [`FoundsetError::Transport`],
//! together with the original call arguments. HTTP error statuses are not
//! transport failures: the body of a rejected API call still carries the
//! server's error messages, so status handling stays with the caller.

use crate::error::{FoundsetError, FoundsetResult};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Timeout applied to the whole request, connect and read included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Verbs used by record-oriented APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parts of a request
///
/// `body` is sent JSON-encoded on POST and PATCH and ignored otherwise.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string pairs, already flattened (see [`crate::portal::query_pairs`])
    pub query: Vec<(String, String)>,
    /// Additional header pairs
    pub headers: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<Value>,
}

/// A response with the body fully read
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    body: String,
}

impl Response {
    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw body text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON
    pub fn json(&self) -> FoundsetResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Timeout-bounded HTTP client
pub struct Transport {
    agent: Agent,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    /// Transport with [`DEFAULT_TIMEOUT`]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Transport with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    /// Issue a request and read the body to completion
    ///
    /// Every failure of the underlying request mechanism, timeouts
    /// included, maps to [`FoundsetError::Transport`] carrying `method` and
    /// `url`.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> FoundsetResult<Response> {
        debug!("{} {}", method, url);

        let result = match method {
            Method::Get | Method::Delete => {
                let mut req = match method {
                    Method::Get => self.agent.get(url),
                    _ => self.agent.delete(url),
                };
                for (key, value) in &options.query {
                    req = req.query(key, value);
                }
                for (key, value) in &options.headers {
                    req = req.header(key, value);
                }
                req.call()
            }
            Method::Post | Method::Patch => {
                let mut req = match method {
                    Method::Post => self.agent.post(url),
                    _ => self.agent.patch(url),
                };
                for (key, value) in &options.query {
                    req = req.query(key, value);
                }
                for (key, value) in &options.headers {
                    req = req.header(key, value);
                }
                let payload = match &options.body {
                    Some(body) => serde_json::to_string(body)?,
                    None => String::new(),
                };
                req.header("Content-Type", "application/json").send(payload)
            }
        };

        let mut raw = result.map_err(|e| FoundsetError::transport(method, url, e))?;
        let status = raw.status().as_u16();
        let body = raw
            .body_mut()
            .read_to_string()
            .map_err(|e| FoundsetError::transport(method, url, e))?;

        Ok(Response { status, body })
    }
}
