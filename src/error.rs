//! Error types for foundset
//!
//! All fallible operations return `FoundsetResult<T>`. Failures coming out
//! of a lazy record fetch are not part of this enum: the caching layer is
//! generic over the source's error type and propagates it unmodified.

use crate::transport::Method;
use thiserror::Error;

/// Result type alias for foundset operations
pub type FoundsetResult<T> = Result<T, FoundsetError>;

/// All errors that can occur in foundset
#[derive(Error, Debug)]
pub enum FoundsetError {
    /// The underlying request mechanism failed or timed out.
    ///
    /// Carries the original call arguments for diagnostics. Never retried.
    #[error("request failed: {method} {url}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FoundsetError {
    /// Create a transport error carrying the original call arguments
    pub fn transport(method: Method, url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Transport {
            method,
            url: url.into(),
            source: Box::new(source),
        }
    }
}
