//! Foundset - client helpers for record-oriented HTTP APIs
//!
//! Wraps the paginated, string-typed record endpoints of a remote data API:
//! a single-pass caching iteration layer for lazy record fetches, a
//! timeout-bounded HTTP transport, portal query parameter encoding, and
//! best-effort coercion of wire strings back into typed values.

pub mod cache;
pub mod container;
pub mod error;
pub mod portal;
pub mod transport;
pub mod value;

pub use cache::{CachingIter, RecordCache, Snapshot};
pub use container::filename_from_url;
pub use error::{FoundsetError, FoundsetResult};
pub use portal::{build_portal_params, query_pairs, Portal};
pub use transport::{Method, RequestOptions, Response, Transport, DEFAULT_TIMEOUT};
pub use value::{coerce, FieldValue};
