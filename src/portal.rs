//! Portal query parameter encoding
//!
//! Related-record sets ("portals") are requested through flat query
//! parameters: a `portal` selector naming the portals to include, plus
//! per-portal `offset.<name>` and `range.<name>` window parameters:
//!
//! ```text
//! portal=["Portal1", "Portal2"]&offset.Portal1=1&range.Portal1=50
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Window start applied when a portal does not specify its own
pub const DEFAULT_OFFSET: u32 = 1;

/// Window size applied when a portal does not specify its own
pub const DEFAULT_RANGE: u32 = 50;

/// Selection of one related-record set with an optional pagination window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    /// Object name of the portal
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
}

impl Portal {
    /// Portal selecting `name` with the default window
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: None,
            range: None,
        }
    }

    /// Portal with an explicit window
    pub fn with_window(name: impl Into<String>, offset: u32, range: u32) -> Self {
        Self {
            name: name.into(),
            offset: Some(offset),
            range: Some(range),
        }
    }
}

/// Build the parameter map for a portal fetch
///
/// When `names_as_string` is set, the portal selector is rendered as the
/// literal string `["A", "B"]` instead of a JSON array. GET query strings
/// need the stringified form; JSON request bodies take the array.
pub fn build_portal_params(portals: &[Portal], names_as_string: bool) -> Map<String, Value> {
    let names: Vec<&str> = portals.iter().map(|p| p.name.as_str()).collect();

    let mut params = Map::new();
    let selector = if names_as_string {
        let quoted: Vec<String> = names.iter().map(|name| format!("\"{}\"", name)).collect();
        Value::String(format!("[{}]", quoted.join(", ")))
    } else {
        json!(names)
    };
    params.insert("portal".to_string(), selector);

    for portal in portals {
        let offset = portal.offset.unwrap_or(DEFAULT_OFFSET);
        let range = portal.range.unwrap_or(DEFAULT_RANGE);
        params.insert(format!("offset.{}", portal.name), json!(offset));
        params.insert(format!("range.{}", portal.name), json!(range));
    }

    params
}

/// Flatten a parameter map into query pairs for the transport
///
/// Array values repeat their key once per element. Strings pass through
/// without quoting; other scalars use their JSON rendering.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            Value::Array(values) => {
                for element in values {
                    pairs.push((key.clone(), scalar(element)));
                }
            }
            other => pairs.push((key.clone(), scalar(other))),
        }
    }
    pairs
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
