//! Request and response envelopes for ARM list operations

use crate::types::JsonValue;
use serde::Deserialize;

/// One page of a list operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Raw records on this page
    #[serde(default)]
    pub value: Vec<JsonValue>,
    /// Absolute URL of the next page
    #[serde(default)]
    pub next_link: Option<String>,
}

impl Page {
    /// The next page URL, treating an empty link as the end
    pub fn next(&self) -> Option<&str> {
        self.next_link.as_deref().filter(|link| !link.is_empty())
    }
}

/// Where to fetch a page from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// First page: a path below the endpoint plus query parameters
    ///
    /// `api-version` is always one of the parameters.
    First {
        path: String,
        query: Vec<(String, String)>,
    },
    /// Follow-up page: an absolute `nextLink`, used verbatim
    Link(String),
}

impl PageRequest {
    /// First-page request with an `api-version`
    pub fn first(path: impl Into<String>, api_version: &str) -> Self {
        PageRequest::First {
            path: path.into(),
            query: vec![("api-version".to_string(), api_version.to_string())],
        }
    }

    /// Add a query parameter to a first-page request
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let PageRequest::First { query, .. } = &mut self {
            query.push((key.into(), value.into()));
        }
        self
    }
}
