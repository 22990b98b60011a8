//! Per-call description of what to send: method, relative path, query
//! parameters and an optional JSON body.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::TransportError;
use crate::http::HttpMethod;

/// One API call before it is bound to a client.
///
/// Query parameters live in a sorted map, so the encoded query string is
/// stable and a repeated key keeps its last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Attach `body` serialized as JSON. Field values keep their JSON types.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, TransportError> {
        let body = serde_json::to_string(body).map_err(TransportError::Serialize)?;
        self.body = Some(body);
        Ok(self)
    }
}
