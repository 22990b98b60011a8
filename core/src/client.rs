//! The request pipeline: build an authenticated request, execute it, and
//! dispatch the response envelope to a typed value or an error.
//!
//! # Design
//! `Client` holds the base URL, the bearer token and a `Transport`, and never
//! mutates any of them. Every call runs one linear pass:
//! `build_request` → `execute` → `parse`. The steps are public so callers can
//! drive the I/O themselves and feed the bytes back in.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::endpoint::Endpoint;
use crate::envelope::Envelope;
use crate::error::{Result, TransportError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;

#[derive(Clone)]
pub struct Client<T = UreqTransport> {
    base_url: String,
    token: String,
    transport: T,
}

impl Client {
    /// Client for the public API with the default transport.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_transport(DEFAULT_BASE_URL, token, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let transport = match config.timeout {
            Some(timeout) => UreqTransport::with_timeout(timeout),
            None => UreqTransport::new(),
        };
        Self::with_transport(&config.base_url, &config.token, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(base_url: impl Into<String>, token: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Turn an `Endpoint` into a fully-formed `HttpRequest`.
    ///
    /// The URL is the base URL joined to `path` with exactly one `/`,
    /// followed by the percent-encoded query. The bearer header is set on
    /// every method; `content-type` only when there is a body.
    pub fn build_request(&self, endpoint: &Endpoint) -> Result<HttpRequest> {
        let mut url = self.join_url(&endpoint.path)?;

        if !endpoint.query.is_empty() {
            let pairs: Vec<String> = endpoint
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        let mut headers = vec![("authorization".to_string(), format!("Bearer {}", self.token))];
        if endpoint.body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: endpoint.method,
            url,
            headers,
            body: endpoint.body.clone(),
        })
    }

    fn join_url(&self, path: &str) -> Result<String, TransportError> {
        let base = self.base_url.trim_end_matches('/');
        let invalid = |reason: &str| TransportError::InvalidUrl {
            url: format!("{base}/{path}"),
            reason: reason.to_string(),
        };

        let has_host = ["http://", "https://"]
            .iter()
            .filter_map(|scheme| base.strip_prefix(scheme))
            .any(|rest| !rest.is_empty() && !rest.starts_with('/'));
        if !has_host {
            return Err(invalid("base url must be an absolute http(s) url"));
        }
        if path.contains(['?', '#']) {
            return Err(invalid("path must not contain a query or fragment"));
        }

        Ok(format!("{base}/{}", path.trim_start_matches('/')))
    }

    /// One round trip through the transport. Never retried.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }

    /// Decode a response whose `result` the caller needs.
    pub fn parse<R: DeserializeOwned>(&self, response: &HttpResponse) -> Result<R> {
        let envelope = checked_envelope(response)?;
        Ok(envelope.into_typed::<R>()?.into_result()?)
    }

    /// Decode a response for a command that has no meaningful `result`.
    pub fn parse_command(&self, response: &HttpResponse) -> Result<()> {
        checked_envelope(response)?;
        Ok(())
    }

    pub fn request<R: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<R> {
        let request = self.build_request(&endpoint)?;
        let response = self.execute(&request)?;
        self.parse(&response)
    }

    pub fn command(&self, endpoint: Endpoint) -> Result<()> {
        let request = self.build_request(&endpoint)?;
        let response = self.execute(&request)?;
        self.parse_command(&response)
    }
}

/// Parse the envelope and fail with `Error::Api` when it reports failure.
/// `result` is left untouched on the failure branch.
fn checked_envelope(response: &HttpResponse) -> Result<Envelope> {
    let envelope = Envelope::decode(&response.body)?;
    if !envelope.success {
        tracing::debug!(status = response.status, "api reported failure");
    }
    envelope.ensure_success()
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}
