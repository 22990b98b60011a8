//! Error types for the API client.
//!
//! # Design
//! A call can fail in three disjoint ways and each gets its own variant of
//! `Error`:
//! - `Transport`: no response body exists (serialization, URL, network, I/O).
//! - `Decode`: a body arrived but it is not an envelope, or its `result` does
//!   not fit the requested shape. `DecodeError` tells the two apart.
//! - `Api`: the envelope parsed and reported `success: false`. The server's
//!   message is carried verbatim.

/// Boxed source error from the HTTP layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by every pipeline operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by `Client` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response body.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The server answered with `success: false`.
    #[error("api error: {message}")]
    Api { message: String },
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// The server-supplied message, if this is an API error.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Error::Api { message } => Some(message),
            _ => None,
        }
    }
}

/// Failures that happen before a response body is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Send(#[source] BoxError),

    #[error("failed to read response body: {0}")]
    ReadBody(#[source] BoxError),
}

/// Failures decoding a response body that did arrive.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not JSON or not shaped like `{success, message, result}`.
    #[error("malformed response envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope is fine but `result` does not fit the requested type.
    #[error("malformed result payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("response has no result to decode")]
    MissingResult,
}
