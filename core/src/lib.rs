//! Synchronous client core for the V2EX v2 API.
//!
//! # Overview
//! Every response is wrapped in the same `{success, message, result}`
//! envelope. One generic pipeline builds an authenticated request, performs a
//! single blocking round trip, and turns the envelope into either a typed
//! value or one of three errors: transport, decode, or API.
//!
//! # Design
//! - `Client` is immutable: base URL, bearer token and a `Transport`. Clones
//!   share nothing mutable, so one client can serve many threads.
//! - `build_request` / `execute` / `parse` are separate steps; `request` and
//!   `command` chain them. The `Transport` trait is the only I/O seam.
//! - `Envelope` keeps `result` as raw JSON until the caller's target type is
//!   known, so a single envelope type serves every endpoint.
//! - No retries, pagination walking, rate limiting or caching.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::PAGE_PARAM;
pub use client::Client;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use endpoint::Endpoint;
pub use envelope::{Envelope, RawPayload};
pub use error::{DecodeError, Error, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{
    CreateToken, CreatedToken, Member, Node, Notification, NotificationMember, Profile, Reply, Supplement,
    TokenExpiration, TokenInfo, TokenScope, Topic, TopicSummary,
};
