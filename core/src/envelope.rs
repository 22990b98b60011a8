//! The `{success, message, result}` wrapper every API response shares.
//!
//! Decoding happens in two phases. `Envelope::decode` parses the wrapper and
//! keeps `result` as unparsed JSON text; `Envelope::into_typed` then decodes
//! that text into whatever the caller asked for. One envelope type therefore
//! serves every endpoint, and a malformed wrapper is reported separately from
//! a malformed payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::error::{DecodeError, Error};

/// Undecoded `result` slot.
pub type RawPayload = Box<RawValue>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<R = RawPayload> {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default)]
    pub result: Option<R>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Envelope {
    /// First phase: parse the wrapper, leaving `result` opaque.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::Envelope)
    }

    /// Second phase: decode `result` into `T`.
    ///
    /// A missing or `null` result stays `None` unless `T` itself accepts
    /// `null` (`()`, `Option<_>`), in which case it becomes that value.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Envelope<T>, DecodeError> {
        let result = match self.result {
            Some(raw) => Some(serde_json::from_str(raw.get()).map_err(DecodeError::Payload)?),
            None => serde_json::from_value(serde_json::Value::Null).ok(),
        };
        Ok(Envelope {
            success: self.success,
            message: self.message,
            result,
        })
    }
}

impl<R> Envelope<R> {
    pub fn success(result: R) -> Self {
        Envelope {
            success: true,
            message: String::new(),
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            message: message.into(),
            result: None,
        }
    }

    /// Turn `success: false` into `Error::Api` carrying the server message.
    pub fn ensure_success(self) -> Result<Self, Error> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::Api {
                message: self.message,
            })
        }
    }

    pub fn into_result(self) -> Result<R, DecodeError> {
        self.result.ok_or(DecodeError::MissingResult)
    }
}

impl<R: Serialize> Envelope<R> {
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
