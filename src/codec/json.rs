//! JSON codec for method payloads.
//!
//! Payloads are decoded straight into the input type a method declares, using
//! that type's serde schema as the mapping:
//!
//! - object fields map to struct fields by name
//!   (use `#[serde(rename_all = "camelCase")]` to follow the protobuf JSON names)
//! - `null` or absent `Option` fields become `None`
//! - numbers, strings, nested objects and arrays must match the field types
//! - unknown fields are rejected only if the type says `deny_unknown_fields`
//!
//! The unknown-field default is lenient. Protobuf JSON decoders reject
//! unknown fields by default, so message types that need that behaviour must
//! opt in with `#[serde(deny_unknown_fields)]`.
//!
//! An absent payload is the empty object `{}`, never a decode failure.
//!
//! # Example
//!
//! ```
//! use rpc_event_bridge::codec::JsonCodec;
//! use rpc_event_bridge::MethodId;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct HelloRequest {
//!     name: String,
//! }
//!
//! let id = MethodId::new("", "Greeter", "Hello");
//! let req: HelloRequest = JsonCodec::decode(&id, br#"{"name":"Ada"}"#).unwrap();
//! assert_eq!(req.name, "Ada");
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::handler::MethodId;

/// Payload used when an event carries no data.
pub const EMPTY_PAYLOAD: &str = "{}";

/// JSON codec for structured messages.
pub struct JsonCodec;

impl JsonCodec {
    /// Decode a raw payload into the input type of method `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Decode`] naming `id` if the bytes are not valid
    /// JSON for `T`.
    pub fn decode<T: DeserializeOwned>(id: &MethodId, raw: &[u8]) -> Result<T> {
        let raw = if raw.is_empty() {
            EMPTY_PAYLOAD.as_bytes()
        } else {
            raw
        };

        serde_json::from_slice(raw).map_err(|source| BridgeError::Decode {
            id: id.clone(),
            source,
        })
    }

    /// Encode a handler output as a JSON structured message.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Encode`] if the value cannot be represented as JSON
    /// (for example a map with non-string keys).
    #[inline]
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
        serde_json::to_value(value).map_err(BridgeError::Encode)
    }

    /// Encode a value as raw JSON text, ready to embed in an envelope.
    #[inline]
    pub fn encode_raw<T: Serialize + ?Sized>(value: &T) -> Result<Box<RawValue>> {
        serde_json::value::to_raw_value(value).map_err(BridgeError::Encode)
    }
}
