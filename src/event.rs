//! Event envelope.
//!
//! Events arrive as JSON documents:
//!
//! ```text
//! {
//!   "package": "<optional, defaults to \"\">",
//!   "service": "<required>",
//!   "method":  "<required>",
//!   "data":    { ... optional, defaults to {} }
//! }
//! ```
//!
//! `null` counts as absent for every field; unknown fields are ignored.
//! The `data` member is kept as raw JSON text so it is decoded only once,
//! straight into the target method's input type.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::codec::EMPTY_PAYLOAD;
use crate::error::{BridgeError, Result};
use crate::handler::MethodId;

/// A request envelope naming a method and carrying its payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    /// Package of the target service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Target service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Target method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Raw JSON payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
}

impl Event {
    /// Create an event addressed to `service`/`method` with no package and no data.
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            package: None,
            service: Some(service.into()),
            method: Some(method.into()),
            data: None,
        }
    }

    /// Set the package.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Set the raw payload.
    pub fn with_data(mut self, data: Box<RawValue>) -> Self {
        self.data = Some(data);
        self
    }

    /// Parse an envelope from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidEvent`] if the bytes are not a JSON
    /// object of the envelope shape.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        // The derived visitor also reads arrays positionally; envelopes are objects only.
        match raw.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => {}
            Some(_) => {
                return Err(BridgeError::InvalidEvent(
                    "envelope is not a JSON object".to_string(),
                ))
            }
            None => return Err(BridgeError::InvalidEvent("empty envelope".to_string())),
        }

        serde_json::from_slice(raw).map_err(|e| BridgeError::InvalidEvent(e.to_string()))
    }

    /// Resolve the target method id and the raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingField`] if `service` or `method` is absent,
    /// checked in that order.
    pub fn route(&self) -> Result<(MethodId, &[u8])> {
        let service = self
            .service
            .as_deref()
            .ok_or(BridgeError::MissingField("service"))?;
        let method = self
            .method
            .as_deref()
            .ok_or(BridgeError::MissingField("method"))?;
        let package = self.package.as_deref().unwrap_or_default();

        let payload = self.data.as_deref().map_or(EMPTY_PAYLOAD, RawValue::get);

        Ok((MethodId::new(package, service, method), payload.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_envelope() {
        let raw = br#"{"package":"pkg","service":"Greeter","method":"Hello","data":{"name":"Ada"}}"#;
        let event = Event::parse(raw).unwrap();
        let (id, payload) = event.route().unwrap();

        assert_eq!(id.as_str(), "pkg.Greeter/Hello");
        assert_eq!(payload, br#"{"name":"Ada"}"#);
    }

    #[test]
    fn test_absent_package_gives_two_segments() {
        let event = Event::parse(br#"{"service":"Greeter","method":"Hello"}"#).unwrap();
        let (id, _) = event.route().unwrap();
        assert_eq!(id.as_str(), "Greeter/Hello");
    }

    #[test]
    fn test_absent_or_null_data_is_empty_object() {
        for raw in [
            &br#"{"service":"S","method":"M"}"#[..],
            &br#"{"service":"S","method":"M","data":null}"#[..],
        ] {
            let event = Event::parse(raw).unwrap();
            let (_, payload) = event.route().unwrap();
            assert_eq!(payload, b"{}");
        }
    }

    #[test]
    fn test_missing_service() {
        let event = Event::parse(br#"{"method":"Hello"}"#).unwrap();
        assert!(matches!(
            event.route(),
            Err(BridgeError::MissingField("service"))
        ));
    }

    #[test]
    fn test_missing_method() {
        let event = Event::parse(br#"{"service":"Greeter","method":null}"#).unwrap();
        assert!(matches!(
            event.route(),
            Err(BridgeError::MissingField("method"))
        ));
    }

    #[test]
    fn test_service_checked_before_method() {
        let event = Event::parse(b"{}").unwrap();
        assert!(matches!(
            event.route(),
            Err(BridgeError::MissingField("service"))
        ));
    }

    #[test]
    fn test_leading_whitespace_allowed() {
        let event = Event::parse(b" \r\n\t{\"service\":\"S\",\"method\":\"M\"}").unwrap();
        assert_eq!(event.route().unwrap().0.as_str(), "S/M");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let event =
            Event::parse(br#"{"service":"S","method":"M","requestId":"x"}"#).unwrap();
        assert!(event.route().is_ok());
    }

    #[test]
    fn test_invalid_event() {
        for raw in [
            &b"not json"[..],
            &b"[1, 2, 3]"[..],
            &br#"["", "Greeter", "Hello", {}]"#[..],
            &b"[]"[..],
            &b"\"Greeter/Hello\""[..],
            &b"null"[..],
            &br#"{"service": 42, "method": "M"}"#[..],
            &b""[..],
            &b"  \n"[..],
        ] {
            assert!(matches!(
                Event::parse(raw),
                Err(BridgeError::InvalidEvent(_))
            ));
        }
    }

    #[test]
    fn test_builder_serializes_to_envelope() {
        let data = RawValue::from_string(r#"{"x":1}"#.to_string()).unwrap();
        let event = Event::new("Svc", "Mtd").with_package("pkg").with_data(data);

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"package":"pkg","service":"Svc","method":"Mtd","data":{"x":1}}"#
        );
    }
}
