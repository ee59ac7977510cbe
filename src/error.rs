//! Error types for rpc-event-bridge.

use thiserror::Error;

use crate::handler::MethodId;

/// Boxed error returned by handler implementations.
///
/// Handlers may fail with any error type; the bridge carries it through
/// untouched so callers can downcast to the original type.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The raw event could not be parsed as an envelope.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// A required envelope field (`service` or `method`) is absent.
    #[error("event missing {0}")]
    MissingField(&'static str),

    /// No handler is registered for the resolved method.
    #[error("method handler not found - {0}")]
    MethodNotFound(MethodId),

    /// The payload does not conform to the method's input type.
    #[error("invalid input data for method ({id}): {source}")]
    Decode {
        /// Method the payload was addressed to.
        id: MethodId,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Failure raised by the handler itself, carried unchanged.
    #[error(transparent)]
    Handler(HandlerError),

    /// A value or handler output could not be serialized to JSON.
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Strict registration found two bindings for the same method.
    #[error("duplicate method registration: {0}")]
    DuplicateMethod(MethodId),
}

impl BridgeError {
    /// Wrap a handler failure.
    pub fn handler<E: Into<HandlerError>>(err: E) -> Self {
        Self::Handler(err.into())
    }

    /// True for [`BridgeError::MethodNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MethodNotFound(_))
    }

    /// Borrow the handler's own error, if this is a handler failure.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Take the handler's own error, if this is a handler failure.
    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            Self::Handler(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("quota exhausted")]
    struct QuotaExhausted;

    #[test]
    fn test_handler_error_is_transparent() {
        let err = BridgeError::handler(QuotaExhausted);
        assert_eq!(err.to_string(), "quota exhausted");
        assert!(err
            .handler_error()
            .and_then(|e| e.downcast_ref::<QuotaExhausted>())
            .is_some());
    }

    #[test]
    fn test_not_found_message_names_method() {
        let err = BridgeError::MethodNotFound(MethodId::new("", "Greeter", "Bye"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "method handler not found - Greeter/Bye");
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            BridgeError::MissingField("service").to_string(),
            "event missing service"
        );
    }

    #[test]
    fn test_into_handler_error_on_other_variants() {
        assert!(BridgeError::MissingField("method")
            .into_handler_error()
            .is_none());
    }
}
