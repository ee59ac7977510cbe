//! Dispatcher - resolves a method id and runs its handler.
//!
//! ```text
//! invoke(id, payload, ctx)
//!   ├─ registry.lookup(id)      → MethodNotFound(id)
//!   ├─ decode payload as input  → Decode { id, .. }
//!   ├─ handler(service, ctx, input)
//!   │     └─ handler failure    → Handler(err), unchanged
//!   └─ output                   → returned as-is
//! ```
//!
//! There are no retries: every call runs the handler at most once. The
//! context is forwarded untouched; the dispatcher never inspects it.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::handler::{CallContext, MethodId, MethodRegistry};

/// Routes calls to the handlers in a [`MethodRegistry`].
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a fully built registry.
    pub fn new(registry: Arc<MethodRegistry>) -> Self {
        Self { registry }
    }

    /// Get the registry.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Invoke the method registered under `id` with a raw JSON payload.
    ///
    /// An empty payload is decoded as `{}`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::MethodNotFound`](crate::BridgeError::MethodNotFound) if `id` is not registered
    /// - [`BridgeError::Decode`](crate::BridgeError::Decode) if the payload does not fit the input type
    /// - [`BridgeError::Handler`](crate::BridgeError::Handler) carrying the handler's own error
    pub async fn invoke(&self, id: &MethodId, payload: &[u8], ctx: CallContext) -> Result<Value> {
        let binding = self.registry.lookup(id)?;

        tracing::debug!("Dispatching {} to service {}", id, binding.service());
        tracing::trace!("Payload for {} is {} bytes", id, payload.len());

        binding.call(id, payload, ctx).await
    }
}
