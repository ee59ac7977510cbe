//! Event adapter builder and entry points.
//!
//! The [`EventAdapterBuilder`] collects service registrations and settings;
//! [`EventAdapter`] is the finished, read-only front door:
//!
//! 1. `handle_event` - parse a raw JSON envelope and dispatch it
//! 2. `invoke` - call a method directly with any serializable value
//!
//! Both entry points build an [`Event`] and share the same dispatch path,
//! so decode and routing behave identically whichever one the caller uses.
//!
//! # Example
//!
//! ```ignore
//! use rpc_event_bridge::{CallContext, EventAdapter};
//!
//! let adapter = EventAdapter::builder()
//!     .service(greeter_desc.bind(Arc::new(Greeter)))
//!     .build()?;
//!
//! let reply = adapter
//!     .handle_event(br#"{"service":"Greeter","method":"Hello","data":{"name":"Ada"}}"#, CallContext::new())
//!     .await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::codec::JsonCodec;
use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, Result};
use crate::event::Event;
use crate::handler::{CallContext, MethodId, MethodRegistry, ServiceRegistration};

/// Default limit on raw event size (6 MiB).
pub const DEFAULT_MAX_EVENT_SIZE: usize = 6 * 1024 * 1024;

/// Settings for an [`EventAdapter`].
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Refuse duplicate method registrations instead of letting the last one win.
    pub strict_registration: bool,
    /// Largest raw event accepted by `handle_event`, in bytes.
    pub max_event_size: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            strict_registration: false,
            max_event_size: DEFAULT_MAX_EVENT_SIZE,
        }
    }
}

/// Builder for configuring and creating an [`EventAdapter`].
#[derive(Debug, Default)]
pub struct EventAdapterBuilder {
    registrations: Vec<ServiceRegistration>,
    config: AdapterConfig,
}

impl EventAdapterBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service.
    pub fn service(mut self, registration: ServiceRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    /// Add several services.
    pub fn services<I>(mut self, registrations: I) -> Self
    where
        I: IntoIterator<Item = ServiceRegistration>,
    {
        self.registrations.extend(registrations);
        self
    }

    /// Fail [`build`](Self::build) on duplicate method ids.
    ///
    /// Default: false (the last registration wins)
    pub fn strict_registration(mut self, strict: bool) -> Self {
        self.config.strict_registration = strict;
        self
    }

    /// Set the largest raw event `handle_event` accepts.
    ///
    /// Default: 6 MiB
    pub fn max_event_size(mut self, bytes: usize) -> Self {
        self.config.max_event_size = bytes;
        self
    }

    /// Build the registry and the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::DuplicateMethod`] in strict mode when two
    /// registrations share a method id.
    pub fn build(self) -> Result<EventAdapter> {
        let mut registry = MethodRegistry::new();
        if self.config.strict_registration {
            registry.try_register(self.registrations)?;
        } else {
            registry.register(self.registrations);
        }

        tracing::debug!("Event adapter ready with {} methods", registry.len());

        let dispatcher = Dispatcher::new(Arc::new(registry));
        Ok(EventAdapter::with_config(dispatcher, self.config))
    }
}

/// Translates event envelopes and direct calls into dispatches.
///
/// Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct EventAdapter {
    dispatcher: Dispatcher,
    config: AdapterConfig,
}

impl EventAdapter {
    /// Create a new adapter builder.
    pub fn builder() -> EventAdapterBuilder {
        EventAdapterBuilder::new()
    }

    /// Wrap an existing dispatcher with default settings.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_config(dispatcher, AdapterConfig::default())
    }

    /// Wrap an existing dispatcher.
    pub fn with_config(dispatcher: Dispatcher, config: AdapterConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Get the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Get the registry.
    pub fn registry(&self) -> &MethodRegistry {
        self.dispatcher.registry()
    }

    /// Get the settings.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Parse a raw JSON envelope and dispatch it.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::InvalidEvent`] if the bytes are not an envelope or exceed `max_event_size`
    /// - [`BridgeError::MissingField`] if `service` or `method` is absent
    /// - anything [`Dispatcher::invoke`] returns, unchanged
    pub async fn handle_event(&self, raw_event: &[u8], ctx: CallContext) -> Result<Value> {
        if raw_event.len() > self.config.max_event_size {
            return Err(BridgeError::InvalidEvent(format!(
                "event is {} bytes, limit is {}",
                raw_event.len(),
                self.config.max_event_size
            )));
        }

        let event = Event::parse(raw_event)?;
        self.dispatch_event(&event, ctx).await
    }

    /// Dispatch an already parsed envelope.
    pub async fn dispatch_event(&self, event: &Event, ctx: CallContext) -> Result<Value> {
        let (id, payload) = event.route()?;
        self.dispatcher.invoke(&id, payload, ctx).await
    }

    /// Call a method directly with a serializable value.
    ///
    /// `value` is serialized to JSON and wrapped in an envelope, then takes
    /// exactly the same path as [`handle_event`](Self::handle_event). An
    /// empty `package` yields the two-segment method id.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Encode`] if `value` cannot be serialized, otherwise as
    /// [`dispatch_event`](Self::dispatch_event).
    pub async fn invoke<T>(
        &self,
        package: &str,
        service: &str,
        method: &str,
        value: &T,
        ctx: CallContext,
    ) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let event = Event::new(service, method)
            .with_package(package)
            .with_data(JsonCodec::encode_raw(value)?);

        self.dispatch_event(&event, ctx).await
    }

    /// Like [`invoke`](Self::invoke), decoding the output into `O`.
    ///
    /// # Errors
    ///
    /// As [`invoke`](Self::invoke), plus [`BridgeError::Decode`] if the
    /// output does not fit `O`.
    pub async fn call<T, O>(
        &self,
        package: &str,
        service: &str,
        method: &str,
        value: &T,
        ctx: CallContext,
    ) -> Result<O>
    where
        T: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let output = self.invoke(package, service, method, value, ctx).await?;

        serde_json::from_value(output).map_err(|source| BridgeError::Decode {
            id: MethodId::new(package, service, method),
            source,
        })
    }
}
