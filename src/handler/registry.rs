//! Method registry for resolving method ids to handlers.
//!
//! The registry is filled once at startup from a set of
//! [`ServiceRegistration`]s and is read-only afterwards, so it can be shared
//! behind an `Arc` and read concurrently without locks.
//!
//! Every method is keyed by `MethodId::new("", service_name, method_name)`.
//! Descriptors carry the qualified service name, so an event addressed to
//! package `pkg`, service `Svc` finds a method registered under `pkg.Svc`.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = MethodRegistry::new();
//! registry.register([greeter_desc.bind(Arc::new(Greeter))]);
//!
//! let binding = registry.lookup(&MethodId::new("", "Greeter", "Hello"))?;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use super::{BoxFuture, CallContext, Handler, MethodId, ServiceRegistration};
use crate::error::{BridgeError, Result};

/// A registered method: its metadata and the handler bound to its service.
#[derive(Clone)]
pub struct HandlerBinding {
    /// Service name from the descriptor.
    service: Arc<str>,
    /// Method name from the descriptor.
    method: String,
    /// Handler holding a shared reference to the service instance.
    handler: Arc<dyn Handler>,
}

impl HandlerBinding {
    /// Get the service name.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Get the method name.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Invoke the bound handler.
    #[inline]
    pub fn call(
        &self,
        id: &MethodId,
        payload: &[u8],
        ctx: CallContext,
    ) -> BoxFuture<'static, Result<Value>> {
        self.handler.call(id, payload, ctx)
    }
}

impl std::fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("service", &self.service)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Registry mapping method ids to handler bindings.
#[derive(Default)]
pub struct MethodRegistry {
    /// Bindings by canonical id.
    bindings: HashMap<MethodId, HandlerBinding>,
}

impl MethodRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every method of every service.
    ///
    /// A method whose id is already present replaces the earlier binding;
    /// the last registration wins.
    pub fn register<I>(&mut self, registrations: I)
    where
        I: IntoIterator<Item = ServiceRegistration>,
    {
        for registration in registrations {
            let (service, methods) = registration.into_parts();
            let service: Arc<str> = Arc::from(service);

            for (method, handler) in methods {
                let id = MethodId::new("", &service, &method);
                let binding = HandlerBinding {
                    service: service.clone(),
                    method,
                    handler,
                };

                if self.bindings.insert(id.clone(), binding).is_some() {
                    tracing::warn!("Registration for {} replaced an earlier binding", id);
                } else {
                    tracing::debug!("Registered method {}", id);
                }
            }
        }
    }

    /// Register like [`register`](Self::register), but refuse duplicates.
    ///
    /// Fails with [`BridgeError::DuplicateMethod`] if a method id is already
    /// registered or occurs twice in `registrations`. Nothing is registered
    /// on failure.
    pub fn try_register<I>(&mut self, registrations: I) -> Result<()>
    where
        I: IntoIterator<Item = ServiceRegistration>,
    {
        let registrations: Vec<_> = registrations.into_iter().collect();

        let mut seen = HashSet::new();
        for registration in &registrations {
            for method in registration.method_names() {
                let id = MethodId::new("", registration.service_name(), method);
                if self.bindings.contains_key(&id) || !seen.insert(id.clone()) {
                    return Err(BridgeError::DuplicateMethod(id));
                }
            }
        }

        self.register(registrations);
        Ok(())
    }

    /// Get the binding for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MethodNotFound`] if nothing is registered
    /// under `id`.
    pub fn lookup(&self, id: &MethodId) -> Result<&HandlerBinding> {
        self.bindings
            .get(id)
            .ok_or_else(|| BridgeError::MethodNotFound(id.clone()))
    }

    /// Check whether `id` is registered.
    pub fn contains(&self, id: &MethodId) -> bool {
        self.bindings.contains_key(id)
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All registered method ids, sorted.
    pub fn method_ids(&self) -> Vec<MethodId> {
        let mut ids: Vec<_> = self.bindings.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.method_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handler::ServiceDesc;

    /// A service whose single method reports which instance served it.
    fn tagged(service: &str, method: &str, tag: &'static str) -> ServiceRegistration {
        ServiceDesc::<&'static str>::new(service)
            .method(method, |svc: Arc<&'static str>, _ctx, _: Value| async move {
                Ok::<_, HandlerError>(*svc)
            })
            .bind(Arc::new(tag))
    }

    async fn served_by(registry: &MethodRegistry, id: &MethodId) -> Value {
        registry
            .lookup(id)
            .unwrap()
            .call(id, b"{}", CallContext::new())
            .await
            .unwrap()
    }

    #[test]
    fn test_register_methods() {
        let mut registry = MethodRegistry::new();
        registry.register([tagged("Greeter", "Hello", "a")]);

        let id = MethodId::new("", "Greeter", "Hello");
        let binding = registry.lookup(&id).unwrap();
        assert_eq!(binding.service(), "Greeter");
        assert_eq!(binding.method(), "Hello");
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_distinct_services_do_not_collide() {
        let mut registry = MethodRegistry::new();
        registry.register([
            tagged("Greeter", "Hello", "a"),
            tagged("Farewell", "Hello", "b"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.method_ids(),
            vec![
                MethodId::new("", "Farewell", "Hello"),
                MethodId::new("", "Greeter", "Hello"),
            ]
        );
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut registry = MethodRegistry::new();
        registry.register([tagged("Greeter", "Hello", "first")]);
        registry.register([tagged("Greeter", "Hello", "second")]);

        let id = MethodId::new("", "Greeter", "Hello");
        assert_eq!(registry.len(), 1);
        assert_eq!(served_by(&registry, &id).await, "second");
    }

    #[tokio::test]
    async fn test_last_registration_wins_within_batch() {
        let mut registry = MethodRegistry::new();
        registry.register([
            tagged("Greeter", "Hello", "first"),
            tagged("Greeter", "Hello", "second"),
        ]);

        let id = MethodId::new("", "Greeter", "Hello");
        assert_eq!(served_by(&registry, &id).await, "second");
    }

    #[test]
    fn test_lookup_not_found() {
        let registry = MethodRegistry::new();
        let id = MethodId::new("", "Greeter", "Bye");

        match registry.lookup(&id) {
            Err(BridgeError::MethodNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected MethodNotFound, got {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registered_under_empty_package() {
        let mut registry = MethodRegistry::new();
        registry.register([tagged("helloworld.Greeter", "Hello", "a")]);

        assert!(registry.contains(&MethodId::new("helloworld", "Greeter", "Hello")));
        assert!(!registry.contains(&MethodId::new("", "Greeter", "Hello")));
    }

    #[tokio::test]
    async fn test_try_register_rejects_existing() {
        let mut registry = MethodRegistry::new();
        registry.register([tagged("Greeter", "Hello", "first")]);

        let err = registry
            .try_register([tagged("Greeter", "Hello", "second")])
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateMethod(_)));

        let id = MethodId::new("", "Greeter", "Hello");
        assert_eq!(served_by(&registry, &id).await, "first");
    }

    #[test]
    fn test_try_register_is_all_or_nothing() {
        let mut registry = MethodRegistry::new();
        let err = registry
            .try_register([
                tagged("Greeter", "Hello", "a"),
                tagged("Farewell", "Bye", "b"),
                tagged("Greeter", "Hello", "c"),
            ])
            .unwrap_err();

        match err {
            BridgeError::DuplicateMethod(id) => assert_eq!(id.as_str(), "Greeter/Hello"),
            other => panic!("expected DuplicateMethod, got {other:?}"),
        }
        assert!(registry.is_empty());
    }
}
