//! Service descriptors and the type-erased handler capability.
//!
//! A [`ServiceDesc`] is the static description of one RPC service: its name
//! and an ordered list of methods, each with a typed handler entry point.
//! Binding it to a shared service instance yields a [`ServiceRegistration`],
//! the unit the registry consumes.
//!
//! Each method is stored behind the one-method [`Handler`] trait: given the
//! method id, a raw JSON payload and the call context, it decodes the
//! method's declared input type, runs the handler and encodes the output.
//!
//! # Example
//!
//! ```ignore
//! let desc = ServiceDesc::<Greeter>::new("helloworld.Greeter")
//!     .method("SayHello", |svc, _ctx, req: HelloRequest| async move {
//!         svc.say_hello(req).await
//!     });
//!
//! let registration = desc.bind(Arc::new(Greeter::default()));
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{CallContext, MethodId};
use crate::codec::JsonCodec;
use crate::error::{BridgeError, HandlerError, Result};

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A callable method bound to its service instance.
pub trait Handler: Send + Sync + 'static {
    /// Decode `payload`, invoke the method and encode its output.
    fn call(&self, id: &MethodId, payload: &[u8], ctx: CallContext)
        -> BoxFuture<'static, Result<Value>>;
}

/// A method implementation for service type `S`, not yet bound to an instance.
pub trait ServiceMethod<S>: Send + Sync + 'static {
    /// Decode `payload` and invoke the method on `service`.
    fn call(
        &self,
        service: Arc<S>,
        id: &MethodId,
        payload: &[u8],
        ctx: CallContext,
    ) -> BoxFuture<'static, Result<Value>>;
}

/// Wrapper that deserializes the payload before calling the handler.
pub struct TypedMethod<F, I, O, E, Fut> {
    handler: F,
    _phantom: PhantomData<fn(I) -> (O, E, Fut)>,
}

impl<F, I, O, E, Fut> TypedMethod<F, I, O, E, Fut> {
    /// Create a new typed method.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<S, F, I, O, E, Fut> ServiceMethod<S> for TypedMethod<F, I, O, E, Fut>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, CallContext, I) -> Fut + Send + Sync + 'static,
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    E: Into<HandlerError> + Send + 'static,
    Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
{
    fn call(
        &self,
        service: Arc<S>,
        id: &MethodId,
        payload: &[u8],
        ctx: CallContext,
    ) -> BoxFuture<'static, Result<Value>> {
        let input: I = match JsonCodec::decode(id, payload) {
            Ok(v) => v,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        let fut = (self.handler)(service, ctx, input);
        Box::pin(async move {
            let output = fut.await.map_err(BridgeError::handler)?;
            JsonCodec::encode(&output)
        })
    }
}

/// Descriptor for one method of a service.
pub struct MethodDesc<S> {
    /// Method name as it appears in the method id.
    name: String,
    /// Handler entry point.
    handler: Arc<dyn ServiceMethod<S>>,
}

impl<S> MethodDesc<S> {
    /// Get the method name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S> Clone for MethodDesc<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: self.handler.clone(),
        }
    }
}

/// Static description of an RPC service.
pub struct ServiceDesc<S> {
    /// Service name, possibly package-qualified (`"pkg.Service"`).
    name: String,
    /// Methods in declaration order.
    methods: Vec<MethodDesc<S>>,
}

impl<S: Send + Sync + 'static> ServiceDesc<S> {
    /// Create a descriptor with no methods.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Declare a method.
    ///
    /// The handler receives the shared service instance, the caller's context
    /// untouched, and the payload decoded into `I`. Its output `O` is encoded
    /// back to JSON; its error `E` reaches the caller unchanged.
    pub fn method<F, I, O, E, Fut>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Arc<S>, CallContext, I) -> Fut + Send + Sync + 'static,
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        E: Into<HandlerError> + Send + 'static,
        Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
    {
        self.methods.push(MethodDesc {
            name: name.to_string(),
            handler: Arc::new(TypedMethod::new(handler)),
        });
        self
    }

    /// Declare a method with a hand-written [`ServiceMethod`].
    pub fn raw_method<M: ServiceMethod<S>>(mut self, name: &str, method: M) -> Self {
        self.methods.push(MethodDesc {
            name: name.to_string(),
            handler: Arc::new(method),
        });
        self
    }

    /// Get the service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the methods in declaration order.
    pub fn methods(&self) -> &[MethodDesc<S>] {
        &self.methods
    }

    /// Bind the descriptor to a service instance.
    pub fn bind(self, server: Arc<S>) -> ServiceRegistration {
        ServiceRegistration::new(self, server)
    }
}

impl<S> Clone for ServiceDesc<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            methods: self.methods.clone(),
        }
    }
}

/// A method paired with the instance that serves it.
struct BoundMethod<S> {
    server: Arc<S>,
    method: Arc<dyn ServiceMethod<S>>,
}

impl<S: Send + Sync + 'static> Handler for BoundMethod<S> {
    fn call(
        &self,
        id: &MethodId,
        payload: &[u8],
        ctx: CallContext,
    ) -> BoxFuture<'static, Result<Value>> {
        self.method.call(self.server.clone(), id, payload, ctx)
    }
}

/// A service descriptor bound to its instance, ready for registration.
pub struct ServiceRegistration {
    /// Service name from the descriptor.
    service_name: String,
    /// `(method name, handler)` in declaration order.
    methods: Vec<(String, Arc<dyn Handler>)>,
}

impl ServiceRegistration {
    /// Bind `desc` to `server`.
    pub fn new<S: Send + Sync + 'static>(desc: ServiceDesc<S>, server: Arc<S>) -> Self {
        let methods = desc
            .methods
            .into_iter()
            .map(|m| {
                let bound: Arc<dyn Handler> = Arc::new(BoundMethod {
                    server: server.clone(),
                    method: m.handler,
                });
                (m.name, bound)
            })
            .collect();

        Self {
            service_name: desc.name,
            methods,
        }
    }

    /// Get the service name.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Iterate method names in declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(String, Arc<dyn Handler>)>) {
        (self.service_name, self.methods)
    }
}

impl std::fmt::Debug for ServiceRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistration")
            .field("service_name", &self.service_name)
            .field("methods", &self.method_names().collect::<Vec<_>>())
            .finish()
    }
}
