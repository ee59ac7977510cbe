//! Handler module - service descriptors, method registry and call context.
//!
//! Provides:
//! - [`MethodId`] - canonical `(package, service, method)` key
//! - [`ServiceDesc`] / [`ServiceRegistration`] - declared services bound to instances
//! - [`MethodRegistry`] - maps method ids to handler bindings
//! - [`CallContext`] - cancellation/deadline/trace data forwarded to handlers
//!
//! # Example
//!
//! ```ignore
//! use rpc_event_bridge::handler::{MethodRegistry, ServiceDesc};
//!
//! let greeter = ServiceDesc::<Greeter>::new("Greeter")
//!     .method("Hello", |svc, _ctx, req: HelloRequest| async move {
//!         Ok::<_, HandlerError>(svc.hello(req))
//!     })
//!     .bind(Arc::new(Greeter));
//!
//! let mut registry = MethodRegistry::new();
//! registry.register([greeter]);
//! ```

mod context;
mod method_id;
mod registry;
mod service;

pub use context::{CallContext, ContextError};
pub use method_id::MethodId;
pub use registry::{HandlerBinding, MethodRegistry};
pub use service::{
    BoxFuture, Handler, MethodDesc, ServiceDesc, ServiceMethod, ServiceRegistration, TypedMethod,
};
