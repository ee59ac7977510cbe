//! # rpc-event-bridge
//!
//! Invoke in-process RPC service handlers from JSON events.
//!
//! Event-driven hosts deliver requests as JSON documents instead of over a
//! wire protocol. This crate routes such an event to the right service
//! method, decodes its payload into the method's input type, runs the
//! handler and hands back its output or error.
//!
//! ## Architecture
//!
//! ```text
//! EventAdapter ─► Dispatcher ─► MethodRegistry (lookup)
//!                                  └─► JsonCodec (decode) ─► handler
//! ```
//!
//! - **Registration** happens once, through [`EventAdapterBuilder`]
//! - **Dispatch** reads the registry without locks; adapters are cheap to clone
//! - **Context** ([`CallContext`]) is forwarded to handlers untouched
//!
//! No sockets are opened and no event loop is provided: delivering events
//! into the process is the host's job.
//!
//! ## Example
//!
//! ```ignore
//! use rpc_event_bridge::{CallContext, EventAdapter, HandlerError, ServiceDesc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let greeter = ServiceDesc::<Greeter>::new("Greeter")
//!         .method("Hello", |svc, _ctx, req: HelloRequest| async move {
//!             Ok::<_, HandlerError>(svc.hello(req))
//!         })
//!         .bind(Arc::new(Greeter));
//!
//!     let adapter = EventAdapter::builder().service(greeter).build()?;
//!
//!     let reply = adapter
//!         .handle_event(br#"{"service":"Greeter","method":"Hello","data":{"name":"Ada"}}"#, CallContext::new())
//!         .await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod event;
pub mod handler;

mod adapter;
mod dispatch;

pub use adapter::{AdapterConfig, EventAdapter, EventAdapterBuilder, DEFAULT_MAX_EVENT_SIZE};
pub use dispatch::Dispatcher;
pub use error::{BridgeError, HandlerError, Result};
pub use event::Event;
pub use handler::{CallContext, ContextError, MethodId, MethodRegistry, ServiceDesc, ServiceRegistration};
