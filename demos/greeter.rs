//! Greeter - dispatching JSON event envelopes.
//!
//! This example demonstrates:
//! - Declaring a service with typed request/response messages
//! - Building an adapter from service registrations
//! - Handling raw events the way an event-triggered host would deliver them
//!
//! Each line of stdin is treated as one event; the reply or error is written
//! to stdout as a single JSON line.
//!
//! ```text
//! $ echo '{"service":"Greeter","method":"Hello","data":{"name":"Ada"}}' \
//!     | cargo run --example greeter
//! {"value":{"message":"Hello, Ada!"}}
//! ```

use std::io::BufRead;
use std::sync::Arc;

use rpc_event_bridge::{CallContext, EventAdapter, HandlerError, ServiceDesc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Input structure for the Hello method.
#[derive(Deserialize, Debug)]
struct HelloRequest {
    name: String,
}

/// Output structure for the Hello method.
#[derive(Serialize, Debug)]
struct HelloReply {
    message: String,
}

/// The service implementation.
struct Greeter {
    greeting: String,
}

impl Greeter {
    async fn hello(&self, req: HelloRequest) -> Result<HelloReply, HandlerError> {
        if req.name.is_empty() {
            return Err("name must not be empty".into());
        }
        Ok(HelloReply {
            message: format!("{}, {}!", self.greeting, req.name),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let greeter = ServiceDesc::<Greeter>::new("Greeter")
        .method("Hello", |svc: Arc<Greeter>, _ctx, req: HelloRequest| async move {
            svc.hello(req).await
        })
        .bind(Arc::new(Greeter {
            greeting: "Hello".to_string(),
        }));

    let adapter = EventAdapter::builder().service(greeter).build()?;

    let stdin = std::io::stdin();
    for (n, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let ctx = CallContext::new().with_request_id(format!("line-{}", n + 1));
        let reply = match adapter.handle_event(line.as_bytes(), ctx).await {
            Ok(value) => json!({ "value": value }),
            Err(e) => json!({ "error": e.to_string() }),
        };
        println!("{reply}");
    }

    Ok(())
}
