//! Direct invoke - calling methods in-process without an envelope.
//!
//! This example demonstrates:
//! - Registering a package-qualified service
//! - Calling it with `invoke` (JSON output) and `call` (typed output)
//! - Passing a deadline and cancellation token through `CallContext`

use std::sync::Arc;
use std::time::Duration;

use rpc_event_bridge::{CallContext, ContextError, EventAdapter, HandlerError, ServiceDesc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

#[derive(Deserialize, Debug)]
struct Push {
    item: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct Depth {
    depth: usize,
}

#[derive(Deserialize, Debug)]
struct Wait {
    millis: u64,
}

#[derive(Default)]
struct Stack {
    items: Mutex<Vec<String>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stack = ServiceDesc::<Stack>::new("demo.Stack")
        .method("Push", |svc: Arc<Stack>, _ctx, req: Push| async move {
            let mut items = svc.items.lock().await;
            items.push(req.item);
            Ok::<_, HandlerError>(Depth { depth: items.len() })
        })
        .method("Wait", |_svc: Arc<Stack>, ctx: CallContext, req: Wait| async move {
            ctx.run(tokio::time::sleep(Duration::from_millis(req.millis)))
                .await?;
            Ok::<_, ContextError>(json!({ "waited": req.millis }))
        })
        .bind(Arc::new(Stack::default()));

    let adapter = EventAdapter::builder()
        .strict_registration(true)
        .service(stack)
        .build()?;

    let out = adapter
        .invoke("demo", "Stack", "Push", &json!({ "item": "a" }), CallContext::new())
        .await?;
    println!("Push -> {out}");

    let depth: Depth = adapter
        .call("demo", "Stack", "Push", &json!({ "item": "b" }), CallContext::new())
        .await?;
    println!("Push -> depth {}", depth.depth);

    let ctx = CallContext::new().with_timeout(Duration::from_millis(10));
    match adapter
        .invoke("demo", "Stack", "Wait", &json!({ "millis": 1000 }), ctx)
        .await
    {
        Ok(out) => println!("Wait -> {out}"),
        Err(e) => println!("Wait failed: {e}"),
    }

    Ok(())
}
