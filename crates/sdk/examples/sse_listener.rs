//! Streams events from a node's main SSE channel and logs them.
//!
//! Usage: `cargo run --example sse_listener -- http://localhost:9999`

use futures::StreamExt;
use tracing::{error, info};

use casper_sdk::sse::{self, config::ListenerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let node_address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:9999".to_string());

    let config = ListenerConfig::builder()
        .with_node_address(node_address)
        .with_timestamp_path("last_event_id.txt")
        .build()?;

    let events = sse::listener(config).await?;
    futures::pin_mut!(events);

    while let Some(event) = events.next().await {
        match event {
            Ok(event) => info!(?event, "received event"),
            Err(err) => error!(%err, "listener error"),
        }
    }

    Ok(())
}
