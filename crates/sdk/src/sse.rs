//! SSE (Server-Sent Events) listener for a Casper node's event stream.

pub mod config;
pub mod event;

use std::path::PathBuf;

use async_stream::stream;
use futures::{Stream, StreamExt};
use reqwest_eventsource::{Event, EventSource};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::sse::config::ListenerConfig;
use crate::sse::event::{BlockAdded, DeployProcessed, SseEvent};

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("unexpected SSE event type: {0}")]
    UnexpectedEventType(String),
    #[error("failed to decode SSE event payload: {head}")]
    Decode {
        head: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid SSE endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("event source error: {0}")]
    EventSource(#[from] reqwest_eventsource::Error),
    #[error("blocking task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Connects to the configured channel and yields its events as a stream.
///
/// When a timestamp path is configured, the last seen event id is read from
/// it on start (and passed as `start_from`) and written back as events
/// arrive, so a restarted listener resumes where it left off.
pub async fn listener(
    config: ListenerConfig,
) -> Result<impl Stream<Item = Result<SseEvent, ListenerError>>, ListenerError> {
    info!("Starting listener for {}", config.endpoint());

    let endpoint = config.endpoint();
    let timestamp_path = config.timestamp_path().map(PathBuf::from);

    let mut url = Url::parse(&endpoint)?;
    if let Some(timestamp_path) = timestamp_path.as_deref() {
        match tokio::fs::read_to_string(timestamp_path).await {
            Ok(content) => {
                let last_id = content.trim();
                if last_id.is_empty() {
                    debug!("Timestamp file is empty, starting without start_from");
                } else {
                    url.query_pairs_mut().append_pair("start_from", last_id);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "Timestamp file not found at {}, starting without start_from",
                    timestamp_path.display()
                );
            }
            Err(err) => {
                warn!(
                    "Failed to read timestamp file at {}: {:?}",
                    timestamp_path.display(),
                    err
                );
            }
        }
    }

    let endpoint_url = url.to_string();
    let (tx, mut rx) = mpsc::channel::<Result<SseEvent, ListenerError>>(256);
    let (raw_tx, mut raw_rx) = mpsc::channel::<String>(256);

    let parse_sender = tx.clone();

    // Task to parse raw event data into SseEvent
    tokio::spawn(async move {
        while let Some(data) = raw_rx.recv().await {
            let parse_result = match tokio::task::spawn_blocking(move || {
                let head = data.chars().take(100).collect::<String>();
                serde_json::from_str::<SseEvent>(&data)
                    .map_err(|source| ListenerError::Decode { head, source })
            })
            .await
            {
                Ok(result) => result,
                Err(err) => Err(ListenerError::TaskJoin(err)),
            };
            let _ = parse_sender.send(parse_result).await;
        }
    });

    // Task to receive events from the SSE endpoint
    tokio::spawn(async move {
        let mut es = EventSource::get(endpoint_url);
        trace!("Starting to receive events");

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Open) => {
                    info!("Connection opened");
                }
                Ok(Event::Message(message)) => {
                    if message.event != "message" {
                        let _ = tx
                            .send(Err(ListenerError::UnexpectedEventType(message.event)))
                            .await;
                        break;
                    }

                    if let Some(timestamp_path) = timestamp_path.as_ref() {
                        if message.id.is_empty() {
                            debug!("Skipping timestamp write; message id is empty");
                        } else if let Err(err) =
                            tokio::fs::write(timestamp_path, message.id.clone()).await
                        {
                            error!("Failed to write event id to file: {:?}", err);
                        }
                    }

                    // Hand the raw payload to the parser task; ordering is
                    // kept by the channel and huge JSONs never stall the
                    // SSE stream.
                    if raw_tx.send(message.data).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    error!("Error receiving event: {:?}", err);
                    let _ = tx.send(Err(ListenerError::EventSource(err))).await;
                    break;
                }
            }
        }

        trace!("Event stream ended");
    });

    Ok(stream! {
        while let Some(item) = rx.recv().await {
            yield item;
        }
    })
}

/// Waits on the main channel for the given deploy to be processed.
///
/// Returns `None` if the stream ends first.
pub async fn await_deploy<S>(mut events: S, deploy_hash: &str) -> Option<DeployProcessed>
where
    S: Stream<Item = Result<SseEvent, ListenerError>> + Unpin,
{
    while let Some(event) = events.next().await {
        if let Ok(SseEvent::DeployProcessed(processed)) = event {
            if processed.deploy_hash == deploy_hash {
                return Some(processed);
            }
        }
    }
    None
}

/// Waits for `n` blocks to be added and returns the last one.
pub async fn await_n_blocks<S>(mut events: S, n: usize) -> Option<BlockAdded>
where
    S: Stream<Item = Result<SseEvent, ListenerError>> + Unpin,
{
    let mut seen = 0;
    while let Some(event) = events.next().await {
        if let Ok(SseEvent::BlockAdded(block_added)) = event {
            seen += 1;
            if seen == n {
                return Some(block_added);
            }
        }
    }
    None
}

/// Waits for `n` era transitions and returns the first block of the last
/// new era.
pub async fn await_n_eras<S>(mut events: S, n: usize) -> Option<BlockAdded>
where
    S: Stream<Item = Result<SseEvent, ListenerError>> + Unpin,
{
    let mut current_era = 0;
    let mut eras_passed = 0;
    while let Some(event) = events.next().await {
        if let Ok(SseEvent::BlockAdded(block_added)) = event {
            if block_added.block.header.era_id > current_era {
                current_era = block_added.block.header.era_id;
                eras_passed += 1;
                if eras_passed > n {
                    return Some(block_added);
                }
            }
        }
    }
    None
}

/// Waits for the block with the given height.
pub async fn await_until_block<S>(mut events: S, height: u64) -> Option<BlockAdded>
where
    S: Stream<Item = Result<SseEvent, ListenerError>> + Unpin,
{
    while let Some(event) = events.next().await {
        if let Ok(SseEvent::BlockAdded(block_added)) = event {
            if block_added.block.header.height == height {
                return Some(block_added);
            }
        }
    }
    None
}

/// Waits for the first block of the given era.
pub async fn await_until_era<S>(mut events: S, era_id: u64) -> Option<BlockAdded>
where
    S: Stream<Item = Result<SseEvent, ListenerError>> + Unpin,
{
    while let Some(event) = events.next().await {
        if let Ok(SseEvent::BlockAdded(block_added)) = event {
            if block_added.block.header.era_id == era_id {
                return Some(block_added);
            }
        }
    }
    None
}
