use std::path::{Path, PathBuf};

use thiserror::Error;

/// The three SSE channels a node exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventChannel {
    /// `/events/main`: blocks, processed deploys, faults, steps.
    Main,
    /// `/events/deploys`: accepted deploys.
    Deploys,
    /// `/events/sigs`: finality signatures.
    Sigs,
}

impl EventChannel {
    pub fn path(self) -> &'static str {
        match self {
            EventChannel::Main => "/events/main",
            EventChannel::Deploys => "/events/deploys",
            EventChannel::Sigs => "/events/sigs",
        }
    }
}

#[derive(Debug, Error)]
pub enum ListenerConfigError {
    #[error("missing SSE node address")]
    MissingNodeAddress,
}

/// Configuration for the SSE listener.
#[derive(Clone, Debug)]
pub struct ListenerConfig {
    node_address: String,
    channel: EventChannel,
    timestamp_path: Option<PathBuf>,
}

impl ListenerConfig {
    pub fn builder() -> ListenerConfigBuilder {
        ListenerConfigBuilder::new()
    }

    /// The full endpoint URL for the configured channel.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.node_address, self.channel.path())
    }

    pub fn channel(&self) -> EventChannel {
        self.channel
    }

    /// Optional file the listener reads the last event id from on start
    /// (for `start_from`) and keeps updated while events arrive.
    pub fn timestamp_path(&self) -> Option<&Path> {
        self.timestamp_path.as_deref()
    }
}

#[derive(Debug)]
pub struct ListenerConfigBuilder {
    node_address: Option<String>,
    channel: EventChannel,
    timestamp_path: Option<PathBuf>,
}

impl Default for ListenerConfigBuilder {
    fn default() -> Self {
        ListenerConfigBuilder {
            node_address: None,
            channel: EventChannel::Main,
            timestamp_path: None,
        }
    }
}

impl ListenerConfigBuilder {
    pub fn new() -> ListenerConfigBuilder {
        ListenerConfigBuilder::default()
    }

    /// The node's event-stream address without a path, e.g.
    /// `http://localhost:9999`.
    pub fn with_node_address(mut self, address: impl Into<String>) -> ListenerConfigBuilder {
        self.node_address = Some(address.into());
        self
    }

    pub fn with_channel(mut self, channel: EventChannel) -> ListenerConfigBuilder {
        self.channel = channel;
        self
    }

    pub fn with_timestamp_path(mut self, path: impl Into<PathBuf>) -> ListenerConfigBuilder {
        self.timestamp_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<ListenerConfig, ListenerConfigError> {
        let node_address = self
            .node_address
            .map(|address| address.trim().trim_end_matches('/').to_string())
            .filter(|address| !address.is_empty())
            .ok_or(ListenerConfigError::MissingNodeAddress)?;

        Ok(ListenerConfig {
            node_address,
            channel: self.channel,
            timestamp_path: self.timestamp_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_address_and_channel() {
        let config = ListenerConfig::builder()
            .with_node_address("http://localhost:9999/")
            .with_channel(EventChannel::Deploys)
            .build()
            .unwrap();
        assert_eq!(config.endpoint(), "http://localhost:9999/events/deploys");
    }

    #[test]
    fn test_default_channel_is_main() {
        let config = ListenerConfig::builder()
            .with_node_address("http://localhost:9999")
            .build()
            .unwrap();
        assert_eq!(config.channel(), EventChannel::Main);
        assert_eq!(config.endpoint(), "http://localhost:9999/events/main");
    }

    #[test]
    fn test_missing_address_is_rejected() {
        assert!(matches!(
            ListenerConfig::builder().build(),
            Err(ListenerConfigError::MissingNodeAddress)
        ));
        assert!(matches!(
            ListenerConfig::builder().with_node_address("   ").build(),
            Err(ListenerConfigError::MissingNodeAddress)
        ));
    }
}
