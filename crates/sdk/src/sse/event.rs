use casper_sdk_types::PublicKey;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::jsonrpc::types::BlockResponse;
use crate::time::{TimeDiff, Timestamp};

/// An event received from a node's SSE stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SseEvent {
    ApiVersion(String),
    BlockAdded(BlockAdded),
    DeployAccepted(serde_json::Value),
    DeployProcessed(DeployProcessed),
    DeployExpired(serde_json::Value),
    Fault {
        era_id: u64,
        public_key: PublicKey,
        timestamp: Timestamp,
    },
    FinalitySignature(FinalitySignature),
    Step {
        era_id: u64,
        // Potentially tens of megabytes; kept unparsed so intake stays
        // fast and cheap.
        execution_effect: Box<RawValue>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockAdded {
    pub block_hash: String,
    pub block: BlockResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployProcessed {
    pub deploy_hash: String,
    pub account: String,
    pub timestamp: Timestamp,
    pub ttl: TimeDiff,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub block_hash: String,
    pub execution_result: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalitySignature {
    pub block_hash: String,
    pub era_id: u64,
    pub signature: String,
    pub public_key: String,
}
