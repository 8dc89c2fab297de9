//! JSON-RPC client for interacting with a Casper node.
//!
//! A thin request/response wrapper: deploys travel as the JSON defined by
//! the deploy module, node responses carry the field set needed to
//! round-trip them, and JSON-RPC error objects surface unchanged.

pub mod types;

use primitive_types::U512;
use rand::Rng as _;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value as JsonValue, json};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::deploy::Deploy;
use crate::jsonrpc::types::{
    AuctionState, BlockIdentifier, BlockResponse, EraSummary, GetDeployResult, Peer, StatusResult,
    StoredValue, TransferResponse,
};

/// A JSON-RPC error object, surfaced unchanged from the node.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, Error)]
#[error("rpc call failed, code {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RpcClientError {
    #[error("invalid RPC endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed, status code {status}, response: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("failed to decode RPC response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("RPC response carried neither result nor error")]
    MissingResult,
    #[error("provided block is not a switch block")]
    NotASwitchBlock,
    #[error("supplied key is not an account")]
    NotAnAccount,
    #[error("balance value is not a decimal string: {0}")]
    InvalidBalance(String),
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: i64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<JsonValue>,
}

#[derive(serde::Deserialize)]
struct RpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<JsonValue>,
    error: Option<RpcError>,
}

/// JSON-RPC client for a single node endpoint.
#[derive(Clone, Debug)]
pub struct RpcClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl RpcClient {
    /// Creates a client for the given node address. The `/rpc` path is
    /// appended when missing, so both `http://host:7777` and
    /// `http://host:7777/rpc` are accepted.
    pub fn new(endpoint: &str) -> Result<RpcClient, RpcClientError> {
        let endpoint = Url::parse(&normalize_node_address(endpoint))?;
        Ok(RpcClient {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Gets information about a deploy with the given hash.
    pub async fn get_deploy(&self, deploy_hash: &str) -> Result<GetDeployResult, RpcClientError> {
        self.rpc_call("info_get_deploy", Some(json!({ "deploy_hash": deploy_hash })))
            .await
    }

    /// Retrieves a stored value from the global state. `key` is any
    /// formatted key string (public key hex, `account-hash-…`, `hash-…`,
    /// `uref-…`, …); `path` is an optional path under the item.
    pub async fn get_state_item(
        &self,
        state_root_hash: &str,
        key: &str,
        path: &[String],
    ) -> Result<StoredValue, RpcClientError> {
        let mut params = json!({
            "state_root_hash": state_root_hash,
            "key": key,
        });
        if !path.is_empty() {
            params["path"] = json!(path);
        }
        let result: types::StoredValueResult =
            self.rpc_call("state_get_item", Some(params)).await?;
        Ok(result.stored_value)
    }

    /// Returns the balance in motes of the given purse at the given state
    /// root.
    pub async fn get_balance(
        &self,
        state_root_hash: &str,
        purse_uref: &str,
    ) -> Result<U512, RpcClientError> {
        let result: types::BalanceResult = self
            .rpc_call(
                "state_get_balance",
                Some(json!({
                    "state_root_hash": state_root_hash,
                    "purse_uref": purse_uref,
                })),
            )
            .await?;
        U512::from_dec_str(&result.balance_value)
            .map_err(|_| RpcClientError::InvalidBalance(result.balance_value))
    }

    /// Returns the balance of the given purse at the latest state root.
    pub async fn get_latest_balance(&self, purse_uref: &str) -> Result<U512, RpcClientError> {
        let state_root_hash = self.get_latest_state_root_hash().await?;
        self.get_balance(&state_root_hash, purse_uref).await
    }

    /// Returns the main purse of the account identified by the given
    /// formatted key (public key hex or `account-hash-…`).
    pub async fn get_account_main_purse(
        &self,
        state_root_hash: &str,
        key: &str,
    ) -> Result<String, RpcClientError> {
        let value = self.get_state_item(state_root_hash, key, &[]).await?;
        let account = value.account.ok_or(RpcClientError::NotAnAccount)?;
        Ok(account.main_purse)
    }

    /// Returns the latest block.
    pub async fn get_latest_block(&self) -> Result<BlockResponse, RpcClientError> {
        self.get_block(None).await
    }

    /// Returns the block with the given height.
    pub async fn get_block_by_height(&self, height: u64) -> Result<BlockResponse, RpcClientError> {
        self.get_block(Some(BlockIdentifier::Height(height))).await
    }

    /// Returns the block with the given hash.
    pub async fn get_block_by_hash(&self, hash: &str) -> Result<BlockResponse, RpcClientError> {
        self.get_block(Some(BlockIdentifier::Hash(hash.into()))).await
    }

    async fn get_block(
        &self,
        identifier: Option<BlockIdentifier>,
    ) -> Result<BlockResponse, RpcClientError> {
        let result: types::BlockResult = self
            .rpc_call("chain_get_block", Some(block_params(identifier)))
            .await?;
        Ok(result.block)
    }

    /// Returns all transfers in the latest block.
    pub async fn get_latest_block_transfers(
        &self,
    ) -> Result<Vec<TransferResponse>, RpcClientError> {
        self.get_block_transfers(None).await
    }

    /// Returns all transfers in the block with the given height.
    pub async fn get_block_transfers_by_height(
        &self,
        height: u64,
    ) -> Result<Vec<TransferResponse>, RpcClientError> {
        self.get_block_transfers(Some(BlockIdentifier::Height(height)))
            .await
    }

    /// Returns all transfers in the block with the given hash.
    pub async fn get_block_transfers_by_hash(
        &self,
        hash: &str,
    ) -> Result<Vec<TransferResponse>, RpcClientError> {
        self.get_block_transfers(Some(BlockIdentifier::Hash(hash.into())))
            .await
    }

    async fn get_block_transfers(
        &self,
        identifier: Option<BlockIdentifier>,
    ) -> Result<Vec<TransferResponse>, RpcClientError> {
        let result: types::TransfersResult = self
            .rpc_call("chain_get_block_transfers", Some(block_params(identifier)))
            .await?;
        Ok(result.transfers)
    }

    /// Returns the current auction state with era validators.
    pub async fn get_auction_info(&self) -> Result<AuctionState, RpcClientError> {
        let result: types::AuctionInfoResult =
            self.rpc_call("state_get_auction_info", None).await?;
        Ok(result.auction_state)
    }

    /// Retrieves node status information.
    pub async fn get_status(&self) -> Result<StatusResult, RpcClientError> {
        self.rpc_call("info_get_status", None).await
    }

    /// Returns all peers connected to the node.
    pub async fn get_peers(&self) -> Result<Vec<Peer>, RpcClientError> {
        let result: types::PeersResult = self.rpc_call("info_get_peers", None).await?;
        Ok(result.peers)
    }

    /// Returns era information from the latest block; errors if it is not
    /// a switch block.
    pub async fn get_latest_era_by_switch_block(&self) -> Result<EraSummary, RpcClientError> {
        self.get_era_by_switch_block(None).await
    }

    /// Returns era information from the switch block at the given height.
    pub async fn get_era_by_switch_block_height(
        &self,
        height: u64,
    ) -> Result<EraSummary, RpcClientError> {
        self.get_era_by_switch_block(Some(BlockIdentifier::Height(height)))
            .await
    }

    /// Returns era information from the switch block with the given hash.
    pub async fn get_era_by_switch_block_hash(
        &self,
        hash: &str,
    ) -> Result<EraSummary, RpcClientError> {
        self.get_era_by_switch_block(Some(BlockIdentifier::Hash(hash.into())))
            .await
    }

    async fn get_era_by_switch_block(
        &self,
        identifier: Option<BlockIdentifier>,
    ) -> Result<EraSummary, RpcClientError> {
        let result: types::EraResult = self
            .rpc_call(
                "chain_get_era_info_by_switch_block",
                Some(block_params(identifier)),
            )
            .await?;
        result.era_summary.ok_or(RpcClientError::NotASwitchBlock)
    }

    /// Returns the state root hash of the latest block.
    pub async fn get_latest_state_root_hash(&self) -> Result<String, RpcClientError> {
        self.get_state_root_hash(None).await
    }

    /// Returns the state root hash of the block at the given height.
    pub async fn get_state_root_hash_by_height(
        &self,
        height: u64,
    ) -> Result<String, RpcClientError> {
        self.get_state_root_hash(Some(BlockIdentifier::Height(height)))
            .await
    }

    /// Returns the state root hash of the block with the given hash.
    pub async fn get_state_root_hash_by_hash(
        &self,
        hash: &str,
    ) -> Result<String, RpcClientError> {
        self.get_state_root_hash(Some(BlockIdentifier::Hash(hash.into())))
            .await
    }

    async fn get_state_root_hash(
        &self,
        identifier: Option<BlockIdentifier>,
    ) -> Result<String, RpcClientError> {
        let result: types::StateRootHashResult = self
            .rpc_call("chain_get_state_root_hash", Some(block_params(identifier)))
            .await?;
        Ok(result.state_root_hash)
    }

    /// Submits a deploy to the node and returns its hash as reported back.
    pub async fn put_deploy(&self, deploy: &Deploy) -> Result<String, RpcClientError> {
        let result: types::PutDeployResult = self
            .rpc_call("account_put_deploy", Some(json!({ "deploy": deploy })))
            .await?;
        Ok(result.deploy_hash)
    }

    /// Retrieves the node's OpenRPC schema.
    pub async fn rpc_schema(&self) -> Result<JsonValue, RpcClientError> {
        self.rpc_call("rpc.discover", None).await
    }

    async fn rpc_call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<JsonValue>,
    ) -> Result<R, RpcClientError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: next_rpc_id(),
            method,
            params,
        };
        debug!(method, "sending JSON-RPC request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RpcClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response: RpcResponse = serde_json::from_str(&body)?;
        if let Some(error) = response.error {
            warn!(method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(error.into());
        }
        let result = response.result.ok_or(RpcClientError::MissingResult)?;
        Ok(serde_json::from_value(result)?)
    }
}

fn block_params(identifier: Option<BlockIdentifier>) -> JsonValue {
    match identifier {
        Some(identifier) => json!({ "block_identifier": identifier }),
        None => json!({}),
    }
}

/// Generates the next JSON-RPC request id.
fn next_rpc_id() -> i64 {
    rand::rng().random()
}

/// Normalizes a node address: trims whitespace and trailing slashes, and
/// appends the `/rpc` path when it is missing.
fn normalize_node_address(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.ends_with("/rpc") {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/rpc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_node_address() {
        assert_eq!(
            normalize_node_address("http://localhost:7777"),
            "http://localhost:7777/rpc"
        );
        assert_eq!(
            normalize_node_address("http://localhost:7777/"),
            "http://localhost:7777/rpc"
        );
        assert_eq!(
            normalize_node_address("http://localhost:7777/rpc"),
            "http://localhost:7777/rpc"
        );
        assert_eq!(
            normalize_node_address("  http://localhost:7777/rpc/  "),
            "http://localhost:7777/rpc"
        );
    }

    #[test]
    fn test_client_rejects_invalid_urls() {
        assert!(matches!(
            RpcClient::new("not a url"),
            Err(RpcClientError::Url(_))
        ));
        assert!(RpcClient::new("http://localhost:7777").is_ok());
    }

    #[test]
    fn test_next_rpc_id_varies() {
        let first = next_rpc_id();
        let second = next_rpc_id();
        let third = next_rpc_id();
        assert!(first != second || second != third);
    }

    #[test]
    fn test_request_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "info_get_status",
            params: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({ "jsonrpc": "2.0", "id": 7, "method": "info_get_status" })
        );
    }

    #[test]
    fn test_block_params_shape() {
        assert_eq!(block_params(None), json!({}));
        assert_eq!(
            block_params(Some(BlockIdentifier::Height(42))),
            json!({ "block_identifier": { "Height": 42 } })
        );
        assert_eq!(
            block_params(Some(BlockIdentifier::Hash("abc123".into()))),
            json!({ "block_identifier": { "Hash": "abc123" } })
        );
    }

    #[test]
    fn test_error_response_maps_to_rpc_error() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid params"}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Invalid params");
    }
}
