//! Node-side response data types, carrying the field set needed to
//! round-trip JSON-RPC responses.

use casper_sdk_types::CLValue;
use serde::{Deserialize, Serialize};

use crate::deploy::Deploy;
use crate::time::Timestamp;

/// Selects a block by hash or height in RPC parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockIdentifier {
    Hash(String),
    Height(u64),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BlockResponse {
    pub hash: String,
    pub header: BlockHeader,
    pub body: BlockBody,
    #[serde(default)]
    pub proofs: Vec<Proof>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BlockHeader {
    pub parent_hash: String,
    pub state_root_hash: String,
    pub body_hash: String,
    pub random_bit: bool,
    pub accumulated_seed: String,
    pub timestamp: Timestamp,
    pub era_id: u64,
    pub height: u64,
    pub protocol_version: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BlockBody {
    pub proposer: String,
    #[serde(default)]
    pub deploy_hashes: Vec<String>,
    #[serde(default)]
    pub transfer_hashes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Proof {
    pub public_key: String,
    pub signature: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub deploy_hash: String,
    pub from: String,
    pub to: String,
    pub source: String,
    pub target: String,
    pub amount: String,
    pub gas: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GetDeployResult {
    pub deploy: Deploy,
    #[serde(default)]
    pub execution_results: Vec<ExecutionResultEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExecutionResultEntry {
    pub block_hash: String,
    pub result: ExecutionResult,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Success")]
    pub success: Option<SuccessExecutionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Failure")]
    pub failure: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SuccessExecutionResult {
    #[serde(default)]
    pub transfers: Vec<String>,
    pub cost: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Default)]
pub struct StoredValue {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "CLValue")]
    pub cl_value: Option<CLValue>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Account")]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Contract")]
    pub contract: Option<ContractMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "ContractWASM")]
    pub contract_wasm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "ContractPackage")]
    pub contract_package: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Transfer")]
    pub transfer: Option<TransferResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "DeployInfo")]
    pub deploy_info: Option<DeployInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "EraInfo")]
    pub era_info: Option<EraInfo>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Account {
    pub account_hash: String,
    #[serde(default)]
    pub named_keys: Vec<AccountNamedKey>,
    pub main_purse: String,
    #[serde(default)]
    pub associated_keys: Vec<AssociatedKey>,
    pub action_thresholds: ActionThresholds,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountNamedKey {
    pub name: String,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssociatedKey {
    pub account_hash: String,
    pub weight: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionThresholds {
    pub deployment: u64,
    pub key_management: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContractMetadata {
    pub contract_package_hash: String,
    pub contract_wasm_hash: String,
    pub protocol_version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeployInfo {
    pub deploy_hash: String,
    #[serde(default)]
    pub transfers: Vec<String>,
    pub from: String,
    pub source: String,
    pub gas: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EraInfo {
    #[serde(default)]
    pub seigniorage_allocations: Vec<SeigniorageAllocation>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SeigniorageAllocation {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Validator")]
    pub validator: Option<ValidatorAllocation>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "Delegator")]
    pub delegator: Option<DelegatorAllocation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidatorAllocation {
    pub amount: String,
    pub validator_public_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DelegatorAllocation {
    pub amount: String,
    pub validator_public_key: String,
    pub delegator_public_key: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AuctionState {
    pub state_root_hash: String,
    pub block_height: u64,
    #[serde(default)]
    pub era_validators: Vec<EraValidators>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EraValidators {
    pub era_id: u64,
    #[serde(default)]
    pub validator_weights: Vec<ValidatorWeight>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidatorWeight {
    pub public_key: String,
    pub weight: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StatusResult {
    pub api_version: String,
    pub chainspec_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_added_block_info: Option<MinimalBlockInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_upgrade: Option<Upgrade>,
    pub our_public_signing_key: String,
    #[serde(default)]
    pub peers: Vec<Peer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_state_root_hash: Option<String>,
    pub build_version: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MinimalBlockInfo {
    pub hash: String,
    pub timestamp: Timestamp,
    pub era_id: u64,
    pub height: u64,
    pub state_root_hash: String,
    pub creator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Upgrade {
    pub activation_point: u64,
    pub protocol_version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Peer {
    pub node_id: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EraSummary {
    pub block_hash: String,
    pub era_id: u64,
    pub merkle_proof: String,
    pub state_root_hash: String,
    pub stored_value: StoredValue,
}

#[derive(Deserialize)]
pub(crate) struct BlockResult {
    pub block: BlockResponse,
}

#[derive(Deserialize)]
pub(crate) struct TransfersResult {
    #[serde(default)]
    pub transfers: Vec<TransferResponse>,
}

#[derive(Deserialize)]
pub(crate) struct StoredValueResult {
    pub stored_value: StoredValue,
}

#[derive(Deserialize)]
pub(crate) struct BalanceResult {
    pub balance_value: String,
}

#[derive(Deserialize)]
pub(crate) struct StateRootHashResult {
    pub state_root_hash: String,
}

#[derive(Deserialize)]
pub(crate) struct PutDeployResult {
    pub deploy_hash: String,
}

#[derive(Deserialize)]
pub(crate) struct AuctionInfoResult {
    pub auction_state: AuctionState,
}

#[derive(Deserialize)]
pub(crate) struct PeersResult {
    #[serde(default)]
    pub peers: Vec<Peer>,
}

#[derive(Deserialize)]
pub(crate) struct EraResult {
    #[serde(default)]
    pub era_summary: Option<EraSummary>,
}
