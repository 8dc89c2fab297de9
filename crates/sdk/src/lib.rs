//! Client SDK for the Casper network.
//!
//! The core is the value and deploy pipeline: deploys are constructed from
//! typed [`CLValue`](casper_sdk_types::CLValue) arguments, hashed over their
//! canonical byte form, signed with [`KeyPair`](casper_sdk_keys::KeyPair)s,
//! and submitted through the JSON-RPC client. The SSE listener follows what
//! the network does with them.

pub mod deploy;
pub mod executable;
pub mod jsonrpc;
pub mod runtime_args;
mod serde_hex;
pub mod sse;
pub mod time;

pub use casper_sdk_codec as codec;
pub use casper_sdk_keys as keys;
pub use casper_sdk_types as types;

pub use deploy::{
    Approval, Deploy, DeployError, DeployHeader, DeployParams, make_deploy, new_module_bytes,
    new_stored_contract_by_hash, new_stored_contract_by_name,
    new_stored_versioned_contract_by_hash, new_stored_versioned_contract_by_name, new_transfer,
    standard_payment,
};
pub use executable::ExecutableDeployItem;
pub use jsonrpc::{RpcClient, RpcClientError, RpcError};
pub use runtime_args::{NamedArg, RuntimeArgs};
pub use time::{TimeDiff, Timestamp};
