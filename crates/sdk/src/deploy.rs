//! Deploy construction, hashing, signing and validation.
//!
//! The deploy hash is a Blake2b-256 digest of the encoded header, which in
//! turn contains the Blake2b-256 digest of the encoded payment and session
//! items. Any mutation of those fields invalidates both hashes and every
//! approval already collected.

use casper_sdk_codec::{Bytes, Error as CodecError, FromBytes, ToBytes};
use casper_sdk_keys::KeyPair;
use casper_sdk_types::{CLType, CLValue, KeyTag, PublicKey, Signature, URef, blake2b256};
use primitive_types::U512;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executable::ExecutableDeployItem;
use crate::runtime_args::RuntimeArgs;
use crate::serde_hex;
use crate::time::{TimeDiff, Timestamp};

/// Failures in deploy assembly and validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeployError {
    /// Argument mutation was attempted after an approval was collected.
    #[error("deploy is already signed; arguments are frozen")]
    AlreadySigned,
    /// Signing was attempted before the deploy hash was computed.
    #[error("deploy has no hash; construct it before signing")]
    MissingHash,
    /// The header's body hash does not match the payment and session items.
    #[error("body hash does not match payment and session items")]
    BodyHashMismatch,
    /// The deploy hash does not match the encoded header.
    #[error("deploy hash does not match the header")]
    HashMismatch,
    /// An approval's signature does not verify against the deploy hash.
    #[error("approval {0} does not verify against the deploy hash")]
    InvalidApproval(usize),
    #[error(transparent)]
    Serialization(#[from] CodecError),
}

/// The hashed header of a deploy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployHeader {
    pub account: PublicKey,
    pub timestamp: Timestamp,
    pub ttl: TimeDiff,
    pub gas_price: u64,
    #[serde(with = "serde_hex::hash32")]
    pub body_hash: [u8; 32],
    #[serde(with = "serde_hex::hash32_vec")]
    pub dependencies: Vec<[u8; 32]>,
    pub chain_name: String,
}

impl ToBytes for DeployHeader {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.account.serialized_length()
            + self.timestamp.serialized_length()
            + self.ttl.serialized_length()
            + self.gas_price.serialized_length()
            + self.body_hash.serialized_length()
            + self.dependencies.serialized_length()
            + self.chain_name.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        self.account.write_bytes(writer)?;
        self.timestamp.write_bytes(writer)?;
        self.ttl.write_bytes(writer)?;
        self.gas_price.write_bytes(writer)?;
        self.body_hash.write_bytes(writer)?;
        self.dependencies.write_bytes(writer)?;
        self.chain_name.write_bytes(writer)
    }
}

impl FromBytes for DeployHeader {
    fn from_bytes(bytes: &[u8]) -> Result<(DeployHeader, &[u8]), CodecError> {
        let (account, remainder) = PublicKey::from_bytes(bytes)?;
        let (timestamp, remainder) = Timestamp::from_bytes(remainder)?;
        let (ttl, remainder) = TimeDiff::from_bytes(remainder)?;
        let (gas_price, remainder) = u64::from_bytes(remainder)?;
        let (body_hash, remainder) = <[u8; 32]>::from_bytes(remainder)?;
        let (dependencies, remainder) = Vec::<[u8; 32]>::from_bytes(remainder)?;
        let (chain_name, remainder) = String::from_bytes(remainder)?;
        Ok((
            DeployHeader {
                account,
                timestamp,
                ttl,
                gas_price,
                body_hash,
                dependencies,
                chain_name,
            },
            remainder,
        ))
    }
}

/// A `(signer, signature)` pair over the deploy hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub signer: PublicKey,
    pub signature: Signature,
}

/// A signed on-chain transaction: payment and session items under a hashed
/// header, plus the approvals collected so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deploy {
    #[serde(with = "serde_hex::hash32")]
    pub hash: [u8; 32],
    pub header: DeployHeader,
    pub payment: ExecutableDeployItem,
    pub session: ExecutableDeployItem,
    pub approvals: Vec<Approval>,
}

/// Inputs to deploy construction.
///
/// Defaults: gas price 1, TTL 30 minutes, no dependencies, and the current
/// wall-clock time (millisecond precision) when no timestamp is supplied.
#[derive(Clone, Debug)]
pub struct DeployParams {
    pub account: PublicKey,
    pub chain_name: String,
    pub gas_price: u64,
    pub ttl: TimeDiff,
    pub dependencies: Vec<[u8; 32]>,
    pub timestamp: Option<Timestamp>,
}

impl DeployParams {
    pub fn new<C: Into<String>>(account: PublicKey, chain_name: C) -> DeployParams {
        DeployParams {
            account,
            chain_name: chain_name.into(),
            gas_price: 1,
            ttl: TimeDiff::from_minutes(30),
            dependencies: Vec::new(),
            timestamp: None,
        }
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> DeployParams {
        self.gas_price = gas_price;
        self
    }

    pub fn with_ttl(mut self, ttl: TimeDiff) -> DeployParams {
        self.ttl = ttl;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<[u8; 32]>) -> DeployParams {
        self.dependencies = dependencies;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> DeployParams {
        self.timestamp = Some(timestamp);
        self
    }
}

impl Deploy {
    /// Constructs a deploy: computes the body hash over the encoded payment
    /// and session items, fills the header, and hashes the encoded header.
    /// The approvals list starts empty.
    pub fn make(
        params: DeployParams,
        payment: ExecutableDeployItem,
        session: ExecutableDeployItem,
    ) -> Result<Deploy, DeployError> {
        let body_hash = compute_body_hash(&payment, &session)?;
        let header = DeployHeader {
            account: params.account,
            timestamp: params.timestamp.unwrap_or_else(Timestamp::now),
            ttl: params.ttl,
            gas_price: params.gas_price,
            body_hash,
            dependencies: params.dependencies,
            chain_name: params.chain_name,
        };
        let hash = blake2b256(header.to_bytes()?);
        Ok(Deploy {
            hash,
            header,
            payment,
            session,
            approvals: Vec::new(),
        })
    }

    /// Appends an approval signing the deploy hash.
    ///
    /// The body and header hashes are recomputed and compared first, so a
    /// deploy that drifted out of sync is never signed.
    pub fn sign(&mut self, key_pair: &KeyPair) -> Result<(), DeployError> {
        if self.hash == [0; 32] {
            return Err(DeployError::MissingHash);
        }
        self.check_hashes()?;
        let signature = key_pair.sign(&self.hash);
        self.approvals.push(Approval {
            signer: key_pair.public_key(),
            signature,
        });
        Ok(())
    }

    /// Recomputes both hashes and verifies every approval against the
    /// deploy hash.
    pub fn validate(&self) -> Result<(), DeployError> {
        self.check_hashes()?;
        for (index, approval) in self.approvals.iter().enumerate() {
            if !KeyPair::verify_signature(&approval.signer, &approval.signature, &self.hash) {
                return Err(DeployError::InvalidApproval(index));
            }
        }
        Ok(())
    }

    /// True iff [`Self::validate`] passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Inserts or replaces a named session argument, then recomputes both
    /// hashes. Rejected once any approval exists.
    pub fn set_session_arg<N, V>(&mut self, name: N, value: V) -> Result<(), DeployError>
    where
        N: Into<String>,
        V: Into<CLValue>,
    {
        if !self.approvals.is_empty() {
            return Err(DeployError::AlreadySigned);
        }
        self.session.args_mut().insert(name, value);
        self.rehash()
    }

    /// Inserts or replaces a named payment argument, then recomputes both
    /// hashes. Rejected once any approval exists.
    pub fn set_payment_arg<N, V>(&mut self, name: N, value: V) -> Result<(), DeployError>
    where
        N: Into<String>,
        V: Into<CLValue>,
    {
        if !self.approvals.is_empty() {
            return Err(DeployError::AlreadySigned);
        }
        self.payment.args_mut().insert(name, value);
        self.rehash()
    }

    fn check_hashes(&self) -> Result<(), DeployError> {
        let body_hash = compute_body_hash(&self.payment, &self.session)?;
        if body_hash != self.header.body_hash {
            return Err(DeployError::BodyHashMismatch);
        }
        let header_hash = blake2b256(self.header.to_bytes()?);
        if header_hash != self.hash {
            return Err(DeployError::HashMismatch);
        }
        Ok(())
    }

    fn rehash(&mut self) -> Result<(), DeployError> {
        self.header.body_hash = compute_body_hash(&self.payment, &self.session)?;
        self.hash = blake2b256(self.header.to_bytes()?);
        Ok(())
    }
}

fn compute_body_hash(
    payment: &ExecutableDeployItem,
    session: &ExecutableDeployItem,
) -> Result<[u8; 32], CodecError> {
    let mut body = payment.to_bytes()?;
    session.write_bytes(&mut body)?;
    Ok(blake2b256(&body))
}

/// Constructs a deploy from its parameters and the two executable items.
pub fn make_deploy(
    params: DeployParams,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
) -> Result<Deploy, DeployError> {
    Deploy::make(params, payment, session)
}

/// The standard payment item: empty module bytes plus an `amount` argument
/// in motes.
pub fn standard_payment(amount: U512) -> ExecutableDeployItem {
    let mut args = RuntimeArgs::new();
    args.insert("amount", CLValue::U512(amount));
    ExecutableDeployItem::ModuleBytes {
        module_bytes: Bytes::new(),
        args,
    }
}

/// A session item running the given wasm with the given arguments.
pub fn new_module_bytes(module_bytes: Bytes, args: RuntimeArgs) -> ExecutableDeployItem {
    ExecutableDeployItem::ModuleBytes { module_bytes, args }
}

/// A native transfer session.
///
/// The target argument's shape follows the target's key algorithm: the
/// 32-byte account hash for Ed25519 targets, the raw public key for
/// secp256k1 targets.
pub fn new_transfer(
    amount: U512,
    target: &PublicKey,
    id: Option<u64>,
    source: Option<URef>,
) -> ExecutableDeployItem {
    let mut args = RuntimeArgs::new();
    args.insert("amount", CLValue::U512(amount));
    match target.tag() {
        KeyTag::Ed25519 => {
            args.insert("target", CLValue::byte_array(target.account_hash().to_vec()));
        }
        KeyTag::Secp256k1 => {
            args.insert("target", CLValue::PublicKey(target.clone()));
        }
    }
    if let Some(source) = source {
        args.insert("source", CLValue::URef(source));
    }
    let id = match id {
        Some(id) => CLValue::option_some(CLValue::U64(id)),
        None => CLValue::option_none(CLType::U64),
    };
    args.insert("id", id);
    ExecutableDeployItem::Transfer { args }
}

/// A session item calling a stored contract by its hash.
pub fn new_stored_contract_by_hash<E: Into<String>>(
    hash: [u8; 32],
    entry_point: E,
    args: RuntimeArgs,
) -> ExecutableDeployItem {
    ExecutableDeployItem::StoredContractByHash {
        hash,
        entry_point: entry_point.into(),
        args,
    }
}

/// A session item calling a stored contract by its named key.
pub fn new_stored_contract_by_name<N, E>(
    name: N,
    entry_point: E,
    args: RuntimeArgs,
) -> ExecutableDeployItem
where
    N: Into<String>,
    E: Into<String>,
{
    ExecutableDeployItem::StoredContractByName {
        name: name.into(),
        entry_point: entry_point.into(),
        args,
    }
}

/// A session item calling a versioned stored contract by its hash; `None`
/// selects the newest enabled version.
pub fn new_stored_versioned_contract_by_hash<E: Into<String>>(
    hash: [u8; 32],
    version: Option<u32>,
    entry_point: E,
    args: RuntimeArgs,
) -> ExecutableDeployItem {
    ExecutableDeployItem::StoredVersionedContractByHash {
        hash,
        version,
        entry_point: entry_point.into(),
        args,
    }
}

/// A session item calling a versioned stored contract by its named key.
pub fn new_stored_versioned_contract_by_name<N, E>(
    name: N,
    version: Option<u32>,
    entry_point: E,
    args: RuntimeArgs,
) -> ExecutableDeployItem
where
    N: Into<String>,
    E: Into<String>,
{
    ExecutableDeployItem::StoredVersionedContractByName {
        name: name.into(),
        version,
        entry_point: entry_point.into(),
        args,
    }
}
