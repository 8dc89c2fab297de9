//! Keys addressing records in the global state.

use core::fmt;

use casper_sdk_codec::{Error as CodecError, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

use crate::uref::URef;

const ACCOUNT_TAG: u8 = 0;
const HASH_TAG: u8 = 1;
const UREF_TAG: u8 = 2;
const TRANSFER_TAG: u8 = 3;
const DEPLOY_INFO_TAG: u8 = 4;
const ERA_ID_TAG: u8 = 5;
const BALANCE_TAG: u8 = 6;
const BID_TAG: u8 = 7;
const WITHDRAW_TAG: u8 = 8;

/// An address into the global state.
///
/// Eight variants carry a 32-byte address; `EraId` carries the era number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An account, addressed by its account hash.
    Account([u8; 32]),
    /// A stored contract or contract package.
    Hash([u8; 32]),
    /// An unforgeable reference.
    URef(URef),
    /// A transfer record.
    Transfer([u8; 32]),
    /// A deploy-info record.
    DeployInfo([u8; 32]),
    /// Era information, addressed by era number.
    EraId(u64),
    /// A purse balance record.
    Balance([u8; 32]),
    /// An auction bid.
    Bid([u8; 32]),
    /// An unbonding withdraw record.
    Withdraw([u8; 32]),
}

impl Key {
    fn tag(&self) -> u8 {
        match self {
            Key::Account(_) => ACCOUNT_TAG,
            Key::Hash(_) => HASH_TAG,
            Key::URef(_) => UREF_TAG,
            Key::Transfer(_) => TRANSFER_TAG,
            Key::DeployInfo(_) => DEPLOY_INFO_TAG,
            Key::EraId(_) => ERA_ID_TAG,
            Key::Balance(_) => BALANCE_TAG,
            Key::Bid(_) => BID_TAG,
            Key::Withdraw(_) => WITHDRAW_TAG,
        }
    }

    /// Returns the inner URef, if this is a URef key.
    pub fn into_uref(self) -> Option<URef> {
        match self {
            Key::URef(uref) => Some(uref),
            _ => None,
        }
    }

    /// Formats in the chain's human-readable form, e.g.
    /// `account-hash-<hex>` or `era-<number>`.
    pub fn to_formatted_string(&self) -> String {
        match self {
            Key::Account(addr) => format!("account-hash-{}", hex::encode(addr)),
            Key::Hash(addr) => format!("hash-{}", hex::encode(addr)),
            Key::URef(uref) => uref.to_formatted_string(),
            Key::Transfer(addr) => format!("transfer-{}", hex::encode(addr)),
            Key::DeployInfo(addr) => format!("deploy-{}", hex::encode(addr)),
            Key::EraId(era) => format!("era-{era}"),
            Key::Balance(addr) => format!("balance-{}", hex::encode(addr)),
            Key::Bid(addr) => format!("bid-{}", hex::encode(addr)),
            Key::Withdraw(addr) => format!("withdraw-{}", hex::encode(addr)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formatted_string())
    }
}

impl From<URef> for Key {
    fn from(uref: URef) -> Key {
        Key::URef(uref)
    }
}

impl ToBytes for Key {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH
            + match self {
                Key::URef(uref) => uref.serialized_length(),
                Key::EraId(era) => era.serialized_length(),
                _ => 32,
            }
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        writer.push(self.tag());
        match self {
            Key::Account(addr)
            | Key::Hash(addr)
            | Key::Transfer(addr)
            | Key::DeployInfo(addr)
            | Key::Balance(addr)
            | Key::Bid(addr)
            | Key::Withdraw(addr) => writer.extend_from_slice(addr),
            Key::URef(uref) => uref.write_bytes(writer)?,
            Key::EraId(era) => era.write_bytes(writer)?,
        }
        Ok(())
    }
}

impl FromBytes for Key {
    fn from_bytes(bytes: &[u8]) -> Result<(Key, &[u8]), CodecError> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        match tag {
            ACCOUNT_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::Account(addr), remainder))
            }
            HASH_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::Hash(addr), remainder))
            }
            UREF_TAG => {
                let (uref, remainder) = URef::from_bytes(remainder)?;
                Ok((Key::URef(uref), remainder))
            }
            TRANSFER_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::Transfer(addr), remainder))
            }
            DEPLOY_INFO_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::DeployInfo(addr), remainder))
            }
            ERA_ID_TAG => {
                let (era, remainder) = u64::from_bytes(remainder)?;
                Ok((Key::EraId(era), remainder))
            }
            BALANCE_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::Balance(addr), remainder))
            }
            BID_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::Bid(addr), remainder))
            }
            WITHDRAW_TAG => {
                let (addr, remainder) = <[u8; 32]>::from_bytes(remainder)?;
                Ok((Key::Withdraw(addr), remainder))
            }
            _ => Err(CodecError::Formatting),
        }
    }
}
