//! Typed values and domain types shared by the deploy pipeline.
//!
//! The [`CLValue`] sum covers the closed set of shapes the chain understands;
//! each value knows its [`CLType`] descriptor and serializes through the
//! canonical codec. [`Key`], [`URef`], [`PublicKey`] and [`Signature`] are the
//! two domain-specific leaf types plus the key/signature wire forms consumed
//! by deploy headers and approvals.

mod cl_type;
mod cl_value;
mod hash;
mod key;
mod public_key;
mod uref;

pub use cl_type::CLType;
pub use cl_value::{CLMap, CLValue, CLValueError, TypeMismatch};
pub use hash::{BLAKE2B_DIGEST_LENGTH, blake2b256};
pub use key::Key;
pub use public_key::{
    ACCOUNT_HASH_LENGTH, ED25519_PUBLIC_KEY_LENGTH, KeyError, KeyTag, PublicKey,
    SECP256K1_PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, Signature,
};
pub use uref::{AccessRights, FromStrError as URefFromStrError, URef, UREF_SERIALIZED_LENGTH};
