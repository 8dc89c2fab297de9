//! Public keys and signatures in their wire form.

use core::fmt;

use casper_sdk_codec::{Error as CodecError, FromBytes, ToBytes, U8_SERIALIZED_LENGTH, safe_split_at};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::hash::{BLAKE2B_DIGEST_LENGTH, blake2b256};

/// Length of a raw Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Length of a compressed secp256k1 public key.
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 33;
/// Length of a raw signature for either algorithm.
pub const SIGNATURE_LENGTH: usize = 64;
/// Length of an account hash.
pub const ACCOUNT_HASH_LENGTH: usize = BLAKE2B_DIGEST_LENGTH;

/// Failures in the key and signature machinery.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A tag byte naming no known signature algorithm.
    #[error("unknown key algorithm tag: {0}")]
    UnknownAlgorithm(u8),
    /// Raw key or signature material of the wrong length.
    #[error("unexpected key material length: {0}")]
    InvalidLength(usize),
    /// A hex form that does not decode.
    #[error("invalid hex in key material")]
    InvalidHex,
    /// Key material that decodes but is not a valid point/scalar.
    #[error("cryptographically invalid key material")]
    InvalidKey,
    /// A PEM document that cannot be unwrapped to raw key bytes.
    #[error("failed to parse PEM document: {0}")]
    Pem(String),
}

/// Signature algorithm tag, stable on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum KeyTag {
    Ed25519 = 1,
    Secp256k1 = 2,
}

impl KeyTag {
    /// Lowercase algorithm name, as hashed into the account-hash preimage.
    pub const fn algorithm_name(self) -> &'static str {
        match self {
            KeyTag::Ed25519 => "ed25519",
            KeyTag::Secp256k1 => "secp256k1",
        }
    }

    /// Raw public-key length for this algorithm.
    pub const fn public_key_length(self) -> usize {
        match self {
            KeyTag::Ed25519 => ED25519_PUBLIC_KEY_LENGTH,
            KeyTag::Secp256k1 => SECP256K1_PUBLIC_KEY_LENGTH,
        }
    }

    pub fn from_u8(tag: u8) -> Result<KeyTag, KeyError> {
        match tag {
            1 => Ok(KeyTag::Ed25519),
            2 => Ok(KeyTag::Secp256k1),
            other => Err(KeyError::UnknownAlgorithm(other)),
        }
    }
}

/// An algorithm-tagged public key.
///
/// Small and trivially cloneable; share by value, not by pointer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    tag: KeyTag,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Builds a public key from its algorithm tag and raw bytes, checking
    /// the length the algorithm requires.
    pub fn new(tag: KeyTag, bytes: Vec<u8>) -> Result<PublicKey, KeyError> {
        if bytes.len() != tag.public_key_length() {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        Ok(PublicKey { tag, bytes })
    }

    /// Wraps a raw Ed25519 public key.
    pub fn ed25519(bytes: [u8; ED25519_PUBLIC_KEY_LENGTH]) -> PublicKey {
        PublicKey {
            tag: KeyTag::Ed25519,
            bytes: bytes.to_vec(),
        }
    }

    /// Wraps a compressed secp256k1 public key.
    pub fn secp256k1(bytes: [u8; SECP256K1_PUBLIC_KEY_LENGTH]) -> PublicKey {
        PublicKey {
            tag: KeyTag::Secp256k1,
            bytes: bytes.to_vec(),
        }
    }

    pub fn tag(&self) -> KeyTag {
        self.tag
    }

    /// Raw key bytes, without the algorithm tag.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The tag-prefixed lowercase hex form, e.g. `01a2…`.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", self.tag as u8, hex::encode(&self.bytes))
    }

    /// Parses the tag-prefixed hex form.
    pub fn from_hex(input: &str) -> Result<PublicKey, KeyError> {
        let raw = hex::decode(input).map_err(|_| KeyError::InvalidHex)?;
        let (tag, key) = raw.split_first().ok_or(KeyError::InvalidLength(0))?;
        PublicKey::new(KeyTag::from_u8(*tag)?, key.to_vec())
    }

    /// The account hash identifying this key on chain:
    /// `blake2b256(algorithm_name ∥ 0x00 ∥ raw_key_bytes)`.
    pub fn account_hash(&self) -> [u8; ACCOUNT_HASH_LENGTH] {
        let name = self.tag.algorithm_name().as_bytes();
        let mut preimage = Vec::with_capacity(name.len() + 1 + self.bytes.len());
        preimage.extend_from_slice(name);
        preimage.push(0);
        preimage.extend_from_slice(&self.bytes);
        blake2b256(&preimage)
    }

    /// Lowercase hex of [`Self::account_hash`].
    pub fn account_hash_hex(&self) -> String {
        hex::encode(self.account_hash())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ToBytes for PublicKey {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH + self.bytes.len()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        writer.push(self.tag as u8);
        writer.extend_from_slice(&self.bytes);
        Ok(())
    }
}

impl FromBytes for PublicKey {
    fn from_bytes(bytes: &[u8]) -> Result<(PublicKey, &[u8]), CodecError> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let tag = KeyTag::from_u8(tag).map_err(|_| CodecError::Formatting)?;
        let (key, remainder) = safe_split_at(remainder, tag.public_key_length())?;
        Ok((
            PublicKey {
                tag,
                bytes: key.to_vec(),
            },
            remainder,
        ))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_form = String::deserialize(deserializer)?;
        PublicKey::from_hex(&hex_form).map_err(de::Error::custom)
    }
}

/// An algorithm-tagged signature over a deploy hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    tag: KeyTag,
    bytes: Vec<u8>,
}

impl Signature {
    /// Builds a signature from its algorithm tag and 64 raw bytes.
    pub fn new(tag: KeyTag, bytes: Vec<u8>) -> Result<Signature, KeyError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        Ok(Signature { tag, bytes })
    }

    pub fn tag(&self) -> KeyTag {
        self.tag
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", self.tag as u8, hex::encode(&self.bytes))
    }

    pub fn from_hex(input: &str) -> Result<Signature, KeyError> {
        let raw = hex::decode(input).map_err(|_| KeyError::InvalidHex)?;
        let (tag, sig) = raw.split_first().ok_or(KeyError::InvalidLength(0))?;
        Signature::new(KeyTag::from_u8(*tag)?, sig.to_vec())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ToBytes for Signature {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut result = Vec::with_capacity(self.serialized_length());
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        U8_SERIALIZED_LENGTH + self.bytes.len()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        writer.push(self.tag as u8);
        writer.extend_from_slice(&self.bytes);
        Ok(())
    }
}

impl FromBytes for Signature {
    fn from_bytes(bytes: &[u8]) -> Result<(Signature, &[u8]), CodecError> {
        let (tag, remainder) = u8::from_bytes(bytes)?;
        let tag = KeyTag::from_u8(tag).map_err(|_| CodecError::Formatting)?;
        let (sig, remainder) = safe_split_at(remainder, SIGNATURE_LENGTH)?;
        Ok((
            Signature {
                tag,
                bytes: sig.to_vec(),
            },
            remainder,
        ))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_form = String::deserialize(deserializer)?;
        Signature::from_hex(&hex_form).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casper_sdk_codec::deserialize;

    const ED25519_HEX: &str = "0172a54c123b336fb1d386bbdff450623d1b5da904f5e2523b3e347b6d7573ae80";

    #[test]
    fn test_hex_round_trip() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        assert_eq!(key.tag(), KeyTag::Ed25519);
        assert_eq!(key.raw_bytes().len(), 32);
        assert_eq!(key.to_hex(), ED25519_HEX);
    }

    #[test]
    fn test_account_hash_vector() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        assert_eq!(
            key.account_hash_hex(),
            "273fdfb1f9dac9b3a8ef104982d253c44a2c915416dbbe9cbb8d3d31647b4a10"
        );
    }

    #[test]
    fn test_account_hash_depends_on_algorithm_name() {
        // same raw bytes, different tag, different hash
        let raw: [u8; 32] = [7; 32];
        let ed25519 = PublicKey::ed25519(raw);
        let mut compressed = [7u8; 33];
        compressed[0] = 2;
        let secp256k1 = PublicKey::secp256k1(compressed);
        assert_ne!(ed25519.account_hash(), secp256k1.account_hash());
    }

    #[test]
    fn test_wire_form_is_tag_then_raw_bytes() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        let encoded = key.to_bytes().unwrap();
        assert_eq!(hex::encode(&encoded), ED25519_HEX);
        assert_eq!(deserialize::<PublicKey>(&encoded).unwrap(), key);
    }

    #[test]
    fn test_rejects_wrong_lengths_and_tags() {
        assert_eq!(
            PublicKey::new(KeyTag::Ed25519, vec![0; 31]).unwrap_err(),
            KeyError::InvalidLength(31)
        );
        assert_eq!(
            PublicKey::new(KeyTag::Secp256k1, vec![0; 32]).unwrap_err(),
            KeyError::InvalidLength(32)
        );
        assert_eq!(
            PublicKey::from_hex(&format!("03{}", "00".repeat(32))).unwrap_err(),
            KeyError::UnknownAlgorithm(3)
        );
        assert_eq!(PublicKey::from_hex("01zz").unwrap_err(), KeyError::InvalidHex);
    }

    #[test]
    fn test_signature_hex_round_trip() {
        let sig = Signature::new(KeyTag::Ed25519, vec![0xab; 64]).unwrap();
        let hex_form = sig.to_hex();
        assert!(hex_form.starts_with("01"));
        assert_eq!(Signature::from_hex(&hex_form).unwrap(), sig);
        assert_eq!(
            Signature::new(KeyTag::Ed25519, vec![0; 63]).unwrap_err(),
            KeyError::InvalidLength(63)
        );
    }

    #[test]
    fn test_json_is_the_hex_string() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            format!("\"{ED25519_HEX}\"")
        );
        let back: PublicKey = serde_json::from_str(&format!("\"{ED25519_HEX}\"")).unwrap();
        assert_eq!(back, key);
    }
}
