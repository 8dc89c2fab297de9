//! Key pairs producing on-chain account identities and deploy signatures.
//!
//! Both algorithms expose the same capability set: public-key bytes,
//! deterministic signing, verification, and Blake2b-256 account-hash
//! derivation. A [`KeyPair`] holds secret material; callers that require
//! zeroization on drop are responsible for arranging it.

mod ed25519;
mod pem;
mod secp256k1;

pub use casper_sdk_types::{KeyError, KeyTag, PublicKey, Signature};
pub use ed25519::Ed25519KeyPair;
pub use pem::{decode_secret_pem, encode_secret_pem};
pub use secp256k1::Secp256k1KeyPair;

/// A signing key pair for either supported algorithm.
#[derive(Clone)]
pub enum KeyPair {
    Ed25519(Ed25519KeyPair),
    Secp256k1(Secp256k1KeyPair),
}

impl KeyPair {
    /// Generates a fresh key pair for the given algorithm.
    pub fn random(tag: KeyTag) -> KeyPair {
        match tag {
            KeyTag::Ed25519 => KeyPair::Ed25519(Ed25519KeyPair::random()),
            KeyTag::Secp256k1 => KeyPair::Secp256k1(Secp256k1KeyPair::random()),
        }
    }

    /// Builds a key pair from raw secret bytes: exactly 32 (the seed or
    /// scalar) or 64 (a secret ∥ public concatenation, of which the leading
    /// 32 are used). Any other length is [`KeyError::InvalidLength`].
    pub fn from_raw_bytes(tag: KeyTag, bytes: &[u8]) -> Result<KeyPair, KeyError> {
        match tag {
            KeyTag::Ed25519 => Ed25519KeyPair::from_raw_bytes(bytes).map(KeyPair::Ed25519),
            KeyTag::Secp256k1 => Secp256k1KeyPair::from_raw_bytes(bytes).map(KeyPair::Secp256k1),
        }
    }

    /// Builds a key pair from a PEM document holding the raw secret.
    pub fn from_pem(tag: KeyTag, content: &str) -> Result<KeyPair, KeyError> {
        let secret = decode_secret_pem(content)?;
        KeyPair::from_raw_bytes(tag, &secret)
    }

    pub fn key_tag(&self) -> KeyTag {
        match self {
            KeyPair::Ed25519(_) => KeyTag::Ed25519,
            KeyPair::Secp256k1(_) => KeyTag::Secp256k1,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyPair::Ed25519(pair) => pair.public_key(),
            KeyPair::Secp256k1(pair) => pair.public_key(),
        }
    }

    /// Signs `message`; deterministic for both algorithms.
    pub fn sign(&self, message: &[u8]) -> Signature {
        match self {
            KeyPair::Ed25519(pair) => pair.sign(message),
            KeyPair::Secp256k1(pair) => pair.sign(message),
        }
    }

    /// Verifies a signature made by this key pair.
    ///
    /// Returns `false` for malformed input rather than failing.
    pub fn verify(&self, signature: &Signature, message: &[u8]) -> bool {
        match self {
            KeyPair::Ed25519(pair) => pair.verify(signature, message),
            KeyPair::Secp256k1(pair) => pair.verify(signature, message),
        }
    }

    pub fn account_hash(&self) -> [u8; 32] {
        self.public_key().account_hash()
    }

    pub fn account_hash_hex(&self) -> String {
        self.public_key().account_hash_hex()
    }

    /// Verifies a signature against a wire public key, without a key pair.
    ///
    /// This is what deploy validation uses to check approvals. Returns
    /// `false` for malformed or mismatched input.
    pub fn verify_signature(public_key: &PublicKey, signature: &Signature, message: &[u8]) -> bool {
        if public_key.tag() != signature.tag() {
            return false;
        }
        match public_key.tag() {
            KeyTag::Ed25519 => ed25519::verify_raw(public_key.raw_bytes(), signature.raw_bytes(), message),
            KeyTag::Secp256k1 => {
                secp256k1::verify_raw(public_key.raw_bytes(), signature.raw_bytes(), message)
            }
        }
    }
}

impl core::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.key_tag())
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_capability_set() {
        for tag in [KeyTag::Ed25519, KeyTag::Secp256k1] {
            let pair = KeyPair::random(tag);
            assert_eq!(pair.key_tag(), tag);
            let message = b"uniform capabilities";
            let signature = pair.sign(message);
            assert_eq!(signature.tag(), tag);
            assert!(pair.verify(&signature, message));
            assert!(!pair.verify(&signature, b"some other message"));
            assert_eq!(pair.account_hash(), pair.public_key().account_hash());
        }
    }

    #[test]
    fn test_verify_signature_from_wire_types_alone() {
        for tag in [KeyTag::Ed25519, KeyTag::Secp256k1] {
            let pair = KeyPair::random(tag);
            let message = b"approval check";
            let signature = pair.sign(message);
            assert!(KeyPair::verify_signature(&pair.public_key(), &signature, message));
            assert!(!KeyPair::verify_signature(&pair.public_key(), &signature, b"tampered"));
        }
    }

    #[test]
    fn test_mismatched_tags_never_verify() {
        let ed25519 = KeyPair::random(KeyTag::Ed25519);
        let secp256k1 = KeyPair::random(KeyTag::Secp256k1);
        let message = b"tag confusion";
        let signature = ed25519.sign(message);
        assert!(!KeyPair::verify_signature(&secp256k1.public_key(), &signature, message));
    }

    #[test]
    fn test_from_raw_bytes_accepts_only_32_or_64() {
        for tag in [KeyTag::Ed25519, KeyTag::Secp256k1] {
            assert!(KeyPair::from_raw_bytes(tag, &[7u8; 32]).is_ok());
            assert!(KeyPair::from_raw_bytes(tag, &[7u8; 64]).is_ok());
            for length in [0usize, 31, 33, 48, 63, 65] {
                let result = KeyPair::from_raw_bytes(tag, &vec![7u8; length]);
                assert!(
                    matches!(result, Err(KeyError::InvalidLength(l)) if l == length),
                    "length {length} should be rejected for {tag:?}"
                );
            }
        }
    }

    #[test]
    fn test_64_byte_input_uses_the_leading_secret_half() {
        let seed = [9u8; 32];
        let short = KeyPair::from_raw_bytes(KeyTag::Ed25519, &seed).unwrap();
        let mut long = [0u8; 64];
        long[..32].copy_from_slice(&seed);
        long[32..].copy_from_slice(short.public_key().raw_bytes());
        let from_long = KeyPair::from_raw_bytes(KeyTag::Ed25519, &long).unwrap();
        assert_eq!(short.public_key(), from_long.public_key());
    }

    #[test]
    fn test_account_hash_is_deterministic_and_algorithm_bound() {
        let seed = [13u8; 32];
        let a = KeyPair::from_raw_bytes(KeyTag::Ed25519, &seed).unwrap();
        let b = KeyPair::from_raw_bytes(KeyTag::Ed25519, &seed).unwrap();
        assert_eq!(a.account_hash(), b.account_hash());

        let c = KeyPair::from_raw_bytes(KeyTag::Secp256k1, &seed).unwrap();
        assert_ne!(a.account_hash(), c.account_hash());
    }

    #[test]
    fn test_debug_does_not_leak_secret_material() {
        let seed = [42u8; 32];
        let pair = KeyPair::from_raw_bytes(KeyTag::Ed25519, &seed).unwrap();
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("2a2a2a"));
    }
}
