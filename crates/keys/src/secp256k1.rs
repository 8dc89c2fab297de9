//! secp256k1 key pairs (ECDSA over SHA-256).

use k256::ecdsa::{
    Signature as EcdsaSignature, SigningKey, VerifyingKey,
    signature::{Signer as _, Verifier as _},
};
use rand::Rng as _;

use casper_sdk_types::{KeyError, KeyTag, PublicKey, Signature};

/// A secp256k1 signing key pair.
///
/// Signatures are deterministic (RFC 6979 nonces), low-S normalized, and
/// fixed at 64 bytes.
#[derive(Clone)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Builds a key pair from raw bytes: a 32-byte scalar, or a 64-byte
    /// secret ∥ public concatenation of which the leading 32 are used.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Secp256k1KeyPair, KeyError> {
        let secret: &[u8] = match bytes.len() {
            32 => bytes,
            64 => &bytes[..32],
            other => return Err(KeyError::InvalidLength(other)),
        };
        let signing_key = SigningKey::from_slice(secret).map_err(|_| KeyError::InvalidKey)?;
        Ok(Secp256k1KeyPair { signing_key })
    }

    /// Generates a key pair from a fresh random scalar.
    pub fn random() -> Secp256k1KeyPair {
        loop {
            let candidate: [u8; 32] = rand::rng().random();
            // Zero and over-order scalars are rejected; try again. The
            // rejection probability is negligible.
            if let Ok(signing_key) = SigningKey::from_slice(&candidate) {
                return Secp256k1KeyPair { signing_key };
            }
        }
    }

    pub fn key_tag(&self) -> KeyTag {
        KeyTag::Secp256k1
    }

    /// The raw 32-byte secret scalar.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    /// The compressed 33-byte public key.
    pub fn public_key(&self) -> PublicKey {
        let point = self.signing_key.verifying_key().to_encoded_point(true);
        let compressed: [u8; 33] = point
            .as_bytes()
            .try_into()
            // safe: a compressed secp256k1 point is always 33 bytes.
            .expect("compressed point must be 33 bytes");
        PublicKey::secp256k1(compressed)
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature: EcdsaSignature = self.signing_key.sign(message);
        let signature = signature.normalize_s().unwrap_or(signature);
        Signature::new(KeyTag::Secp256k1, signature.to_bytes().to_vec())
            // safe: a fixed-size ECDSA signature is always 64 bytes.
            .expect("ecdsa signature must be 64 bytes")
    }

    /// Returns `false` for malformed or mismatched input rather than
    /// failing.
    pub fn verify(&self, signature: &Signature, message: &[u8]) -> bool {
        signature.tag() == KeyTag::Secp256k1
            && verify_raw(
                self.signing_key.verifying_key().to_encoded_point(true).as_bytes(),
                signature.raw_bytes(),
                message,
            )
    }

    pub fn account_hash(&self) -> [u8; 32] {
        self.public_key().account_hash()
    }

    pub fn account_hash_hex(&self) -> String {
        self.public_key().account_hash_hex()
    }
}

pub(crate) fn verify_raw(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = EcdsaSignature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

impl core::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pair() -> Secp256k1KeyPair {
        Secp256k1KeyPair::from_raw_bytes(&[7u8; 32]).unwrap()
    }

    #[test]
    fn test_public_key_is_compressed() {
        let key = test_pair().public_key();
        assert_eq!(key.tag(), KeyTag::Secp256k1);
        assert_eq!(key.raw_bytes().len(), 33);
        assert!(matches!(key.raw_bytes()[0], 2 | 3));
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let pair = test_pair();
        let message = b"transfer 2.5 CSPR";
        let signature = pair.sign(message);
        assert_eq!(signature.raw_bytes().len(), 64);
        assert!(pair.verify(&signature, message));
        assert!(!pair.verify(&signature, b"transfer 250 CSPR"));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let pair = test_pair();
        assert_eq!(pair.sign(b"msg"), pair.sign(b"msg"));
    }

    #[test]
    fn test_zero_scalar_is_rejected() {
        assert_eq!(
            Secp256k1KeyPair::from_raw_bytes(&[0u8; 32]).unwrap_err(),
            KeyError::InvalidKey
        );
    }

    #[test]
    fn test_verify_is_false_for_garbage() {
        assert!(!verify_raw(&[0u8; 33], &[0u8; 64], b"msg"));
        let pair = test_pair();
        let sig = pair.sign(b"msg");
        let truncated = &sig.raw_bytes()[..63];
        assert!(!verify_raw(
            pair.public_key().raw_bytes(),
            truncated,
            b"msg"
        ));
    }
}
