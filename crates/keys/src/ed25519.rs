//! Ed25519 key pairs (RFC 8032).

use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey, Verifier as _, VerifyingKey,
};
use rand::Rng as _;

use casper_sdk_types::{KeyError, KeyTag, PublicKey, Signature};

/// An Ed25519 signing key pair derived from a 32-byte seed.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Derives the key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Ed25519KeyPair {
        Ed25519KeyPair {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Builds a key pair from raw bytes: a 32-byte seed, or a 64-byte
    /// seed ∥ public-key concatenation of which the leading 32 are used.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Ed25519KeyPair, KeyError> {
        let seed: &[u8] = match bytes.len() {
            32 => bytes,
            64 => &bytes[..32],
            other => return Err(KeyError::InvalidLength(other)),
        };
        // safe: length checked above.
        let seed: [u8; 32] = seed.try_into().map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        Ok(Ed25519KeyPair::from_seed(&seed))
    }

    /// Generates a key pair from a fresh random seed.
    pub fn random() -> Ed25519KeyPair {
        let seed: [u8; 32] = rand::rng().random();
        Ed25519KeyPair::from_seed(&seed)
    }

    pub fn key_tag(&self) -> KeyTag {
        KeyTag::Ed25519
    }

    /// The raw seed this key pair was derived from.
    pub fn seed_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::ed25519(self.signing_key.verifying_key().to_bytes())
    }

    /// Deterministic RFC 8032 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature = self.signing_key.sign(message);
        Signature::new(KeyTag::Ed25519, signature.to_bytes().to_vec())
            // safe: ed25519 signatures are always 64 bytes.
            .expect("ed25519 signature must be 64 bytes")
    }

    /// Returns `false` for malformed or mismatched input rather than
    /// failing.
    pub fn verify(&self, signature: &Signature, message: &[u8]) -> bool {
        signature.tag() == KeyTag::Ed25519
            && verify_raw(
                self.signing_key.verifying_key().as_bytes(),
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
    let Ok(key_bytes) = <&[u8; 32]>::try_from(public_key) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(key_bytes) else {
        return false;
    };
    let Ok(signature) = DalekSignature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

impl core::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032, test vector 1
    const RFC8032_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC8032_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC8032_SIGNATURE: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
                                     5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    fn rfc8032_pair() -> Ed25519KeyPair {
        let seed: [u8; 32] = hex::decode(RFC8032_SEED).unwrap().try_into().unwrap();
        Ed25519KeyPair::from_seed(&seed)
    }

    #[test]
    fn test_public_key_derivation_vector() {
        let pair = rfc8032_pair();
        assert_eq!(hex::encode(pair.public_key().raw_bytes()), RFC8032_PUBLIC);
        assert_eq!(pair.public_key().to_hex(), format!("01{RFC8032_PUBLIC}"));
    }

    #[test]
    fn test_signature_is_the_rfc8032_vector() {
        let pair = rfc8032_pair();
        let signature = pair.sign(b"");
        assert_eq!(hex::encode(signature.raw_bytes()), RFC8032_SIGNATURE);
        assert!(pair.verify(&signature, b""));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let pair = rfc8032_pair();
        assert_eq!(pair.sign(b"msg"), pair.sign(b"msg"));
    }

    #[test]
    fn test_verify_is_false_for_garbage() {
        let pair = rfc8032_pair();
        let bad = Signature::new(KeyTag::Ed25519, vec![0u8; 64]).unwrap();
        assert!(!pair.verify(&bad, b"msg"));
        assert!(!verify_raw(&[0u8; 31], &[0u8; 64], b"msg"));
        assert!(!verify_raw(&[0u8; 32], &[0u8; 63], b"msg"));
    }

    #[test]
    fn test_seed_round_trip() {
        let pair = rfc8032_pair();
        assert_eq!(hex::encode(pair.seed_bytes()), RFC8032_SEED);
    }
}
