use blake2b_simd::Params;

/// Length of the digests used for account hashes, body hashes and deploy
/// hashes.
pub const BLAKE2B_DIGEST_LENGTH: usize = 32;

/// Blake2b-256 digest of `data`.
pub fn blake2b256<T: AsRef<[u8]>>(data: T) -> [u8; BLAKE2B_DIGEST_LENGTH] {
    let hash = Params::new()
        .hash_length(BLAKE2B_DIGEST_LENGTH)
        .hash(data.as_ref());
    let mut digest = [0u8; BLAKE2B_DIGEST_LENGTH];
    digest.copy_from_slice(hash.as_bytes());
    digest
}
