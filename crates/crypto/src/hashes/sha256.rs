//! SHA-256 digest.
//!
//! The [`sha256`] function requires feature either `sha2` or `ring`. When both
//! are enabled, `ring` is used.

/// Length in bytes of a SHA-256 digest.
pub const SHA256_OUTPUT_LEN: usize = 32;

/// SHA-256 hash
#[cfg(feature = "ring")]
pub fn sha256(data: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    use ring::digest;
    let hash = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; SHA256_OUTPUT_LEN];
    out.copy_from_slice(hash.as_ref());
    out
}

/// SHA-256 hash
#[cfg(all(not(feature = "ring"), feature = "sha2"))]
pub fn sha256(data: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    use sha2::Digest;
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(all(not(feature = "ring"), not(feature = "sha2")))]
compile_error!("The `sha256` function requires feature either `sha2` or `ring`.");

/// Lowercase hexadecimal SHA-256 digest, as used by the blank node hashing
/// steps of URDNA2015.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
