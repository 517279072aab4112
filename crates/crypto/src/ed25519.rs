//! Ed25519 signatures over raw key bytes.
//!
//! Secret keys use the 64 bytes layout `seed || public key`.
use ed25519_dalek::{Signer, Verifier};

use crate::error::{Error, KeyKind};

pub const ALGORITHM: &str = "ed25519";

pub const SECRET_KEY_LENGTH: usize = ed25519_dalek::KEYPAIR_LENGTH;

pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Signs `message` with a 64 bytes Ed25519 secret key.
pub fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, Error> {
    let bytes: &[u8; SECRET_KEY_LENGTH] = secret_key.try_into().map_err(|_| {
        Error::invalid_key_size(ALGORITHM, KeyKind::Secret, SECRET_KEY_LENGTH, secret_key.len())
    })?;
    // The signing key zeroizes itself on drop.
    let signing_key = ed25519_dalek::SigningKey::from_keypair_bytes(bytes)
        .map_err(|_| Error::InvalidKey(ALGORITHM))?;
    Ok(signing_key.sign(message).to_bytes().to_vec())
}

/// Verifies an Ed25519 `signature` of `message`.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<(), Error> {
    let bytes: &[u8; PUBLIC_KEY_LENGTH] = public_key.try_into().map_err(|_| {
        Error::invalid_key_size(ALGORITHM, KeyKind::Public, PUBLIC_KEY_LENGTH, public_key.len())
    })?;
    let verifying_key =
        ed25519_dalek::VerifyingKey::from_bytes(bytes).map_err(|_| Error::SignatureMismatch)?;
    let signature: ed25519_dalek::Signature =
        signature.try_into().map_err(|_| Error::SignatureMismatch)?;
    verifying_key
        .verify(message, &signature)
        .map_err(|_| Error::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn keypair() -> ([u8; SECRET_KEY_LENGTH], [u8; PUBLIC_KEY_LENGTH]) {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        (
            signing_key.to_keypair_bytes(),
            signing_key.verifying_key().to_bytes(),
        )
    }

    #[test]
    fn roundtrip() {
        let (secret, public) = keypair();
        let signature = sign(&secret, b"test doc").unwrap();
        assert_eq!(signature.len(), SIGNATURE_LENGTH);
        verify(&public, b"test doc", &signature).unwrap();
    }

    #[test]
    fn deterministic() {
        let (secret, _) = keypair();
        assert_eq!(
            sign(&secret, b"hello world").unwrap(),
            sign(&secret, b"hello world").unwrap()
        );
    }

    #[test]
    fn bad_secret_key_length() {
        match sign(b"private", b"test doc") {
            Err(Error::InvalidKeySize {
                algorithm,
                kind: KeyKind::Secret,
                expected: 64,
                actual: 7,
            }) => assert_eq!(algorithm, "ed25519"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn bad_public_key_length() {
        let (secret, _) = keypair();
        let signature = sign(&secret, b"hello world").unwrap();
        let err = verify(b"key", b"hello world", &signature).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ed25519: bad public key length: expected 32 bytes, found 3"
        );
    }

    #[test]
    fn mismatched_keypair_halves() {
        let (mut secret, _) = keypair();
        let (_, other_public) = keypair();
        secret[32..].copy_from_slice(&other_public);
        assert!(matches!(
            sign(&secret, b"msg"),
            Err(Error::InvalidKey(ALGORITHM))
        ));
    }

    #[test]
    fn tampering() {
        let (secret, public) = keypair();
        let signature = sign(&secret, b"hello world").unwrap();
        assert!(matches!(
            verify(&public, b"different doc", &signature),
            Err(Error::SignatureMismatch)
        ));
        assert!(matches!(
            verify(&public, b"hello world", b"signature"),
            Err(Error::SignatureMismatch)
        ));
        let mut flipped = signature.clone();
        flipped[0] ^= 1;
        assert!(matches!(
            verify(&public, b"hello world", &flipped),
            Err(Error::SignatureMismatch)
        ));
        let (_, other_public) = keypair();
        assert!(matches!(
            verify(&other_public, b"hello world", &signature),
            Err(Error::SignatureMismatch)
        ));
    }
}
