use ldsig_crypto::ed25519;

use crate::SignatureSuite;

/// `Ed25519Signature2018` proof type.
///
/// URDNA2015 canonicalization, SHA-256 digests and Ed25519 signatures over
/// 64 bytes private keys and 32 bytes public keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signature2018;

impl Ed25519Signature2018 {
    pub const PROOF_TYPE: &'static str = "Ed25519Signature2018";
}

impl SignatureSuite for Ed25519Signature2018 {
    fn proof_type(&self) -> &str {
        Self::PROOF_TYPE
    }

    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, ldsig_crypto::Error> {
        ed25519::sign(private_key, message)
    }

    fn verify(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ldsig_crypto::Error> {
        ed25519::verify(public_key, message, signature)
    }
}
