use ldsig_crypto::ed25519;

use crate::SignatureSuite;

/// `Ed25519Signature2020` proof type identifier over the
/// [`Ed25519Signature2018`](super::Ed25519Signature2018) pipeline.
///
/// Proofs carry the signature as an unpadded base64url `proofValue` and
/// expand against [`proof_context`](crate::proof_context). They do not
/// follow the W3C Ed25519Signature2020 suite, whose `proofValue` is a
/// multibase base58btc (`z...`) string and whose terms come from
/// `https://w3id.org/security/suites/ed25519-2020/v1`: proofs made here only
/// verify with this library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signature2020;

impl Ed25519Signature2020 {
    pub const PROOF_TYPE: &'static str = "Ed25519Signature2020";
}

impl SignatureSuite for Ed25519Signature2020 {
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
