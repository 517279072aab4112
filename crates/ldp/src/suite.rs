//! Signature suites.
use ldsig_crypto::hashes::sha256;
use ldsig_json_ld::{
    canonicalize, CanonicalForm, CanonicalizationError, CanonicalizationOptions, ContextLoader,
};
use serde_json::Value;

/// Linked Data Signature suite.
///
/// Binds one canonicalization and digest pipeline to one signature algorithm
/// under a proof type identifier. Suites are stateless: `sign` and `verify`
/// only borrow the key bytes for the duration of the call.
pub trait SignatureSuite: Send + Sync {
    /// Proof type identifier, e.g. `Ed25519Signature2018`.
    fn proof_type(&self) -> &str;

    /// Signs a digest with raw private key bytes.
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>, ldsig_crypto::Error>;

    /// Checks `signature` against `message` with raw public key bytes.
    fn verify(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ldsig_crypto::Error>;

    /// Canonical N-Quads of `document`.
    fn get_canonical_document(
        &self,
        document: &Value,
        loader: &dyn ContextLoader,
        options: &CanonicalizationOptions,
    ) -> Result<CanonicalForm, CanonicalizationError> {
        canonicalize(document, loader, options)
    }

    /// SHA-256 unless the suite commits to another hash.
    fn get_digest(&self, bytes: &[u8]) -> Vec<u8> {
        sha256(bytes).to_vec()
    }

    /// Exact, case-sensitive comparison with [`Self::proof_type`].
    fn accept(&self, proof_type: &str) -> bool {
        proof_type == self.proof_type()
    }
}
