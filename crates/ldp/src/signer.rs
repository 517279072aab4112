use ldsig_crypto::{KeyProvider, MessageSigner};

use crate::SignatureSuite;

/// Signs with a suite and a key fetched from a [`KeyProvider`].
///
/// The secret key is requested for each signature and wiped when the call
/// returns.
pub struct SuiteSigner<'a> {
    suite: &'a dyn SignatureSuite,
    provider: &'a dyn KeyProvider,
    key_id: String,
}

impl<'a> SuiteSigner<'a> {
    pub fn new(
        suite: &'a dyn SignatureSuite,
        provider: &'a dyn KeyProvider,
        key_id: impl Into<String>,
    ) -> Self {
        Self {
            suite,
            provider,
            key_id: key_id.into(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl MessageSigner for SuiteSigner<'_> {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, ldsig_crypto::Error> {
        let secret = self.provider.secret_key(&self.key_id)?;
        self.suite.sign(&secret, message)
    }
}
