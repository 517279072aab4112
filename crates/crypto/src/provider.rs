//! Key-material provider boundary.
//!
//! Keys are owned by an external component (typically a wallet). The core only
//! borrows their raw bytes for the duration of one call.
use std::collections::HashMap;
use std::fmt;

use zeroize::Zeroizing;

use crate::error::{Error, KeyProviderError};

/// Source of raw key bytes.
pub trait KeyProvider {
    /// Returns the secret key bytes associated to `key_id`.
    fn secret_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyProviderError>;

    /// Returns the public key bytes associated to `key_id`.
    fn public_key(&self, key_id: &str) -> Result<Vec<u8>, KeyProviderError>;
}

impl<P: KeyProvider + ?Sized> KeyProvider for &P {
    fn secret_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyProviderError> {
        P::secret_key(*self, key_id)
    }

    fn public_key(&self, key_id: &str) -> Result<Vec<u8>, KeyProviderError> {
        P::public_key(*self, key_id)
    }
}

/// Narrow signing capability: turns a message into signature bytes.
pub trait MessageSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error>;
}

impl<S: MessageSigner + ?Sized> MessageSigner for &S {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        S::sign(*self, message)
    }
}

struct StoredKey {
    secret: Zeroizing<Vec<u8>>,
    public: Vec<u8>,
}

/// In-memory key provider.
///
/// Populated before it is shared, read-only afterwards.
#[derive(Default)]
pub struct StaticKeyProvider {
    keys: HashMap<String, StoredKey>,
}

impl StaticKeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key_id: impl Into<String>, secret: Vec<u8>, public: Vec<u8>) {
        self.keys.insert(
            key_id.into(),
            StoredKey {
                secret: Zeroizing::new(secret),
                public,
            },
        );
    }

    pub fn with_key(mut self, key_id: impl Into<String>, secret: Vec<u8>, public: Vec<u8>) -> Self {
        self.insert(key_id, secret, public);
        self
    }

    pub fn contains(&self, key_id: &str) -> bool {
        self.keys.contains_key(key_id)
    }

    fn get(&self, key_id: &str) -> Result<&StoredKey, KeyProviderError> {
        self.keys
            .get(key_id)
            .ok_or_else(|| KeyProviderError::KeyNotFound(key_id.to_owned()))
    }
}

impl KeyProvider for StaticKeyProvider {
    fn secret_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyProviderError> {
        Ok(self.get(key_id)?.secret.clone())
    }

    fn public_key(&self, key_id: &str) -> Result<Vec<u8>, KeyProviderError> {
        Ok(self.get(key_id)?.public.clone())
    }
}

impl fmt::Debug for StaticKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.keys.keys().collect();
        ids.sort();
        f.debug_struct("StaticKeyProvider")
            .field("key_ids", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let provider = StaticKeyProvider::new().with_key("k1", vec![1; 4], vec![2; 2]);
        assert!(provider.contains("k1"));
        assert_eq!(&provider.secret_key("k1").unwrap()[..], &[1, 1, 1, 1]);
        assert_eq!(provider.public_key("k1").unwrap(), vec![2, 2]);
        assert!(matches!(
            provider.public_key("k2"),
            Err(KeyProviderError::KeyNotFound(id)) if id == "k2"
        ));
    }

    #[test]
    fn debug_hides_key_bytes() {
        let provider = StaticKeyProvider::new().with_key("k1", vec![42; 4], vec![7; 2]);
        let printed = format!("{:?}", provider);
        assert_eq!(printed, "StaticKeyProvider { key_ids: [\"k1\"] }");
    }
}
