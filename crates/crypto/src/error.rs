use std::fmt;

/// Role of a key in a signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Secret,
    Public,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret => f.write_str("private"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// Signature or verification error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key length does not match the algorithm requirement.
    #[error("{algorithm}: bad {kind} key length: expected {expected} bytes, found {actual}")]
    InvalidKeySize {
        algorithm: &'static str,
        kind: KeyKind,
        expected: usize,
        actual: usize,
    },

    /// Key has the right length but is not usable by the algorithm.
    #[error("{0}: invalid key")]
    InvalidKey(&'static str),

    /// Cryptographic verification failed.
    ///
    /// Wrong key, altered message and altered signature all end up here.
    #[error("signature doesn't match")]
    SignatureMismatch,

    #[error(transparent)]
    KeyProvider(#[from] KeyProviderError),
}

impl Error {
    pub fn invalid_key_size(
        algorithm: &'static str,
        kind: KeyKind,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::InvalidKeySize {
            algorithm,
            kind,
            expected,
            actual,
        }
    }
}

/// Error raised by a [`KeyProvider`](crate::KeyProvider).
#[derive(Debug, Clone, thiserror::Error)]
pub enum KeyProviderError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key provider failure: {0}")]
    Other(String),
}
