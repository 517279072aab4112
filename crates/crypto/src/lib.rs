//! Cryptographic building blocks of the ldsig library: digest functions,
//! raw-key signature algorithms and the key-material provider boundary.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod error;
pub mod hashes;
mod provider;

#[cfg(feature = "ed25519")]
pub mod ed25519;

pub use error::{Error, KeyKind, KeyProviderError};
pub use provider::{KeyProvider, MessageSigner, StaticKeyProvider};
pub use zeroize::Zeroizing;
