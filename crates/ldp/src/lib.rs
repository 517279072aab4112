//! Linked Data Signatures over canonicalized JSON-LD documents.
//!
//! A [`SignatureSuite`] binds canonicalization, digest and a signature
//! algorithm under a proof type identifier. Suites are looked up by proof
//! type in a [`SuiteRegistry`]; [`LinkedDataProofs`] uses the registry to
//! attach proofs to documents and to check them.
mod error;
mod proof;
mod registry;
mod signer;
mod suite;
pub mod suites;

pub use error::Error;
pub use ldsig_crypto::{KeyProvider, KeyProviderError, MessageSigner, StaticKeyProvider};
pub use proof::{proof_context, LinkedDataProofs, ProofOptions, PublicKeyResolver};
pub use registry::SuiteRegistry;
pub use signer::SuiteSigner;
pub use suite::SignatureSuite;
