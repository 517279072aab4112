//! Linked Data Signatures for JSON-LD documents.
//!
//! Signing a JSON-LD document reduces it to a deterministic byte string:
//! the document is expanded against its `@context`, converted to an RDF
//! dataset and canonicalized with URDNA2015 into sorted N-Quads. The
//! canonical form is hashed with SHA-256 and signed by a *signature suite*
//! selected by proof type.
//!
//! This crate gathers the workspace crates:
//! - [`crypto`]: digests, Ed25519 primitives and the key provider boundary;
//! - [`rdf`]: RDF datasets, N-Quads and URDNA2015;
//! - [`json_ld`]: context loading and JSON-LD to RDF conversion;
//! - [`ldp`]: signature suites, the suite registry and document proofs.
//!
//! # Basic Usage
//!
//! ```
//! use ldsig::{canonicalize, CanonicalizationOptions, NoLoader};
//! use serde_json::json;
//!
//! let document = json!({
//!   "@context": {"name": "http://schema.org/name"},
//!   "@id": "http://example.org/alice",
//!   "name": "Alice"
//! });
//!
//! let canonical = canonicalize(&document, &NoLoader, &CanonicalizationOptions::default()).unwrap();
//! assert_eq!(
//!   canonical.as_str(),
//!   "<http://example.org/alice> <http://schema.org/name> \"Alice\" .\n"
//! );
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use ldsig_crypto as crypto;
pub use ldsig_json_ld as json_ld;
pub use ldsig_ldp as ldp;
pub use ldsig_rdf as rdf;

pub use json_ld::{
    canonicalize, CanonicalForm, CanonicalizationError, CanonicalizationOptions, ContextLoader,
    JsonLdOptions, NoLoader, StaticLoader,
};
pub use ldp::{
    Error, KeyProvider, LinkedDataProofs, MessageSigner, ProofOptions, PublicKeyResolver,
    SignatureSuite, StaticKeyProvider, SuiteRegistry, SuiteSigner,
};
