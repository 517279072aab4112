//! Error types for `ldsig-rdf` crate
use thiserror::Error;

/// Error type for `ldsig-rdf`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Missing canonical identifier for a blank node
    #[error("Missing identifier for blank node {0}")]
    MissingIdentifier(String),
    /// Missing chosen issuer
    #[error("Missing chosen issuer")]
    MissingChosenIssuer,
    /// Blank node labeling did not settle within the configured work budget
    #[error("Blank node labeling exceeded the limit of {0} units of work")]
    RefinementLimitExceeded(usize),
    /// Expected RDF term
    #[error("Expected RDF term")]
    ExpectedTerm,
    /// Expected RDF N-Quad
    #[error("Expected RDF N-Quad")]
    ExpectedNQuad,
    /// Expected RDF Literal
    #[error("Expected RDF Literal")]
    ExpectedLiteral,
    /// Expected RDF blank node label
    #[error("Expected RDF blank node label")]
    ExpectedBlankNodeLabel,
    /// Expected RDF IRI reference
    #[error("Expected RDF IRI reference")]
    ExpectedIRIRef,
    /// Expected RDF language tag
    #[error("Expected RDF language tag")]
    ExpectedLang,
}
