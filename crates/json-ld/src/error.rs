//! Error types for `ldsig-json-ld` crate
use thiserror::Error;

/// Failure to turn a JSON-LD document into canonical N-Quads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanonicalizationError {
    /// Context processing or expansion failed, e.g. on an undefined term in
    /// strict mode
    #[error("JSON-LD expansion failed: {0}")]
    Expansion(String),
    /// Invalid base IRI
    #[error("Invalid base IRI: {0}")]
    InvalidBaseIri(String),
    /// Remote document does not contain a context
    #[error("Invalid remote context: {0}")]
    InvalidRemoteContext(String),
    /// The context loader could not provide a context
    #[error("Loading context {0} failed: {1}")]
    LoadingContextFailed(String, String),
    /// A document pulls in more distinct remote contexts than allowed
    #[error("Document loads more than {0} remote contexts")]
    TooManyRemoteContexts(usize),
    /// Objects and arrays nested deeper than allowed
    #[error("Document nesting exceeds the maximum depth of {0}")]
    DocumentDepthExceeded(usize),
    /// Top-level document is not a JSON object or array
    #[error("Expected JSON object")]
    ExpectedObject,
    /// JSON value the JSON-LD processor cannot represent
    #[error("Unable to convert JSON: {0}")]
    Json(String),
    /// Blank node labeling did not settle within the configured work budget
    #[error("Canonical labeling exceeded the limit of {0} units of work")]
    RefinementLimitExceeded(usize),
    /// RDF error
    #[error(transparent)]
    Rdf(ldsig_rdf::Error),
}

impl From<ldsig_rdf::Error> for CanonicalizationError {
    fn from(e: ldsig_rdf::Error) -> Self {
        match e {
            ldsig_rdf::Error::RefinementLimitExceeded(limit) => Self::RefinementLimitExceeded(limit),
            e => Self::Rdf(e),
        }
    }
}
