use ldsig_crypto::KeyProviderError;
use ldsig_json_ld::CanonicalizationError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unsupported proof type: {0}")]
    UnsupportedProofType(String),
    #[error("A suite is already registered for proof type {0}")]
    DuplicateProofType(String),
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
    #[error(transparent)]
    Crypto(#[from] ldsig_crypto::Error),
    #[error("Missing proof")]
    MissingProof,
    #[error("Missing proof type")]
    MissingProofType,
    #[error("Missing proof value")]
    MissingProofValue,
    #[error("Missing verification method")]
    MissingVerificationMethod,
    #[error("Invalid proof value: {0}")]
    InvalidProofValue(#[from] base64::DecodeError),
    #[error("Expected a JSON object")]
    ExpectedJsonObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Unable to resolve public key: {0}")]
    PublicKeyResolution(String),
}

impl From<KeyProviderError> for Error {
    fn from(e: KeyProviderError) -> Self {
        Self::Crypto(e.into())
    }
}
