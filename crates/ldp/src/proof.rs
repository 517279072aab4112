//! Linked Data Proofs embedded in JSON-LD documents.
use chrono::prelude::*;
use chrono::SubsecRound;
use ldsig_crypto::{KeyProvider, MessageSigner};
use ldsig_json_ld::{CanonicalizationOptions, ContextLoader};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{Error, SignatureSuite, SuiteRegistry};

const PROOF: &str = "proof";
const CONTEXT: &str = "@context";
/// Proof entries excluded from the signed proof options.
const SIGNATURE_PROPERTIES: [&str; 3] = ["proofValue", "jws", "signatureValue"];

/// Context defining the proof vocabulary. Appended after the document's own
/// contexts when canonicalizing proof options.
pub fn proof_context() -> Value {
    json!({
        "@vocab": "https://w3id.org/security#",
        "id": "@id",
        "type": "@type",
        "dc": "http://purl.org/dc/terms/",
        "xsd": "http://www.w3.org/2001/XMLSchema#",
        "created": {"@id": "dc:created", "@type": "xsd:dateTime"},
        "creator": {"@id": "dc:creator", "@type": "@id"},
        "verificationMethod": {"@type": "@id"},
        "proofPurpose": {"@type": "@vocab"}
    })
}

fn now_s() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Options of a new proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOptions {
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Creation date. Current time when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl ProofOptions {
    pub fn new(proof_type: impl Into<String>) -> Self {
        Self {
            proof_type: proof_type.into(),
            ..Self::default()
        }
    }

    pub fn with_verification_method(self, verification_method: impl Into<String>) -> Self {
        Self {
            verification_method: Some(verification_method.into()),
            ..self
        }
    }

    pub fn with_proof_purpose(self, proof_purpose: impl Into<String>) -> Self {
        Self {
            proof_purpose: Some(proof_purpose.into()),
            ..self
        }
    }

    pub fn with_created(self, created: DateTime<Utc>) -> Self {
        Self {
            created: Some(created),
            ..self
        }
    }
}

/// Source of the public key bytes a proof's verification method designates.
pub trait PublicKeyResolver {
    fn resolve(&self, verification_method: &str) -> Result<Vec<u8>, Error>;
}

impl<P: KeyProvider> PublicKeyResolver for P {
    fn resolve(&self, verification_method: &str) -> Result<Vec<u8>, Error> {
        Ok(self.public_key(verification_method)?)
    }
}

/// Creates and verifies proofs attached to JSON-LD documents.
pub struct LinkedDataProofs<'a> {
    registry: &'a SuiteRegistry,
    loader: &'a dyn ContextLoader,
    options: CanonicalizationOptions,
}

impl<'a> LinkedDataProofs<'a> {
    pub fn new(
        registry: &'a SuiteRegistry,
        loader: &'a dyn ContextLoader,
        options: CanonicalizationOptions,
    ) -> Self {
        Self {
            registry,
            loader,
            options,
        }
    }

    /// Signs `document` and returns a copy carrying the new proof.
    ///
    /// Proofs already attached to the document are kept: the new proof is
    /// appended to them and does not cover them.
    pub fn sign(
        &self,
        document: &Value,
        options: &ProofOptions,
        signer: &dyn MessageSigner,
    ) -> Result<Value, Error> {
        let suite = self.registry.resolve(&options.proof_type)?;
        let (unsigned, existing) = split_proofs(document)?;
        let options = ProofOptions {
            created: Some(options.created.unwrap_or_else(now_s)),
            ..options.clone()
        };
        let mut proof = match serde_json::to_value(&options)? {
            Value::Object(proof) => proof,
            _ => return Err(Error::ExpectedJsonObject),
        };
        let verify_data = self.verify_data(suite, &unsigned, &proof)?;
        let signature = signer.sign(&verify_data)?;
        proof.insert(
            "proofValue".to_string(),
            Value::String(base64::encode_config(signature, base64::URL_SAFE_NO_PAD)),
        );
        log::debug!(
            "created {} proof for verification method {:?}",
            options.proof_type,
            options.verification_method
        );

        let mut signed = unsigned;
        let mut proofs = existing;
        proofs.push(Value::Object(proof));
        let proof = if proofs.len() == 1 {
            proofs.remove(0)
        } else {
            Value::Array(proofs)
        };
        signed.insert(PROOF.to_string(), proof);
        Ok(Value::Object(signed))
    }

    /// Verifies every proof attached to `document`.
    pub fn verify(&self, document: &Value, resolver: &dyn PublicKeyResolver) -> Result<(), Error> {
        let (unsigned, proofs) = split_proofs(document)?;
        if proofs.is_empty() {
            return Err(Error::MissingProof);
        }
        for proof in proofs {
            let proof = match proof {
                Value::Object(proof) => proof,
                _ => return Err(Error::ExpectedJsonObject),
            };
            let proof_type = proof
                .get("type")
                .and_then(Value::as_str)
                .ok_or(Error::MissingProofType)?;
            let suite = self.registry.resolve(proof_type)?;
            let proof_value = proof
                .get("proofValue")
                .and_then(Value::as_str)
                .ok_or(Error::MissingProofValue)?;
            let signature = base64::decode_config(proof_value, base64::URL_SAFE_NO_PAD)?;
            let verification_method = proof
                .get("verificationMethod")
                .or_else(|| proof.get("creator"))
                .and_then(Value::as_str)
                .ok_or(Error::MissingVerificationMethod)?;
            let public_key = resolver.resolve(verification_method)?;
            let verify_data = self.verify_data(suite, &unsigned, &proof)?;
            if let Err(e) = suite.verify(&public_key, &verify_data, &signature) {
                log::debug!("{} proof by {} rejected", proof_type, verification_method);
                return Err(e.into());
            }
            log::debug!("{} proof by {} verified", proof_type, verification_method);
        }
        Ok(())
    }

    /// `digest(canon(proof options)) || digest(canon(document))`
    fn verify_data(
        &self,
        suite: &dyn SignatureSuite,
        unsigned: &Map<String, Value>,
        proof: &Map<String, Value>,
    ) -> Result<Vec<u8>, Error> {
        let mut proof_options = proof.clone();
        for property in SIGNATURE_PROPERTIES {
            proof_options.remove(property);
        }
        let proof_context_entry = proof_options.remove(CONTEXT);
        let mut contexts = Vec::new();
        for context in [unsigned.get(CONTEXT), proof_context_entry.as_ref()]
            .into_iter()
            .flatten()
        {
            match context {
                Value::Array(items) => contexts.extend(items.iter().cloned()),
                context => contexts.push(context.clone()),
            }
        }
        contexts.push(proof_context());
        proof_options.insert(CONTEXT.to_string(), Value::Array(contexts));

        let proof_canonical =
            suite.get_canonical_document(&Value::Object(proof_options), self.loader, &self.options)?;
        let document = Value::Object(unsigned.clone());
        let document_canonical =
            suite.get_canonical_document(&document, self.loader, &self.options)?;
        let mut data = suite.get_digest(proof_canonical.as_bytes());
        data.extend(suite.get_digest(document_canonical.as_bytes()));
        Ok(data)
    }
}

/// Splits a document into its unsigned part and its attached proofs.
fn split_proofs(document: &Value) -> Result<(Map<String, Value>, Vec<Value>), Error> {
    let mut unsigned = match document {
        Value::Object(object) => object.clone(),
        _ => return Err(Error::ExpectedJsonObject),
    };
    let proofs = match unsigned.remove(PROOF) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(proofs)) => proofs,
        Some(proof) => vec![proof],
    };
    Ok((unsigned, proofs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SuiteSigner;
    use ldsig_crypto::StaticKeyProvider;
    use ldsig_json_ld::NoLoader;
    use rand::rngs::OsRng;

    const ALICE: &str = "did:example:alice#key-1";
    const BOB: &str = "did:example:bob#key-1";

    fn provider() -> StaticKeyProvider {
        let mut provider = StaticKeyProvider::new();
        for id in [ALICE, BOB] {
            let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
            provider.insert(
                id,
                key.to_keypair_bytes().to_vec(),
                key.verifying_key().to_bytes().to_vec(),
            );
        }
        provider
    }

    fn credential() -> Value {
        json!({
            "@context": {
                "name": "http://schema.org/name",
                "knows": {"@id": "http://xmlns.com/foaf/0.1/knows", "@type": "@id"}
            },
            "@id": "did:example:alice",
            "name": "Alice",
            "knows": "did:example:bob"
        })
    }

    fn options(key_id: &str) -> ProofOptions {
        ProofOptions::new("Ed25519Signature2018")
            .with_verification_method(key_id)
            .with_proof_purpose("assertionMethod")
            .with_created(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
    }

    #[test_log::test]
    fn sign_and_verify() {
        let registry = SuiteRegistry::with_defaults();
        let provider = provider();
        let proofs = LinkedDataProofs::new(&registry, &NoLoader, CanonicalizationOptions::default());
        let suite = registry.resolve("Ed25519Signature2018").unwrap();
        let signer = SuiteSigner::new(suite, &provider, ALICE);

        let signed = proofs.sign(&credential(), &options(ALICE), &signer).unwrap();
        let proof = &signed["proof"];
        assert_eq!(proof["type"], "Ed25519Signature2018");
        assert_eq!(proof["created"], "2020-01-01T00:00:00Z");
        assert_eq!(proof["verificationMethod"], ALICE);
        let proof_value = proof["proofValue"].as_str().unwrap();
        assert_eq!(proof_value.len(), 86);
        assert!(!proof_value.contains('='));
        proofs.verify(&signed, &provider).unwrap();
    }

    #[test]
    fn tampering() {
        let registry = SuiteRegistry::with_defaults();
        let provider = provider();
        let proofs = LinkedDataProofs::new(&registry, &NoLoader, CanonicalizationOptions::default());
        let signer = SuiteSigner::new(registry.resolve("Ed25519Signature2018").unwrap(), &provider, ALICE);
        let signed = proofs.sign(&credential(), &options(ALICE), &signer).unwrap();

        let mut altered = signed.clone();
        altered["name"] = json!("Mallory");
        assert!(matches!(
            proofs.verify(&altered, &provider),
            Err(Error::Crypto(ldsig_crypto::Error::SignatureMismatch))
        ));

        let mut altered = signed.clone();
        altered["proof"]["created"] = json!("2021-01-01T00:00:00Z");
        assert!(matches!(
            proofs.verify(&altered, &provider),
            Err(Error::Crypto(ldsig_crypto::Error::SignatureMismatch))
        ));

        let mut altered = signed.clone();
        altered["proof"]["verificationMethod"] = json!(BOB);
        assert!(matches!(
            proofs.verify(&altered, &provider),
            Err(Error::Crypto(ldsig_crypto::Error::SignatureMismatch))
        ));

        let mut altered = signed;
        altered["proof"]["proofValue"] = json!("not base64!");
        assert!(matches!(
            proofs.verify(&altered, &provider),
            Err(Error::InvalidProofValue(_))
        ));
    }

    #[test]
    fn multiple_proofs() {
        let registry = SuiteRegistry::with_defaults();
        let provider = provider();
        let proofs = LinkedDataProofs::new(&registry, &NoLoader, CanonicalizationOptions::default());
        let alice = SuiteSigner::new(registry.resolve("Ed25519Signature2018").unwrap(), &provider, ALICE);
        let bob = SuiteSigner::new(registry.resolve("Ed25519Signature2020").unwrap(), &provider, BOB);

        let signed = proofs.sign(&credential(), &options(ALICE), &alice).unwrap();
        let options = ProofOptions {
            proof_type: "Ed25519Signature2020".to_string(),
            ..options(BOB)
        };
        let signed = proofs.sign(&signed, &options, &bob).unwrap();
        assert_eq!(signed["proof"].as_array().map(Vec::len), Some(2));
        proofs.verify(&signed, &provider).unwrap();

        let mut altered = signed;
        altered["proof"][1]["type"] = json!("Ed25519Signature2018");
        assert!(proofs.verify(&altered, &provider).is_err());
    }

    #[test]
    fn malformed_proofs() {
        let registry = SuiteRegistry::with_defaults();
        let provider = provider();
        let proofs = LinkedDataProofs::new(&registry, &NoLoader, CanonicalizationOptions::default());
        assert!(matches!(
            proofs.verify(&credential(), &provider),
            Err(Error::MissingProof)
        ));

        let mut document = credential();
        document["proof"] = json!([]);
        assert!(matches!(proofs.verify(&document, &provider), Err(Error::MissingProof)));

        document["proof"] = json!({"proofValue": "AA"});
        assert!(matches!(proofs.verify(&document, &provider), Err(Error::MissingProofType)));

        document["proof"] = json!({"type": "RsaSignature2018", "proofValue": "AA"});
        assert!(matches!(
            proofs.verify(&document, &provider),
            Err(Error::UnsupportedProofType(t)) if t == "RsaSignature2018"
        ));

        document["proof"] = json!({"type": "Ed25519Signature2018", "verificationMethod": ALICE});
        assert!(matches!(proofs.verify(&document, &provider), Err(Error::MissingProofValue)));

        document["proof"] = json!({"type": "Ed25519Signature2018", "proofValue": "AA"});
        assert!(matches!(
            proofs.verify(&document, &provider),
            Err(Error::MissingVerificationMethod)
        ));

        assert!(matches!(
            proofs.verify(&json!("text"), &provider),
            Err(Error::ExpectedJsonObject)
        ));
    }

    #[test]
    fn unknown_signer_key() {
        let registry = SuiteRegistry::with_defaults();
        let provider = provider();
        let proofs = LinkedDataProofs::new(&registry, &NoLoader, CanonicalizationOptions::default());
        let signer = SuiteSigner::new(
            registry.resolve("Ed25519Signature2018").unwrap(),
            &provider,
            "did:example:carol#key-1",
        );
        assert!(matches!(
            proofs.sign(&credential(), &options(ALICE), &signer),
            Err(Error::Crypto(ldsig_crypto::Error::KeyProvider(_)))
        ));
    }

    #[test]
    fn ed25519_2020_proof_value_is_base64url() {
        let registry = SuiteRegistry::with_defaults();
        let provider = provider();
        let proofs = LinkedDataProofs::new(&registry, &NoLoader, CanonicalizationOptions::default());
        let signer = SuiteSigner::new(registry.resolve("Ed25519Signature2020").unwrap(), &provider, ALICE);
        let options = ProofOptions {
            proof_type: "Ed25519Signature2020".to_string(),
            ..options(ALICE)
        };
        let signed = proofs.sign(&credential(), &options, &signer).unwrap();

        let proof_value = signed["proof"]["proofValue"].as_str().unwrap();
        let signature = base64::decode_config(proof_value, base64::URL_SAFE_NO_PAD).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signed["proof"].get("@context").is_none());
        proofs.verify(&signed, &provider).unwrap();
    }
}
