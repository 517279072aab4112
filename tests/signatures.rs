use ldsig::crypto::{ed25519, hashes, KeyKind};
use ldsig::ldp::suites::{Ed25519Signature2018, Ed25519Signature2020};
use ldsig::{
    canonicalize, CanonicalizationOptions, Error, LinkedDataProofs, NoLoader, ProofOptions,
    SignatureSuite, StaticKeyProvider, StaticLoader, SuiteRegistry, SuiteSigner,
};
use rand::rngs::OsRng;
use serde_json::json;

// RFC 8032, section 7.1, test 1.
const SECRET_KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
const PUBLIC_KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
const SIGNATURE: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

fn rfc8032_keypair() -> Vec<u8> {
    let mut keypair = hex::decode(SECRET_KEY).unwrap();
    keypair.extend(hex::decode(PUBLIC_KEY).unwrap());
    keypair
}

fn generate() -> (Vec<u8>, Vec<u8>) {
    let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
    (
        key.to_keypair_bytes().to_vec(),
        key.verifying_key().to_bytes().to_vec(),
    )
}

#[test]
fn known_answer() {
    let suite = Ed25519Signature2018;
    let signature = suite.sign(&rfc8032_keypair(), b"").unwrap();
    assert_eq!(hex::encode(&signature), SIGNATURE);
    suite
        .verify(&hex::decode(PUBLIC_KEY).unwrap(), b"", &signature)
        .unwrap();
}

#[test]
fn sign_verify_round_trip() {
    let (secret, public) = generate();
    for suite in [&Ed25519Signature2018 as &dyn SignatureSuite, &Ed25519Signature2020] {
        let digest = suite.get_digest(b"<http://example.org/s> <http://example.org/p> \"o\" .\n");
        let signature = suite.sign(&secret, &digest).unwrap();
        assert_eq!(signature.len(), ed25519::SIGNATURE_LENGTH);
        suite.verify(&public, &digest, &signature).unwrap();

        let mut tampered = digest.clone();
        tampered[0] ^= 1;
        assert!(matches!(
            suite.verify(&public, &tampered, &signature),
            Err(ldsig::crypto::Error::SignatureMismatch)
        ));
    }
}

#[test]
fn key_sizes() {
    let suite = Ed25519Signature2018;
    assert!(matches!(
        suite.sign(&[0u8; 31], b"message"),
        Err(ldsig::crypto::Error::InvalidKeySize {
            kind: KeyKind::Secret,
            expected: 64,
            actual: 31,
            ..
        })
    ));
    let (secret, _) = generate();
    let signature = suite.sign(&secret, b"message").unwrap();
    assert!(matches!(
        suite.verify(&[0u8; 31], b"message", &signature),
        Err(ldsig::crypto::Error::InvalidKeySize {
            kind: KeyKind::Public,
            expected: 32,
            actual: 31,
            ..
        })
    ));
}

#[test]
fn digest_of_canonical_form() {
    let document = json!({
        "@context": {"name": "http://schema.org/name"},
        "@id": "http://example.org/alice",
        "name": "Alice"
    });
    let suite = Ed25519Signature2018;
    let canonical = suite
        .get_canonical_document(&document, &NoLoader, &CanonicalizationOptions::default())
        .unwrap();
    assert_eq!(
        canonical,
        canonicalize(&document, &NoLoader, &CanonicalizationOptions::default()).unwrap()
    );
    let digest = suite.get_digest(canonical.as_bytes());
    assert_eq!(
        hex::encode(&digest),
        "bbe0f1a14977a4140911090cab4eab7416bc585dbe9ad5c27d766601170ac8a2"
    );
    assert_eq!(digest, hashes::sha256(canonical.as_bytes()));
}

#[test]
fn dispatch() {
    let registry = SuiteRegistry::with_defaults();
    for proof_type in ["Ed25519Signature2018", "Ed25519Signature2020"] {
        assert_eq!(registry.resolve(proof_type).unwrap().proof_type(), proof_type);
    }
    for proof_type in ["ed25519signature2018", "Ed25519Signature2018 ", "", "JsonWebSignature2020"] {
        assert!(matches!(
            registry.resolve(proof_type),
            Err(Error::UnsupportedProofType(t)) if t == proof_type
        ));
    }
}

#[test_log::test]
fn document_proof() {
    let (secret, public) = generate();
    let key_id = "https://example.org/issuer#key-1";
    let provider = StaticKeyProvider::new().with_key(key_id, secret, public);
    let loader = StaticLoader::new().with_context(
        "https://example.org/credentials/v1",
        json!({
            "@vocab": "https://example.org/vocab#",
            "issuer": {"@type": "@id"},
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "issuanceDate": {"@type": "xsd:dateTime"}
        }),
    );
    let credential = json!({
        "@context": "https://example.org/credentials/v1",
        "@id": "urn:uuid:8f7c2cc4-6f2a-4b8e-9a0e-3d2f3b1f5e00",
        "issuer": "https://example.org/issuer",
        "issuanceDate": "2024-03-01T12:00:00Z",
        "degree": {"name": "Bachelor of Science", "level": 6}
    });

    let registry = SuiteRegistry::with_defaults();
    let proofs = LinkedDataProofs::new(&registry, &loader, CanonicalizationOptions::default());
    let signer = SuiteSigner::new(registry.resolve("Ed25519Signature2020").unwrap(), &provider, key_id);
    let options = ProofOptions::new("Ed25519Signature2020")
        .with_verification_method(key_id)
        .with_proof_purpose("assertionMethod");
    let signed = proofs.sign(&credential, &options, &signer).unwrap();
    assert!(signed["proof"]["created"].is_string());
    proofs.verify(&signed, &provider).unwrap();

    let mut tampered = signed.clone();
    tampered["degree"]["level"] = json!(7);
    assert!(matches!(
        proofs.verify(&tampered, &provider),
        Err(Error::Crypto(ldsig::crypto::Error::SignatureMismatch))
    ));

    let transported: serde_json::Value =
        serde_json::from_str(&serde_json::to_string_pretty(&signed).unwrap()).unwrap();
    proofs.verify(&transported, &provider).unwrap();

    let unknown = StaticKeyProvider::new();
    assert!(matches!(
        proofs.verify(&signed, &unknown),
        Err(Error::Crypto(ldsig::crypto::Error::KeyProvider(_)))
    ));
}
