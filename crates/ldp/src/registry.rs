use std::fmt;

use crate::{Error, SignatureSuite};

/// Maps proof type identifiers to signature suites.
///
/// Built mutably at start-up, then shared by reference (or behind an `Arc`)
/// with every verifier. Lookups take `&self` and need no locking.
#[derive(Default)]
pub struct SuiteRegistry {
    suites: Vec<Box<dyn SignatureSuite>>,
}

impl SuiteRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in suite.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "ed25519")]
        {
            registry.suites.push(Box::new(crate::suites::Ed25519Signature2018));
            registry.suites.push(Box::new(crate::suites::Ed25519Signature2020));
        }
        registry
    }

    /// Appends a suite. Fails if a registered suite already accepts the same
    /// proof type.
    pub fn register(&mut self, suite: impl SignatureSuite + 'static) -> Result<&mut Self, Error> {
        let proof_type = suite.proof_type();
        if self.suites.iter().any(|s| s.accept(proof_type)) {
            return Err(Error::DuplicateProofType(proof_type.to_string()));
        }
        log::debug!("registering signature suite {}", proof_type);
        self.suites.push(Box::new(suite));
        Ok(self)
    }

    /// Suite accepting `proof_type`.
    pub fn resolve(&self, proof_type: &str) -> Result<&dyn SignatureSuite, Error> {
        match self.suites.iter().find(|suite| suite.accept(proof_type)) {
            Some(suite) => {
                log::debug!("dispatching proof type {}", proof_type);
                Ok(suite.as_ref())
            }
            None => Err(Error::UnsupportedProofType(proof_type.to_string())),
        }
    }

    pub fn proof_types(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(|suite| suite.proof_type())
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

impl fmt::Debug for SuiteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.proof_types()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mock(&'static str);

    impl SignatureSuite for Mock {
        fn proof_type(&self) -> &str {
            self.0
        }

        fn sign(&self, _: &[u8], message: &[u8]) -> Result<Vec<u8>, ldsig_crypto::Error> {
            Ok(message.to_vec())
        }

        fn verify(&self, _: &[u8], message: &[u8], signature: &[u8]) -> Result<(), ldsig_crypto::Error> {
            if message == signature {
                Ok(())
            } else {
                Err(ldsig_crypto::Error::SignatureMismatch)
            }
        }
    }

    #[test]
    fn registry_miss() {
        let registry = SuiteRegistry::with_defaults();
        assert!(matches!(
            registry.resolve("RsaSignature2018"),
            Err(Error::UnsupportedProofType(t)) if t == "RsaSignature2018"
        ));
        assert!(matches!(
            SuiteRegistry::new().resolve("Ed25519Signature2018"),
            Err(Error::UnsupportedProofType(_))
        ));
    }

    #[test]
    fn defaults() {
        let registry = SuiteRegistry::with_defaults();
        assert_eq!(
            registry.proof_types().collect::<Vec<_>>(),
            ["Ed25519Signature2018", "Ed25519Signature2020"]
        );
        let suite = registry.resolve("Ed25519Signature2020").unwrap();
        assert_eq!(suite.proof_type(), "Ed25519Signature2020");
        assert_eq!(
            format!("{:?}", registry),
            "[\"Ed25519Signature2018\", \"Ed25519Signature2020\"]"
        );
    }

    #[test]
    fn additional_suite() {
        let mut registry = SuiteRegistry::with_defaults();
        registry.register(Mock("MockSignature2024")).unwrap();
        let suite = registry.resolve("MockSignature2024").unwrap();
        let signature = suite.sign(&[], b"digest").unwrap();
        suite.verify(&[], b"digest", &signature).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(matches!(
            registry.register(Mock("Ed25519Signature2018")),
            Err(Error::DuplicateProofType(t)) if t == "Ed25519Signature2018"
        ));
    }

    #[test]
    fn shared_between_threads() {
        let registry = std::sync::Arc::new(SuiteRegistry::with_defaults());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.resolve("Ed25519Signature2018").is_ok())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
