//! Built-in signature suites.
#[cfg(feature = "ed25519")]
mod ed25519_signature_2018;
#[cfg(feature = "ed25519")]
mod ed25519_signature_2020;

#[cfg(feature = "ed25519")]
pub use ed25519_signature_2018::Ed25519Signature2018;
#[cfg(feature = "ed25519")]
pub use ed25519_signature_2020::Ed25519Signature2020;
