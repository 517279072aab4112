pub mod sha256;

pub use sha256::{sha256, sha256_hex, SHA256_OUTPUT_LEN};
