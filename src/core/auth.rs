//! Password hashing seam for the login flow
//!
//! The engine verifies credentials through this trait so deployments can
//! swap the scheme without touching transaction logic. The bundled
//! [`Sha256Hasher`] is a plain digest, not a hardened KDF; treat it as the
//! minimum the login flow needs, not as production-grade auth.

use sha2::{Digest, Sha256};

/// Hashes and verifies login passwords
pub trait PasswordHasher: Send + Sync {
    /// Produce the stored form of a password
    fn hash(&self, password: &str) -> String;

    /// Check a password attempt against a stored hash
    fn verify(&self, password: &str, password_hash: &str) -> bool {
        self.hash(password) == password_hash
    }
}

/// SHA-256 digest, lowercase hex encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }
}
