//! # Secret Generation and Verification
//!
//! SHA-256 hash locks. Deterministic: both parties can recompute the lock
//! from a revealed secret independently.

use crate::domain::{HashLock, SecureSecret};
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure random secret.
pub fn generate_random_secret() -> SecureSecret {
    SecureSecret::random()
}

/// Create a hashlock from raw pre-image bytes using SHA-256.
pub fn create_hash_lock(preimage: &[u8]) -> HashLock {
    let digest: [u8; 32] = Sha256::digest(preimage).into();
    HashLock::from_bytes(digest)
}

/// Hash lock committing to `secret`.
pub fn generate_hash_lock(secret: &SecureSecret) -> HashLock {
    create_hash_lock(secret.as_bytes())
}

/// Verify that a secret matches a hashlock.
pub fn verify_secret(secret: &SecureSecret, hash_lock: &HashLock) -> bool {
    generate_hash_lock(secret) == *hash_lock
}
