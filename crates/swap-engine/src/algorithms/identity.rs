//! # Swap Identity
//!
//! Canonical swap ID derivation.
//!
//! The encoding is frozen: compact JSON with keys in the order
//! `sender, receiver, inputAmount, hashLock, expiration`, `inputAmount` as a
//! base-10 string, `hashLock` as `0x` + lowercase hex and `expiration` as an
//! integer. The ID is `0x` + hex(SHA-256(encoding)). Changing any of this
//! changes every ID and breaks agreement with the counter-party.

use crate::domain::{SwapId, SwapTerms};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Canonical byte encoding of swap terms.
pub fn canonical_encoding(terms: &SwapTerms<'_>) -> Vec<u8> {
    // Value's Display escapes strings the same way every JSON encoder must.
    format!(
        "{{\"sender\":{},\"receiver\":{},\"inputAmount\":{},\"hashLock\":{},\"expiration\":{}}}",
        Value::from(terms.sender),
        Value::from(terms.receiver),
        Value::from(terms.input_amount.to_string()),
        Value::from(terms.hash_lock.to_string()),
        terms.expiration,
    )
    .into_bytes()
}

/// Derive the swap ID from its terms.
pub fn derive_id(terms: &SwapTerms<'_>) -> SwapId {
    let digest: [u8; 32] = Sha256::digest(canonical_encoding(terms)).into();
    SwapId::from_bytes(digest)
}
