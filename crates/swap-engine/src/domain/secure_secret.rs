//! # Secure Secret Type
//!
//! Wrapper for HTLC pre-images that zeroizes memory on drop.
//!
//! The initiator holds the secret until the counter-swap is funded and then
//! hands it to exactly one withdrawal call. `Debug` never prints the bytes.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of freshly generated secrets (256 bits).
pub const SECRET_LEN: usize = 32;

/// A secure secret that zeroizes on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: Vec<u8>,
}

impl SecureSecret {
    /// Create a secret from caller-provided bytes.
    ///
    /// Returns `None` for an empty pre-image.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let inner = bytes.into();
        if inner.is_empty() {
            return None;
        }
        Some(Self { inner })
    }

    /// Generate a fresh 256-bit secret from the thread-local CSPRNG.
    pub fn random() -> Self {
        let mut inner = vec![0u8; SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut inner);
        Self { inner }
    }

    /// Decode a hex secret (with or without `0x`).
    pub fn from_hex(text: &str) -> Option<Self> {
        let bare = text.trim().trim_start_matches("0x");
        hex::decode(bare).ok().and_then(Self::new)
    }

    /// Get the secret bytes (use carefully!).
    ///
    /// Avoid keeping references to the returned slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Hex encoding, for handing the pre-image to a chain client.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.inner)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Always false: empty secrets cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the actual secret
        f.write_str("SecureSecret(***)")
    }
}

// Revealed secrets are published with the swap record, as hex.
impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| serde::de::Error::custom("invalid secret"))
    }
}
