//! Algorand adapter.
//!
//! Microalgo precision. Addresses are the base32 form of a 32 byte public
//! key followed by the last 4 bytes of its SHA-512/256 digest. HTLC locks
//! are expressed as rounds, estimated from the configured block time.

use super::bind_config;
use crate::algorithms::amount::AmountNormalizer;
use crate::domain::{AdapterConfig, Network, SwapError};
use crate::ports::ChainAdapter;
use sha2::{Digest, Sha512_256};

const ADDRESS_LEN: usize = 58;
const PUBLIC_KEY_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Unpadded RFC 4648 base32; trailing bits must be zero.
fn decode_base32(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let (mut buffer, mut bits) = (0u32, 0u32);
    for c in text.bytes() {
        let value = BASE32_ALPHABET.iter().position(|&a| a == c)? as u32;
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    (buffer == 0).then_some(out)
}

/// Algorand chain adapter.
#[derive(Clone, Debug)]
pub struct AlgorandAdapter {
    config: AdapterConfig,
    normalizer: AmountNormalizer,
}

impl AlgorandAdapter {
    /// Create an adapter from an Algorand configuration.
    pub fn new(config: AdapterConfig) -> Result<Self, SwapError> {
        let normalizer = bind_config(&config, &[Network::Algorand])?;
        Ok(Self { config, normalizer })
    }
}

impl ChainAdapter for AlgorandAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn normalizer(&self) -> &AmountNormalizer {
        &self.normalizer
    }

    fn address_valid(&self, address: &str) -> bool {
        if address.len() != ADDRESS_LEN {
            return false;
        }
        let Some(bytes) = decode_base32(address) else {
            return false;
        };
        if bytes.len() != PUBLIC_KEY_LEN + CHECKSUM_LEN {
            return false;
        }
        let (key, checksum) = bytes.split_at(PUBLIC_KEY_LEN);
        Sha512_256::digest(key)[32 - CHECKSUM_LEN..] == *checksum
    }
}
