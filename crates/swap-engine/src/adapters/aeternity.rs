//! Aeternity adapter.
//!
//! Aettos precision, `ak_` + base58check account addresses, millisecond
//! lock timestamps.

use super::bind_config;
use crate::algorithms::amount::AmountNormalizer;
use crate::domain::{AdapterConfig, Network, SwapError};
use crate::ports::ChainAdapter;

const ACCOUNT_PREFIX: &str = "ak_";
const PUBLIC_KEY_LEN: usize = 32;

/// Aeternity chain adapter.
#[derive(Clone, Debug)]
pub struct AeternityAdapter {
    config: AdapterConfig,
    normalizer: AmountNormalizer,
}

impl AeternityAdapter {
    /// Create an adapter from an Aeternity configuration.
    pub fn new(config: AdapterConfig) -> Result<Self, SwapError> {
        let normalizer = bind_config(&config, &[Network::Aeternity])?;
        Ok(Self { config, normalizer })
    }
}

impl ChainAdapter for AeternityAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn normalizer(&self) -> &AmountNormalizer {
        &self.normalizer
    }

    fn address_valid(&self, address: &str) -> bool {
        address
            .strip_prefix(ACCOUNT_PREFIX)
            .and_then(|payload| bs58::decode(payload).with_check(None).into_vec().ok())
            .is_some_and(|key| key.len() == PUBLIC_KEY_LEN)
    }
}
