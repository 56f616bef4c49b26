//! EVM adapter (Ethereum, Matic).
//!
//! `0x` + 40 hex digit addresses, canonicalized to lower case so IDs do not
//! depend on checksum casing.

use super::bind_config;
use crate::algorithms::amount::AmountNormalizer;
use crate::domain::{AdapterConfig, Network, SwapError};
use crate::ports::ChainAdapter;

const ADDRESS_LEN: usize = 20;

/// Adapter for EVM chains.
#[derive(Clone, Debug)]
pub struct EvmAdapter {
    config: AdapterConfig,
    normalizer: AmountNormalizer,
}

impl EvmAdapter {
    /// Create an adapter from an Ethereum or Matic configuration.
    pub fn new(config: AdapterConfig) -> Result<Self, SwapError> {
        let normalizer = bind_config(&config, &[Network::Ethereum, Network::Matic])?;
        Ok(Self { config, normalizer })
    }
}

impl ChainAdapter for EvmAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn normalizer(&self) -> &AmountNormalizer {
        &self.normalizer
    }

    fn address_valid(&self, address: &str) -> bool {
        address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .and_then(|digits| hex::decode(digits).ok())
            .is_some_and(|bytes| bytes.len() == ADDRESS_LEN)
    }

    fn canonical_address(&self, address: &str) -> String {
        address.to_ascii_lowercase()
    }
}
