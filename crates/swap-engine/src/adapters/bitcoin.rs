//! Bitcoin adapter.
//!
//! Satoshi precision. Addresses are parsed with the `bitcoin` crate, so
//! base58 and bech32 checksums are enforced along with the network the
//! adapter serves: mainnet, or testnet/signet/regtest when
//! `AdapterConfig::testnet` is set. Bech32 is canonicalized to lower case.

use super::bind_config;
use crate::algorithms::amount::AmountNormalizer;
use crate::domain::{AdapterConfig, Network, SwapError};
use crate::ports::ChainAdapter;
use ::bitcoin::address::{Address, NetworkUnchecked};
use ::bitcoin::Network as BitcoinNetwork;

const MAINNET: [BitcoinNetwork; 1] = [BitcoinNetwork::Bitcoin];
const TESTNETS: [BitcoinNetwork; 3] = [
    BitcoinNetwork::Testnet,
    BitcoinNetwork::Signet,
    BitcoinNetwork::Regtest,
];

/// Bitcoin chain adapter.
#[derive(Clone, Debug)]
pub struct BitcoinAdapter {
    config: AdapterConfig,
    normalizer: AmountNormalizer,
    networks: &'static [BitcoinNetwork],
}

impl BitcoinAdapter {
    /// Create an adapter from a Bitcoin configuration.
    pub fn new(config: AdapterConfig) -> Result<Self, SwapError> {
        let normalizer = bind_config(&config, &[Network::Bitcoin])?;
        let networks: &'static [BitcoinNetwork] = if config.testnet { &TESTNETS } else { &MAINNET };
        Ok(Self {
            config,
            normalizer,
            networks,
        })
    }

    /// Parse `address` and require one of the served networks.
    fn parse(&self, address: &str) -> Option<Address> {
        let unchecked = address
            .parse::<Address<NetworkUnchecked>>()
            .ok()
            .or_else(|| {
                // bech32 may be written all upper case
                (address == address.to_ascii_uppercase())
                    .then(|| address.to_ascii_lowercase().parse().ok())
                    .flatten()
            })?;
        let network = self
            .networks
            .iter()
            .copied()
            .find(|network| unchecked.is_valid_for_network(*network))?;
        unchecked.require_network(network).ok()
    }
}

impl ChainAdapter for BitcoinAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn normalizer(&self) -> &AmountNormalizer {
        &self.normalizer
    }

    fn address_valid(&self, address: &str) -> bool {
        self.parse(address).is_some()
    }

    fn canonical_address(&self, address: &str) -> String {
        self.parse(address)
            .map(|parsed| parsed.to_string())
            .unwrap_or_else(|| address.to_string())
    }
}
