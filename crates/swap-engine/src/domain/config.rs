//! # Adapter Configuration
//!
//! Explicit per-chain configuration handed to each adapter at construction.
//! Nothing in the engine reads chain defaults from ambient state.
//!
//! ```ignore
//! let config = AdapterConfig::bitcoin()
//!     .with_receiver_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4")
//!     .with_counter_swap_margin(3 * 3600);
//! config.validate()?;
//! ```

use super::errors::SwapError;
use super::value_objects::{LockUnit, Network};
use crate::algorithms::amount::MAX_DECIMALS;
use serde::{Deserialize, Serialize};

/// Configuration of one chain adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Chain served by the adapter.
    pub network: Network,
    /// Decimal places of the native unit (8 for satoshi, 18 for wei).
    pub decimals: u32,
    /// Lock duration for swaps initiated on this chain.
    pub expiration_secs: u64,
    /// Lock duration for counter-swaps mirrored onto this chain.
    pub counter_expiration_secs: u64,
    /// Minimum time-to-expiry accepted when a swap is constructed.
    pub min_expiration_margin_secs: u64,
    /// How much earlier a counter-swap on this chain must expire than the
    /// swap it mirrors.
    pub counter_swap_margin_secs: u64,
    /// Maximum fee, in native units, attached to HTLC transactions.
    pub max_fee: u64,
    /// Chain's zero/burn address used as placeholder recipient.
    pub zero_address: String,
    /// Default receiver (liquidity provider) on this chain.
    pub receiver_address: Option<String>,
    /// Unit of the HTLC lock value.
    pub lock_unit: LockUnit,
    /// Accept test-network addresses instead of mainnet ones.
    #[serde(default)]
    pub testnet: bool,
}

impl AdapterConfig {
    /// Bitcoin defaults: satoshi precision, 6 confirmations of 10 minutes
    /// as the minimum safety margin.
    pub fn bitcoin() -> Self {
        Self {
            network: Network::Bitcoin,
            decimals: 8,
            expiration_secs: 24 * 3600,
            counter_expiration_secs: 12 * 3600,
            min_expiration_margin_secs: 6 * 600,
            counter_swap_margin_secs: 6 * 3600,
            max_fee: 10_000,
            zero_address: "1111111111111111111114oLvT2".to_string(),
            receiver_address: None,
            lock_unit: LockUnit::UnixSeconds,
            testnet: false,
        }
    }

    /// Ethereum defaults: wei precision, 12 confirmations of 12 seconds.
    pub fn ethereum() -> Self {
        Self {
            network: Network::Ethereum,
            decimals: 18,
            expiration_secs: 24 * 3600,
            counter_expiration_secs: 12 * 3600,
            min_expiration_margin_secs: 12 * 12,
            counter_swap_margin_secs: 6 * 3600,
            max_fee: 2_000_000_000_000_000,
            zero_address: "0x0000000000000000000000000000000000000000".to_string(),
            receiver_address: None,
            lock_unit: LockUnit::UnixSeconds,
            testnet: false,
        }
    }

    /// Polygon defaults: EVM precision, 128 confirmations of 2 seconds.
    pub fn matic() -> Self {
        Self {
            network: Network::Matic,
            min_expiration_margin_secs: 128 * 2,
            max_fee: 50_000_000_000_000_000,
            ..Self::ethereum()
        }
    }

    /// Algorand defaults: microalgo precision, round-based locks.
    pub fn algorand() -> Self {
        Self {
            network: Network::Algorand,
            decimals: 6,
            expiration_secs: 24 * 3600,
            counter_expiration_secs: 12 * 3600,
            min_expiration_margin_secs: 60,
            counter_swap_margin_secs: 6 * 3600,
            max_fee: 10_000,
            zero_address: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ".to_string(),
            receiver_address: None,
            lock_unit: LockUnit::BlockHeight { block_time_secs: 4 },
            testnet: false,
        }
    }

    /// Aeternity defaults: aettos precision, millisecond timestamps.
    pub fn aeternity() -> Self {
        Self {
            network: Network::Aeternity,
            decimals: 18,
            expiration_secs: 24 * 3600,
            counter_expiration_secs: 12 * 3600,
            min_expiration_margin_secs: 10 * 180,
            counter_swap_margin_secs: 6 * 3600,
            max_fee: 20_000_000_000_000,
            zero_address: "ak_11111111111111111111111111111111273Yts".to_string(),
            receiver_address: None,
            lock_unit: LockUnit::UnixMillis,
            testnet: false,
        }
    }

    /// Defaults for a network.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Bitcoin => Self::bitcoin(),
            Network::Ethereum => Self::ethereum(),
            Network::Matic => Self::matic(),
            Network::Algorand => Self::algorand(),
            Network::Aeternity => Self::aeternity(),
        }
    }

    /// Short windows for tests: one hour locks, half hour counter locks.
    pub fn for_testing(network: Network) -> Self {
        Self {
            expiration_secs: 3600,
            counter_expiration_secs: 1800,
            min_expiration_margin_secs: 60,
            counter_swap_margin_secs: 900,
            ..Self::for_network(network)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.decimals > MAX_DECIMALS {
            return Err(SwapError::InvalidConfig(format!(
                "{}: decimals {} exceeds {}",
                self.network, self.decimals, MAX_DECIMALS
            )));
        }

        if self.expiration_secs <= self.min_expiration_margin_secs {
            return Err(SwapError::InvalidConfig(format!(
                "{}: expiration_secs must exceed min_expiration_margin_secs",
                self.network
            )));
        }

        if self.counter_expiration_secs <= self.min_expiration_margin_secs {
            return Err(SwapError::InvalidConfig(format!(
                "{}: counter_expiration_secs must exceed min_expiration_margin_secs",
                self.network
            )));
        }

        if self.zero_address.trim().is_empty() {
            return Err(SwapError::InvalidConfig(format!(
                "{}: zero_address cannot be empty",
                self.network
            )));
        }

        if let LockUnit::BlockHeight { block_time_secs: 0 } = self.lock_unit {
            return Err(SwapError::InvalidConfig(format!(
                "{}: block_time_secs cannot be 0",
                self.network
            )));
        }

        Ok(())
    }

    /// Builder-style method to set the default receiver.
    pub fn with_receiver_address(mut self, address: impl Into<String>) -> Self {
        self.receiver_address = Some(address.into());
        self
    }

    /// Builder-style method to set lock durations.
    pub fn with_expirations(mut self, expiration_secs: u64, counter_expiration_secs: u64) -> Self {
        self.expiration_secs = expiration_secs;
        self.counter_expiration_secs = counter_expiration_secs;
        self
    }

    /// Builder-style method to switch to test-network addresses.
    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Builder-style method to set the counter-swap margin.
    pub fn with_counter_swap_margin(mut self, secs: u64) -> Self {
        self.counter_swap_margin_secs = secs;
        self
    }
}

/// Engine-wide configuration: the set of chains the engine drives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// One entry per supported chain.
    pub adapters: Vec<AdapterConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            adapters: Network::ALL.into_iter().map(AdapterConfig::for_network).collect(),
        }
    }
}

impl EngineConfig {
    /// Test configuration covering every network.
    pub fn for_testing() -> Self {
        Self {
            adapters: Network::ALL.into_iter().map(AdapterConfig::for_testing).collect(),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, SwapError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SwapError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every adapter and reject duplicate networks.
    pub fn validate(&self) -> Result<(), SwapError> {
        let mut seen = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            adapter.validate()?;
            if seen.contains(&adapter.network) {
                return Err(SwapError::InvalidConfig(format!(
                    "duplicate adapter for {}",
                    adapter.network
                )));
            }
            seen.push(adapter.network);
        }
        Ok(())
    }

    /// Configuration for one network, if present.
    pub fn adapter(&self, network: Network) -> Option<&AdapterConfig> {
        self.adapters.iter().find(|a| a.network == network)
    }
}
