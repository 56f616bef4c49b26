//! # Adapters Layer (Hexagonal Architecture)
//!
//! Chain adapters implementing `ChainAdapter`, plus the in-memory chain
//! implementing `ChainClient`.

mod aeternity;
mod algorand;
mod bitcoin;
mod evm;
mod in_memory_chain;

pub use aeternity::AeternityAdapter;
pub use algorand::AlgorandAdapter;
pub use self::bitcoin::BitcoinAdapter;
pub use evm::EvmAdapter;
pub use in_memory_chain::{InMemoryChainClient, GENESIS_TIME};

use crate::algorithms::amount::AmountNormalizer;
use crate::domain::{AdapterConfig, Network, SwapError};
use crate::ports::ChainAdapter;
use std::sync::Arc;

/// Validate `config` for an adapter serving `accepted` networks.
fn bind_config(config: &AdapterConfig, accepted: &[Network]) -> Result<AmountNormalizer, SwapError> {
    if !accepted.contains(&config.network) {
        return Err(SwapError::UnsupportedNetwork(config.network));
    }
    config.validate()?;
    AmountNormalizer::new(config.decimals)
}

/// Build the adapter for `config.network`.
pub fn adapter_for(config: AdapterConfig) -> Result<Arc<dyn ChainAdapter>, SwapError> {
    let adapter: Arc<dyn ChainAdapter> = match config.network {
        Network::Bitcoin => Arc::new(BitcoinAdapter::new(config)?),
        Network::Ethereum | Network::Matic => Arc::new(EvmAdapter::new(config)?),
        Network::Algorand => Arc::new(AlgorandAdapter::new(config)?),
        Network::Aeternity => Arc::new(AeternityAdapter::new(config)?),
    };
    Ok(adapter)
}
