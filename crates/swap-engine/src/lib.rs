//! # Swap Engine
//!
//! Trustless cross-chain asset swaps using Hashed Time-Locked Contracts.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Coordinate both legs of an atomic swap across heterogeneous chains:
//! - SHA-256 hash locks shared by both legs
//! - Content-derived swap IDs both parties compute independently
//! - A lifecycle state machine driven by chain confirmations
//! - Counter-swap derivation with safe timelock ordering
//!
//! ## Safety Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Timelock ordering | Counter-swap expires before original minus margin |
//! | Secret pre-flight | Hash lock checked before any withdrawal is submitted |
//! | One-shot terminal | Withdraw and refund are mutually exclusive |
//! | No stale IDs | Every ID-bearing field change recomputes the ID |
//!
//! ## Module Structure
//!
//! ```text
//! swap-engine/
//! ├── domain/          # Swap, value objects, events, config, errors
//! ├── algorithms/      # Hash locks, amounts, identity, state machine, counter-swaps
//! ├── ports/           # ChainAdapter, ChainClient, SwapEngineApi
//! ├── adapters/        # Bitcoin, EVM, Algorand, Aeternity, in-memory chain
//! └── service/         # SwapEngine, registry, confirmation feed
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let engine = SwapEngine::builder()
//!     .with_config(AdapterConfig::bitcoin().with_receiver_address(lp_btc), btc_client)?
//!     .with_config(AdapterConfig::ethereum().with_receiver_address(lp_eth), eth_client)?
//!     .build()?;
//!
//! let (swap, secret) = engine.prepare_swap(input, None).await?;
//! engine.fund(&swap.id()).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    adapter_for, AeternityAdapter, AlgorandAdapter, BitcoinAdapter, EvmAdapter,
    InMemoryChainClient,
};
pub use algorithms::{
    check_counter_swap, derive_counter_swap, derive_id, generate_hash_lock,
    generate_random_secret, verify_secret, AmountNormalizer,
};
pub use domain::{
    AdapterConfig, AmountError, ChainClientError, ChainEvent, ChainTip, Confirmation,
    ConfirmedEvent, ContractSpec, EngineConfig, EventKind, HashLock, LockUnit, Metadata, Network,
    SecureSecret, Swap, SwapError, SwapId, SwapParams, SwapStatus, Transition, TxRef,
    UserInputSwap,
};
pub use ports::{ChainAdapter, ChainClient, EventFilter, SwapEngineApi};
pub use service::{confirmations_from_events, FeedReport, SwapEngine, SwapRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
