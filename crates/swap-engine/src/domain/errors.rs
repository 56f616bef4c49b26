//! # Domain Errors
//!
//! Error taxonomy for the swap engine.
//!
//! Validation errors (`InvalidAddress`, `InvalidAmount`, `InvalidExpiration`)
//! are raised synchronously while a swap is being constructed and never reach
//! a chain. Chain-client failures are kept in their own enum and surface as
//! `SwapError::AdapterFailure` without being retried here.

use super::value_objects::{Network, SwapId, SwapStatus};
use thiserror::Error;

/// Why an amount was rejected by the normalizer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// Zero or negative amount.
    #[error("amount must be positive")]
    NonPositive,

    /// More fractional digits than the chain's smallest unit allows.
    #[error("amount needs more than {decimals} decimal places")]
    PrecisionLoss {
        /// Decimals supported by the chain.
        decimals: u32,
    },

    /// Amount does not fit the native integer range.
    #[error("amount overflows native unit range")]
    Overflow,

    /// Text that is not a decimal number.
    #[error("malformed amount: {0}")]
    Malformed(String),
}

/// Failures reported by a chain client (RPC node, wallet, signer).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChainClientError {
    /// Node unreachable or timed out.
    #[error("chain unavailable: {0}")]
    Unavailable(String),

    /// Transaction rejected by the chain or its contract.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Queried contract or account does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Swap engine error types.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Address does not match the chain's address grammar.
    #[error("Invalid address in `{field}`: {address:?}")]
    InvalidAddress {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        address: String,
    },

    /// Amount rejected at the normalizer boundary.
    #[error("Invalid amount in `{field}`: {reason}")]
    InvalidAmount {
        /// Offending field.
        field: &'static str,
        /// Rejection cause.
        reason: AmountError,
    },

    /// Expiration in the past or inside the safety margin.
    #[error("Invalid expiration: expiration={expiration}, now={now}, required_margin={required_margin}")]
    InvalidExpiration {
        /// Proposed expiration (unix seconds).
        expiration: u64,
        /// Chain time (or reference expiration) it was checked against.
        now: u64,
        /// Margin that had to be respected.
        required_margin: u64,
    },

    /// Secret does not hash to the swap's hash lock.
    #[error("Secret does not match hash lock of swap {swap_id}")]
    HashMismatch {
        /// Swap the secret was presented for.
        swap_id: SwapId,
    },

    /// Event or request for an ID the engine does not track.
    #[error("Unknown swap: {0}")]
    UnknownSwap(SwapId),

    /// Transition rejected by the state machine guards.
    #[error("Invalid transition for swap {swap_id}: {event} while {from} ({reason})")]
    InvalidTransition {
        /// Swap being transitioned.
        swap_id: SwapId,
        /// Status at the time of the attempt.
        from: SwapStatus,
        /// Attempted event.
        event: &'static str,
        /// Guard that failed.
        reason: String,
    },

    /// Underlying chain client failed.
    #[error("Adapter failure on {network}: {source}")]
    AdapterFailure {
        /// Chain whose client failed.
        network: Network,
        /// Client error.
        #[source]
        source: ChainClientError,
    },

    /// Hash lock text is not a 32-byte hex digest.
    #[error("Invalid hash lock: {0}")]
    InvalidHashLock(String),

    /// No adapter registered for the network.
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(Network),

    /// Swap handed to an adapter of another chain.
    #[error("Network mismatch: expected {expected}, got {actual}")]
    NetworkMismatch {
        /// Network the adapter serves.
        expected: Network,
        /// Network carried by the swap.
        actual: Network,
    },

    /// Published swap whose ID does not match its terms.
    #[error("Swap ID mismatch: claimed {claimed}, derived {derived}")]
    IdMismatch {
        /// ID carried by the record.
        claimed: SwapId,
        /// ID recomputed from the terms.
        derived: SwapId,
    },

    /// Adapter configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SwapError {
    /// Tag an amount rejection with the field it came from.
    pub fn invalid_amount(field: &'static str, reason: AmountError) -> Self {
        Self::InvalidAmount { field, reason }
    }

    /// Tag an address rejection with the field it came from.
    pub fn invalid_address(field: &'static str, address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            field,
            address: address.into(),
        }
    }

    /// Wrap a chain-client failure.
    pub fn adapter(network: Network, source: ChainClientError) -> Self {
        Self::AdapterFailure { network, source }
    }

    /// True for errors detected locally before anything reaches a chain.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidExpiration { .. }
                | Self::InvalidHashLock(_)
        )
    }
}
