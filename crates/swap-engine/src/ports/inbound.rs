//! # Inbound Ports
//!
//! API trait defining what the swap engine can do.

use crate::domain::{
    Confirmation, SecureSecret, Swap, SwapError, SwapId, SwapStatus, Transition, TxRef,
    UserInputSwap,
};
use async_trait::async_trait;

/// Swap engine API - inbound port.
#[async_trait]
pub trait SwapEngineApi: Send + Sync {
    /// Build and track the initiator's swap from user input.
    async fn prepare_swap(
        &self,
        input: UserInputSwap,
        receiver: Option<&str>,
    ) -> Result<(Swap, SecureSecret), SwapError>;

    /// Derive and track the counter-swap mirroring `counter`.
    async fn derive_counter_swap(
        &self,
        counter: &Swap,
        sender: Option<&str>,
    ) -> Result<Swap, SwapError>;

    /// Track a swap built elsewhere (e.g. published by the counter-party).
    fn track(&self, swap: Swap) -> SwapId;

    /// Submit the funding transaction.
    async fn fund(&self, id: &SwapId) -> Result<TxRef, SwapError>;

    /// Withdraw with the secret.
    async fn withdraw(&self, id: &SwapId, secret: &SecureSecret) -> Result<Transition, SwapError>;

    /// Refund after expiration.
    async fn refund(&self, id: &SwapId) -> Result<Transition, SwapError>;

    /// Apply one item of the confirmation feed.
    async fn apply_confirmation(&self, confirmation: Confirmation)
        -> Result<Transition, SwapError>;

    /// Status at current chain time (may be `Expired`).
    async fn status(&self, id: &SwapId) -> Result<SwapStatus, SwapError>;

    /// Snapshot of a tracked swap.
    async fn swap(&self, id: &SwapId) -> Result<Swap, SwapError>;
}
