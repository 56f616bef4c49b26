//! # Outbound Ports
//!
//! What the engine needs from a chain: tip, balances, HTLC submissions and
//! an event log. Construction, signing and broadcast live behind this trait.

use crate::domain::{
    ChainClientError, ChainEvent, ChainTip, ContractSpec, Metadata, SecureSecret, SwapId, TxRef,
};
use async_trait::async_trait;

/// Chain client - outbound port.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest block time and height.
    async fn get_tip(&self) -> Result<ChainTip, ChainClientError>;

    /// Balance of an address, native units.
    async fn get_balance(&self, address: &str) -> Result<u128, ChainClientError>;

    /// Lock `spec.amount` in the HTLC described by `spec`.
    async fn submit_funding_tx(
        &self,
        spec: &ContractSpec,
        metadata: &Metadata,
    ) -> Result<TxRef, ChainClientError>;

    /// Withdraw to the receiver, revealing `secret`.
    async fn submit_withdraw_tx(
        &self,
        spec: &ContractSpec,
        secret: &SecureSecret,
        metadata: &Metadata,
    ) -> Result<TxRef, ChainClientError>;

    /// Refund to the refund address after expiration.
    async fn submit_refund_tx(
        &self,
        spec: &ContractSpec,
        metadata: &Metadata,
    ) -> Result<TxRef, ChainClientError>;

    /// HTLC events matching `filter`, oldest first.
    async fn get_events(&self, filter: &EventFilter) -> Result<Vec<ChainEvent>, ChainClientError>;
}

/// Selects events from a chain's log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events at or above this height.
    pub from_height: u64,
    /// Only events for these swaps; `None` matches all.
    pub swap_ids: Option<Vec<SwapId>>,
}

impl EventFilter {
    /// Events from `height` on.
    pub fn from_height(height: u64) -> Self {
        Self {
            from_height: height,
            swap_ids: None,
        }
    }

    /// Restrict to the given swaps.
    pub fn with_swaps(mut self, ids: impl IntoIterator<Item = SwapId>) -> Self {
        self.swap_ids = Some(ids.into_iter().collect());
        self
    }

    /// True when `event` passes the filter.
    pub fn matches(&self, event: &ChainEvent) -> bool {
        event.height >= self.from_height
            && self
                .swap_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&event.swap_id))
    }
}
