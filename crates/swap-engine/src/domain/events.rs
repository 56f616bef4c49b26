//! # Confirmation Events
//!
//! What the block-observation side reports, and what applying it did.

use super::secure_secret::SecureSecret;
use super::value_objects::{u128_str, SwapId, SwapStatus, TxRef};
use serde::{Deserialize, Serialize};

/// Kind of on-chain event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// HTLC funded.
    Funded,
    /// HTLC withdrawn with the secret.
    Withdrawn,
    /// HTLC refunded to the sender.
    Refunded,
}

impl EventKind {
    /// Name used in errors and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Funded => "fund",
            EventKind::Withdrawn => "withdraw",
            EventKind::Refunded => "refund",
        }
    }
}

/// Confirmed on-chain event with the data its guard needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConfirmedEvent {
    /// Funding transaction confirmed.
    #[serde(rename_all = "camelCase")]
    Funded {
        /// Amount locked, native units.
        #[serde(with = "u128_str")]
        amount: u128,
        /// Contract that received the funds.
        contract_address: String,
        /// Expiration in the chain's lock unit, as written into the contract.
        lock_value: u64,
    },
    /// Withdrawal confirmed; the pre-image is public from here on.
    Withdrawn {
        /// Revealed secret, when the watcher extracted it.
        secret: Option<SecureSecret>,
    },
    /// Refund confirmed.
    Refunded,
}

impl ConfirmedEvent {
    /// Event kind.
    pub fn kind(&self) -> EventKind {
        match self {
            ConfirmedEvent::Funded { .. } => EventKind::Funded,
            ConfirmedEvent::Withdrawn { .. } => EventKind::Withdrawn,
            ConfirmedEvent::Refunded => EventKind::Refunded,
        }
    }
}

/// One item of the confirmation feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Swap the event belongs to.
    pub swap_id: SwapId,
    /// What happened.
    pub event: ConfirmedEvent,
    /// Chain time of the block carrying the event, unix seconds.
    pub observed_at: u64,
}

/// Event observed on a chain, as returned by a chain client's log query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEvent {
    /// Swap the contract belongs to.
    pub swap_id: SwapId,
    /// Decoded event.
    pub event: ConfirmedEvent,
    /// Block height or round.
    pub height: u64,
    /// Block timestamp, unix seconds.
    pub timestamp: u64,
    /// Transaction carrying the event.
    pub tx: TxRef,
}

impl From<ChainEvent> for Confirmation {
    fn from(event: ChainEvent) -> Self {
        Self {
            swap_id: event.swap_id,
            event: event.event,
            observed_at: event.timestamp,
        }
    }
}

/// Result of applying an event or request to a swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Status changed.
    Applied {
        /// Status before.
        from: SwapStatus,
        /// Status after.
        to: SwapStatus,
    },
    /// Same event already applied; nothing changed.
    Duplicate {
        /// Current status.
        status: SwapStatus,
    },
    /// Event predates a terminal status already reached; ignored.
    Stale {
        /// Current (terminal) status.
        status: SwapStatus,
        /// Ignored event.
        ignored: EventKind,
    },
}

impl Transition {
    /// True when the status changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }

    /// Status after the transition.
    pub fn status(&self) -> SwapStatus {
        match self {
            Transition::Applied { to, .. } => *to,
            Transition::Duplicate { status } | Transition::Stale { status, .. } => *status,
        }
    }
}
