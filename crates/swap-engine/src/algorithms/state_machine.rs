//! # Swap State Machine
//!
//! ```text
//! Created --fund--> Funded --withdraw (secret ok, now <= expiration)--> Withdrawn
//!                      \----refund (now > expiration)-----------------> Refunded
//! ```
//!
//! `Expired` is observed, not stored: a `Funded` swap past its expiration.
//!
//! Local requests (`withdraw`, `refund`) enforce every guard. Chain
//! confirmations are authoritative and idempotent: duplicates are no-ops,
//! events that predate a terminal status are ignored, and a withdrawal or
//! refund confirmed before its funding confirmation arrived is accepted.

use crate::algorithms::secret::verify_secret;
use crate::domain::{
    Confirmation, ConfirmedEvent, EventKind, SecureSecret, Swap, SwapError, SwapStatus,
    Transition,
};

fn rejected(swap: &Swap, event: EventKind, reason: impl Into<String>) -> SwapError {
    SwapError::InvalidTransition {
        swap_id: swap.id(),
        from: swap.status(),
        event: event.as_str(),
        reason: reason.into(),
    }
}

fn apply(swap: &mut Swap, to: SwapStatus) -> Transition {
    let from = swap.status;
    swap.status = to;
    Transition::Applied { from, to }
}

/// Status as seen at chain time `now`.
pub fn observe(swap: &Swap, now: u64) -> SwapStatus {
    match swap.status() {
        SwapStatus::Funded if swap.is_expired(now) => SwapStatus::Expired,
        status => status,
    }
}

/// Apply a funding confirmation.
///
/// The funded amount must cover `input_amount` and the funds must sit in the
/// contract derived for this swap.
pub fn fund(
    swap: &mut Swap,
    amount: u128,
    contract_address: &str,
    expected_contract: &str,
) -> Result<Transition, SwapError> {
    match swap.status() {
        SwapStatus::Created => {
            if amount < swap.input_amount() {
                return Err(rejected(
                    swap,
                    EventKind::Funded,
                    format!("funded {amount} < required {}", swap.input_amount()),
                ));
            }
            if contract_address != expected_contract {
                return Err(rejected(
                    swap,
                    EventKind::Funded,
                    format!("contract {contract_address} != expected {expected_contract}"),
                ));
            }
            Ok(apply(swap, SwapStatus::Funded))
        }
        SwapStatus::Funded | SwapStatus::Expired => Ok(Transition::Duplicate {
            status: swap.status(),
        }),
        SwapStatus::Withdrawn | SwapStatus::Refunded => Ok(Transition::Stale {
            status: swap.status(),
            ignored: EventKind::Funded,
        }),
    }
}

/// Local withdrawal request.
///
/// Repeating a successful withdrawal with the same secret is a no-op; a
/// withdrawal after refund is a conflict.
pub fn withdraw(swap: &mut Swap, secret: &SecureSecret, now: u64) -> Result<Transition, SwapError> {
    if !verify_secret(secret, swap.hash_lock()) {
        return Err(SwapError::HashMismatch { swap_id: swap.id() });
    }

    match swap.status() {
        SwapStatus::Created => Err(rejected(swap, EventKind::Withdrawn, "swap not funded")),
        SwapStatus::Funded | SwapStatus::Expired => {
            if swap.is_expired(now) {
                return Err(rejected(
                    swap,
                    EventKind::Withdrawn,
                    format!("expired at {}, now {now}", swap.expiration()),
                ));
            }
            swap.secret = Some(secret.clone());
            Ok(apply(swap, SwapStatus::Withdrawn))
        }
        SwapStatus::Withdrawn => Ok(Transition::Duplicate {
            status: SwapStatus::Withdrawn,
        }),
        SwapStatus::Refunded => Err(rejected(swap, EventKind::Withdrawn, "already refunded")),
    }
}

/// Local refund request.
pub fn refund(swap: &mut Swap, now: u64) -> Result<Transition, SwapError> {
    match swap.status() {
        SwapStatus::Created => Err(rejected(swap, EventKind::Refunded, "swap not funded")),
        SwapStatus::Funded | SwapStatus::Expired => {
            if !swap.is_expired(now) {
                return Err(rejected(
                    swap,
                    EventKind::Refunded,
                    format!("expires at {}, now {now}", swap.expiration()),
                ));
            }
            Ok(apply(swap, SwapStatus::Refunded))
        }
        SwapStatus::Refunded => Ok(Transition::Duplicate {
            status: SwapStatus::Refunded,
        }),
        SwapStatus::Withdrawn => Err(rejected(swap, EventKind::Refunded, "already withdrawn")),
    }
}

/// Apply a confirmation delivered by a chain watcher.
///
/// `expected_contract` is the contract the adapter derives for this swap.
pub fn apply_confirmation(
    swap: &mut Swap,
    confirmation: &Confirmation,
    expected_contract: &str,
) -> Result<Transition, SwapError> {
    let observed_at = confirmation.observed_at;

    match &confirmation.event {
        ConfirmedEvent::Funded {
            amount,
            contract_address,
            ..
        } => fund(swap, *amount, contract_address, expected_contract),

        ConfirmedEvent::Withdrawn { secret } => match swap.status() {
            SwapStatus::Withdrawn => Ok(Transition::Duplicate {
                status: SwapStatus::Withdrawn,
            }),
            SwapStatus::Refunded => Err(rejected(swap, EventKind::Withdrawn, "already refunded")),
            SwapStatus::Created | SwapStatus::Funded | SwapStatus::Expired => {
                if let Some(secret) = secret {
                    if !verify_secret(secret, swap.hash_lock()) {
                        return Err(SwapError::HashMismatch { swap_id: swap.id() });
                    }
                }
                if swap.is_expired(observed_at) {
                    return Err(rejected(
                        swap,
                        EventKind::Withdrawn,
                        format!("observed at {observed_at} after expiration {}", swap.expiration()),
                    ));
                }
                if secret.is_some() {
                    swap.secret = secret.clone();
                }
                Ok(apply(swap, SwapStatus::Withdrawn))
            }
        },

        ConfirmedEvent::Refunded => match swap.status() {
            SwapStatus::Refunded => Ok(Transition::Duplicate {
                status: SwapStatus::Refunded,
            }),
            SwapStatus::Withdrawn => Err(rejected(swap, EventKind::Refunded, "already withdrawn")),
            SwapStatus::Created | SwapStatus::Funded | SwapStatus::Expired => {
                if !swap.is_expired(observed_at) {
                    return Err(rejected(
                        swap,
                        EventKind::Refunded,
                        format!("observed at {observed_at} before expiration {}", swap.expiration()),
                    ));
                }
                Ok(apply(swap, SwapStatus::Refunded))
            }
        },
    }
}
