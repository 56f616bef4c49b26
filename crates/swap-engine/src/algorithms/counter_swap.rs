//! # Counter-Swap Derivation
//!
//! Given A's swap on chain X, derive the mirrored swap B locks on chain Y.
//!
//! ## Timelock ordering
//!
//! ```text
//! B (on Y) expires first:  now ---------- B.expiration ----margin---- A.expiration
//! ```
//!
//! A reveals the secret by withdrawing B. B then has until A's expiration
//! to withdraw A with the same secret. The margin covers B's confirmation
//! and submission latency on X.

use crate::algorithms::secret::verify_secret;
use crate::domain::{
    invariant_hashlock_match, invariant_timelock_ordering, SecureSecret, Swap, SwapError,
    SwapStatus,
};
use crate::ports::ChainAdapter;
use tracing::debug;

/// Derive the counter-swap for `counter` on `adapter`'s chain.
///
/// Rejects with `InvalidExpiration` unless the derived expiration is
/// strictly before `counter.expiration - counter_swap_margin_secs`; never
/// clamps.
pub fn derive_counter_swap(
    adapter: &dyn ChainAdapter,
    counter: &Swap,
    sender: Option<&str>,
    now: u64,
) -> Result<Swap, SwapError> {
    let derived = adapter.create_swap_from_input(counter, sender, now)?;

    invariant_timelock_ordering(
        counter.expiration(),
        derived.expiration(),
        adapter.config().counter_swap_margin_secs,
    )?;

    debug!(
        counter_id = %counter.id(),
        swap_id = %derived.id(),
        network = %derived.network(),
        expiration = derived.expiration(),
        "[swap-engine] Derived counter-swap"
    );

    Ok(derived)
}

/// Check that `counter` mirrors `own` closely enough to reveal the secret.
///
/// `own` is the initiator's swap; `counter` the counter-party's swap it
/// expects to withdraw from.
pub fn check_counter_swap(own: &Swap, counter: &Swap, margin_secs: u64) -> Result<(), SwapError> {
    if counter.network() != own.output_network() {
        return Err(SwapError::NetworkMismatch {
            expected: own.output_network(),
            actual: counter.network(),
        });
    }
    if !invariant_hashlock_match(own.hash_lock(), counter.hash_lock()) {
        return Err(SwapError::HashMismatch {
            swap_id: counter.id(),
        });
    }
    if counter.receiver() != own.output_address() {
        return Err(SwapError::invalid_address("receiver", counter.receiver()));
    }
    if counter.input_amount() < own.output_amount() {
        return Err(SwapError::InvalidTransition {
            swap_id: counter.id(),
            from: counter.status(),
            event: "withdraw",
            reason: format!(
                "counter locks {} < expected {}",
                counter.input_amount(),
                own.output_amount()
            ),
        });
    }
    invariant_timelock_ordering(own.expiration(), counter.expiration(), margin_secs)
}

/// Secret revealed by a withdrawn counter-swap, if it opens `own`.
pub fn revealed_secret(own: &Swap, counter: &Swap) -> Option<SecureSecret> {
    if counter.status() != SwapStatus::Withdrawn {
        return None;
    }
    counter
        .secret()
        .filter(|secret| verify_secret(secret, own.hash_lock()))
        .cloned()
}
