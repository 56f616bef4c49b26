//! # Domain Invariants
//!
//! Business rules that keep both legs of a swap safe.

use super::errors::{AmountError, SwapError};
use super::value_objects::HashLock;

/// Invariant: amounts are positive native integers.
pub fn invariant_positive_amount(field: &'static str, amount: u128) -> Result<(), SwapError> {
    if amount == 0 {
        return Err(SwapError::invalid_amount(field, AmountError::NonPositive));
    }
    Ok(())
}

/// Invariant: expiration lies beyond chain time plus the safety margin.
///
/// A zero margin still requires `expiration > now`.
pub fn invariant_expiration_ahead(
    expiration: u64,
    now: u64,
    min_margin_secs: u64,
) -> Result<(), SwapError> {
    if expiration <= now.saturating_add(min_margin_secs) {
        return Err(SwapError::InvalidExpiration {
            expiration,
            now,
            required_margin: min_margin_secs,
        });
    }
    Ok(())
}

/// Invariant: timelock ordering between the two legs.
///
/// The counter-swap MUST expire before the original swap minus the margin,
/// so the counter-party's refund window closes first.
pub fn invariant_timelock_ordering(
    original_expiration: u64,
    counter_expiration: u64,
    margin_secs: u64,
) -> Result<(), SwapError> {
    if counter_expiration.saturating_add(margin_secs) >= original_expiration {
        return Err(SwapError::InvalidExpiration {
            expiration: counter_expiration,
            now: original_expiration,
            required_margin: margin_secs,
        });
    }
    Ok(())
}

/// Invariant: both legs use the same hash lock.
pub fn invariant_hashlock_match(a: &HashLock, b: &HashLock) -> bool {
    a == b
}
