//! # Algorithms Module
//!
//! Pure swap logic: hash locks, amounts, identity, lifecycle and
//! counter-swap derivation. Nothing here performs I/O.

pub mod amount;
pub mod counter_swap;
pub mod identity;
pub mod secret;
pub mod state_machine;

pub use amount::{AmountNormalizer, MAX_DECIMALS};
pub use counter_swap::{check_counter_swap, derive_counter_swap, revealed_secret};
pub use identity::{canonical_encoding, derive_id};
pub use secret::{create_hash_lock, generate_hash_lock, generate_random_secret, verify_secret};
