//! Swap registry.
//!
//! The map lock is held only to look up or insert a handle. Each swap sits
//! behind its own async mutex, so work on one ID never blocks another and
//! a single ID is serialized across chain-client awaits.

use crate::domain::{ContractSpec, Swap, SwapError, SwapId, TxRef};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A tracked swap and the transactions submitted for it.
#[derive(Clone, Debug)]
pub struct SwapRecord {
    /// Current swap state.
    pub swap: Swap,
    /// Contract as funded, by this engine or as its funding confirmation reported.
    pub contract: Option<ContractSpec>,
    /// Funding transaction.
    pub funding_tx: Option<TxRef>,
    /// Withdrawal transaction.
    pub withdraw_tx: Option<TxRef>,
    /// Refund transaction.
    pub refund_tx: Option<TxRef>,
}

impl SwapRecord {
    fn new(swap: Swap) -> Self {
        Self {
            swap,
            contract: None,
            funding_tx: None,
            withdraw_tx: None,
            refund_tx: None,
        }
    }
}

/// Shared handle to one swap.
pub type SwapHandle = Arc<Mutex<SwapRecord>>;

/// ID -> swap map.
#[derive(Default)]
pub struct SwapRegistry {
    swaps: RwLock<HashMap<SwapId, SwapHandle>>,
}

impl SwapRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `swap`. Returns false when the ID was already tracked; the
    /// existing record is kept.
    pub fn insert(&self, swap: Swap) -> (SwapId, bool) {
        let id = swap.id();
        let mut swaps = self.swaps.write();
        if swaps.contains_key(&id) {
            return (id, false);
        }
        swaps.insert(id, Arc::new(Mutex::new(SwapRecord::new(swap))));
        (id, true)
    }

    /// Handle for `id`.
    pub fn get(&self, id: &SwapId) -> Result<SwapHandle, SwapError> {
        self.swaps
            .read()
            .get(id)
            .cloned()
            .ok_or(SwapError::UnknownSwap(*id))
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: &SwapId) -> bool {
        self.swaps.read().contains_key(id)
    }

    /// Tracked IDs.
    pub fn ids(&self) -> Vec<SwapId> {
        self.swaps.read().keys().copied().collect()
    }

    /// Number of tracked swaps.
    pub fn len(&self) -> usize {
        self.swaps.read().len()
    }

    /// True when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.swaps.read().is_empty()
    }
}
