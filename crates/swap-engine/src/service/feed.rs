//! Confirmation feed plumbing.
//!
//! A watcher (or a chain client's event log) produces `Confirmation`s; the
//! engine applies them one by one and reports every outcome. A failed item
//! never stops the feed.

use crate::domain::{ChainEvent, Confirmation, EventKind, SwapError, SwapId, Transition};

/// Outcome of one feed item.
#[derive(Debug)]
pub struct FeedItem {
    /// Swap the confirmation targeted.
    pub swap_id: SwapId,
    /// Confirmed event kind.
    pub kind: EventKind,
    /// What applying it did.
    pub result: Result<Transition, SwapError>,
}

/// Per-item outcomes of a feed run.
#[derive(Debug, Default)]
pub struct FeedReport {
    /// Outcomes in feed order.
    pub items: Vec<FeedItem>,
}

impl FeedReport {
    pub(crate) fn push(&mut self, confirmation: &Confirmation, result: Result<Transition, SwapError>) {
        self.items.push(FeedItem {
            swap_id: confirmation.swap_id,
            kind: confirmation.event.kind(),
            result,
        });
    }

    /// Items that changed a status.
    pub fn applied(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.result, Ok(t) if t.is_applied()))
            .count()
    }

    /// Items that were duplicates or stale.
    pub fn ignored(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.result, Ok(t) if !t.is_applied()))
            .count()
    }

    /// Items rejected with an error.
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_err()).count()
    }
}

/// Map chain events, oldest first, to feed confirmations.
pub fn confirmations_from_events(events: impl IntoIterator<Item = ChainEvent>) -> Vec<Confirmation> {
    let mut events: Vec<ChainEvent> = events.into_iter().collect();
    events.sort_by_key(|event| (event.height, event.timestamp));
    events.into_iter().map(Confirmation::from).collect()
}
