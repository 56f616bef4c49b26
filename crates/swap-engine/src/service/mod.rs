//! # Service Layer
//!
//! `SwapEngine` wires adapters and chain clients together, owns the swap
//! registry and applies the confirmation feed.

mod engine;
mod feed;
mod registry;

pub use engine::{SwapEngine, SwapEngineBuilder};
pub use feed::{confirmations_from_events, FeedItem, FeedReport};
pub use registry::{SwapHandle, SwapRecord, SwapRegistry};
