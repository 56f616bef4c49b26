//! # Ports Module
//!
//! Hexagonal architecture ports (inbound API, chain adapter, outbound chain
//! client).

pub mod chain_adapter;
pub mod inbound;
pub mod outbound;

pub use chain_adapter::ChainAdapter;
pub use inbound::*;
pub use outbound::*;
