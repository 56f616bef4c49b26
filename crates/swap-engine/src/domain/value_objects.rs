//! # Domain Value Objects
//!
//! Immutable value types shared by every chain adapter.

use super::errors::SwapError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Supported blockchain identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Network {
    /// Bitcoin.
    #[serde(rename = "BTC")]
    Bitcoin,
    /// Ethereum mainnet.
    #[serde(rename = "ETH")]
    Ethereum,
    /// Polygon (Matic).
    #[serde(rename = "MATIC")]
    Matic,
    /// Algorand.
    #[serde(rename = "ALGO")]
    Algorand,
    /// Aeternity.
    #[serde(rename = "AE")]
    Aeternity,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Network; 5] = [
        Network::Bitcoin,
        Network::Ethereum,
        Network::Matic,
        Network::Algorand,
        Network::Aeternity,
    ];

    /// Ticker used on the wire and in logs.
    pub fn ticker(&self) -> &'static str {
        match self {
            Network::Bitcoin => "BTC",
            Network::Ethereum => "ETH",
            Network::Matic => "MATIC",
            Network::Algorand => "ALGO",
            Network::Aeternity => "AE",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for Network {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.ticker().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SwapError::InvalidConfig(format!("unknown network {s:?}")))
    }
}

/// Parse `0x`-prefixed or bare hex into a 32-byte digest.
fn digest_from_hex(text: &str) -> Option<[u8; 32]> {
    let trimmed = text.trim();
    let bare = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(bare).ok()?;
    bytes.try_into().ok()
}

macro_rules! hex_digest_serde {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Content-derived swap identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapId([u8; 32]);

impl SwapId {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for SwapId {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        digest_from_hex(s)
            .map(Self)
            .ok_or_else(|| SwapError::InvalidConfig(format!("malformed swap id {s:?}")))
    }
}

hex_digest_serde!(SwapId);

/// SHA-256 commitment to a swap secret.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashLock([u8; 32]);

impl HashLock {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hex digest, with or without the `0x` prefix.
    pub fn from_hex(text: &str) -> Result<Self, SwapError> {
        digest_from_hex(text)
            .map(Self)
            .ok_or_else(|| SwapError::InvalidHashLock(text.to_string()))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for HashLock {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

hex_digest_serde!(HashLock);

/// Swap lifecycle status.
///
/// `Expired` is never stored: it is what a `Funded` swap looks like once
/// chain time has passed its expiration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Constructed in memory, nothing on chain yet.
    #[default]
    Created,
    /// Funding transaction confirmed.
    Funded,
    /// Secret revealed, receiver claimed the funds.
    Withdrawn,
    /// Sender reclaimed the funds after expiration.
    Refunded,
    /// Funded, past expiration, not yet refunded.
    Expired,
}

impl SwapStatus {
    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Withdrawn | Self::Refunded)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Unit a chain's HTLC uses for its lock value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockUnit {
    /// Unix timestamp in seconds.
    UnixSeconds,
    /// Unix timestamp in milliseconds.
    UnixMillis,
    /// Block height (round number), estimated from the chain's block time.
    BlockHeight {
        /// Average seconds per block.
        block_time_secs: u64,
    },
}

/// Latest chain state observed through a chain client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTip {
    /// Chain time, unix seconds.
    pub time: u64,
    /// Block height or round.
    pub height: u64,
}

/// Reference to a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRef(pub String);

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque caller metadata attached to on-chain transactions.
///
/// The engine never inspects or logs the contents.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Metadata(Vec<u8>);

impl Metadata {
    /// Wrap caller bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Bytes as supplied by the caller.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// True when no metadata was supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Metadata({} bytes)", self.0.len())
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map(Self).map_err(serde::de::Error::custom)
    }
}

/// Native amounts travel as base-10 strings; JSON numbers cannot hold u128.
pub(crate) mod u128_str {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
