//! # Domain Entities
//!
//! The `Swap` aggregate and the inputs it is built from.

use super::errors::SwapError;
use super::invariants::{invariant_expiration_ahead, invariant_positive_amount};
use super::secure_secret::SecureSecret;
use super::value_objects::{u128_str, HashLock, Metadata, Network, SwapId, SwapStatus};
use crate::algorithms::identity::derive_id;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fields a swap ID is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapTerms<'a> {
    /// Funding party.
    pub sender: &'a str,
    /// Party allowed to withdraw with the secret.
    pub receiver: &'a str,
    /// Locked amount, native units.
    pub input_amount: u128,
    /// Commitment to the secret.
    pub hash_lock: &'a HashLock,
    /// Refund becomes valid after this time.
    pub expiration: u64,
}

/// Parameters for constructing a `Swap`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// Chain holding the locked asset.
    pub network: Network,
    /// Chain of the counter-asset.
    pub output_network: Network,
    /// Funding party on `network`.
    pub sender: String,
    /// Withdrawing party on `network`.
    pub receiver: String,
    /// Where a refund is paid on `network`.
    pub refund_address: String,
    /// Where the sender receives the counter-asset on `output_network`.
    pub output_address: String,
    /// Locked amount, native units of `network`.
    pub input_amount: u128,
    /// Expected counter amount, native units of `output_network`.
    pub output_amount: u128,
    /// SHA-256 commitment to the secret.
    pub hash_lock: HashLock,
    /// Unix seconds after which refund is valid.
    pub expiration: u64,
    /// Opaque caller metadata.
    pub metadata: Metadata,
}

/// HTLC swap on a single chain.
///
/// The fields feeding the ID are private; every setter recomputes the ID so
/// it can never go stale.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SwapWire")]
pub struct Swap {
    id: SwapId,
    network: Network,
    output_network: Network,
    sender: String,
    receiver: String,
    refund_address: String,
    output_address: String,
    #[serde(with = "u128_str")]
    input_amount: u128,
    #[serde(with = "u128_str")]
    output_amount: u128,
    hash_lock: HashLock,
    expiration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) secret: Option<SecureSecret>,
    pub(crate) status: SwapStatus,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Swap {
    /// Construct a swap in `Created` state.
    ///
    /// Rejects non-positive amounts and expirations not at least
    /// `min_margin` seconds past `now`.
    pub fn new(params: SwapParams, now: u64, min_margin: u64) -> Result<Self, SwapError> {
        invariant_positive_amount("input_amount", params.input_amount)?;
        invariant_positive_amount("output_amount", params.output_amount)?;
        invariant_expiration_ahead(params.expiration, now, min_margin)?;
        Ok(Self::from_params(params))
    }

    fn from_params(params: SwapParams) -> Self {
        let mut swap = Self {
            id: SwapId::from_bytes([0u8; 32]),
            network: params.network,
            output_network: params.output_network,
            sender: params.sender,
            receiver: params.receiver,
            refund_address: params.refund_address,
            output_address: params.output_address,
            input_amount: params.input_amount,
            output_amount: params.output_amount,
            hash_lock: params.hash_lock,
            expiration: params.expiration,
            secret: None,
            status: SwapStatus::Created,
            metadata: params.metadata,
        };
        swap.refresh_id();
        swap
    }

    fn refresh_id(&mut self) {
        self.id = derive_id(&self.terms());
    }

    /// Terms the ID is derived from.
    pub fn terms(&self) -> SwapTerms<'_> {
        SwapTerms {
            sender: &self.sender,
            receiver: &self.receiver,
            input_amount: self.input_amount,
            hash_lock: &self.hash_lock,
            expiration: self.expiration,
        }
    }

    /// Content-derived ID.
    pub fn id(&self) -> SwapId {
        self.id
    }

    /// Chain holding the locked asset.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Chain of the counter-asset.
    pub fn output_network(&self) -> Network {
        self.output_network
    }

    /// Funding party.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Withdrawing party.
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Refund destination.
    pub fn refund_address(&self) -> &str {
        &self.refund_address
    }

    /// Sender's address on the output network.
    pub fn output_address(&self) -> &str {
        &self.output_address
    }

    /// Locked amount, native units.
    pub fn input_amount(&self) -> u128 {
        self.input_amount
    }

    /// Counter amount, native units of the output network.
    pub fn output_amount(&self) -> u128 {
        self.output_amount
    }

    /// Hash lock.
    pub fn hash_lock(&self) -> &HashLock {
        &self.hash_lock
    }

    /// Expiration, unix seconds.
    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    /// Revealed secret, once withdrawn.
    pub fn secret(&self) -> Option<&SecureSecret> {
        self.secret.as_ref()
    }

    /// Stored lifecycle status (never `Expired`).
    pub fn status(&self) -> SwapStatus {
        self.status
    }

    /// Caller metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Check if the swap is past its expiration.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expiration
    }

    /// The same terms with nothing observed: `Created`, no secret.
    pub fn unobserved(mut self) -> Self {
        self.status = SwapStatus::Created;
        self.secret = None;
        self
    }

    /// Replace the sender and recompute the ID.
    pub fn set_sender(&mut self, sender: impl Into<String>) {
        self.sender = sender.into();
        self.refresh_id();
    }

    /// Replace the receiver and recompute the ID.
    pub fn set_receiver(&mut self, receiver: impl Into<String>) {
        self.receiver = receiver.into();
        self.refresh_id();
    }

    /// Replace the input amount and recompute the ID.
    pub fn set_input_amount(&mut self, amount: u128) -> Result<(), SwapError> {
        invariant_positive_amount("input_amount", amount)?;
        self.input_amount = amount;
        self.refresh_id();
        Ok(())
    }

    /// Replace the expiration and recompute the ID.
    pub fn set_expiration(&mut self, expiration: u64, now: u64, min_margin: u64) -> Result<(), SwapError> {
        invariant_expiration_ahead(expiration, now, min_margin)?;
        self.expiration = expiration;
        self.refresh_id();
        Ok(())
    }
}

/// Published form of a swap. The ID is checked against the terms on the way in.
///
/// Status and secret are never taken from the wire: a swap read from outside
/// starts at `Created` and only confirmations move it forward.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapWire {
    id: Option<SwapId>,
    network: Network,
    output_network: Network,
    sender: String,
    receiver: String,
    refund_address: Option<String>,
    output_address: String,
    #[serde(with = "u128_str")]
    input_amount: u128,
    #[serde(with = "u128_str")]
    output_amount: u128,
    hash_lock: HashLock,
    expiration: u64,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<SwapWire> for Swap {
    type Error = SwapError;

    fn try_from(wire: SwapWire) -> Result<Self, Self::Error> {
        invariant_positive_amount("input_amount", wire.input_amount)?;
        invariant_positive_amount("output_amount", wire.output_amount)?;

        let refund_address = wire.refund_address.unwrap_or_else(|| wire.sender.clone());
        let swap = Swap::from_params(SwapParams {
            network: wire.network,
            output_network: wire.output_network,
            sender: wire.sender,
            receiver: wire.receiver,
            refund_address,
            output_address: wire.output_address,
            input_amount: wire.input_amount,
            output_amount: wire.output_amount,
            hash_lock: wire.hash_lock,
            expiration: wire.expiration,
            metadata: wire.metadata,
        });

        if let Some(claimed) = wire.id {
            if claimed != swap.id {
                return Err(SwapError::IdMismatch {
                    claimed,
                    derived: swap.id,
                });
            }
        }

        Ok(swap)
    }
}

/// Raw user intent, before normalization.
#[derive(Clone, Debug)]
pub struct UserInputSwap {
    /// Chain the user funds on.
    pub network: Network,
    /// Chain the user receives on.
    pub output_network: Network,
    /// User's address on `network`.
    pub sender: String,
    /// User's address on `output_network`.
    pub output_address: String,
    /// Amount to lock, display units.
    pub input_amount: Decimal,
    /// Amount expected back, display units of `output_network`.
    pub output_amount: Decimal,
    /// Refund destination; defaults to `sender`.
    pub refund_address: Option<String>,
    /// Caller-chosen secret; a fresh one is generated when absent.
    pub secret: Option<SecureSecret>,
    /// Opaque caller metadata.
    pub metadata: Metadata,
}

/// Chain-facing description of the HTLC a swap materializes as.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSpec {
    /// Swap the contract belongs to.
    pub swap_id: SwapId,
    /// Chain the contract lives on.
    pub network: Network,
    /// Deterministic contract reference.
    pub contract_address: String,
    /// Funding party.
    pub sender: String,
    /// Withdrawing party.
    pub receiver: String,
    /// Refund destination.
    pub refund_address: String,
    /// Locked amount, native units.
    #[serde(serialize_with = "u128_str::serialize")]
    pub amount: u128,
    /// Hash lock.
    pub hash_lock: HashLock,
    /// Expiration, unix seconds.
    pub expiration: u64,
    /// Expiration in the chain's lock unit.
    pub lock_value: u64,
    /// Fee cap, native units.
    pub max_fee: u64,
}
