//! # Chain Adapter Port
//!
//! Fixed capability set every chain adapter implements. Chain-specific
//! behavior is limited to address grammar; amounts, expirations, IDs and
//! contract descriptions are derived from the adapter's `AdapterConfig`.

use crate::algorithms::amount::AmountNormalizer;
use crate::algorithms::identity::derive_id;
use crate::algorithms::secret::{generate_hash_lock, generate_random_secret};
use crate::domain::{
    AdapterConfig, ChainTip, ContractSpec, LockUnit, Network, SecureSecret, Swap, SwapError,
    SwapId, SwapParams, UserInputSwap,
};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// Chain adapter - normalizes one chain behind a common contract.
pub trait ChainAdapter: Send + Sync {
    /// Adapter configuration.
    fn config(&self) -> &AdapterConfig;

    /// Amount normalizer bound to the chain's decimals.
    fn normalizer(&self) -> &AmountNormalizer;

    /// Syntactic address check for this chain.
    fn address_valid(&self, address: &str) -> bool;

    /// Canonical form of a valid address.
    fn canonical_address(&self, address: &str) -> String {
        address.to_string()
    }

    /// Chain served by this adapter.
    fn network(&self) -> Network {
        self.config().network
    }

    /// Validate and canonicalize, naming the offending field on failure.
    fn checked_address(&self, field: &'static str, address: &str) -> Result<String, SwapError> {
        let trimmed = address.trim();
        if !self.address_valid(trimmed) {
            return Err(SwapError::invalid_address(field, address));
        }
        Ok(self.canonical_address(trimmed))
    }

    /// Parse an address on this chain.
    fn parse_address(&self, address: &str) -> Result<String, SwapError> {
        self.checked_address("address", address)
    }

    /// Parse an address on this chain given as another swap's output address.
    fn parse_output_address(&self, address: &str) -> Result<String, SwapError> {
        self.checked_address("output_address", address)
    }

    /// Display amount to native units.
    fn parse_to_native(&self, amount: Decimal) -> Result<u128, SwapError> {
        self.normalizer()
            .to_native(amount)
            .map_err(|reason| SwapError::invalid_amount("amount", reason))
    }

    /// Native units to display amount.
    fn parse_from_native(&self, amount: u128) -> Result<Decimal, SwapError> {
        self.normalizer()
            .from_native(amount)
            .map_err(|reason| SwapError::invalid_amount("amount", reason))
    }

    /// Canonical ID of a swap.
    fn generate_id(&self, swap: &Swap) -> SwapId {
        derive_id(&swap.terms())
    }

    /// Build the initiator's swap from raw user input.
    ///
    /// `output_address` must already be parsed by the output chain's
    /// adapter. Returns the swap and the secret its hash lock commits to.
    fn format_input(
        &self,
        input: &UserInputSwap,
        output: &AmountNormalizer,
        receiver: Option<&str>,
        now: u64,
    ) -> Result<(Swap, SecureSecret), SwapError> {
        if input.network != self.network() {
            return Err(SwapError::NetworkMismatch {
                expected: self.network(),
                actual: input.network,
            });
        }

        let config = self.config();
        let sender = self.checked_address("sender", &input.sender)?;
        let receiver = match receiver.or(config.receiver_address.as_deref()) {
            Some(address) => self.checked_address("receiver", address)?,
            None => return Err(SwapError::invalid_address("receiver", "")),
        };
        let refund_address = match &input.refund_address {
            Some(address) => self.checked_address("refund_address", address)?,
            None => sender.clone(),
        };

        let input_amount = self
            .normalizer()
            .to_native(input.input_amount)
            .map_err(|reason| SwapError::invalid_amount("input_amount", reason))?;
        let output_amount = output
            .to_native(input.output_amount)
            .map_err(|reason| SwapError::invalid_amount("output_amount", reason))?;

        let secret = input.secret.clone().unwrap_or_else(generate_random_secret);

        let swap = Swap::new(
            SwapParams {
                network: self.network(),
                output_network: input.output_network,
                sender,
                receiver,
                refund_address,
                output_address: input.output_address.clone(),
                input_amount,
                output_amount,
                hash_lock: generate_hash_lock(&secret),
                expiration: now.saturating_add(config.expiration_secs),
                metadata: input.metadata.clone(),
            },
            now,
            config.min_expiration_margin_secs,
        )?;

        Ok((swap, secret))
    }

    /// Mirror a counter-party's swap onto this chain.
    ///
    /// `sender` defaults to the configured receiver address. The expiration
    /// comes from this chain's counter duration; ordering against the
    /// mirrored swap is checked by the counter-swap deriver.
    fn create_swap_from_input(
        &self,
        counter: &Swap,
        sender: Option<&str>,
        now: u64,
    ) -> Result<Swap, SwapError> {
        if counter.output_network() != self.network() {
            return Err(SwapError::NetworkMismatch {
                expected: self.network(),
                actual: counter.output_network(),
            });
        }

        let config = self.config();
        let sender = match sender.or(config.receiver_address.as_deref()) {
            Some(address) => self.checked_address("sender", address)?,
            None => return Err(SwapError::invalid_address("sender", "")),
        };
        let receiver = self.checked_address("receiver", counter.output_address())?;

        Swap::new(
            SwapParams {
                network: self.network(),
                output_network: counter.network(),
                refund_address: sender.clone(),
                sender,
                receiver,
                output_address: counter.receiver().to_string(),
                input_amount: counter.output_amount(),
                output_amount: counter.input_amount(),
                hash_lock: *counter.hash_lock(),
                expiration: now.saturating_add(config.counter_expiration_secs),
                metadata: Default::default(),
            },
            now,
            config.min_expiration_margin_secs,
        )
    }

    /// Deterministic reference of the HTLC holding a swap's funds.
    fn contract_address(&self, swap: &Swap) -> String {
        let mut hasher = Sha256::new();
        hasher.update(swap.network().ticker().as_bytes());
        hasher.update(swap.hash_lock().as_bytes());
        hasher.update(swap.expiration().to_be_bytes());
        hasher.update(swap.refund_address().as_bytes());
        hasher.update([0u8]);
        hasher.update(swap.receiver().as_bytes());
        let digest = hasher.finalize();
        format!("0x{}", hex::encode(&digest[..20]))
    }

    /// Expiration expressed in the chain's lock unit.
    ///
    /// Block heights are estimated from `tip`; an expiration at or before
    /// the tip maps to the tip height.
    fn native_lock_value(&self, expiration: u64, tip: &ChainTip) -> Result<u64, SwapError> {
        let too_far = || SwapError::InvalidExpiration {
            expiration,
            now: tip.time,
            required_margin: self.config().min_expiration_margin_secs,
        };

        match self.config().lock_unit {
            LockUnit::UnixSeconds => Ok(expiration),
            LockUnit::UnixMillis => expiration.checked_mul(1000).ok_or_else(too_far),
            LockUnit::BlockHeight { block_time_secs } => {
                let blocks = expiration
                    .saturating_sub(tip.time)
                    .div_ceil(block_time_secs.max(1));
                tip.height.checked_add(blocks).ok_or_else(too_far)
            }
        }
    }

    /// Chain-facing description of a swap's HTLC, locked relative to `tip`.
    fn contract_spec(&self, swap: &Swap, tip: &ChainTip) -> Result<ContractSpec, SwapError> {
        let lock_value = self.native_lock_value(swap.expiration(), tip)?;
        self.locked_contract_spec(swap, lock_value)
    }

    /// Description of an HTLC whose native lock value is already fixed.
    fn locked_contract_spec(
        &self,
        swap: &Swap,
        lock_value: u64,
    ) -> Result<ContractSpec, SwapError> {
        if swap.network() != self.network() {
            return Err(SwapError::NetworkMismatch {
                expected: self.network(),
                actual: swap.network(),
            });
        }

        Ok(ContractSpec {
            swap_id: swap.id(),
            network: swap.network(),
            contract_address: self.contract_address(swap),
            sender: swap.sender().to_string(),
            receiver: swap.receiver().to_string(),
            refund_address: swap.refund_address().to_string(),
            amount: swap.input_amount(),
            hash_lock: *swap.hash_lock(),
            expiration: swap.expiration(),
            lock_value,
            max_fee: self.config().max_fee,
        })
    }
}
