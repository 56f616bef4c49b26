//! Swap Engine - orchestration over chain adapters and chain clients.
//!
//! Transitions are computed by the pure state machine on a copy of the
//! swap; the copy is committed only after the chain client accepted the
//! transaction, so a failed submission leaves the swap untouched.

use super::feed::{confirmations_from_events, FeedReport};
use super::registry::{SwapHandle, SwapRecord, SwapRegistry};
use crate::adapters::adapter_for;
use crate::algorithms::secret::verify_secret;
use crate::algorithms::{counter_swap, state_machine};
use crate::domain::{
    AdapterConfig, ChainTip, Confirmation, ConfirmedEvent, ContractSpec, EngineConfig, Network,
    SecureSecret, Swap, SwapError, SwapId, SwapStatus, Transition, TxRef, UserInputSwap,
};
use crate::ports::{ChainAdapter, ChainClient, EventFilter, SwapEngineApi};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Adapter and client serving one chain.
#[derive(Clone)]
struct ChainBinding {
    adapter: Arc<dyn ChainAdapter>,
    client: Arc<dyn ChainClient>,
}

/// Builder for `SwapEngine`.
#[derive(Default)]
pub struct SwapEngineBuilder {
    chains: HashMap<Network, ChainBinding>,
}

impl SwapEngineBuilder {
    /// Serve `adapter.network()` with `client`.
    pub fn with_chain(mut self, adapter: Arc<dyn ChainAdapter>, client: Arc<dyn ChainClient>) -> Self {
        self.chains
            .insert(adapter.network(), ChainBinding { adapter, client });
        self
    }

    /// Build the adapter from `config` and serve it with `client`.
    pub fn with_config(
        self,
        config: AdapterConfig,
        client: Arc<dyn ChainClient>,
    ) -> Result<Self, SwapError> {
        let adapter = adapter_for(config)?;
        Ok(self.with_chain(adapter, client))
    }

    /// Finish; at least one chain is required.
    pub fn build(self) -> Result<SwapEngine, SwapError> {
        if self.chains.is_empty() {
            return Err(SwapError::InvalidConfig("no chains configured".to_string()));
        }
        info!(
            chains = self.chains.len(),
            "[swap-engine] Swap engine ready"
        );
        Ok(SwapEngine {
            chains: self.chains,
            registry: SwapRegistry::new(),
        })
    }
}

/// Swap engine: tracks swaps and drives them through their chains.
pub struct SwapEngine {
    chains: HashMap<Network, ChainBinding>,
    registry: SwapRegistry,
}

impl SwapEngine {
    /// Start building an engine.
    pub fn builder() -> SwapEngineBuilder {
        SwapEngineBuilder::default()
    }

    /// Engine for every chain in `config`; each needs a client in `clients`.
    pub fn from_config(
        config: &EngineConfig,
        mut clients: HashMap<Network, Arc<dyn ChainClient>>,
    ) -> Result<Self, SwapError> {
        config.validate()?;
        let mut builder = Self::builder();
        for adapter_config in &config.adapters {
            let network = adapter_config.network;
            let client = clients.remove(&network).ok_or_else(|| {
                SwapError::InvalidConfig(format!("no chain client for {network}"))
            })?;
            builder = builder.with_config(adapter_config.clone(), client)?;
        }
        builder.build()
    }

    fn chain(&self, network: Network) -> Result<&ChainBinding, SwapError> {
        self.chains
            .get(&network)
            .ok_or(SwapError::UnsupportedNetwork(network))
    }

    /// Adapter serving `network`.
    pub fn adapter(&self, network: Network) -> Result<Arc<dyn ChainAdapter>, SwapError> {
        Ok(self.chain(network)?.adapter.clone())
    }

    /// Networks this engine serves.
    pub fn networks(&self) -> Vec<Network> {
        let mut networks: Vec<Network> = self.chains.keys().copied().collect();
        networks.sort();
        networks
    }

    /// Tracked swaps.
    pub fn registry(&self) -> &SwapRegistry {
        &self.registry
    }

    async fn tip(&self, network: Network) -> Result<ChainTip, SwapError> {
        self.chain(network)?
            .client
            .get_tip()
            .await
            .map_err(|e| SwapError::adapter(network, e))
    }

    /// Build and track the initiator's swap from user input.
    ///
    /// Expiration is measured from the input chain's tip.
    pub async fn prepare_swap(
        &self,
        mut input: UserInputSwap,
        receiver: Option<&str>,
    ) -> Result<(Swap, SecureSecret), SwapError> {
        let source = self.chain(input.network)?;
        let output = self.chain(input.output_network)?;

        input.output_address = output.adapter.parse_output_address(&input.output_address)?;
        let tip = self.tip(input.network).await?;

        let (swap, secret) =
            source
                .adapter
                .format_input(&input, output.adapter.normalizer(), receiver, tip.time)?;

        info!(
            swap_id = %swap.id(),
            network = %swap.network(),
            output_network = %swap.output_network(),
            expiration = swap.expiration(),
            "[swap-engine] Prepared swap"
        );

        self.track(swap.clone());
        Ok((swap, secret))
    }

    /// Derive and track the counter-swap mirroring `counter`.
    pub async fn derive_counter_swap(
        &self,
        counter: &Swap,
        sender: Option<&str>,
    ) -> Result<Swap, SwapError> {
        let target = self.chain(counter.output_network())?;
        let tip = self.tip(counter.output_network()).await?;

        let swap = counter_swap::derive_counter_swap(target.adapter.as_ref(), counter, sender, tip.time)?;

        info!(
            swap_id = %swap.id(),
            counter_id = %counter.id(),
            network = %swap.network(),
            expiration = swap.expiration(),
            "[swap-engine] Derived counter-swap"
        );

        self.track(swap.clone());
        Ok(swap)
    }

    /// Track a swap. Tracking the same ID twice keeps the first record.
    ///
    /// Only the terms are taken: the swap is tracked as `Created` without a
    /// secret, and only confirmations move it forward.
    pub fn track(&self, swap: Swap) -> SwapId {
        let (id, inserted) = self.registry.insert(swap.unobserved());
        if !inserted {
            debug!(swap_id = %id, "[swap-engine] Swap already tracked");
        }
        id
    }

    /// Submit the funding transaction for a `Created` swap.
    ///
    /// Funding twice returns the first transaction. The swap becomes
    /// `Funded` only when the funding confirmation arrives.
    pub async fn fund(&self, id: &SwapId) -> Result<TxRef, SwapError> {
        let handle = self.registry.get(id)?;
        let mut record = handle.lock().await;

        if let Some(tx) = &record.funding_tx {
            debug!(swap_id = %id, tx = %tx, "[swap-engine] Funding already submitted");
            return Ok(tx.clone());
        }
        if record.swap.status() != SwapStatus::Created {
            return Err(SwapError::InvalidTransition {
                swap_id: *id,
                from: record.swap.status(),
                event: "fund",
                reason: "swap already funded".to_string(),
            });
        }

        let network = record.swap.network();
        let chain = self.chain(network)?;
        let tip = self.tip(network).await?;
        let spec = chain.adapter.contract_spec(&record.swap, &tip)?;

        let tx = chain
            .client
            .submit_funding_tx(&spec, record.swap.metadata())
            .await
            .map_err(|e| SwapError::adapter(network, e))?;

        info!(
            swap_id = %id,
            network = %network,
            contract = %spec.contract_address,
            tx = %tx,
            "[swap-engine] Funding submitted"
        );

        record.contract = Some(spec);
        record.funding_tx = Some(tx.clone());
        Ok(tx)
    }

    /// Contract as funded. Set by `fund` or by the funding confirmation.
    fn contract_for(record: &SwapRecord, event: &'static str) -> Result<ContractSpec, SwapError> {
        record
            .contract
            .clone()
            .ok_or_else(|| SwapError::InvalidTransition {
                swap_id: record.swap.id(),
                from: record.swap.status(),
                event,
                reason: "funded contract not observed".to_string(),
            })
    }

    /// Withdraw a funded swap, revealing `secret`.
    ///
    /// The secret is checked against the hash lock before anything is
    /// submitted. Repeating a completed withdrawal is a no-op.
    pub async fn withdraw(&self, id: &SwapId, secret: &SecureSecret) -> Result<Transition, SwapError> {
        let handle = self.registry.get(id)?;
        let mut record = handle.lock().await;

        if !verify_secret(secret, record.swap.hash_lock()) {
            warn!(swap_id = %id, "[swap-engine] Secret does not match hash lock");
            return Err(SwapError::HashMismatch { swap_id: *id });
        }

        let network = record.swap.network();
        let tip = self.tip(network).await?;

        let mut next = record.swap.clone();
        let transition = state_machine::withdraw(&mut next, secret, tip.time)?;
        if !transition.is_applied() {
            return Ok(transition);
        }

        let spec = Self::contract_for(&record, "withdraw")?;
        let tx = self
            .chain(network)?
            .client
            .submit_withdraw_tx(&spec, secret, record.swap.metadata())
            .await
            .map_err(|e| SwapError::adapter(network, e))?;

        info!(swap_id = %id, network = %network, tx = %tx, "[swap-engine] Withdrawn");

        record.swap = next;
        record.withdraw_tx = Some(tx);
        Ok(transition)
    }

    /// Refund a funded swap after its expiration.
    pub async fn refund(&self, id: &SwapId) -> Result<Transition, SwapError> {
        let handle = self.registry.get(id)?;
        let mut record = handle.lock().await;

        let network = record.swap.network();
        let tip = self.tip(network).await?;

        let mut next = record.swap.clone();
        let transition = state_machine::refund(&mut next, tip.time)?;
        if !transition.is_applied() {
            return Ok(transition);
        }

        let spec = Self::contract_for(&record, "refund")?;
        let tx = self
            .chain(network)?
            .client
            .submit_refund_tx(&spec, record.swap.metadata())
            .await
            .map_err(|e| SwapError::adapter(network, e))?;

        info!(swap_id = %id, network = %network, tx = %tx, "[swap-engine] Refunded");

        record.swap = next;
        record.refund_tx = Some(tx);
        Ok(transition)
    }

    /// Apply one confirmation from a chain watcher.
    pub async fn apply_confirmation(
        &self,
        confirmation: &Confirmation,
    ) -> Result<Transition, SwapError> {
        let handle = self.registry.get(&confirmation.swap_id)?;
        let mut record = handle.lock().await;

        let adapter = self.chain(record.swap.network())?.adapter.clone();
        let expected = adapter.contract_address(&record.swap);

        let kind = confirmation.event.kind();
        let result = state_machine::apply_confirmation(&mut record.swap, confirmation, &expected);

        // the lock value is read back from the chain, never re-derived from a later tip
        if let (Ok(_), ConfirmedEvent::Funded { lock_value, .. }) = (&result, &confirmation.event) {
            if record.contract.is_none() {
                let spec = adapter.locked_contract_spec(&record.swap, *lock_value)?;
                record.contract = Some(spec);
            }
        }

        match result {
            Ok(transition @ Transition::Applied { from, to }) => {
                info!(
                    swap_id = %confirmation.swap_id,
                    event = kind.as_str(),
                    %from,
                    %to,
                    "[swap-engine] Confirmation applied"
                );
                Ok(transition)
            }
            Ok(transition) => {
                debug!(
                    swap_id = %confirmation.swap_id,
                    event = kind.as_str(),
                    ?transition,
                    "[swap-engine] Confirmation ignored"
                );
                Ok(transition)
            }
            Err(e) => {
                warn!(
                    swap_id = %confirmation.swap_id,
                    event = kind.as_str(),
                    error = %e,
                    "[swap-engine] Confirmation rejected"
                );
                Err(e)
            }
        }
    }

    /// Consume a confirmation feed to its end, reporting each item.
    pub async fn drive_feed<S>(&self, feed: S) -> FeedReport
    where
        S: Stream<Item = Confirmation> + Send,
    {
        futures::pin_mut!(feed);
        let mut report = FeedReport::default();
        while let Some(confirmation) = feed.next().await {
            let result = self.apply_confirmation(&confirmation).await;
            report.push(&confirmation, result);
        }
        debug!(
            applied = report.applied(),
            ignored = report.ignored(),
            failed = report.failed(),
            "[swap-engine] Feed drained"
        );
        report
    }

    /// Fetch `network`'s events matching `filter` and apply them.
    pub async fn poll_events(
        &self,
        network: Network,
        filter: &EventFilter,
    ) -> Result<FeedReport, SwapError> {
        let events = self
            .chain(network)?
            .client
            .get_events(filter)
            .await
            .map_err(|e| SwapError::adapter(network, e))?;

        let confirmations = confirmations_from_events(events);
        Ok(self.drive_feed(futures::stream::iter(confirmations)).await)
    }

    async fn snapshot(&self, handle: &SwapHandle) -> SwapRecord {
        handle.lock().await.clone()
    }

    /// Snapshot of a tracked swap and its transactions.
    pub async fn record(&self, id: &SwapId) -> Result<SwapRecord, SwapError> {
        let handle = self.registry.get(id)?;
        Ok(self.snapshot(&handle).await)
    }

    /// Snapshot of a tracked swap.
    pub async fn swap(&self, id: &SwapId) -> Result<Swap, SwapError> {
        Ok(self.record(id).await?.swap)
    }

    /// Status at the swap chain's current time.
    pub async fn status(&self, id: &SwapId) -> Result<SwapStatus, SwapError> {
        let swap = self.swap(id).await?;
        let tip = self.tip(swap.network()).await?;
        Ok(state_machine::observe(&swap, tip.time))
    }

    /// Check that the funded `counter` mirrors `own` before revealing the
    /// secret on it.
    pub async fn verify_counter_swap(&self, own: &SwapId, counter: &SwapId) -> Result<(), SwapError> {
        let own = self.swap(own).await?;
        let counter = self.swap(counter).await?;

        if counter.status() != SwapStatus::Funded {
            return Err(SwapError::InvalidTransition {
                swap_id: counter.id(),
                from: counter.status(),
                event: "withdraw",
                reason: "counter-swap not funded".to_string(),
            });
        }

        let margin = self.chain(counter.network())?.adapter.config().counter_swap_margin_secs;
        counter_swap::check_counter_swap(&own, &counter, margin)
    }

    /// Secret revealed by withdrawing `revealed_on`, if it opens `target`.
    pub async fn revealed_secret(
        &self,
        target: &SwapId,
        revealed_on: &SwapId,
    ) -> Result<Option<SecureSecret>, SwapError> {
        let target = self.swap(target).await?;
        let revealed_on = self.swap(revealed_on).await?;
        Ok(counter_swap::revealed_secret(&target, &revealed_on))
    }
}

#[async_trait]
impl SwapEngineApi for SwapEngine {
    async fn prepare_swap(
        &self,
        input: UserInputSwap,
        receiver: Option<&str>,
    ) -> Result<(Swap, SecureSecret), SwapError> {
        SwapEngine::prepare_swap(self, input, receiver).await
    }

    async fn derive_counter_swap(
        &self,
        counter: &Swap,
        sender: Option<&str>,
    ) -> Result<Swap, SwapError> {
        SwapEngine::derive_counter_swap(self, counter, sender).await
    }

    fn track(&self, swap: Swap) -> SwapId {
        SwapEngine::track(self, swap)
    }

    async fn fund(&self, id: &SwapId) -> Result<TxRef, SwapError> {
        SwapEngine::fund(self, id).await
    }

    async fn withdraw(&self, id: &SwapId, secret: &SecureSecret) -> Result<Transition, SwapError> {
        SwapEngine::withdraw(self, id, secret).await
    }

    async fn refund(&self, id: &SwapId) -> Result<Transition, SwapError> {
        SwapEngine::refund(self, id).await
    }

    async fn apply_confirmation(
        &self,
        confirmation: Confirmation,
    ) -> Result<Transition, SwapError> {
        SwapEngine::apply_confirmation(self, &confirmation).await
    }

    async fn status(&self, id: &SwapId) -> Result<SwapStatus, SwapError> {
        SwapEngine::status(self, id).await
    }

    async fn swap(&self, id: &SwapId) -> Result<Swap, SwapError> {
        SwapEngine::swap(self, id).await
    }
}
