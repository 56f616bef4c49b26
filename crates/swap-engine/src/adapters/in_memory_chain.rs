//! In-memory HTLC chain.
//!
//! Implements `ChainClient` against a simulated chain with balances, HTLC
//! contracts and an event log. Used by tests and demos; a real deployment
//! plugs an RPC-backed client into the same port.

use crate::algorithms::secret::verify_secret;
use crate::domain::{
    ChainClientError, ChainEvent, ChainTip, ConfirmedEvent, ContractSpec, Metadata, Network,
    SecureSecret, SwapId, TxRef,
};
use crate::ports::{ChainClient, EventFilter};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// Chain time the simulation starts at.
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Simulated chain.
pub struct InMemoryChainClient {
    network: Network,
    state: RwLock<ChainState>,
}

struct ChainState {
    tip: ChainTip,
    block_time_secs: u64,
    offline: bool,
    balances: HashMap<String, u128>,
    contracts: HashMap<SwapId, ContractData>,
    events: Vec<ChainEvent>,
    next_tx: u64,
}

#[derive(Clone, Debug)]
struct ContractData {
    spec: ContractSpec,
    state: ContractState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContractState {
    Locked,
    Withdrawn,
    Refunded,
}

impl ChainState {
    fn record(&mut self, network: Network, swap_id: SwapId, event: ConfirmedEvent) -> TxRef {
        self.next_tx += 1;
        let tx = TxRef(format!(
            "{}-{:08}",
            network.ticker().to_ascii_lowercase(),
            self.next_tx
        ));
        self.events.push(ChainEvent {
            swap_id,
            event,
            height: self.tip.height,
            timestamp: self.tip.time,
            tx: tx.clone(),
        });
        tx
    }

    /// Locked contract `spec` refers to. The address and lock value must
    /// match what was funded.
    fn locked(&mut self, spec: &ContractSpec) -> Result<&mut ContractData, ChainClientError> {
        let swap_id = &spec.swap_id;
        let data = self
            .contracts
            .get_mut(swap_id)
            .ok_or_else(|| ChainClientError::NotFound(format!("no contract for {swap_id}")))?;
        if data.spec.contract_address != spec.contract_address
            || data.spec.lock_value != spec.lock_value
        {
            return Err(ChainClientError::Rejected(format!(
                "contract mismatch: funded {} locked at {}, got {} locked at {}",
                data.spec.contract_address,
                data.spec.lock_value,
                spec.contract_address,
                spec.lock_value
            )));
        }
        if data.state != ContractState::Locked {
            return Err(ChainClientError::Rejected(format!(
                "contract {} is {:?}",
                data.spec.contract_address, data.state
            )));
        }
        Ok(data)
    }
}

impl InMemoryChainClient {
    /// Create a chain at `GENESIS_TIME`, height 1, 10 second blocks.
    pub fn new(network: Network) -> Self {
        Self {
            network,
            state: RwLock::new(ChainState {
                tip: ChainTip {
                    time: GENESIS_TIME,
                    height: 1,
                },
                block_time_secs: 10,
                offline: false,
                balances: HashMap::new(),
                contracts: HashMap::new(),
                events: Vec::new(),
                next_tx: 0,
            }),
        }
    }

    /// Set the simulated block time.
    pub fn with_block_time(self, secs: u64) -> Self {
        self.state.write().block_time_secs = secs.max(1);
        self
    }

    /// Chain this client simulates.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Current chain time.
    pub fn now(&self) -> u64 {
        self.state.read().tip.time
    }

    /// Set current time; height follows at the configured block time.
    pub fn set_time(&self, time: u64) {
        let mut state = self.state.write();
        if time > state.tip.time {
            let blocks = (time - state.tip.time) / state.block_time_secs;
            state.tip.height += blocks;
        }
        state.tip.time = time;
    }

    /// Advance time.
    pub fn advance_time(&self, secs: u64) {
        let time = self.now().saturating_add(secs);
        self.set_time(time);
    }

    /// Simulate an unreachable node.
    pub fn set_offline(&self, offline: bool) {
        self.state.write().offline = offline;
    }

    /// Credit `amount` to `address`.
    pub fn credit(&self, address: &str, amount: u128) {
        *self
            .state
            .write()
            .balances
            .entry(address.to_string())
            .or_default() += amount;
    }

    /// Every event recorded so far.
    pub fn events(&self) -> Vec<ChainEvent> {
        self.state.read().events.clone()
    }

    fn check_online(&self) -> Result<(), ChainClientError> {
        if self.state.read().offline {
            return Err(ChainClientError::Unavailable(format!(
                "{} node offline",
                self.network
            )));
        }
        Ok(())
    }

    fn check_network(&self, spec: &ContractSpec) -> Result<(), ChainClientError> {
        if spec.network != self.network {
            return Err(ChainClientError::Rejected(format!(
                "contract for {} submitted to {}",
                spec.network, self.network
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for InMemoryChainClient {
    async fn get_tip(&self) -> Result<ChainTip, ChainClientError> {
        self.check_online()?;
        Ok(self.state.read().tip)
    }

    async fn get_balance(&self, address: &str) -> Result<u128, ChainClientError> {
        self.check_online()?;
        Ok(self
            .state
            .read()
            .balances
            .get(address)
            .copied()
            .unwrap_or_default())
    }

    async fn submit_funding_tx(
        &self,
        spec: &ContractSpec,
        _metadata: &Metadata,
    ) -> Result<TxRef, ChainClientError> {
        self.check_online()?;
        self.check_network(spec)?;

        let mut state = self.state.write();
        if state.contracts.contains_key(&spec.swap_id) {
            return Err(ChainClientError::Rejected(format!(
                "contract {} already funded",
                spec.contract_address
            )));
        }

        let balance = state.balances.entry(spec.sender.clone()).or_default();
        if *balance < spec.amount {
            return Err(ChainClientError::Rejected(format!(
                "insufficient balance: {} < {}",
                balance, spec.amount
            )));
        }
        *balance -= spec.amount;

        info!(
            swap_id = %spec.swap_id,
            network = %self.network,
            contract = %spec.contract_address,
            "[swap-engine] Funding HTLC"
        );

        state.contracts.insert(
            spec.swap_id,
            ContractData {
                spec: spec.clone(),
                state: ContractState::Locked,
            },
        );
        let event = ConfirmedEvent::Funded {
            amount: spec.amount,
            contract_address: spec.contract_address.clone(),
            lock_value: spec.lock_value,
        };
        Ok(state.record(self.network, spec.swap_id, event))
    }

    async fn submit_withdraw_tx(
        &self,
        spec: &ContractSpec,
        secret: &SecureSecret,
        _metadata: &Metadata,
    ) -> Result<TxRef, ChainClientError> {
        self.check_online()?;
        self.check_network(spec)?;

        let mut state = self.state.write();
        let now = state.tip.time;
        let data = state.locked(spec)?;

        if !verify_secret(secret, &data.spec.hash_lock) {
            return Err(ChainClientError::Rejected("invalid secret".to_string()));
        }
        if now > data.spec.expiration {
            return Err(ChainClientError::Rejected("HTLC expired".to_string()));
        }

        data.state = ContractState::Withdrawn;
        let (receiver, amount) = (data.spec.receiver.clone(), data.spec.amount);
        *state.balances.entry(receiver).or_default() += amount;

        debug!(swap_id = %spec.swap_id, network = %self.network, "[swap-engine] Withdrew HTLC");

        let event = ConfirmedEvent::Withdrawn {
            secret: Some(secret.clone()),
        };
        Ok(state.record(self.network, spec.swap_id, event))
    }

    async fn submit_refund_tx(
        &self,
        spec: &ContractSpec,
        _metadata: &Metadata,
    ) -> Result<TxRef, ChainClientError> {
        self.check_online()?;
        self.check_network(spec)?;

        let mut state = self.state.write();
        let now = state.tip.time;
        let data = state.locked(spec)?;

        if now <= data.spec.expiration {
            return Err(ChainClientError::Rejected("HTLC not expired".to_string()));
        }

        data.state = ContractState::Refunded;
        let (refund_address, amount) = (data.spec.refund_address.clone(), data.spec.amount);
        *state.balances.entry(refund_address).or_default() += amount;

        debug!(swap_id = %spec.swap_id, network = %self.network, "[swap-engine] Refunded HTLC");

        Ok(state.record(self.network, spec.swap_id, ConfirmedEvent::Refunded))
    }

    async fn get_events(&self, filter: &EventFilter) -> Result<Vec<ChainEvent>, ChainClientError> {
        self.check_online()?;
        Ok(self
            .state
            .read()
            .events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }
}
