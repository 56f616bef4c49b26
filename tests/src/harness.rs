//! # Two-Chain Fixture
//!
//! Bitcoin and Ethereum simulated side by side. Alice holds BTC and wants
//! ETH; Bob is the liquidity provider on both chains. Each party can run
//! its own engine over the same two chains, the way two independent nodes
//! would watch the same networks.

use rust_decimal::Decimal;
use std::sync::{Arc, Once};
use swap_engine::{
    AdapterConfig, ChainClient, EventFilter, FeedReport, InMemoryChainClient, Metadata, Network,
    SecureSecret, SwapEngine, SwapError, UserInputSwap,
};
use swap_telemetry::metrics::FEED_DRAIN_DURATION;
use swap_telemetry::{
    init_logging, log_swap_event, record_feed, register_metrics, time_histogram, TelemetryConfig,
};

/// Alice's Bitcoin address (funds the original swap).
pub const ALICE_BTC: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
/// Alice's Ethereum address (receives the counter-swap).
pub const ALICE_ETH: &str = "0x1111111111111111111111111111111111111111";
/// Bob's Bitcoin address (receives the original swap).
pub const BOB_BTC: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
/// Bob's Ethereum address (funds the counter-swap).
pub const BOB_ETH: &str = "0x2222222222222222222222222222222222222222";

static LOGGING: Once = Once::new();

/// Install the test subscriber and register metrics once per process.
///
/// Honors `SWAP_LOG_LEVEL` / `RUST_LOG`; defaults to warnings only.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let mut config = TelemetryConfig::from_env();
        if std::env::var("SWAP_LOG_LEVEL").is_err() && std::env::var("RUST_LOG").is_err() {
            config = config.with_log_level("warn");
        }
        // another test binary may already own the global subscriber
        let _ = init_logging(&config);
        let _ = register_metrics();
    });
}

/// Bitcoin and Ethereum chains plus the engine configs both parties use.
pub struct TwoChains {
    /// Simulated Bitcoin chain.
    pub btc: Arc<InMemoryChainClient>,
    /// Simulated Ethereum chain.
    pub eth: Arc<InMemoryChainClient>,
}

impl Default for TwoChains {
    fn default() -> Self {
        Self::new()
    }
}

impl TwoChains {
    /// Fresh chains at genesis with empty balances.
    pub fn new() -> Self {
        init_test_logging();
        Self {
            btc: Arc::new(InMemoryChainClient::new(Network::Bitcoin)),
            eth: Arc::new(InMemoryChainClient::new(Network::Ethereum)),
        }
    }

    /// Simulated chain for `network`.
    pub fn chain(&self, network: Network) -> &Arc<InMemoryChainClient> {
        match network {
            Network::Bitcoin => &self.btc,
            _ => &self.eth,
        }
    }

    /// An engine over both chains with Bob as the default receiver.
    pub fn engine(&self) -> Result<Arc<SwapEngine>, SwapError> {
        let btc: Arc<dyn ChainClient> = self.btc.clone();
        let eth: Arc<dyn ChainClient> = self.eth.clone();
        let engine = SwapEngine::builder()
            .with_config(
                AdapterConfig::for_testing(Network::Bitcoin).with_receiver_address(BOB_BTC),
                btc,
            )?
            .with_config(
                AdapterConfig::for_testing(Network::Ethereum).with_receiver_address(BOB_ETH),
                eth,
            )?
            .build()?;
        Ok(Arc::new(engine))
    }

    /// Advance both chains' clocks.
    pub fn advance(&self, secs: u64) {
        self.btc.advance_time(secs);
        self.eth.advance_time(secs);
    }

    /// Feed every event recorded on `network` into `engine`.
    pub async fn settle(&self, engine: &SwapEngine, network: Network) -> Result<FeedReport, SwapError> {
        let _timer = time_histogram!(FEED_DRAIN_DURATION);
        let report = engine.poll_events(network, &EventFilter::default()).await?;
        record_feed(
            network.ticker(),
            report.applied(),
            report.ignored(),
            report.failed(),
        );
        for item in report.items.iter().filter(|item| item.result.is_err()) {
            log_swap_event!(warn, item.swap_id, "Feed item rejected", network = %network);
        }
        Ok(report)
    }

    /// Balance of `address` on `network`.
    pub async fn balance(&self, network: Network, address: &str) -> u128 {
        self.chain(network)
            .get_balance(address)
            .await
            .unwrap_or_default()
    }
}

/// Alice's request: `btc` BTC for `eth` ETH, locked with `secret`.
pub fn alice_input(btc: Decimal, eth: Decimal, secret: &SecureSecret) -> UserInputSwap {
    UserInputSwap {
        network: Network::Bitcoin,
        output_network: Network::Ethereum,
        sender: ALICE_BTC.to_string(),
        output_address: ALICE_ETH.to_string(),
        input_amount: btc,
        output_amount: eth,
        refund_address: None,
        secret: Some(secret.clone()),
        metadata: Metadata::default(),
    }
}

/// Secret from raw bytes; empty input yields a random one.
pub fn secret(bytes: &[u8]) -> SecureSecret {
    SecureSecret::new(bytes.to_vec()).unwrap_or_else(SecureSecret::random)
}
