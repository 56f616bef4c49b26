//! # End-to-End Swap
//!
//! Alice swaps 0.01 BTC for 0.5 ETH with Bob. Each runs an engine of their
//! own; the only shared state is the two chains.
//!
//! ## Flow
//!
//! 1. Alice prepares and funds A on Bitcoin (receiver Bob).
//! 2. Bob sees A funded, derives B on Ethereum (receiver Alice) and funds it.
//! 3. Alice verifies B, then withdraws it, revealing the secret on Ethereum.
//! 4. Bob picks the secret up from B's withdrawal and withdraws A.

#[cfg(test)]
mod tests {
    use crate::harness::{alice_input, secret, TwoChains, ALICE_BTC, ALICE_ETH, BOB_BTC, BOB_ETH};
    use rust_decimal_macros::dec;
    use swap_engine::adapters::GENESIS_TIME;
    use swap_engine::{verify_secret, Network, Swap, SwapError, SwapStatus};

    const ONE_CENT_BTC: u128 = 1_000_000;
    const HALF_ETH: u128 = 500_000_000_000_000_000;

    #[tokio::test]
    async fn test_two_party_swap_completes() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let bob = fx.engine().unwrap();
        let s1 = secret(b"s1");

        // Alice: prepare A
        let (a, alice_secret) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &s1), None)
            .await
            .unwrap();
        assert_eq!(alice_secret, s1);
        assert_eq!(a.input_amount(), ONE_CENT_BTC);
        assert_eq!(a.output_amount(), HALF_ETH);
        assert_eq!(a.receiver(), BOB_BTC);
        assert_eq!(a.refund_address(), ALICE_BTC);
        assert_eq!(a.expiration(), GENESIS_TIME + 3600);

        // Bob computes the same ID from the published terms
        let bob_btc = bob.adapter(Network::Bitcoin).unwrap();
        assert_eq!(bob_btc.generate_id(&a), a.id());
        assert_eq!(bob.track(a.clone()), a.id());

        // Alice: fund A
        fx.btc.credit(ALICE_BTC, ONE_CENT_BTC);
        alice.fund(&a.id()).await.unwrap();
        assert_eq!(fx.settle(&alice, Network::Bitcoin).await.unwrap().applied(), 1);
        assert_eq!(fx.settle(&bob, Network::Bitcoin).await.unwrap().applied(), 1);
        assert_eq!(bob.status(&a.id()).await.unwrap(), SwapStatus::Funded);

        // Bob: derive and fund B
        let b = bob.derive_counter_swap(&a, None).await.unwrap();
        assert_eq!(b.network(), Network::Ethereum);
        assert_eq!(b.sender(), BOB_ETH);
        assert_eq!(b.receiver(), ALICE_ETH);
        assert_eq!(b.output_address(), BOB_BTC);
        assert_eq!(b.input_amount(), HALF_ETH);
        assert_eq!(b.output_amount(), ONE_CENT_BTC);
        assert_eq!(b.hash_lock(), a.hash_lock());
        assert_eq!(b.expiration(), fx.eth.now() + 1800);
        assert!(b.expiration() + 900 < a.expiration());

        fx.eth.credit(BOB_ETH, HALF_ETH);
        bob.fund(&b.id()).await.unwrap();

        // Alice: verify B before revealing anything
        alice.track(b.clone());
        assert_eq!(fx.settle(&alice, Network::Ethereum).await.unwrap().applied(), 1);
        alice.verify_counter_swap(&a.id(), &b.id()).await.unwrap();

        // Alice: withdraw B, revealing the secret
        assert!(alice.withdraw(&b.id(), &s1).await.unwrap().is_applied());
        assert_eq!(fx.balance(Network::Ethereum, ALICE_ETH).await, HALF_ETH);
        assert_eq!(fx.balance(Network::Ethereum, BOB_ETH).await, 0);

        // Bob: learn the secret from B's withdrawal
        let report = fx.settle(&bob, Network::Ethereum).await.unwrap();
        assert_eq!(report.applied(), 2);
        assert_eq!(report.failed(), 0);
        let revealed = bob.revealed_secret(&a.id(), &b.id()).await.unwrap().unwrap();
        assert_eq!(revealed.as_bytes(), b"s1");

        // Bob: withdraw A
        assert!(bob.withdraw(&a.id(), &revealed).await.unwrap().is_applied());
        assert_eq!(fx.balance(Network::Bitcoin, BOB_BTC).await, ONE_CENT_BTC);
        assert_eq!(fx.balance(Network::Bitcoin, ALICE_BTC).await, 0);

        // Alice sees A settle
        let report = fx.settle(&alice, Network::Bitcoin).await.unwrap();
        assert_eq!(report.applied(), 1);
        assert_eq!(report.ignored(), 1);

        for engine in [&alice, &bob] {
            assert_eq!(engine.status(&a.id()).await.unwrap(), SwapStatus::Withdrawn);
            assert_eq!(engine.status(&b.id()).await.unwrap(), SwapStatus::Withdrawn);
        }
        assert!(bob.record(&a.id()).await.unwrap().withdraw_tx.is_some());
        assert!(alice.record(&b.id()).await.unwrap().withdraw_tx.is_some());

        let metrics = swap_telemetry::encode_metrics().unwrap();
        assert!(metrics.contains("swap_engine_feed_items_total"));
        assert!(metrics.contains("swap_engine_feed_drain_duration_seconds"));
    }

    #[tokio::test]
    async fn test_generated_secret_opens_swap() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let mut input = alice_input(dec!(0.01), dec!(0.5), &secret(b"unused"));
        input.secret = None;

        let (a, generated) = alice.prepare_swap(input, None).await.unwrap();
        assert_eq!(generated.len(), 32);
        assert!(verify_secret(&generated, a.hash_lock()));
    }

    #[tokio::test]
    async fn test_alice_rejects_short_counter_swap() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let bob = fx.engine().unwrap();
        let s1 = secret(b"s1");

        let (a, _) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &s1), None)
            .await
            .unwrap();
        bob.track(a.clone());
        fx.btc.credit(ALICE_BTC, ONE_CENT_BTC);
        alice.fund(&a.id()).await.unwrap();
        fx.settle(&bob, Network::Bitcoin).await.unwrap();

        // Bob locks less than quoted
        let mut short = bob.derive_counter_swap(&a, None).await.unwrap();
        short.set_input_amount(HALF_ETH / 2).unwrap();
        bob.track(short.clone());
        fx.eth.credit(BOB_ETH, HALF_ETH);
        bob.fund(&short.id()).await.unwrap();

        alice.track(short.clone());
        fx.settle(&alice, Network::Ethereum).await.unwrap();
        assert!(matches!(
            alice.verify_counter_swap(&a.id(), &short.id()).await,
            Err(SwapError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_counter_swap_to_wrong_receiver_rejected() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let bob = fx.engine().unwrap();
        let s1 = secret(b"s1");

        let (a, _) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &s1), None)
            .await
            .unwrap();
        bob.track(a.clone());
        fx.btc.credit(ALICE_BTC, ONE_CENT_BTC);
        alice.fund(&a.id()).await.unwrap();
        fx.settle(&bob, Network::Bitcoin).await.unwrap();

        // Bob pays himself instead of Alice
        let mut diverted = bob.derive_counter_swap(&a, None).await.unwrap();
        diverted.set_receiver(BOB_ETH);
        bob.track(diverted.clone());
        fx.eth.credit(BOB_ETH, HALF_ETH);
        bob.fund(&diverted.id()).await.unwrap();

        alice.track(diverted.clone());
        fx.settle(&alice, Network::Ethereum).await.unwrap();
        assert!(matches!(
            alice.verify_counter_swap(&a.id(), &diverted.id()).await,
            Err(SwapError::InvalidAddress { field: "receiver", .. })
        ));
    }

    #[tokio::test]
    async fn test_published_funded_status_not_trusted() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let bob = fx.engine().unwrap();
        let s1 = secret(b"s1");

        let (a, _) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &s1), None)
            .await
            .unwrap();
        bob.track(a.clone());
        fx.btc.credit(ALICE_BTC, ONE_CENT_BTC);
        alice.fund(&a.id()).await.unwrap();
        fx.settle(&bob, Network::Bitcoin).await.unwrap();

        // Bob publishes B as funded without ever locking anything
        let b = bob.derive_counter_swap(&a, None).await.unwrap();
        let mut published = serde_json::to_value(&b).unwrap();
        published["status"] = serde_json::json!("Funded");
        let received: Swap = serde_json::from_value(published).unwrap();

        alice.track(received);
        fx.settle(&alice, Network::Ethereum).await.unwrap();
        assert_eq!(alice.status(&b.id()).await.unwrap(), SwapStatus::Created);
        assert!(matches!(
            alice.verify_counter_swap(&a.id(), &b.id()).await,
            Err(SwapError::InvalidTransition { .. })
        ));
        assert!(matches!(
            alice.withdraw(&b.id(), &s1).await,
            Err(SwapError::InvalidTransition { .. })
        ));
        assert!(fx.eth.events().is_empty());
        assert_eq!(fx.balance(Network::Ethereum, ALICE_ETH).await, 0);
    }
}
