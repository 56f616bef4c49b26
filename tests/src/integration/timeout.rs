//! # Expiry and Refunds
//!
//! Swaps that are never answered, counter-swaps that are never withdrawn,
//! and counter-swaps derived too late to be safe.

#[cfg(test)]
mod tests {
    use crate::harness::{alice_input, secret, TwoChains, ALICE_BTC, BOB_BTC, BOB_ETH};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use swap_engine::adapters::GENESIS_TIME;
    use swap_engine::{
        generate_hash_lock, AdapterConfig, ChainClient, Metadata, Network, Swap, SwapEngine,
        SwapError, SwapParams, SwapStatus,
    };

    const ONE_CENT_BTC: u128 = 1_000_000;

    fn params(expiration: u64) -> SwapParams {
        SwapParams {
            network: Network::Bitcoin,
            output_network: Network::Ethereum,
            sender: ALICE_BTC.to_string(),
            receiver: BOB_BTC.to_string(),
            refund_address: ALICE_BTC.to_string(),
            output_address: BOB_ETH.to_string(),
            input_amount: ONE_CENT_BTC,
            output_amount: 1,
            hash_lock: generate_hash_lock(&secret(b"s1")),
            expiration,
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn test_past_expiration_rejected() {
        let now = GENESIS_TIME;
        assert!(matches!(
            Swap::new(params(now - 1), now, 0),
            Err(SwapError::InvalidExpiration { .. })
        ));
        assert!(matches!(
            Swap::new(params(now), now, 0),
            Err(SwapError::InvalidExpiration { .. })
        ));
        // inside the safety margin
        assert!(matches!(
            Swap::new(params(now + 30), now, 60),
            Err(SwapError::InvalidExpiration { required_margin: 60, .. })
        ));
        assert!(Swap::new(params(now + 61), now, 60).is_ok());
    }

    #[tokio::test]
    async fn test_unanswered_swap_refunds() {
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
        fx.settle(&alice, Network::Bitcoin).await.unwrap();
        fx.settle(&bob, Network::Bitcoin).await.unwrap();

        // too early
        assert!(matches!(
            alice.refund(&a.id()).await,
            Err(SwapError::InvalidTransition { .. })
        ));

        fx.advance(3601);
        assert_eq!(alice.status(&a.id()).await.unwrap(), SwapStatus::Expired);
        assert_eq!(bob.status(&a.id()).await.unwrap(), SwapStatus::Expired);

        // the secret no longer opens an expired swap
        assert!(matches!(
            bob.withdraw(&a.id(), &s1).await,
            Err(SwapError::InvalidTransition { .. })
        ));

        assert!(alice.refund(&a.id()).await.unwrap().is_applied());
        assert_eq!(fx.balance(Network::Bitcoin, ALICE_BTC).await, ONE_CENT_BTC);
        assert_eq!(fx.balance(Network::Bitcoin, BOB_BTC).await, 0);
        assert_eq!(alice.status(&a.id()).await.unwrap(), SwapStatus::Refunded);

        // second refund is a no-op
        assert!(!alice.refund(&a.id()).await.unwrap().is_applied());

        // Bob learns about the refund from the chain
        let report = fx.settle(&bob, Network::Bitcoin).await.unwrap();
        assert_eq!(report.applied(), 1);
        assert_eq!(bob.status(&a.id()).await.unwrap(), SwapStatus::Refunded);
    }

    #[tokio::test]
    async fn test_both_legs_refund_counter_first() {
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
        fx.settle(&alice, Network::Bitcoin).await.unwrap();
        fx.settle(&bob, Network::Bitcoin).await.unwrap();

        let b = bob.derive_counter_swap(&a, None).await.unwrap();
        fx.eth.credit(BOB_ETH, b.input_amount());
        bob.fund(&b.id()).await.unwrap();
        fx.settle(&bob, Network::Ethereum).await.unwrap();

        // Alice never withdraws. B's window closes first.
        fx.advance(1801);
        assert_eq!(bob.status(&b.id()).await.unwrap(), SwapStatus::Expired);
        assert_eq!(alice.status(&a.id()).await.unwrap(), SwapStatus::Funded);
        assert!(matches!(
            alice.refund(&a.id()).await,
            Err(SwapError::InvalidTransition { .. })
        ));

        assert!(bob.refund(&b.id()).await.unwrap().is_applied());
        assert_eq!(fx.balance(Network::Ethereum, BOB_ETH).await, b.input_amount());

        fx.advance(1800);
        assert!(alice.refund(&a.id()).await.unwrap().is_applied());
        assert_eq!(fx.balance(Network::Bitcoin, ALICE_BTC).await, ONE_CENT_BTC);
    }

    #[tokio::test]
    async fn test_late_counter_swap_rejected() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let bob = fx.engine().unwrap();

        let (a, _) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &secret(b"s1")), None)
            .await
            .unwrap();

        // 1800s lock + 900s margin still fits 899s after A was created
        fx.advance(899);
        let b = bob.derive_counter_swap(&a, None).await.unwrap();
        assert!(b.expiration() + 900 < a.expiration());

        // one second later it no longer does; nothing is clamped
        fx.advance(1);
        assert!(matches!(
            bob.derive_counter_swap(&a, None).await,
            Err(SwapError::InvalidExpiration { required_margin: 900, .. })
        ));
    }

    #[tokio::test]
    async fn test_counter_margin_comes_from_counter_chain() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();

        let btc: Arc<dyn ChainClient> = fx.btc.clone();
        let eth: Arc<dyn ChainClient> = fx.eth.clone();
        let cautious = SwapEngine::builder()
            .with_config(
                AdapterConfig::for_testing(Network::Bitcoin).with_receiver_address(BOB_BTC),
                btc,
            )
            .unwrap()
            .with_config(
                AdapterConfig::for_testing(Network::Ethereum)
                    .with_receiver_address(BOB_ETH)
                    .with_counter_swap_margin(2 * 3600),
                eth,
            )
            .unwrap()
            .build()
            .unwrap();

        let (a, _) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &secret(b"s1")), None)
            .await
            .unwrap();

        assert!(matches!(
            cautious.derive_counter_swap(&a, None).await,
            Err(SwapError::InvalidExpiration { .. })
        ));
        assert!(cautious.registry().is_empty());
    }

    #[tokio::test]
    async fn test_refund_of_unfunded_swap_rejected() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let (a, _) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &secret(b"s1")), None)
            .await
            .unwrap();

        fx.advance(3601);
        assert_eq!(alice.status(&a.id()).await.unwrap(), SwapStatus::Created);
        assert!(matches!(
            alice.refund(&a.id()).await,
            Err(SwapError::InvalidTransition { .. })
        ));
    }
}
