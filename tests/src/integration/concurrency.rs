//! # Concurrent Requests
//!
//! Independent swaps progress in parallel; requests on one swap are
//! serialized so each transition lands exactly once.

#[cfg(test)]
mod tests {
    use crate::harness::{alice_input, secret, TwoChains, ALICE_BTC, BOB_BTC};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Arc;
    use swap_engine::{Network, SwapEngineApi, SwapStatus};

    const SWAPS: usize = 16;
    const ONE_CENT_BTC: u128 = 1_000_000;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_swaps_in_parallel() {
        let fx = TwoChains::new();
        let alice: Arc<dyn SwapEngineApi> = fx.engine().unwrap();
        let bob = fx.engine().unwrap();

        let prepares: Vec<_> = (0..SWAPS)
            .map(|i| {
                let alice = alice.clone();
                tokio::spawn(async move {
                    let s = secret(format!("s{i}").as_bytes());
                    alice
                        .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &s), None)
                        .await
                })
            })
            .collect();

        let mut swaps = Vec::with_capacity(SWAPS);
        for task in prepares {
            let (swap, secret) = task.await.unwrap().unwrap();
            swaps.push((swap, secret));
        }
        let ids: HashSet<_> = swaps.iter().map(|(swap, _)| swap.id()).collect();
        assert_eq!(ids.len(), SWAPS);

        fx.btc.credit(ALICE_BTC, ONE_CENT_BTC * SWAPS as u128);
        let funds: Vec<_> = swaps
            .iter()
            .map(|(swap, _)| {
                let alice = alice.clone();
                let id = swap.id();
                tokio::spawn(async move { alice.fund(&id).await })
            })
            .collect();
        for task in funds {
            task.await.unwrap().unwrap();
        }
        assert_eq!(fx.balance(Network::Bitcoin, ALICE_BTC).await, 0);

        for (swap, _) in &swaps {
            bob.track(swap.clone());
        }
        assert_eq!(bob.registry().len(), SWAPS);
        assert_eq!(fx.settle(&bob, Network::Bitcoin).await.unwrap().applied(), SWAPS);

        let withdraws: Vec<_> = swaps
            .into_iter()
            .map(|(swap, secret)| {
                let bob = bob.clone();
                tokio::spawn(async move { bob.withdraw(&swap.id(), &secret).await })
            })
            .collect();
        for task in withdraws {
            assert!(task.await.unwrap().unwrap().is_applied());
        }
        assert_eq!(
            fx.balance(Network::Bitcoin, BOB_BTC).await,
            ONE_CENT_BTC * SWAPS as u128
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_swap_requests_serialize() {
        let fx = TwoChains::new();
        let alice = fx.engine().unwrap();
        let bob = fx.engine().unwrap();
        let (swap, s1) = alice
            .prepare_swap(alice_input(dec!(0.01), dec!(0.5), &secret(b"s1")), None)
            .await
            .unwrap();
        bob.track(swap.clone());
        fx.btc.credit(ALICE_BTC, ONE_CENT_BTC);

        // concurrent funding submits one transaction
        let funds: Vec<_> = (0..8)
            .map(|_| {
                let alice = alice.clone();
                let id = swap.id();
                tokio::spawn(async move { alice.fund(&id).await })
            })
            .collect();
        let mut txs = HashSet::new();
        for task in funds {
            txs.insert(task.await.unwrap().unwrap());
        }
        assert_eq!(txs.len(), 1);
        assert_eq!(fx.btc.events().len(), 1);
        fx.settle(&bob, Network::Bitcoin).await.unwrap();

        // withdrawals racing the confirmation feed
        let mut withdraws = Vec::new();
        let mut polls = Vec::new();
        for _ in 0..8 {
            let engine = bob.clone();
            let id = swap.id();
            let secret = s1.clone();
            withdraws.push(tokio::spawn(async move { engine.withdraw(&id, &secret).await }));

            let engine = bob.clone();
            polls.push(tokio::spawn(async move {
                engine
                    .poll_events(Network::Bitcoin, &Default::default())
                    .await
            }));
        }

        let mut applied = 0;
        for task in withdraws {
            if task.await.unwrap().unwrap().is_applied() {
                applied += 1;
            }
        }
        for task in polls {
            let report = task.await.unwrap().unwrap();
            assert_eq!(report.failed(), 0);
        }

        assert_eq!(applied, 1);
        assert_eq!(fx.balance(Network::Bitcoin, BOB_BTC).await, ONE_CENT_BTC);
        assert_eq!(bob.status(&swap.id()).await.unwrap(), SwapStatus::Withdrawn);
    }
}
