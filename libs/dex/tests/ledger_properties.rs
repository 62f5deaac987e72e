//! Ledger-level invariants under random swap sequences

mod common;

use common::Fixture;
use dex_core::isi::{SetProtocolFeePartOnXykPool, SwapExactTokensForTokensOnXykPool};
use dex_core::query;
use dex_types::Quantity;
use proptest::prelude::*;

prop_compose! {
    fn swap_step()(base_in in any::<bool>(), amount in 1u64..50_000) -> (bool, Quantity) {
        (base_in, amount)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reserves_track_custody_balances(
        base in 10_000u64..200_000,
        target in 10_000u64..200_000,
        protocol_fee_part_bps in 0u16..10_000,
        steps in prop::collection::vec(swap_step(), 1..10),
    ) {
        let mut fx = Fixture::with_pools();
        let alice = fx.alice.clone();
        let owner = fx.owner.clone();
        let pair = fx.pair(&fx.dot);
        fx.add_liquidity(&fx.dot.clone(), base, target);
        fx.submit(&owner, SetProtocolFeePartOnXykPool {
            token_pair_id: pair.clone(),
            protocol_fee_part_bps,
        }).unwrap();

        for (base_in, amount) in steps {
            let before = query::get_xyk_pool_info(&fx.world, &pair).unwrap();
            let snapshot = fx.world.snapshot().unwrap();
            let path = if base_in {
                vec![fx.xor.clone(), fx.dot.clone()]
            } else {
                vec![fx.dot.clone(), fx.xor.clone()]
            };

            let result = fx.submit(&alice, SwapExactTokensForTokensOnXykPool {
                dex_id: fx.dex_id.clone(),
                path,
                amount_in: amount,
                amount_out_min: 0,
                recipient: alice.clone(),
            });

            let after = query::get_xyk_pool_info(&fx.world, &pair).unwrap();
            if result.is_err() {
                prop_assert_eq!(fx.world.snapshot().unwrap(), snapshot);
                continue;
            }
            prop_assert!(
                after.base_reserve as u128 * after.target_reserve as u128
                    >= before.base_reserve as u128 * before.target_reserve as u128
            );
            prop_assert_eq!(fx.balance(&fx.xor, &after.custody_account_id), after.base_reserve);
            prop_assert_eq!(fx.balance(&fx.dot, &after.custody_account_id), after.target_reserve);
            prop_assert_eq!(after.pool_token_total_supply, before.pool_token_total_supply);
        }
    }
}
