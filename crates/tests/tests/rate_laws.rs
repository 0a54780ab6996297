// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use cswap_config::{AppConfig, PoolConfig};
use cswap_events::Direction;
use cswap_exchange::RATE;
use cswap_test_helpers::{alice, Fixture, FHE_SEED};
use proptest::prelude::*;

fn deep_pool() -> Fixture {
    Fixture::with_config(AppConfig {
        fhe_seed: Some(FHE_SEED),
        pool: PoolConfig {
            seed_a: 1_000_000,
            seed_b: 1_000_000 * RATE,
        },
        ..AppConfig::default()
    })
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn a_for_b_multiplies(amount in 0u64..1_000_000) {
        let fixture = deep_pool();
        fixture.prepare(Direction::AInForBOut, alice(), amount).unwrap();
        let sent = fixture.swap(Direction::AInForBOut, alice(), amount).unwrap();
        prop_assert_eq!(fixture.decrypt(sent, alice()).unwrap(), amount * RATE);
    }

    #[test]
    fn b_for_a_divides_and_keeps_the_remainder(amount in 0u64..(100 * RATE)) {
        let fixture = deep_pool();
        let (pool_a, pool_b) = fixture.custody().unwrap();
        fixture.prepare(Direction::BInForAOut, alice(), amount).unwrap();
        let sent = fixture.swap(Direction::BInForAOut, alice(), amount).unwrap();

        let paid = fixture.decrypt(sent, alice()).unwrap();
        prop_assert_eq!(paid, amount / RATE);
        prop_assert_eq!(fixture.custody().unwrap(), (pool_a - paid, pool_b + amount));
    }

    #[test]
    fn there_and_back_never_gains(amount in 1u64..1_000) {
        let fixture = deep_pool();
        fixture.prepare(Direction::AInForBOut, alice(), amount).unwrap();
        fixture.authorize(cswap_exchange::Side::B, alice()).unwrap();

        let out = fixture.swap(Direction::AInForBOut, alice(), amount).unwrap();
        let b = fixture.decrypt(out, alice()).unwrap();
        let back = fixture.swap(Direction::BInForAOut, alice(), b).unwrap();
        prop_assert_eq!(fixture.decrypt(back, alice()).unwrap(), amount);
        prop_assert_eq!(fixture.balances(alice()).unwrap(), (amount, 0));
    }
}
