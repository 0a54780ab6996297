// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use cswap_events::Direction;
use cswap_exchange::{Side, RATE};
use cswap_test_helpers::{alice, bob, test_tracing, Fixture};

#[test]
fn rate_is_fixed() -> Result<()> {
    let fixture = Fixture::new()?;
    assert_eq!(fixture.exchange().rate(), 4000);
    assert_eq!(RATE, 4000);

    fixture.prepare(Direction::AInForBOut, alice(), 1)?;
    fixture.swap(Direction::AInForBOut, alice(), 1)?;
    assert_eq!(fixture.exchange().rate(), 4000);
    Ok(())
}

#[test]
fn reference_scenario() -> Result<()> {
    let _guard = test_tracing("info");
    let fixture = Fixture::new()?;
    assert_eq!(fixture.custody()?, (40, 80_000));

    fixture.prepare(Direction::AInForBOut, alice(), 5)?;
    let sent = fixture.swap(Direction::AInForBOut, alice(), 5)?;
    assert_eq!(fixture.decrypt(sent, alice())?, 20_000);
    assert_eq!(fixture.balances(alice())?, (0, 20_000));
    assert_eq!(fixture.custody()?, (45, 60_000));

    fixture.prepare(Direction::BInForAOut, alice(), 40_000)?;
    let sent = fixture.swap(Direction::BInForAOut, alice(), 40_000)?;
    assert_eq!(fixture.decrypt(sent, alice())?, 10);
    assert_eq!(fixture.balances(alice())?, (10, 20_000));
    assert_eq!(fixture.custody()?, (35, 100_000));
    Ok(())
}

#[test]
fn a_for_b_credits_exactly_rate_times_amount() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, bob(), 12)?;

    for amount in [1, 3, 8] {
        let (a_before, b_before) = fixture.balances(bob())?;
        fixture.swap(Direction::AInForBOut, bob(), amount)?;
        let (a_after, b_after) = fixture.balances(bob())?;
        assert_eq!(a_before - a_after, amount);
        assert_eq!(b_after - b_before, amount * RATE);
    }
    Ok(())
}

#[test]
fn b_for_a_truncates_in_favour_of_the_pool() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::BInForAOut, alice(), 20_000)?;

    let sent = fixture.swap(Direction::BInForAOut, alice(), 7_999)?;
    assert_eq!(fixture.decrypt(sent, alice())?, 1);
    assert_eq!(fixture.custody()?, (39, 87_999));

    let sent = fixture.swap(Direction::BInForAOut, alice(), 3_999)?;
    assert_eq!(fixture.decrypt(sent, alice())?, 0);
    assert_eq!(fixture.balances(alice())?, (1, 8_002));
    assert_eq!(fixture.custody()?, (39, 91_998));
    Ok(())
}

#[test]
fn whole_units_round_trip_exactly() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 1)?;
    fixture.authorize(Side::B, alice())?;

    fixture.swap(Direction::AInForBOut, alice(), 1)?;
    assert_eq!(fixture.balances(alice())?, (0, 4000));
    fixture.swap(Direction::BInForAOut, alice(), 4000)?;
    assert_eq!(fixture.balances(alice())?, (1, 0));
    assert_eq!(fixture.custody()?, (40, 80_000));
    Ok(())
}

#[test]
fn remainders_are_lost_on_the_way_back() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::BInForAOut, alice(), 4001)?;
    fixture.authorize(Side::A, alice())?;

    fixture.swap(Direction::BInForAOut, alice(), 4001)?;
    assert_eq!(fixture.balances(alice())?, (1, 0));
    assert_eq!(fixture.custody()?, (39, 84_001));

    fixture.swap(Direction::AInForBOut, alice(), 1)?;
    assert_eq!(fixture.balances(alice())?, (0, 4000));
    assert_eq!(fixture.custody()?, (40, 80_001));
    Ok(())
}

#[test]
fn value_is_conserved_across_accounts() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 3)?;
    fixture.prepare(Direction::BInForAOut, bob(), 10_000)?;

    fixture.swap(Direction::AInForBOut, alice(), 3)?;
    fixture.swap(Direction::BInForAOut, bob(), 10_000)?;

    let (alice_a, alice_b) = fixture.balances(alice())?;
    let (bob_a, bob_b) = fixture.balances(bob())?;
    let (pool_a, pool_b) = fixture.custody()?;
    assert_eq!(alice_a + bob_a + pool_a, 40 + 3);
    assert_eq!(alice_b + bob_b + pool_b, 80_000 + 10_000);
    assert_eq!((alice_b, bob_a), (12_000, 2));
    Ok(())
}
