// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use cswap_config::{AppConfig, PoolConfig};
use cswap_events::Direction;
use cswap_exchange::{Side, SwapError};
use cswap_fhe::{FheClient, FheError};
use cswap_ledger::{ConfidentialLedger, LedgerError};
use cswap_test_helpers::{alice, bob, Fixture, FHE_SEED};

fn swap_error(err: anyhow::Error) -> SwapError {
    err.downcast::<SwapError>()
        .expect("swap failures surface as SwapError")
}

/// Pool that holds too little token B to pay for 5 token A
fn shallow_pool() -> Result<Fixture> {
    Fixture::with_config(AppConfig {
        fhe_seed: Some(FHE_SEED),
        pool: PoolConfig {
            seed_a: 40,
            seed_b: 10_000,
        },
        ..AppConfig::default()
    })
}

#[test]
fn failed_payout_restores_the_callers_funds() -> Result<()> {
    let fixture = shallow_pool()?;
    fixture.prepare(Direction::AInForBOut, alice(), 5)?;
    let events_before = fixture.host().events().len();

    let err = swap_error(
        fixture
            .swap(Direction::AInForBOut, alice(), 5)
            .unwrap_err(),
    );
    assert_eq!(
        err,
        SwapError::TransferRejected {
            ledger: "cUSDC".to_string(),
            source: LedgerError::InsufficientBalance,
        }
    );
    assert_eq!(fixture.balances(alice())?, (5, 0));
    assert_eq!(fixture.custody()?, (40, 10_000));
    assert_eq!(fixture.host().events().len(), events_before);
    assert!(fixture.swap_records().is_empty());
    Ok(())
}

#[test]
fn failed_reverse_payout_restores_the_callers_funds() -> Result<()> {
    let fixture = Fixture::with_config(AppConfig {
        fhe_seed: Some(FHE_SEED),
        pool: PoolConfig {
            seed_a: 2,
            seed_b: 80_000,
        },
        ..AppConfig::default()
    })?;
    fixture.prepare(Direction::BInForAOut, bob(), 40_000)?;
    let events_before = fixture.host().events().len();

    let err = swap_error(
        fixture
            .swap(Direction::BInForAOut, bob(), 40_000)
            .unwrap_err(),
    );
    assert_eq!(
        err,
        SwapError::TransferRejected {
            ledger: "cETH".to_string(),
            source: LedgerError::InsufficientBalance,
        }
    );
    assert_eq!(fixture.balances(bob())?, (0, 40_000));
    assert_eq!(fixture.custody()?, (2, 80_000));
    assert_eq!(fixture.host().events().len(), events_before);
    assert!(fixture.swap_records().is_empty());
    Ok(())
}

#[test]
fn proof_of_a_failed_swap_can_be_resubmitted() -> Result<()> {
    let fixture = shallow_pool()?;
    fixture.prepare(Direction::AInForBOut, alice(), 5)?;
    let exchange = fixture.exchange();
    let input = fixture
        .engine()
        .encrypt_input(exchange.address(), alice(), 5);

    let first = fixture.host().transact(alice(), |ctx| {
        exchange.swap_a_in_for_b_out(ctx, input.handle, &input.proof)
    });
    assert!(first.is_err());

    fixture.mint(Side::B, exchange.address(), 10_000)?;
    let sent = fixture.host().transact(alice(), |ctx| {
        exchange.swap_a_in_for_b_out(ctx, input.handle, &input.proof)
    })?;
    assert_eq!(fixture.decrypt(sent, alice())?, 20_000);

    let replay = fixture.host().transact(alice(), |ctx| {
        exchange.swap_a_in_for_b_out(ctx, input.handle, &input.proof)
    });
    assert_eq!(
        replay,
        Err(SwapError::InvalidCiphertextOrProof(
            FheError::ProofAlreadyConsumed
        ))
    );
    Ok(())
}

#[test]
fn insufficient_caller_balance_changes_nothing() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::BInForAOut, bob(), 3_000)?;

    let err = swap_error(
        fixture
            .swap(Direction::BInForAOut, bob(), 4_000)
            .unwrap_err(),
    );
    assert_eq!(
        err,
        SwapError::TransferRejected {
            ledger: "cUSDC".to_string(),
            source: LedgerError::InsufficientBalance,
        }
    );
    assert_eq!(fixture.balances(bob())?, (0, 3_000));
    assert_eq!(fixture.custody()?, (40, 80_000));
    Ok(())
}

#[test]
fn swaps_need_operator_approval() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.mint(Side::A, alice(), 5)?;

    let err = swap_error(
        fixture
            .swap(Direction::AInForBOut, alice(), 5)
            .unwrap_err(),
    );
    assert_eq!(
        err,
        SwapError::TransferRejected {
            ledger: "cETH".to_string(),
            source: LedgerError::UnauthorizedSpender {
                holder: alice(),
                spender: fixture.exchange().address(),
            },
        }
    );
    assert_eq!(fixture.balances(alice())?, (5, 0));

    // Approval on the other token does not help.
    fixture.authorize(Side::B, alice())?;
    assert!(fixture.swap(Direction::AInForBOut, alice(), 5).is_err());
    assert_eq!(fixture.balances(alice())?, (5, 0));
    assert_eq!(fixture.custody()?, (40, 80_000));
    Ok(())
}

#[test]
fn expired_approvals_are_refused() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 5)?;
    let validity = AppConfig::default().operator_validity_secs;

    fixture.clock.advance(validity);
    fixture.swap(Direction::AInForBOut, alice(), 1)?;

    fixture.clock.advance(1);
    let err = swap_error(
        fixture
            .swap(Direction::AInForBOut, alice(), 1)
            .unwrap_err(),
    );
    assert!(matches!(
        err,
        SwapError::TransferRejected {
            source: LedgerError::UnauthorizedSpender { .. },
            ..
        }
    ));
    assert_eq!(fixture.balances(alice())?, (4, 4000));
    Ok(())
}

#[test]
fn proofs_are_bound_to_caller_and_exchange() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 5)?;
    let exchange = fixture.exchange();
    let engine = fixture.engine();

    let for_bob = engine.encrypt_input(exchange.address(), bob(), 5);
    let for_ledger = engine.encrypt_input(fixture.token(Side::A).address(), alice(), 5);

    for input in [for_bob, for_ledger] {
        let result = fixture.host().transact(alice(), |ctx| {
            exchange.swap_a_in_for_b_out(ctx, input.handle, &input.proof)
        });
        assert!(matches!(
            result,
            Err(SwapError::InvalidCiphertextOrProof(FheError::InvalidProof(_)))
        ));
    }
    assert_eq!(fixture.balances(alice())?, (5, 0));
    Ok(())
}
