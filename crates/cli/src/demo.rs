// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::session::Session;
use crate::swap::print_balances;
use alloy_primitives::Address;
use anyhow::{ensure, Result};
use cswap_config::AppConfig;
use cswap_events::Direction;
use cswap_exchange::Side;
use cswap_host::named_address;
use cswap_ledger::ConfidentialLedger;
use tracing::info;

const A_IN: u64 = 5;
const B_IN: u64 = 40_000;

/// Mint and swap 5 of token A, then 40,000 of token B, checking what comes out.
pub async fn execute(config: &AppConfig) -> Result<()> {
    let session = Session::start(config)?;
    let rate = session.exchange().rate();
    let alice = named_address("alice");
    let bob = named_address("bob");

    println!("Exchange deployed at {}", session.exchange().address());
    print_balances(&session, alice)?;

    let received = step(&session, Direction::AInForBOut, alice, A_IN).await?;
    ensure!(
        Some(received) == A_IN.checked_mul(rate),
        "alice received {received}, expected {A_IN} * {rate}"
    );
    print_balances(&session, alice)?;

    let received = step(&session, Direction::BInForAOut, bob, B_IN).await?;
    ensure!(
        received == B_IN / rate,
        "bob received {received}, expected {B_IN} / {rate}"
    );
    print_balances(&session, bob)?;

    info!("demo complete");
    Ok(())
}

async fn step(
    session: &Session,
    direction: Direction,
    caller: Address,
    amount: u64,
) -> Result<u64> {
    let paid = Side::paid_in(direction);
    session.mint(paid, caller, amount)?;
    session.authorize(paid, caller)?;
    let sent = session.swap(direction, caller, amount)?;
    session.drain().await?;

    let received = session.decrypt(sent, caller)?;
    println!(
        "{caller} swapped {amount} {} for {received} {}",
        session.token(paid).symbol(),
        session.token(paid.other()).symbol()
    );
    Ok(received)
}
