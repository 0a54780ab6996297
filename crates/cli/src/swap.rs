// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::session::Session;
use alloy_primitives::Address;
use anyhow::Result;
use cswap_config::AppConfig;
use cswap_events::Direction;
use cswap_exchange::Side;
use cswap_host::named_address;
use cswap_ledger::ConfidentialLedger;

pub async fn execute(
    config: &AppConfig,
    direction: Direction,
    amount: u64,
    mint: Option<u64>,
    account: &str,
) -> Result<()> {
    let session = Session::start(config)?;
    let caller = named_address(account);
    let paid = Side::paid_in(direction);

    session.mint(paid, caller, mint.unwrap_or(amount))?;
    session.authorize(paid, caller)?;
    let result = session.swap(direction, caller, amount);
    session.drain().await?;
    let sent = result?;

    let symbol = |side: Side| session.token(side).symbol().to_string();
    println!(
        "{account} ({caller}) swapped {amount} {} for {} {}",
        symbol(paid),
        session.decrypt(sent, caller)?,
        symbol(paid.other())
    );
    print_balances(&session, caller)?;
    Ok(())
}

pub fn print_balances(session: &Session, account: Address) -> Result<()> {
    for side in [Side::A, Side::B] {
        let token = session.token(side);
        println!(
            "  {:<8} account {:>12}  exchange {:>12}",
            token.symbol(),
            session.decrypt_balance(side, account)?,
            session.decrypt_custody(side)?
        );
    }
    Ok(())
}
