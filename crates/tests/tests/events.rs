// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Actor;
use anyhow::Result;
use cswap_config::{AppConfig, TokenDefinition};
use cswap_events::{CswapEvent, CswapEventData, Direction, Event, EventBus, TakeEvents};
use cswap_exchange::Side;
use cswap_logger::SimpleLogger;
use cswap_test_helpers::{alice, bob, Fixture, FHE_SEED};
use std::time::Duration;

#[test]
fn one_event_per_swap_with_the_moved_amounts() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 2)?;
    fixture.prepare(Direction::BInForAOut, bob(), 8_000)?;

    let to_b = fixture.swap(Direction::AInForBOut, alice(), 2)?;
    let to_a = fixture.swap(Direction::BInForAOut, bob(), 8_000)?;

    let records = fixture.swap_records();
    assert_eq!(records.len(), 2);

    let first = records[0];
    assert_eq!(first.direction, Direction::AInForBOut);
    assert_eq!(first.account, alice());
    assert_eq!(first.handles.output, to_b);
    assert_eq!(fixture.decrypt(first.handles.input, alice())?, 2);
    assert_eq!(fixture.decrypt(first.handles.output, alice())?, 8_000);

    let second = records[1];
    assert_eq!(second.direction, Direction::BInForAOut);
    assert_eq!(second.account, bob());
    assert_eq!(second.handles.output, to_a);
    assert_eq!(fixture.decrypt(second.handles.input, bob())?, 8_000);
    assert_eq!(fixture.decrypt(second.handles.output, bob())?, 2);
    assert!(first.seq < second.seq);
    Ok(())
}

#[test]
fn swap_event_follows_its_ledger_transfers() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 1)?;
    let from = fixture.host().next_seq();
    fixture.swap(Direction::AInForBOut, alice(), 1)?;

    let types: Vec<String> = fixture
        .host()
        .events_from(from)
        .iter()
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        types,
        vec![
            "ConfidentialTransfer",
            "ConfidentialTransfer",
            "AInForBOutSwapped"
        ]
    );
    Ok(())
}

#[test]
fn capped_ledgers_report_what_they_moved() -> Result<()> {
    let mut token_a = TokenDefinition::new("Confidential Ether", "cETH");
    token_a.max_transfer = Some(3);
    let fixture = Fixture::with_config(AppConfig {
        fhe_seed: Some(FHE_SEED),
        token_a,
        ..AppConfig::default()
    })?;
    fixture.mint(Side::A, alice(), 3)?;
    fixture.prepare(Direction::AInForBOut, alice(), 3)?;
    assert_eq!(fixture.balances(alice())?, (6, 0));
    assert_eq!(fixture.custody()?, (40, 80_000));

    let sent = fixture.swap(Direction::AInForBOut, alice(), 5)?;
    assert_eq!(fixture.decrypt(sent, alice())?, 12_000);
    assert_eq!(fixture.balances(alice())?, (3, 12_000));

    let record = fixture.swap_records()[0];
    assert_eq!(fixture.decrypt(record.handles.input, alice())?, 3);
    assert_eq!(record.handles.output, sent);
    Ok(())
}

#[test]
fn handles_are_opaque_to_other_accounts() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.prepare(Direction::AInForBOut, alice(), 2)?;
    fixture.swap(Direction::AInForBOut, alice(), 2)?;

    let record = fixture.swap_records()[0];
    assert!(fixture.decrypt(record.handles.input, bob()).is_err());
    assert!(fixture.decrypt(record.handles.output, bob()).is_err());
    Ok(())
}

#[actix::test]
async fn committed_events_reach_the_bus() -> Result<()> {
    let fixture = Fixture::new()?;
    let bus = EventBus::<CswapEvent>::new().start();
    let history = EventBus::history(&bus);
    SimpleLogger::attach("cswap", bus.clone());
    fixture.add_sink(bus.clone());

    let from = fixture.host().next_seq();
    fixture.prepare(Direction::AInForBOut, alice(), 5)?;
    fixture.swap(Direction::AInForBOut, alice(), 5)?;
    assert!(fixture.swap(Direction::AInForBOut, alice(), 5).is_err());

    let committed = fixture.host().events_from(from);
    let delivered = tokio::time::timeout(
        Duration::from_secs(2),
        history.send(TakeEvents::<CswapEvent>::new(committed.len())),
    )
    .await??;

    assert_eq!(delivered, committed);
    let swaps = delivered
        .iter()
        .filter(|e| matches!(e.get_data(), CswapEventData::AInForBOutSwapped(_)))
        .count();
    assert_eq!(swaps, 1);
    Ok(())
}
