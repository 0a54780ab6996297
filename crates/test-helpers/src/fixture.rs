// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::Result;
use cswap_config::AppConfig;
use cswap_events::{CiphertextPair, Direction, Event};
use cswap_exchange::{Deployment, Side};
use cswap_host::ManualClock;
use std::ops::Deref;
use std::sync::Arc;

pub const START_TIME: u64 = 1_700_000_000;
pub const FHE_SEED: u64 = 42;

/// A settled swap as recorded in the event log
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRecord {
    pub seq: u64,
    pub direction: Direction,
    pub account: Address,
    pub handles: CiphertextPair,
}

/// Deployment of the reference pool (40 cETH / 80,000 cUSDC) on a manual clock.
pub struct Fixture {
    deployment: Deployment,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        Self::with_config(AppConfig {
            fhe_seed: Some(FHE_SEED),
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        let clock = Arc::new(ManualClock::new(START_TIME));
        let deployment = Deployment::new(&config, clock.clone())?;
        Ok(Self { deployment, clock })
    }

    /// Mint `amount` of the token paid in `direction` to `account` and approve the exchange.
    pub fn prepare(&self, direction: Direction, account: Address, amount: u64) -> Result<()> {
        let side = Side::paid_in(direction);
        self.mint(side, account, amount)?;
        self.authorize(side, account)
    }

    /// Plaintext balances of `account` as (token A, token B)
    pub fn balances(&self, account: Address) -> Result<(u64, u64)> {
        Ok((
            self.decrypt_balance(Side::A, account)?,
            self.decrypt_balance(Side::B, account)?,
        ))
    }

    /// Plaintext custody of the exchange as (token A, token B)
    pub fn custody(&self) -> Result<(u64, u64)> {
        Ok((
            self.decrypt_custody(Side::A)?,
            self.decrypt_custody(Side::B)?,
        ))
    }

    pub fn swap_records(&self) -> Vec<SwapRecord> {
        self.host()
            .events()
            .iter()
            .filter_map(|event| {
                let (direction, account, handles) = event.get_data().swap()?;
                Some(SwapRecord {
                    seq: event.seq(),
                    direction,
                    account,
                    handles,
                })
            })
            .collect()
    }
}

impl Deref for Fixture {
    type Target = Deployment;

    fn deref(&self) -> &Self::Target {
        &self.deployment
    }
}
