// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ConfidentialSwap, ExchangeConfig};
use alloy_primitives::Address;
use anyhow::{Context, Result};
use cswap_config::{AppConfig, TokenDefinition};
use cswap_events::{CiphertextHandle, CswapEvent, Direction, EventSink};
use cswap_fhe::{FheClient, MockFheEngine};
use cswap_host::{Clock, Host};
use cswap_ledger::{ConfidentialLedger, ConfidentialToken, LedgerPolicy, TokenMetadata};
use std::sync::Arc;
use tracing::info;

/// One of the two tokens of a deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The token paid when swapping in `direction`
    pub fn paid_in(direction: Direction) -> Self {
        match direction {
            Direction::AInForBOut => Side::A,
            Direction::BInForAOut => Side::B,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// An exchange, its two ledgers and the coprocessor, wired to one host.
///
/// Every call goes through its own host transaction, the way a user submitting transactions
/// would drive the contracts.
pub struct Deployment {
    host: Host,
    engine: Arc<MockFheEngine>,
    token_a: Arc<ConfidentialToken>,
    token_b: Arc<ConfidentialToken>,
    swap: ConfidentialSwap,
    operator_validity_secs: u64,
}

impl Deployment {
    /// Deploy according to `config` and mint the configured liquidity to the exchange.
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let host = Host::new(config.chain_id, clock);
        let engine = Arc::new(match config.fhe_seed {
            Some(seed) => MockFheEngine::new(config.chain_id, seed),
            None => MockFheEngine::from_entropy(config.chain_id),
        });
        host.register(engine.clone());

        let deploy_token = |definition: &TokenDefinition| {
            let token = Arc::new(ConfidentialToken::new(
                host.deploy_address(&definition.symbol),
                TokenMetadata::new(&definition.name, &definition.symbol)
                    .with_decimals(definition.decimals),
                LedgerPolicy {
                    max_transfer: definition.max_transfer,
                },
                engine.clone(),
            ));
            host.register(token.clone());
            token
        };
        let token_a = deploy_token(&config.token_a);
        let token_b = deploy_token(&config.token_b);

        let swap = ConfidentialSwap::new(
            host.deploy_address("ConfidentialSwap"),
            ExchangeConfig::new(token_a.clone(), token_b.clone()),
            engine.clone(),
        )?;

        let deployment = Self {
            host,
            engine,
            token_a,
            token_b,
            swap,
            operator_validity_secs: config.operator_validity_secs,
        };

        let pool = deployment.swap.address();
        deployment
            .mint(Side::A, pool, config.pool.seed_a)
            .context("Could not seed token A liquidity")?;
        deployment
            .mint(Side::B, pool, config.pool.seed_b)
            .context("Could not seed token B liquidity")?;

        info!(
            exchange = %pool,
            token_a = %deployment.token_a.address(),
            token_b = %deployment.token_b.address(),
            chain_id = config.chain_id,
            "exchange deployed"
        );
        Ok(deployment)
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn engine(&self) -> &Arc<MockFheEngine> {
        &self.engine
    }

    pub fn exchange(&self) -> &ConfidentialSwap {
        &self.swap
    }

    pub fn token(&self, side: Side) -> &Arc<ConfidentialToken> {
        match side {
            Side::A => &self.token_a,
            Side::B => &self.token_b,
        }
    }

    pub fn add_sink(&self, sink: impl EventSink<CswapEvent> + 'static) {
        self.host.add_sink(sink);
    }

    /// Mint `amount` of a token to `to`, sent by `to`.
    pub fn mint(&self, side: Side, to: Address, amount: u64) -> Result<()> {
        let token = self.token(side);
        self.host
            .transact(to, |ctx| token.mint(ctx, to, amount))
            .with_context(|| format!("Could not mint {} to {to}", token.symbol()))?;
        Ok(())
    }

    /// Approve the exchange as `holder`'s operator on a token for the configured validity.
    pub fn authorize(&self, side: Side, holder: Address) -> Result<()> {
        let token = self.token(side);
        let until = self.host.now().saturating_add(self.operator_validity_secs);
        let operator = self.swap.address();
        self.host.transact(holder, |ctx| -> Result<()> {
            token.set_operator(ctx, operator, until);
            Ok(())
        })
    }

    /// Encrypt `value` as `caller` and swap it in `direction`. Returns the handle of the
    /// amount paid out.
    pub fn swap(
        &self,
        direction: Direction,
        caller: Address,
        value: u64,
    ) -> Result<CiphertextHandle> {
        let input = self.engine.encrypt_input(self.swap.address(), caller, value);
        let sent = self.host.transact(caller, |ctx| match direction {
            Direction::AInForBOut => {
                self.swap
                    .swap_a_in_for_b_out(ctx, input.handle, &input.proof)
            }
            Direction::BInForAOut => {
                self.swap
                    .swap_b_in_for_a_out(ctx, input.handle, &input.proof)
            }
        })?;
        Ok(sent)
    }

    /// Decrypt a handle `user` has been granted access to.
    pub fn decrypt(&self, handle: CiphertextHandle, user: Address) -> Result<u64> {
        Ok(self.engine.user_decrypt(handle, user)?)
    }

    /// Decrypt `account`'s balance of a token as the account itself.
    pub fn decrypt_balance(&self, side: Side, account: Address) -> Result<u64> {
        let handle = self.token(side).confidential_balance_of(account);
        self.decrypt(handle, account)
    }

    /// Decrypt the exchange's custody balance of a token.
    pub fn decrypt_custody(&self, side: Side) -> Result<u64> {
        let handle = match side {
            Side::A => self.swap.custody_balance_a(),
            Side::B => self.swap.custody_balance_b(),
        };
        self.decrypt(handle, self.swap.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cswap_host::{named_address, ManualClock};

    fn deploy() -> Deployment {
        let config = AppConfig {
            fhe_seed: Some(1),
            ..AppConfig::default()
        };
        Deployment::new(&config, Arc::new(ManualClock::new(1_000))).unwrap()
    }

    #[test]
    fn pool_is_seeded() -> Result<()> {
        let deployment = deploy();
        assert_eq!(deployment.decrypt_custody(Side::A)?, 40);
        assert_eq!(deployment.decrypt_custody(Side::B)?, 80_000);
        assert_eq!(deployment.token(Side::A).name(), "Confidential Ether");
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let deployment = deploy();
        let alice = named_address("alice");
        deployment.mint(Side::A, alice, 1)?;
        deployment.authorize(Side::A, alice)?;
        deployment.authorize(Side::B, alice)?;

        let sent = deployment.swap(Direction::AInForBOut, alice, 1)?;
        assert_eq!(deployment.decrypt(sent, alice)?, 4000);
        let sent = deployment.swap(Direction::BInForAOut, alice, 4000)?;
        assert_eq!(deployment.decrypt(sent, alice)?, 1);
        assert_eq!(deployment.decrypt_balance(Side::A, alice)?, 1);
        assert_eq!(deployment.decrypt_balance(Side::B, alice)?, 0);
        Ok(())
    }

    #[test]
    fn unbounded_operator_validity_saturates() -> Result<()> {
        let config = AppConfig {
            fhe_seed: Some(1),
            operator_validity_secs: u64::MAX,
            ..AppConfig::default()
        };
        config.validate()?;
        let deployment = Deployment::new(&config, Arc::new(ManualClock::new(1_000)))?;
        let alice = named_address("alice");
        deployment.mint(Side::A, alice, 2)?;
        deployment.authorize(Side::A, alice)?;

        let operator = deployment.exchange().address();
        assert!(deployment
            .token(Side::A)
            .is_operator(alice, operator, u64::MAX));
        let sent = deployment.swap(Direction::AInForBOut, alice, 2)?;
        assert_eq!(deployment.decrypt(sent, alice)?, 8000);
        Ok(())
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = AppConfig::default();
        config.token_b.symbol = config.token_a.symbol.clone();
        assert!(Deployment::new(&config, Arc::new(ManualClock::new(0))).is_err());
    }

    #[test]
    fn sides() {
        assert_eq!(Side::paid_in(Direction::AInForBOut), Side::A);
        assert_eq!(Side::paid_in(Direction::BInForAOut).other(), Side::A);
        assert_eq!(Side::B.to_string(), "B");
    }
}
