// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Result, SwapError};
use alloy_primitives::Address;
use cswap_events::{CiphertextHandle, Direction};
use cswap_fhe::{FheEngine, InputProof};
use cswap_host::CallContext;
use cswap_ledger::{ConfidentialLedger, LedgerError};
use cswap_utils::report_defect;
use std::sync::Arc;
use tracing::info;

/// Units of token B exchanged for one unit of token A, in both directions.
pub const RATE: u64 = 4000;

/// The two ledgers an exchange trades between.
#[derive(Clone, Default)]
pub struct ExchangeConfig {
    pub token_a: Option<Arc<dyn ConfidentialLedger>>,
    pub token_b: Option<Arc<dyn ConfidentialLedger>>,
}

impl ExchangeConfig {
    pub fn new(
        token_a: Arc<dyn ConfidentialLedger>,
        token_b: Arc<dyn ConfidentialLedger>,
    ) -> Self {
        Self {
            token_a: Some(token_a),
            token_b: Some(token_b),
        }
    }
}

/// Fixed-rate exchange holding custody of both tokens.
///
/// A swap pulls the caller's encrypted amount into custody on the source ledger, scales what
/// that ledger reports as moved, and pays the result out of custody on the destination ledger.
/// Swaps run inside a host transaction, so a swap that fails at any step leaves no trace.
pub struct ConfidentialSwap {
    address: Address,
    token_a: Arc<dyn ConfidentialLedger>,
    token_b: Arc<dyn ConfidentialLedger>,
    engine: Arc<dyn FheEngine>,
}

impl ConfidentialSwap {
    pub fn new(
        address: Address,
        config: ExchangeConfig,
        engine: Arc<dyn FheEngine>,
    ) -> Result<Self> {
        let token_a = config
            .token_a
            .ok_or_else(|| SwapError::InvalidConfiguration("token A is not set".to_string()))?;
        let token_b = config
            .token_b
            .ok_or_else(|| SwapError::InvalidConfiguration("token B is not set".to_string()))?;
        if token_a.address() == token_b.address() {
            return Err(SwapError::InvalidConfiguration(format!(
                "token A and token B are the same ledger ({})",
                token_a.address()
            )));
        }

        Ok(Self {
            address,
            token_a,
            token_b,
            engine,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn rate(&self) -> u64 {
        RATE
    }

    pub fn token_a(&self) -> &Arc<dyn ConfidentialLedger> {
        &self.token_a
    }

    pub fn token_b(&self) -> &Arc<dyn ConfidentialLedger> {
        &self.token_b
    }

    /// Pay `amount` of token A, receive `amount * RATE` of token B.
    ///
    /// The caller must have made the exchange an operator on token A, and `proof` must attest
    /// that the caller encrypted `amount` for the exchange. Returns the handle of the token B
    /// amount sent to the caller.
    pub fn swap_a_in_for_b_out(
        &self,
        ctx: &mut CallContext,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        self.swap(ctx, Direction::AInForBOut, amount, proof)
    }

    /// Pay `amount` of token B, receive `amount / RATE` of token A. The remainder stays with
    /// the exchange.
    pub fn swap_b_in_for_a_out(
        &self,
        ctx: &mut CallContext,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        self.swap(ctx, Direction::BInForAOut, amount, proof)
    }

    /// Encrypted token A balance held by the exchange
    pub fn custody_balance_a(&self) -> CiphertextHandle {
        self.token_a.confidential_balance_of(self.address)
    }

    /// Encrypted token B balance held by the exchange
    pub fn custody_balance_b(&self) -> CiphertextHandle {
        self.token_b.confidential_balance_of(self.address)
    }

    fn ledgers(
        &self,
        direction: Direction,
    ) -> (&Arc<dyn ConfidentialLedger>, &Arc<dyn ConfidentialLedger>) {
        match direction {
            Direction::AInForBOut => (&self.token_a, &self.token_b),
            Direction::BInForAOut => (&self.token_b, &self.token_a),
        }
    }

    fn swap(
        &self,
        ctx: &mut CallContext,
        direction: Direction,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        let caller = ctx.sender();
        let me = self.address;
        let (source, destination) = self.ledgers(direction);

        let transferred = ctx
            .call_from(me, |ctx| {
                source.confidential_transfer_from_with_proof(ctx, caller, me, amount, proof)
            })
            .map_err(|err| match err {
                LedgerError::InvalidInput(err) => SwapError::InvalidCiphertextOrProof(err),
                err => rejected(source.as_ref(), err),
            })?;

        let output = match direction {
            Direction::AInForBOut => self.engine.multiply_by_scalar(me, transferred, RATE),
            Direction::BInForAOut => self.engine.divide_by_scalar(me, transferred, RATE),
        }
        .map_err(SwapError::Computation)?;

        for grantee in [me, destination.address()] {
            self.engine
                .grant_access(me, output, grantee)
                .map_err(|err| {
                    report_defect("Access to a swap output could not be granted", &err);
                    SwapError::PermissionGrantFailed(err)
                })?;
        }

        let sent = ctx
            .call_from(me, |ctx| destination.confidential_transfer(ctx, caller, output))
            .map_err(|err| rejected(destination.as_ref(), err))?;

        info!(account = %caller, direction = %direction, "swap settled");
        ctx.emit(me, direction.swapped(caller, transferred, sent));
        Ok(sent)
    }
}

fn rejected(ledger: &dyn ConfidentialLedger, source: LedgerError) -> SwapError {
    SwapError::TransferRejected {
        ledger: ledger.symbol().to_string(),
        source,
    }
}
