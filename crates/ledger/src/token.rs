// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ConfidentialLedger, LedgerError, Result};
use alloy_primitives::Address;
use cswap_events::{CiphertextHandle, ConfidentialTransfer, OperatorSet};
use cswap_fhe::{FheEngine, FheError, InputProof};
use cswap_host::{CallContext, Journaled, UndoLog};
use cswap_utils::sync::lock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

pub const DEFAULT_DECIMALS: u8 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Rules applied to every transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Transfers larger than this silently move only this much. Mints are not capped.
    pub max_transfer: Option<u64>,
}

#[derive(Debug)]
enum LedgerUndo {
    Balance(Address, Option<CiphertextHandle>),
    Operator((Address, Address), Option<u64>),
    Supply(CiphertextHandle),
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Address, CiphertextHandle>,
    /// (holder, operator) -> last timestamp the operator may act at
    operators: HashMap<(Address, Address), u64>,
    total_supply: CiphertextHandle,
    undo: UndoLog<LedgerUndo>,
}

impl LedgerState {
    fn set_balance(&mut self, account: Address, handle: CiphertextHandle) {
        let previous = self.balances.insert(account, handle);
        self.undo.record(LedgerUndo::Balance(account, previous));
    }

    fn set_operator(&mut self, holder: Address, operator: Address, until: u64) {
        let previous = self.operators.insert((holder, operator), until);
        self.undo.record(LedgerUndo::Operator((holder, operator), previous));
    }

    fn set_supply(&mut self, handle: CiphertextHandle) {
        let previous = std::mem::replace(&mut self.total_supply, handle);
        self.undo.record(LedgerUndo::Supply(previous));
    }

    fn is_operator(&self, holder: Address, spender: Address, now: u64) -> bool {
        holder == spender
            || self
                .operators
                .get(&(holder, spender))
                .is_some_and(|until| now <= *until)
    }
}

/// Token ledger holding one encrypted balance per account.
///
/// Amounts only ever exist as ciphertext handles. Each new balance handle is readable by the
/// ledger and its holder; each transferred amount by the ledger, both parties and, for the
/// rest of the transaction, the caller.
pub struct ConfidentialToken {
    address: Address,
    metadata: TokenMetadata,
    policy: LedgerPolicy,
    engine: Arc<dyn FheEngine>,
    state: Mutex<LedgerState>,
}

impl ConfidentialToken {
    pub fn new(
        address: Address,
        metadata: TokenMetadata,
        policy: LedgerPolicy,
        engine: Arc<dyn FheEngine>,
    ) -> Self {
        Self {
            address,
            metadata,
            policy,
            engine,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    pub fn confidential_total_supply(&self) -> CiphertextHandle {
        lock(&self.state).total_supply
    }

    /// Create `amount` new tokens for `to`. Anyone may mint.
    pub fn mint(
        &self,
        ctx: &mut CallContext,
        to: Address,
        amount: u64,
    ) -> Result<CiphertextHandle> {
        if to.is_zero() {
            return Err(LedgerError::InvalidReceiver(to));
        }
        let amount = self.engine.trivial_encrypt(self.address, amount)?;
        self.update(ctx, Address::ZERO, to, amount)
    }

    /// Let `operator` move the caller's funds until timestamp `until`, inclusive.
    pub fn set_operator(&self, ctx: &mut CallContext, operator: Address, until: u64) {
        let holder = ctx.sender();
        lock(&self.state).set_operator(holder, operator, until);
        ctx.emit(
            self.address,
            OperatorSet {
                holder,
                operator,
                until,
            },
        );
    }

    pub fn is_operator(&self, holder: Address, spender: Address, now: u64) -> bool {
        lock(&self.state).is_operator(holder, spender, now)
    }

    /// Move an externally encrypted `amount` from the caller to `to`. `proof` must attest that
    /// the caller encrypted `amount` for this ledger.
    pub fn confidential_transfer_with_proof(
        &self,
        ctx: &mut CallContext,
        to: Address,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        let from = ctx.sender();
        let amount = self.accept_input(from, self.address, amount, proof)?;
        self.transfer(ctx, from, to, amount)
    }

    fn accept_input(
        &self,
        user: Address,
        contract: Address,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        self.engine
            .verify_input(self.address, user, contract, amount, proof)
            .map_err(LedgerError::InvalidInput)
    }

    fn require_operator(&self, ctx: &CallContext, holder: Address) -> Result<()> {
        let spender = ctx.sender();
        if !self.is_operator(holder, spender, ctx.timestamp()) {
            return Err(LedgerError::UnauthorizedSpender { holder, spender });
        }
        Ok(())
    }

    fn require_handle_access(&self, ctx: &CallContext, amount: CiphertextHandle) -> Result<()> {
        let account = ctx.sender();
        if !self.engine.is_allowed(amount, account) {
            return Err(LedgerError::UnauthorizedUseOfHandle {
                handle: amount,
                account,
            });
        }
        Ok(())
    }

    fn transfer(
        &self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: CiphertextHandle,
    ) -> Result<CiphertextHandle> {
        if from.is_zero() {
            return Err(LedgerError::InvalidSender(from));
        }
        if to.is_zero() {
            return Err(LedgerError::InvalidReceiver(to));
        }
        self.update(ctx, from, to, amount)
    }

    /// Handle usable as a stored amount, encrypting zero in place of the sentinel.
    fn stored(&self, handle: CiphertextHandle) -> Result<CiphertextHandle> {
        if handle.is_zero() {
            return Ok(self.engine.trivial_encrypt(self.address, 0)?);
        }
        Ok(handle)
    }

    /// Persist `handle` as a value this ledger and `holder` can read.
    fn keep(&self, handle: CiphertextHandle, holder: Address) -> Result<()> {
        self.engine.grant_access(self.address, handle, self.address)?;
        if !holder.is_zero() {
            self.engine.grant_access(self.address, handle, holder)?;
        }
        Ok(())
    }

    /// Move `amount` from `from` to `to`. A zero `from` mints.
    fn update(
        &self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: CiphertextHandle,
    ) -> Result<CiphertextHandle> {
        let me = self.address;
        let engine = &self.engine;
        let mut state = lock(&self.state);

        let transferred = match self.policy.max_transfer {
            Some(cap) if !from.is_zero() => engine.min_scalar(me, amount, cap)?,
            _ => amount,
        };

        if from.is_zero() {
            let supply = self.stored(state.total_supply)?;
            let (ok, supply) = engine.try_increase(me, supply, transferred)?;
            engine.require_true(me, ok)?;
            self.keep(supply, Address::ZERO)?;
            state.set_supply(supply);
        } else {
            let balance = self.stored(state.balances.get(&from).copied().unwrap_or_default())?;
            let (ok, balance) = engine.try_decrease(me, balance, transferred)?;
            engine.require_true(me, ok).map_err(|err| match err {
                FheError::ConditionNotMet(_) => LedgerError::InsufficientBalance,
                other => other.into(),
            })?;
            self.keep(balance, from)?;
            state.set_balance(from, balance);
        }

        let balance = self.stored(state.balances.get(&to).copied().unwrap_or_default())?;
        let balance = engine.add(me, balance, transferred)?;
        self.keep(balance, to)?;
        state.set_balance(to, balance);

        self.keep(transferred, from)?;
        engine.grant_access(me, transferred, to)?;
        engine.grant_transient(me, transferred, ctx.sender())?;

        trace!(ledger = %self.metadata.symbol, from = %from, to = %to, amount = %transferred, "transfer");
        ctx.emit(
            me,
            ConfidentialTransfer {
                from,
                to,
                amount: transferred,
            },
        );
        Ok(transferred)
    }
}

impl ConfidentialLedger for ConfidentialToken {
    fn address(&self) -> Address {
        self.address
    }

    fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    fn confidential_transfer(
        &self,
        ctx: &mut CallContext,
        to: Address,
        amount: CiphertextHandle,
    ) -> Result<CiphertextHandle> {
        self.require_handle_access(ctx, amount)?;
        let from = ctx.sender();
        self.transfer(ctx, from, to, amount)
    }

    fn confidential_transfer_from(
        &self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: CiphertextHandle,
    ) -> Result<CiphertextHandle> {
        self.require_handle_access(ctx, amount)?;
        self.require_operator(ctx, from)?;
        self.transfer(ctx, from, to, amount)
    }

    fn confidential_transfer_from_with_proof(
        &self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        self.require_operator(ctx, from)?;
        let amount = self.accept_input(from, ctx.sender(), amount, proof)?;
        self.transfer(ctx, from, to, amount)
    }

    fn confidential_balance_of(&self, account: Address) -> CiphertextHandle {
        lock(&self.state)
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default()
    }
}

impl Journaled for ConfidentialToken {
    fn begin(&self) {
        lock(&self.state).undo.begin();
    }

    fn commit(&self) {
        lock(&self.state).undo.commit();
    }

    fn rollback(&self) {
        let mut state = lock(&self.state);
        let entries = state.undo.unwind();
        if !entries.is_empty() {
            debug!(ledger = %self.metadata.symbol, entries = entries.len(), "rolling back ledger");
        }
        for entry in entries {
            match entry {
                LedgerUndo::Balance(account, Some(handle)) => {
                    state.balances.insert(account, handle);
                }
                LedgerUndo::Balance(account, None) => {
                    state.balances.remove(&account);
                }
                LedgerUndo::Operator(key, Some(until)) => {
                    state.operators.insert(key, until);
                }
                LedgerUndo::Operator(key, None) => {
                    state.operators.remove(&key);
                }
                LedgerUndo::Supply(handle) => state.total_supply = handle,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use cswap_events::{CswapEventData, Event};
    use cswap_fhe::{FheClient, MockFheEngine};
    use cswap_host::{named_address, Host, ManualClock};

    struct Setup {
        host: Host,
        clock: Arc<ManualClock>,
        engine: Arc<MockFheEngine>,
        token: Arc<ConfidentialToken>,
    }

    fn setup(policy: LedgerPolicy) -> Setup {
        let clock = Arc::new(ManualClock::new(1_000));
        let host = Host::new(31337, clock.clone());
        let engine = Arc::new(MockFheEngine::new(31337, 1));
        let token = Arc::new(ConfidentialToken::new(
            host.deploy_address("cETH"),
            TokenMetadata::new("Confidential Ether", "cETH"),
            policy,
            engine.clone(),
        ));
        host.register(engine.clone());
        host.register(token.clone());
        Setup {
            host,
            clock,
            engine,
            token,
        }
    }

    impl Setup {
        fn mint(&self, to: Address, amount: u64) -> Result<()> {
            self.host
                .transact(to, |ctx| self.token.mint(ctx, to, amount))?;
            Ok(())
        }

        fn balance(&self, account: Address) -> Result<u64> {
            let handle = self.token.confidential_balance_of(account);
            Ok(self.engine.user_decrypt(handle, account)?)
        }
    }

    fn alice() -> Address {
        named_address("alice")
    }

    fn bob() -> Address {
        named_address("bob")
    }

    #[test]
    fn mint_credits_the_receiver_and_supply() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        assert!(s.token.confidential_balance_of(alice()).is_zero());
        s.mint(alice(), 500)?;
        s.mint(alice(), 250)?;
        assert_eq!(s.balance(alice())?, 750);

        let supply = s.token.confidential_total_supply();
        assert_eq!(s.engine.user_decrypt(supply, s.token.address())?, 750);

        let transfers: Vec<_> = s
            .host
            .events()
            .into_iter()
            .filter_map(|e| match e.into_data() {
                CswapEventData::ConfidentialTransfer(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].from, Address::ZERO);
        assert_eq!(transfers[0].to, alice());
        Ok(())
    }

    #[test]
    fn transfer_with_proof_moves_funds() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        s.mint(alice(), 100)?;

        let input = s.engine.encrypt_input(s.token.address(), alice(), 30);
        let moved = s.host.transact(alice(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, bob(), input.handle, &input.proof)
        })?;

        assert_eq!(s.balance(alice())?, 70);
        assert_eq!(s.balance(bob())?, 30);
        assert_eq!(s.engine.user_decrypt(moved, alice())?, 30);
        assert_eq!(s.engine.user_decrypt(moved, bob())?, 30);
        Ok(())
    }

    #[test]
    fn insufficient_balance_changes_nothing() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        s.mint(alice(), 10)?;
        let events_before = s.host.events().len();

        let input = s.engine.encrypt_input(s.token.address(), alice(), 11);
        let result = s.host.transact(alice(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, bob(), input.handle, &input.proof)
        });

        assert_eq!(result, Err(LedgerError::InsufficientBalance));
        assert_eq!(s.balance(alice())?, 10);
        assert!(s.token.confidential_balance_of(bob()).is_zero());
        assert_eq!(s.host.events().len(), events_before);
        Ok(())
    }

    #[test]
    fn operators_expire() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        let operator = named_address("operator");
        s.mint(alice(), 100)?;
        s.host.transact(alice(), |ctx| -> Result<()> {
            s.token.set_operator(ctx, operator, 1_010);
            Ok(())
        })?;

        assert!(s.token.is_operator(alice(), alice(), 0));
        assert!(s.token.is_operator(alice(), operator, 1_010));
        assert!(!s.token.is_operator(alice(), operator, 1_011));
        assert!(!s.token.is_operator(bob(), operator, 1_000));

        let input = s.engine.encrypt_input(operator, alice(), 5);
        s.host.transact(operator, |ctx| {
            s.token.confidential_transfer_from_with_proof(
                ctx,
                alice(),
                operator,
                input.handle,
                &input.proof,
            )
        })?;
        assert_eq!(s.balance(operator)?, 5);

        s.clock.advance(11);
        let input = s.engine.encrypt_input(operator, alice(), 5);
        let result = s.host.transact(operator, |ctx| {
            s.token.confidential_transfer_from_with_proof(
                ctx,
                alice(),
                operator,
                input.handle,
                &input.proof,
            )
        });
        assert_eq!(
            result,
            Err(LedgerError::UnauthorizedSpender {
                holder: alice(),
                spender: operator
            })
        );
        assert_eq!(s.balance(alice())?, 95);
        Ok(())
    }

    #[test]
    fn handles_need_access() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        s.mint(alice(), 100)?;
        let alice_balance = s.token.confidential_balance_of(alice());

        let result = s.host.transact(bob(), |ctx| {
            s.token.confidential_transfer(ctx, bob(), alice_balance)
        });
        assert_eq!(
            result,
            Err(LedgerError::UnauthorizedUseOfHandle {
                handle: alice_balance,
                account: bob()
            })
        );

        s.host.transact(alice(), |ctx| {
            s.token.confidential_transfer(ctx, bob(), alice_balance)
        })?;
        assert_eq!(s.balance(alice())?, 0);
        assert_eq!(s.balance(bob())?, 100);
        Ok(())
    }

    #[test]
    fn zero_addresses_are_rejected() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        let result = s.host.transact(alice(), |ctx| s.token.mint(ctx, Address::ZERO, 1));
        assert_eq!(result, Err(LedgerError::InvalidReceiver(Address::ZERO)));

        s.mint(alice(), 1)?;
        let input = s.engine.encrypt_input(s.token.address(), alice(), 1);
        let result = s.host.transact(alice(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, Address::ZERO, input.handle, &input.proof)
        });
        assert_eq!(result, Err(LedgerError::InvalidReceiver(Address::ZERO)));
        Ok(())
    }

    #[test]
    fn rejected_proofs_surface_as_invalid_input() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        s.mint(alice(), 100)?;
        let input = s.engine.encrypt_input(s.token.address(), alice(), 1);

        let result = s.host.transact(bob(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, bob(), input.handle, &input.proof)
        });
        assert!(matches!(
            result,
            Err(LedgerError::InvalidInput(FheError::InvalidProof(_)))
        ));

        s.host.transact(alice(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, bob(), input.handle, &input.proof)
        })?;
        let replay = s.host.transact(alice(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, bob(), input.handle, &input.proof)
        });
        assert_eq!(
            replay,
            Err(LedgerError::InvalidInput(FheError::ProofAlreadyConsumed))
        );
        Ok(())
    }

    #[test]
    fn policy_caps_transfers() -> Result<()> {
        let s = setup(LedgerPolicy {
            max_transfer: Some(25),
        });
        s.mint(alice(), 100)?;
        assert_eq!(s.balance(alice())?, 100);

        let input = s.engine.encrypt_input(s.token.address(), alice(), 40);
        s.host.transact(alice(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, bob(), input.handle, &input.proof)
        })?;
        assert_eq!(s.balance(alice())?, 75);
        assert_eq!(s.balance(bob())?, 25);

        let input = s.engine.encrypt_input(s.token.address(), bob(), 5);
        s.host.transact(bob(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, alice(), input.handle, &input.proof)
        })?;
        let input = s.engine.encrypt_input(s.token.address(), bob(), 1_000);
        let moved = s.host.transact(bob(), |ctx| {
            s.token
                .confidential_transfer_with_proof(ctx, alice(), input.handle, &input.proof)
        });
        assert_eq!(moved, Err(LedgerError::InsufficientBalance));
        assert_eq!(s.balance(bob())?, 20);

        let capped = s
            .host
            .events()
            .into_iter()
            .find_map(|event| match event.into_data() {
                CswapEventData::ConfidentialTransfer(t) if t.from == alice() && t.to == bob() => {
                    Some(t)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(s.engine.user_decrypt(capped.amount, bob())?, 25);
        assert_eq!(s.balance(alice())?, 80);
        Ok(())
    }

    #[test]
    fn rollback_restores_operators() -> Result<()> {
        let s = setup(LedgerPolicy::default());
        let operator = named_address("operator");
        let result = s.host.transact(alice(), |ctx| {
            s.token.set_operator(ctx, operator, 2_000);
            s.token.mint(ctx, Address::ZERO, 1)
        });
        assert!(result.is_err());
        assert!(!s.token.is_operator(alice(), operator, 1_000));
        Ok(())
    }
}
