// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{EncryptedInput, FheClient, FheEngine, FheError, FheType, InputProof, Result};
use alloy_primitives::{keccak256, Address, B256};
use cswap_events::CiphertextHandle;
use cswap_host::{Journaled, UndoLog};
use cswap_utils::sync::lock;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::{debug, trace};

const PROOF_DOMAIN: &[u8] = b"cswap.input-proof.v1";
const PROOF_LEN: usize = 64;

#[derive(Clone, Copy, Debug)]
struct Plaintext {
    fhe_type: FheType,
    value: u64,
}

#[derive(Debug)]
enum Undo {
    Created(CiphertextHandle),
    Granted(CiphertextHandle, Address),
    Consumed(B256),
}

#[derive(Default)]
struct EngineState {
    ciphertexts: HashMap<CiphertextHandle, Plaintext>,
    persistent: HashSet<(CiphertextHandle, Address)>,
    transient: HashSet<(CiphertextHandle, Address)>,
    consumed: HashSet<B256>,
    nonce: u64,
    undo: UndoLog<Undo>,
}

impl EngineState {
    fn is_allowed(&self, handle: CiphertextHandle, principal: Address) -> bool {
        self.persistent.contains(&(handle, principal))
            || self.transient.contains(&(handle, principal))
    }

    fn read(
        &self,
        handle: CiphertextHandle,
        principal: Address,
        expected: FheType,
    ) -> Result<u64> {
        let plaintext = self
            .ciphertexts
            .get(&handle)
            .ok_or(FheError::UnknownHandle(handle))?;
        if !self.is_allowed(handle, principal) {
            return Err(FheError::AccessDenied { handle, principal });
        }
        if plaintext.fhe_type != expected {
            return Err(FheError::TypeMismatch {
                handle,
                expected,
                actual: plaintext.fhe_type,
            });
        }
        Ok(plaintext.value)
    }

    fn next_handle(&mut self, chain_id: u64, fhe_type: FheType) -> CiphertextHandle {
        self.nonce += 1;
        let mut preimage = Vec::with_capacity(17);
        preimage.extend_from_slice(&chain_id.to_be_bytes());
        preimage.extend_from_slice(&self.nonce.to_be_bytes());
        preimage.push(fhe_type as u8);
        CiphertextHandle::new(keccak256(&preimage))
    }

    /// Store a computation result and give `principal` transient access to it.
    fn store(
        &mut self,
        chain_id: u64,
        principal: Address,
        fhe_type: FheType,
        value: u64,
    ) -> CiphertextHandle {
        let handle = self.next_handle(chain_id, fhe_type);
        self.ciphertexts
            .insert(handle, Plaintext { fhe_type, value });
        self.undo.record(Undo::Created(handle));
        self.transient.insert((handle, principal));
        handle
    }

    fn store_uint(&mut self, chain_id: u64, principal: Address, value: u64) -> CiphertextHandle {
        self.store(chain_id, principal, FheType::Uint64, value)
    }

    fn store_bool(&mut self, chain_id: u64, principal: Address, value: bool) -> CiphertextHandle {
        self.store(chain_id, principal, FheType::Bool, value as u64)
    }
}

/// Coprocessor running in mock mode: ciphertexts are plaintext values behind opaque handles.
///
/// Everything observable through [`FheEngine`] behaves as with a real coprocessor. Access
/// control, input proofs and typing are enforced, and results are only reachable through
/// fresh handles. Input proofs are MACs keyed by a secret derived from the engine seed.
///
/// Register the engine with the host so that ciphertexts, grants and consumed proofs created
/// by a failing transaction are discarded with it.
pub struct MockFheEngine {
    chain_id: u64,
    secret: [u8; 32],
    state: Mutex<EngineState>,
}

impl MockFheEngine {
    pub fn new(chain_id: u64, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut secret = [0u8; 32];
        rng.fill_bytes(&mut secret);
        Self {
            chain_id,
            secret,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Engine with a random proof secret
    pub fn from_entropy(chain_id: u64) -> Self {
        Self::new(chain_id, rand::thread_rng().gen())
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Number of ciphertexts currently stored
    pub fn ciphertext_count(&self) -> usize {
        lock(&self.state).ciphertexts.len()
    }

    fn mac(&self, handle: CiphertextHandle, user: Address, contract: Address) -> B256 {
        let mut hasher = Sha256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(self.secret);
        hasher.update(handle.as_slice());
        hasher.update(user.as_slice());
        hasher.update(contract.as_slice());
        hasher.update(self.chain_id.to_be_bytes());
        B256::from_slice(&hasher.finalize())
    }

    fn unary(
        &self,
        principal: Address,
        a: CiphertextHandle,
        op: impl FnOnce(u64) -> Result<u64>,
    ) -> Result<CiphertextHandle> {
        let mut state = lock(&self.state);
        let value = op(state.read(a, principal, FheType::Uint64)?)?;
        Ok(state.store_uint(self.chain_id, principal, value))
    }

    /// Apply a fallible update `op(a, b) -> Option<result>`; `None` yields `(false, a)`.
    fn checked(
        &self,
        principal: Address,
        a: CiphertextHandle,
        b: CiphertextHandle,
        op: impl FnOnce(u64, u64) -> Option<u64>,
    ) -> Result<(CiphertextHandle, CiphertextHandle)> {
        let mut state = lock(&self.state);
        let x = state.read(a, principal, FheType::Uint64)?;
        let y = state.read(b, principal, FheType::Uint64)?;
        let (ok, value) = match op(x, y) {
            Some(value) => (true, value),
            None => (false, x),
        };
        let ok = state.store_bool(self.chain_id, principal, ok);
        let value = state.store_uint(self.chain_id, principal, value);
        Ok((ok, value))
    }

    fn grant(
        &self,
        granter: Address,
        handle: CiphertextHandle,
        grantee: Address,
        persistent: bool,
    ) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.ciphertexts.contains_key(&handle) {
            return Err(FheError::UnknownHandle(handle));
        }
        if !state.is_allowed(handle, granter) {
            return Err(FheError::AccessDenied {
                handle,
                principal: granter,
            });
        }
        if !persistent {
            state.transient.insert((handle, grantee));
        } else if state.persistent.insert((handle, grantee)) {
            state.undo.record(Undo::Granted(handle, grantee));
        }
        Ok(())
    }
}

impl FheEngine for MockFheEngine {
    fn trivial_encrypt(&self, principal: Address, value: u64) -> Result<CiphertextHandle> {
        Ok(lock(&self.state).store_uint(self.chain_id, principal, value))
    }

    fn verify_input(
        &self,
        verifier: Address,
        user: Address,
        contract: Address,
        handle: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle> {
        let bytes = proof.as_bytes();
        if bytes.len() != PROOF_LEN {
            return Err(FheError::MalformedProof);
        }
        let (attested, mac) = bytes.split_at(32);
        let expected = self.mac(handle, user, contract);
        if attested != handle.as_slice() || mac != expected.as_slice() {
            return Err(FheError::InvalidProof(handle));
        }

        let mut state = lock(&self.state);
        let plaintext = state
            .ciphertexts
            .get(&handle)
            .ok_or(FheError::UnknownHandle(handle))?;
        if plaintext.fhe_type != FheType::Uint64 {
            return Err(FheError::TypeMismatch {
                handle,
                expected: FheType::Uint64,
                actual: plaintext.fhe_type,
            });
        }
        if !state.consumed.insert(expected) {
            return Err(FheError::ProofAlreadyConsumed);
        }
        state.undo.record(Undo::Consumed(expected));
        state.transient.insert((handle, verifier));
        trace!(handle = %handle, user = %user, contract = %contract, "input accepted");
        Ok(handle)
    }

    fn add(
        &self,
        principal: Address,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<CiphertextHandle> {
        let mut state = lock(&self.state);
        let x = state.read(a, principal, FheType::Uint64)?;
        let y = state.read(b, principal, FheType::Uint64)?;
        Ok(state.store_uint(self.chain_id, principal, x.wrapping_add(y)))
    }

    fn try_increase(
        &self,
        principal: Address,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<(CiphertextHandle, CiphertextHandle)> {
        self.checked(principal, a, b, u64::checked_add)
    }

    fn try_decrease(
        &self,
        principal: Address,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<(CiphertextHandle, CiphertextHandle)> {
        self.checked(principal, a, b, u64::checked_sub)
    }

    fn min_scalar(
        &self,
        principal: Address,
        a: CiphertextHandle,
        cap: u64,
    ) -> Result<CiphertextHandle> {
        self.unary(principal, a, |x| Ok(x.min(cap)))
    }

    fn multiply_by_scalar(
        &self,
        principal: Address,
        a: CiphertextHandle,
        scalar: u64,
    ) -> Result<CiphertextHandle> {
        self.unary(principal, a, |x| Ok(x.wrapping_mul(scalar)))
    }

    fn divide_by_scalar(
        &self,
        principal: Address,
        a: CiphertextHandle,
        scalar: u64,
    ) -> Result<CiphertextHandle> {
        self.unary(principal, a, |x| {
            x.checked_div(scalar).ok_or(FheError::DivisionByZero)
        })
    }

    fn require_true(&self, principal: Address, condition: CiphertextHandle) -> Result<()> {
        match lock(&self.state).read(condition, principal, FheType::Bool)? {
            0 => Err(FheError::ConditionNotMet(condition)),
            _ => Ok(()),
        }
    }

    fn grant_access(
        &self,
        granter: Address,
        handle: CiphertextHandle,
        grantee: Address,
    ) -> Result<()> {
        self.grant(granter, handle, grantee, true)
    }

    fn grant_transient(
        &self,
        granter: Address,
        handle: CiphertextHandle,
        grantee: Address,
    ) -> Result<()> {
        self.grant(granter, handle, grantee, false)
    }

    fn is_allowed(&self, handle: CiphertextHandle, principal: Address) -> bool {
        lock(&self.state).is_allowed(handle, principal)
    }
}

impl FheClient for MockFheEngine {
    fn encrypt_input(&self, contract: Address, user: Address, value: u64) -> EncryptedInput {
        let handle = {
            let mut state = lock(&self.state);
            let handle = state.next_handle(self.chain_id, FheType::Uint64);
            state.ciphertexts.insert(
                handle,
                Plaintext {
                    fhe_type: FheType::Uint64,
                    value,
                },
            );
            handle
        };

        let mut proof = Vec::with_capacity(PROOF_LEN);
        proof.extend_from_slice(handle.as_slice());
        proof.extend_from_slice(self.mac(handle, user, contract).as_slice());
        EncryptedInput {
            handle,
            proof: InputProof::new(proof),
        }
    }

    fn user_decrypt(&self, handle: CiphertextHandle, user: Address) -> Result<u64> {
        if handle.is_zero() {
            return Ok(0);
        }
        let state = lock(&self.state);
        let plaintext = state
            .ciphertexts
            .get(&handle)
            .ok_or(FheError::UnknownHandle(handle))?;
        if !state.persistent.contains(&(handle, user)) {
            return Err(FheError::AccessDenied {
                handle,
                principal: user,
            });
        }
        Ok(plaintext.value)
    }
}

impl Journaled for MockFheEngine {
    fn begin(&self) {
        lock(&self.state).undo.begin();
    }

    fn commit(&self) {
        let mut state = lock(&self.state);
        state.undo.commit();
        state.transient.clear();
    }

    fn rollback(&self) {
        let mut state = lock(&self.state);
        let entries = state.undo.unwind();
        debug!(entries = entries.len(), "rolling back fhe state");
        for entry in entries {
            match entry {
                Undo::Created(handle) => {
                    state.ciphertexts.remove(&handle);
                }
                Undo::Granted(handle, grantee) => {
                    state.persistent.remove(&(handle, grantee));
                }
                Undo::Consumed(digest) => {
                    state.consumed.remove(&digest);
                }
            }
        }
        state.transient.clear();
    }
}
