// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{EncryptedInput, InputProof, Result};
use alloy_primitives::Address;
use cswap_events::CiphertextHandle;

/// Homomorphic operations available to contracts.
///
/// Every operation takes the `principal` executing it and fails with
/// [`FheError::AccessDenied`](crate::FheError::AccessDenied) unless that principal holds
/// persistent or transient access to each ciphertext operand. Results are fresh handles the
/// principal gets transient access to. Transient access lasts until the enclosing transaction
/// ends.
pub trait FheEngine: Send + Sync {
    /// Encrypt a public constant.
    fn trivial_encrypt(&self, principal: Address, value: u64) -> Result<CiphertextHandle>;

    /// Accept an externally supplied ciphertext. `proof` must attest that `handle` was
    /// encrypted by `user` for `contract` on this chain, and can only be accepted once.
    /// `verifier` receives transient access to the handle.
    fn verify_input(
        &self,
        verifier: Address,
        user: Address,
        contract: Address,
        handle: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle>;

    /// `a + b`, wrapping on overflow
    fn add(&self, principal: Address, a: CiphertextHandle, b: CiphertextHandle)
        -> Result<CiphertextHandle>;

    /// `(ok, a + b)` where `ok` is false and the sum is `a` when the addition would overflow.
    fn try_increase(
        &self,
        principal: Address,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<(CiphertextHandle, CiphertextHandle)>;

    /// `(ok, a - b)` where `ok` is false and the difference is `a` when `b > a`.
    fn try_decrease(
        &self,
        principal: Address,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<(CiphertextHandle, CiphertextHandle)>;

    /// `min(a, cap)`
    fn min_scalar(&self, principal: Address, a: CiphertextHandle, cap: u64)
        -> Result<CiphertextHandle>;

    /// `a * scalar`, wrapping on overflow
    fn multiply_by_scalar(
        &self,
        principal: Address,
        a: CiphertextHandle,
        scalar: u64,
    ) -> Result<CiphertextHandle>;

    /// `floor(a / scalar)`
    fn divide_by_scalar(
        &self,
        principal: Address,
        a: CiphertextHandle,
        scalar: u64,
    ) -> Result<CiphertextHandle>;

    /// Abort the transaction unless the encrypted boolean `condition` is true. Nothing about
    /// the operands that produced `condition` is revealed either way.
    fn require_true(&self, principal: Address, condition: CiphertextHandle) -> Result<()>;

    /// Give `grantee` persistent access to `handle`. `granter` must itself have access.
    fn grant_access(&self, granter: Address, handle: CiphertextHandle, grantee: Address)
        -> Result<()>;

    /// Give `grantee` access to `handle` for the rest of the current transaction.
    fn grant_transient(
        &self,
        granter: Address,
        handle: CiphertextHandle,
        grantee: Address,
    ) -> Result<()>;

    fn is_allowed(&self, handle: CiphertextHandle, principal: Address) -> bool;
}

/// Operations performed off-chain on behalf of a user.
pub trait FheClient: Send + Sync {
    /// Encrypt `value` as `user` for submission to `contract`.
    fn encrypt_input(&self, contract: Address, user: Address, value: u64) -> EncryptedInput;

    /// Decrypt a ciphertext `user` has persistent access to. The zero handle decrypts to 0.
    fn user_decrypt(&self, handle: CiphertextHandle, user: Address) -> Result<u64>;
}
