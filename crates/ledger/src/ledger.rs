// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::Result;
use alloy_primitives::Address;
use cswap_events::CiphertextHandle;
use cswap_fhe::InputProof;
use cswap_host::CallContext;

/// Surface of a confidential token ledger that other contracts call into.
///
/// Transfers return the handle of the amount the ledger actually moved, which can differ from
/// the requested amount when the ledger applies a transfer policy.
pub trait ConfidentialLedger: Send + Sync {
    fn address(&self) -> Address;

    fn symbol(&self) -> &str;

    /// Move `amount` from the caller to `to`. The caller must have access to `amount`.
    fn confidential_transfer(
        &self,
        ctx: &mut CallContext,
        to: Address,
        amount: CiphertextHandle,
    ) -> Result<CiphertextHandle>;

    /// Move `amount` from `from` to `to`. The caller must be an operator of `from` and have
    /// access to `amount`.
    fn confidential_transfer_from(
        &self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: CiphertextHandle,
    ) -> Result<CiphertextHandle>;

    /// Move an externally encrypted `amount` from `from` to `to`. The caller must be an
    /// operator of `from`, and `proof` must attest that `from` encrypted `amount` for the
    /// caller.
    fn confidential_transfer_from_with_proof(
        &self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<CiphertextHandle>;

    /// Balance handle of `account`, or [`CiphertextHandle::ZERO`] if it never held one.
    fn confidential_balance_of(&self, account: Address) -> CiphertextHandle;
}
