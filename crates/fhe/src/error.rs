// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::FheType;
use alloy_primitives::Address;
use cswap_events::CiphertextHandle;
use thiserror::Error;

/// Errors raised by the FHE engine. None of them carries a cleartext value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FheError {
    #[error("Unknown ciphertext handle {0}")]
    UnknownHandle(CiphertextHandle),

    #[error("{principal} is not allowed to use ciphertext {handle}")]
    AccessDenied {
        handle: CiphertextHandle,
        principal: Address,
    },

    #[error("Ciphertext {handle} is an {actual}, expected an {expected}")]
    TypeMismatch {
        handle: CiphertextHandle,
        expected: FheType,
        actual: FheType,
    },

    #[error("Input proof is malformed")]
    MalformedProof,

    #[error("Input proof does not attest ciphertext {0} for this user, contract and chain")]
    InvalidProof(CiphertextHandle),

    #[error("Input proof has already been consumed")]
    ProofAlreadyConsumed,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Encrypted condition {0} does not hold")]
    ConditionNotMet(CiphertextHandle),
}

pub type Result<T> = std::result::Result<T, FheError>;
