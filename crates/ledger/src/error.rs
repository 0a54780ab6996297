// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use cswap_events::CiphertextHandle;
use cswap_fhe::FheError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid receiver {0}")]
    InvalidReceiver(Address),

    #[error("Invalid sender {0}")]
    InvalidSender(Address),

    #[error("{spender} is not an operator of {holder}")]
    UnauthorizedSpender { holder: Address, spender: Address },

    #[error("{account} is not allowed to use ciphertext {handle}")]
    UnauthorizedUseOfHandle {
        handle: CiphertextHandle,
        account: Address,
    },

    #[error("Encrypted input rejected: {0}")]
    InvalidInput(FheError),

    /// Raised without revealing either the balance or the requested amount.
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error(transparent)]
    Fhe(#[from] FheError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
