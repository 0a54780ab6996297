// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use cswap_fhe::FheError;
use cswap_ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Invalid exchange configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Encrypted amount or input proof rejected: {0}")]
    InvalidCiphertextOrProof(FheError),

    /// The ledger refused the transfer. Insufficient balance, exhausted liquidity and missing
    /// operator approval all end up here.
    #[error("Transfer rejected by {ledger}: {source}")]
    TransferRejected { ledger: String, source: LedgerError },

    #[error("Could not grant access on the swap output: {0}")]
    PermissionGrantFailed(FheError),

    #[error("Encrypted computation failed: {0}")]
    Computation(FheError),
}

pub type Result<T> = std::result::Result<T, SwapError>;
