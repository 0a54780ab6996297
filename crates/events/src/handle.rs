// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::B256;
use cswap_utils::hexf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a ciphertext held by the FHE engine.
///
/// A handle carries no information about the encrypted value. Only principals the engine has
/// granted access to may compute on it or hand it to another contract.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CiphertextHandle(B256);

impl CiphertextHandle {
    /// Sentinel returned for accounts that have never held a balance.
    pub const ZERO: CiphertextHandle = CiphertextHandle(B256::ZERO);

    pub fn new(value: B256) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_b256(&self) -> &B256 {
        &self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<B256> for CiphertextHandle {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<[u8; 32]> for CiphertextHandle {
    fn from(value: [u8; 32]) -> Self {
        Self(B256::from(value))
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.as_slice();
        write!(f, "ct:")?;
        hexf(&bytes[..6], f)
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle(")?;
        hexf(self.0.as_slice(), f)?;
        write!(f, ")")
    }
}
