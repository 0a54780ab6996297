// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use cswap_events::CiphertextHandle;
use cswap_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plaintext type behind a ciphertext handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FheType {
    Bool,
    Uint64,
}

impl fmt::Display for FheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FheType::Bool => write!(f, "ebool"),
            FheType::Uint64 => write!(f, "euint64"),
        }
    }
}

/// Attestation that an externally supplied ciphertext is well formed and was produced by a
/// given user for a given contract on a given chain. It can be verified once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputProof(ArcBytes);

impl InputProof {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for InputProof {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

/// Ciphertext uploaded by a user together with the proof a contract needs to accept it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInput {
    pub handle: CiphertextHandle,
    pub proof: InputProof,
}
