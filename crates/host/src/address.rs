// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::{keccak256, Address};

/// Deterministic account address for a human readable label such as `"alice"`.
pub fn named_address(label: &str) -> Address {
    Address::from_slice(&keccak256(label.as_bytes())[12..])
}

/// Address for the `nonce`-th contract deployed on `chain_id`.
pub fn contract_address(chain_id: u64, nonce: u64, label: &str) -> Address {
    let mut preimage = Vec::with_capacity(16 + label.len());
    preimage.extend_from_slice(&chain_id.to_be_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(label.as_bytes());
    Address::from_slice(&keccak256(&preimage)[12..])
}
