// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Fixed-rate exchange between two confidential token ledgers.
//!
//! The exchange holds liquidity of both tokens and swaps at [`RATE`] units of token B per unit
//! of token A. Amounts are never decrypted: every swap moves ciphertext handles between the
//! ledgers and scales them homomorphically through the FHE engine.

mod deployment;
mod error;
mod swap;

pub use deployment::*;
pub use error::*;
pub use swap::*;
