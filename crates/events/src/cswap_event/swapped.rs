// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextHandle, CswapEventData};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// `account` paid `input_handle` of token A and received `output_handle` of token B.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AInForBOutSwapped {
    pub account: Address,
    pub input_handle: CiphertextHandle,
    pub output_handle: CiphertextHandle,
}

/// `account` paid `input_handle` of token B and received `output_handle` of token A.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BInForAOutSwapped {
    pub account: Address,
    pub input_handle: CiphertextHandle,
    pub output_handle: CiphertextHandle,
}

impl Display for AInForBOutSwapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account={} in={} out={}",
            self.account, self.input_handle, self.output_handle
        )
    }
}

impl Display for BInForAOutSwapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account={} in={} out={}",
            self.account, self.input_handle, self.output_handle
        )
    }
}

/// Which way a swap settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Pay token A, receive token B at `amount * rate`
    AInForBOut,
    /// Pay token B, receive token A at `amount / rate`, truncated
    BInForAOut,
}

impl Direction {
    /// The event recorded once a swap in this direction has settled.
    pub fn swapped(
        self,
        account: Address,
        input_handle: CiphertextHandle,
        output_handle: CiphertextHandle,
    ) -> CswapEventData {
        match self {
            Direction::AInForBOut => AInForBOutSwapped {
                account,
                input_handle,
                output_handle,
            }
            .into(),
            Direction::BInForAOut => BInForAOutSwapped {
                account,
                input_handle,
                output_handle,
            }
            .into(),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::AInForBOut => Direction::BInForAOut,
            Direction::BInForAOut => Direction::AInForBOut,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::AInForBOut => write!(f, "A->B"),
            Direction::BInForAOut => write!(f, "B->A"),
        }
    }
}
