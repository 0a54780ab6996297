// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use cswap_events::CswapEventData;

/// Identity and environment of the call currently executing, plus the events it has emitted
/// so far. Events only reach the event log if the enclosing transaction commits.
#[derive(Debug)]
pub struct CallContext {
    origin: Address,
    sender: Address,
    timestamp: u64,
    chain_id: u64,
    logs: Vec<(Address, CswapEventData)>,
}

impl CallContext {
    pub(crate) fn new(origin: Address, timestamp: u64, chain_id: u64) -> Self {
        Self {
            origin,
            sender: origin,
            timestamp,
            chain_id,
            logs: vec![],
        }
    }

    /// Immediate caller of the current frame
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Account that started the transaction
    pub fn origin(&self) -> Address {
        self.origin
    }

    /// Block timestamp the transaction executes at
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Run `f` as a nested call made by `caller`, so that the callee sees `caller` as its
    /// sender. The previous sender is restored afterwards.
    pub fn call_from<R>(&mut self, caller: Address, f: impl FnOnce(&mut CallContext) -> R) -> R {
        let previous = std::mem::replace(&mut self.sender, caller);
        let result = f(self);
        self.sender = previous;
        result
    }

    pub fn emit(&mut self, emitter: Address, data: impl Into<CswapEventData>) {
        self.logs.push((emitter, data.into()));
    }

    /// Events emitted so far in this transaction, in emission order
    pub fn pending_events(&self) -> &[(Address, CswapEventData)] {
        &self.logs
    }

    pub(crate) fn into_logs(self) -> Vec<(Address, CswapEventData)> {
        self.logs
    }
}
