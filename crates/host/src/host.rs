// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{contract_address, CallContext, Clock, Journaled};
use alloy_primitives::Address;
use cswap_events::{CswapEvent, EventLog, EventSink, InMemEventLog};
use cswap_utils::sync::{lock, read, write};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace};

type Sink = Box<dyn EventSink<CswapEvent>>;

/// Rolls back every participant when dropped unless the transaction committed, so a panic
/// inside a transaction unwinds its effects as an `Err` would.
struct Revert<'a> {
    participants: &'a [Arc<dyn Journaled>],
    armed: bool,
}

impl Revert<'_> {
    fn commit(mut self) {
        self.armed = false;
        for participant in self.participants {
            participant.commit();
        }
    }
}

impl Drop for Revert<'_> {
    fn drop(&mut self) {
        if self.armed {
            for participant in self.participants.iter().rev() {
                participant.rollback();
            }
        }
    }
}

/// Serialized, all-or-nothing execution environment shared by every contract of a deployment.
pub struct Host {
    chain_id: u64,
    clock: Arc<dyn Clock>,
    deploy_nonce: AtomicU64,
    participants: RwLock<Vec<Arc<dyn Journaled>>>,
    sinks: RwLock<Vec<Sink>>,
    /// Held for the whole duration of a transaction
    log: Mutex<InMemEventLog<CswapEvent>>,
}

impl Host {
    pub fn new(chain_id: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            chain_id,
            clock,
            deploy_nonce: AtomicU64::new(0),
            participants: RwLock::new(vec![]),
            sinks: RwLock::new(vec![]),
            log: Mutex::new(InMemEventLog::new()),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Include `participant` in every subsequent transaction.
    pub fn register(&self, participant: Arc<dyn Journaled>) {
        write(&self.participants).push(participant);
    }

    /// Forward every committed event to `sink`.
    pub fn add_sink(&self, sink: impl EventSink<CswapEvent> + 'static) {
        write(&self.sinks).push(Box::new(sink));
    }

    /// Allocate a fresh contract address.
    pub fn deploy_address(&self, label: &str) -> Address {
        let nonce = self.deploy_nonce.fetch_add(1, Ordering::SeqCst);
        contract_address(self.chain_id, nonce, label)
    }

    /// Execute `f` as one transaction sent by `caller`.
    ///
    /// Transactions never interleave. When `f` returns `Ok` every participant commits and the
    /// emitted events are appended to the log and published. When it returns `Err` every
    /// participant is rolled back, newest registration first, and the events are discarded.
    /// A panic in `f` rolls back the same way before it propagates.
    ///
    /// `f` must not call `transact` on the same host.
    pub fn transact<T, E, F>(&self, caller: Address, f: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce(&mut CallContext) -> Result<T, E>,
    {
        let mut log = lock(&self.log);
        let participants = read(&self.participants).clone();

        for participant in &participants {
            participant.begin();
        }
        let revert = Revert {
            participants: &participants,
            armed: true,
        };

        let mut ctx = CallContext::new(caller, self.clock.now(), self.chain_id);
        let result = f(&mut ctx);

        match &result {
            Ok(_) => {
                revert.commit();
                let sinks = read(&self.sinks);
                for (emitter, data) in ctx.into_logs() {
                    let event = CswapEvent::new(log.next_seq(), emitter, data);
                    trace!(event = %event, "committed");
                    log.append(event.clone());
                    for sink in sinks.iter() {
                        sink.publish(event.clone());
                    }
                }
            }
            Err(err) => {
                drop(revert);
                debug!(caller = %caller, error = %err, "transaction reverted");
            }
        }

        result
    }

    /// Every committed event, oldest first
    pub fn events(&self) -> Vec<CswapEvent> {
        self.events_from(0)
    }

    /// Committed events starting at sequence number `seq`
    pub fn events_from(&self, seq: u64) -> Vec<CswapEvent> {
        lock(&self.log).read_from(seq)
    }

    /// Sequence number the next committed event will get
    pub fn next_seq(&self) -> u64 {
        lock(&self.log).next_seq()
    }
}
