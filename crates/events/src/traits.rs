// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use std::fmt::Display;
use std::hash::Hash;

/// Trait that must be implemented by events used with EventBus
pub trait Event:
    Message<Result = ()> + Clone + Display + Send + Sync + Unpin + Sized + 'static
{
    type Id: Hash + Eq + Clone + Unpin + Send + Sync + Display;

    /// Payload for the Event
    type Data;

    fn event_type(&self) -> String;
    fn event_id(&self) -> Self::Id;
    fn get_data(&self) -> &Self::Data;
    fn into_data(self) -> Self::Data;
}

/// Append-only store of committed events.
pub trait EventLog<E: Event>: Send {
    /// Append an event to the log, returning its sequence number
    fn append(&mut self, event: E) -> u64;
    /// Sequence number the next appended event will receive
    fn next_seq(&self) -> u64;
    /// Read all events starting from the given sequence number (inclusive)
    fn read_from(&self, from: u64) -> Vec<E>;
}

/// Destination for events once the transaction that produced them has committed.
pub trait EventSink<E: Event>: Send + Sync {
    fn publish(&self, event: E);
}
