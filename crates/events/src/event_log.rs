// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Event, EventLog};

/// EventLog kept in memory for the lifetime of the host.
pub struct InMemEventLog<E: Event> {
    events: Vec<E>,
}

impl<E: Event> InMemEventLog<E> {
    pub fn new() -> Self {
        Self { events: vec![] }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E: Event> Default for InMemEventLog<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> EventLog<E> for InMemEventLog<E> {
    fn append(&mut self, event: E) -> u64 {
        self.events.push(event);
        (self.events.len() - 1) as u64
    }

    fn next_seq(&self) -> u64 {
        self.events.len() as u64
    }

    fn read_from(&self, from: u64) -> Vec<E> {
        self.events
            .iter()
            .skip(from as usize)
            .cloned()
            .collect()
    }
}
