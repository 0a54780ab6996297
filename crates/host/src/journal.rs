// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// Component whose state changes can be undone as a unit.
///
/// The host calls `begin` on every participant before a transaction runs and exactly one of
/// `commit` or `rollback` afterwards.
pub trait Journaled: Send + Sync {
    fn begin(&self);
    fn commit(&self);
    fn rollback(&self);
}

/// Undo entries recorded by a participant while a transaction is open.
///
/// Mutations made while no transaction is open are not recorded and cannot be undone.
#[derive(Debug)]
pub struct UndoLog<U> {
    entries: Option<Vec<U>>,
}

impl<U> UndoLog<U> {
    pub fn new() -> Self {
        Self { entries: None }
    }

    pub fn begin(&mut self) {
        self.entries = Some(vec![]);
    }

    pub fn is_open(&self) -> bool {
        self.entries.is_some()
    }

    pub fn record(&mut self, entry: U) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push(entry);
        }
    }

    pub fn commit(&mut self) {
        self.entries = None;
    }

    /// Close the log and hand back its entries newest first, ready to be applied.
    pub fn unwind(&mut self) -> Vec<U> {
        let mut entries = self.entries.take().unwrap_or_default();
        entries.reverse();
        entries
    }
}

impl<U> Default for UndoLog<U> {
    fn default() -> Self {
        Self::new()
    }
}
