// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Execution model the contracts run under.
//!
//! Every state-changing call runs inside [`Host::transact`]. Calls are serialized, and a call
//! either commits every effect it had on every registered participant (ledgers, the FHE engine)
//! and publishes the events it emitted, or none of them: a failing call rolls each participant
//! back through its undo log and drops its events.

mod address;
mod clock;
mod context;
mod host;
mod journal;

pub use address::*;
pub use clock::*;
pub use context::*;
pub use host::*;
pub use journal::*;
