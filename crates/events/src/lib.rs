// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod cswap_event;
mod event_id;
mod event_log;
mod eventbus;
mod handle;
mod traits;

pub use cswap_event::*;
pub use event_id::*;
pub use event_log::*;
pub use eventbus::*;
pub use handle::*;
pub use traits::*;
