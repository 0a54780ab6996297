// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod confidential_transfer;
mod operator_set;
mod swapped;

pub use confidential_transfer::*;
pub use operator_set::*;
pub use swapped::*;

use crate::{Event, EventId};
use actix::Message;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Macro to help define From traits for CswapEventData
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for CswapEventData {
                fn from(data: $variant) -> Self {
                    CswapEventData::$variant(data)
                }
            }
        )*
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::IntoStaticStr)]
pub enum CswapEventData {
    ConfidentialTransfer(ConfidentialTransfer),
    OperatorSet(OperatorSet),
    AInForBOutSwapped(AInForBOutSwapped),
    BInForAOutSwapped(BInForAOutSwapped),
}

impl_from_event!(
    ConfidentialTransfer,
    OperatorSet,
    AInForBOutSwapped,
    BInForAOutSwapped
);

impl CswapEventData {
    /// The settled swap, if this is one of the two swap events.
    pub fn swap(&self) -> Option<(Direction, Address, CiphertextPair)> {
        match self {
            CswapEventData::AInForBOutSwapped(e) => Some((
                Direction::AInForBOut,
                e.account,
                CiphertextPair::new(e.input_handle, e.output_handle),
            )),
            CswapEventData::BInForAOutSwapped(e) => Some((
                Direction::BInForAOut,
                e.account,
                CiphertextPair::new(e.input_handle, e.output_handle),
            )),
            _ => None,
        }
    }
}

impl Display for CswapEventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CswapEventData::ConfidentialTransfer(e) => e.fmt(f),
            CswapEventData::OperatorSet(e) => e.fmt(f),
            CswapEventData::AInForBOutSwapped(e) => e.fmt(f),
            CswapEventData::BInForAOutSwapped(e) => e.fmt(f),
        }
    }
}

/// Input and output handles of a settled swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CiphertextPair {
    pub input: crate::CiphertextHandle,
    pub output: crate::CiphertextHandle,
}

impl CiphertextPair {
    pub fn new(input: crate::CiphertextHandle, output: crate::CiphertextHandle) -> Self {
        Self { input, output }
    }
}

/// A committed event together with the contract that emitted it and its position in the log.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct CswapEvent {
    id: EventId,
    seq: u64,
    emitter: Address,
    data: CswapEventData,
}

impl CswapEvent {
    pub fn new(seq: u64, emitter: Address, data: impl Into<CswapEventData>) -> Self {
        let data = data.into();
        let id = EventId::hash(&(seq, emitter, &data));
        Self {
            id,
            seq,
            emitter,
            data,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn emitter(&self) -> Address {
        self.emitter
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl Event for CswapEvent {
    type Id = EventId;
    type Data = CswapEventData;

    fn event_type(&self) -> String {
        let name: &'static str = (&self.data).into();
        name.to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.id
    }

    fn get_data(&self) -> &Self::Data {
        &self.data
    }

    fn into_data(self) -> Self::Data {
        self.data
    }
}

impl Display for CswapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}@{} {}",
            self.seq,
            self.event_type(),
            self.emitter,
            self.data
        )
    }
}
