// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr, Context, Handler};
use cswap_events::{CswapEvent, CswapEventData, Event, EventBus, Subscribe};
use std::marker::PhantomData;
use tracing::{debug, info};

pub trait EventLogging: Event {
    fn log(&self, logger_name: &str);
}

pub struct SimpleLogger<E: EventLogging> {
    name: String,
    _p: PhantomData<E>,
}

impl<E: EventLogging> SimpleLogger<E> {
    pub fn attach(name: &str, bus: Addr<EventBus<E>>) -> Addr<Self> {
        let addr = Self {
            name: name.to_owned(),
            _p: PhantomData,
        }
        .start();
        bus.do_send(Subscribe::<E>::new("*", addr.clone().recipient()));
        debug!(logger = %name, "attached");
        addr
    }
}

impl<E: EventLogging> Actor for SimpleLogger<E> {
    type Context = Context<Self>;
}

impl<E: EventLogging> Handler<E> for SimpleLogger<E> {
    type Result = ();

    fn handle(&mut self, msg: E, _: &mut Self::Context) -> Self::Result {
        msg.log(&self.name);
    }
}

impl EventLogging for CswapEvent {
    fn log(&self, logger_name: &str) {
        match self.get_data().swap() {
            Some((direction, account, pair)) => info!(
                me = logger_name,
                direction = %direction,
                account = %account,
                input = %pair.input,
                output = %pair.output,
                "Swapped"
            ),
            None => match self.get_data() {
                CswapEventData::ConfidentialTransfer(_) | CswapEventData::OperatorSet(_) => {
                    debug!(me = logger_name, evt = %self, "Ledger event")
                }
                _ => info!(me = logger_name, evt = %self, "Event"),
            },
        }
    }
}
