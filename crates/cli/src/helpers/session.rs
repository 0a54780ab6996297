// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr};
use anyhow::{Context, Result};
use cswap_config::AppConfig;
use cswap_events::{CswapEvent, EventBus, HistoryCollector, TakeEvents};
use cswap_exchange::Deployment;
use cswap_host::SystemClock;
use cswap_logger::SimpleLogger;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// An in-process deployment whose committed events are logged through the event bus.
pub struct Session {
    deployment: Deployment,
    history: Addr<HistoryCollector<CswapEvent>>,
    first_seq: u64,
}

impl Session {
    pub fn start(config: &AppConfig) -> Result<Self> {
        let bus = EventBus::<CswapEvent>::new().start();
        let history = EventBus::history(&bus);
        SimpleLogger::attach("cswap", bus.clone());

        let deployment = Deployment::new(config, Arc::new(SystemClock))?;
        deployment.add_sink(bus);
        let first_seq = deployment.host().next_seq();
        Ok(Self {
            deployment,
            history,
            first_seq,
        })
    }

    /// Wait until every event committed since the session started has reached the bus.
    pub async fn drain(&self) -> Result<()> {
        let committed = self
            .deployment
            .host()
            .events_from(self.first_seq)
            .len();
        tokio::time::timeout(
            DRAIN_TIMEOUT,
            self.history.send(TakeEvents::<CswapEvent>::new(committed)),
        )
        .await
        .context("Timed out waiting for events to be delivered")??;
        Ok(())
    }
}

impl Deref for Session {
    type Target = Deployment;

    fn deref(&self) -> &Self::Target {
        &self.deployment
    }
}
