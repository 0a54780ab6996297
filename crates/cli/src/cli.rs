// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::telemetry::setup_simple_tracing;
use crate::{demo, print_config, swap};
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cswap_config::{load_config, AppConfig};
use cswap_events::Direction;
use cswap_exchange::RATE;
use std::path::Path;
use tracing::{debug, instrument, Level};

#[derive(Parser, Debug)]
#[command(name = "cswap")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"))]
#[command(about = "Swap confidential tokens at a fixed rate without revealing amounts", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `cswap -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());
        let config = self.load_config()?;
        debug!(chain_id = config.chain_id, "configuration resolved");

        match self.command {
            Commands::Rate => {
                println!(
                    "1 {} = {} {}",
                    config.token_a.symbol, RATE, config.token_b.symbol
                );
            }
            Commands::Config => print_config::execute(&config)?,
            Commands::Demo => demo::execute(&config).await?,
            Commands::Swap {
                direction,
                amount,
                mint,
                account,
            } => swap::execute(&config, direction.into(), amount, mint, &account).await?,
        }

        Ok(())
    }

    fn load_config(&self) -> Result<AppConfig> {
        load_config(self.config.as_deref().map(Path::new))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the exchange rate
    Rate,

    /// Print the resolved configuration as YAML
    Config,

    /// Run the reference scenario against a freshly deployed exchange
    Demo,

    /// Swap against a freshly deployed, in-process exchange
    Swap {
        /// Which token is paid in
        #[arg(short, long, value_enum)]
        direction: SwapDirection,

        /// Amount of the paid token to swap
        #[arg(short, long)]
        amount: u64,

        /// Amount of the paid token minted to the account first. Defaults to `amount`.
        #[arg(long)]
        mint: Option<u64>,

        /// Label the swapping account is derived from
        #[arg(long, default_value = "alice")]
        account: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SwapDirection {
    /// Pay token A, receive token B
    AForB,
    /// Pay token B, receive token A
    BForA,
}

impl From<SwapDirection> for Direction {
    fn from(value: SwapDirection) -> Self {
        match value {
            SwapDirection::AForB => Direction::AInForBOut,
            SwapDirection::BForA => Direction::BInForAOut,
        }
    }
}
