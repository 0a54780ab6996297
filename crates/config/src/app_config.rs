// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path, ConfigLocation};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_NAME: &str = "cswap.config.yaml";
pub const ENV_PREFIX: &str = "CSWAP_";

const MAX_DECIMALS: u8 = 18;

/// One of the two tokens traded by the exchange
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenDefinition {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Largest amount a single transfer on this ledger moves. Mints are not capped.
    #[serde(default)]
    pub max_transfer: Option<u64>,
}

fn default_decimals() -> u8 {
    6
}

impl TokenDefinition {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: default_decimals(),
            max_transfer: None,
        }
    }
}

/// Liquidity minted to the exchange when it is deployed
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    pub seed_a: u64,
    pub seed_b: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            seed_a: 40,
            seed_b: 80_000,
        }
    }
}

/// The config used throughout the app
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Chain id input proofs are bound to
    pub chain_id: u64,
    /// Seed for the coprocessor's proof key. A random key is used when unset.
    pub fhe_seed: Option<u64>,
    /// The token paid in A->B swaps
    pub token_a: TokenDefinition,
    /// The token paid in B->A swaps
    pub token_b: TokenDefinition,
    pub pool: PoolConfig,
    /// How long an operator approval given to the exchange stays valid
    pub operator_validity_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            fhe_seed: None,
            token_a: TokenDefinition::new("Confidential Ether", "cETH"),
            token_b: TokenDefinition::new("Confidential USD Coin", "cUSDC"),
            pool: PoolConfig::default(),
            operator_validity_secs: 3600,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token_a.symbol == self.token_b.symbol {
            bail!(
                "token_a and token_b must have different symbols, both are '{}'",
                self.token_a.symbol
            );
        }
        for token in [&self.token_a, &self.token_b] {
            if token.symbol.trim().is_empty() {
                bail!("Token '{}' has an empty symbol", token.name);
            }
            if token.decimals > MAX_DECIMALS {
                bail!(
                    "Token {} has {} decimals, at most {} are supported",
                    token.symbol,
                    token.decimals,
                    MAX_DECIMALS
                );
            }
            if token.max_transfer == Some(0) {
                bail!("Token {} has a max_transfer of 0", token.symbol);
            }
        }
        if self.operator_validity_secs == 0 {
            bail!("operator_validity_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Load the configuration for the current working directory. See [`resolve_config_path`] for
/// the lookup order.
pub fn load_config(cli_file: Option<&Path>) -> Result<AppConfig> {
    let location = resolve_config_path(
        find_in_parent,
        &env::current_dir()?,
        &OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        cli_file,
    );
    load_config_from(&location)
}

/// Merge defaults, the YAML file at `location` and `CSWAP_` prefixed environment variables, in
/// that order. Nested keys are separated by a double underscore, eg.
/// `CSWAP_TOKEN_A__MAX_TRANSFER`.
pub fn load_config_from(location: &ConfigLocation) -> Result<AppConfig> {
    let path = location.path();
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if path.exists() {
        info!(path = %path.display(), "loading configuration");
        figment = figment.merge(Yaml::file(path));
    } else if location.is_explicit() {
        bail!("Configuration file {} not found", path.display());
    } else {
        debug!(path = %path.display(), "no configuration file, using defaults");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Could not parse configuration")?;

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

pub struct OsDirs;

impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("cswap may only be run on an OS that can provide a config dir. See https://docs.rs/dirs for more information.")?
            .join("cswap"))
    }
}
