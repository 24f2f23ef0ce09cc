//! Snapshot configuration: tracked tokens, farming pools and output locations

pub mod presets;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::currency::CurrencyId;
use crate::models::ledger::FIXED_FIELDS;
use crate::utils::ss58;

pub const DEFAULT_RPC_URL: &str = "wss://hk.p.bifrost-rpc.liebi.com/ws";
pub const BIFROST_SS58_PREFIX: u16 = 6;
pub const DEFAULT_PRESET: &str = "vsdot";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown preset {0:?} (available: vdot, vsdot)")]
    UnknownPreset(String),
    #[error("duplicate output field {0:?}")]
    DuplicateField(String),
    #[error("output field {0:?} collides with a fixed record key")]
    ReservedField(String),
    #[error("pool {pool_id} reads from unknown field {source_field:?}")]
    UnknownSourceField { pool_id: u32, source_field: String },
    #[error("duplicate pool id {0}")]
    DuplicatePool(u32),
    #[error("invalid custodian address {address:?}: {reason}")]
    InvalidCustodian { address: String, reason: String },
}

/// LP or wrapped-derivative token whose holdings convert into the base token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedToken {
    pub currency: CurrencyId,
    /// Account holding the pooled base token
    pub custodian: String,
    /// Output field name in each account record
    pub field: String,
}

/// Farming pool whose shares convert into an already-derived holding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPool {
    pub pool_id: u32,
    /// Output field name in each account record
    pub field: String,
    /// Field of the pool keeper's record that backs the shares
    pub source_field: String,
    pub custodian: String,
}

/// Reserve-over-issuance price of a derivative token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSource {
    /// Report key prefix, e.g. `vdot` for `vdot_price`
    pub name: String,
    pub reserve_currency: CurrencyId,
    pub derivative_currency: CurrencyId,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_ss58_prefix() -> u16 {
    BIFROST_SS58_PREFIX
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Everything one snapshot run needs to know, fixed before any RPC call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub name: String,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_ss58_prefix")]
    pub ss58_prefix: u16,
    /// Derivative token every holding is expressed in
    pub base_currency: CurrencyId,
    #[serde(default)]
    pub tokens: Vec<TrackedToken>,
    #[serde(default)]
    pub pools: Vec<TrackedPool>,
    #[serde(default)]
    pub price: Option<PriceSource>,
    /// Primary report path when none is given on the command line
    pub default_output: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Prefix the primary report with a summary row
    #[serde(default)]
    pub summary: bool,
    /// Also write every raw token balance entry
    #[serde(default)]
    pub raw_holdings: bool,
}

impl SnapshotConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: SnapshotConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Derived holding fields in record order: tokens first, then pools
    pub fn holding_fields(&self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|t| t.field.clone())
            .chain(self.pools.iter().map(|p| p.field.clone()))
            .collect()
    }

    /// Custodian addresses in configuration order, tokens first
    pub fn custodians(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(|t| t.custodian.as_str())
            .chain(self.pools.iter().map(|p| p.custodian.as_str()))
    }

    /// Check field names, pool sources and custodian addresses
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for field in self.holding_fields() {
            if FIXED_FIELDS.contains(&field.as_str()) {
                return Err(ConfigError::ReservedField(field));
            }
            if !seen.insert(field.clone()) {
                return Err(ConfigError::DuplicateField(field));
            }
        }

        let mut pool_ids = HashSet::new();
        for pool in &self.pools {
            if !pool_ids.insert(pool.pool_id) {
                return Err(ConfigError::DuplicatePool(pool.pool_id));
            }
            let known = pool.source_field == "free"
                || self.tokens.iter().any(|t| t.field == pool.source_field);
            if !known {
                return Err(ConfigError::UnknownSourceField {
                    pool_id: pool.pool_id,
                    source_field: pool.source_field.clone(),
                });
            }
        }

        for address in self.custodians() {
            ss58::decode(address).map_err(|e| ConfigError::InvalidCustodian {
                address: address.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    pub fn farming_path(&self) -> PathBuf {
        self.data_dir.join("farming.json")
    }

    pub fn system_accounts_path(&self) -> PathBuf {
        self.data_dir.join("system-account.json")
    }

    pub fn raw_holdings_path(&self) -> PathBuf {
        self.data_dir.join("all-token-holders.json")
    }

    pub fn price_path(&self, price: &PriceSource) -> PathBuf {
        self.data_dir.join(format!("{}-price.json", price.name))
    }
}

/// Runtime overrides, usually read from the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub preset: Option<String>,
    pub rpc_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Read `SNAPSHOT_CONFIG`, `SNAPSHOT_PRESET`, `SNAPSHOT_RPC_URL` and `SNAPSHOT_DATA_DIR`
    pub fn from_env() -> Self {
        Self {
            config_path: std::env::var("SNAPSHOT_CONFIG").ok().map(PathBuf::from),
            preset: std::env::var("SNAPSHOT_PRESET").ok(),
            rpc_url: std::env::var("SNAPSHOT_RPC_URL").ok(),
            data_dir: std::env::var("SNAPSHOT_DATA_DIR").ok().map(PathBuf::from),
        }
    }

    /// Build the effective configuration: a TOML file if given, a preset otherwise
    pub fn resolve(&self) -> anyhow::Result<SnapshotConfig> {
        let mut config = match &self.config_path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                SnapshotConfig::from_path(path)?
            }
            None => {
                let name = self.preset.as_deref().unwrap_or(DEFAULT_PRESET);
                info!("Using built-in preset {}", name);
                presets::preset(name)?
            }
        };

        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
