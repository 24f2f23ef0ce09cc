use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::SnapshotError;
use crate::models::{
    Amount, CurrencyId, FarmingPoolInfo, FarmingShareEntry, ResolvedBlock, TokenAccountEntry,
};
use crate::traits::{BlockResolver, ChainStateProvider};

#[derive(Debug, Clone, Deserialize)]
pub struct DumpTokenAccount {
    pub account: String,
    pub currency: CurrencyId,
    pub free: Amount,
    #[serde(default)]
    pub reserved: Amount,
    #[serde(default)]
    pub frozen: Amount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DumpCurrencyAmount {
    pub currency: CurrencyId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DumpFarmingPool {
    pub pool_id: u32,
    pub keeper: String,
    pub total_shares: Amount,
}

/// Share values are kept raw so a malformed one is reported with its pool and account
#[derive(Debug, Clone, Deserialize)]
pub struct DumpFarmingShare {
    pub pool_id: u32,
    pub account: String,
    pub share: JsonValue,
}

/// Chain state exported at one block, amounts in plain or grouped-digit form
#[derive(Debug, Clone, Deserialize)]
pub struct StateDump {
    pub block_height: u64,
    #[serde(default)]
    pub head: Option<u64>,
    #[serde(default)]
    pub token_accounts: Vec<DumpTokenAccount>,
    #[serde(default)]
    pub total_issuance: Vec<DumpCurrencyAmount>,
    #[serde(default)]
    pub token_pools: Vec<DumpCurrencyAmount>,
    #[serde(default)]
    pub farming_pools: Vec<DumpFarmingPool>,
    #[serde(default)]
    pub farming_shares: Vec<DumpFarmingShare>,
}

/// Offline provider reading a JSON state dump
pub struct JsonStateProvider {
    dump: StateDump,
    block: ResolvedBlock,
}

impl JsonStateProvider {
    /// Create a provider over an in-memory dump
    pub fn from_dump(dump: StateDump) -> Self {
        let block = ResolvedBlock {
            number: dump.block_height,
            head: dump.head.unwrap_or(dump.block_height),
            hash: None,
        };
        Self { dump, block }
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let dump: StateDump = serde_json::from_str(text)?;
        Ok(Self::from_dump(dump))
    }

    /// Load a dump file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading state dump {}", path.display()))?;
        let provider = Self::from_json_str(&text)
            .with_context(|| format!("parsing state dump {}", path.display()))?;
        info!(
            "Loaded state dump {} at #{} ({} token accounts, {} farming shares)",
            path.display(),
            provider.dump.block_height,
            provider.dump.token_accounts.len(),
            provider.dump.farming_shares.len()
        );
        Ok(provider)
    }

    fn lookup(list: &[DumpCurrencyAmount], currency: &CurrencyId) -> Amount {
        list.iter()
            .find(|e| &e.currency == currency)
            .map(|e| e.amount.clone())
            .unwrap_or_default()
    }
}

fn parse_share(share: &DumpFarmingShare) -> Result<Amount, SnapshotError> {
    let malformed = |raw: String| SnapshotError::MalformedShare {
        pool_id: share.pool_id,
        account: share.account.clone(),
        raw,
    };

    Amount::from_json(&share.share).map_err(|_| match &share.share {
        JsonValue::String(raw) => malformed(raw.clone()),
        other => malformed(other.to_string()),
    })
}

#[async_trait]
impl BlockResolver for JsonStateProvider {
    async fn resolve_block(&self, requested: Option<u64>) -> anyhow::Result<ResolvedBlock> {
        match requested {
            Some(height) if height != self.block.number => Err(SnapshotError::BlockNotFound {
                height,
                head: self.block.head,
            }
            .into()),
            _ => Ok(self.block.clone()),
        }
    }
}

#[async_trait]
impl ChainStateProvider for JsonStateProvider {
    fn block(&self) -> &ResolvedBlock {
        &self.block
    }

    async fn free_balance(&self, account: &str, currency: &CurrencyId) -> anyhow::Result<Amount> {
        Ok(self
            .dump
            .token_accounts
            .iter()
            .find(|e| e.account == account && &e.currency == currency)
            .map(|e| e.free.clone())
            .unwrap_or_default())
    }

    async fn total_issuance(&self, currency: &CurrencyId) -> anyhow::Result<Amount> {
        Ok(Self::lookup(&self.dump.total_issuance, currency))
    }

    async fn token_pool(&self, currency: &CurrencyId) -> anyhow::Result<Amount> {
        Ok(Self::lookup(&self.dump.token_pools, currency))
    }

    async fn token_accounts(&self) -> anyhow::Result<Vec<TokenAccountEntry>> {
        Ok(self
            .dump
            .token_accounts
            .iter()
            .map(|e| TokenAccountEntry {
                account: e.account.clone(),
                currency: e.currency.clone(),
                free: e.free.clone(),
                reserved: e.reserved.clone(),
                frozen: e.frozen.clone(),
            })
            .collect())
    }

    async fn farming_pool_info(&self, pool_id: u32) -> anyhow::Result<Option<FarmingPoolInfo>> {
        Ok(self
            .dump
            .farming_pools
            .iter()
            .find(|p| p.pool_id == pool_id)
            .map(|p| FarmingPoolInfo {
                pool_id,
                keeper: p.keeper.clone(),
                total_shares: p.total_shares.clone(),
            }))
    }

    async fn farming_shares(&self) -> anyhow::Result<Vec<FarmingShareEntry>> {
        let mut entries = Vec::with_capacity(self.dump.farming_shares.len());
        for share in &self.dump.farming_shares {
            entries.push(FarmingShareEntry {
                pool_id: share.pool_id,
                account: share.account.clone(),
                share: parse_share(share)?,
            });
        }
        Ok(entries)
    }
}
