use async_trait::async_trait;

use crate::models::{
    Amount, CurrencyId, FarmingPoolInfo, FarmingShareEntry, ResolvedBlock, TokenAccountEntry,
};

/// Resolves the block a snapshot is taken at
#[async_trait]
pub trait BlockResolver: Send + Sync {
    /// Resolve `requested` if given, otherwise the current head.
    ///
    /// A requested height the source has no block for is an error.
    async fn resolve_block(&self, requested: Option<u64>) -> anyhow::Result<ResolvedBlock>;
}

/// Read access to chain state at one fixed block
#[async_trait]
pub trait ChainStateProvider: Send + Sync {
    /// Block every query reads from
    fn block(&self) -> &ResolvedBlock;

    /// Free balance of `currency` held by `account`, zero if absent
    async fn free_balance(&self, account: &str, currency: &CurrencyId) -> anyhow::Result<Amount>;

    /// Total issuance of `currency`
    async fn total_issuance(&self, currency: &CurrencyId) -> anyhow::Result<Amount>;

    /// Amount of `currency` backing its liquid-staking derivative
    async fn token_pool(&self, currency: &CurrencyId) -> anyhow::Result<Amount>;

    /// Every `(account, currency)` balance entry
    async fn token_accounts(&self) -> anyhow::Result<Vec<TokenAccountEntry>>;

    /// Keeper and total shares of a farming pool, `None` if the pool does not exist
    async fn farming_pool_info(&self, pool_id: u32) -> anyhow::Result<Option<FarmingPoolInfo>>;

    /// Every `(pool, account)` farming share entry
    async fn farming_shares(&self) -> anyhow::Result<Vec<FarmingShareEntry>>;
}
