use super::amount::Amount;
use super::currency::CurrencyId;

/// Block a snapshot is taken at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlock {
    /// Height the state is read at
    pub number: u64,
    /// Chain head at resolution time
    pub head: u64,
    /// Block hash, when the source has one
    pub hash: Option<String>,
}

/// One `(account, currency)` entry of the token balance storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountEntry {
    pub account: String,
    pub currency: CurrencyId,
    pub free: Amount,
    pub reserved: Amount,
    pub frozen: Amount,
}

/// The parts of a farming pool's on-chain info the snapshot needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmingPoolInfo {
    pub pool_id: u32,
    pub keeper: String,
    pub total_shares: Amount,
}

/// One `(pool, account)` entry of the farming share storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmingShareEntry {
    pub pool_id: u32,
    pub account: String,
    pub share: Amount,
}
