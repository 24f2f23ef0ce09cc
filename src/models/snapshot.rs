use serde::Serialize;

use super::amount::Amount;
use super::chain::ResolvedBlock;
use super::ledger::AccountRecord;

/// Matched farming share, as written to the farming detail report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmingShareRecord {
    pub key: String,
    pub account: String,
    pub pool_id: String,
    pub share: Amount,
}

impl FarmingShareRecord {
    pub fn new(account: &str, pool_id: u32, share: Amount) -> Self {
        Self {
            key: format!("{}-{}", account, pool_id),
            account: account.to_string(),
            pool_id: pool_id.to_string(),
            share,
        }
    }
}

/// Raw token balance entry, regardless of whether the token is tracked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawHoldingRecord {
    pub key: String,
    pub account: String,
    pub token: String,
    pub free: Amount,
    pub reserved: Amount,
    pub frozen: Amount,
}

/// Summary row placed in front of the primary report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub block_height: u64,
    /// Total issuance of the base token on chain
    pub token_total_issuance: Amount,
    /// Sum of `total_token` over every holder in the report
    pub total_token: Amount,
}

/// Exchange rate of a derivative token against its reserve asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalPrice {
    pub name: String,
    /// Decimal string with exactly 12 fractional digits
    pub value: String,
}

impl GlobalPrice {
    /// Key used in the price report, e.g. `vdot_price`
    pub fn key(&self) -> String {
        format!("{}_price", self.name)
    }
}

/// A row of the primary report: the optional summary, then holders
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PrimaryRow<'a> {
    Summary(&'a SnapshotSummary),
    Account(&'a AccountRecord),
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub block: ResolvedBlock,
    pub holders: Vec<AccountRecord>,
    pub system_accounts: Vec<AccountRecord>,
    pub farming: Vec<FarmingShareRecord>,
    pub raw_holdings: Option<Vec<RawHoldingRecord>>,
    pub summary: Option<SnapshotSummary>,
    pub price: Option<GlobalPrice>,
}

impl Snapshot {
    /// Rows of the primary report, summary first when present
    pub fn primary_rows(&self) -> Vec<PrimaryRow<'_>> {
        let mut rows = Vec::with_capacity(self.holders.len() + 1);
        if let Some(summary) = &self.summary {
            rows.push(PrimaryRow::Summary(summary));
        }
        rows.extend(self.holders.iter().map(PrimaryRow::Account));
        rows
    }

    /// Number of holders in the primary report
    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    /// Sum of `total_token` over the primary report
    pub fn holders_total(&self) -> Amount {
        self.holders.iter().map(|r| &r.total).sum()
    }
}
