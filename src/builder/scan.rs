use std::collections::HashSet;

use tracing::debug;

use super::ratio::{PoolRatio, TokenRatio};
use crate::config::SnapshotConfig;
use crate::models::{
    AccountRecord, CurrencyId, FarmingShareEntry, FarmingShareRecord, HoldingsLedger,
    RawHoldingRecord, TokenAccountEntry,
};

/// Apply every token balance entry to the ledger.
///
/// Base-token entries set `free`, `reserved` and `frozen`. Tracked-token
/// entries set the token's field to `floor(ratio * free)`. Other currencies
/// are ignored. Fields are assigned, never added to.
pub fn scan_balances(
    ledger: &mut HoldingsLedger,
    entries: &[TokenAccountEntry],
    base_currency: &CurrencyId,
    ratios: &[TokenRatio],
) -> usize {
    let mut matched = 0;

    for entry in entries {
        if &entry.currency == base_currency {
            let record = ledger.upsert(&entry.account);
            record.free = entry.free.clone();
            record.reserved = entry.reserved.clone();
            record.frozen = entry.frozen.clone();
            matched += 1;
        } else if let Some(tracked) = ratios.iter().find(|r| r.token.currency == entry.currency) {
            let derived = tracked.ratio.apply(&entry.free);
            ledger.upsert(&entry.account).set_holding(&tracked.token.field, derived);
            matched += 1;
        }
    }

    debug!("{} of {} balance entries matched", matched, entries.len());
    matched
}

/// Apply every farming share entry of a tracked pool to the ledger.
///
/// Returns one detail record per matched entry.
pub fn scan_farming(
    ledger: &mut HoldingsLedger,
    entries: &[FarmingShareEntry],
    ratios: &[PoolRatio],
) -> Vec<FarmingShareRecord> {
    let mut details = Vec::new();

    for entry in entries {
        let Some(tracked) = ratios.iter().find(|r| r.pool.pool_id == entry.pool_id) else {
            continue;
        };

        let derived = tracked.ratio.apply(&entry.share);
        ledger.upsert(&entry.account).set_holding(&tracked.pool.field, derived);
        details.push(FarmingShareRecord::new(&entry.account, entry.pool_id, entry.share.clone()));
    }

    debug!("{} of {} farming entries matched", details.len(), entries.len());
    details
}

/// Raw report of every balance entry, tracked or not
pub fn raw_holdings(entries: &[TokenAccountEntry]) -> Vec<RawHoldingRecord> {
    entries
        .iter()
        .map(|entry| {
            let token = entry.currency.to_string();
            RawHoldingRecord {
                key: format!("{}-{}", entry.account, token),
                account: entry.account.clone(),
                token,
                free: entry.free.clone(),
                reserved: entry.reserved.clone(),
                frozen: entry.frozen.clone(),
            }
        })
        .collect()
}

/// Move custodian and pool accounts out of the ledger.
///
/// Returned in configuration order (tokens, then pools), each account once.
pub fn partition_system_accounts(
    ledger: &mut HoldingsLedger,
    config: &SnapshotConfig,
) -> Vec<AccountRecord> {
    let mut seen = HashSet::new();
    let mut system = Vec::new();

    for custodian in config.custodians() {
        if !seen.insert(custodian) {
            continue;
        }
        if let Some(record) = ledger.remove(custodian) {
            system.push(record);
        }
    }

    system
}
