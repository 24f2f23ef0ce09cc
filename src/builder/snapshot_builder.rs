use anyhow::Context;
use tracing::info;

use super::price::compute_global_price;
use super::ratio::{compute_pool_ratios, compute_token_ratios};
use super::scan::{partition_system_accounts, raw_holdings, scan_balances, scan_farming};
use crate::config::SnapshotConfig;
use crate::models::{HoldingsLedger, Snapshot, SnapshotSummary};
use crate::traits::ChainStateProvider;

/// Builds a holder snapshot from chain state at one block
pub struct SnapshotBuilder<'a> {
    config: &'a SnapshotConfig,
    provider: &'a dyn ChainStateProvider,
}

impl<'a> SnapshotBuilder<'a> {
    /// Create a new snapshot builder
    pub fn new(config: &'a SnapshotConfig, provider: &'a dyn ChainStateProvider) -> Self {
        Self { config, provider }
    }

    /// Run the whole pipeline. The first failing step aborts the run.
    pub async fn build(&self) -> anyhow::Result<Snapshot> {
        let config = self.config;
        let block = self.provider.block().clone();
        info!("Building {} snapshot at #{}", config.name, block.number);

        let token_ratios = compute_token_ratios(self.provider, config)
            .await
            .context("computing token ratios")?;

        let entries = self
            .provider
            .token_accounts()
            .await
            .context("fetching token accounts")?;
        info!("Fetched {} token account entries", entries.len());

        let mut ledger = HoldingsLedger::new(config.holding_fields());
        scan_balances(&mut ledger, &entries, &config.base_currency, &token_ratios);
        let raw = config.raw_holdings.then(|| raw_holdings(&entries));
        drop(entries);

        let farming = if config.pools.is_empty() {
            Vec::new()
        } else {
            let pool_ratios = compute_pool_ratios(self.provider, &config.pools, &ledger)
                .await
                .context("computing farming pool ratios")?;
            let shares = self
                .provider
                .farming_shares()
                .await
                .context("fetching farming shares")?;
            info!("Fetched {} farming share entries", shares.len());
            scan_farming(&mut ledger, &shares, &pool_ratios)
        };

        ledger.finalize_totals();

        let price = match &config.price {
            Some(source) => Some(
                compute_global_price(self.provider, source)
                    .await
                    .context("computing global price")?,
            ),
            None => None,
        };

        let system_accounts = partition_system_accounts(&mut ledger, config);
        info!(
            "{} holders, {} system accounts, {} farming positions",
            ledger.len(),
            system_accounts.len(),
            farming.len()
        );

        let summary = if config.summary {
            let token_total_issuance = self
                .provider
                .total_issuance(&config.base_currency)
                .await
                .context("fetching base token issuance")?;
            Some(SnapshotSummary {
                block_height: block.number,
                token_total_issuance,
                total_token: ledger.grand_total(),
            })
        } else {
            None
        };

        Ok(Snapshot {
            block,
            holders: ledger.into_records(),
            system_accounts,
            farming,
            raw_holdings: raw,
            summary,
            price,
        })
    }
}
