use async_trait::async_trait;
use tracing::info;

use crate::models::snapshot::Snapshot;
use crate::models::AccountRecord;
use crate::traits::snapshot_handler::SnapshotHandler;
use crate::utils::format_account;

/// Logs a human-readable summary of the snapshot
pub struct ConsoleHandler {
    top: usize,
}

impl ConsoleHandler {
    /// Create a console handler listing the `top` largest holders
    pub fn new(top: usize) -> Self {
        Self { top }
    }

    fn log_record(rank: usize, record: &AccountRecord) {
        info!("{}. {}", rank, format_account(&record.account));
        info!("   Total: {}", record.total);
        info!("   Free: {} (reserved {}, frozen {})", record.free, record.reserved, record.frozen);
        for (field, amount) in record.holdings().filter(|(_, a)| !a.is_zero()) {
            info!("   {}: {}", field, amount);
        }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl SnapshotHandler for ConsoleHandler {
    async fn handle_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        info!("{}", "=".repeat(80));
        info!("HOLDER SNAPSHOT");
        info!("{}", "=".repeat(80));
        info!("Block: #{} (head #{})", snapshot.block.number, snapshot.block.head);
        if let Some(hash) = &snapshot.block.hash {
            info!("Block hash: {}", hash);
        }
        info!(
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );

        let mut ranked: Vec<&AccountRecord> = snapshot.holders.iter().collect();
        ranked.sort_by(|a, b| b.total.cmp(&a.total));

        if !ranked.is_empty() && self.top > 0 {
            info!("");
            info!("TOP HOLDERS:");
            info!("{}", "-".repeat(80));
            for (i, record) in ranked.iter().take(self.top).enumerate() {
                Self::log_record(i + 1, record);
            }
        }

        if !snapshot.system_accounts.is_empty() {
            info!("");
            info!("SYSTEM ACCOUNTS (excluded):");
            info!("{}", "-".repeat(80));
            for (i, record) in snapshot.system_accounts.iter().enumerate() {
                Self::log_record(i + 1, record);
            }
        }

        info!("{}", "=".repeat(80));
        info!("SUMMARY");
        info!("{}", "-".repeat(80));
        info!("Holders: {}", snapshot.holder_count());
        info!("Farming positions: {}", snapshot.farming.len());
        info!("Total held: {}", snapshot.holders_total());
        if let Some(summary) = &snapshot.summary {
            info!("On-chain issuance: {}", summary.token_total_issuance);
        }
        if let Some(price) = &snapshot.price {
            info!("{}: {}", price.key(), price.value);
        }
        info!("{}", "=".repeat(80));

        Ok(())
    }
}
