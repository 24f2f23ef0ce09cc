use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::config::SnapshotConfig;
use crate::models::snapshot::Snapshot;
use crate::traits::snapshot_handler::SnapshotHandler;

/// Writes the snapshot reports as pretty-printed JSON files
pub struct JsonFileHandler {
    data_dir: PathBuf,
    primary: PathBuf,
    farming: PathBuf,
    system_accounts: PathBuf,
    raw_holdings: PathBuf,
    price: Option<PathBuf>,
}

impl JsonFileHandler {
    /// Create a handler writing to the configured locations.
    ///
    /// `primary` overrides the configured primary report path.
    pub fn new(config: &SnapshotConfig, primary: Option<PathBuf>) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            primary: primary.unwrap_or_else(|| config.default_output.clone()),
            farming: config.farming_path(),
            system_accounts: config.system_accounts_path(),
            raw_holdings: config.raw_holdings_path(),
            price: config.price.as_ref().map(|p| config.price_path(p)),
        }
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        info!("writing {}", path.display());
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))
    }
}

#[async_trait]
impl SnapshotHandler for JsonFileHandler {
    async fn handle_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("creating {}", self.data_dir.display()))?;

        Self::write_json(&self.farming, &snapshot.farming).await?;
        Self::write_json(&self.system_accounts, &snapshot.system_accounts).await?;

        if let Some(raw) = &snapshot.raw_holdings {
            Self::write_json(&self.raw_holdings, raw).await?;
        }

        if let (Some(path), Some(price)) = (&self.price, &snapshot.price) {
            let mut report = serde_json::Map::new();
            report.insert(price.key(), serde_json::Value::String(price.value.clone()));
            Self::write_json(path, &report).await?;
        }

        Self::write_json(&self.primary, &snapshot.primary_rows()).await
    }
}
