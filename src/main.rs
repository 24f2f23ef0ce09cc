use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;

use holder_snapshot::utils::parse_requested_height;
use holder_snapshot::{
    BlockResolver, ChainStateProvider, CompositeHandler, ConfigOverrides, ConsoleHandler,
    JsonFileHandler, JsonStateProvider, Snapshot, SnapshotBuilder, SnapshotConfig,
    SnapshotHandler, SubstrateChain,
};

/// Snapshot derivative-token holders, including LP and farming positions
#[derive(Parser, Debug)]
#[command(name = "holder-snapshot", version)]
struct Args {
    /// Block height to snapshot; omitted, 0 or non-numeric means the current head
    block: Option<String>,

    /// Primary report path (defaults to the preset's location)
    output: Option<PathBuf>,
}

async fn build(
    config: &SnapshotConfig,
    provider: &dyn ChainStateProvider,
) -> anyhow::Result<Snapshot> {
    SnapshotBuilder::new(config, provider).build().await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let requested = parse_requested_height(args.block.as_deref());
    if let Some(height) = requested {
        info!("fetching holders for block {}", height);
    }

    let config = ConfigOverrides::from_env()
        .resolve()
        .context("loading configuration")?;

    let snapshot = match std::env::var("SNAPSHOT_STATE_DUMP").ok() {
        Some(path) => {
            let provider = JsonStateProvider::from_path(Path::new(&path))?;
            provider
                .resolve_block(requested)
                .await
                .context("resolving block")?;
            build(&config, &provider).await?
        }
        None => {
            let chain = SubstrateChain::connect(&config.rpc_url, config.ss58_prefix)
                .await
                .with_context(|| format!("connecting to {}", config.rpc_url))?;
            let provider = chain.open(requested).await.context("resolving block")?;
            build(&config, &provider).await?
        }
    };

    let files = Arc::new(JsonFileHandler::new(&config, args.output));
    let report = files.primary_path().to_path_buf();

    let mut handlers = CompositeHandler::new();
    handlers.add_handler(Arc::new(ConsoleHandler::default()));
    handlers.add_handler(files);
    handlers
        .handle_snapshot(&snapshot)
        .await
        .context("writing reports")?;

    info!("Snapshot at #{} written to {}", snapshot.block.number, report.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let level = std::env::var("SNAPSHOT_LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    let args = Args::parse();

    tokio::runtime::Runtime::new()?.block_on(run(args))
}
