use std::path::PathBuf;

use holder_snapshot::config::presets;
use holder_snapshot::models::Amount;
use holder_snapshot::{
    JsonFileHandler, JsonStateProvider, Snapshot, SnapshotBuilder, SnapshotConfig,
    SnapshotError, SnapshotHandler,
};
use serde_json::{json, Value};

const LP_CUSTODIAN: &str = "eCSrvaystgdffuJxPVS4SfFvaM26m6tAxwDLPvawBAYbnJd";
const BLP_CUSTODIAN: &str = "eCSrvbA5gGNQr7UjcTPxAunuRuuCrQb4NzXaRJbd22jUr4G";
const POOL4_KEEPER: &str = "eCSrvbA5gGLejANY2YTH6rTd7JxtybT57MyGfGdfqbBPVdZ";
const POOL11_KEEPER: &str = "eCSrvbA5gGLejANY2aMUHfaQa3M6rJaDowY8G5UuciHGq1h";

const VSDOT: &str = r#"{"VSToken2":"0"}"#;
const LP: &str = r#"{"LPToken":["ASG","9","ASG","10"]}"#;
const BLP: &str = r#"{"BLP":"4"}"#;

fn vsdot_dump() -> Value {
    json!({
        "block_height": 4_700_000,
        "head": 4_700_321,
        "token_accounts": [
            {"account": "A", "currency": VSDOT, "free": "100", "reserved": "3", "frozen": "1"},
            {"account": "A", "currency": LP, "free": "10"},
            {"account": "A", "currency": "{\"Token2\":\"0\"}", "free": "999"},
            {"account": LP_CUSTODIAN, "currency": VSDOT, "free": "50"},
            {"account": BLP_CUSTODIAN, "currency": VSDOT, "free": "0"},
            {"account": BLP_CUSTODIAN, "currency": BLP, "free": "77"},
            {"account": POOL4_KEEPER, "currency": LP, "free": "4,000"}
        ],
        "total_issuance": [
            {"currency": VSDOT, "amount": "1,000,000"},
            {"currency": LP, "amount": "200"},
            {"currency": BLP, "amount": "0"}
        ],
        "farming_pools": [
            {"pool_id": 4, "keeper": POOL4_KEEPER, "total_shares": "500"},
            {"pool_id": 11, "keeper": POOL11_KEEPER, "total_shares": "0"}
        ],
        "farming_shares": [
            {"pool_id": 4, "account": "B", "share": "50"},
            {"pool_id": 11, "account": "C", "share": "30"},
            {"pool_id": 7, "account": "A", "share": "1,000"}
        ]
    })
}

fn provider(dump: &Value) -> JsonStateProvider {
    JsonStateProvider::from_json_str(&dump.to_string()).unwrap()
}

fn config_in(dir: &std::path::Path, base: SnapshotConfig) -> SnapshotConfig {
    SnapshotConfig {
        data_dir: dir.join("data"),
        default_output: dir.join("snapshots").join("holders.json"),
        ..base
    }
}

async fn build(config: &SnapshotConfig, dump: &Value) -> Snapshot {
    let provider = provider(dump);
    SnapshotBuilder::new(config, &provider).build().await.unwrap()
}

fn holder<'a>(snapshot: &'a Snapshot, account: &str) -> &'a holder_snapshot::AccountRecord {
    snapshot
        .holders
        .iter()
        .find(|r| r.account == account)
        .unwrap_or_else(|| panic!("{} missing", account))
}

#[tokio::test]
async fn converts_lp_and_farming_positions() {
    let config = presets::vsdot();
    let snapshot = build(&config, &vsdot_dump()).await;

    let a = holder(&snapshot, "A");
    assert_eq!(a.free, Amount::from(100u64));
    assert_eq!(a.reserved, Amount::from(3u64));
    assert_eq!(a.holding("lp_vdot_vsdot"), Some(&Amount::from(2u64)));
    assert_eq!(a.total, Amount::from(102u64));

    let b = holder(&snapshot, "B");
    assert_eq!(b.holding("pool4"), Some(&Amount::from(100u64)));
    assert_eq!(b.total, Amount::from(100u64));

    // zero total shares in pool 11
    let c = holder(&snapshot, "C");
    assert_eq!(c.holding("pool11"), Some(&Amount::zero()));
    assert_eq!(c.total, Amount::zero());

    let order: Vec<_> = snapshot.holders.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(order, ["A", "B", "C"]);
}

#[tokio::test]
async fn partitions_system_accounts() {
    let config = presets::vsdot();
    let snapshot = build(&config, &vsdot_dump()).await;

    let system: Vec<_> = snapshot.system_accounts.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(system, [LP_CUSTODIAN, BLP_CUSTODIAN, POOL4_KEEPER]);

    for custodian in config.custodians() {
        assert!(snapshot.holders.iter().all(|r| r.account != custodian));
    }

    let keeper = &snapshot.system_accounts[2];
    assert_eq!(keeper.holding("lp_vdot_vsdot"), Some(&Amount::from(1000u64)));
    assert_eq!(keeper.total, Amount::from(1000u64));

    // zero issuance means a zero ratio, not an error
    let blp = &snapshot.system_accounts[1];
    assert_eq!(blp.holding("blp_vdot_vsdot"), Some(&Amount::zero()));
}

#[tokio::test]
async fn summary_counts_only_holders() {
    let config = presets::vsdot();
    let snapshot = build(&config, &vsdot_dump()).await;

    let summary = snapshot.summary.as_ref().unwrap();
    assert_eq!(summary.block_height, 4_700_000);
    assert_eq!(summary.token_total_issuance, Amount::from(1_000_000u64));
    assert_eq!(summary.total_token, Amount::from(202u64));
    assert_eq!(summary.total_token, snapshot.holders_total());
}

#[tokio::test]
async fn farming_detail_lists_matched_entries() {
    let config = presets::vsdot();
    let snapshot = build(&config, &vsdot_dump()).await;

    let keys: Vec<_> = snapshot.farming.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, ["B-4", "C-11"]);
    assert_eq!(snapshot.farming[1].share, Amount::from(30u64));
}

#[tokio::test]
async fn totals_match_recomputation() {
    let config = presets::vsdot();
    let snapshot = build(&config, &vsdot_dump()).await;

    for record in snapshot.holders.iter().chain(&snapshot.system_accounts) {
        let derived: Amount = record.holdings().map(|(_, a)| a).sum();
        assert_eq!(record.total, derived + &record.free, "{}", record.account);
    }
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let config = presets::vsdot();
    let dump = vsdot_dump();

    let first = build(&config, &dump).await;
    let second = build(&config, &dump).await;

    assert_eq!(
        serde_json::to_string(&first.primary_rows()).unwrap(),
        serde_json::to_string(&second.primary_rows()).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.system_accounts).unwrap(),
        serde_json::to_string(&second.system_accounts).unwrap()
    );
}

#[tokio::test]
async fn unknown_pool_aborts() {
    let config = presets::vsdot();
    let mut dump = vsdot_dump();
    dump["farming_pools"] = json!([{"pool_id": 4, "keeper": POOL4_KEEPER, "total_shares": "500"}]);

    let provider = provider(&dump);
    let err = SnapshotBuilder::new(&config, &provider).build().await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SnapshotError>(),
        Some(SnapshotError::UnknownPool(11))
    ));
}

#[tokio::test]
async fn malformed_share_aborts_with_context() {
    let config = presets::vsdot();
    let mut dump = vsdot_dump();
    dump["farming_shares"][0]["share"] = json!("5O");

    let provider = provider(&dump);
    let err = SnapshotBuilder::new(&config, &provider).build().await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("fetching farming shares"), "{}", message);
    assert!(message.contains("\"5O\""), "{}", message);
    assert!(message.contains("account B"), "{}", message);
}

#[tokio::test]
async fn vdot_preset_reports_price_without_summary() {
    let config = presets::vdot();
    let dump = json!({
        "block_height": 10,
        "token_accounts": [
            {"account": "A", "currency": "{\"VToken2\":\"0\"}", "free": "100"},
            {"account": "A", "currency": "{\"BLP\":\"0\"}", "free": "10"},
            {"account": "eCSrvbA5gGNQr7UjcSJz4jSTTD7Ne167hEVNeZFmiXpQJP7", "currency": "{\"VToken2\":\"0\"}", "free": "50"}
        ],
        "total_issuance": [
            {"currency": "{\"VToken2\":\"0\"}", "amount": "1,000"},
            {"currency": "{\"BLP\":\"0\"}", "amount": "200"}
        ],
        "token_pools": [{"currency": "{\"Token2\":\"0\"}", "amount": "1,500"}]
    });

    let snapshot = build(&config, &dump).await;

    assert!(snapshot.summary.is_none());
    assert!(snapshot.farming.is_empty());
    let price = snapshot.price.as_ref().unwrap();
    assert_eq!(price.key(), "vdot_price");
    assert_eq!(price.value, "1.500000000000");

    let a = holder(&snapshot, "A");
    assert_eq!(a.holding("blp_dot_vdot"), Some(&Amount::from(2u64)));
    assert_eq!(a.total, Amount::from(102u64));
}

#[tokio::test]
async fn writes_every_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = SnapshotConfig {
        raw_holdings: true,
        ..config_in(dir.path(), presets::vsdot())
    };
    let snapshot = build(&config, &vsdot_dump()).await;

    let handler = JsonFileHandler::new(&config, None);
    handler.handle_snapshot(&snapshot).await.unwrap();

    let read = |path: PathBuf| -> Value {
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap()
    };

    let primary = read(config.default_output.clone());
    let rows = primary.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        json!({"block_height": 4_700_000, "token_total_issuance": "1000000", "total_token": "202"})
    );
    assert_eq!(
        rows[1],
        json!({
            "account": "A",
            "free": "100",
            "reserved": "3",
            "frozen": "1",
            "lp_vdot_vsdot": "2",
            "blp_vdot_vsdot": "0",
            "pool4": "0",
            "pool11": "0",
            "total_token": "102"
        })
    );

    let farming = read(config.farming_path());
    assert_eq!(
        farming[0],
        json!({"key": "B-4", "account": "B", "pool_id": "4", "share": "50"})
    );

    let system = read(config.system_accounts_path());
    assert_eq!(system.as_array().unwrap().len(), 3);

    let raw = read(config.raw_holdings_path());
    assert_eq!(raw.as_array().unwrap().len(), 7);
    assert_eq!(raw[1]["key"], json!(format!("A-{}", LP)));
}

#[tokio::test]
async fn primary_path_can_be_overridden() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), presets::vdot());
    let dump = json!({"block_height": 1});
    let snapshot = build(&config, &dump).await;

    let target = dir.path().join("custom").join("out.json");
    let handler = JsonFileHandler::new(&config, Some(target.clone()));
    handler.handle_snapshot(&snapshot).await.unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap().trim(), "[]");
    let price: Value =
        serde_json::from_slice(&std::fs::read(config.data_dir.join("vdot-price.json")).unwrap())
            .unwrap();
    assert_eq!(price, json!({"vdot_price": "0.000000000000"}));
}
