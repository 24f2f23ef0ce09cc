//! Built-in configurations for the Bifrost derivative tokens

use std::path::PathBuf;

use super::{
    ConfigError, PriceSource, SnapshotConfig, TrackedPool, TrackedToken, BIFROST_SS58_PREFIX,
    DEFAULT_RPC_URL,
};
use crate::models::currency::{CurrencyArg, CurrencyId};

fn index(variant: &str, id: u128) -> CurrencyId {
    CurrencyId::new(variant, vec![CurrencyArg::Index(id)])
}

fn lp_token(sym_a: &str, id_a: u128, sym_b: &str, id_b: u128) -> CurrencyId {
    CurrencyId::new(
        "LPToken",
        vec![
            CurrencyArg::Symbol(sym_a.to_string()),
            CurrencyArg::Index(id_a),
            CurrencyArg::Symbol(sym_b.to_string()),
            CurrencyArg::Index(id_b),
        ],
    )
}

fn token(currency: CurrencyId, custodian: &str, field: &str) -> TrackedToken {
    TrackedToken {
        currency,
        custodian: custodian.to_string(),
        field: field.to_string(),
    }
}

/// Look up a preset by name
pub fn preset(name: &str) -> Result<SnapshotConfig, ConfigError> {
    match name {
        "vdot" => Ok(vdot()),
        "vsdot" => Ok(vsdot()),
        other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
}

/// vDOT holders across the DOT/vDOT, vDOT/kUSD and vDOT/vsDOT pairs and the stable pool
pub fn vdot() -> SnapshotConfig {
    SnapshotConfig {
        name: "vdot".to_string(),
        rpc_url: DEFAULT_RPC_URL.to_string(),
        ss58_prefix: BIFROST_SS58_PREFIX,
        base_currency: index("VToken2", 0),
        tokens: vec![
            token(
                lp_token("ASG", 8, "ASG", 9),
                "eCSrvaystgdffuJxPVRct68qJUZs1sFz762d7d37KJvb7Pz",
                "lp_dot_vdot",
            ),
            token(
                lp_token("KUSD", 8, "ASG", 9),
                "eCSrvaystgdffuJxPVSiQp5vXbGHHEbgQQQUaVb2ychB9Vz",
                "lp_vdot_kusd",
            ),
            token(
                lp_token("ASG", 9, "ASG", 10),
                "eCSrvaystgdffuJxPVS4SfFvaM26m6tAxwDLPvawBAYbnJd",
                "lp_vdot_vsdot",
            ),
            token(
                index("BLP", 0),
                "eCSrvbA5gGNQr7UjcSJz4jSTTD7Ne167hEVNeZFmiXpQJP7",
                "blp_dot_vdot",
            ),
        ],
        pools: Vec::new(),
        price: Some(PriceSource {
            name: "vdot".to_string(),
            reserve_currency: index("Token2", 0),
            derivative_currency: index("VToken2", 0),
        }),
        default_output: PathBuf::from("data/vdot-holders.json"),
        data_dir: PathBuf::from("data"),
        summary: false,
        raw_holdings: false,
    }
}

/// vsDOT holders across the vDOT/vsDOT pair, its stable pool and their farming pools
pub fn vsdot() -> SnapshotConfig {
    SnapshotConfig {
        name: "vsdot".to_string(),
        rpc_url: DEFAULT_RPC_URL.to_string(),
        ss58_prefix: BIFROST_SS58_PREFIX,
        base_currency: index("VSToken2", 0),
        tokens: vec![
            token(
                lp_token("ASG", 9, "ASG", 10),
                "eCSrvaystgdffuJxPVS4SfFvaM26m6tAxwDLPvawBAYbnJd",
                "lp_vdot_vsdot",
            ),
            token(
                index("BLP", 4),
                "eCSrvbA5gGNQr7UjcTPxAunuRuuCrQb4NzXaRJbd22jUr4G",
                "blp_vdot_vsdot",
            ),
        ],
        pools: vec![
            TrackedPool {
                pool_id: 4,
                field: "pool4".to_string(),
                source_field: "lp_vdot_vsdot".to_string(),
                custodian: "eCSrvbA5gGLejANY2YTH6rTd7JxtybT57MyGfGdfqbBPVdZ".to_string(),
            },
            TrackedPool {
                pool_id: 11,
                field: "pool11".to_string(),
                source_field: "blp_vdot_vsdot".to_string(),
                custodian: "eCSrvbA5gGLejANY2aMUHfaQa3M6rJaDowY8G5UuciHGq1h".to_string(),
            },
        ],
        price: None,
        default_output: PathBuf::from("../snapshots/vsdot-holders.json"),
        data_dir: PathBuf::from("data"),
        summary: true,
        raw_holdings: false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("vdot")]
    #[case("vsdot")]
    fn presets_are_valid(#[case] name: &str) {
        let config = preset(name).unwrap();
        assert_eq!(config.name, name);
        config.validate().unwrap();
    }

    #[test]
    fn preset_currencies_match_human_form() {
        let config = vsdot();
        assert_eq!(config.base_currency.to_string(), r#"{"VSToken2":"0"}"#);
        assert_eq!(
            config.tokens[0].currency.to_string(),
            r#"{"LPToken":["ASG","9","ASG","10"]}"#
        );
        assert_eq!(config.tokens[1].currency.to_string(), r#"{"BLP":"4"}"#);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert_eq!(
            preset("ksm").unwrap_err(),
            ConfigError::UnknownPreset("ksm".to_string())
        );
    }
}
