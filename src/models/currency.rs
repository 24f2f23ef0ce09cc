use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurrencyIdError {
    #[error("currency id is not valid JSON: {0}")]
    Json(String),
    #[error("unsupported currency id shape: {0}")]
    Shape(String),
}

/// One argument of a currency variant: a token symbol or a numeric index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CurrencyArg {
    Symbol(String),
    Index(u128),
}

impl CurrencyArg {
    fn from_human(raw: &str) -> Self {
        let digits: String = raw.chars().filter(|c| *c != ',').collect();
        match digits.parse::<u128>() {
            Ok(index) if !digits.is_empty() => CurrencyArg::Index(index),
            _ => CurrencyArg::Symbol(raw.to_string()),
        }
    }

    fn to_human(&self) -> String {
        match self {
            CurrencyArg::Symbol(symbol) => symbol.clone(),
            CurrencyArg::Index(index) => index.to_string(),
        }
    }
}

/// On-chain currency identifier such as `VToken2(0)` or `LPToken(ASG, 9, ASG, 10)`.
///
/// The textual form is the human JSON rendering used in configuration and
/// reports: `{"VToken2":"0"}`, `{"LPToken":["ASG","9","ASG","10"]}`, or a
/// bare `"BNC"` for a variant without arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyId {
    variant: String,
    args: Vec<CurrencyArg>,
}

impl CurrencyId {
    pub fn new(variant: impl Into<String>, args: Vec<CurrencyArg>) -> Self {
        Self { variant: variant.into(), args }
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn args(&self) -> &[CurrencyArg] {
        &self.args
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match self.args.as_slice() {
            [] => JsonValue::String(self.variant.clone()),
            [single] => {
                let mut map = serde_json::Map::new();
                map.insert(self.variant.clone(), JsonValue::String(single.to_human()));
                JsonValue::Object(map)
            }
            many => {
                let mut map = serde_json::Map::new();
                let items = many.iter().map(|a| JsonValue::String(a.to_human())).collect();
                map.insert(self.variant.clone(), JsonValue::Array(items));
                JsonValue::Object(map)
            }
        };
        write!(f, "{}", rendered)
    }
}

impl FromStr for CurrencyId {
    type Err = CurrencyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let json: JsonValue =
            serde_json::from_str(s).map_err(|e| CurrencyIdError::Json(e.to_string()))?;

        match json {
            JsonValue::String(variant) => Ok(CurrencyId::new(variant, Vec::new())),
            JsonValue::Object(map) if map.len() == 1 => {
                let Some((variant, payload)) = map.into_iter().next() else {
                    return Err(CurrencyIdError::Shape(s.to_string()));
                };
                let args = match payload {
                    JsonValue::Array(items) => items
                        .iter()
                        .map(json_arg)
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|_| CurrencyIdError::Shape(s.to_string()))?,
                    JsonValue::Null => Vec::new(),
                    other => vec![json_arg(&other).map_err(|_| CurrencyIdError::Shape(s.to_string()))?],
                };
                Ok(CurrencyId::new(variant, args))
            }
            _ => Err(CurrencyIdError::Shape(s.to_string())),
        }
    }
}

fn json_arg(value: &JsonValue) -> Result<CurrencyArg, ()> {
    match value {
        JsonValue::String(raw) => Ok(CurrencyArg::from_human(raw)),
        JsonValue::Number(n) => n.as_u64().map(|n| CurrencyArg::Index(n as u128)).ok_or(()),
        _ => Err(()),
    }
}

impl TryFrom<String> for CurrencyId {
    type Error = CurrencyIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyId> for String {
    fn from(value: CurrencyId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r#"{"VToken2":"0"}"#)]
    #[case(r#"{"VSToken2":"0"}"#)]
    #[case(r#"{"BLP":"4"}"#)]
    #[case(r#"{"LPToken":["ASG","9","ASG","10"]}"#)]
    #[case(r#""BNC""#)]
    fn human_form_is_canonical(#[case] raw: &str) {
        let id: CurrencyId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn parses_lp_token_arguments() {
        let id: CurrencyId = r#"{"LPToken":["KUSD","8","ASG","9"]}"#.parse().unwrap();
        assert_eq!(id.variant(), "LPToken");
        assert_eq!(
            id.args(),
            &[
                CurrencyArg::Symbol("KUSD".into()),
                CurrencyArg::Index(8),
                CurrencyArg::Symbol("ASG".into()),
                CurrencyArg::Index(9),
            ]
        );
    }

    #[test]
    fn numeric_json_arguments_are_indices() {
        let a: CurrencyId = r#"{"VToken2":0}"#.parse().unwrap();
        let b: CurrencyId = r#"{"VToken2":"0"}"#.parse().unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    #[case("VToken2")]
    #[case(r#"{"A":"1","B":"2"}"#)]
    #[case("42")]
    fn rejects_other_shapes(#[case] raw: &str) {
        assert!(raw.parse::<CurrencyId>().is_err());
    }

    #[test]
    fn round_trips_through_serde() {
        let id: CurrencyId = r#"{"BLP":"0"}"#.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""{\"BLP\":\"0\"}""#);
        let back: CurrencyId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
