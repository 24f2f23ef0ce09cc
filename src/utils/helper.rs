use tracing::warn;

/// Interpret the block-height argument.
///
/// Only a positive integer selects a historical block. Anything else,
/// including `0`, falls back to the chain head with a warning.
pub fn parse_requested_height(arg: Option<&str>) -> Option<u64> {
    let raw = arg?.trim();
    match raw.parse::<u64>() {
        Ok(height) if height > 0 => Some(height),
        _ => {
            warn!(
                "invalid block height {:?}, falling back to the current head (e.g. `holder-snapshot 4700000`)",
                raw
            );
            None
        }
    }
}

/// Format an address for display (truncated)
pub fn format_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= 12 {
        return account.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("4700000"), Some(4_700_000))]
    #[case(Some(" 12 "), Some(12))]
    #[case(Some("0"), None)]
    #[case(Some("-3"), None)]
    #[case(Some("latest"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn parses_block_height(#[case] arg: Option<&str>, #[case] expected: Option<u64>) {
        assert_eq!(parse_requested_height(arg), expected);
    }

    #[test]
    fn truncates_long_accounts() {
        assert_eq!(
            format_account("eCSrvaystgdffuJxPVRct68qJUZs1sFz762d7d37KJvb7Pz"),
            "eCSrva...Jvb7Pz"
        );
        assert_eq!(format_account("short"), "short");
    }
}
