use anyhow::Context;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{info, warn};

use crate::config::PriceSource;
use crate::models::{Amount, GlobalPrice};
use crate::traits::ChainStateProvider;

/// Fractional digits of a reported price
pub const PRICE_DECIMALS: u32 = 12;

/// `numerator / denominator` rounded half-up to 12 fractional digits.
///
/// A zero denominator yields zero.
pub fn fixed_ratio(numerator: &Amount, denominator: &Amount) -> String {
    let scale = BigUint::from(10u32).pow(PRICE_DECIMALS);
    if denominator.is_zero() {
        return format_fixed(&BigUint::zero(), &scale);
    }

    let den = denominator.as_biguint();
    let scaled = numerator.as_biguint() * &scale;
    let mut quotient = &scaled / den;
    let remainder = &scaled % den;
    if remainder * 2u32 >= *den {
        quotient += 1u32;
    }

    format_fixed(&quotient, &scale)
}

fn format_fixed(value: &BigUint, scale: &BigUint) -> String {
    let int_part = value / scale;
    let frac_part = value % scale;
    format!(
        "{}.{:0>width$}",
        int_part,
        frac_part.to_string(),
        width = PRICE_DECIMALS as usize
    )
}

/// Reserve amount over derivative issuance at the snapshot block
pub async fn compute_global_price(
    provider: &dyn ChainStateProvider,
    source: &PriceSource,
) -> anyhow::Result<GlobalPrice> {
    let reserve = provider
        .token_pool(&source.reserve_currency)
        .await
        .with_context(|| format!("reserve pool of {}", source.reserve_currency))?;
    let issuance = provider
        .total_issuance(&source.derivative_currency)
        .await
        .with_context(|| format!("total issuance of {}", source.derivative_currency))?;

    if issuance.is_zero() {
        warn!("{} has zero total issuance, reporting a zero price", source.derivative_currency);
    }

    let value = fixed_ratio(&reserve, &issuance);
    info!("{}_price = {} ({} / {})", source.name, value, reserve, issuance);

    Ok(GlobalPrice { name: source.name.clone(), value })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(3, 2, "1.500000000000")]
    #[case(1, 3, "0.333333333333")]
    #[case(2, 3, "0.666666666667")]
    #[case(0, 5, "0.000000000000")]
    #[case(5, 0, "0.000000000000")]
    #[case(1, 2_000_000_000_000, "0.000000000001")]
    #[case(1, 4_000_000_000_000, "0.000000000000")]
    #[case(123_456_789, 100_000_000, "1.234567890000")]
    fn rounds_half_up_to_twelve_digits(
        #[case] numerator: u64,
        #[case] denominator: u64,
        #[case] expected: &str,
    ) {
        assert_eq!(fixed_ratio(&Amount::from(numerator), &Amount::from(denominator)), expected);
    }
}
