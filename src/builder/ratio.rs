use std::fmt;

use anyhow::Context;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::{debug, info, warn};

use crate::config::{SnapshotConfig, TrackedPool, TrackedToken};
use crate::error::SnapshotError;
use crate::models::{Amount, HoldingsLedger};
use crate::traits::ChainStateProvider;

/// Exact rational multiplier turning token or share units into base-token units.
///
/// Kept as numerator/denominator so rounding only happens once, when a
/// holder's balance is multiplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerShareRatio {
    numerator: BigUint,
    denominator: BigUint,
}

impl PerShareRatio {
    /// `numerator / denominator`, or zero when the denominator is zero
    pub fn new(numerator: &Amount, denominator: &Amount) -> Self {
        if denominator.is_zero() {
            return Self::zero();
        }
        Self {
            numerator: numerator.as_biguint().clone(),
            denominator: denominator.as_biguint().clone(),
        }
    }

    pub fn zero() -> Self {
        Self { numerator: BigUint::zero(), denominator: BigUint::one() }
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// `floor(ratio * units)`
    pub fn apply(&self, units: &Amount) -> Amount {
        Amount::from(&self.numerator * units.as_biguint() / &self.denominator)
    }
}

impl fmt::Display for PerShareRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A tracked token together with its ratio at the snapshot block
#[derive(Debug, Clone)]
pub struct TokenRatio {
    pub token: TrackedToken,
    pub ratio: PerShareRatio,
}

/// A tracked farming pool together with its keeper and ratio at the snapshot block
#[derive(Debug, Clone)]
pub struct PoolRatio {
    pub pool: TrackedPool,
    pub keeper: String,
    pub ratio: PerShareRatio,
}

/// Ratio of custodian base-token balance to LP issuance, one token at a time
pub async fn compute_token_ratios(
    provider: &dyn ChainStateProvider,
    config: &SnapshotConfig,
) -> anyhow::Result<Vec<TokenRatio>> {
    let mut ratios = Vec::with_capacity(config.tokens.len());

    for token in &config.tokens {
        let held = provider
            .free_balance(&token.custodian, &config.base_currency)
            .await
            .with_context(|| format!("custodian balance for {}", token.field))?;
        let issuance = provider
            .total_issuance(&token.currency)
            .await
            .with_context(|| format!("total issuance of {}", token.currency))?;

        if issuance.is_zero() {
            warn!("{} has zero total issuance, using a zero ratio", token.currency);
        }
        let ratio = PerShareRatio::new(&held, &issuance);
        info!("{}: custodian holds {} over issuance {} ({})", token.field, held, issuance, ratio);

        ratios.push(TokenRatio { token: token.clone(), ratio });
    }

    Ok(ratios)
}

/// Ratio of each pool keeper's derived holding to the pool's total shares.
///
/// Needs the balance scan to have run, since the keeper's holding is read
/// from `ledger`.
pub async fn compute_pool_ratios(
    provider: &dyn ChainStateProvider,
    pools: &[TrackedPool],
    ledger: &HoldingsLedger,
) -> anyhow::Result<Vec<PoolRatio>> {
    let mut ratios = Vec::with_capacity(pools.len());

    for pool in pools {
        let info = provider
            .farming_pool_info(pool.pool_id)
            .await
            .with_context(|| format!("pool info for pool {}", pool.pool_id))?
            .ok_or(SnapshotError::UnknownPool(pool.pool_id))?;

        let backing = match ledger.get(&info.keeper).and_then(|r| r.field(&pool.source_field)) {
            Some(amount) => amount.clone(),
            None => {
                warn!(
                    "keeper {} of pool {} has no {} balance, using a zero ratio",
                    info.keeper, pool.pool_id, pool.source_field
                );
                Amount::zero()
            }
        };

        if info.total_shares.is_zero() {
            warn!("pool {} has zero total shares, using a zero ratio", pool.pool_id);
        }
        let ratio = PerShareRatio::new(&backing, &info.total_shares);
        debug!("pool {} keeper {}", pool.pool_id, info.keeper);
        info!(
            "{}: keeper holds {} {} over {} shares ({})",
            pool.field, backing, pool.source_field, info.total_shares, ratio
        );

        ratios.push(PoolRatio { pool: pool.clone(), keeper: info.keeper, ratio });
    }

    Ok(ratios)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn amount(n: u64) -> Amount {
        Amount::from(n)
    }

    #[rstest]
    #[case(50, 200, 10, 2)]
    #[case(1000, 500, 50, 100)]
    #[case(1, 3, 2, 0)]
    #[case(2, 3, 3, 2)]
    #[case(7, 7, 123, 123)]
    fn applies_floor_of_exact_ratio(
        #[case] numerator: u64,
        #[case] denominator: u64,
        #[case] units: u64,
        #[case] expected: u64,
    ) {
        let ratio = PerShareRatio::new(&amount(numerator), &amount(denominator));
        assert_eq!(ratio.apply(&amount(units)), amount(expected));
    }

    #[test]
    fn zero_denominator_is_zero_ratio() {
        let ratio = PerShareRatio::new(&amount(50), &Amount::zero());
        assert!(ratio.is_zero());
        assert_eq!(ratio, PerShareRatio::zero());
        assert_eq!(ratio.apply(&amount(1_000_000)), Amount::zero());
    }

    #[test]
    fn exact_ratio_avoids_intermediate_rounding() {
        // 1/3 * 3 must be 1, not 0.999... floored to 0
        let ratio = PerShareRatio::new(&amount(1), &amount(3));
        assert_eq!(ratio.apply(&amount(3)), amount(1));
    }

    #[test]
    fn large_values_do_not_overflow() {
        let big = Amount::from(u128::MAX);
        let ratio = PerShareRatio::new(&big, &amount(2));
        assert_eq!(ratio.apply(&amount(2)), big);
    }
}
