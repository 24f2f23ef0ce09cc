use async_trait::async_trait;
use subxt::backend::legacy::rpc_methods::BlockNumber;
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::backend::rpc::RpcClient;
use subxt::dynamic::{self, Value};
use subxt::ext::scale_value::{Composite, Primitive, ValueDef};
use subxt::utils::H256;
use subxt::{OnlineClient, PolkadotConfig};
use tracing::{debug, info};

use crate::error::SnapshotError;
use crate::models::{
    Amount, CurrencyArg, CurrencyId, FarmingPoolInfo, FarmingShareEntry, ResolvedBlock,
    TokenAccountEntry,
};
use crate::traits::ChainStateProvider;
use crate::utils::ss58;

type ChainStorage = subxt::storage::Storage<PolkadotConfig, OnlineClient<PolkadotConfig>>;
type ScaleValue<T> = subxt::ext::scale_value::Value<T>;

/// Connection to a Substrate node, opened once per run
pub struct SubstrateChain {
    api: OnlineClient<PolkadotConfig>,
    rpc: LegacyRpcMethods<PolkadotConfig>,
    ss58_prefix: u16,
}

impl SubstrateChain {
    /// Connect to the node at `url`
    pub async fn connect(url: &str, ss58_prefix: u16) -> anyhow::Result<Self> {
        info!("Connecting to {}", url);
        let rpc_client = RpcClient::from_url(url).await?;
        let rpc = LegacyRpcMethods::<PolkadotConfig>::new(rpc_client.clone());
        let api = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client).await?;
        Ok(Self { api, rpc, ss58_prefix })
    }

    async fn head_number(&self) -> anyhow::Result<u64> {
        let header = self
            .rpc
            .chain_get_header(None)
            .await?
            .ok_or_else(|| SnapshotError::unexpected("chain head", "node returned no header"))?;
        Ok(u64::from(header.number))
    }

    /// State reader pinned to `block`
    pub fn state_at(&self, block: ResolvedBlock, hash: H256) -> SubstrateStateProvider {
        SubstrateStateProvider {
            storage: self.api.storage().at(hash),
            block,
            ss58_prefix: self.ss58_prefix,
        }
    }

    /// Resolve `requested` (or the head) and return a state reader for it
    pub async fn open(&self, requested: Option<u64>) -> anyhow::Result<SubstrateStateProvider> {
        let (block, hash) = self.resolve(requested).await?;
        Ok(self.state_at(block, hash))
    }

    async fn resolve(&self, requested: Option<u64>) -> anyhow::Result<(ResolvedBlock, H256)> {
        let head = self.head_number().await?;
        let number = requested.unwrap_or(head);

        let hash = self
            .rpc
            .chain_get_block_hash(Some(BlockNumber::from(number)))
            .await?
            .ok_or(SnapshotError::BlockNotFound { height: number, head })?;

        info!("connected, head at #{}, fetching token holders at #{}", head, number);
        let block = ResolvedBlock { number, head, hash: Some(format!("{:?}", hash)) };
        Ok((block, hash))
    }
}

/// Dynamic storage reads at one block
pub struct SubstrateStateProvider {
    storage: ChainStorage,
    block: ResolvedBlock,
    ss58_prefix: u16,
}

impl SubstrateStateProvider {
    fn account_value(&self, account: &str) -> anyhow::Result<Value> {
        let (_, bytes) = ss58::decode(account)?;
        Ok(Value::from_bytes(bytes))
    }

    fn account_string<T>(&self, value: &ScaleValue<T>) -> anyhow::Result<String> {
        let mut bytes = Vec::with_capacity(32);
        collect_bytes(value, &mut bytes);
        let account: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| {
                SnapshotError::unexpected("account id", format!("{} bytes", b.len()))
            })?;
        Ok(ss58::encode(&account, self.ss58_prefix)?)
    }

    async fn fetch_u128(
        &self,
        pallet: &'static str,
        entry: &'static str,
        keys: Vec<Value>,
    ) -> anyhow::Result<Amount> {
        let address = dynamic::storage(pallet, entry, keys);
        let value = self.storage.fetch_or_default(&address).await?.to_value()?;
        Ok(Amount::from(as_u128(&value, entry)?))
    }
}

#[async_trait]
impl ChainStateProvider for SubstrateStateProvider {
    fn block(&self) -> &ResolvedBlock {
        &self.block
    }

    async fn free_balance(&self, account: &str, currency: &CurrencyId) -> anyhow::Result<Amount> {
        let keys = vec![self.account_value(account)?, currency_to_value(currency)];
        let address = dynamic::storage("Tokens", "Accounts", keys);
        let value = self.storage.fetch_or_default(&address).await?.to_value()?;
        amount_field(&value, "free")
    }

    async fn total_issuance(&self, currency: &CurrencyId) -> anyhow::Result<Amount> {
        self.fetch_u128("Tokens", "TotalIssuance", vec![currency_to_value(currency)])
            .await
    }

    async fn token_pool(&self, currency: &CurrencyId) -> anyhow::Result<Amount> {
        self.fetch_u128("VtokenMinting", "TokenPool", vec![currency_to_value(currency)])
            .await
    }

    async fn token_accounts(&self) -> anyhow::Result<Vec<TokenAccountEntry>> {
        let address = dynamic::storage("Tokens", "Accounts", Vec::<Value>::new());
        let mut stream = self.storage.iter(address).await?;
        let mut entries = Vec::new();

        while let Some(pair) = stream.next().await {
            let pair = pair?;
            let [account, currency] = pair.keys.as_slice() else {
                return Err(SnapshotError::unexpected(
                    "Tokens.Accounts key",
                    format!("{} key parts", pair.keys.len()),
                )
                .into());
            };
            let value = pair.value.to_value()?;

            entries.push(TokenAccountEntry {
                account: self.account_string(account)?,
                currency: currency_from_value(currency)?,
                free: amount_field(&value, "free")?,
                reserved: amount_field(&value, "reserved")?,
                frozen: amount_field(&value, "frozen")?,
            });

            if entries.len() % 10_000 == 0 {
                debug!("{} token account entries so far", entries.len());
            }
        }

        Ok(entries)
    }

    async fn farming_pool_info(&self, pool_id: u32) -> anyhow::Result<Option<FarmingPoolInfo>> {
        let address = dynamic::storage("Farming", "PoolInfos", vec![Value::u128(pool_id as u128)]);
        let Some(thunk) = self.storage.fetch(&address).await? else {
            return Ok(None);
        };
        let value = thunk.to_value()?;

        let keeper = named_field(&value, "keeper")
            .ok_or_else(|| SnapshotError::unexpected("PoolInfo", "no keeper field"))?;
        Ok(Some(FarmingPoolInfo {
            pool_id,
            keeper: self.account_string(keeper)?,
            total_shares: amount_field(&value, "total_shares")?,
        }))
    }

    async fn farming_shares(&self) -> anyhow::Result<Vec<FarmingShareEntry>> {
        let address = dynamic::storage("Farming", "SharesAndWithdrawnRewards", Vec::<Value>::new());
        let mut stream = self.storage.iter(address).await?;
        let mut entries = Vec::new();

        while let Some(pair) = stream.next().await {
            let pair = pair?;
            let [pool, account] = pair.keys.as_slice() else {
                return Err(SnapshotError::unexpected(
                    "Farming.SharesAndWithdrawnRewards key",
                    format!("{} key parts", pair.keys.len()),
                )
                .into());
            };
            let value = pair.value.to_value()?;
            let pool_id = u32::try_from(as_u128(pool, "pool id")?)
                .map_err(|e| SnapshotError::unexpected("pool id", e.to_string()))?;

            entries.push(FarmingShareEntry {
                pool_id,
                account: self.account_string(account)?,
                share: amount_field(&value, "share")?,
            });
        }

        Ok(entries)
    }
}

/// Encode a currency id as the runtime's `CurrencyId` enum
pub fn currency_to_value(currency: &CurrencyId) -> Value {
    let args = currency.args().iter().map(|arg| match arg {
        CurrencyArg::Symbol(symbol) => Value::unnamed_variant(symbol.clone(), Vec::<Value>::new()),
        CurrencyArg::Index(index) => Value::u128(*index),
    });
    Value::unnamed_variant(currency.variant().to_string(), args)
}

/// Decode a runtime `CurrencyId` enum value
pub fn currency_from_value<T>(value: &ScaleValue<T>) -> Result<CurrencyId, SnapshotError> {
    let ValueDef::Variant(variant) = &value.value else {
        return Err(SnapshotError::unexpected("currency id", "not an enum variant"));
    };

    let mut args = Vec::new();
    for arg in variant.values.values() {
        let parsed = match &arg.value {
            ValueDef::Variant(symbol) => CurrencyArg::Symbol(symbol.name.clone()),
            ValueDef::Primitive(Primitive::U128(index)) => CurrencyArg::Index(*index),
            _ => {
                return Err(SnapshotError::unexpected(
                    "currency id",
                    format!("unsupported argument in {}", variant.name),
                ))
            }
        };
        args.push(parsed);
    }

    Ok(CurrencyId::new(variant.name.clone(), args))
}

fn named_field<'a, T>(value: &'a ScaleValue<T>, name: &str) -> Option<&'a ScaleValue<T>> {
    match &value.value {
        ValueDef::Composite(Composite::Named(fields)) => {
            fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
        }
        _ => None,
    }
}

fn as_u128<T>(value: &ScaleValue<T>, what: &'static str) -> Result<u128, SnapshotError> {
    match &value.value {
        ValueDef::Primitive(Primitive::U128(n)) => Ok(*n),
        // Newtype wrappers decode as a single-field composite
        ValueDef::Composite(composite) => match composite.values().collect::<Vec<_>>().as_slice() {
            [inner] => as_u128(inner, what),
            _ => Err(SnapshotError::unexpected(what, "not an unsigned integer")),
        },
        _ => Err(SnapshotError::unexpected(what, "not an unsigned integer")),
    }
}

fn amount_field<T>(value: &ScaleValue<T>, name: &'static str) -> anyhow::Result<Amount> {
    let field = named_field(value, name)
        .ok_or_else(|| SnapshotError::unexpected(name, "field missing"))?;
    Ok(Amount::from(as_u128(field, name)?))
}

fn collect_bytes<T>(value: &ScaleValue<T>, out: &mut Vec<u8>) {
    match &value.value {
        ValueDef::Primitive(Primitive::U128(n)) => out.push(*n as u8),
        ValueDef::Composite(composite) => {
            for inner in composite.values() {
                collect_bytes(inner, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r#"{"VToken2":"0"}"#)]
    #[case(r#"{"LPToken":["ASG","9","ASG","10"]}"#)]
    #[case(r#"{"BLP":"4"}"#)]
    #[case(r#""BNC""#)]
    fn currency_values_round_trip(#[case] raw: &str) {
        let currency: CurrencyId = raw.parse().unwrap();
        let value = currency_to_value(&currency);
        assert_eq!(currency_from_value(&value).unwrap(), currency);
    }

    #[test]
    fn reads_named_amounts() {
        let value = Value::named_composite([
            ("free", Value::u128(100)),
            ("reserved", Value::u128(1)),
            ("frozen", Value::u128(0)),
        ]);
        assert_eq!(amount_field(&value, "free").unwrap(), Amount::from(100u64));
        assert!(amount_field(&value, "share").is_err());
    }

    #[test]
    fn collects_nested_account_bytes() {
        let inner = Value::from_bytes([7u8; 32]);
        let wrapped = Value::unnamed_composite([inner]);
        let mut bytes = Vec::new();
        collect_bytes(&wrapped, &mut bytes);
        assert_eq!(bytes, vec![7u8; 32]);
    }
}
